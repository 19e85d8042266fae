use diesel::connection::SimpleConnection;
use diesel::sqlite::SqliteConnection;

use crate::error::MigrationError;
use crate::migrations::{Revision, RevisionMetadata};

/// Adds nullable `servings_min` / `servings_max` to recipes.
pub struct AddServingsFields;

impl AddServingsFields {
    pub const ID: &'static str = "47bdb0e75fe9";
}

impl Revision for AddServingsFields {
    fn metadata(&self) -> RevisionMetadata {
        RevisionMetadata {
            id: Self::ID,
            parents: &["1c66282b9e50"],
            description: "add servings fields to recipes table",
            reversible: true,
        }
    }

    fn upgrade(&self, conn: &mut SqliteConnection) -> Result<(), MigrationError> {
        conn.batch_execute(
            "ALTER TABLE recipes ADD COLUMN servings_min INTEGER;
             ALTER TABLE recipes ADD COLUMN servings_max INTEGER;",
        )?;
        Ok(())
    }

    fn downgrade(&self, conn: &mut SqliteConnection) -> Result<(), MigrationError> {
        conn.batch_execute(
            "ALTER TABLE recipes DROP COLUMN servings_max;
             ALTER TABLE recipes DROP COLUMN servings_min;",
        )?;
        Ok(())
    }
}
