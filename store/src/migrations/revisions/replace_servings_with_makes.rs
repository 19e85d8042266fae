use diesel::connection::SimpleConnection;
use diesel::sqlite::SqliteConnection;

use crate::error::MigrationError;
use crate::migrations::{Revision, RevisionMetadata};

/// Replaces the servings columns with the more general makes range.
///
/// New columns are added before the old ones are dropped; downgrade mirrors
/// this. Values are not carried between the two column sets.
pub struct ReplaceServingsWithMakes;

impl ReplaceServingsWithMakes {
    pub const ID: &'static str = "b7c6e000a7e5";
}

impl Revision for ReplaceServingsWithMakes {
    fn metadata(&self) -> RevisionMetadata {
        RevisionMetadata {
            id: Self::ID,
            parents: &["47bdb0e75fe9"],
            description: "replace servings fields with makes fields",
            reversible: true,
        }
    }

    fn upgrade(&self, conn: &mut SqliteConnection) -> Result<(), MigrationError> {
        conn.batch_execute(
            "ALTER TABLE recipes ADD COLUMN makes_min INTEGER;
             ALTER TABLE recipes ADD COLUMN makes_max INTEGER;
             ALTER TABLE recipes ADD COLUMN makes_unit VARCHAR;
             ALTER TABLE recipes DROP COLUMN servings_min;
             ALTER TABLE recipes DROP COLUMN servings_max;",
        )?;
        Ok(())
    }

    fn downgrade(&self, conn: &mut SqliteConnection) -> Result<(), MigrationError> {
        conn.batch_execute(
            "ALTER TABLE recipes ADD COLUMN servings_min INTEGER;
             ALTER TABLE recipes ADD COLUMN servings_max INTEGER;
             ALTER TABLE recipes DROP COLUMN makes_unit;
             ALTER TABLE recipes DROP COLUMN makes_max;
             ALTER TABLE recipes DROP COLUMN makes_min;",
        )?;
        Ok(())
    }
}
