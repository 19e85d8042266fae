//! Initial recipes table with an integer key.

use diesel::connection::SimpleConnection;
use diesel::sqlite::SqliteConnection;

use crate::error::MigrationError;
use crate::migrations::{Revision, RevisionMetadata};

pub struct CreateRecipesTable;

impl CreateRecipesTable {
    pub const ID: &'static str = "1c2c47357c10";
}

impl Revision for CreateRecipesTable {
    fn metadata(&self) -> RevisionMetadata {
        RevisionMetadata {
            id: Self::ID,
            parents: &[],
            description: "create recipes table",
            reversible: true,
        }
    }

    fn upgrade(&self, conn: &mut SqliteConnection) -> Result<(), MigrationError> {
        conn.batch_execute(
            "CREATE TABLE recipes (
                id INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
                name VARCHAR NOT NULL,
                ingredients JSON NOT NULL,
                instructions JSON NOT NULL
            )",
        )?;
        Ok(())
    }

    fn downgrade(&self, conn: &mut SqliteConnection) -> Result<(), MigrationError> {
        conn.batch_execute("DROP TABLE recipes")?;
        Ok(())
    }
}
