use diesel::sqlite::SqliteConnection;

use crate::error::MigrationError;
use crate::migrations::{Revision, RevisionMetadata};

/// Joins the UUID-conversion branch and the servings/makes branch.
pub struct MergeHeads;

impl MergeHeads {
    pub const ID: &'static str = "merge_heads_20250621";
}

impl Revision for MergeHeads {
    fn metadata(&self) -> RevisionMetadata {
        RevisionMetadata {
            id: Self::ID,
            parents: &["3a4b5c6d7e8f", "b7c6e000a7e5"],
            description: "merge heads",
            reversible: true,
        }
    }

    fn upgrade(&self, _conn: &mut SqliteConnection) -> Result<(), MigrationError> {
        Ok(())
    }

    fn downgrade(&self, _conn: &mut SqliteConnection) -> Result<(), MigrationError> {
        Ok(())
    }
}
