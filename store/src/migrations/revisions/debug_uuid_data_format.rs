//! Read-only inspection of stored recipe ids.

use diesel::sqlite::SqliteConnection;
use uuid::Uuid;

use crate::error::MigrationError;
use crate::migrations::{Revision, RevisionMetadata};
use crate::raw_sql::all_ids;

/// How the stored recipe ids are shaped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdFormatSummary {
    pub total: usize,
    /// 36-character hyphenated lowercase UUIDs.
    pub canonical: usize,
    /// Parse as UUIDs but are stored in another form.
    pub non_canonical: usize,
    pub invalid: usize,
}

/// Logs the format of stored recipe ids. Never modifies data, and its
/// downgrade does nothing.
pub struct DebugUuidDataFormat;

impl DebugUuidDataFormat {
    pub const ID: &'static str = "86635a760fcf";

    pub fn inspect(conn: &mut SqliteConnection) -> Result<IdFormatSummary, MigrationError> {
        let mut summary = IdFormatSummary::default();

        for row in all_ids(conn, "recipes")? {
            summary.total += 1;
            match Uuid::parse_str(&row.id) {
                Ok(uuid) if uuid.hyphenated().to_string() == row.id => summary.canonical += 1,
                Ok(_) => {
                    summary.non_canonical += 1;
                    tracing::debug!(id = %row.id, len = row.id.len(), "Non-canonical UUID");
                }
                Err(e) => {
                    summary.invalid += 1;
                    tracing::debug!(id = %row.id, error = %e, "Id is not a UUID");
                }
            }
        }

        Ok(summary)
    }
}

impl Revision for DebugUuidDataFormat {
    fn metadata(&self) -> RevisionMetadata {
        RevisionMetadata {
            id: Self::ID,
            parents: &["8dda03f6f2c2"],
            description: "debug uuid data format",
            reversible: true,
        }
    }

    fn upgrade(&self, conn: &mut SqliteConnection) -> Result<(), MigrationError> {
        let summary = Self::inspect(conn)?;
        tracing::info!(
            total = summary.total,
            canonical = summary.canonical,
            non_canonical = summary.non_canonical,
            invalid = summary.invalid,
            "Recipe id formats"
        );
        Ok(())
    }

    fn downgrade(&self, _conn: &mut SqliteConnection) -> Result<(), MigrationError> {
        Ok(())
    }
}
