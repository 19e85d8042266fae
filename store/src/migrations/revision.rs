//! Revision trait and supporting types.

use diesel::sqlite::SqliteConnection;

use crate::error::MigrationError;

/// Metadata about a revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevisionMetadata {
    /// Unique identifier for this revision (e.g., "1c2c47357c10")
    pub id: &'static str,
    /// Revisions this one applies on top of. Empty for the root, several for a merge.
    pub parents: &'static [&'static str],
    /// Human-readable description
    pub description: &'static str,
    /// If false, `downgrade` always fails with [`MigrationError::Irreversible`]
    pub reversible: bool,
}

/// One step of schema or data evolution.
///
/// Both operations receive the connection explicitly and run inside a
/// transaction opened by the runner, so a failing step leaves the database
/// at the previous revision.
pub trait Revision: Send + Sync {
    /// Return metadata about this revision.
    fn metadata(&self) -> RevisionMetadata;

    /// Apply the revision.
    fn upgrade(&self, conn: &mut SqliteConnection) -> Result<(), MigrationError>;

    /// Undo the revision.
    fn downgrade(&self, conn: &mut SqliteConnection) -> Result<(), MigrationError>;
}

/// Rows changed by a data-repair revision, per table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairReport {
    pub changes: Vec<(&'static str, usize)>,
}

impl RepairReport {
    pub fn record(&mut self, what: &'static str, rows: usize) {
        self.changes.push((what, rows));
    }

    pub fn total(&self) -> usize {
        self.changes.iter().map(|(_, rows)| rows).sum()
    }

    pub fn get(&self, what: &str) -> usize {
        self.changes
            .iter()
            .filter(|(name, _)| *name == what)
            .map(|(_, rows)| rows)
            .sum()
    }
}
