//! Repair for NULL timestamps.

use chrono::{DateTime, Utc};
use diesel::sqlite::SqliteConnection;

use crate::error::MigrationError;
use crate::migrations::{RepairReport, Revision, RevisionMetadata};
use crate::models::format_timestamp;
use crate::raw_sql::fill_nulls;

const TARGETS: [(&str, &str, &str); 4] = [
    ("recipes.created_at", "recipes", "created_at"),
    ("recipes.updated_at", "recipes", "updated_at"),
    ("users.created_at", "users", "created_at"),
    ("users.updated_at", "users", "updated_at"),
];

/// Sets every NULL `created_at` / `updated_at` in both tables to one fixed
/// timestamp, chosen once per run.
///
/// Rows that already have a value are untouched, so a second run reports
/// zero changes. Cannot be downgraded.
pub struct FixNullTimestamps;

impl FixNullTimestamps {
    pub const ID: &'static str = "9548ad40c2e4";

    pub fn run(conn: &mut SqliteConnection, now: DateTime<Utc>) -> Result<RepairReport, MigrationError> {
        let timestamp = format_timestamp(now);
        tracing::info!(%timestamp, "Fixing NULL timestamps");

        let mut report = RepairReport::default();
        for (label, table, column) in TARGETS {
            let fixed = fill_nulls(conn, table, column, &timestamp)?;
            if fixed > 0 {
                tracing::warn!(table, column, fixed, "Filled NULL timestamps");
            }
            report.record(label, fixed);
        }

        Ok(report)
    }
}

impl Revision for FixNullTimestamps {
    fn metadata(&self) -> RevisionMetadata {
        RevisionMetadata {
            id: Self::ID,
            parents: &["86635a760fcf"],
            description: "fix null timestamps",
            reversible: false,
        }
    }

    fn upgrade(&self, conn: &mut SqliteConnection) -> Result<(), MigrationError> {
        let report = Self::run(conn, Utc::now())?;
        tracing::info!(fixed = report.total(), "NULL timestamp repair completed");
        Ok(())
    }

    fn downgrade(&self, _conn: &mut SqliteConnection) -> Result<(), MigrationError> {
        Err(MigrationError::Irreversible { revision: Self::ID })
    }
}
