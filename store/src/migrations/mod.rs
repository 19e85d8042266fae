//! Schema migrations.
//!
//! Each [`Revision`] upgrades or downgrades the database over an explicit
//! connection. [`RevisionGraph`] orders them and records the applied head in
//! the `schema_revision` table.

mod revision;
pub mod revisions;
mod runner;

pub use revision::{RepairReport, Revision, RevisionMetadata};
pub use revisions::{CleanUpIntegerIds, DebugUuidDataFormat, FixNullTimestamps, IdFormatSummary};
pub use runner::RevisionGraph;
