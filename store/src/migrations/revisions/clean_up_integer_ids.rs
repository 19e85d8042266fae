//! Repair for ids that are still integers.

use diesel::sqlite::SqliteConnection;
use uuid::Uuid;

use crate::error::MigrationError;
use crate::migrations::{RepairReport, Revision, RevisionMetadata};
use crate::raw_sql::{integer_ids, replace_id};

const TABLES: [&str; 2] = ["recipes", "users"];

/// Replaces any integer id left in `recipes` or `users` with a fresh UUID.
///
/// Running it again finds nothing to do. There is no downgrade: the replaced
/// integers are not recorded.
pub struct CleanUpIntegerIds;

impl CleanUpIntegerIds {
    pub const ID: &'static str = "8dda03f6f2c2";

    /// Convert integer ids in both tables. Returns rows changed per table.
    pub fn run(conn: &mut SqliteConnection) -> Result<RepairReport, MigrationError> {
        let mut report = RepairReport::default();

        for table in TABLES {
            let mut converted = 0;
            for row in integer_ids(conn, table)? {
                let new_id = Uuid::new_v4().to_string();
                converted += replace_id(conn, table, &row.id, &new_id)?;
                tracing::warn!(table, old_id = %row.id, new_id = %new_id, "Converted integer id");
            }
            report.record(table, converted);
        }

        tracing::info!(converted = report.total(), "Integer id cleanup completed");
        Ok(report)
    }
}

impl Revision for CleanUpIntegerIds {
    fn metadata(&self) -> RevisionMetadata {
        RevisionMetadata {
            id: Self::ID,
            parents: &["07760d4f0aad"],
            description: "clean up integer ids",
            reversible: false,
        }
    }

    fn upgrade(&self, conn: &mut SqliteConnection) -> Result<(), MigrationError> {
        Self::run(conn).map(|_| ())
    }

    fn downgrade(&self, _conn: &mut SqliteConnection) -> Result<(), MigrationError> {
        Err(MigrationError::Irreversible { revision: Self::ID })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::revisions::test_support::database_at;
    use crate::migrations::revisions::FixUuidColumnTypes;
    use crate::raw_sql::all_ids;
    use diesel::connection::SimpleConnection;

    #[test]
    fn test_converts_integers_and_is_idempotent() {
        let mut conn = database_at(FixUuidColumnTypes::ID);
        conn.batch_execute(
            r#"INSERT INTO recipes (id, name, ingredients, instructions) VALUES ('17', 'Stray', '[]', '[]');
               INSERT INTO recipes (id, name, ingredients, instructions) VALUES (42, 'Also stray', '[]', '[]');
               INSERT INTO recipes (id, name, ingredients, instructions)
               VALUES ('1234abcd-3d82-465a-a8a7-67f63aa8bf71', 'Fine', '[]', '[]');
               INSERT INTO users (id, username) VALUES ('5', 'legacy');"#,
        )
        .unwrap();

        let report = CleanUpIntegerIds::run(&mut conn).unwrap();
        assert_eq!(report.get("recipes"), 2);
        assert_eq!(report.get("users"), 1);

        let ids: Vec<_> = all_ids(&mut conn, "recipes")
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert!(ids.contains(&"1234abcd-3d82-465a-a8a7-67f63aa8bf71".to_string()));
        assert!(ids.iter().all(|id| Uuid::parse_str(id).is_ok()));

        assert_eq!(CleanUpIntegerIds::run(&mut conn).unwrap().total(), 0);
    }

    #[test]
    fn test_downgrade_is_refused() {
        let mut conn = database_at(CleanUpIntegerIds::ID);
        assert!(matches!(
            CleanUpIntegerIds.downgrade(&mut conn),
            Err(MigrationError::Irreversible { revision: "8dda03f6f2c2" })
        ));
    }
}
