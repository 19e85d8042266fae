//! Timestamps on recipes, added nullable and backfilled.

use diesel::connection::SimpleConnection;
use diesel::sqlite::SqliteConnection;

use crate::error::MigrationError;
use crate::migrations::{Revision, RevisionMetadata};

/// Adds `created_at` and `updated_at` to recipes.
///
/// The columns are added nullable and existing rows are filled with the
/// current time. They are left nullable afterwards; the UUID conversion and
/// the null-timestamp repair tighten this later in the chain.
pub struct AddTimestamps;

impl AddTimestamps {
    pub const ID: &'static str = "1c66282b9e50";
}

impl Revision for AddTimestamps {
    fn metadata(&self) -> RevisionMetadata {
        RevisionMetadata {
            id: Self::ID,
            parents: &["1c2c47357c10"],
            description: "add timestamps to recipes table",
            reversible: true,
        }
    }

    fn upgrade(&self, conn: &mut SqliteConnection) -> Result<(), MigrationError> {
        conn.batch_execute(
            "ALTER TABLE recipes ADD COLUMN created_at DATETIME;
             ALTER TABLE recipes ADD COLUMN updated_at DATETIME;
             UPDATE recipes SET created_at = CURRENT_TIMESTAMP WHERE created_at IS NULL;
             UPDATE recipes SET updated_at = CURRENT_TIMESTAMP WHERE updated_at IS NULL;",
        )?;
        Ok(())
    }

    fn downgrade(&self, conn: &mut SqliteConnection) -> Result<(), MigrationError> {
        conn.batch_execute(
            "ALTER TABLE recipes DROP COLUMN updated_at;
             ALTER TABLE recipes DROP COLUMN created_at;",
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::revisions::test_support::{column_names, database_at};
    use crate::migrations::revisions::CreateRecipesTable;
    use crate::raw_sql::fill_nulls;

    #[test]
    fn test_backfills_existing_rows() {
        let mut conn = database_at(CreateRecipesTable::ID);
        conn.batch_execute(
            r#"INSERT INTO recipes (name, ingredients, instructions) VALUES ('Toast', '["bread"]', '["toast"]');
               INSERT INTO recipes (name, ingredients, instructions) VALUES ('Tea', '["tea"]', '["steep"]');"#,
        )
        .unwrap();

        AddTimestamps.upgrade(&mut conn).unwrap();

        assert_eq!(
            column_names(&mut conn, "recipes"),
            vec!["id", "name", "ingredients", "instructions", "created_at", "updated_at"]
        );
        // Nothing left to fill.
        assert_eq!(fill_nulls(&mut conn, "recipes", "created_at", "x").unwrap(), 0);
        assert_eq!(fill_nulls(&mut conn, "recipes", "updated_at", "x").unwrap(), 0);
    }

    #[test]
    fn test_columns_stay_nullable() {
        let mut conn = database_at(AddTimestamps::ID);
        conn.batch_execute(
            r#"INSERT INTO recipes (name, ingredients, instructions, created_at) VALUES ('Toast', '[]', '[]', NULL)"#,
        )
        .unwrap();
        assert_eq!(fill_nulls(&mut conn, "recipes", "created_at", "x").unwrap(), 1);
    }

    #[test]
    fn test_downgrade_removes_columns() {
        let mut conn = database_at(AddTimestamps::ID);
        AddTimestamps.downgrade(&mut conn).unwrap();
        assert_eq!(
            column_names(&mut conn, "recipes"),
            vec!["id", "name", "ingredients", "instructions"]
        );
    }
}
