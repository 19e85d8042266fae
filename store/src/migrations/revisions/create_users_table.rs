//! Users table with the seed account.

use diesel::connection::SimpleConnection;
use diesel::sqlite::SqliteConnection;

use crate::error::MigrationError;
use crate::migrations::{Revision, RevisionMetadata};

pub struct CreateUsersTable;

impl CreateUsersTable {
    pub const ID: &'static str = "2a3b4c5d6e7f";

    /// Id of the seeded `demo_user`, as 32 hex digits.
    pub const SEED_USER_ID: &'static str = "7dfc4e175b0c4e088de18db9e7321711";
    pub const SEED_USERNAME: &'static str = "demo_user";
}

/// Id column holding exactly 32 lowercase hex digits.
pub(super) fn hex_id_column() -> String {
    format!(
        "VARCHAR(32) NOT NULL PRIMARY KEY \
         CONSTRAINT ck_users_id_uuid_format CHECK (LENGTH(id) = 32 AND id GLOB '{}')",
        "[0-9a-f]".repeat(32)
    )
}

pub(super) fn create_users_sql(table: &str, id_column: &str) -> String {
    format!(
        "CREATE TABLE {table} (
            id {id_column},
            username VARCHAR NOT NULL,
            created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        )"
    )
}

impl Revision for CreateUsersTable {
    fn metadata(&self) -> RevisionMetadata {
        RevisionMetadata {
            id: Self::ID,
            parents: &["1c66282b9e50"],
            description: "create users table",
            reversible: true,
        }
    }

    fn upgrade(&self, conn: &mut SqliteConnection) -> Result<(), MigrationError> {
        conn.batch_execute(&create_users_sql("users", &hex_id_column()))?;
        conn.batch_execute(&format!(
            "CREATE UNIQUE INDEX ix_users_username ON users (username);
             INSERT INTO users (id, username, created_at, updated_at)
             VALUES ('{}', '{}', CURRENT_TIMESTAMP, CURRENT_TIMESTAMP);",
            Self::SEED_USER_ID,
            Self::SEED_USERNAME,
        ))?;
        Ok(())
    }

    fn downgrade(&self, conn: &mut SqliteConnection) -> Result<(), MigrationError> {
        conn.batch_execute(
            "DROP INDEX ix_users_username;
             DROP TABLE users;",
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::revisions::test_support::database_at;
    use crate::raw_sql::{all_ids, index_exists, table_exists};

    #[test]
    fn test_creates_table_with_seed_user() {
        let mut conn = database_at(CreateUsersTable::ID);
        assert!(index_exists(&mut conn, "ix_users_username").unwrap());
        let ids: Vec<_> = all_ids(&mut conn, "users")
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![CreateUsersTable::SEED_USER_ID]);
    }

    #[test]
    fn test_rejects_malformed_ids_and_duplicate_usernames() {
        let mut conn = database_at(CreateUsersTable::ID);
        assert!(conn
            .batch_execute("INSERT INTO users (id, username) VALUES ('not-hex', 'someone')")
            .is_err());
        assert!(conn
            .batch_execute(
                "INSERT INTO users (id, username) VALUES ('7dfc4e17-5b0c-4e08-8de1-8db9e7321711', 'someone')"
            )
            .is_err());
        assert!(conn
            .batch_execute(
                "INSERT INTO users (id, username) VALUES ('00000000000000000000000000000001', 'demo_user')"
            )
            .is_err());
        conn.batch_execute(
            "INSERT INTO users (id, username) VALUES ('00000000000000000000000000000001', 'someone')",
        )
        .unwrap();
    }

    #[test]
    fn test_downgrade_drops_table_and_index() {
        let mut conn = database_at(CreateUsersTable::ID);
        CreateUsersTable.downgrade(&mut conn).unwrap();
        assert!(!table_exists(&mut conn, "users").unwrap());
        assert!(!index_exists(&mut conn, "ix_users_username").unwrap());
    }
}
