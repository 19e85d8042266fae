//! Column types for UUID ids on both tables.

use diesel::connection::SimpleConnection;
use diesel::sqlite::SqliteConnection;
use uuid::Uuid;

use super::create_users_table::{create_users_sql, hex_id_column};
use super::{extra_column_defs, rebuild_table, timestamp_or_now, RECIPE_CORE_COLUMNS};
use crate::error::MigrationError;
use crate::migrations::{Revision, RevisionMetadata};
use crate::raw_sql::{all_ids, quote_ident, replace_id};

const UUID_ID_COLUMN: &str = "TEXT NOT NULL PRIMARY KEY";

/// Gives `recipes.id` and `users.id` a UUID-friendly column type.
///
/// Both tables are rebuilt with a plain text key. Ids that parse as UUIDs are
/// rewritten in hyphenated lowercase form, which turns the 32-digit user ids
/// into the same shape recipe ids already have; the users CHECK constraint
/// is dropped. Anything else (stray integers) is left for the integer-id
/// cleanup that follows.
///
/// Downgrade restores the 32-digit user ids and their CHECK constraint.
pub struct FixUuidColumnTypes;

impl FixUuidColumnTypes {
    pub const ID: &'static str = "07760d4f0aad";
}

fn recipe_table_sql(conn: &mut SqliteConnection, id_column: &str) -> Result<String, MigrationError> {
    let mut columns = vec![
        format!("id {id_column}"),
        "name VARCHAR NOT NULL".to_string(),
        "ingredients JSON NOT NULL".to_string(),
        "instructions JSON NOT NULL".to_string(),
        "created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP".to_string(),
        "updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP".to_string(),
    ];
    columns.extend(extra_column_defs(conn, "recipes", RECIPE_CORE_COLUMNS)?);
    Ok(format!("CREATE TABLE recipes_new ({})", columns.join(", ")))
}

fn copy_column(column: &str) -> Option<String> {
    match column {
        "created_at" | "updated_at" => Some(timestamp_or_now(column)),
        other => Some(quote_ident(other)),
    }
}

fn rebuild_users(conn: &mut SqliteConnection, id_column: &str) -> Result<(), MigrationError> {
    rebuild_table(conn, "users", &create_users_sql("users_new", id_column), copy_column)?;
    conn.batch_execute("CREATE UNIQUE INDEX ix_users_username ON users (username)")?;
    Ok(())
}

/// Rewrite every UUID-shaped id in `table` as hyphenated lowercase.
fn hyphenate_ids(conn: &mut SqliteConnection, table: &str) -> Result<usize, MigrationError> {
    let mut changed = 0;
    for row in all_ids(conn, table)? {
        let Ok(uuid) = Uuid::parse_str(&row.id) else {
            tracing::debug!(table, id = %row.id, "Leaving non-UUID id");
            continue;
        };
        let canonical = uuid.hyphenated().to_string();
        if canonical != row.id {
            changed += replace_id(conn, table, &row.id, &canonical)?;
        }
    }
    Ok(changed)
}

impl Revision for FixUuidColumnTypes {
    fn metadata(&self) -> RevisionMetadata {
        RevisionMetadata {
            id: Self::ID,
            parents: &["merge_heads_20250621"],
            description: "fix uuid column types",
            reversible: true,
        }
    }

    fn upgrade(&self, conn: &mut SqliteConnection) -> Result<(), MigrationError> {
        let create = recipe_table_sql(conn, UUID_ID_COLUMN)?;
        rebuild_table(conn, "recipes", &create, copy_column)?;
        let recipes = hyphenate_ids(conn, "recipes")?;

        rebuild_users(conn, UUID_ID_COLUMN)?;
        let users = hyphenate_ids(conn, "users")?;

        tracing::info!(recipes, users, "Normalized UUID ids");
        Ok(())
    }

    fn downgrade(&self, conn: &mut SqliteConnection) -> Result<(), MigrationError> {
        let create = recipe_table_sql(conn, "VARCHAR(36) NOT NULL PRIMARY KEY")?;
        rebuild_table(conn, "recipes", &create, copy_column)?;

        // The CHECK constraint needs every id in 32-digit form before the copy.
        for row in all_ids(conn, "users")? {
            let uuid = Uuid::parse_str(&row.id).map_err(|e| MigrationError::Corrupt {
                table: "users",
                reason: format!("id {:?} is not a UUID: {e}", row.id),
            })?;
            let simple = uuid.simple().to_string();
            if simple != row.id {
                replace_id(conn, "users", &row.id, &simple)?;
            }
        }
        rebuild_users(conn, &hex_id_column())?;

        Ok(())
    }
}
