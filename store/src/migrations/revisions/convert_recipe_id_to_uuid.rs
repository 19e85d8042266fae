//! Integer recipe ids to UUIDs, by rebuilding the table.

use diesel::sqlite::SqliteConnection;
use uuid::Uuid;

use super::{extra_column_defs, rebuild_table, timestamp_or_now, RECIPE_CORE_COLUMNS};
use crate::error::MigrationError;
use crate::migrations::{Revision, RevisionMetadata};
use crate::raw_sql::{all_ids, quote_ident, replace_id};

/// Moves recipes to a table keyed by UUID strings.
///
/// SQLite can't change a primary key's type in place, so this creates
/// `recipes_new`, copies every row across, drops `recipes` and renames the
/// copy. Each row gets a fresh v4 UUID; the integer ids are not kept anywhere.
/// Timestamps become NOT NULL, with missing values set to the current time.
///
/// Downgrading rebuilds an integer-keyed table and renumbers the rows in
/// their current order, so the original integers do not come back.
pub struct ConvertRecipeIdToUuid;

impl ConvertRecipeIdToUuid {
    pub const ID: &'static str = "3a4b5c6d7e8f";
}

fn create_recipes_sql(
    conn: &mut SqliteConnection,
    new_table: &str,
    id_column: &str,
) -> Result<String, MigrationError> {
    let mut columns = vec![
        format!("id {id_column}"),
        "name VARCHAR NOT NULL".to_string(),
        "ingredients JSON NOT NULL".to_string(),
        "instructions JSON NOT NULL".to_string(),
        "created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP".to_string(),
        "updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP".to_string(),
    ];
    columns.extend(extra_column_defs(conn, "recipes", RECIPE_CORE_COLUMNS)?);

    Ok(format!(
        "CREATE TABLE {} ({})",
        quote_ident(new_table),
        columns.join(", ")
    ))
}

impl Revision for ConvertRecipeIdToUuid {
    fn metadata(&self) -> RevisionMetadata {
        RevisionMetadata {
            id: Self::ID,
            parents: &["2a3b4c5d6e7f"],
            description: "convert recipe id to uuid",
            reversible: true,
        }
    }

    fn upgrade(&self, conn: &mut SqliteConnection) -> Result<(), MigrationError> {
        let create = create_recipes_sql(conn, "recipes_new", "VARCHAR(36) NOT NULL PRIMARY KEY")?;
        rebuild_table(conn, "recipes", &create, |column| match column {
            "id" => Some("CAST(id AS TEXT)".to_string()),
            "created_at" | "updated_at" => Some(timestamp_or_now(column)),
            other => Some(quote_ident(other)),
        })?;

        let rows = all_ids(conn, "recipes")?;
        for row in &rows {
            let new_id = Uuid::new_v4().to_string();
            replace_id(conn, "recipes", &row.id, &new_id)?;
            tracing::debug!(old_id = %row.id, new_id = %new_id, "Assigned recipe UUID");
        }
        tracing::info!(count = rows.len(), "Converted recipe ids to UUIDs");

        Ok(())
    }

    fn downgrade(&self, conn: &mut SqliteConnection) -> Result<(), MigrationError> {
        let create = create_recipes_sql(
            conn,
            "recipes_new",
            "INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT",
        )?;
        // Skipping id lets AUTOINCREMENT renumber the rows.
        rebuild_table(conn, "recipes", &create, |column| match column {
            "id" => None,
            "created_at" | "updated_at" => Some(timestamp_or_now(column)),
            other => Some(quote_ident(other)),
        })?;
        Ok(())
    }
}
