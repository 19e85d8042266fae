//! The revision chain, in declaration order.

mod add_servings_fields;
mod add_timestamps;
mod clean_up_integer_ids;
mod convert_recipe_id_to_uuid;
mod create_recipes_table;
mod create_users_table;
mod debug_uuid_data_format;
mod fix_null_timestamps;
mod fix_uuid_column_types;
mod merge_heads;
mod replace_servings_with_makes;

use diesel::connection::SimpleConnection;
use diesel::sqlite::SqliteConnection;

pub use add_servings_fields::AddServingsFields;
pub use add_timestamps::AddTimestamps;
pub use clean_up_integer_ids::CleanUpIntegerIds;
pub use convert_recipe_id_to_uuid::ConvertRecipeIdToUuid;
pub use create_recipes_table::CreateRecipesTable;
pub use create_users_table::CreateUsersTable;
pub use debug_uuid_data_format::{DebugUuidDataFormat, IdFormatSummary};
pub use fix_null_timestamps::FixNullTimestamps;
pub use fix_uuid_column_types::FixUuidColumnTypes;
pub use merge_heads::MergeHeads;
pub use replace_servings_with_makes::ReplaceServingsWithMakes;

use crate::error::MigrationError;
use crate::migrations::Revision;
use crate::raw_sql::{quote_ident, table_columns};

/// Every revision shipped with the store.
pub fn all() -> Vec<Box<dyn Revision>> {
    vec![
        Box::new(CreateRecipesTable),
        Box::new(AddTimestamps),
        Box::new(CreateUsersTable),
        Box::new(ConvertRecipeIdToUuid),
        Box::new(AddServingsFields),
        Box::new(ReplaceServingsWithMakes),
        Box::new(MergeHeads),
        Box::new(FixUuidColumnTypes),
        Box::new(CleanUpIntegerIds),
        Box::new(DebugUuidDataFormat),
        Box::new(FixNullTimestamps),
    ]
}

/// Columns the recipe table has had since its first revision.
const RECIPE_CORE_COLUMNS: &[&str] = &[
    "id",
    "name",
    "ingredients",
    "instructions",
    "created_at",
    "updated_at",
];

/// Declarations for the columns of `table` that are not in `core`, keeping
/// their declared type. Used so a table rebuild carries columns added by
/// later revisions.
fn extra_column_defs(
    conn: &mut SqliteConnection,
    table: &str,
    core: &[&str],
) -> Result<Vec<String>, MigrationError> {
    Ok(table_columns(conn, table)?
        .into_iter()
        .filter(|c| !core.contains(&c.name.as_str()))
        .map(|c| format!("{} {}", quote_ident(&c.name), c.column_type))
        .collect())
}

/// Replace `table` with `{table}_new`, created by `create_sql`.
///
/// Every column of the new table that the old table also has is copied,
/// using the SQL expression returned by `column_expr` for it, or skipped when
/// it returns `None`. Rows are copied in rowid order. The old table is then
/// dropped (taking its indexes with it) and the new one renamed.
fn rebuild_table(
    conn: &mut SqliteConnection,
    table: &str,
    create_sql: &str,
    column_expr: impl Fn(&str) -> Option<String>,
) -> Result<(), MigrationError> {
    let new_table = format!("{table}_new");
    conn.batch_execute(create_sql)?;

    let old_columns: Vec<String> = table_columns(conn, table)?
        .into_iter()
        .map(|c| c.name)
        .collect();

    let mut targets = Vec::new();
    let mut sources = Vec::new();
    for column in table_columns(conn, &new_table)? {
        if !old_columns.contains(&column.name) {
            continue;
        }
        if let Some(expr) = column_expr(&column.name) {
            targets.push(quote_ident(&column.name));
            sources.push(expr);
        }
    }

    conn.batch_execute(&format!(
        "INSERT INTO {new} ({targets}) SELECT {sources} FROM {old} ORDER BY rowid;
         DROP TABLE {old};
         ALTER TABLE {new} RENAME TO {old};",
        new = quote_ident(&new_table),
        old = quote_ident(table),
        targets = targets.join(", "),
        sources = sources.join(", "),
    ))?;

    Ok(())
}

/// Column expression that fills NULL timestamps on copy.
fn timestamp_or_now(column: &str) -> String {
    let column = quote_ident(column);
    format!("COALESCE({column}, CURRENT_TIMESTAMP)")
}

#[cfg(test)]
pub(crate) mod test_support {
    use diesel::prelude::*;

    use crate::migrations::RevisionGraph;
    use crate::raw_sql::table_columns;

    /// In-memory database upgraded to `revision`.
    pub fn database_at(revision: &str) -> SqliteConnection {
        let mut conn = SqliteConnection::establish(":memory:").unwrap();
        RevisionGraph::standard()
            .unwrap()
            .upgrade_to(&mut conn, revision)
            .unwrap();
        conn
    }

    pub fn column_names(conn: &mut SqliteConnection, table: &str) -> Vec<String> {
        table_columns(conn, table)
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect()
    }
}
