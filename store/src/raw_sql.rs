//! Raw SQL that can't be expressed in Diesel's type-safe DSL.
//!
//! # Safety
//!
//! All SQL in this module has been reviewed for SQL injection safety:
//! - Values are ALWAYS passed via `.bind()` parameters
//! - Identifiers that must be spliced into statements (table and column
//!   names) come from the schema itself or from constants, never from users,
//!   and are quoted with [`quote_ident`]
//!
//! When adding new SQL here:
//! 1. Document why Diesel DSL can't be used
//! 2. Ensure all values use `.bind()`

use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{Integer, Nullable, Text};

/// Column description as reported by `pragma_table_info`.
#[derive(QueryableByName, Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    #[diesel(sql_type = Text)]
    pub name: String,
    #[diesel(sql_type = Text)]
    pub column_type: String,
    #[diesel(sql_type = Integer)]
    pub not_null: i32,
    #[diesel(sql_type = Integer)]
    pub pk: i32,
}

#[derive(QueryableByName, Debug)]
struct NameRow {
    #[diesel(sql_type = Text)]
    name: String,
}

/// A row id read back as text regardless of its storage class.
#[derive(QueryableByName, Debug, Clone)]
pub struct IdRow {
    #[diesel(sql_type = Text)]
    pub id: String,
}

#[derive(QueryableByName, Debug)]
pub struct CountRow {
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    pub count: i64,
}

/// Quote an identifier for splicing into a statement.
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Columns of `table` in declaration order. Empty if the table doesn't exist.
///
/// # Why raw SQL?
/// Schema introspection goes through SQLite pragmas.
pub fn table_columns(conn: &mut SqliteConnection, table: &str) -> QueryResult<Vec<ColumnInfo>> {
    sql_query(
        "SELECT name, type AS column_type, \"notnull\" AS not_null, pk \
         FROM pragma_table_info(?) ORDER BY cid",
    )
    .bind::<Text, _>(table)
    .load(conn)
}

pub fn table_exists(conn: &mut SqliteConnection, table: &str) -> QueryResult<bool> {
    let rows: Vec<NameRow> =
        sql_query("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?")
            .bind::<Text, _>(table)
            .load(conn)?;
    Ok(!rows.is_empty())
}

pub fn index_exists(conn: &mut SqliteConnection, index: &str) -> QueryResult<bool> {
    let rows: Vec<NameRow> =
        sql_query("SELECT name FROM sqlite_master WHERE type = 'index' AND name = ?")
            .bind::<Text, _>(index)
            .load(conn)?;
    Ok(!rows.is_empty())
}

/// All ids of `table`, as text.
pub fn all_ids(conn: &mut SqliteConnection, table: &str) -> QueryResult<Vec<IdRow>> {
    sql_query(format!(
        "SELECT CAST(id AS TEXT) AS id FROM {} ORDER BY rowid",
        quote_ident(table)
    ))
    .load(conn)
}

/// Ids of `table` that hold an integer rather than a UUID.
///
/// Uses a cast-and-compare test: a value equal to its own integer cast is an
/// integer. This classifies `'17'` and `17` as integers and any UUID string,
/// including one starting with digits, as not.
///
/// # Why raw SQL?
/// The comparison relies on SQLite's type affinity rules.
pub fn integer_ids(conn: &mut SqliteConnection, table: &str) -> QueryResult<Vec<IdRow>> {
    sql_query(format!(
        "SELECT CAST(id AS TEXT) AS id FROM {} WHERE CAST(id AS INTEGER) = id ORDER BY rowid",
        quote_ident(table)
    ))
    .load(conn)
}

/// Replace one row's id.
pub fn replace_id(
    conn: &mut SqliteConnection,
    table: &str,
    old_id: &str,
    new_id: &str,
) -> QueryResult<usize> {
    sql_query(format!("UPDATE {} SET id = ? WHERE id = ?", quote_ident(table)))
        .bind::<Text, _>(new_id)
        .bind::<Text, _>(old_id)
        .execute(conn)
}

/// Set `column` to `value` on every row where it is NULL. Returns rows changed.
pub fn fill_nulls(
    conn: &mut SqliteConnection,
    table: &str,
    column: &str,
    value: &str,
) -> QueryResult<usize> {
    let column = quote_ident(column);
    sql_query(format!(
        "UPDATE {} SET {column} = ? WHERE {column} IS NULL",
        quote_ident(table)
    ))
    .bind::<Nullable<Text>, _>(Some(value))
    .execute(conn)
}

/// A recipe row read without assuming the head schema's constraints.
#[derive(QueryableByName, Debug, Clone, PartialEq, Eq)]
pub struct RawRecipeRow {
    #[diesel(sql_type = Text)]
    pub id: String,
    #[diesel(sql_type = Nullable<Text>)]
    pub name: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub ingredients: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub instructions: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub created_at: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub updated_at: Option<String>,
}

/// Every recipe row as stored, in insertion order.
///
/// # Why raw SQL?
/// Ids may still be integers and timestamps NULL, which the typed schema
/// can't represent.
pub fn raw_recipes(conn: &mut SqliteConnection) -> QueryResult<Vec<RawRecipeRow>> {
    sql_query(
        "SELECT CAST(id AS TEXT) AS id, name, \
                CAST(ingredients AS TEXT) AS ingredients, \
                CAST(instructions AS TEXT) AS instructions, \
                CAST(created_at AS TEXT) AS created_at, \
                CAST(updated_at AS TEXT) AS updated_at \
         FROM recipes ORDER BY rowid",
    )
    .load(conn)
}

pub fn count_rows(conn: &mut SqliteConnection, table: &str) -> QueryResult<i64> {
    let row: CountRow = sql_query(format!("SELECT COUNT(*) AS count FROM {}", quote_ident(table)))
        .get_result(conn)?;
    Ok(row.count)
}
