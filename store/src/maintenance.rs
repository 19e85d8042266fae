//! Read-only checks over stored recipes, for operators.

use std::fmt;

use diesel::sqlite::SqliteConnection;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::parse_timestamp;
use crate::raw_sql::{raw_recipes, RawRecipeRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeProblem {
    IdNotUuid,
    MissingCreatedAt,
    MissingUpdatedAt,
    UnparsableTimestamp,
    InvalidJson,
}

impl fmt::Display for RecipeProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            RecipeProblem::IdNotUuid => "id is not a UUID",
            RecipeProblem::MissingCreatedAt => "created_at is NULL",
            RecipeProblem::MissingUpdatedAt => "updated_at is NULL",
            RecipeProblem::UnparsableTimestamp => "timestamp cannot be parsed",
            RecipeProblem::InvalidJson => "ingredients or instructions are not a JSON list",
        };
        f.write_str(text)
    }
}

/// A stored recipe that would fail to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeIssue {
    pub id: String,
    pub name: Option<String>,
    pub problems: Vec<RecipeProblem>,
}

fn is_json_list(value: Option<&str>) -> bool {
    value.is_some_and(|v| serde_json::from_str::<Vec<String>>(v).is_ok())
}

fn problems(row: &RawRecipeRow) -> Vec<RecipeProblem> {
    let mut problems = Vec::new();

    if Uuid::parse_str(&row.id).is_err() {
        problems.push(RecipeProblem::IdNotUuid);
    }

    for (value, missing) in [
        (&row.created_at, RecipeProblem::MissingCreatedAt),
        (&row.updated_at, RecipeProblem::MissingUpdatedAt),
    ] {
        match value.as_deref() {
            None => problems.push(missing),
            Some(ts) if parse_timestamp(ts).is_none() => {
                if !problems.contains(&RecipeProblem::UnparsableTimestamp) {
                    problems.push(RecipeProblem::UnparsableTimestamp);
                }
            }
            Some(_) => {}
        }
    }

    if !is_json_list(row.ingredients.as_deref()) || !is_json_list(row.instructions.as_deref()) {
        problems.push(RecipeProblem::InvalidJson);
    }

    problems
}

/// Every recipe row exactly as stored.
pub fn inspect_recipes(conn: &mut SqliteConnection) -> Result<Vec<RawRecipeRow>, StoreError> {
    Ok(raw_recipes(conn)?)
}

/// Rows with a non-UUID id, missing or unreadable timestamps, or malformed
/// lists. Never modifies anything.
pub fn find_incomplete_recipes(conn: &mut SqliteConnection) -> Result<Vec<RecipeIssue>, StoreError> {
    let rows = raw_recipes(conn)?;
    let total = rows.len();

    let issues: Vec<RecipeIssue> = rows
        .into_iter()
        .filter_map(|row| {
            let problems = problems(&row);
            if problems.is_empty() {
                return None;
            }
            tracing::debug!(id = %row.id, ?problems, "Recipe needs attention");
            Some(RecipeIssue {
                id: row.id,
                name: row.name,
                problems,
            })
        })
        .collect();

    tracing::info!(total, incomplete = issues.len(), "Recipe check complete");
    Ok(issues)
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::connection::SimpleConnection;
    use diesel::prelude::*;

    fn legacy_conn() -> SqliteConnection {
        let mut conn = SqliteConnection::establish(":memory:").unwrap();
        conn.batch_execute(
            r#"CREATE TABLE recipes (id VARCHAR(36) PRIMARY KEY, name TEXT, ingredients JSON,
                                     instructions JSON, created_at DATETIME, updated_at DATETIME);
               INSERT INTO recipes VALUES ('92db039f-3d82-465a-a8a7-67f63aa8bf71', 'Fine',
                   '["a"]', '["b"]', '2025-06-05 16:02:23', '2025-06-05T16:02:23Z');
               INSERT INTO recipes VALUES ('17', 'Stray', '["a"]', '["b"]', '2025-06-05 16:02:23', NULL);
               INSERT INTO recipes VALUES ('7dfc4e17-5b0c-4e08-8de1-8db9e7321711', 'Odd',
                   'not json', '["b"]', 'soon', 'later');"#,
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_find_incomplete_recipes() {
        let mut conn = legacy_conn();
        let issues = find_incomplete_recipes(&mut conn).unwrap();

        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].id, "17");
        assert_eq!(
            issues[0].problems,
            vec![RecipeProblem::IdNotUuid, RecipeProblem::MissingUpdatedAt]
        );
        assert_eq!(issues[1].name.as_deref(), Some("Odd"));
        assert_eq!(
            issues[1].problems,
            vec![RecipeProblem::UnparsableTimestamp, RecipeProblem::InvalidJson]
        );
    }

    #[test]
    fn test_inspect_returns_all_rows() {
        let mut conn = legacy_conn();
        assert_eq!(inspect_recipes(&mut conn).unwrap().len(), 3);
    }

    #[test]
    fn test_problem_display() {
        assert_eq!(RecipeProblem::MissingCreatedAt.to_string(), "created_at is NULL");
    }
}
