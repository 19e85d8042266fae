//! End-to-end tests of the revision chain on real SQLite databases.

use std::collections::HashSet;

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use meal_planner_store::migrations::revisions::{
    AddTimestamps, ConvertRecipeIdToUuid, CreateUsersTable, FixUuidColumnTypes,
};
use meal_planner_store::raw_sql::{all_ids, integer_ids, table_columns, table_exists};
use meal_planner_store::{list_recipes, MigrationError, RevisionGraph};
use uuid::Uuid;

const HEAD: &str = "9548ad40c2e4";

fn empty_db() -> SqliteConnection {
    SqliteConnection::establish(":memory:").unwrap()
}

fn columns(conn: &mut SqliteConnection, table: &str) -> Vec<String> {
    table_columns(conn, table)
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect()
}

#[test]
fn test_full_upgrade_reaches_final_schema() {
    let graph = RevisionGraph::standard().unwrap();
    let mut conn = empty_db();

    let applied = graph.upgrade_head(&mut conn).unwrap();
    assert_eq!(applied.len(), 11);
    assert_eq!(graph.current(&mut conn).unwrap(), Some(HEAD));
    assert!(graph.pending(&mut conn).unwrap().is_empty());

    assert_eq!(
        columns(&mut conn, "recipes"),
        vec![
            "id",
            "name",
            "ingredients",
            "instructions",
            "created_at",
            "updated_at",
            "makes_min",
            "makes_max",
            "makes_unit",
        ]
    );
    assert_eq!(
        columns(&mut conn, "users"),
        vec!["id", "username", "created_at", "updated_at"]
    );
    assert!(!table_exists(&mut conn, "recipes_new").unwrap());
    assert!(!table_exists(&mut conn, "users_new").unwrap());
}

#[test]
fn test_legacy_integer_rows_end_up_with_unique_uuids() {
    let graph = RevisionGraph::standard().unwrap();
    let mut conn = empty_db();

    graph.upgrade_to(&mut conn, AddTimestamps::ID).unwrap();
    for name in ["Toast", "Tea", "Eggs", "Soup", "Stew"] {
        conn.batch_execute(&format!(
            r#"INSERT INTO recipes (name, ingredients, instructions) VALUES ('{name}', '["x"]', '["y"]')"#
        ))
        .unwrap();
    }

    graph.upgrade_head(&mut conn).unwrap();

    let ids: Vec<String> = all_ids(&mut conn, "recipes")
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids.len(), 5);
    assert_eq!(ids.iter().collect::<HashSet<_>>().len(), 5);
    for id in &ids {
        assert_eq!(Uuid::parse_str(id).unwrap().hyphenated().to_string(), *id);
    }
    assert!(integer_ids(&mut conn, "recipes").unwrap().is_empty());

    // Rows added without timestamps are readable after the chain.
    let recipes = list_recipes(&mut conn).unwrap();
    assert_eq!(recipes.len(), 5);
}

#[test]
fn test_downgrade_from_head_is_refused() {
    let graph = RevisionGraph::standard().unwrap();
    let mut conn = empty_db();
    graph.upgrade_head(&mut conn).unwrap();

    let err = graph.downgrade_base(&mut conn).unwrap_err();
    assert!(matches!(err, MigrationError::Irreversible { revision } if revision == HEAD));
    assert_eq!(graph.current(&mut conn).unwrap(), Some(HEAD));
}

#[test]
fn test_reversible_prefix_round_trips_to_empty() {
    let graph = RevisionGraph::standard().unwrap();
    let mut conn = empty_db();

    graph.upgrade_to(&mut conn, FixUuidColumnTypes::ID).unwrap();
    conn.batch_execute(
        r#"INSERT INTO recipes (id, name, ingredients, instructions, makes_min, makes_unit)
           VALUES ('92db039f-3d82-465a-a8a7-67f63aa8bf71', 'Cookies', '["flour"]', '["bake"]', 24, 'cookies')"#,
    )
    .unwrap();

    let reverted = graph.downgrade_to(&mut conn, Some(CreateUsersTable::ID)).unwrap();
    assert_eq!(
        reverted,
        vec![
            "07760d4f0aad",
            "merge_heads_20250621",
            "b7c6e000a7e5",
            "47bdb0e75fe9",
            "3a4b5c6d7e8f",
        ]
    );
    // Integer keys again, renumbered.
    let ids: Vec<String> = all_ids(&mut conn, "recipes")
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, vec!["1"]);
    assert!(!columns(&mut conn, "recipes").contains(&"makes_min".to_string()));

    graph.downgrade_base(&mut conn).unwrap();
    assert_eq!(graph.current(&mut conn).unwrap(), None);
    assert!(!table_exists(&mut conn, "recipes").unwrap());
    assert!(!table_exists(&mut conn, "users").unwrap());

    // And back up again.
    graph.upgrade_head(&mut conn).unwrap();
    assert_eq!(graph.current(&mut conn).unwrap(), Some(HEAD));
}

#[test]
fn test_upgrade_in_steps_matches_single_upgrade() {
    let graph = RevisionGraph::standard().unwrap();
    let mut stepped = empty_db();
    for id in graph.ids() {
        assert_eq!(graph.upgrade_to(&mut stepped, id).unwrap(), vec![id]);
    }

    let mut direct = empty_db();
    graph.upgrade_head(&mut direct).unwrap();

    for table in ["recipes", "users"] {
        assert_eq!(
            table_columns(&mut stepped, table).unwrap(),
            table_columns(&mut direct, table).unwrap()
        );
    }
}

#[test]
fn test_history_and_pending() {
    let graph = RevisionGraph::standard().unwrap();
    let mut conn = empty_db();

    let history = graph.history();
    assert_eq!(history.first().map(|m| m.id), Some("1c2c47357c10"));
    assert_eq!(history[6].parents, &["3a4b5c6d7e8f", "b7c6e000a7e5"]);

    graph.upgrade_to(&mut conn, ConvertRecipeIdToUuid::ID).unwrap();
    let pending: Vec<_> = graph
        .pending(&mut conn)
        .unwrap()
        .into_iter()
        .map(|m| m.id)
        .collect();
    assert_eq!(pending.first(), Some(&"47bdb0e75fe9"));
    assert_eq!(pending.last(), Some(&HEAD));
    assert_eq!(pending.len(), 7);
}
