//! SQLite persistence for the meal planner: schema migrations, recipe and
//! user storage, and maintenance checks.

pub mod config;
pub mod db;
pub mod error;
pub mod maintenance;
pub mod migrations;
pub mod models;
pub mod raw_sql;
pub mod recipes;
pub mod schema;
pub mod users;

pub use config::{ConfigError, StoreConfig};
pub use db::{create_pool, establish, establish_existing, DbPool};
pub use error::{MigrationError, StoreError};
pub use maintenance::{find_incomplete_recipes, inspect_recipes, RecipeIssue, RecipeProblem};
pub use migrations::{RepairReport, Revision, RevisionGraph, RevisionMetadata};
pub use recipes::{
    create_recipe, delete_all_recipes, delete_recipe, get_recipe, list_recipes, update_recipe,
};
pub use users::{get_user, get_user_by_username};
