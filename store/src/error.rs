use meal_planner_core::RecipeError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum MigrationError {
    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("Revision {revision} cannot be downgraded: it would lose data integrity")]
    Irreversible { revision: &'static str },

    #[error("Unknown revision: {0}")]
    UnknownRevision(String),

    #[error("Invalid revision graph: {0}")]
    InvalidGraph(String),

    #[error("Invalid migration target: {0}")]
    InvalidTarget(String),

    #[error("Unexpected data in {table}: {reason}")]
    Corrupt { table: &'static str, reason: String },
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("Failed to connect to {url}: {source}")]
    Connection {
        url: String,
        #[source]
        source: diesel::ConnectionError,
    },

    #[error("Connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    #[error("Migration failed: {0}")]
    Migration(#[from] MigrationError),

    #[error("Database file not found at {}", .0.display())]
    MissingDatabase(std::path::PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Recipe not found: {0}")]
    RecipeNotFound(Uuid),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Invalid recipe: {0}")]
    Invalid(#[from] RecipeError),

    #[error("Failed to encode recipe field: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Malformed row {id}: {reason}")]
    BadRow { id: String, reason: String },
}
