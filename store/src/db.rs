use std::fs;
use std::path::Path;

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection};

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::migrations::RevisionGraph;

pub type DbPool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

/// Settings applied to every new connection.
const CONNECTION_PRAGMAS: &str = "PRAGMA busy_timeout = 5000;";

#[derive(Debug, Clone, Copy)]
struct SqlitePragmas;

impl CustomizeConnection<SqliteConnection, r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
        conn.batch_execute(CONNECTION_PRAGMAS)
            .map_err(r2d2::Error::QueryError)
    }
}

fn ensure_parent_dir(path: &Path) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Open a single connection, creating the database file if needed.
pub fn establish(config: &StoreConfig) -> Result<SqliteConnection, StoreError> {
    if !config.is_in_memory() {
        ensure_parent_dir(&config.database_path)?;
    }

    let url = config.database_url();
    let mut conn = SqliteConnection::establish(&url)
        .map_err(|source| StoreError::Connection { url, source })?;
    conn.batch_execute(CONNECTION_PRAGMAS)?;

    Ok(conn)
}

/// Open a single connection to a database that must already exist.
pub fn establish_existing(config: &StoreConfig) -> Result<SqliteConnection, StoreError> {
    if !config.is_in_memory() && !config.database_path.exists() {
        return Err(StoreError::MissingDatabase(config.database_path.clone()));
    }
    establish(config)
}

/// Build a connection pool and bring the schema up to the head revision.
pub fn create_pool(config: &StoreConfig) -> Result<DbPool, StoreError> {
    if !config.is_in_memory() {
        ensure_parent_dir(&config.database_path)?;
    }

    // Each in-memory connection is its own database, so share just one.
    let max_size = if config.is_in_memory() {
        1
    } else {
        config.pool_size
    };

    let manager = ConnectionManager::<SqliteConnection>::new(config.database_url());
    let pool = r2d2::Pool::builder()
        .max_size(max_size)
        .connection_customizer(Box::new(SqlitePragmas))
        .build(manager)?;

    // Run pending migrations on startup
    let mut conn = pool.get()?;
    let applied = RevisionGraph::standard()?.upgrade_head(&mut conn)?;
    if !applied.is_empty() {
        tracing::info!(count = applied.len(), "Applied pending migrations");
    }

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw_sql::table_exists;

    #[test]
    fn test_create_pool_migrates_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::new(dir.path().join("nested").join("meal_planner.db"));

        let pool = create_pool(&config).unwrap();
        let mut conn = pool.get().unwrap();
        assert!(table_exists(&mut conn, "recipes").unwrap());
        assert_eq!(
            RevisionGraph::standard().unwrap().current(&mut conn).unwrap(),
            Some("9548ad40c2e4")
        );
        assert!(config.database_path.exists());
    }

    #[test]
    fn test_establish_existing_requires_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::new(dir.path().join("missing.db"));
        assert!(matches!(
            establish_existing(&config),
            Err(StoreError::MissingDatabase(_))
        ));
        assert!(!config.database_path.exists());
    }
}
