//! Store configuration from environment variables.

use std::env;
use std::path::PathBuf;
use thiserror::Error;

/// Default database location, relative to the working directory.
pub const DEFAULT_DB_PATH: &str = "data/meal_planner.db";

/// Default number of pooled connections.
pub const DEFAULT_POOL_SIZE: u32 = 4;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    InvalidEnvVar { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// SQLite database file. `:memory:` is accepted for throwaway databases.
    pub database_path: PathBuf,
    /// Maximum connections held by the pool.
    pub pool_size: u32,
}

impl StoreConfig {
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
            pool_size: DEFAULT_POOL_SIZE,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `MEAL_PLANNER_DB_PATH`: SQLite file (default: "data/meal_planner.db")
    /// - `MEAL_PLANNER_POOL_SIZE`: pool size, at least 1 (default: 4)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_path = lookup("MEAL_PLANNER_DB_PATH")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));

        let pool_size = match lookup("MEAL_PLANNER_POOL_SIZE") {
            Some(value) => match value.trim().parse::<u32>() {
                Ok(size) if size >= 1 => size,
                _ => {
                    return Err(ConfigError::InvalidEnvVar {
                        name: "MEAL_PLANNER_POOL_SIZE",
                        value,
                    })
                }
            },
            None => DEFAULT_POOL_SIZE,
        };

        Ok(Self {
            database_path,
            pool_size,
        })
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == ":memory:"
    }

    /// Connection string handed to Diesel.
    pub fn database_url(&self) -> String {
        self.database_path.to_string_lossy().into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = StoreConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.database_path, PathBuf::from(DEFAULT_DB_PATH));
        assert_eq!(config.pool_size, DEFAULT_POOL_SIZE);
        assert!(!config.is_in_memory());
    }

    #[test]
    fn test_overrides() {
        let config = StoreConfig::from_lookup(lookup(&[
            ("MEAL_PLANNER_DB_PATH", "/data/meal_planner.db"),
            ("MEAL_PLANNER_POOL_SIZE", "8"),
        ]))
        .unwrap();
        assert_eq!(config.database_url(), "/data/meal_planner.db");
        assert_eq!(config.pool_size, 8);
    }

    #[test]
    fn test_invalid_pool_size() {
        let err = StoreConfig::from_lookup(lookup(&[("MEAL_PLANNER_POOL_SIZE", "0")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidEnvVar {
                name: "MEAL_PLANNER_POOL_SIZE",
                ..
            }
        ));
    }

    #[test]
    fn test_in_memory() {
        assert!(StoreConfig::new(":memory:").is_in_memory());
    }
}
