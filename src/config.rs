// ⚙️ Runtime configuration

use std::env;
use std::path::PathBuf;

/// Environment variable overriding the database location
pub const DB_PATH_ENV: &str = "TOWN_SQUARE_DB";

const APP_DIR: &str = "town-square";
const DB_FILE: &str = "town_square.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
}

impl Config {
    /// `$TOWN_SQUARE_DB`, else the platform data directory, else the working directory
    pub fn from_env() -> Self {
        Self::resolve(env::var_os(DB_PATH_ENV).map(PathBuf::from), dirs::data_dir())
    }

    fn resolve(override_path: Option<PathBuf>, data_dir: Option<PathBuf>) -> Self {
        let db_path = override_path
            .filter(|p| !p.as_os_str().is_empty())
            .or_else(|| data_dir.map(|dir| dir.join(APP_DIR).join(DB_FILE)))
            .unwrap_or_else(|| PathBuf::from(DB_FILE));

        Config { db_path }
    }
}
