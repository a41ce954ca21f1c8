use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

pub const DATABASE_URL_ENV: &str = "MOVIEDB_DATABASE_URL";
pub const DATASET_PATH_ENV: &str = "MOVIEDB_DATASET";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub store: StoreConfig,

    pub dataset: DatasetConfig,

    pub loader: LoaderConfig,

    pub analytics: AnalyticsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,

    /// Emit log lines as JSON objects instead of the human readable format.
    pub log_json: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// `SQLite` connection URL, e.g. `sqlite:data/moviedb.db` or `sqlite::memory:`.
    pub database_url: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:data/moviedb.db".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub path: PathBuf,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("imdb_movies_dataset_10K.csv"),
        }
    }
}

/// Settings handed to the loader. Role ids are seeded verbatim into the
/// `role` table, so they must stay stable between the load and the queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    pub director_role_id: i32,

    pub actor_role_id: i32,

    /// Stored in `certificate.description`; the dataset carries no text for it.
    pub certificate_description: String,

    /// Rows per multi-row INSERT for workers and associations.
    pub insert_chunk_size: usize,

    /// Skip the populated-store guard. Not persisted; set from `load --force`.
    #[serde(skip)]
    pub force: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            director_role_id: 1,
            actor_role_id: 2,
            certificate_description: "Description placeholder".to_string(),
            insert_chunk_size: 500,
            force: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Last year considered by the year-window views. When unset the newest
    /// `release_year` in the store is used.
    pub latest_year: Option<i32>,

    /// Number of rows shown by the buzzword search.
    pub buzzword_limit: u64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            latest_year: None,
            buzzword_limit: 20,
        }
    }
}

impl Config {
    /// Loads the first config file found, falling back to defaults, then
    /// applies environment overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => {
                info!("Loading config from: {}", path.display());
                Self::load_from_path(path)?
            }
            None => Self::load_from_search_paths()?,
        };

        config.apply_env_overrides();
        Ok(config)
    }

    fn load_from_search_paths() -> Result<Self> {
        for path in &Self::config_paths() {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(DATABASE_URL_ENV) {
            self.store.database_url = url;
        }
        if let Ok(path) = std::env::var(DATASET_PATH_ENV) {
            self.dataset.path = PathBuf::from(path);
        }
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![Self::default_config_path()];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("moviedb").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".moviedb").join("config.toml"));
        }

        paths
    }

    #[must_use]
    pub fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    /// Writes a default config to `path` unless a file is already there.
    /// Returns `true` when a file was written.
    pub fn create_default_if_missing(path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }

        Self::default().save_to_path(path)?;
        info!("Created default config file: {}", path.display());
        Ok(true)
    }

    pub fn validate(&self) -> Result<()> {
        if self.store.database_url.trim().is_empty() {
            anyhow::bail!("store.database_url cannot be empty");
        }

        if self.loader.director_role_id == self.loader.actor_role_id {
            anyhow::bail!(
                "loader.director_role_id and loader.actor_role_id must differ (both are {})",
                self.loader.actor_role_id
            );
        }

        if self.loader.insert_chunk_size == 0 {
            anyhow::bail!("loader.insert_chunk_size must be > 0");
        }

        Ok(())
    }
}
