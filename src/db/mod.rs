use anyhow::{Context, Result};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use sea_orm_migration::MigratorTrait;
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::analytics::{
    ActorScore, BuzzwordMatchRow, DirectorAffinity, GenreTrendRow, RevenueMatchRow, TableCount,
    TopGenreRow,
};

/// Handle on the movie store. All work goes through exactly one pooled
/// connection, which also keeps `sqlite::memory:` databases alive.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    /// Opens the database at `db_url`, creating the file and its parent
    /// directory when missing. The schema is not touched.
    pub async fn connect(db_url: &str) -> Result<Self> {
        if let Some(path) = file_path(db_url) {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            if !path.exists() {
                std::fs::File::create(path)
                    .with_context(|| format!("Failed to create {}", path.display()))?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(1)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        let conn = Database::connect(opt)
            .await
            .with_context(|| format!("Failed to connect to {db_url}"))?;

        info!("Database connected: {}", db_url);
        Ok(Self { conn })
    }

    /// Applies every schema step not yet recorded in the store.
    pub async fn initialize_schema(&self) -> Result<()> {
        let pending = migrator::Migrator::get_pending_migrations(&self.conn)
            .await?
            .len();

        migrator::Migrator::up(&self.conn, None)
            .await
            .context("Schema initialization failed")?;

        info!(applied = pending, "Schema initialized");
        Ok(())
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn analytics_repo(&self) -> repositories::analytics::AnalyticsRepository<'_, DatabaseConnection> {
        repositories::analytics::AnalyticsRepository::new(&self.conn)
    }

    fn catalog_repo(&self) -> repositories::catalog::CatalogRepository<'_, DatabaseConnection> {
        repositories::catalog::CatalogRepository::new(&self.conn)
    }

    fn movie_repo(&self) -> repositories::movie::MovieRepository<'_, DatabaseConnection> {
        repositories::movie::MovieRepository::new(&self.conn)
    }

    // ========================================================================
    // Reporting
    // ========================================================================

    pub async fn top_genres_by_year(&self, from_year: i32, to_year: i32) -> Result<Vec<TopGenreRow>> {
        Ok(self.analytics_repo().top_genres_by_year(from_year, to_year).await?)
    }

    pub async fn genre_trend(&self, genre: &str, since_year: i32) -> Result<Vec<GenreTrendRow>> {
        Ok(self.analytics_repo().genre_trend(genre, since_year).await?)
    }

    pub async fn director_affinity(&self) -> Result<Vec<DirectorAffinity>> {
        Ok(self.analytics_repo().director_affinity().await?)
    }

    pub async fn search_by_buzzwords(
        &self,
        terms: &[String],
        limit: u64,
    ) -> Result<Vec<BuzzwordMatchRow>> {
        Ok(self.analytics_repo().search_by_buzzwords(terms, limit).await?)
    }

    pub async fn search_above_average_revenue(&self, term: &str) -> Result<Vec<RevenueMatchRow>> {
        Ok(self.analytics_repo().search_above_average_revenue(term).await?)
    }

    pub async fn counts(&self) -> Result<Vec<TableCount>> {
        Ok(self.analytics_repo().counts().await?)
    }

    pub async fn genre_names(&self) -> Result<Vec<String>> {
        Ok(self.catalog_repo().genre_names().await?)
    }

    pub async fn latest_release_year(&self) -> Result<Option<i32>> {
        Ok(self.movie_repo().latest_release_year().await?)
    }

    pub async fn movie_count(&self) -> Result<u64> {
        Ok(self.movie_repo().count().await?)
    }
}

/// Filesystem path behind a `SQLite` URL, `None` for in-memory databases.
fn file_path(db_url: &str) -> Option<&Path> {
    let rest = db_url
        .strip_prefix("sqlite://")
        .or_else(|| db_url.strip_prefix("sqlite:"))
        .unwrap_or(db_url);
    let path = rest.split('?').next().unwrap_or(rest);

    if path.is_empty() || path.contains(":memory:") || path.starts_with("file::memory:") {
        None
    } else {
        Some(Path::new(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_path_strips_scheme_and_query() {
        assert_eq!(file_path("sqlite:data/moviedb.db"), Some(Path::new("data/moviedb.db")));
        assert_eq!(file_path("sqlite://movies.db?mode=rwc"), Some(Path::new("movies.db")));
    }

    #[test]
    fn test_file_path_skips_memory() {
        assert_eq!(file_path("sqlite::memory:"), None);
        assert_eq!(file_path(":memory:"), None);
    }

    #[tokio::test]
    async fn test_connect_and_ping_memory() {
        let store = Store::connect("sqlite::memory:").await.unwrap();
        store.ping().await.unwrap();
    }
}
