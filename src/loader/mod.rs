//! CSV-to-relational loader.
//!
//! The dataset is written in eight ordered passes. Each pass runs in its own
//! transaction: a failing pass is rolled back and recorded, and the next pass
//! still runs against whatever earlier passes committed.

use crate::config::LoaderConfig;
use crate::dataset::{Dataset, ListCell, ListLiteralError, MovieRow};
use crate::db::Store;
use crate::db::repositories::{
    association::AssociationRepository, catalog::CatalogRepository, movie::MovieRepository,
    worker::WorkerRepository,
};
use crate::entities::movie;
use sea_orm::{DatabaseConnection, DatabaseTransaction, DbErr, Set, TransactionTrait};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;
use tracing::{debug, error, info};

const PROGRESS_EVERY: usize = 1000;

pub const DIRECTOR_ROLE: &str = "director";
pub const ACTOR_ROLE: &str = "actor";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Movie {movie_id}: malformed {column} list: {source}")]
    MalformedList {
        movie_id: i32,
        column: &'static str,
        #[source]
        source: ListLiteralError,
    },

    #[error("Movie {movie_id}: missing {column}")]
    MissingValue { movie_id: i32, column: &'static str },

    #[error("Unknown genre: {name}")]
    UnknownGenre { name: String },

    #[error("Store already holds {movies} movies; use --force to load anyway")]
    AlreadyLoaded { movies: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Certificates,
    Roles,
    Genres,
    Movies,
    MovieMetrics,
    Workers,
    MovieGenreAssociations,
    MovieWorkerAssociations,
}

impl Pass {
    pub const ALL: [Self; 8] = [
        Self::Certificates,
        Self::Roles,
        Self::Genres,
        Self::Movies,
        Self::MovieMetrics,
        Self::Workers,
        Self::MovieGenreAssociations,
        Self::MovieWorkerAssociations,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Certificates => "certificates",
            Self::Roles => "roles",
            Self::Genres => "genres",
            Self::Movies => "movies",
            Self::MovieMetrics => "movie_metrics",
            Self::Workers => "workers",
            Self::MovieGenreAssociations => "movie_genre_associations",
            Self::MovieWorkerAssociations => "movie_worker_associations",
        }
    }
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassOutcome {
    Committed { rows: u64 },
    RolledBack { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassReport {
    pub pass: Pass,
    pub outcome: PassOutcome,
}

impl PassReport {
    #[must_use]
    pub const fn committed(&self) -> bool {
        matches!(self.outcome, PassOutcome::Committed { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub passes: Vec<PassReport>,
}

impl LoadReport {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.passes.len() == Pass::ALL.len() && self.passes.iter().all(PassReport::committed)
    }

    #[must_use]
    pub fn get(&self, pass: Pass) -> Option<&PassReport> {
        self.passes.iter().find(|p| p.pass == pass)
    }

    pub fn rolled_back(&self) -> impl Iterator<Item = &PassReport> {
        self.passes.iter().filter(|p| !p.committed())
    }
}

pub struct Loader {
    conn: DatabaseConnection,
    config: LoaderConfig,
}

impl Loader {
    #[must_use]
    pub fn new(store: &Store, config: LoaderConfig) -> Self {
        Self {
            conn: store.conn.clone(),
            config,
        }
    }

    /// Runs all passes in order.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::AlreadyLoaded`] when the store already holds
    /// movies and `force` is off. Per-pass failures do not surface here;
    /// they are recorded in the returned [`LoadReport`].
    pub async fn run(&self, dataset: &Dataset) -> Result<LoadReport, LoadError> {
        if !self.config.force {
            let movies = MovieRepository::new(&self.conn).count().await?;
            if movies > 0 {
                return Err(LoadError::AlreadyLoaded { movies });
            }
        }

        info!(rows = dataset.len(), force = self.config.force, "Starting load");

        let mut report = LoadReport::default();
        for pass in Pass::ALL {
            info!(%pass, "Pass started");
            let outcome = match self.conn.begin().await {
                Ok(txn) => {
                    let outcome = self.run_pass(pass, &txn, dataset).await;
                    settle(txn, pass, outcome).await
                }
                Err(e) => {
                    error!(%pass, error = %e, "Pass could not open a transaction");
                    PassOutcome::RolledBack {
                        error: e.to_string(),
                    }
                }
            };
            report.passes.push(PassReport { pass, outcome });
        }

        info!(complete = report.is_complete(), "Load finished");
        Ok(report)
    }

    async fn run_pass(
        &self,
        pass: Pass,
        txn: &DatabaseTransaction,
        dataset: &Dataset,
    ) -> Result<u64, LoadError> {
        match pass {
            Pass::Certificates => self.load_certificates(txn, dataset).await,
            Pass::Roles => self.load_roles(txn).await,
            Pass::Genres => load_genres(txn, dataset).await,
            Pass::Movies => self.load_movies(txn, dataset).await,
            Pass::MovieMetrics => load_metrics(txn, dataset).await,
            Pass::Workers => self.load_workers(txn, dataset).await,
            Pass::MovieGenreAssociations => self.load_genre_links(txn, dataset).await,
            Pass::MovieWorkerAssociations => self.load_worker_links(txn, dataset).await,
        }
    }

    // ========================================================================
    // Lookup tables
    // ========================================================================

    async fn load_certificates(
        &self,
        txn: &DatabaseTransaction,
        dataset: &Dataset,
    ) -> Result<u64, LoadError> {
        let repo = CatalogRepository::new(txn);
        let mut seen = HashSet::new();
        let mut inserted = 0;

        for row in dataset.rows() {
            let Some(name) = row.certification() else {
                continue;
            };
            if !seen.insert(name) {
                continue;
            }

            let (_, created) = repo
                .find_or_create_certificate(name, &self.config.certificate_description)
                .await?;
            if created {
                inserted += 1;
            }
        }

        Ok(inserted)
    }

    async fn load_roles(&self, txn: &DatabaseTransaction) -> Result<u64, LoadError> {
        let repo = CatalogRepository::new(txn);
        let mut inserted = 0;

        for (role_id, name) in [
            (self.config.director_role_id, DIRECTOR_ROLE),
            (self.config.actor_role_id, ACTOR_ROLE),
        ] {
            if repo.ensure_role(role_id, name).await? {
                inserted += 1;
            }
        }

        Ok(inserted)
    }

    // ========================================================================
    // Movies
    // ========================================================================

    async fn load_movies(
        &self,
        txn: &DatabaseTransaction,
        dataset: &Dataset,
    ) -> Result<u64, LoadError> {
        let certificates = CatalogRepository::new(txn).certificate_ids().await?;

        let mut models = Vec::with_capacity(dataset.len());
        for (movie_id, row) in dataset.iter_with_ids() {
            let release_year = row.release_year.ok_or(LoadError::MissingValue {
                movie_id,
                column: "release year",
            })?;
            let duration_minutes = row.duration_minutes.ok_or(LoadError::MissingValue {
                movie_id,
                column: "run time",
            })?;

            models.push(movie::ActiveModel {
                movie_id: Set(movie_id),
                title: Set(row.title.clone()),
                release_year: Set(release_year),
                duration_minutes: Set(duration_minutes),
                description: Set(row.description()),
                certificate_id: Set(row
                    .certification()
                    .and_then(|name| certificates.get(name).copied())),
                metrics_id: Set(None),
            });
        }

        Ok(MovieRepository::new(txn)
            .insert_all(models, self.config.insert_chunk_size)
            .await?)
    }

    // ========================================================================
    // Workers
    // ========================================================================

    async fn load_workers(
        &self,
        txn: &DatabaseTransaction,
        dataset: &Dataset,
    ) -> Result<u64, LoadError> {
        let mut seen = HashSet::new();
        let mut workers = Vec::new();

        let credits: [(&'static str, i32, fn(&MovieRow) -> &ListCell); 2] = [
            ("director", self.config.director_role_id, directors_of),
            ("stars", self.config.actor_role_id, stars_of),
        ];

        // all directors first, then all stars
        for (column, role_id, cell_of) in credits {
            for (movie_id, row) in dataset.iter_with_ids() {
                let names = cell_of(row).names().map_err(|source| LoadError::MalformedList {
                    movie_id,
                    column,
                    source,
                })?;

                for name in names {
                    if seen.insert((name.clone(), role_id)) {
                        workers.push((name, role_id));
                    }
                }
            }
        }

        debug!(workers = workers.len(), "Distinct workers collected");
        Ok(WorkerRepository::new(txn)
            .insert_all(&workers, self.config.insert_chunk_size)
            .await?)
    }

    // ========================================================================
    // Associations
    // ========================================================================

    async fn load_genre_links(
        &self,
        txn: &DatabaseTransaction,
        dataset: &Dataset,
    ) -> Result<u64, LoadError> {
        let genres = CatalogRepository::new(txn).genre_ids().await?;
        let mut links = Vec::new();

        for (movie_id, row) in dataset.iter_with_ids() {
            let names = row
                .genres
                .names()
                .map_err(|source| LoadError::MalformedList {
                    movie_id,
                    column: "genre",
                    source,
                })?;

            let mut linked = HashSet::new();
            for name in names {
                let genre_id = *genres
                    .get(&name)
                    .ok_or(LoadError::UnknownGenre { name })?;
                if linked.insert(genre_id) {
                    links.push((movie_id, genre_id));
                }
            }
        }

        Ok(AssociationRepository::new(txn)
            .insert_genre_links(&links, self.config.insert_chunk_size)
            .await?)
    }

    async fn load_worker_links(
        &self,
        txn: &DatabaseTransaction,
        dataset: &Dataset,
    ) -> Result<u64, LoadError> {
        let workers = WorkerRepository::new(txn).ids_by_name_and_role().await?;
        let mut links = Vec::new();
        let mut skipped = 0usize;

        for (index, (movie_id, row)) in dataset.iter_with_ids().enumerate() {
            let directors = row
                .directors
                .names()
                .map_err(|source| LoadError::MalformedList {
                    movie_id,
                    column: "director",
                    source,
                })?;
            let stars = row.stars.names().map_err(|source| LoadError::MalformedList {
                movie_id,
                column: "stars",
                source,
            })?;

            let credits = directors
                .into_iter()
                .map(|name| (name, self.config.director_role_id))
                .chain(stars.into_iter().map(|name| (name, self.config.actor_role_id)));

            let mut linked = HashSet::new();
            for key in credits {
                match workers.get(&key) {
                    Some(&worker_id) => {
                        if linked.insert(worker_id) {
                            links.push((movie_id, worker_id));
                        }
                    }
                    None => {
                        debug!(movie_id, name = %key.0, role_id = key.1, "No matching worker, skipped");
                        skipped += 1;
                    }
                }
            }

            if (index + 1) % PROGRESS_EVERY == 0 {
                debug!(rows = index + 1, links = links.len(), "Worker associations progress");
            }
        }

        if skipped > 0 {
            debug!(skipped, "Credits without a matching worker");
        }

        Ok(AssociationRepository::new(txn)
            .insert_worker_links(&links, self.config.insert_chunk_size)
            .await?)
    }
}

fn directors_of(row: &MovieRow) -> &ListCell {
    &row.directors
}

fn stars_of(row: &MovieRow) -> &ListCell {
    &row.stars
}

async fn load_genres(txn: &DatabaseTransaction, dataset: &Dataset) -> Result<u64, LoadError> {
    let repo = CatalogRepository::new(txn);
    let mut seen = HashSet::new();
    let mut inserted = 0;

    for (movie_id, row) in dataset.iter_with_ids() {
        let names = row
            .genres
            .names()
            .map_err(|source| LoadError::MalformedList {
                movie_id,
                column: "genre",
                source,
            })?;

        for name in names {
            if !seen.insert(name.clone()) {
                continue;
            }
            let (_, created) = repo.find_or_create_genre(&name).await?;
            if created {
                inserted += 1;
            }
        }
    }

    Ok(inserted)
}

async fn load_metrics(txn: &DatabaseTransaction, dataset: &Dataset) -> Result<u64, LoadError> {
    let repo = MovieRepository::new(txn);
    let mut inserted = 0;

    for (index, (movie_id, row)) in dataset.iter_with_ids().enumerate() {
        repo.insert_metrics(movie_id, row.rating, row.votes, row.metascore(), row.revenue())
            .await?;
        inserted += 1;

        if (index + 1) % PROGRESS_EVERY == 0 {
            debug!(rows = index + 1, "Movie metrics progress");
        }
    }

    Ok(inserted)
}

/// Commits or rolls back the pass transaction according to its outcome.
async fn settle(
    txn: DatabaseTransaction,
    pass: Pass,
    outcome: Result<u64, LoadError>,
) -> PassOutcome {
    match outcome {
        Ok(rows) => match txn.commit().await {
            Ok(()) => {
                info!(%pass, rows, "Pass committed");
                PassOutcome::Committed { rows }
            }
            Err(e) => {
                error!(%pass, error = %e, "Pass commit failed");
                PassOutcome::RolledBack {
                    error: e.to_string(),
                }
            }
        },
        Err(e) => {
            error!(%pass, error = %e, "Pass failed, rolling back");
            // A transaction that fails to roll back is discarded on drop.
            if let Err(rollback) = txn.rollback().await {
                error!(%pass, error = %rollback, "Pass rollback failed");
            }
            PassOutcome::RolledBack {
                error: e.to_string(),
            }
        }
    }
}
