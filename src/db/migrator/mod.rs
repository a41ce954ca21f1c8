//! Schema initializer.
//!
//! The steps run in order and are recorded by the migrator, so a second
//! `init-db` skips what is already applied. Table creation is strict; index
//! creation is best-effort; the `movie.metrics_id` link is unguarded and must
//! only ever run once per database.

use sea_orm_migration::prelude::*;

mod m20240501_000001_create_tables;
mod m20240501_000002_create_indexes;
mod m20240501_000003_link_movie_metrics;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240501_000001_create_tables::Migration),
            Box::new(m20240501_000002_create_indexes::Migration),
            Box::new(m20240501_000003_link_movie_metrics::Migration),
        ]
    }
}
