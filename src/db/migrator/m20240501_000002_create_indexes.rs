use sea_orm_migration::prelude::*;
use tracing::{info, warn};

#[derive(DeriveMigrationName)]
pub struct Migration;

/// B-tree indexes: (name, table, columns).
const INDEXES: &[(&str, &str, &[&str])] = &[
    ("idx_movie_release_year", "movie", &["release_year"]),
    ("idx_metascore", "movie_metrics", &["metascore"]),
    ("idx_genre_name", "genre", &["name"]),
    ("idx_role_name", "role", &["name"]),
    ("idx_worker_name_role", "worker", &["full_name", "role_id"]),
];

/// Full-text index over `movie.description`, kept in sync by triggers.
const FULL_TEXT: &[(&str, &str)] = &[
    (
        "movie_fts",
        "CREATE VIRTUAL TABLE IF NOT EXISTS movie_fts \
         USING fts5(description, content='movie', content_rowid='movie_id')",
    ),
    (
        "movie_fts_ai",
        "CREATE TRIGGER IF NOT EXISTS movie_fts_ai AFTER INSERT ON movie BEGIN \
           INSERT INTO movie_fts(rowid, description) VALUES (new.movie_id, new.description); \
         END",
    ),
    (
        "movie_fts_ad",
        "CREATE TRIGGER IF NOT EXISTS movie_fts_ad AFTER DELETE ON movie BEGIN \
           INSERT INTO movie_fts(movie_fts, rowid, description) \
           VALUES ('delete', old.movie_id, old.description); \
         END",
    ),
    (
        "movie_fts_au",
        "CREATE TRIGGER IF NOT EXISTS movie_fts_au AFTER UPDATE OF description ON movie BEGIN \
           INSERT INTO movie_fts(movie_fts, rowid, description) \
           VALUES ('delete', old.movie_id, old.description); \
           INSERT INTO movie_fts(rowid, description) VALUES (new.movie_id, new.description); \
         END",
    ),
    (
        "movie_fts_rebuild",
        "INSERT INTO movie_fts(movie_fts) VALUES ('rebuild')",
    ),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut failed = 0usize;

        for (name, table, columns) in INDEXES {
            let mut index = Index::create();
            index.name(*name).table(Alias::new(*table)).if_not_exists();
            for column in *columns {
                index.col(Alias::new(*column));
            }

            if let Err(e) = manager.create_index(index.to_owned()).await {
                warn!(index = name, error = %e, "Failed to create index");
                failed += 1;
            }
        }

        let db = manager.get_connection();
        for (name, sql) in FULL_TEXT {
            if let Err(e) = db.execute_unprepared(sql).await {
                warn!(object = name, error = %e, "Failed to create full-text object");
                failed += 1;
            }
        }

        if failed == 0 {
            info!("Indexes created");
        } else {
            warn!(failed, "Some indexes could not be created");
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        for trigger in ["movie_fts_au", "movie_fts_ad", "movie_fts_ai"] {
            db.execute_unprepared(&format!("DROP TRIGGER IF EXISTS {trigger}"))
                .await?;
        }
        db.execute_unprepared("DROP TABLE IF EXISTS movie_fts")
            .await?;

        for (name, _, _) in INDEXES {
            db.execute_unprepared(&format!("DROP INDEX IF EXISTS {name}"))
                .await?;
        }

        Ok(())
    }
}
