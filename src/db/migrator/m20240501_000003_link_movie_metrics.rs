use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// sea-query cannot add a foreign key to an existing SQLite table, and SQLite
// has no `ADD COLUMN IF NOT EXISTS`, so this statement fails if repeated.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                "ALTER TABLE movie ADD COLUMN metrics_id INTEGER \
                 REFERENCES movie_metrics(metrics_id)",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, _manager: &SchemaManager) -> Result<(), DbErr> {
        Err(DbErr::Migration(
            "movie.metrics_id is a foreign key column and cannot be dropped in place".to_string(),
        ))
    }
}
