use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Certificate::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Certificate::CertificateId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Certificate::Name).string().not_null())
                    .col(ColumnDef::new(Certificate::Description).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Genre::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Genre::GenreId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Genre::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        // role ids are seeded explicitly by the loader
        manager
            .create_table(
                Table::create()
                    .table(Role::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Role::RoleId)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Role::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Worker::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Worker::WorkerId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Worker::FullName).string().not_null())
                    .col(ColumnDef::new(Worker::RoleId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_worker_role_id")
                            .from(Worker::Table, Worker::RoleId)
                            .to(Role::Table, Role::RoleId),
                    )
                    .to_owned(),
            )
            .await?;

        // metrics_id is added by the link step once movie_metrics exists
        manager
            .create_table(
                Table::create()
                    .table(Movie::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Movie::MovieId)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Movie::Title).string().not_null())
                    .col(ColumnDef::new(Movie::ReleaseYear).integer().not_null())
                    .col(
                        ColumnDef::new(Movie::DurationMinutes)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Movie::Description).text().null())
                    .col(ColumnDef::new(Movie::CertificateId).integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_certificate_id")
                            .from(Movie::Table, Movie::CertificateId)
                            .to(Certificate::Table, Certificate::CertificateId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MovieMetrics::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MovieMetrics::MetricsId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MovieMetrics::Rating)
                            .double()
                            .check(Expr::col(MovieMetrics::Rating).between(0, 10)),
                    )
                    .col(ColumnDef::new(MovieMetrics::Votes).big_integer())
                    .col(
                        ColumnDef::new(MovieMetrics::Metascore)
                            .integer()
                            .null()
                            .check(Expr::col(MovieMetrics::Metascore).between(0, 100)),
                    )
                    .col(ColumnDef::new(MovieMetrics::Revenue).big_integer().null())
                    .col(ColumnDef::new(MovieMetrics::MovieId).integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_metrics_movie_id")
                            .from(MovieMetrics::Table, MovieMetrics::MovieId)
                            .to(Movie::Table, Movie::MovieId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MovieWorkerAssociation::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MovieWorkerAssociation::MovieId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MovieWorkerAssociation::WorkerId)
                            .integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(MovieWorkerAssociation::MovieId)
                            .col(MovieWorkerAssociation::WorkerId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_worker_association_movie_id")
                            .from(MovieWorkerAssociation::Table, MovieWorkerAssociation::MovieId)
                            .to(Movie::Table, Movie::MovieId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_worker_association_worker_id")
                            .from(
                                MovieWorkerAssociation::Table,
                                MovieWorkerAssociation::WorkerId,
                            )
                            .to(Worker::Table, Worker::WorkerId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MovieGenreAssociation::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MovieGenreAssociation::MovieId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MovieGenreAssociation::GenreId)
                            .integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(MovieGenreAssociation::MovieId)
                            .col(MovieGenreAssociation::GenreId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_genre_association_movie_id")
                            .from(MovieGenreAssociation::Table, MovieGenreAssociation::MovieId)
                            .to(Movie::Table, Movie::MovieId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_genre_association_genre_id")
                            .from(MovieGenreAssociation::Table, MovieGenreAssociation::GenreId)
                            .to(Genre::Table, Genre::GenreId),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MovieGenreAssociation::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MovieWorkerAssociation::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MovieMetrics::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Movie::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Worker::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Role::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Genre::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Certificate::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Certificate {
    Table,
    CertificateId,
    Name,
    Description,
}

#[derive(DeriveIden)]
enum Genre {
    Table,
    GenreId,
    Name,
}

#[derive(DeriveIden)]
enum Role {
    Table,
    RoleId,
    Name,
}

#[derive(DeriveIden)]
enum Worker {
    Table,
    WorkerId,
    FullName,
    RoleId,
}

#[derive(DeriveIden)]
enum Movie {
    Table,
    MovieId,
    Title,
    ReleaseYear,
    DurationMinutes,
    Description,
    CertificateId,
}

#[derive(DeriveIden)]
enum MovieMetrics {
    Table,
    MetricsId,
    Rating,
    Votes,
    Metascore,
    Revenue,
    MovieId,
}

#[derive(DeriveIden)]
enum MovieWorkerAssociation {
    Table,
    MovieId,
    WorkerId,
}

#[derive(DeriveIden)]
enum MovieGenreAssociation {
    Table,
    MovieId,
    GenreId,
}
