use sea_orm::entity::prelude::*;

/// `movie_id` is the 1-based CSV row position, never generated by the store.
/// `metrics_id` is added to the table after `movie_metrics` exists and is
/// backfilled once the metrics row is inserted.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "movie")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub movie_id: i32,
    pub title: String,
    pub release_year: i32,
    pub duration_minutes: i32,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub certificate_id: Option<i32>,
    pub metrics_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::certificate::Entity",
        from = "Column::CertificateId",
        to = "super::certificate::Column::CertificateId",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Certificate,
    #[sea_orm(
        belongs_to = "super::movie_metrics::Entity",
        from = "Column::MetricsId",
        to = "super::movie_metrics::Column::MetricsId",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    MovieMetrics,
    #[sea_orm(has_many = "super::movie_genre_association::Entity")]
    MovieGenreAssociation,
    #[sea_orm(has_many = "super::movie_worker_association::Entity")]
    MovieWorkerAssociation,
}

impl Related<super::certificate::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Certificate.def()
    }
}

impl Related<super::movie_metrics::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovieMetrics.def()
    }
}

impl Related<super::genre::Entity> for Entity {
    fn to() -> RelationDef {
        super::movie_genre_association::Relation::Genre.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::movie_genre_association::Relation::Movie.def().rev())
    }
}

impl Related<super::worker::Entity> for Entity {
    fn to() -> RelationDef {
        super::movie_worker_association::Relation::Worker.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::movie_worker_association::Relation::Movie.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
