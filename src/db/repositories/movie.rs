use crate::entities::{movie, movie_metrics, prelude::*};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect,
    Set, sea_query::Expr,
};

pub struct MovieRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> MovieRepository<'a, C> {
    #[must_use]
    pub const fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn count(&self) -> Result<u64, DbErr> {
        Movie::find().count(self.conn).await
    }

    /// Inserts movies with their explicit ids, `chunk_size` rows per statement.
    pub async fn insert_all(
        &self,
        movies: Vec<movie::ActiveModel>,
        chunk_size: usize,
    ) -> Result<u64, DbErr> {
        let mut inserted = 0;
        for chunk in movies.chunks(chunk_size.max(1)) {
            inserted += Movie::insert_many(chunk.to_vec())
                .exec_without_returning(self.conn)
                .await?;
        }
        Ok(inserted)
    }

    /// Inserts the metrics row for `movie_id` and points the movie at it.
    /// Returns the new `metrics_id`.
    pub async fn insert_metrics(
        &self,
        movie_id: i32,
        rating: Option<f64>,
        votes: Option<i64>,
        metascore: Option<i32>,
        revenue: Option<i64>,
    ) -> Result<i32, DbErr> {
        let active_model = movie_metrics::ActiveModel {
            rating: Set(rating),
            votes: Set(votes),
            metascore: Set(metascore),
            revenue: Set(revenue),
            movie_id: Set(Some(movie_id)),
            ..Default::default()
        };

        let metrics_id = MovieMetrics::insert(active_model)
            .exec(self.conn)
            .await?
            .last_insert_id;

        Movie::update_many()
            .col_expr(movie::Column::MetricsId, Expr::value(metrics_id))
            .filter(movie::Column::MovieId.eq(movie_id))
            .exec(self.conn)
            .await?;

        Ok(metrics_id)
    }

    pub async fn latest_release_year(&self) -> Result<Option<i32>, DbErr> {
        let year = Movie::find()
            .select_only()
            .column_as(movie::Column::ReleaseYear.max(), "year")
            .into_tuple::<Option<i32>>()
            .one(self.conn)
            .await?;
        Ok(year.flatten())
    }
}
