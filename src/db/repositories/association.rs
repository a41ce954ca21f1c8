use crate::entities::{movie_genre_association, movie_worker_association, prelude::*};
use sea_orm::{ConnectionTrait, DbErr, EntityTrait, Set};

/// Movie-genre and movie-worker join rows.
pub struct AssociationRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> AssociationRepository<'a, C> {
    #[must_use]
    pub const fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn insert_genre_links(
        &self,
        links: &[(i32, i32)],
        chunk_size: usize,
    ) -> Result<u64, DbErr> {
        let mut inserted = 0;
        for chunk in links.chunks(chunk_size.max(1)) {
            let models = chunk
                .iter()
                .map(|(movie_id, genre_id)| movie_genre_association::ActiveModel {
                    movie_id: Set(*movie_id),
                    genre_id: Set(*genre_id),
                });
            inserted += MovieGenreAssociation::insert_many(models)
                .exec_without_returning(self.conn)
                .await?;
        }
        Ok(inserted)
    }

    pub async fn insert_worker_links(
        &self,
        links: &[(i32, i32)],
        chunk_size: usize,
    ) -> Result<u64, DbErr> {
        let mut inserted = 0;
        for chunk in links.chunks(chunk_size.max(1)) {
            let models = chunk
                .iter()
                .map(|(movie_id, worker_id)| movie_worker_association::ActiveModel {
                    movie_id: Set(*movie_id),
                    worker_id: Set(*worker_id),
                });
            inserted += MovieWorkerAssociation::insert_many(models)
                .exec_without_returning(self.conn)
                .await?;
        }
        Ok(inserted)
    }
}
