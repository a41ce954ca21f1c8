use crate::entities::{prelude::*, worker};
use sea_orm::{ConnectionTrait, DbErr, EntityTrait, QueryOrder, Set};
use std::collections::HashMap;

pub struct WorkerRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> WorkerRepository<'a, C> {
    #[must_use]
    pub const fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Inserts `(full_name, role_id)` pairs as they are given.
    pub async fn insert_all(
        &self,
        workers: &[(String, i32)],
        chunk_size: usize,
    ) -> Result<u64, DbErr> {
        let mut inserted = 0;
        for chunk in workers.chunks(chunk_size.max(1)) {
            let models = chunk.iter().map(|(name, role_id)| worker::ActiveModel {
                full_name: Set(name.clone()),
                role_id: Set(*role_id),
                ..Default::default()
            });
            inserted += Worker::insert_many(models)
                .exec_without_returning(self.conn)
                .await?;
        }
        Ok(inserted)
    }

    /// `(full_name, role_id)` to `worker_id`. The oldest row wins.
    pub async fn ids_by_name_and_role(&self) -> Result<HashMap<(String, i32), i32>, DbErr> {
        let rows = Worker::find()
            .order_by_asc(worker::Column::WorkerId)
            .all(self.conn)
            .await?;

        let mut ids = HashMap::with_capacity(rows.len());
        for row in rows {
            ids.entry((row.full_name, row.role_id))
                .or_insert(row.worker_id);
        }
        Ok(ids)
    }
}
