use crate::entities::{certificate, genre, prelude::*, role};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, Set,
};
use std::collections::HashMap;

/// Lookup tables: certificates, genres and roles.
pub struct CatalogRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> CatalogRepository<'a, C> {
    #[must_use]
    pub const fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    // ========================================================================
    // Certificates
    // ========================================================================

    /// Returns the id of the certificate called `name` and whether it was
    /// inserted by this call.
    pub async fn find_or_create_certificate(
        &self,
        name: &str,
        description: &str,
    ) -> Result<(i32, bool), DbErr> {
        let existing = Certificate::find()
            .filter(certificate::Column::Name.eq(name))
            .order_by_asc(certificate::Column::CertificateId)
            .one(self.conn)
            .await?;

        if let Some(model) = existing {
            return Ok((model.certificate_id, false));
        }

        let active_model = certificate::ActiveModel {
            name: Set(name.to_string()),
            description: Set(description.to_string()),
            ..Default::default()
        };

        let res = Certificate::insert(active_model).exec(self.conn).await?;
        Ok((res.last_insert_id, true))
    }

    /// Name to id. The oldest row wins when a name repeats.
    pub async fn certificate_ids(&self) -> Result<HashMap<String, i32>, DbErr> {
        let rows = Certificate::find()
            .order_by_asc(certificate::Column::CertificateId)
            .all(self.conn)
            .await?;

        let mut ids = HashMap::with_capacity(rows.len());
        for row in rows {
            ids.entry(row.name).or_insert(row.certificate_id);
        }
        Ok(ids)
    }

    // ========================================================================
    // Roles
    // ========================================================================

    /// Inserts the role with an explicit id unless a role with that name
    /// already exists. Returns `true` when a row was inserted.
    pub async fn ensure_role(&self, role_id: i32, name: &str) -> Result<bool, DbErr> {
        let existing = Role::find()
            .filter(role::Column::Name.eq(name))
            .one(self.conn)
            .await?;

        if existing.is_some() {
            return Ok(false);
        }

        let active_model = role::ActiveModel {
            role_id: Set(role_id),
            name: Set(name.to_string()),
        };
        Role::insert(active_model)
            .exec_without_returning(self.conn)
            .await?;
        Ok(true)
    }

    // ========================================================================
    // Genres
    // ========================================================================

    pub async fn find_or_create_genre(&self, name: &str) -> Result<(i32, bool), DbErr> {
        let existing = Genre::find()
            .filter(genre::Column::Name.eq(name))
            .order_by_asc(genre::Column::GenreId)
            .one(self.conn)
            .await?;

        if let Some(model) = existing {
            return Ok((model.genre_id, false));
        }

        let active_model = genre::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        };

        let res = Genre::insert(active_model).exec(self.conn).await?;
        Ok((res.last_insert_id, true))
    }

    /// Name to id. The oldest row wins when a name repeats.
    pub async fn genre_ids(&self) -> Result<HashMap<String, i32>, DbErr> {
        let rows = Genre::find()
            .order_by_asc(genre::Column::GenreId)
            .all(self.conn)
            .await?;

        let mut ids = HashMap::with_capacity(rows.len());
        for row in rows {
            ids.entry(row.name).or_insert(row.genre_id);
        }
        Ok(ids)
    }

    /// Distinct genre names, sorted.
    pub async fn genre_names(&self) -> Result<Vec<String>, DbErr> {
        let mut names: Vec<String> = Genre::find()
            .order_by_asc(genre::Column::Name)
            .all(self.conn)
            .await?
            .into_iter()
            .map(|g| g.name)
            .collect();
        names.dedup();
        Ok(names)
    }
}
