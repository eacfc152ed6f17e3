//! PostgreSQL-backed `TagRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{RepositoryError, TagRepository};
use crate::domain::{NewTag, Tag, TagId};

use super::error_mapping::{map_delete_error, map_diesel_error, map_pool_error, require_row};
use super::models::{TagRow, TagValues};
use super::pool::DbPool;
use super::schema::tags;

/// Diesel implementation of the [`TagRepository`] port.
#[derive(Clone)]
pub struct DieselTagRepository {
    pool: DbPool,
}

impl DieselTagRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TagRepository for DieselTagRepository {
    async fn find_by_id(&self, id: TagId) -> Result<Option<Tag>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<TagRow> = tags::table
            .find(id.get())
            .select(TagRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Tag::from))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Tag>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<TagRow> = tags::table
            .filter(tags::name.eq(name))
            .select(TagRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Tag::from))
    }

    async fn list(&self) -> Result<Vec<Tag>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TagRow> = tags::table
            .select(TagRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Tag::from).collect())
    }

    async fn insert(&self, tag: &NewTag) -> Result<Tag, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: TagRow = diesel::insert_into(tags::table)
            .values(TagValues { name: &tag.name })
            .returning(TagRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(row.into())
    }

    async fn update(&self, tag: &Tag) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let affected = diesel::update(tags::table.find(tag.id.get()))
            .set(TagValues { name: &tag.name })
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        require_row(affected, "tag", tag.id.get())
    }

    async fn delete(&self, id: TagId) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(tags::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_delete_error)
    }
}
