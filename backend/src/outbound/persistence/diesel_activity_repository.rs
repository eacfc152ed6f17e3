//! PostgreSQL-backed `ActivityRepository`.
//!
//! Tag links live in `activity_tags`. Writes touching both tables run in one
//! transaction that first locks the linked tags; reads load the activity rows first and then every linked tag
//! in a single join.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{ActivityRepository, RepositoryError};
use crate::domain::{Activity, ActivityId, NewActivity, Tag, TagId};

use super::error_mapping::{map_delete_error, map_diesel_error, map_pool_error, require_row};
use super::links::{LinkedWriteError, lock_tags};
use super::models::{ActivityRow, ActivityTagRow, ActivityValues, TagRow};
use super::pool::DbPool;
use super::schema::{activities, activity_tags, tags};

/// Diesel implementation of the [`ActivityRepository`] port.
#[derive(Clone)]
pub struct DieselActivityRepository {
    pool: DbPool,
}

impl DieselActivityRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn link_rows(activity_id: i64, tags: &[Tag]) -> Vec<ActivityTagRow> {
    tags.iter()
        .map(|tag| ActivityTagRow {
            activity_id,
            tag_id: tag.id.get(),
        })
        .collect()
}

async fn with_tags(
    conn: &mut AsyncPgConnection,
    rows: Vec<ActivityRow>,
) -> QueryResult<Vec<Activity>> {
    let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
    let links: Vec<(i64, TagRow)> = activity_tags::table
        .inner_join(tags::table)
        .filter(activity_tags::activity_id.eq_any(ids))
        .order(tags::id.asc())
        .select((activity_tags::activity_id, TagRow::as_select()))
        .load(conn)
        .await?;

    let mut by_activity: HashMap<i64, Vec<Tag>> = HashMap::new();
    for (activity_id, tag) in links {
        by_activity.entry(activity_id).or_default().push(tag.into());
    }
    Ok(rows
        .into_iter()
        .map(|row| {
            let tags = by_activity.remove(&row.id).unwrap_or_default();
            row.into_activity(tags)
        })
        .collect())
}

#[async_trait]
impl ActivityRepository for DieselActivityRepository {
    async fn find_by_id(&self, id: ActivityId) -> Result<Option<Activity>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ActivityRow> = activities::table
            .find(id.get())
            .select(ActivityRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let Some(row) = row else {
            return Ok(None);
        };
        let mut loaded = with_tags(&mut conn, vec![row])
            .await
            .map_err(map_diesel_error)?;
        Ok(loaded.pop())
    }

    async fn list_since(&self, since: DateTime<Utc>) -> Result<Vec<Activity>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ActivityRow> = activities::table
            .filter(activities::started_at.ge(since))
            .select(ActivityRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        with_tags(&mut conn, rows).await.map_err(map_diesel_error)
    }

    async fn list_by_tag(&self, tag_id: TagId) -> Result<Vec<Activity>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let tagged = activity_tags::table
            .filter(activity_tags::tag_id.eq(tag_id.get()))
            .select(activity_tags::activity_id);
        let rows: Vec<ActivityRow> = activities::table
            .filter(activities::id.eq_any(tagged))
            .select(ActivityRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        with_tags(&mut conn, rows).await.map_err(map_diesel_error)
    }

    async fn has_tag(&self, tag_id: TagId) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(diesel::dsl::exists(
            activity_tags::table.filter(activity_tags::tag_id.eq(tag_id.get())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn insert(
        &self,
        activity: &NewActivity,
        tags: &[Tag],
    ) -> Result<Activity, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let values = ActivityValues::from(activity);
        let tag_ids: Vec<i64> = tags.iter().map(|tag| tag.id.get()).collect();
        let row = conn
            .transaction(|conn| {
                async move {
                    lock_tags(conn, &tag_ids).await?;
                    let row: ActivityRow = diesel::insert_into(activities::table)
                        .values(&values)
                        .returning(ActivityRow::as_returning())
                        .get_result(conn)
                        .await?;
                    if !tags.is_empty() {
                        diesel::insert_into(activity_tags::table)
                            .values(link_rows(row.id, tags))
                            .execute(conn)
                            .await?;
                    }
                    Ok::<_, LinkedWriteError>(row)
                }
                .scope_boxed()
            })
            .await
            .map_err(RepositoryError::from)?;
        Ok(row.into_activity(tags.to_vec()))
    }

    async fn update(&self, activity: &Activity) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = activity.id.get();
        let values = ActivityValues::from(activity);
        let links = link_rows(id, &activity.tags);
        let affected = conn
            .transaction(|conn| {
                async move {
                    let tag_ids: Vec<i64> = links.iter().map(|link| link.tag_id).collect();
                    lock_tags(conn, &tag_ids).await?;
                    let affected = diesel::update(activities::table.find(id))
                        .set(&values)
                        .execute(conn)
                        .await?;
                    diesel::delete(activity_tags::table.filter(activity_tags::activity_id.eq(id)))
                        .execute(conn)
                        .await?;
                    if !links.is_empty() {
                        diesel::insert_into(activity_tags::table)
                            .values(&links)
                            .execute(conn)
                            .await?;
                    }
                    Ok::<_, LinkedWriteError>(affected)
                }
                .scope_boxed()
            })
            .await
            .map_err(RepositoryError::from)?;
        require_row(affected, "activity", id)
    }

    async fn delete(&self, id: ActivityId) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(activities::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_delete_error)
    }
}
