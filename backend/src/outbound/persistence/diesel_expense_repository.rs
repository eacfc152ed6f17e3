//! PostgreSQL-backed `ExpenseRepository`.
//!
//! Tag links live in `expense_tags`. Writes lock the linked activity and tags
//! before touching either table.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{ExpenseRepository, RepositoryError};
use crate::domain::{ActivityId, Expense, ExpenseId, NewExpense, Tag, TagId};

use super::error_mapping::{map_diesel_error, map_pool_error, require_row};
use super::links::{LinkedWriteError, lock_activity, lock_tags};
use super::models::{ExpenseRow, ExpenseTagRow, ExpenseValues, TagRow};
use super::pool::DbPool;
use super::schema::{expense_tags, expenses, tags};

/// Diesel implementation of the [`ExpenseRepository`] port.
#[derive(Clone)]
pub struct DieselExpenseRepository {
    pool: DbPool,
}

impl DieselExpenseRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn load_where<F>(&self, filter: F) -> Result<Vec<Expense>, RepositoryError>
    where
        F: FnOnce(
                expenses::BoxedQuery<'static, diesel::pg::Pg>,
            ) -> expenses::BoxedQuery<'static, diesel::pg::Pg>
            + Send,
    {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ExpenseRow> = filter(expenses::table.into_boxed())
            .select(ExpenseRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        with_tags(&mut conn, rows).await.map_err(map_diesel_error)
    }
}

fn link_rows(expense_id: i64, tags: &[Tag]) -> Vec<ExpenseTagRow> {
    tags.iter()
        .map(|tag| ExpenseTagRow {
            expense_id,
            tag_id: tag.id.get(),
        })
        .collect()
}

async fn with_tags(
    conn: &mut AsyncPgConnection,
    rows: Vec<ExpenseRow>,
) -> QueryResult<Vec<Expense>> {
    let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
    let links: Vec<(i64, TagRow)> = expense_tags::table
        .inner_join(tags::table)
        .filter(expense_tags::expense_id.eq_any(ids))
        .order(tags::id.asc())
        .select((expense_tags::expense_id, TagRow::as_select()))
        .load(conn)
        .await?;

    let mut by_expense: HashMap<i64, Vec<Tag>> = HashMap::new();
    for (expense_id, tag) in links {
        by_expense.entry(expense_id).or_default().push(tag.into());
    }
    Ok(rows
        .into_iter()
        .map(|row| {
            let tags = by_expense.remove(&row.id).unwrap_or_default();
            row.into_expense(tags)
        })
        .collect())
}

#[async_trait]
impl ExpenseRepository for DieselExpenseRepository {
    async fn find_by_id(&self, id: ExpenseId) -> Result<Option<Expense>, RepositoryError> {
        let mut found = self
            .load_where(move |query| query.filter(expenses::id.eq(id.get())))
            .await?;
        Ok(found.pop())
    }

    async fn list_since(&self, since: DateTime<Utc>) -> Result<Vec<Expense>, RepositoryError> {
        self.load_where(move |query| query.filter(expenses::spent_at.ge(since)))
            .await
    }

    async fn list_by_tag(&self, tag_id: TagId) -> Result<Vec<Expense>, RepositoryError> {
        let tag = tag_id.get();
        self.load_where(move |query| {
            query.filter(
                expenses::id.eq_any(
                    expense_tags::table
                        .filter(expense_tags::tag_id.eq(tag))
                        .select(expense_tags::expense_id),
                ),
            )
        })
        .await
    }

    async fn list_by_activity(
        &self,
        activity_id: ActivityId,
    ) -> Result<Vec<Expense>, RepositoryError> {
        let activity = activity_id.get();
        self.load_where(move |query| query.filter(expenses::activity_id.eq(activity)))
            .await
    }

    async fn has_tag(&self, tag_id: TagId) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(diesel::dsl::exists(
            expense_tags::table.filter(expense_tags::tag_id.eq(tag_id.get())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn has_activity(&self, activity_id: ActivityId) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(diesel::dsl::exists(
            expenses::table.filter(expenses::activity_id.eq(activity_id.get())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn insert(
        &self,
        expense: &NewExpense,
        tags: &[Tag],
    ) -> Result<Expense, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let values = ExpenseValues::from(expense);
        let tag_ids: Vec<i64> = tags.iter().map(|tag| tag.id.get()).collect();
        let row = conn
            .transaction(|conn| {
                async move {
                    lock_activity(conn, values.activity_id).await?;
                    lock_tags(conn, &tag_ids).await?;
                    let row: ExpenseRow = diesel::insert_into(expenses::table)
                        .values(&values)
                        .returning(ExpenseRow::as_returning())
                        .get_result(conn)
                        .await?;
                    if !tags.is_empty() {
                        diesel::insert_into(expense_tags::table)
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
        Ok(row.into_expense(tags.to_vec()))
    }

    async fn update(&self, expense: &Expense) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = expense.id.get();
        let values = ExpenseValues::from(expense);
        let links = link_rows(id, &expense.tags);
        let affected = conn
            .transaction(|conn| {
                async move {
                    let tag_ids: Vec<i64> = links.iter().map(|link| link.tag_id).collect();
                    lock_activity(conn, values.activity_id).await?;
                    lock_tags(conn, &tag_ids).await?;
                    let affected = diesel::update(expenses::table.find(id))
                        .set(&values)
                        .execute(conn)
                        .await?;
                    diesel::delete(expense_tags::table.filter(expense_tags::expense_id.eq(id)))
                        .execute(conn)
                        .await?;
                    if !links.is_empty() {
                        diesel::insert_into(expense_tags::table)
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
        require_row(affected, "expense", id)
    }

    async fn delete(&self, id: ExpenseId) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(expenses::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn delete_by_activity(&self, activity_id: ActivityId) -> Result<u64, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(
            expenses::table.filter(expenses::activity_id.eq(activity_id.get())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(u64::try_from(removed).unwrap_or(u64::MAX))
    }
}
