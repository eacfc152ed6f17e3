//! Reference checks shared by the adding, editing and deleting services.
//!
//! The lookups here give early, precise errors. Stores enforce the same rules
//! again at write time; the `*_conflict` helpers translate those rejections.

use std::collections::BTreeSet;

use super::ports::{ActivityRepository, Referrer, RepositoryError, TagRepository};
use super::{ActivityId, LifelogError, Tag, TagId};

/// Resolve tag ids to stored tags, deduplicated and in ascending id order.
///
/// Fails with the first id, in ascending order, that has no stored tag.
pub(crate) async fn resolve_tags<T>(tags: &T, ids: &[TagId]) -> Result<Vec<Tag>, LifelogError>
where
    T: TagRepository + ?Sized,
{
    let unique: BTreeSet<TagId> = ids.iter().copied().collect();
    let mut resolved = Vec::with_capacity(unique.len());
    for id in unique {
        let tag = tags
            .find_by_id(id)
            .await?
            .ok_or(LifelogError::TagNotFound(id))?;
        resolved.push(tag);
    }
    Ok(resolved)
}

/// Fail with `ActivityNotFound` unless the activity is stored.
pub(crate) async fn ensure_activity<A>(activities: &A, id: ActivityId) -> Result<(), LifelogError>
where
    A: ActivityRepository + ?Sized,
{
    match activities.find_by_id(id).await? {
        Some(_) => Ok(()),
        None => Err(LifelogError::ActivityNotFound(id)),
    }
}

/// Fail with `TagNotFound` unless the tag is stored.
pub(crate) async fn ensure_tag<T>(tags: &T, id: TagId) -> Result<Tag, LifelogError>
where
    T: TagRepository + ?Sized,
{
    tags.find_by_id(id)
        .await?
        .ok_or(LifelogError::TagNotFound(id))
}

/// Translate a rejected tag write, reporting a unique violation as a
/// duplicate `name`.
pub(crate) fn tag_name_conflict(error: RepositoryError, name: &str) -> LifelogError {
    match error {
        RepositoryError::Duplicate { .. } => LifelogError::DuplicateTagName(name.to_owned()),
        other => other.into(),
    }
}

/// Translate a rejected tag delete into the matching has-X error.
pub(crate) fn tag_delete_conflict(error: RepositoryError, id: TagId) -> LifelogError {
    match error {
        RepositoryError::StillReferenced {
            by: Referrer::Expenses,
        } => LifelogError::TagHasExpenses(id),
        RepositoryError::StillReferenced {
            by: Referrer::Activities,
        } => LifelogError::TagHasActivities(id),
        other => other.into(),
    }
}

/// Translate a rejected activity delete into `ActivityHasExpenses`.
pub(crate) fn activity_delete_conflict(error: RepositoryError, id: ActivityId) -> LifelogError {
    match error {
        RepositoryError::StillReferenced { .. } => LifelogError::ActivityHasExpenses(id),
        other => other.into(),
    }
}
