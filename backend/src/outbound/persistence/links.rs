//! Reference checks run inside write transactions.
//!
//! Referenced rows are read `FOR KEY SHARE`, so a concurrent delete of the
//! same tag or activity waits for the write to commit and then trips the
//! foreign key instead of leaving a dangling link.

use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{Reference, RepositoryError};
use crate::domain::{ActivityId, TagId};

use super::error_mapping::map_diesel_error;
use super::schema::{activities, tags};

/// Failure of a transaction that links to other rows.
#[derive(Debug)]
pub(crate) enum LinkedWriteError {
    Diesel(diesel::result::Error),
    Missing(Reference),
}

impl From<diesel::result::Error> for LinkedWriteError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

impl From<LinkedWriteError> for RepositoryError {
    fn from(error: LinkedWriteError) -> Self {
        match error {
            LinkedWriteError::Diesel(inner) => map_diesel_error(inner),
            LinkedWriteError::Missing(reference) => Self::missing_reference(reference),
        }
    }
}

/// First requested id, in the given order, absent from `found`.
fn first_missing(requested: &[i64], found: &[i64]) -> Option<i64> {
    requested.iter().copied().find(|id| !found.contains(id))
}

/// Lock every tag in `ids`, failing with the first one that is not stored.
pub(crate) async fn lock_tags(
    conn: &mut AsyncPgConnection,
    ids: &[i64],
) -> Result<(), LinkedWriteError> {
    if ids.is_empty() {
        return Ok(());
    }
    let found: Vec<i64> = tags::table
        .filter(tags::id.eq_any(ids))
        .select(tags::id)
        .for_key_share()
        .load(conn)
        .await?;
    match first_missing(ids, &found) {
        Some(id) => Err(LinkedWriteError::Missing(Reference::Tag(TagId::new(id)))),
        None => Ok(()),
    }
}

/// Lock the linked activity, if any, failing when it is not stored.
pub(crate) async fn lock_activity(
    conn: &mut AsyncPgConnection,
    id: Option<i64>,
) -> Result<(), LinkedWriteError> {
    let Some(id) = id else {
        return Ok(());
    };
    let found: Vec<i64> = activities::table
        .filter(activities::id.eq(id))
        .select(activities::id)
        .for_key_share()
        .load(conn)
        .await?;
    match first_missing(&[id], &found) {
        Some(id) => Err(LinkedWriteError::Missing(Reference::Activity(
            ActivityId::new(id),
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&[1, 2, 3], &[3, 1, 2], None)]
    #[case(&[4, 2, 9], &[2], Some(4))]
    #[case(&[2, 9], &[2], Some(9))]
    fn first_missing_follows_request_order(
        #[case] requested: &[i64],
        #[case] found: &[i64],
        #[case] expected: Option<i64>,
    ) {
        assert_eq!(first_missing(requested, found), expected);
    }

    #[test]
    fn missing_links_become_missing_references() {
        let error: RepositoryError =
            LinkedWriteError::Missing(Reference::Tag(TagId::new(6))).into();
        assert_eq!(
            error,
            RepositoryError::missing_reference(Reference::Tag(TagId::new(6)))
        );
        let error: RepositoryError =
            LinkedWriteError::Diesel(diesel::result::Error::NotFound).into();
        assert_eq!(error, RepositoryError::query("record not found"));
    }
}
