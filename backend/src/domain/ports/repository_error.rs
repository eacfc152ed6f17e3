//! Error shared by the entity repository ports.
//!
//! Besides plain infrastructure failures, adapters report the integrity
//! rules they enforce themselves: unique tag names and the links between
//! tags, activities and expenses. Services turn those back into domain
//! errors, so a rule lost to a race still surfaces as the right failure.

use std::fmt;

use crate::domain::{ActivityId, TagId};

use super::define_port_error;

/// Row a write pointed at that the store does not hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    Tag(TagId),
    Activity(ActivityId),
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag(id) => write!(f, "tag {id}"),
            Self::Activity(id) => write!(f, "activity {id}"),
        }
    }
}

/// Table whose rows still point at a row being deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Referrer {
    Activities,
    Expenses,
}

impl fmt::Display for Referrer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Activities => "activities",
            Self::Expenses => "expenses",
        })
    }
}

define_port_error! {
    /// Errors raised by tag, activity, and expense repository adapters.
    pub enum RepositoryError {
        /// Storage connection could not be established or was lost.
        Connection { message: String } =>
            "repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "repository query failed: {message}",
        /// A unique column already holds the value.
        Duplicate { message: String } =>
            "repository rejected duplicate: {message}",
        /// The write links to a row that does not exist.
        MissingReference { reference: Reference } =>
            "referenced {reference} does not exist",
        /// The row cannot go while other rows link to it.
        StillReferenced { by: Referrer } =>
            "row is still referenced by {by}",
    }
}
