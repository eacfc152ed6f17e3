//! Error returned by the use-case services.
//!
//! Variants say what went wrong in domain terms. Choosing a transport status
//! is left to the inbound adapter, which also knows which entity the caller
//! was addressing.

use thiserror::Error;

use super::ports::{PasswordVerifierError, Reference, RepositoryError, TokenError};
use super::{ActivityId, ExpenseId, TagId, ValidationError};

/// Minimum accepted password length.
pub const PASSWORD_MIN: usize = 8;
/// Maximum accepted password length.
pub const PASSWORD_MAX: usize = 256;

/// Failure of a driving-port operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LifelogError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("tag {0} not found")]
    TagNotFound(TagId),
    #[error("activity {0} not found")]
    ActivityNotFound(ActivityId),
    #[error("expense {0} not found")]
    ExpenseNotFound(ExpenseId),
    #[error("tag name '{0}' is already taken")]
    DuplicateTagName(String),
    #[error("tag {0} is still used by expenses")]
    TagHasExpenses(TagId),
    #[error("tag {0} is still used by activities")]
    TagHasActivities(TagId),
    #[error("activity {0} still has expenses")]
    ActivityHasExpenses(ActivityId),
    #[error("password must be between {} and {} characters", PASSWORD_MIN, PASSWORD_MAX)]
    PasswordLength,
    #[error("password hash is not configured")]
    HashNotFound,
    #[error("incorrect credentials")]
    IncorrectCredentials,
    #[error("invalid token: {0}")]
    InvalidToken(String),
    #[error("token error: {0}")]
    Token(String),
    #[error("internal error: {0}")]
    Internal(String),
    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for LifelogError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::MissingReference {
                reference: Reference::Tag(id),
            } => Self::TagNotFound(id),
            RepositoryError::MissingReference {
                reference: Reference::Activity(id),
            } => Self::ActivityNotFound(id),
            other => Self::Repository(other),
        }
    }
}

impl From<TokenError> for LifelogError {
    fn from(error: TokenError) -> Self {
        match error {
            TokenError::Invalid { message } => Self::InvalidToken(message),
            other => Self::Token(other.to_string()),
        }
    }
}

impl From<PasswordVerifierError> for LifelogError {
    fn from(error: PasswordVerifierError) -> Self {
        Self::Internal(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(TokenError::invalid("expired"), LifelogError::InvalidToken("expired".into()))]
    #[case(
        TokenError::missing_refresh_secret(),
        LifelogError::Token("refresh token secret is not configured".into())
    )]
    fn token_errors_split_client_and_server_faults(
        #[case] error: TokenError,
        #[case] expected: LifelogError,
    ) {
        assert_eq!(LifelogError::from(error), expected);
    }

    #[rstest]
    #[case(
        RepositoryError::missing_reference(Reference::Tag(TagId::new(3))),
        LifelogError::TagNotFound(TagId::new(3))
    )]
    #[case(
        RepositoryError::missing_reference(Reference::Activity(ActivityId::new(5))),
        LifelogError::ActivityNotFound(ActivityId::new(5))
    )]
    #[case(
        RepositoryError::query("boom"),
        LifelogError::Repository(RepositoryError::query("boom"))
    )]
    fn missing_references_become_not_found(
        #[case] error: RepositoryError,
        #[case] expected: LifelogError,
    ) {
        assert_eq!(LifelogError::from(error), expected);
    }

    #[test]
    fn validation_message_is_passed_through() {
        let error = LifelogError::from(ValidationError::TimeInFuture);
        assert_eq!(error.to_string(), "time must not be in the future");
    }

    #[test]
    fn not_found_names_the_id() {
        assert_eq!(
            LifelogError::TagNotFound(TagId::new(9)).to_string(),
            "tag 9 not found"
        );
    }
}
