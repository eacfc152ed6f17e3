//! Domain ports defining the edges of the hexagon.
//!
//! Driven ports (`*Repository`, [`TokenService`], [`PasswordVerifier`])
//! describe what the domain needs from storage and crypto adapters. Driving
//! ports ([`Adding`], [`Editing`], [`Deleting`], [`Listing`],
//! [`Authenticator`]) are what inbound adapters call.

mod macros;
pub(crate) use macros::define_port_error;

mod activity_repository;
mod adding;
mod authenticator;
mod deleting;
mod editing;
mod expense_repository;
mod listing;
mod password_verifier;
mod repository_error;
mod tag_repository;
mod token_service;

#[cfg(test)]
pub use activity_repository::MockActivityRepository;
pub use activity_repository::ActivityRepository;
#[cfg(test)]
pub use adding::MockAdding;
pub use adding::Adding;
#[cfg(test)]
pub use authenticator::MockAuthenticator;
pub use authenticator::Authenticator;
#[cfg(test)]
pub use deleting::MockDeleting;
pub use deleting::Deleting;
#[cfg(test)]
pub use editing::MockEditing;
pub use editing::Editing;
#[cfg(test)]
pub use expense_repository::MockExpenseRepository;
pub use expense_repository::ExpenseRepository;
#[cfg(test)]
pub use listing::MockListing;
pub use listing::Listing;
#[cfg(test)]
pub use password_verifier::MockPasswordVerifier;
pub use password_verifier::{PasswordVerifier, PasswordVerifierError};
pub use repository_error::{Reference, Referrer, RepositoryError};
#[cfg(test)]
pub use tag_repository::MockTagRepository;
pub use tag_repository::TagRepository;
#[cfg(test)]
pub use token_service::MockTokenService;
pub use token_service::{TokenError, TokenPair, TokenService};
