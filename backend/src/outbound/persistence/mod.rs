//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations translate between Diesel rows and domain
//! types and hold no business rules. Row structs (`models.rs`) and the table
//! definitions (`schema.rs`) never leave this module.
//!
//! # Example
//!
//! ```ignore
//! use lifelog_backend::outbound::persistence::{DbPool, DieselTagRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/lifelog")).await?;
//! let tags = DieselTagRepository::new(pool);
//! ```

mod diesel_activity_repository;
mod diesel_expense_repository;
mod diesel_tag_repository;
mod error_mapping;
mod links;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_activity_repository::DieselActivityRepository;
pub use diesel_expense_repository::DieselExpenseRepository;
pub use diesel_tag_repository::DieselTagRepository;
pub use migrations::{MigrationError, run_pending as run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
