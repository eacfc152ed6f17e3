//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **memory**: process-local repositories used by tests and `--in-memory`
//!   runs
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **tokens**: HS256 JWT issuing and verification
//! - **password**: bcrypt hash verification
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod memory;
pub mod password;
pub mod persistence;
pub mod tokens;
