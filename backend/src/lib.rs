//! Lifelog backend: domain services, HTTP adapter, storage adapters and
//! start-up settings for a single-user log of tags, activities and
//! expenses.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
