//! HTTP inbound adapter exposing REST endpoints.
//!
//! [`configure`] registers every route on an Actix `ServiceConfig`, so the
//! server and the handler tests route requests identically.

pub mod activities;
pub mod auth;
pub mod bearer;
pub mod dto;
pub mod error;
pub mod expenses;
pub mod health;
pub mod schemas;
pub mod state;
pub mod tags;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

use actix_web::web;
use tracing::debug;

use crate::domain::Error;

pub use error::ApiResult;

/// Register the JSON body and query string policies and every API route.
///
/// Readiness (`/health/ready`) is registered by the server because it needs
/// the server-owned [`health::HealthState`].
pub fn configure(cfg: &mut web::ServiceConfig) {
    let json = web::JsonConfig::default().error_handler(|err, _req| {
        debug!(error = %err, "rejected request body");
        Error::invalid_request(format!("malformed JSON body: {err}")).into()
    });
    let query = web::QueryConfig::default().error_handler(|err, _req| {
        debug!(error = %err, "rejected query string");
        Error::invalid_request(format!("malformed query string: {err}")).into()
    });

    cfg.app_data(json)
        .app_data(query)
        .service(health::health_check)
        .service(auth::login)
        .service(auth::refresh)
        .service(tags::list_tags)
        .service(tags::create_tag)
        .service(tags::update_tag)
        .service(tags::delete_tag)
        .service(tags::tag_expenses)
        .service(tags::tag_activities)
        .service(activities::list_activities)
        .service(activities::get_activity)
        .service(activities::create_activity)
        .service(activities::update_activity)
        .service(activities::delete_activity)
        .service(activities::activity_expenses)
        .service(activities::clear_activity_expenses)
        .service(expenses::list_expenses)
        .service(expenses::get_expense)
        .service(expenses::create_expense)
        .service(expenses::update_expense)
        .service(expenses::delete_expense);
}
