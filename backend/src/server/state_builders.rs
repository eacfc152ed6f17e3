//! Builders wiring storage adapters, services and secrets into
//! [`HttpState`].

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::info;

use lifelog_backend::domain::ports::{ActivityRepository, ExpenseRepository, TagRepository};
use lifelog_backend::domain::{
    AddingService, AuthService, DeletingService, EditingService, ListingService,
};
use lifelog_backend::inbound::http::state::{HttpState, HttpStatePorts};
use lifelog_backend::outbound::memory::InMemoryStore;
use lifelog_backend::outbound::password::BcryptVerifier;
use lifelog_backend::outbound::persistence::{
    DieselActivityRepository, DieselExpenseRepository, DieselTagRepository,
};
use lifelog_backend::outbound::tokens::JwtTokenService;
use lifelog_backend::settings::AuthSettings;

use super::ServerConfig;

/// Repositories backing every entity service.
struct Repositories<T, A, E> {
    tags: Arc<T>,
    activities: Arc<A>,
    expenses: Arc<E>,
}

/// Build the four entity services over one set of repositories.
fn entity_ports<T, A, E>(
    repos: Repositories<T, A, E>,
    auth: &AuthSettings,
    clock: &Arc<dyn Clock>,
) -> HttpStatePorts
where
    T: TagRepository + 'static,
    A: ActivityRepository + 'static,
    E: ExpenseRepository + 'static,
{
    let Repositories {
        tags,
        activities,
        expenses,
    } = repos;
    HttpStatePorts {
        adding: Arc::new(AddingService::new(
            tags.clone(),
            activities.clone(),
            expenses.clone(),
            clock.clone(),
        )),
        editing: Arc::new(EditingService::new(
            tags.clone(),
            activities.clone(),
            expenses.clone(),
            clock.clone(),
        )),
        deleting: Arc::new(DeletingService::new(
            tags.clone(),
            activities.clone(),
            expenses.clone(),
        )),
        listing: Arc::new(ListingService::new(tags, activities, expenses, clock.clone())),
        auth: Arc::new(AuthService::new(
            Arc::new(BcryptVerifier),
            auth.password_hash.clone(),
        )),
    }
}

fn token_service(auth: &AuthSettings, clock: Arc<dyn Clock>) -> JwtTokenService {
    JwtTokenService::new(
        auth.access_secret.as_bytes(),
        auth.refresh_secret.as_ref().map(|secret| secret.as_bytes()),
        clock,
    )
}

/// Build the shared HTTP state, backed by PostgreSQL when a pool is
/// configured and by memory otherwise.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let ports = match &config.db_pool {
        Some(pool) => {
            info!("storing data in PostgreSQL");
            entity_ports(
                Repositories {
                    tags: Arc::new(DieselTagRepository::new(pool.clone())),
                    activities: Arc::new(DieselActivityRepository::new(pool.clone())),
                    expenses: Arc::new(DieselExpenseRepository::new(pool.clone())),
                },
                &config.auth,
                &clock,
            )
        }
        None => {
            info!("no database configured; storing data in memory");
            let store = Arc::new(InMemoryStore::default());
            entity_ports(
                Repositories {
                    tags: store.clone(),
                    activities: store.clone(),
                    expenses: store,
                },
                &config.auth,
                &clock,
            )
        }
    };
    let tokens = Arc::new(token_service(&config.auth, clock.clone()));
    web::Data::new(HttpState::new(ports, tokens, clock))
}
