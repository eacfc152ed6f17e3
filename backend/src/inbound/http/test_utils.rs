//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use serde_json::Value;
use zeroize::Zeroizing;

use crate::domain::service_test_helpers::fixture_clock;
use crate::domain::{AddingService, AuthService, DeletingService, EditingService, ListingService};
use crate::domain::ports::TokenService;
use crate::inbound::http::configure;
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::InMemoryStore;
use crate::outbound::password::BcryptVerifier;
use crate::outbound::tokens::JwtTokenService;

pub(crate) const TEST_PASSWORD: &str = "correct horse";
const ACCESS_SECRET: &[u8] = b"test-access-secret";
const REFRESH_SECRET: &[u8] = b"test-refresh-secret";

pub(crate) fn token_service() -> JwtTokenService {
    JwtTokenService::new(ACCESS_SECRET, Some(REFRESH_SECRET), fixture_clock())
}

pub(crate) fn access_header() -> String {
    let pair = token_service().issue_pair().expect("issue tokens");
    format!("Bearer {}", pair.at)
}

pub(crate) fn refresh_token() -> String {
    token_service().issue_pair().expect("issue tokens").rt
}

/// State wired to real services over a fresh in-memory store. The login
/// password is [`TEST_PASSWORD`] and "now" is the fixture clock.
pub(crate) fn memory_state() -> HttpState {
    let store = Arc::new(InMemoryStore::default());
    let clock = fixture_clock();
    let hash = bcrypt::hash(TEST_PASSWORD, 4).expect("hash test password");
    let ports = HttpStatePorts {
        adding: Arc::new(AddingService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            clock.clone(),
        )),
        editing: Arc::new(EditingService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            clock.clone(),
        )),
        deleting: Arc::new(DeletingService::new(
            store.clone(),
            store.clone(),
            store.clone(),
        )),
        listing: Arc::new(ListingService::new(
            store.clone(),
            store.clone(),
            store,
            clock.clone(),
        )),
        auth: Arc::new(AuthService::new(
            Arc::new(BcryptVerifier),
            Some(Zeroizing::new(hash)),
        )),
    };
    HttpState::new(ports, Arc::new(token_service()), clock)
}

/// Full application over `state`, routed exactly like the server.
pub(crate) fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .configure(configure)
}

/// Send `request` with a valid access token to a fresh app over `state`.
/// Apps built from clones of one state share its store.
pub(crate) async fn send(state: &HttpState, request: TestRequest) -> (StatusCode, Value) {
    let app = test::init_service(test_app(state.clone())).await;
    let request = request
        .insert_header((AUTHORIZATION, access_header()))
        .to_request();
    let response = test::call_service(&app, request).await;
    let status = response.status();
    let body = test::read_body(response).await;
    let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, value)
}

/// Id field of a created entity.
pub(crate) fn id_of(body: &Value) -> i64 {
    body.get("id").and_then(Value::as_i64).expect("id in body")
}
