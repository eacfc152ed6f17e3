//! Tests for the server bootstrap, covering readiness signalling and the
//! storage selection.

use super::{ServerConfig, connect_storage, create_server};
use actix_web::web;
use lifelog_backend::inbound::http::health::HealthState;
use lifelog_backend::settings::{AuthSettings, ServerSettings};
use rstest::{fixture, rstest};
use std::net::SocketAddr;
use zeroize::Zeroizing;

#[fixture]
fn health_state() -> web::Data<HealthState> {
    web::Data::new(HealthState::new())
}

#[fixture]
fn auth_settings() -> AuthSettings {
    AuthSettings {
        password_hash: None,
        access_secret: Zeroizing::new("access".to_owned()),
        refresh_secret: Some(Zeroizing::new("refresh".to_owned())),
    }
}

#[fixture]
fn bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 0))
}

#[rstest]
#[actix_rt::test]
async fn create_server_marks_ready(
    health_state: web::Data<HealthState>,
    auth_settings: AuthSettings,
    bind_address: SocketAddr,
) {
    assert!(!health_state.is_ready(), "state should start unready");

    let config = ServerConfig::new(bind_address, auth_settings);
    assert_eq!(config.bind_addr(), bind_address);

    let server = create_server(health_state.clone(), config).expect("server should bind");

    assert!(health_state.is_ready(), "server creation should mark ready");
    server.handle().stop(false).await;
}

#[rstest]
#[actix_rt::test]
async fn no_database_url_keeps_data_in_memory() {
    let settings = ServerSettings {
        bind_addr: None,
        database_url: Some("   ".to_owned()),
        db_max_connections: Some(2),
        db_connect_timeout_secs: None,
    };

    let pool = connect_storage(&settings).await.expect("no storage to prepare");

    assert!(pool.is_none());
}
