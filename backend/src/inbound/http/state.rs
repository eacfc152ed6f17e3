//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and depend only on the driving
//! ports, so they stay testable without a database.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{Adding, Authenticator, Deleting, Editing, Listing, TokenService};

/// Parameter object bundling the use-case ports.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub adding: Arc<dyn Adding>,
    pub editing: Arc<dyn Editing>,
    pub deleting: Arc<dyn Deleting>,
    pub listing: Arc<dyn Listing>,
    pub auth: Arc<dyn Authenticator>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub adding: Arc<dyn Adding>,
    pub editing: Arc<dyn Editing>,
    pub deleting: Arc<dyn Deleting>,
    pub listing: Arc<dyn Listing>,
    pub auth: Arc<dyn Authenticator>,
    pub tokens: Arc<dyn TokenService>,
    /// Source of "now" for the default listing window.
    pub clock: Arc<dyn Clock>,
}

impl HttpState {
    /// Construct state from the use-case ports, the token issuer and a clock.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use lifelog_backend::domain::{
    ///     AddingService, AuthService, DeletingService, EditingService, ListingService,
    /// };
    /// use lifelog_backend::inbound::http::state::{HttpState, HttpStatePorts};
    /// use lifelog_backend::outbound::memory::InMemoryStore;
    /// use lifelog_backend::outbound::password::BcryptVerifier;
    /// use lifelog_backend::outbound::tokens::JwtTokenService;
    /// use mockable::{Clock, DefaultClock};
    ///
    /// let store = Arc::new(InMemoryStore::default());
    /// let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    /// let ports = HttpStatePorts {
    ///     adding: Arc::new(AddingService::new(
    ///         store.clone(), store.clone(), store.clone(), clock.clone(),
    ///     )),
    ///     editing: Arc::new(EditingService::new(
    ///         store.clone(), store.clone(), store.clone(), clock.clone(),
    ///     )),
    ///     deleting: Arc::new(DeletingService::new(store.clone(), store.clone(), store.clone())),
    ///     listing: Arc::new(ListingService::new(
    ///         store.clone(), store.clone(), store, clock.clone(),
    ///     )),
    ///     auth: Arc::new(AuthService::new(Arc::new(BcryptVerifier), None)),
    /// };
    /// let tokens = Arc::new(JwtTokenService::new(b"access", None, clock.clone()));
    /// let state = HttpState::new(ports, tokens, clock);
    /// let _listing = state.listing.clone();
    /// ```
    pub fn new(ports: HttpStatePorts, tokens: Arc<dyn TokenService>, clock: Arc<dyn Clock>) -> Self {
        let HttpStatePorts {
            adding,
            editing,
            deleting,
            listing,
            auth,
        } = ports;
        Self {
            adding,
            editing,
            deleting,
            listing,
            auth,
            tokens,
            clock,
        }
    }
}
