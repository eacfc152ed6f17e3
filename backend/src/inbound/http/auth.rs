//! Login and token refresh handlers.
//!
//! ```text
//! POST /auth/login {"password":"..."}
//! POST /auth/refresh {"refresh":"..."}
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use zeroize::Zeroizing;

use crate::domain::LifelogError;
use crate::domain::ports::TokenPair;
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::{Group, map_service_error};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, require};

/// Login request body.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub password: Option<String>,
}

/// Access and refresh tokens issued on login.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenPairResponse {
    /// Access token, valid for 15 minutes.
    pub at: String,
    /// Refresh token, valid for 8 hours.
    pub rt: String,
}

impl From<TokenPair> for TokenPairResponse {
    fn from(value: TokenPair) -> Self {
        Self {
            at: value.at,
            rt: value.rt,
        }
    }
}

/// Refresh request body.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh: Option<String>,
}

/// Fresh access token.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenResponse {
    pub at: String,
}

/// Check the password and issue a token pair.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = TokenPairResponse),
        (status = 400, description = "Password length out of range", body = ErrorSchema),
        (status = 401, description = "Incorrect password", body = ErrorSchema),
        (status = 500, description = "Authentication is not configured", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<TokenPairResponse>> {
    let password = Zeroizing::new(require(
        payload.into_inner().password,
        FieldName::new("password"),
    )?);
    state
        .auth
        .authenticate(&password)
        .await
        .map_err(|err| map_service_error(err, Group::Auth))?;
    let pair = state
        .tokens
        .issue_pair()
        .map_err(|err| map_service_error(LifelogError::from(err), Group::Auth))?;
    info!("login succeeded");
    Ok(web::Json(pair.into()))
}

/// Exchange a refresh token for a new access token.
#[utoipa::path(
    post,
    path = "/auth/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New access token", body = AccessTokenResponse),
        (status = 400, description = "Missing refresh token", body = ErrorSchema),
        (status = 422, description = "Refresh token invalid or expired", body = ErrorSchema),
        (status = 500, description = "Refresh is not configured", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "refresh",
    security([])
)]
#[post("/auth/refresh")]
pub async fn refresh(
    state: web::Data<HttpState>,
    payload: web::Json<RefreshRequest>,
) -> ApiResult<web::Json<AccessTokenResponse>> {
    let token = Zeroizing::new(require(
        payload.into_inner().refresh,
        FieldName::new("refresh"),
    )?);
    let access = state
        .tokens
        .refresh(&token)
        .map_err(|err| map_service_error(LifelogError::from(err), Group::Auth))?;
    Ok(web::Json(AccessTokenResponse {
        at: access.as_str().to_owned(),
    }))
}
