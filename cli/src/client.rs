//! Reqwest-backed client for the lifelog REST API.
//!
//! Every entity call carries the cached access token. A `401` triggers one
//! refresh through `POST /auth/refresh` and a single retry. A rejected
//! refresh token means the user has to log in again; any other refresh
//! failure is reported as the server described it.

use std::time::Duration;

use reqwest::{Client, Method, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::api::{AccessToken, ErrorBody, LoginRequest, RefreshRequest};
use crate::token_store::{TokenStore, TokenStoreError, Tokens};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("not logged in; run `lifelog login` first")]
    NotLoggedIn,
    #[error("session expired; run `lifelog login` again")]
    SessionExpired,
    #[error("{message} ({status}, {code})")]
    Api {
        status: StatusCode,
        code: String,
        message: String,
    },
    #[error("invalid endpoint {path}: {source}")]
    Endpoint {
        path: String,
        #[source]
        source: url::ParseError,
    },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Store(#[from] TokenStoreError),
}

/// HTTP client bound to one server and one token cache.
pub struct ApiClient {
    http: Client,
    base: Url,
    store: TokenStore,
}

impl ApiClient {
    /// Build a client for the server at `base`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(mut base: Url, store: TokenStore) -> Result<Self, reqwest::Error> {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { http, base, store })
    }

    /// Exchange the password for a token pair and cache it.
    pub async fn login(&self, password: &str) -> Result<(), ClientError> {
        let response = self
            .http
            .post(self.endpoint("auth/login")?)
            .json(&LoginRequest { password })
            .send()
            .await?;
        let tokens: Tokens = check(response).await?.json().await?;
        self.store.save(&tokens)?;
        Ok(())
    }

    /// Forget the cached tokens. Returns whether any were cached.
    pub fn logout(&self) -> Result<bool, ClientError> {
        Ok(self.store.clear()?)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self.send(Method::GET, path, &[], None).await?;
        Ok(response.json().await?)
    }

    /// `GET path?from=...`, omitting the parameter when `from` is absent.
    pub async fn get_since<T: DeserializeOwned>(
        &self,
        path: &str,
        from: Option<&str>,
    ) -> Result<T, ClientError> {
        let query: Vec<(&str, &str)> = from.map(|from| ("from", from)).into_iter().collect();
        let response = self.send(Method::GET, path, &query, None).await?;
        Ok(response.json().await?)
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let body = serde_json::to_value(body)?;
        let response = self.send(Method::POST, path, &[], Some(&body)).await?;
        Ok(response.json().await?)
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let body = serde_json::to_value(body)?;
        let response = self.send(Method::PUT, path, &[], Some(&body)).await?;
        Ok(response.json().await?)
    }

    /// `DELETE` an endpoint that answers without a body.
    pub async fn delete(&self, path: &str) -> Result<(), ClientError> {
        self.send(Method::DELETE, path, &[], None).await?;
        Ok(())
    }

    /// `DELETE` an endpoint that answers with a JSON body.
    pub async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self.send(Method::DELETE, path, &[], None).await?;
        Ok(response.json().await?)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Response, ClientError> {
        let tokens = self.store.load()?.ok_or(ClientError::NotLoggedIn)?;
        let response = self
            .authorised(method.clone(), path, query, body, &tokens.at)
            .await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return check(response).await;
        }

        debug!(path, "access token rejected; refreshing");
        let at = self.refresh(&tokens.rt).await?;
        let response = self.authorised(method, path, query, body, &at).await?;
        check(response).await
    }

    async fn authorised(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
        access_token: &str,
    ) -> Result<Response, ClientError> {
        let mut request = self
            .http
            .request(method, self.endpoint(path)?)
            .bearer_auth(access_token);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(request.send().await?)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<String, ClientError> {
        let response = self
            .http
            .post(self.endpoint("auth/refresh")?)
            .json(&RefreshRequest {
                refresh: refresh_token,
            })
            .send()
            .await?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::UNPROCESSABLE_ENTITY {
            debug!(%status, "refresh rejected");
            return Err(ClientError::SessionExpired);
        }
        let AccessToken { at } = check(response).await?.json().await?;
        self.store.update_access(at.clone())?;
        Ok(at)
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|source| ClientError::Endpoint {
                path: path.to_owned(),
                source,
            })
    }
}

/// Pass successful responses through and turn the rest into
/// [`ClientError::Api`].
async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let fallback = status.canonical_reason().unwrap_or("request failed");
    let (code, message) = match response.json::<ErrorBody>().await {
        Ok(body) => (body.code, body.message),
        Err(_) => (status.as_str().to_owned(), fallback.to_owned()),
    };
    Err(ClientError::Api {
        status,
        code,
        message,
    })
}
