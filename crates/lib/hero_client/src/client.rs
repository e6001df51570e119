// @zen-component: AUTH-ApiClient
//
//! HTTP client for the Hero backend.
//!
//! Every request runs the same pipeline:
//! 1. Attach `Authorization: Bearer <token>` unless the path is an auth
//!    endpoint (login and refresh authenticate by other means)
//! 2. On success, capture an opportunistically rotated token from the
//!    `Authorization` response header, then decode the envelope
//! 3. On the first 401, coordinate a single refresh through the gate and
//!    replay the request once with the new token
//! 4. A second 401, a non-401 failure, or any transport error is final

use reqwest::{Method, StatusCode, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::{ClientConfig, LOGIN_PATH, REFRESH_PATH};
use crate::error::{ClientError, ClientResult, error_from_response};
use crate::refresh::RefreshGate;
use crate::store::TokenStore;
use crate::types::{ApiEnvelope, LoginRequest, LoginResponse};

/// HTTP client bound to a [`TokenStore`]. Clones share the transport, the
/// store and the refresh gate.
#[derive(Clone)]
pub struct ApiClient {
    config: ClientConfig,
    http: reqwest::Client,
    store: TokenStore,
    gate: RefreshGate,
}

impl ApiClient {
    /// Build a client over the store's transport, so both share one cookie
    /// jar (the refresh cookie earned at login must travel with the refresh
    /// calls this client triggers).
    pub fn new(store: &TokenStore) -> Self {
        Self {
            config: store.config().clone(),
            http: store.transport().clone(),
            store: store.clone(),
            gate: RefreshGate::new(),
        }
    }

    /// The store this client authenticates through.
    pub fn store(&self) -> &TokenStore {
        &self.store
    }

    // @zen-impl: AUTH-1_AC-1, AUTH-1_AC-2
    /// Credential login.
    ///
    /// On success the server hands the access token back in the
    /// `Authorization` response header (some deployments use
    /// `data.accessToken` in the body instead; both are honored, header
    /// first) and plants the HttpOnly refresh cookie in the shared jar.
    /// A 401 here is a credential failure — it surfaces as
    /// [`ClientError::Api`] and, by design, never touches the refresh path.
    pub async fn login(&self, account: &str, password: &str) -> ClientResult<LoginResponse> {
        let url = self.config.endpoint_url(LOGIN_PATH);
        let response = self
            .http
            .post(&url)
            .json(&LoginRequest { account, password })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let mut token_seen = self.capture_rotated_token(&response).await;
        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ClientError::BadResponse(format!("invalid login response: {e}")))?;

        if !token_seen
            && let Some(token) = body.pointer("/data/accessToken").and_then(|v| v.as_str())
        {
            self.store.login(token).await;
            token_seen = true;
        }

        if !token_seen {
            return Err(ClientError::BadResponse(
                "login response did not include an access token".into(),
            ));
        }
        if !self.store.is_authenticated().await {
            return Err(ClientError::BadResponse(
                "login access token could not be decoded".into(),
            ));
        }

        serde_json::from_value(body)
            .map_err(|e| ClientError::BadResponse(format!("invalid login response: {e}")))
    }

    /// GET an endpoint and unwrap the envelope's data.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.request::<(), T>(Method::GET, path, None).await?.into_data()
    }

    /// POST a JSON body and unwrap the envelope's data.
    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.request(Method::POST, path, Some(body)).await?.into_data()
    }

    /// PUT a JSON body and unwrap the envelope's data.
    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.request(Method::PUT, path, Some(body)).await?.into_data()
    }

    /// POST to an endpoint that acknowledges without payload.
    pub async fn post_unit<B: Serialize>(&self, path: &str, body: Option<&B>) -> ClientResult<()> {
        self.request::<B, serde_json::Value>(Method::POST, path, body)
            .await?;
        Ok(())
    }

    /// DELETE an endpoint; any envelope payload is ignored.
    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        self.request::<(), serde_json::Value>(Method::DELETE, path, None)
            .await?;
        Ok(())
    }

    // @zen-impl: AUTH-2_AC-1, AUTH-6_AC-1, AUTH-6_AC-2
    /// Run a request through the full pipeline, returning the whole
    /// envelope.
    ///
    /// The body is serialized once up front so a replay sends exactly the
    /// same bytes.
    pub async fn request<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ClientResult<ApiEnvelope<T>> {
        let payload = match body {
            Some(body) => Some(serde_json::to_value(body)?),
            None => None,
        };
        let url = self.config.endpoint_url(path);
        // @zen-impl: AUTH-2_AC-2 — login/refresh authenticate by other means
        let exempt = is_auth_endpoint(path);
        let mut bearer = if exempt {
            None
        } else {
            self.store.access_token().await
        };
        let mut retried = false;

        loop {
            let response = self
                .send_once(method.clone(), &url, payload.as_ref(), bearer.as_deref())
                .await?;
            let status = response.status();

            if status.is_success() {
                return self.read_envelope(response).await;
            }
            // Auth endpoints never refresh: a login 401 is a credential
            // failure and a refresh 401 must not recurse. One replay per
            // request, then the failure stands.
            if exempt || status != StatusCode::UNAUTHORIZED || retried {
                return Err(error_from_response(response).await);
            }

            debug!(path, "request unauthorized; coordinating token refresh");
            retried = true;
            let token = self.gate.refreshed_token(&self.store).await?;
            bearer = Some(token);
        }
    }

    async fn send_once(
        &self,
        method: Method,
        url: &str,
        payload: Option<&serde_json::Value>,
        bearer: Option<&str>,
    ) -> Result<reqwest::Response, reqwest::Error> {
        let mut request = self.http.request(method, url);
        if let Some(payload) = payload {
            request = request.json(payload);
        }
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        request.send().await
    }

    /// Decode a success response: rotation capture first (headers survive
    /// body consumption, the other way round does not), then the envelope.
    async fn read_envelope<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> ClientResult<ApiEnvelope<T>> {
        self.capture_rotated_token(&response).await;
        let status = response.status();
        let envelope: ApiEnvelope<T> = response
            .json()
            .await
            .map_err(|e| ClientError::BadResponse(format!("invalid response body: {e}")))?;
        if !envelope.success {
            let message = envelope
                .message
                .or(envelope.error_code)
                .unwrap_or_else(|| "request failed".into());
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(envelope)
    }

    // @zen-impl: AUTH-7_AC-1
    /// Install a rotated access token when the server sends one along.
    /// Returns whether the header was present.
    async fn capture_rotated_token(&self, response: &reqwest::Response) -> bool {
        if let Some(value) = response.headers().get(header::AUTHORIZATION)
            && let Ok(raw) = value.to_str()
        {
            let token = raw.strip_prefix("Bearer ").unwrap_or(raw);
            self.store.login(token).await;
            return true;
        }
        false
    }
}

/// Paths that carry their own authentication and are exempt from bearer
/// attachment and refresh handling.
fn is_auth_endpoint(path: &str) -> bool {
    path.contains(LOGIN_PATH) || path.contains(REFRESH_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_endpoints_are_exempt() {
        assert!(is_auth_endpoint("/auth/login"));
        assert!(is_auth_endpoint("/auth/refresh"));
        assert!(is_auth_endpoint("auth/login"));
        assert!(!is_auth_endpoint("/auth/logout"));
        assert!(!is_auth_endpoint("/employees/me"));
    }
}
