//! Wire types shared across the client.

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

/// The backend's common response envelope.
///
/// Every controller endpoint wraps its payload as
/// `{"success": bool, "data": ..., "errorCode": ..., "message": ...}` with
/// null fields omitted. Login is the one exception (see [`LoginResponse`]).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    pub error_code: Option<String>,
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Unwrap the payload, failing when the envelope carried none.
    pub fn into_data(self) -> ClientResult<T> {
        self.data
            .ok_or_else(|| ClientError::BadResponse("response envelope carried no data".into()))
    }
}

/// Credential login request body.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub account: &'a str,
    pub password: &'a str,
}

/// Body of a successful credential login.
///
/// The access token itself travels in the `Authorization` response header
/// (or, on some deployments, as `data.accessToken`); this is just the
/// human-facing remainder.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub password_change_required: bool,
}
