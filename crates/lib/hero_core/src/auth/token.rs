// @zen-component: CLM-ClaimsCodec
//
//! Access token payload decoding.
//!
//! Hero access tokens are standard three-segment JWTs. The client only needs
//! the payload: the signature belongs to the server, which re-verifies every
//! request, and expiry is learned through 401 responses rather than clock
//! math. Decoding is therefore a strict parse of the middle segment — no
//! key, no validation, but also no partially-filled claims on bad input.

use super::AuthError;
use crate::models::auth::IdentityClaims;

// @zen-impl: CLM-1_AC-1
/// Decode the claims from an access token without verifying its signature.
pub fn decode_claims(token: &str) -> Result<IdentityClaims, AuthError> {
    use base64::Engine;

    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(AuthError::MalformedToken(format!(
            "expected 3 segments, found {}",
            segments.len()
        )));
    }

    let payload = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(segments[1])
        .map_err(|e| AuthError::MalformedToken(format!("payload is not base64url: {e}")))?;

    serde_json::from_slice(&payload).map_err(|e| AuthError::InvalidClaims(e.to_string()))
}
