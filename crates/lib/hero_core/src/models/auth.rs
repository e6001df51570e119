//! Authentication domain models.
//!
//! The claim names mirror the backend's token payload verbatim (camelCase on
//! the wire), so these deserialize straight out of a decoded JWT body.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Identity claims embedded in a Hero access token.
///
/// The server signs these with HS256; the client never verifies the
/// signature (it holds no key) and treats the payload as display data.
/// Authorization is always re-checked server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityClaims {
    /// Subject — account name (standard JWT `sub` claim). Absent in some
    /// older token variants.
    #[serde(default)]
    pub sub: Option<String>,
    /// Granted roles, `ROLE_`-prefixed (e.g. `ROLE_HR`). The backend joins
    /// them into one comma-separated string; arrays are accepted too.
    #[serde(default, deserialize_with = "roles_from_claim")]
    pub auth: Vec<String>,
    /// Employee primary key.
    pub employee_id: i64,
    /// Employee number (e.g. `E-1001`).
    pub employee_number: String,
    /// Display name.
    pub employee_name: String,
    pub department_id: i64,
    pub department_name: String,
    pub grade_id: i64,
    pub grade_name: String,
    pub job_title_id: i64,
    pub job_title_name: String,
    /// Profile image path, when one is set.
    #[serde(default)]
    pub image_path: Option<String>,
    /// Whether the account must change its password before proceeding.
    #[serde(default)]
    pub password_change_required: bool,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiry (unix timestamp).
    pub exp: i64,
}

impl IdentityClaims {
    /// Whether the subject holds the given role (exact match, prefix kept).
    pub fn has_role(&self, role: &str) -> bool {
        self.auth.iter().any(|r| r == role)
    }

    /// Whether the subject holds at least one of the given roles.
    pub fn has_any_role<S: AsRef<str>>(&self, roles: &[S]) -> bool {
        roles.iter().any(|role| self.has_role(role.as_ref()))
    }

    /// Token expiry as a UTC timestamp.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or(DateTime::UNIX_EPOCH)
    }

    /// Token issue time as a UTC timestamp.
    pub fn issued_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.iat, 0).unwrap_or(DateTime::UNIX_EPOCH)
    }
}

// @zen-impl: CLM-1_AC-2 — role claim normalization
/// Accept the `auth` claim as either a comma-joined string (the backend's
/// native form) or an array of strings.
fn roles_from_claim<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawRoles {
        Joined(String),
        Listed(Vec<String>),
    }

    match RawRoles::deserialize(deserializer)? {
        RawRoles::Joined(joined) => Ok(joined
            .split(',')
            .map(str::trim)
            .filter(|role| !role.is_empty())
            .map(str::to_string)
            .collect()),
        RawRoles::Listed(listed) => Ok(listed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(auth: serde_json::Value) -> IdentityClaims {
        serde_json::from_value(serde_json::json!({
            "sub": "hr1",
            "auth": auth,
            "employeeId": 7,
            "employeeNumber": "E-1007",
            "employeeName": "Kim Jiyoung",
            "departmentId": 2,
            "departmentName": "People Ops",
            "gradeId": 3,
            "gradeName": "Senior",
            "jobTitleId": 4,
            "jobTitleName": "HR Manager",
            "iat": 1_700_000_000,
            "exp": 1_700_000_900,
        }))
        .expect("claims deserialize")
    }

    #[test]
    fn roles_split_from_joined_string() {
        let claims = sample(serde_json::json!("ROLE_HR,ROLE_ADMIN"));
        assert_eq!(claims.auth, vec!["ROLE_HR", "ROLE_ADMIN"]);
    }

    #[test]
    fn roles_accept_array_form() {
        let claims = sample(serde_json::json!(["ROLE_HR", "ROLE_USER"]));
        assert_eq!(claims.auth, vec!["ROLE_HR", "ROLE_USER"]);
    }

    #[test]
    fn roles_trim_and_drop_empty_segments() {
        let claims = sample(serde_json::json!(" ROLE_HR , ROLE_ADMIN ,"));
        assert_eq!(claims.auth, vec!["ROLE_HR", "ROLE_ADMIN"]);
    }

    #[test]
    fn missing_auth_claim_means_no_roles() {
        let claims: IdentityClaims = serde_json::from_value(serde_json::json!({
            "employeeId": 1,
            "employeeNumber": "E-1",
            "employeeName": "n",
            "departmentId": 1,
            "departmentName": "d",
            "gradeId": 1,
            "gradeName": "g",
            "jobTitleId": 1,
            "jobTitleName": "j",
            "iat": 0,
            "exp": 0,
        }))
        .expect("claims deserialize");
        assert!(claims.auth.is_empty());
        assert!(!claims.has_role("ROLE_HR"));
    }

    #[test]
    fn has_role_is_exact_match() {
        let claims = sample(serde_json::json!("ROLE_HR"));
        assert!(claims.has_role("ROLE_HR"));
        assert!(!claims.has_role("ROLE_ADMIN"));
        assert!(!claims.has_role("HR"));
    }

    #[test]
    fn has_any_role_matches_any() {
        let claims = sample(serde_json::json!("ROLE_HR"));
        assert!(claims.has_any_role(&["ROLE_ADMIN", "ROLE_HR"]));
        assert!(!claims.has_any_role(&["ROLE_ADMIN", "ROLE_SYSTEM"]));
        assert!(!claims.has_any_role::<&str>(&[]));
    }

    #[test]
    fn timestamps_convert_to_utc() {
        let claims = sample(serde_json::json!("ROLE_HR"));
        assert_eq!(claims.issued_at().timestamp(), 1_700_000_000);
        assert_eq!(claims.expires_at().timestamp(), 1_700_000_900);
        assert!(claims.expires_at() > claims.issued_at());
    }

    #[test]
    fn missing_required_claim_is_an_error() {
        let result = serde_json::from_value::<IdentityClaims>(serde_json::json!({
            "employeeId": 1,
            "iat": 0,
            "exp": 0,
        }));
        assert!(result.is_err());
    }
}
