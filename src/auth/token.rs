use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted credential value with the time it was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCredential {
    pub value: String,
    pub saved_at: DateTime<Utc>,
}

impl StoredCredential {
    pub fn now(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            saved_at: Utc::now(),
        }
    }
}

/// Email/password pair sent to `auth/login`.
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

impl LoginCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Body returned by `auth/login` and `auth/refresh`.
///
/// The refresh credential travels as an HTTP-only cookie and is never part of
/// this payload as far as the client is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenResponse {
    pub access_token: String,
}

/// Role reported by `auth/profile`.
///
/// Accepts both the lowercase and the `SCREAMING_CASE` spelling. Roles this
/// client does not know yet decode as `Unknown` instead of failing the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionRole {
    #[serde(alias = "TEAMLEAD")]
    Teamlead,
    #[default]
    #[serde(alias = "EMPLOYEE")]
    Employee,
    #[serde(alias = "INTERN")]
    Intern,
    #[serde(other)]
    Unknown,
}

/// The signed-in user as reported by `auth/profile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: SessionRole,
}
