//! Data Transfer Objects
//!
//! Request and response bodies of the auth endpoints, and the error body
//! every endpoint may return.

use serde::{Deserialize, Serialize};

use crate::models::Session;

/// `POST /login/` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// `POST /register/` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Successful login/register response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub username: String,
}

impl From<AuthResponse> for Session {
    fn from(response: AuthResponse) -> Self {
        Session {
            token: response.token,
            username: response.username,
        }
    }
}

/// Error body. The backend reports `error`; framework-level rejections
/// (missing credentials, throttling) come back as `detail`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

impl ErrorBody {
    pub fn message(self) -> Option<String> {
        let present = |m: &String| !m.trim().is_empty();
        self.error.filter(present).or(self.detail.filter(present))
    }
}

/// Pull a user-facing message out of a raw error response body
pub fn extract_error_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorBody>(body).ok()?.message()
}
