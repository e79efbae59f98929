//! Equipment API Gateway
//!
//! The five calls the dashboard makes against the equipment backend.
//!
//! # Endpoints
//!
//! - `POST /register/` - Create an account, returns a token
//! - `POST /login/` - Exchange credentials for a token
//! - `POST /upload/` - Multipart spreadsheet upload, returns its summary
//! - `GET /history/` - Recent dataset summaries, newest first
//! - `GET /report/:id/` - PDF report for one dataset
//!
//! Authenticated calls carry `Authorization: <scheme> <token>`. Every call
//! is a single round trip: no retries, no client-side timeout.
//!
//! [`ApiGateway`] is the seam between the controllers and the transport.
//! The native [`HttpGateway`](client::HttpGateway) speaks HTTP through
//! `reqwest`; the browser dashboard provides its own implementation.

pub mod dto;
pub mod error;

#[cfg(feature = "native")]
pub mod client;

pub use dto::{extract_error_message, AuthResponse, ErrorBody, LoginRequest, RegisterRequest};
pub use error::{ClientError, ClientResult};

use async_trait::async_trait;

use crate::models::{DatasetId, DatasetSummary, Report, Session};
use crate::upload::UploadFile;

/// Default API base URL
pub const DEFAULT_API_BASE: &str = "http://localhost:8000/api";

/// Default `Authorization` scheme expected by the backend
pub const DEFAULT_AUTH_SCHEME: &str = "Token";

pub const LOGIN_PATH: &str = "/login/";
pub const REGISTER_PATH: &str = "/register/";
pub const UPLOAD_PATH: &str = "/upload/";
pub const HISTORY_PATH: &str = "/history/";

/// Multipart field carrying the uploaded file
pub const UPLOAD_FIELD: &str = "file";

/// Path of the report for one dataset
pub fn report_path(dataset_id: DatasetId) -> String {
    format!("/report/{}/", dataset_id)
}

/// Join a base URL and an endpoint path without doubling slashes
pub fn endpoint_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

/// `Authorization` header value for a session
pub fn authorization_value(scheme: &str, session: &Session) -> String {
    format!("{} {}", scheme, session.token)
}

/// Outbound calls to the equipment backend.
///
/// Futures are not required to be `Send`: browser fetches are bound to the
/// page's single thread.
#[async_trait(?Send)]
pub trait ApiGateway {
    /// Exchange credentials for a session. Bad credentials: [`ClientError::Auth`].
    async fn login(&self, username: &str, password: &str) -> ClientResult<Session>;

    /// Create an account. Rejected fields: [`ClientError::Validation`].
    async fn register(
        &self,
        username: &str,
        password: &str,
        email: Option<&str>,
    ) -> ClientResult<Session>;

    /// Send a spreadsheet. Unparseable file: [`ClientError::Upload`].
    async fn upload(
        &self,
        session: Option<&Session>,
        file: &UploadFile,
    ) -> ClientResult<DatasetSummary>;

    /// Dataset summaries, newest first
    async fn list_history(&self, session: Option<&Session>) -> ClientResult<Vec<DatasetSummary>>;

    /// Report document for one dataset
    async fn fetch_report(
        &self,
        session: Option<&Session>,
        dataset_id: DatasetId,
    ) -> ClientResult<Report>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url() {
        assert_eq!(
            endpoint_url("http://localhost:8000/api", HISTORY_PATH),
            "http://localhost:8000/api/history/"
        );
        assert_eq!(
            endpoint_url("http://localhost:8000/api/", LOGIN_PATH),
            "http://localhost:8000/api/login/"
        );
        assert_eq!(
            endpoint_url(DEFAULT_API_BASE, &report_path(DatasetId(4))),
            "http://localhost:8000/api/report/4/"
        );
    }

    #[test]
    fn test_authorization_value() {
        let session = Session::new("abc123", "alice");
        assert_eq!(authorization_value(DEFAULT_AUTH_SCHEME, &session), "Token abc123");
        assert_eq!(authorization_value("Bearer", &session), "Bearer abc123");
    }
}
