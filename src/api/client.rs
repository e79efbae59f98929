//! HTTP Gateway
//!
//! [`ApiGateway`] over `reqwest`, used by the command-line client.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use super::dto::{extract_error_message, AuthResponse, LoginRequest, RegisterRequest};
use super::error::{ClientError, ClientResult};
use super::{
    authorization_value, endpoint_url, report_path, ApiGateway, HISTORY_PATH, LOGIN_PATH,
    REGISTER_PATH, UPLOAD_FIELD, UPLOAD_PATH,
};
use crate::config::ApiConfig;
use crate::models::{DatasetId, DatasetSummary, Report, Session};
use crate::upload::UploadFile;

/// Builds the error for a non-success response of one kind of call
type FailureKind = fn(Option<String>) -> ClientError;

/// Equipment API client
pub struct HttpGateway {
    client: Client,
    base_url: String,
    auth_scheme: String,
}

impl HttpGateway {
    pub fn new(config: &ApiConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| ClientError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth_scheme: config.auth_scheme.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        endpoint_url(&self.base_url, path)
    }

    /// Attach the session credential when there is one
    fn authorize(&self, request: RequestBuilder, session: Option<&Session>) -> RequestBuilder {
        match session {
            Some(session) => request.header(
                reqwest::header::AUTHORIZATION,
                authorization_value(&self.auth_scheme, session),
            ),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder, failure: FailureKind) -> ClientResult<Response> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!("Request failed to reach {}: {}", self.base_url, e);
            ClientError::Network(e.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await.unwrap_or_default();
        let message = extract_error_message(&body);
        tracing::warn!(
            status = status.as_u16(),
            message = message.as_deref().unwrap_or(""),
            "API returned an error"
        );
        Err(failure(message))
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        failure: FailureKind,
    ) -> ClientResult<T> {
        let response = self.send(request, failure).await?;
        response
            .json()
            .await
            .map_err(|e| failure(Some(format!("Unexpected response: {}", e))))
    }
}

#[async_trait(?Send)]
impl ApiGateway for HttpGateway {
    async fn login(&self, username: &str, password: &str) -> ClientResult<Session> {
        tracing::debug!("POST {} as {}", LOGIN_PATH, username);

        let request = self.client.post(self.url(LOGIN_PATH)).json(&LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        });

        let response: AuthResponse = self.send_json(request, ClientError::Auth).await?;
        Ok(response.into())
    }

    async fn register(
        &self,
        username: &str,
        password: &str,
        email: Option<&str>,
    ) -> ClientResult<Session> {
        tracing::debug!("POST {} as {}", REGISTER_PATH, username);

        let request = self.client.post(self.url(REGISTER_PATH)).json(&RegisterRequest {
            username: username.to_string(),
            password: password.to_string(),
            email: email.map(str::to_string),
        });

        let response: AuthResponse = self.send_json(request, ClientError::Validation).await?;
        Ok(response.into())
    }

    async fn upload(
        &self,
        session: Option<&Session>,
        file: &UploadFile,
    ) -> ClientResult<DatasetSummary> {
        tracing::debug!("POST {} ({}, {} bytes)", UPLOAD_PATH, file.name(), file.len());

        let part = Part::bytes(file.bytes().to_vec())
            .file_name(file.name().to_string())
            .mime_str(file.kind().mime_type())
            .map_err(|e| ClientError::Upload(Some(e.to_string())))?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        let request = self.authorize(self.client.post(self.url(UPLOAD_PATH)), session);
        let summary: DatasetSummary = self
            .send_json(request.multipart(form), ClientError::Upload)
            .await?;

        tracing::info!(
            "Uploaded {}: {} equipment items",
            file.name(),
            summary.total_equipment
        );
        Ok(summary)
    }

    async fn list_history(&self, session: Option<&Session>) -> ClientResult<Vec<DatasetSummary>> {
        tracing::debug!("GET {}", HISTORY_PATH);

        let request = self.authorize(self.client.get(self.url(HISTORY_PATH)), session);
        self.send_json(request, ClientError::Fetch).await
    }

    async fn fetch_report(
        &self,
        session: Option<&Session>,
        dataset_id: DatasetId,
    ) -> ClientResult<Report> {
        let path = report_path(dataset_id);
        tracing::debug!("GET {}", path);

        let request = self.authorize(self.client.get(self.url(&path)), session);
        let response = self.send(request, ClientError::Fetch).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Report {
            dataset_id,
            bytes: bytes.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::{Multipart, Path},
        http::{HeaderMap, StatusCode},
        response::IntoResponse,
        routing::{get, post},
        Json, Router,
    };
    use serde_json::{json, Value};

    /// Serve `router` on a loopback port, returning its `/api` base URL
    async fn spawn_backend(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, Router::new().nest("/api", router))
                .await
                .unwrap();
        });
        format!("http://{}/api", addr)
    }

    fn gateway(base_url: &str) -> HttpGateway {
        HttpGateway::new(&ApiConfig {
            base_url: base_url.to_string(),
            ..ApiConfig::default()
        })
        .unwrap()
    }

    fn bearer(headers: &HeaderMap) -> Option<String> {
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    async fn login_handler(Json(body): Json<Value>) -> impl IntoResponse {
        if body["password"] == "correct-horse" {
            (StatusCode::OK, Json(json!({"token": "tok-1", "username": body["username"]})))
        } else {
            (StatusCode::UNAUTHORIZED, Json(json!({"error": "Invalid credentials"})))
        }
    }

    async fn register_handler(Json(body): Json<Value>) -> impl IntoResponse {
        if body["username"] == "taken" {
            (StatusCode::BAD_REQUEST, Json(json!({"error": "Username already exists"})))
        } else {
            let email = body.get("email").cloned().unwrap_or(Value::Null);
            (
                StatusCode::CREATED,
                Json(json!({"token": format!("tok-{}", email.as_str().unwrap_or("none")), "username": body["username"]})),
            )
        }
    }

    async fn history_handler(headers: HeaderMap) -> impl IntoResponse {
        if bearer(&headers).as_deref() != Some("Token tok-1") {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({"detail": "Authentication credentials were not provided."})),
            );
        }
        (
            StatusCode::OK,
            Json(json!([
                {"total_equipment": 10, "avg_flowrate": 12.5, "avg_pressure": 3.1,
                 "avg_temperature": 80, "type_distribution": {"Pump": 6, "Valve": 4}},
                {"total_equipment": 2, "avg_flowrate": 1.0, "avg_pressure": 1.0,
                 "avg_temperature": 20.0, "type_distribution": {"Pump": 2}}
            ])),
        )
    }

    async fn upload_handler(headers: HeaderMap, mut multipart: Multipart) -> impl IntoResponse {
        let auth = bearer(&headers).unwrap_or_default();
        let field = multipart.next_field().await.unwrap().unwrap();
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await.unwrap();

        if name != "file" || file_name.is_empty() {
            return (StatusCode::BAD_REQUEST, Json(json!({"error": "No file uploaded"})));
        }
        if !data.starts_with(b"Equipment Name") {
            return (StatusCode::BAD_REQUEST, Json(json!({"error": "Missing column: Type"})));
        }
        (
            StatusCode::OK,
            Json(json!({
                "total_equipment": 3, "avg_flowrate": 100.0, "avg_pressure": 5.0,
                "avg_temperature": 90.0, "type_distribution": {"Pump": 2, "Valve": 1},
                "echo_auth": auth, "echo_name": file_name
            })),
        )
    }

    async fn report_handler(Path(id): Path<u64>) -> impl IntoResponse {
        if id == 99 {
            return (StatusCode::NOT_FOUND, Json(json!({"error": "Dataset not found"}))).into_response();
        }
        (
            [(axum::http::header::CONTENT_TYPE, "application/pdf")],
            format!("%PDF-1.4 report {}", id).into_bytes(),
        )
            .into_response()
    }

    fn backend() -> Router {
        Router::new()
            .route("/login/", post(login_handler))
            .route("/register/", post(register_handler))
            .route("/history/", get(history_handler))
            .route("/upload/", post(upload_handler))
            .route("/report/:id/", get(report_handler))
    }

    #[tokio::test]
    async fn test_login_success_and_failure() {
        let api = gateway(&spawn_backend(backend()).await);

        let session = api.login("alice", "correct-horse").await.unwrap();
        assert_eq!(session, Session::new("tok-1", "alice"));

        let err = api.login("alice", "wrong").await.unwrap_err();
        assert_eq!(err, ClientError::Auth(Some("Invalid credentials".to_string())));
    }

    #[tokio::test]
    async fn test_register_with_and_without_email() {
        let api = gateway(&spawn_backend(backend()).await);

        let session = api.register("bob", "pw", Some("bob@example.com")).await.unwrap();
        assert_eq!(session.token, "tok-bob@example.com");

        let session = api.register("carol", "pw", None).await.unwrap();
        assert_eq!(session.token, "tok-none");

        let err = api.register("taken", "pw", None).await.unwrap_err();
        assert_eq!(err, ClientError::Validation(Some("Username already exists".to_string())));
    }

    #[tokio::test]
    async fn test_history_sends_token() {
        let api = gateway(&spawn_backend(backend()).await);
        let session = Session::new("tok-1", "alice");

        let history = api.list_history(Some(&session)).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].total_equipment, 10);
        assert_eq!(history[0].avg_temperature, 80.0);
        assert!(history[0].is_consistent());

        let err = api.list_history(None).await.unwrap_err();
        assert_eq!(
            err,
            ClientError::Fetch(Some("Authentication credentials were not provided.".to_string()))
        );
    }

    #[tokio::test]
    async fn test_upload_multipart() {
        let api = gateway(&spawn_backend(backend()).await);
        let session = Session::new("tok-1", "alice");

        let file = UploadFile::detect(
            "plant.csv",
            b"Equipment Name,Type,Flowrate,Pressure,Temperature\n".to_vec(),
        )
        .unwrap();
        let summary = api.upload(Some(&session), &file).await.unwrap();
        assert_eq!(summary.total_equipment, 3);
        assert_eq!(summary.type_distribution.get("Pump"), Some(2));

        let bad = UploadFile::detect("plant.csv", b"garbage".to_vec()).unwrap();
        let err = api.upload(Some(&session), &bad).await.unwrap_err();
        assert_eq!(err, ClientError::Upload(Some("Missing column: Type".to_string())));
    }

    #[tokio::test]
    async fn test_fetch_report_bytes() {
        let api = gateway(&spawn_backend(backend()).await);
        let session = Session::new("tok-1", "alice");

        let report = api.fetch_report(Some(&session), DatasetId(3)).await.unwrap();
        assert_eq!(report.dataset_id, DatasetId(3));
        assert_eq!(report.bytes, b"%PDF-1.4 report 3".to_vec());
        assert_eq!(report.filename(), "equipment_report_3.pdf");

        let err = api.fetch_report(Some(&session), DatasetId(99)).await.unwrap_err();
        assert_eq!(err, ClientError::Fetch(Some("Dataset not found".to_string())));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let api = gateway(&format!("http://{}/api", addr));
        let err = api.list_history(None).await.unwrap_err();
        assert!(err.is_network(), "expected network error, got {:?}", err);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let api = gateway("http://localhost:8000/api/");
        assert_eq!(api.base_url(), "http://localhost:8000/api");
        assert_eq!(api.url(HISTORY_PATH), "http://localhost:8000/api/history/");
    }
}
