//! HTTP API Client
//!
//! [`ApiGateway`] over the browser's fetch API, plus the configurable
//! base URL kept in local storage.

use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use wasm_bindgen::JsValue;

use chemviz::api::{
    authorization_value, endpoint_url, extract_error_message, report_path, ApiGateway,
    AuthResponse, ClientError, ClientResult, LoginRequest, RegisterRequest, DEFAULT_API_BASE,
    DEFAULT_AUTH_SCHEME, HISTORY_PATH, LOGIN_PATH, REGISTER_PATH, UPLOAD_FIELD, UPLOAD_PATH,
};
use chemviz::models::{DatasetId, DatasetSummary, Report, Session};
use chemviz::upload::UploadFile;

/// Report a failed call on the browser console
pub fn log_failure(context: &str, error: &ClientError) {
    web_sys::console::warn_1(&format!("{}: {}", context, error).into());
}

/// Local storage key holding the API base URL
pub const API_URL_KEY: &str = "chemviz_api_url";

/// Get the API base URL from local storage or use default
pub fn get_api_base() -> String {
    let stored = web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item(API_URL_KEY).ok().flatten());
    normalize_api_base(stored.as_deref())
}

/// Set the API base URL in local storage
pub fn set_api_base(url: &str) -> Result<(), String> {
    let storage = web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .ok_or_else(|| "Local storage unavailable".to_string())?;
    storage
        .set_item(API_URL_KEY, &normalize_api_base(Some(url)))
        .map_err(|e| format!("Could not save API URL: {:?}", e))
}

/// Trim a configured base URL, falling back to the default when blank
pub fn normalize_api_base(url: Option<&str>) -> String {
    let url = url.map(str::trim).filter(|u| !u.is_empty()).unwrap_or(DEFAULT_API_BASE);
    url.trim_end_matches('/').to_string()
}

/// Builds the error for a non-success response of one kind of call
type FailureKind = fn(Option<String>) -> ClientError;

/// Equipment API client for the browser
#[derive(Debug, Clone)]
pub struct BrowserGateway {
    base_url: String,
    auth_scheme: String,
}

impl BrowserGateway {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: normalize_api_base(Some(base_url)),
            auth_scheme: DEFAULT_AUTH_SCHEME.to_string(),
        }
    }

    /// Gateway for the base URL currently saved in settings
    pub fn from_storage() -> Self {
        Self::new(&get_api_base())
    }

    fn url(&self, path: &str) -> String {
        endpoint_url(&self.base_url, path)
    }

    fn authorize(&self, builder: RequestBuilder, session: Option<&Session>) -> RequestBuilder {
        match session {
            Some(session) => builder.header(
                "Authorization",
                &authorization_value(&self.auth_scheme, session),
            ),
            None => builder,
        }
    }

    async fn send(
        &self,
        request: Result<Request, gloo_net::Error>,
        failure: FailureKind,
    ) -> ClientResult<Response> {
        let request = request.map_err(|e| ClientError::Network(format!("Request build error: {}", e)))?;
        let response = request.send().await.map_err(|e| {
            web_sys::console::error_1(&format!("Request to {} failed: {}", self.base_url, e).into());
            ClientError::Network(e.to_string())
        })?;

        if response.ok() {
            return Ok(response);
        }

        let body = response.binary().await.unwrap_or_default();
        Err(failure(extract_error_message(&body)))
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: Result<Request, gloo_net::Error>,
        failure: FailureKind,
    ) -> ClientResult<T> {
        let response = self.send(request, failure).await?;
        response
            .json()
            .await
            .map_err(|e| failure(Some(format!("Unexpected response: {}", e))))
    }
}

/// Multipart body carrying one file under the upload field
fn upload_form(file: &UploadFile) -> Result<web_sys::FormData, JsValue> {
    let form = web_sys::FormData::new()?;
    let blob = bytes_to_blob(file.bytes(), file.kind().mime_type())?;
    form.append_with_blob_and_filename(UPLOAD_FIELD, &blob, file.name())?;
    Ok(form)
}

/// Wrap raw bytes in a typed Blob
pub fn bytes_to_blob(bytes: &[u8], mime_type: &str) -> Result<web_sys::Blob, JsValue> {
    let array = js_sys::Uint8Array::from(bytes);
    let parts = js_sys::Array::of1(&array);
    let options = web_sys::BlobPropertyBag::new();
    options.set_type(mime_type);
    web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)
}

#[async_trait(?Send)]
impl ApiGateway for BrowserGateway {
    async fn login(&self, username: &str, password: &str) -> ClientResult<Session> {
        let request = Request::post(&self.url(LOGIN_PATH)).json(&LoginRequest {
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
        let request = Request::post(&self.url(REGISTER_PATH)).json(&RegisterRequest {
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
        let form = upload_form(file)
            .map_err(|e| ClientError::Upload(Some(format!("Could not read file: {:?}", e))))?;

        // The browser sets the multipart boundary itself
        let request = self
            .authorize(Request::post(&self.url(UPLOAD_PATH)), session)
            .body(form);

        self.send_json(request, ClientError::Upload).await
    }

    async fn list_history(&self, session: Option<&Session>) -> ClientResult<Vec<DatasetSummary>> {
        let request = self.authorize(Request::get(&self.url(HISTORY_PATH)), session).build();
        self.send_json(request, ClientError::Fetch).await
    }

    async fn fetch_report(
        &self,
        session: Option<&Session>,
        dataset_id: DatasetId,
    ) -> ClientResult<Report> {
        let request = self
            .authorize(Request::get(&self.url(&report_path(dataset_id))), session)
            .build();
        let response = self.send(request, ClientError::Fetch).await?;
        let bytes = response
            .binary()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Report { dataset_id, bytes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_api_base() {
        assert_eq!(normalize_api_base(None), "http://localhost:8000/api");
        assert_eq!(normalize_api_base(Some("  ")), "http://localhost:8000/api");
        assert_eq!(
            normalize_api_base(Some("https://plant.example.com/api/ ")),
            "https://plant.example.com/api"
        );
    }

    #[test]
    fn test_gateway_urls() {
        let api = BrowserGateway::new("http://127.0.0.1:9000/api/");
        assert_eq!(api.url(HISTORY_PATH), "http://127.0.0.1:9000/api/history/");
        assert_eq!(api.url(&report_path(DatasetId(2))), "http://127.0.0.1:9000/api/report/2/");
    }
}
