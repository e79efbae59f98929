//! Upload View
//!
//! Extension check, then a single upload whose summary replaces the
//! previous one.

use crate::api::{ApiGateway, ClientResult};
use crate::models::{DatasetSummary, Session, TypeShare};
use crate::upload::{FileKind, UploadFile, UNSUPPORTED_FILE_MESSAGE};

/// Shown when an upload fails without a server message
pub const UPLOAD_FAILED_MESSAGE: &str =
    "Failed to upload file. Please ensure the backend is running.";

#[derive(Debug, Clone, PartialEq, Default)]
pub enum UploadStatus {
    #[default]
    Idle,
    Uploading { file: String },
    Complete(DatasetSummary),
    Failed(String),
}

#[derive(Debug, Clone, Default)]
pub struct UploadView {
    status: UploadStatus,
    dragging: bool,
    /// Format error from the last selection; the previous outcome stays
    rejected: Option<String>,
}

impl UploadView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> &UploadStatus {
        &self.status
    }

    /// An upload is in flight; further selections are ignored
    pub fn is_busy(&self) -> bool {
        matches!(self.status, UploadStatus::Uploading { .. })
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Drag-over highlight of the drop zone
    pub fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
    }

    pub fn result(&self) -> Option<&DatasetSummary> {
        match &self.status {
            UploadStatus::Complete(summary) => Some(summary),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        if let Some(message) = &self.rejected {
            return Some(message);
        }
        match &self.status {
            UploadStatus::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Proportional bars of the last result
    pub fn bars(&self) -> Vec<TypeShare> {
        self.result().map(DatasetSummary::type_shares).unwrap_or_default()
    }

    /// Check a picked or dropped file name. A disallowed extension shows
    /// the format error next to the last result and yields `None`.
    pub fn select(&mut self, filename: &str) -> Option<FileKind> {
        self.dragging = false;
        if self.is_busy() {
            return None;
        }

        match FileKind::from_filename(filename) {
            Some(kind) => Some(kind),
            None => {
                tracing::debug!("Rejected {} before upload", filename);
                self.rejected = Some(UNSUPPORTED_FILE_MESSAGE.to_string());
                None
            }
        }
    }

    /// Clear the previous result and error and mark the upload in flight.
    /// False when another upload is still running.
    pub fn begin_upload(&mut self, file: &UploadFile) -> bool {
        if self.is_busy() {
            return false;
        }
        self.rejected = None;
        self.status = UploadStatus::Uploading {
            file: file.name().to_string(),
        };
        true
    }

    pub fn finish_upload(&mut self, result: ClientResult<DatasetSummary>) {
        self.status = match result {
            Ok(summary) => UploadStatus::Complete(summary),
            Err(e) => {
                tracing::warn!("Upload failed: {}", e);
                UploadStatus::Failed(e.user_message(UPLOAD_FAILED_MESSAGE))
            }
        };
    }

    /// Validate, send and record the outcome. Returns true on success.
    pub async fn upload<A: ApiGateway + ?Sized>(
        &mut self,
        api: &A,
        session: Option<&Session>,
        filename: &str,
        bytes: Vec<u8>,
    ) -> bool {
        let Some(kind) = self.select(filename) else {
            return false;
        };

        let file = UploadFile::new(filename, kind, bytes);
        if !self.begin_upload(&file) {
            return false;
        }

        self.finish_upload(api.upload(session, &file).await);
        self.result().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ClientError;
    use crate::models::fixtures::pump_valve;
    use crate::testing::{Call, ScriptedGateway};

    fn alice() -> Session {
        Session::new("tok", "alice")
    }

    #[tokio::test]
    async fn test_disallowed_extension_makes_no_call() {
        let api = ScriptedGateway::new().on_upload(Ok(pump_valve()));
        let mut view = UploadView::new();

        for name in ["report.pdf", "data", "sheet.numbers", "archive.csv.gz"] {
            assert!(!view.upload(&api, Some(&alice()), name, b"x".to_vec()).await);
            assert_eq!(view.error(), Some(UNSUPPORTED_FILE_MESSAGE));
        }
        assert_eq!(api.call_count(), 0);
    }

    #[tokio::test]
    async fn test_successful_upload_shows_summary() {
        let api = ScriptedGateway::new().on_upload(Ok(pump_valve()));
        let mut view = UploadView::new();

        assert!(view.upload(&api, Some(&alice()), "Plant.XLSX", b"data".to_vec()).await);

        let summary = view.result().unwrap();
        assert!(summary.is_consistent());
        let bars = view.bars();
        assert_eq!(bars.len(), 2);
        assert!((bars[0].share - 0.6).abs() < 1e-9);
        assert_eq!(
            api.calls(),
            vec![Call::Upload {
                file: "Plant.XLSX".to_string(),
                token: Some("tok".to_string()),
            }]
        );
    }

    #[tokio::test]
    async fn test_failed_upload_then_retry() {
        let api = ScriptedGateway::new()
            .on_upload(Err(ClientError::Upload(Some("Missing column: Type".to_string()))))
            .on_upload(Err(ClientError::Network("refused".to_string())))
            .on_upload(Ok(pump_valve()));
        let mut view = UploadView::new();

        assert!(!view.upload(&api, None, "a.csv", Vec::new()).await);
        assert_eq!(view.error(), Some("Missing column: Type"));

        assert!(!view.upload(&api, None, "a.csv", Vec::new()).await);
        assert_eq!(view.error(), Some(UPLOAD_FAILED_MESSAGE));

        assert!(view.upload(&api, None, "a.csv", Vec::new()).await);
        assert_eq!(view.error(), None);
        assert_eq!(api.call_count(), 3);
    }

    #[test]
    fn test_busy_view_ignores_new_files() {
        let mut view = UploadView::new();
        view.finish_upload(Ok(pump_valve()));

        let file = UploadFile::detect("a.csv", Vec::new()).unwrap();
        assert!(view.begin_upload(&file));
        assert!(view.is_busy());
        // Previous result is cleared as soon as the new upload starts
        assert!(view.result().is_none());

        assert_eq!(view.select("b.csv"), None);
        assert!(!view.begin_upload(&file));

        view.finish_upload(Ok(pump_valve()));
        assert!(!view.is_busy());
    }

    #[test]
    fn test_rejected_file_keeps_last_result() {
        let mut view = UploadView::new();
        view.finish_upload(Ok(pump_valve()));

        assert_eq!(view.select("notes.txt"), None);
        assert_eq!(view.error(), Some(UNSUPPORTED_FILE_MESSAGE));
        assert_eq!(view.result(), Some(&pump_valve()));

        let file = UploadFile::detect("b.csv", Vec::new()).unwrap();
        assert!(view.begin_upload(&file));
        assert_eq!(view.error(), None);
        assert!(view.result().is_none());
    }

    #[test]
    fn test_zero_total_gives_empty_bars() {
        let mut view = UploadView::new();
        view.finish_upload(Ok(crate::models::fixtures::summary(0, &[("Pump", 0)], (0.0, 0.0, 0.0))));
        assert_eq!(view.bars()[0].share, 0.0);
    }
}
