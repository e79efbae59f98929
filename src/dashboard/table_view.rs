//! Table View
//!
//! History rows with per-row report downloads.

use std::collections::BTreeSet;

use super::load::LoadState;
use crate::api::{ApiGateway, ClientResult};
use crate::models::{report_id, DatasetId, DatasetSummary, Report, Session};

pub use super::charts_view::LOAD_FAILED_MESSAGE;

/// Shown when a report download fails; the table stays as it was
pub const DOWNLOAD_FAILED_MESSAGE: &str = "Failed to download PDF. Please try again.";

/// One rendered history row
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRow<'a> {
    /// 1-based position, most recent first
    pub number: usize,
    pub dataset_id: DatasetId,
    pub summary: &'a DatasetSummary,
    pub badges: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct TableView {
    history: LoadState<Vec<DatasetSummary>>,
    downloading: BTreeSet<usize>,
    download_error: Option<String>,
}

impl TableView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &LoadState<Vec<DatasetSummary>> {
        &self.history
    }

    pub fn begin_load(&mut self) {
        self.history = LoadState::Loading;
        self.download_error = None;
    }

    pub fn finish_load(&mut self, result: ClientResult<Vec<DatasetSummary>>) {
        self.history = LoadState::settle(result, LOAD_FAILED_MESSAGE);
    }

    /// Fetch history (on mount, Retry and Refresh)
    pub async fn load<A: ApiGateway + ?Sized>(&mut self, api: &A, session: Option<&Session>) {
        self.begin_load();
        self.finish_load(api.list_history(session).await);
    }

    pub fn rows(&self) -> Vec<HistoryRow<'_>> {
        let Some(history) = self.history.loaded() else {
            return Vec::new();
        };

        history
            .iter()
            .enumerate()
            .filter_map(|(index, summary)| {
                Some(HistoryRow {
                    number: index + 1,
                    dataset_id: report_id(history.len(), index)?,
                    summary,
                    badges: summary.type_distribution.badges(),
                })
            })
            .collect()
    }

    /// Entry shown in the "Latest Dataset Summary" cards
    pub fn latest(&self) -> Option<&DatasetSummary> {
        self.history.loaded().and_then(|history| history.first())
    }

    pub fn footer(&self) -> String {
        let count = self.history.loaded().map_or(0, Vec::len);
        format!("Showing {} of {} records", count, count)
    }

    pub fn is_downloading(&self, index: usize) -> bool {
        self.downloading.contains(&index)
    }

    pub fn download_label(&self, index: usize) -> &'static str {
        if self.is_downloading(index) {
            "Generating..."
        } else {
            "Download PDF"
        }
    }

    pub fn download_error(&self) -> Option<&str> {
        self.download_error.as_deref()
    }

    pub fn dismiss_download_error(&mut self) {
        self.download_error = None;
    }

    /// Mark a row's download in flight and return its dataset id. `None` if
    /// the row does not exist or is already downloading.
    pub fn begin_download(&mut self, index: usize) -> Option<DatasetId> {
        let len = self.history.loaded()?.len();
        let dataset_id = report_id(len, index)?;
        if !self.downloading.insert(index) {
            return None;
        }
        self.download_error = None;
        Some(dataset_id)
    }

    /// Settle a row's download, handing back the report to save
    pub fn finish_download(&mut self, index: usize, result: ClientResult<Report>) -> Option<Report> {
        self.downloading.remove(&index);
        match result {
            Ok(report) => Some(report),
            Err(e) => {
                tracing::warn!("Report download for row {} failed: {}", index + 1, e);
                self.download_error = Some(DOWNLOAD_FAILED_MESSAGE.to_string());
                None
            }
        }
    }

    pub async fn download<A: ApiGateway + ?Sized>(
        &mut self,
        api: &A,
        session: Option<&Session>,
        index: usize,
    ) -> Option<Report> {
        let dataset_id = self.begin_download(index)?;
        let result = api.fetch_report(session, dataset_id).await;
        self.finish_download(index, result)
    }
}
