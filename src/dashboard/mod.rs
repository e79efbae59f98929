//! Dashboard Controller
//!
//! Top-level orchestration: the auth gate blocks everything until a session
//! exists, then the view controller mounts one view at a time. Each view
//! drives its own fetch through the [`ApiGateway`], with the session passed
//! in explicitly.
//!
//! Views do not share data. Two views mounted one after the other may show
//! different histories if an upload lands in between.

pub mod auth;
pub mod charts_view;
pub mod load;
pub mod stats;
pub mod table_view;
pub mod tabs;
pub mod upload_view;

pub use auth::{AuthGate, AuthMode, AuthRequest, AUTH_FAILED_MESSAGE};
pub use charts_view::{ChartData, ChartKind, ChartsDisplay, ChartsView, LOAD_FAILED_MESSAGE};
pub use load::LoadState;
pub use stats::{load_quick_stats, quick_stats_from, NO_ACTIVITY_MESSAGE};
pub use table_view::{HistoryRow, TableView, DOWNLOAD_FAILED_MESSAGE};
pub use tabs::{ActiveView, Tab, ViewController};
pub use upload_view::{UploadStatus, UploadView, UPLOAD_FAILED_MESSAGE};

use crate::api::ApiGateway;
use crate::models::{QuickStats, Report, Session};
use crate::session::{SessionContext, SessionError, SessionStore};

pub struct Dashboard<S> {
    session: SessionContext<S>,
    gate: AuthGate,
    views: ViewController,
}

impl<S: SessionStore> Dashboard<S> {
    /// Restore any persisted session and start on the default tab
    pub fn open(store: S) -> Self {
        Self {
            session: SessionContext::open(store),
            gate: AuthGate::new(),
            views: ViewController::new(),
        }
    }

    /// No session yet: only the auth gate is shown
    pub fn is_gated(&self) -> bool {
        !self.session.is_authenticated()
    }

    pub fn session(&self) -> &SessionContext<S> {
        &self.session
    }

    pub fn gate(&self) -> &AuthGate {
        &self.gate
    }

    pub fn gate_mut(&mut self) -> &mut AuthGate {
        &mut self.gate
    }

    /// Submit the auth form; on success the default view is mounted
    pub async fn submit_auth<A: ApiGateway + ?Sized>(&mut self, api: &A) -> bool {
        if !self.gate.submit(api, &mut self.session).await {
            return false;
        }
        self.gate = AuthGate::new();
        self.views.reset();
        true
    }

    /// Clear the session everywhere and return to the auth gate, whatever
    /// tab was showing. The in-memory session is dropped even if storage
    /// could not be cleared.
    pub fn logout(&mut self) -> Result<(), SessionError> {
        let result = self.session.logout();
        self.gate = AuthGate::new();
        self.views.reset();
        result
    }

    /// Switch tabs. Ignored while gated.
    pub fn select_tab(&mut self, tab: Tab) -> bool {
        if self.is_gated() {
            return false;
        }
        self.views.select(tab)
    }

    pub fn tab(&self) -> Tab {
        self.views.tab()
    }

    pub fn page_title(&self) -> &'static str {
        self.views.tab().title()
    }

    pub fn active(&self) -> Option<&ActiveView> {
        if self.is_gated() {
            return None;
        }
        Some(self.views.active())
    }

    pub fn active_mut(&mut self) -> Option<&mut ActiveView> {
        if self.is_gated() {
            return None;
        }
        Some(self.views.active_mut())
    }

    /// Initial fetch of the mounted view
    pub async fn mount<A: ApiGateway + ?Sized>(&mut self, api: &A) {
        if self.is_gated() {
            return;
        }
        self.views.mount(api, self.session.current()).await;
    }

    /// Hand a file to the upload view (switching to it first)
    pub async fn upload<A: ApiGateway + ?Sized>(
        &mut self,
        api: &A,
        filename: &str,
        bytes: Vec<u8>,
    ) -> bool {
        if self.is_gated() {
            return false;
        }
        self.views.select(Tab::Upload);
        match self.views.active_mut() {
            ActiveView::Upload(view) => view.upload(api, self.session.current(), filename, bytes).await,
            _ => false,
        }
    }

    /// Download the report for a row of the table view
    pub async fn download_report<A: ApiGateway + ?Sized>(
        &mut self,
        api: &A,
        index: usize,
    ) -> Option<Report> {
        if self.is_gated() {
            return None;
        }
        match self.views.active_mut() {
            ActiveView::Table(view) => view.download(api, self.session.current(), index).await,
            _ => None,
        }
    }

    /// Side panel figures, best effort
    pub async fn quick_stats<A: ApiGateway + ?Sized>(&self, api: &A) -> QuickStats {
        if self.is_gated() {
            return QuickStats::default();
        }
        load_quick_stats(api, self.session.current()).await
    }

    pub fn current_session(&self) -> Option<&Session> {
        self.session.current()
    }
}
