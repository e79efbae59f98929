//! Global Application State
//!
//! Reactive state management using Leptos signals. Only the session and
//! the selected tab are shared; each page keeps its own view state.

use leptos::*;

use chemviz::dashboard::Tab;
use chemviz::models::Session;
use chemviz::session::{SessionContext, SessionError};

use super::storage::LocalStorageSessionStore;
use crate::api::BrowserGateway;

/// Global application state provided to all components
#[derive(Clone, Copy)]
pub struct GlobalState {
    /// Signed-in session, mirrored to local storage
    pub session: RwSignal<SessionContext<LocalStorageSessionStore>>,
    /// Tab shown in the main area
    pub tab: RwSignal<Tab>,
    /// Error message to display
    pub error: RwSignal<Option<String>>,
    /// Success message (for toasts)
    pub success: RwSignal<Option<String>>,
}

/// Provide global state to the component tree
pub fn provide_global_state() {
    let state = GlobalState {
        session: create_rw_signal(SessionContext::open(LocalStorageSessionStore)),
        tab: create_rw_signal(Tab::default()),
        error: create_rw_signal(None),
        success: create_rw_signal(None),
    };

    provide_context(state);
}

impl GlobalState {
    /// Snapshot of the current session for an outgoing call
    pub fn current_session(&self) -> Option<Session> {
        self.session.with(|ctx| ctx.current().cloned())
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.with(|ctx| ctx.is_authenticated())
    }

    pub fn username(&self) -> Option<String> {
        self.session.with(|ctx| ctx.username().map(str::to_string))
    }

    /// Gateway for the configured API
    pub fn gateway(&self) -> BrowserGateway {
        BrowserGateway::from_storage()
    }

    /// Persist a freshly issued session and open the default tab
    pub fn sign_in(&self, session: Session) -> Result<(), SessionError> {
        self.session
            .try_update(|ctx| ctx.commit(session))
            .unwrap_or(Ok(()))?;
        self.tab.set(Tab::default());
        Ok(())
    }

    /// Drop the session and return to the auth gate from any tab
    pub fn logout(&self) {
        if let Some(Err(e)) = self.session.try_update(|ctx| ctx.logout()) {
            web_sys::console::error_1(&format!("Failed to clear session: {}", e).into());
        }
        self.tab.set(Tab::default());
    }

    /// Show a success message (auto-clears after timeout)
    pub fn show_success(&self, message: &str) {
        self.success.set(Some(message.to_string()));

        let success_signal = self.success;
        gloo_timers::callback::Timeout::new(3000, move || {
            success_signal.set(None);
        }).forget();
    }

    /// Show an error message (auto-clears after timeout)
    pub fn show_error(&self, message: &str) {
        self.error.set(Some(message.to_string()));

        let error_signal = self.error;
        gloo_timers::callback::Timeout::new(5000, move || {
            error_signal.set(None);
        }).forget();
    }

    /// Clear error message
    pub fn clear_error(&self) {
        self.error.set(None);
    }
}
