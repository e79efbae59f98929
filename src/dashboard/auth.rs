//! Auth Gate
//!
//! Login/register form state. Nothing here is persisted; a successful
//! submit hands the issued [`Session`] to the [`SessionContext`].

use crate::api::{ApiGateway, ClientResult};
use crate::models::Session;
use crate::session::{SessionContext, SessionStore};

/// Shown when the server gives no reason for a rejected login or registration
pub const AUTH_FAILED_MESSAGE: &str = "Authentication failed. Please try again.";

/// Shown when submit is pressed with an empty username or password
pub const MISSING_FIELDS_MESSAGE: &str = "Please enter a username and password.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

impl AuthMode {
    pub fn toggled(self) -> Self {
        match self {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        }
    }

    pub fn heading(self) -> &'static str {
        match self {
            AuthMode::Login => "Login to Visualizer",
            AuthMode::Register => "Create Account",
        }
    }

    pub fn subtitle(self) -> &'static str {
        match self {
            AuthMode::Login => "Enter your credentials to access the dashboard",
            AuthMode::Register => "Sign up to start analyzing equipment data",
        }
    }

    pub fn submit_label(self) -> &'static str {
        match self {
            AuthMode::Login => "Login",
            AuthMode::Register => "Register",
        }
    }

    /// Label of the control that switches to the other mode
    pub fn switch_prompt(self) -> &'static str {
        match self {
            AuthMode::Login => "Don't have an account? Register",
            AuthMode::Register => "Already have an account? Login",
        }
    }
}

/// A validated submission, ready for the gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthRequest {
    Login {
        username: String,
        password: String,
    },
    Register {
        username: String,
        password: String,
        email: Option<String>,
    },
}

impl AuthRequest {
    pub async fn send<A: ApiGateway + ?Sized>(&self, api: &A) -> ClientResult<Session> {
        match self {
            AuthRequest::Login { username, password } => api.login(username, password).await,
            AuthRequest::Register {
                username,
                password,
                email,
            } => api.register(username, password, email.as_deref()).await,
        }
    }
}

/// Form and submit state of the gate
#[derive(Debug, Clone, Default)]
pub struct AuthGate {
    mode: AuthMode,
    username: String,
    password: String,
    email: String,
    error: Option<String>,
    submitting: bool,
}

impl AuthGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    /// Switch between login and register. Only the register-only email is
    /// dropped; any error stays on screen.
    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggled();
        self.email.clear();
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn set_username(&mut self, value: impl Into<String>) {
        self.username = value.into();
    }

    pub fn set_password(&mut self, value: impl Into<String>) {
        self.password = value.into();
    }

    /// Ignored in login mode, which has no email field
    pub fn set_email(&mut self, value: impl Into<String>) {
        if self.mode == AuthMode::Register {
            self.email = value.into();
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Show a form error raised outside the gateway call
    pub fn fail(&mut self, message: impl Into<String>) {
        self.submitting = false;
        self.error = Some(message.into());
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn submit_label(&self) -> &'static str {
        if self.submitting {
            "Processing..."
        } else {
            self.mode.submit_label()
        }
    }

    /// Start a submit. `None` while one is already in flight or when a
    /// required field is blank (the form error says which).
    pub fn begin_submit(&mut self) -> Option<AuthRequest> {
        if self.submitting {
            return None;
        }

        if self.username.trim().is_empty() || self.password.is_empty() {
            self.error = Some(MISSING_FIELDS_MESSAGE.to_string());
            return None;
        }

        self.error = None;
        self.submitting = true;

        let username = self.username.trim().to_string();
        let password = self.password.clone();
        Some(match self.mode {
            AuthMode::Login => AuthRequest::Login { username, password },
            AuthMode::Register => AuthRequest::Register {
                username,
                password,
                email: Some(self.email.trim().to_string()).filter(|e| !e.is_empty()),
            },
        })
    }

    /// Settle a submit. On failure the message is shown and the mode kept.
    pub fn finish_submit(&mut self, result: ClientResult<Session>) -> Option<Session> {
        self.submitting = false;
        match result {
            Ok(session) => {
                self.password.clear();
                Some(session)
            }
            Err(e) => {
                tracing::warn!("{:?} rejected: {}", self.mode, e);
                self.error = Some(e.user_message(AUTH_FAILED_MESSAGE));
                None
            }
        }
    }

    /// Full submit: call the gateway and commit the issued session.
    /// Returns true once a session is in place.
    pub async fn submit<A, S>(&mut self, api: &A, session: &mut SessionContext<S>) -> bool
    where
        A: ApiGateway + ?Sized,
        S: SessionStore,
    {
        let Some(request) = self.begin_submit() else {
            return false;
        };

        let result = request.send(api).await;
        let Some(issued) = self.finish_submit(result) else {
            return false;
        };

        match session.commit(issued) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Could not persist session: {}", e);
                self.fail(format!("Could not save session: {}", e));
                false
            }
        }
    }
}
