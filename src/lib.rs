//! # Chemviz
//!
//! Client for the chemical equipment analysis API: sign in, upload a
//! spreadsheet of equipment readings, browse the summaries the backend
//! computed, and download PDF reports.
//!
//! ## Modules
//!
//! - [`models`]: Dataset summaries and the values derived from them
//! - [`upload`]: Client-side file type check
//! - [`session`]: Persisted session and the context that carries it
//! - [`api`]: Gateway trait, wire types and (native) HTTP client
//! - [`dashboard`]: Auth gate, view controller and the three views
//! - `config`: TOML configuration (native only)
//!
//! The core builds without the `native` feature so the browser dashboard
//! can drive the same state machines over its own gateway.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chemviz::api::client::HttpGateway;
//! use chemviz::dashboard::{Dashboard, Tab};
//! use chemviz::session::FileSessionStore;
//! use chemviz::Config;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let api = HttpGateway::new(&config.api)?;
//!     let mut dashboard = Dashboard::open(FileSessionStore::new(&config.session.path));
//!
//!     if dashboard.is_gated() {
//!         dashboard.gate_mut().set_username("alice");
//!         dashboard.gate_mut().set_password("secret");
//!         dashboard.submit_auth(&api).await;
//!     }
//!
//!     dashboard.select_tab(Tab::Table);
//!     dashboard.mount(&api).await;
//!     Ok(())
//! }
//! ```

pub mod api;
#[cfg(feature = "native")]
pub mod config;
pub mod dashboard;
pub mod models;
pub mod session;
pub mod upload;

#[cfg(test)]
mod testing;

// Re-export top-level types for convenience
pub use api::{ApiGateway, ClientError, ClientResult};

pub use models::{
    report_id, Activity, DatasetId, DatasetSummary, QuickStats, Report, Session, TrendSeries,
    TypeCount, TypeDistribution, TypeShare,
};

pub use session::{
    FileSessionStore, MemorySessionStore, SessionContext, SessionError, SessionStore,
};

pub use upload::{FileKind, UploadFile, UNSUPPORTED_FILE_MESSAGE};

pub use dashboard::{ChartKind, Dashboard, LoadState, Tab};

#[cfg(feature = "native")]
pub use config::{ApiConfig, Config, ConfigError, LoggingConfig, SessionConfig};

#[cfg(feature = "native")]
pub use api::client::HttpGateway;
