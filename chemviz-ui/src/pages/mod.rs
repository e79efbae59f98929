//! Pages
//!
//! The auth gate and one page per dashboard tab.

pub mod auth;
pub mod charts;
pub mod table;
pub mod upload;

pub use auth::AuthPage;
pub use charts::ChartsPage;
pub use table::TablePage;
pub use upload::UploadPage;
