//! UI Components
//!
//! Reusable Leptos components for the dashboard.

pub mod chart;
pub mod loading;
pub mod right_panel;
pub mod sidebar;
pub mod stat_card;
pub mod toast;

pub use chart::Chart;
pub use loading::{EmptyState, ErrorState, InlineLoading, Loading};
pub use right_panel::RightPanel;
pub use sidebar::Sidebar;
pub use stat_card::{StatCard, SummaryCards};
pub use toast::Toast;
