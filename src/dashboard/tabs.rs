//! View Controller
//!
//! Exactly one view is mounted at a time. Selecting a tab mounts a fresh
//! view, which fetches its own data; nothing is carried between views.

use std::fmt;
use std::str::FromStr;

use super::charts_view::ChartsView;
use super::table_view::TableView;
use super::upload_view::UploadView;
use crate::api::ApiGateway;
use crate::models::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    #[default]
    Upload,
    Charts,
    Table,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Upload, Tab::Charts, Tab::Table];

    /// Navigation label
    pub fn label(&self) -> &'static str {
        match self {
            Tab::Upload => "Dashboard",
            Tab::Charts => "Charts",
            Tab::Table => "Data Table",
        }
    }

    /// Page title shown in the header
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Upload => "Dashboard",
            Tab::Charts => "Visualization",
            Tab::Table => "Data Table",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Tab::Upload => "📊",
            Tab::Charts => "📈",
            Tab::Table => "📋",
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Tab::Upload => "upload",
            Tab::Charts => "charts",
            Tab::Table => "table",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tab::ALL
            .into_iter()
            .find(|tab| tab.id().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown tab: {}", s))
    }
}

/// The mounted view and its state
#[derive(Debug, Clone)]
pub enum ActiveView {
    Upload(UploadView),
    Charts(ChartsView),
    Table(TableView),
}

impl ActiveView {
    pub fn fresh(tab: Tab) -> Self {
        match tab {
            Tab::Upload => ActiveView::Upload(UploadView::new()),
            Tab::Charts => ActiveView::Charts(ChartsView::new()),
            Tab::Table => ActiveView::Table(TableView::new()),
        }
    }

    pub fn tab(&self) -> Tab {
        match self {
            ActiveView::Upload(_) => Tab::Upload,
            ActiveView::Charts(_) => Tab::Charts,
            ActiveView::Table(_) => Tab::Table,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ViewController {
    active: ActiveView,
}

impl Default for ViewController {
    fn default() -> Self {
        Self {
            active: ActiveView::fresh(Tab::default()),
        }
    }
}

impl ViewController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tab(&self) -> Tab {
        self.active.tab()
    }

    pub fn active(&self) -> &ActiveView {
        &self.active
    }

    pub fn active_mut(&mut self) -> &mut ActiveView {
        &mut self.active
    }

    /// Mount `tab`'s view. Re-selecting the current tab keeps its state.
    /// Returns true when a new view was mounted.
    pub fn select(&mut self, tab: Tab) -> bool {
        if self.tab() == tab {
            return false;
        }
        tracing::debug!("Switching view {} -> {}", self.tab(), tab);
        self.active = ActiveView::fresh(tab);
        true
    }

    /// Back to the default tab with a fresh view
    pub fn reset(&mut self) {
        self.active = ActiveView::fresh(Tab::default());
    }

    /// Run the mounted view's initial fetch, if it has one
    pub async fn mount<A: ApiGateway + ?Sized>(&mut self, api: &A, session: Option<&Session>) {
        match &mut self.active {
            ActiveView::Upload(_) => {}
            ActiveView::Charts(view) => view.load(api, session).await,
            ActiveView::Table(view) => view.load(api, session).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::pump_valve;
    use crate::testing::{Call, ScriptedGateway};

    #[test]
    fn test_titles() {
        let titles: Vec<_> = Tab::ALL.iter().map(Tab::title).collect();
        assert_eq!(titles, vec!["Dashboard", "Visualization", "Data Table"]);
        assert_eq!("Charts".parse::<Tab>(), Ok(Tab::Charts));
        assert!("settings".parse::<Tab>().is_err());
    }

    #[test]
    fn test_select_mounts_fresh_view() {
        let mut views = ViewController::new();
        assert_eq!(views.tab(), Tab::Upload);

        assert!(views.select(Tab::Table));
        if let ActiveView::Table(table) = views.active_mut() {
            table.finish_load(Ok(vec![pump_valve()]));
        }
        assert!(!views.select(Tab::Table));
        assert!(matches!(views.active(), ActiveView::Table(t) if t.rows().len() == 1));

        views.select(Tab::Charts);
        views.select(Tab::Table);
        assert!(matches!(views.active(), ActiveView::Table(t) if t.history().is_loading()));
    }

    #[tokio::test]
    async fn test_each_mount_refetches() {
        let api = ScriptedGateway::new().on_history(Ok(vec![pump_valve()]));
        let session = Session::new("tok", "alice");
        let mut views = ViewController::new();

        views.mount(&api, Some(&session)).await;
        assert_eq!(api.call_count(), 0);

        for tab in [Tab::Charts, Tab::Table, Tab::Charts] {
            views.select(tab);
            views.mount(&api, Some(&session)).await;
        }

        let history = Call::History { token: Some("tok".to_string()) };
        assert_eq!(api.calls(), vec![history.clone(), history.clone(), history]);
    }
}
