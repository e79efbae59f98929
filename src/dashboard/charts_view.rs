//! Charts View
//!
//! One history fetch per mount; the chart toggle only changes which
//! projection of the loaded history is drawn.

use std::fmt;
use std::str::FromStr;

use super::load::LoadState;
use crate::api::{ApiGateway, ClientResult};
use crate::models::{DatasetSummary, Session, TrendSeries, TypeShare};

/// Shown when history cannot be loaded and the server gave no reason
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load data. Please ensure the backend is running.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChartKind {
    #[default]
    Bar,
    Doughnut,
    Trends,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [ChartKind::Bar, ChartKind::Doughnut, ChartKind::Trends];

    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::Bar => "Bar Chart",
            ChartKind::Doughnut => "Doughnut",
            ChartKind::Trends => "Trends",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ChartKind::Bar => "Equipment Type Distribution",
            ChartKind::Doughnut => "Equipment Breakdown",
            ChartKind::Trends => "Parameter Trends Across Datasets",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChartKind::Bar => "bar",
            ChartKind::Doughnut => "doughnut",
            ChartKind::Trends => "trends",
        };
        f.write_str(name)
    }
}

impl FromStr for ChartKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bar" => Ok(ChartKind::Bar),
            "doughnut" | "pie" => Ok(ChartKind::Doughnut),
            "trends" | "trend" | "line" => Ok(ChartKind::Trends),
            other => Err(format!("Unknown chart type: {} (expected bar, doughnut or trends)", other)),
        }
    }
}

/// What the selected chart plots
#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
    /// Latest dataset's types, as bars or doughnut segments
    Distribution(Vec<TypeShare>),
    /// Averages of every dataset, oldest first
    Trend(TrendSeries),
}

/// Render decision for the view
#[derive(Debug, Clone, PartialEq)]
pub enum ChartsDisplay<'a> {
    Loading,
    /// Error text; the view shows a Retry control
    Failed(&'a str),
    Empty,
    Ready {
        kind: ChartKind,
        chart: ChartData,
        /// Shown as the quick summary under the chart
        latest: &'a DatasetSummary,
    },
}

#[derive(Debug, Clone, Default)]
pub struct ChartsView {
    history: LoadState<Vec<DatasetSummary>>,
    kind: ChartKind,
}

impl ChartsView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    /// Switch the visible chart. Works on the loaded history only.
    pub fn select_kind(&mut self, kind: ChartKind) {
        self.kind = kind;
    }

    pub fn history(&self) -> &LoadState<Vec<DatasetSummary>> {
        &self.history
    }

    pub fn begin_load(&mut self) {
        self.history = LoadState::Loading;
    }

    pub fn finish_load(&mut self, result: ClientResult<Vec<DatasetSummary>>) {
        self.history = LoadState::settle(result, LOAD_FAILED_MESSAGE);
    }

    /// Fetch history (on mount and on retry)
    pub async fn load<A: ApiGateway + ?Sized>(&mut self, api: &A, session: Option<&Session>) {
        self.begin_load();
        self.finish_load(api.list_history(session).await);
    }

    pub fn display(&self) -> ChartsDisplay<'_> {
        let history = match &self.history {
            LoadState::Loading => return ChartsDisplay::Loading,
            LoadState::Failed(message) => return ChartsDisplay::Failed(message),
            LoadState::Loaded(history) => history,
        };

        let Some(latest) = history.first() else {
            return ChartsDisplay::Empty;
        };

        let chart = match self.kind {
            ChartKind::Bar | ChartKind::Doughnut => ChartData::Distribution(latest.type_shares()),
            ChartKind::Trends => ChartData::Trend(TrendSeries::from_history(history)),
        };

        ChartsDisplay::Ready {
            kind: self.kind,
            chart,
            latest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ClientError;
    use crate::models::fixtures::{pump_valve, summary};
    use crate::testing::ScriptedGateway;

    #[tokio::test]
    async fn test_backend_down_shows_retry_state() {
        let api = ScriptedGateway::new()
            .on_history(Err(ClientError::Network("connection refused".to_string())));
        let mut view = ChartsView::new();
        assert_eq!(view.display(), ChartsDisplay::Loading);

        view.load(&api, None).await;
        assert_eq!(view.display(), ChartsDisplay::Failed(LOAD_FAILED_MESSAGE));
    }

    #[tokio::test]
    async fn test_retry_refetches() {
        let api = ScriptedGateway::new()
            .on_history(Err(ClientError::Network("down".to_string())))
            .on_history(Ok(vec![pump_valve()]));
        let mut view = ChartsView::new();

        view.load(&api, None).await;
        view.load(&api, None).await;
        assert_eq!(api.call_count(), 2);
        assert!(matches!(view.display(), ChartsDisplay::Ready { .. }));
    }

    #[tokio::test]
    async fn test_toggle_never_fetches() {
        let history = vec![pump_valve(), summary(4, &[("Tank", 4)], (1.0, 2.0, 3.0))];
        let api = ScriptedGateway::new().on_history(Ok(history));
        let mut view = ChartsView::new();
        view.load(&api, None).await;

        for kind in [ChartKind::Doughnut, ChartKind::Trends, ChartKind::Bar, ChartKind::Trends] {
            view.select_kind(kind);
            match view.display() {
                ChartsDisplay::Ready { kind: shown, .. } => assert_eq!(shown, kind),
                other => panic!("expected chart, got {:?}", other),
            }
        }
        assert_eq!(api.call_count(), 1);
    }

    #[tokio::test]
    async fn test_projections() {
        let older = summary(4, &[("Tank", 4)], (1.0, 2.0, 3.0));
        let api = ScriptedGateway::new().on_history(Ok(vec![pump_valve(), older]));
        let mut view = ChartsView::new();
        view.load(&api, None).await;

        assert_eq!(view.kind(), ChartKind::Bar);
        match view.display() {
            ChartsDisplay::Ready { chart: ChartData::Distribution(shares), latest, .. } => {
                assert_eq!(shares[0].name, "Pump");
                assert_eq!(latest.total_equipment, 10);
            }
            other => panic!("unexpected {:?}", other),
        }

        view.select_kind(ChartKind::Trends);
        match view.display() {
            ChartsDisplay::Ready { chart: ChartData::Trend(trend), .. } => {
                assert_eq!(trend.labels, vec!["Dataset 1", "Dataset 2"]);
                assert_eq!(trend.flowrate, vec![1.0, 12.5]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_history() {
        let api = ScriptedGateway::new().on_history(Ok(Vec::new()));
        let mut view = ChartsView::new();
        view.load(&api, None).await;
        assert_eq!(view.display(), ChartsDisplay::Empty);
    }

    #[test]
    fn test_parse_chart_kind() {
        assert_eq!("Doughnut".parse::<ChartKind>(), Ok(ChartKind::Doughnut));
        assert_eq!("line".parse::<ChartKind>(), Ok(ChartKind::Trends));
        assert!("scatter".parse::<ChartKind>().is_err());
        assert_eq!(ChartKind::Trends.to_string(), "trends");
    }
}
