//! Quick stats side panel.

use crate::api::{ApiGateway, ClientResult};
use crate::models::{DatasetSummary, QuickStats, Session};

pub const NO_ACTIVITY_MESSAGE: &str = "No recent activity";

/// Fetch history for the side panel. Best effort: any failure is logged and
/// yields the empty panel.
pub async fn load_quick_stats<A: ApiGateway + ?Sized>(
    api: &A,
    session: Option<&Session>,
) -> QuickStats {
    quick_stats_from(api.list_history(session).await)
}

/// Panel figures for a settled history fetch; a failure yields the empty panel
pub fn quick_stats_from(result: ClientResult<Vec<DatasetSummary>>) -> QuickStats {
    match result {
        Ok(history) => QuickStats::from_history(&history),
        Err(e) => {
            tracing::warn!("Quick stats unavailable: {}", e);
            QuickStats::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ClientError;
    use crate::models::fixtures::pump_valve;
    use crate::testing::ScriptedGateway;

    #[tokio::test]
    async fn test_failure_degrades_to_zeros() {
        let api = ScriptedGateway::new().on_history(Err(ClientError::Network("down".into())));
        let stats = load_quick_stats(&api, None).await;
        assert_eq!(stats.total_uploads, 0);
        assert_eq!(stats.avg_equipment, 0);
        assert!(stats.recent.is_empty());
    }

    #[test]
    fn test_settled_failure_gives_empty_panel() {
        let stats = quick_stats_from(Err(ClientError::Fetch(Some("Invalid token.".into()))));
        assert_eq!(stats, QuickStats::default());

        let stats = quick_stats_from(Ok(vec![pump_valve()]));
        assert_eq!(stats.total_uploads, 1);
    }

    #[tokio::test]
    async fn test_stats_from_history() {
        let api = ScriptedGateway::new().on_history(Ok(vec![pump_valve(), pump_valve()]));
        let stats = load_quick_stats(&api, None).await;
        assert_eq!(stats.total_uploads, 2);
        assert_eq!(stats.avg_equipment, 10);
        assert_eq!(stats.recent[0].action, "Dataset uploaded");
    }
}
