//! Data Model
//!
//! Records exchanged with the equipment API. Summaries are computed by the
//! backend; the client only reads them and derives display values
//! (shares, trend series, report ids) from what it was given.

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// An authenticated user: credential plus display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub username: String,
}

impl Session {
    pub fn new(token: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            username: username.into(),
        }
    }
}

/// Count of one equipment type within a dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeCount {
    pub name: String,
    pub count: u64,
}

/// Equipment type -> count, in the order the server sent it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeDistribution(Vec<TypeCount>);

impl TypeDistribution {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Add or overwrite a type's count, keeping first-seen order
    pub fn insert(&mut self, name: impl Into<String>, count: u64) {
        let name = name.into();
        match self.0.iter_mut().find(|entry| entry.name == name) {
            Some(entry) => entry.count = count,
            None => self.0.push(TypeCount { name, count }),
        }
    }

    pub fn get(&self, name: &str) -> Option<u64> {
        self.0.iter().find(|entry| entry.name == name).map(|entry| entry.count)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeCount> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.0.iter().map(|entry| entry.count).sum()
    }

    /// `"<type>: <count>"` labels, one per entry
    pub fn badges(&self) -> Vec<String> {
        self.0
            .iter()
            .map(|entry| format!("{}: {}", entry.name, entry.count))
            .collect()
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for TypeDistribution {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut distribution = TypeDistribution::new();
        for (name, count) in iter {
            distribution.insert(name, count);
        }
        distribution
    }
}

impl Serialize for TypeDistribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|entry| (&entry.name, entry.count)))
    }
}

impl<'de> Deserialize<'de> for TypeDistribution {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DistributionVisitor;

        impl<'de> Visitor<'de> for DistributionVisitor {
            type Value = TypeDistribution;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of equipment type to count")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut distribution = TypeDistribution::new();
                while let Some((name, count)) = map.next_entry::<String, u64>()? {
                    distribution.insert(name, count);
                }
                Ok(distribution)
            }

            // `null` from the server renders the same as a missing field
            fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
                Ok(TypeDistribution::new())
            }
        }

        deserializer.deserialize_any(DistributionVisitor)
    }
}

/// Summary of one uploaded dataset (an upload result or a history entry)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub total_equipment: u64,
    pub avg_flowrate: f64,
    pub avg_pressure: f64,
    pub avg_temperature: f64,
    #[serde(default)]
    pub type_distribution: TypeDistribution,
}

/// One type's slice of a dataset, for proportional bars and segments
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeShare {
    pub name: String,
    pub count: u64,
    /// Fraction in `[0, 1]` of the dataset's total equipment
    pub share: f64,
}

impl TypeShare {
    pub fn percent(&self) -> f64 {
        self.share * 100.0
    }
}

impl DatasetSummary {
    /// True when the type counts add up to the equipment total
    pub fn is_consistent(&self) -> bool {
        self.type_distribution.total() == self.total_equipment
    }

    /// Each type's count relative to `total_equipment` (0 when the total is 0)
    pub fn type_shares(&self) -> Vec<TypeShare> {
        self.type_distribution
            .iter()
            .map(|entry| TypeShare {
                name: entry.name.clone(),
                count: entry.count,
                share: if self.total_equipment == 0 {
                    0.0
                } else {
                    entry.count as f64 / self.total_equipment as f64
                },
            })
            .collect()
    }
}

/// Server-assigned dataset identifier, used to address reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DatasetId(pub u64);

impl DatasetId {
    /// File name the report is saved under
    pub fn report_filename(&self) -> String {
        format!("equipment_report_{}.pdf", self.0)
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Dataset id for the row at `index` of a most-recent-first history of
/// `history_len` entries.
///
/// The backend hands out ascending ids at upload time while history is
/// listed newest first, so row `i` of `N` addresses dataset `N - i`.
pub fn report_id(history_len: usize, index: usize) -> Option<DatasetId> {
    if index >= history_len {
        return None;
    }
    Some(DatasetId((history_len - index) as u64))
}

/// A downloaded report document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub dataset_id: DatasetId,
    pub bytes: Vec<u8>,
}

impl Report {
    pub fn filename(&self) -> String {
        self.dataset_id.report_filename()
    }
}

/// Averages across datasets, oldest to newest
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrendSeries {
    /// `Dataset 1` .. `Dataset N`
    pub labels: Vec<String>,
    pub flowrate: Vec<f64>,
    pub pressure: Vec<f64>,
    pub temperature: Vec<f64>,
}

impl TrendSeries {
    /// Build from a most-recent-first history
    pub fn from_history(history: &[DatasetSummary]) -> Self {
        let mut series = TrendSeries::default();
        for (position, summary) in history.iter().rev().enumerate() {
            series.labels.push(format!("Dataset {}", position + 1));
            series.flowrate.push(summary.avg_flowrate);
            series.pressure.push(summary.avg_pressure);
            series.temperature.push(summary.avg_temperature);
        }
        series
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Named series in legend order
    pub fn series(&self) -> [(&'static str, &[f64]); 3] {
        [
            ("Avg Flowrate", self.flowrate.as_slice()),
            ("Avg Pressure", self.pressure.as_slice()),
            ("Avg Temperature", self.temperature.as_slice()),
        ]
    }
}

/// Aggregates for the side panel
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QuickStats {
    pub total_uploads: usize,
    /// Mean `total_equipment` across the history, rounded
    pub avg_equipment: u64,
    pub recent: Vec<Activity>,
}

/// One line of the recent-activity feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Activity {
    pub action: String,
    pub details: String,
}

/// Number of entries shown in the recent-activity feed
pub const RECENT_ACTIVITY_LIMIT: usize = 3;

impl QuickStats {
    pub fn from_history(history: &[DatasetSummary]) -> Self {
        if history.is_empty() {
            return QuickStats::default();
        }

        let equipment: u64 = history.iter().map(|d| d.total_equipment).sum();
        let avg_equipment = (equipment as f64 / history.len() as f64).round() as u64;

        let recent = history
            .iter()
            .take(RECENT_ACTIVITY_LIMIT)
            .map(|d| Activity {
                action: "Dataset uploaded".to_string(),
                details: format!("{} equipment items", d.total_equipment),
            })
            .collect();

        QuickStats {
            total_uploads: history.len(),
            avg_equipment,
            recent,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_summary_from_json_keeps_type_order() {
        let json = r#"{
            "total_equipment": 15,
            "avg_flowrate": 120.5,
            "avg_pressure": 6.2,
            "avg_temperature": 110.0,
            "type_distribution": {"Valve": 4, "Pump": 6, "Reactor": 5}
        }"#;

        let summary: DatasetSummary = serde_json::from_str(json).unwrap();
        let names: Vec<_> = summary.type_distribution.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Valve", "Pump", "Reactor"]);
        assert_eq!(summary.type_distribution.get("Pump"), Some(6));
        assert!(summary.is_consistent());
    }

    #[test]
    fn test_missing_or_null_distribution_is_empty() {
        let json = r#"{"total_equipment": 0, "avg_flowrate": 0.0, "avg_pressure": 0.0, "avg_temperature": 0.0}"#;
        let summary: DatasetSummary = serde_json::from_str(json).unwrap();
        assert!(summary.type_distribution.is_empty());

        let json = r#"{"total_equipment": 0, "avg_flowrate": 0.0, "avg_pressure": 0.0,
                       "avg_temperature": 0.0, "type_distribution": null}"#;
        let summary: DatasetSummary = serde_json::from_str(json).unwrap();
        assert!(summary.type_distribution.is_empty());
    }

    #[test]
    fn test_distribution_serializes_as_map() {
        let value = serde_json::to_value(pump_valve()).unwrap();
        assert_eq!(value["type_distribution"]["Pump"], 6);
        assert_eq!(value["type_distribution"]["Valve"], 4);
    }

    #[test]
    fn test_type_shares() {
        let shares = pump_valve().type_shares();
        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].name, "Pump");
        assert!((shares[0].share - 0.6).abs() < 1e-9);
        assert!((shares[1].percent() - 40.0).abs() < 1e-9);

        let empty = summary(0, &[("Pump", 0)], (0.0, 0.0, 0.0));
        assert_eq!(empty.type_shares()[0].share, 0.0);
    }

    #[test]
    fn test_inconsistent_summary_detected() {
        let summary = summary(12, &[("Pump", 6), ("Valve", 4)], (1.0, 1.0, 1.0));
        assert!(!summary.is_consistent());
    }

    #[test]
    fn test_report_id_derivation() {
        assert_eq!(report_id(1, 0), Some(DatasetId(1)));
        assert_eq!(report_id(5, 0), Some(DatasetId(5)));
        assert_eq!(report_id(5, 4), Some(DatasetId(1)));
        assert_eq!(report_id(5, 5), None);
        assert_eq!(report_id(0, 0), None);

        for n in 1..20 {
            for i in 0..n {
                assert_eq!(report_id(n, i), Some(DatasetId((n - i) as u64)));
            }
        }
    }

    #[test]
    fn test_report_filename() {
        assert_eq!(DatasetId(7).report_filename(), "equipment_report_7.pdf");
        let report = Report { dataset_id: DatasetId(3), bytes: vec![1, 2, 3] };
        assert_eq!(report.filename(), "equipment_report_3.pdf");
    }

    #[test]
    fn test_trend_series_runs_oldest_to_newest() {
        let history = vec![
            summary(3, &[], (30.0, 3.0, 300.0)),
            summary(2, &[], (20.0, 2.0, 200.0)),
            summary(1, &[], (10.0, 1.0, 100.0)),
        ];

        let trend = TrendSeries::from_history(&history);
        assert_eq!(trend.labels, vec!["Dataset 1", "Dataset 2", "Dataset 3"]);
        assert_eq!(trend.flowrate, vec![10.0, 20.0, 30.0]);
        assert_eq!(trend.pressure, vec![1.0, 2.0, 3.0]);
        assert_eq!(trend.temperature, vec![100.0, 200.0, 300.0]);
        assert_eq!(trend.series()[2].0, "Avg Temperature");
    }

    #[test]
    fn test_quick_stats() {
        let history = vec![
            summary(10, &[], (0.0, 0.0, 0.0)),
            summary(15, &[], (0.0, 0.0, 0.0)),
            summary(20, &[], (0.0, 0.0, 0.0)),
            summary(4, &[], (0.0, 0.0, 0.0)),
        ];

        let stats = QuickStats::from_history(&history);
        assert_eq!(stats.total_uploads, 4);
        // 49 / 4 = 12.25
        assert_eq!(stats.avg_equipment, 12);
        assert_eq!(stats.recent.len(), RECENT_ACTIVITY_LIMIT);
        assert_eq!(stats.recent[0].details, "10 equipment items");

        assert_eq!(QuickStats::from_history(&[]), QuickStats::default());
    }

    #[test]
    fn test_badges() {
        assert_eq!(pump_valve().type_distribution.badges(), vec!["Pump: 6", "Valve: 4"]);
    }
}
