use super::{CallRecord, Priority};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Aggregate view over the current history. Derived on every request,
/// never stored. The count maps keep first-occurrence key order, which
/// relies on serde_json's `preserve_order` feature.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub total: usize,
    pub avg_duration: f64,
    pub success_rate: f64,
    pub urgent_count: usize,
    pub category_counts: Map<String, Value>,
    pub priority_counts: Map<String, Value>,
}

pub fn compute_stats(records: &[CallRecord]) -> StatsSummary {
    if records.is_empty() {
        return StatsSummary::default();
    }

    let total = records.len();
    let duration_sum: i64 = records.iter().map(|r| r.duration).sum();
    let completed = records.iter().filter(|r| r.status == "completed").count();
    let urgent_count = records
        .iter()
        .filter(|r| r.priority == Priority::Urgent)
        .count();

    StatsSummary {
        total,
        avg_duration: round2(duration_sum as f64 / total as f64),
        success_rate: round2(100.0 * completed as f64 / total as f64),
        urgent_count,
        category_counts: tally(records.iter().map(|r| r.category.as_str())),
        priority_counts: tally(records.iter().map(|r| r.priority.as_str())),
    }
}

fn tally<'a>(values: impl Iterator<Item = &'a str>) -> Map<String, Value> {
    let mut counts = Map::new();
    for value in values {
        let slot = counts
            .entry(value.to_string())
            .or_insert_with(|| Value::from(0u64));
        *slot = Value::from(slot.as_u64().unwrap_or(0) + 1);
    }
    counts
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
