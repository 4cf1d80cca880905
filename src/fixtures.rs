use crate::app::AppState;
use rand::prelude::*;
use serde_json::{json, Value};
use tracing::warn;
use uuid::Uuid;

const SAMPLE_TRANSCRIPTS: &[&str] = &[
    "I was charged twice on my last invoice, please check the payment",
    "The app keeps showing an error when I log in",
    "Can you help me set up the new integration",
    "I would like to upgrade my plan to the premium feature set",
    "Just calling to say the service has been great",
    "My dashboard is broken and this is a serious problem",
];

const SAMPLE_STATUSES: &[&str] = &["completed", "completed", "completed", "failed"];
const SAMPLE_SENTIMENTS: &[&str] = &["positive", "neutral", "negative"];

/// Seeds `count` randomized sample records plus one fixed urgent record,
/// all pushed through the real ingestion pipeline so they satisfy the
/// same invariants as live webhook traffic. Returns the number of
/// records actually stored.
pub async fn seed_samples(state: &AppState, count: usize) -> usize {
    let mut payloads: Vec<Value> = {
        let mut rng = rand::rng();
        (0..count)
            .map(|_| {
                json!({
                    "call_id": format!("sample-{}", Uuid::new_v4().simple()),
                    "transcript": SAMPLE_TRANSCRIPTS.choose(&mut rng).copied().unwrap_or(""),
                    "summary": "Synthetic sample call",
                    "user_id": format!("user-{}", rng.random_range(1..=20)),
                    "duration": rng.random_range(30..600),
                    "status": SAMPLE_STATUSES.choose(&mut rng).copied().unwrap_or("completed"),
                    "sentiment": SAMPLE_SENTIMENTS.choose(&mut rng).copied().unwrap_or("neutral"),
                })
            })
            .collect()
    };

    payloads.push(json!({
        "call_id": format!("sample-{}", Uuid::new_v4().simple()),
        "transcript": "The production system is down, this is an emergency",
        "summary": "Escalated outage report",
        "user_id": "user-0",
        "duration": 480,
        "status": "completed",
        "sentiment": "negative",
    }));

    let mut seeded = 0;
    for payload in payloads {
        match state.ingest(payload).await {
            Ok(_) => seeded += 1,
            Err(e) => warn!("sample record rejected: {}", e),
        }
    }
    seeded
}
