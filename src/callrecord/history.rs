use super::CallRecord;
use chrono::{DateTime, Utc};
use std::cmp::Reverse;
use std::collections::VecDeque;
use tokio::sync::Mutex;

pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Bounded in-memory call history with FIFO eviction. The single lock
/// covers append, snapshot and clear so readers always observe a state
/// that existed at one point in time. Nothing survives a restart.
pub struct HistoryStore {
    records: Mutex<VecDeque<CallRecord>>,
    limit: usize,
}

impl HistoryStore {
    pub fn new(limit: usize) -> Self {
        Self {
            records: Mutex::new(VecDeque::with_capacity(limit)),
            limit,
        }
    }

    pub async fn append(&self, record: CallRecord) {
        let mut records = self.records.lock().await;
        records.push_back(record);
        while records.len() > self.limit {
            records.pop_front();
        }
    }

    /// Current contents, newest first. Timestamps are server-assigned at
    /// ingestion so ties are rare; the stable sort keeps arrival order
    /// within a tie.
    pub async fn snapshot(&self) -> Vec<CallRecord> {
        let records = self.records.lock().await;
        let mut out: Vec<CallRecord> = records.iter().cloned().collect();
        out.sort_by_key(|r| Reverse(parse_timestamp(&r.timestamp)));
        out
    }

    pub async fn clear(&self) -> usize {
        let mut records = self.records.lock().await;
        records.clear();
        records.len()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

fn parse_timestamp(ts: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(ts)
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}
