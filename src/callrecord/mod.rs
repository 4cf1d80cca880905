use crate::error::IngestError;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

pub mod classifier;
pub mod history;
pub mod stats;

pub use history::HistoryStore;
pub use stats::{compute_stats, StatsSummary};

/// Source key fallback chains. The platform has shipped several payload
/// schemas over time; the first present, non-empty key wins.
const ID_KEYS: &[&str] = &["call_id", "id"];
const TRANSCRIPT_KEYS: &[&str] = &["transcript", "conversation", "audio_text"];
const SUMMARY_KEYS: &[&str] = &["summary", "call_summary", "analysis"];
const USER_KEYS: &[&str] = &["user_id", "user", "customer_id"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn parse(s: &str) -> Option<Priority> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            "urgent" => Some(Priority::Urgent),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical call event, immutable once created. `raw_payload` keeps the
/// untouched inbound object for audit and debugging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallRecord {
    pub id: String,
    pub timestamp: String,
    pub transcript: String,
    pub summary: String,
    pub category: String,
    pub priority: Priority,
    pub user_id: String,
    pub duration: i64,
    pub status: String,
    pub sentiment: String,
    pub language: String,
    pub raw_payload: Value,
}

impl CallRecord {
    /// Normalizes an arbitrary inbound payload into a canonical record,
    /// classifying category and priority from the transcript when the
    /// source does not supply them. Pure apart from clock and id
    /// generation; the input is captured verbatim in `raw_payload`.
    pub fn from_payload(raw: Value) -> Result<CallRecord, IngestError> {
        let obj = match raw.as_object() {
            Some(obj) => obj,
            None => {
                return Err(IngestError::MalformedInput(format!(
                    "payload must be a JSON object, got {}",
                    value_kind(&raw)
                )))
            }
        };

        let id = first_non_empty(obj, ID_KEYS);
        let transcript = first_non_empty(obj, TRANSCRIPT_KEYS);
        let summary = first_non_empty(obj, SUMMARY_KEYS);

        if id.is_none() && transcript.is_none() && summary.is_none() {
            return Err(IngestError::ValidationFailure(vec![format!(
                "at least one of {}, {} or {} must be present",
                ID_KEYS.join("/"),
                TRANSCRIPT_KEYS.join("/"),
                SUMMARY_KEYS.join("/")
            )]));
        }

        let transcript = transcript.unwrap_or_default();
        let explicit_category = first_non_empty(obj, &["category"]);
        let explicit_priority = first_non_empty(obj, &["priority"]).and_then(|s| {
            let parsed = Priority::parse(&s);
            if parsed.is_none() {
                warn!("unknown priority {:?} in payload, will classify from transcript", s);
            }
            parsed
        });

        let (category, priority) = classifier::classify(
            &transcript,
            explicit_category.as_deref(),
            explicit_priority,
        );

        Ok(CallRecord {
            id: id.unwrap_or_else(|| format!("call-{}", Uuid::new_v4().simple())),
            timestamp: Utc::now().to_rfc3339(),
            transcript,
            summary: summary.unwrap_or_default(),
            category,
            priority,
            user_id: first_non_empty(obj, USER_KEYS).unwrap_or_default(),
            duration: coerce_duration(obj.get("duration")),
            status: first_non_empty(obj, &["status"]).unwrap_or_else(|| "completed".to_string()),
            sentiment: first_non_empty(obj, &["sentiment"])
                .unwrap_or_else(|| "neutral".to_string()),
            language: first_non_empty(obj, &["language"]).unwrap_or_else(|| "en".to_string()),
            raw_payload: raw,
        })
    }
}

/// Walks a fallback chain and returns the first present, non-empty value.
/// Numbers are accepted and stringified; other types are skipped with a log
/// line. Never fails on a missing key.
fn first_non_empty(obj: &serde_json::Map<String, Value>, keys: &[&str]) -> Option<String> {
    for key in keys {
        match obj.get(*key) {
            Some(Value::String(s)) if !s.trim().is_empty() => return Some(s.clone()),
            Some(Value::Number(n)) => return Some(n.to_string()),
            Some(Value::String(_)) | Some(Value::Null) | None => {}
            Some(other) => {
                warn!("ignoring {} with unexpected type {}", key, value_kind(other));
            }
        }
    }
    None
}

/// Duration arrives as a number, a numeric string, or garbage. Anything
/// that does not coerce to a non-negative integer becomes 0.
fn coerce_duration(value: Option<&Value>) -> i64 {
    let seconds = match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => match s.trim().parse::<i64>() {
            Ok(v) => v,
            Err(_) => {
                warn!("non-numeric duration {:?}, defaulting to 0", s);
                0
            }
        },
        Some(Value::Null) | None => 0,
        Some(other) => {
            warn!("duration has unexpected type {}, defaulting to 0", value_kind(other));
            0
        }
    };
    if seconds < 0 {
        warn!("negative duration {}, defaulting to 0", seconds);
        0
    } else {
        seconds
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
