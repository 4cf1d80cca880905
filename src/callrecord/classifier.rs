use super::Priority;

/// Category keyword sets, tested in this order; first match wins.
const CATEGORIES: &[(&str, &[&str])] = &[
    ("technical", &["technical", "error", "bug", "issue"]),
    ("billing", &["billing", "payment", "charge", "invoice"]),
    ("service", &["service", "support", "help"]),
    ("product", &["product", "feature", "upgrade"]),
];

const URGENT_KEYWORDS: &[&str] = &["urgent", "emergency", "critical", "immediate", "asap"];
const HIGH_KEYWORDS: &[&str] = &["important", "serious", "problem", "issue", "broken"];

pub const DEFAULT_CATEGORY: &str = "other";

/// Derives category and priority from the transcript when the source did
/// not supply them. An explicit category always passes through; an
/// explicit priority passes through unless it is the default `medium`,
/// in which case the transcript may still escalate it. Deterministic,
/// case-insensitive substring matching.
pub fn classify(
    transcript: &str,
    explicit_category: Option<&str>,
    explicit_priority: Option<Priority>,
) -> (String, Priority) {
    let category = match explicit_category {
        Some(c) if !c.trim().is_empty() => c.to_string(),
        _ => classify_category(transcript).to_string(),
    };
    let priority = match explicit_priority {
        Some(p) if p != Priority::Medium => p,
        _ if transcript.is_empty() => Priority::Medium,
        _ => classify_priority(transcript),
    };
    (category, priority)
}

pub fn classify_category(transcript: &str) -> &'static str {
    let text = transcript.to_lowercase();
    for (category, keywords) in CATEGORIES {
        if keywords.iter().any(|kw| text.contains(kw)) {
            return category;
        }
    }
    DEFAULT_CATEGORY
}

pub fn classify_priority(transcript: &str) -> Priority {
    let text = transcript.to_lowercase();
    if URGENT_KEYWORDS.iter().any(|kw| text.contains(kw)) {
        Priority::Urgent
    } else if HIGH_KEYWORDS.iter().any(|kw| text.contains(kw)) {
        Priority::High
    } else {
        Priority::Medium
    }
}
