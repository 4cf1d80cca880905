use std::fmt;

/// Failure modes of a single ingestion attempt. Coercion fallbacks
/// (bad duration types and the like) are not errors: they resolve to
/// field defaults and only show up in the logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestError {
    /// The payload is absent or is not a JSON object.
    MalformedInput(String),
    /// The payload is an object but violates the ingestion rules listed.
    ValidationFailure(Vec<String>),
    /// Unexpected fault inside the pipeline; nothing was stored.
    Internal(String),
}

impl IngestError {
    pub fn rules(&self) -> Vec<String> {
        match self {
            IngestError::MalformedInput(msg) => vec![msg.clone()],
            IngestError::ValidationFailure(rules) => rules.clone(),
            IngestError::Internal(_) => vec![],
        }
    }
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestError::MalformedInput(msg) => write!(f, "malformed input: {}", msg),
            IngestError::ValidationFailure(rules) => {
                write!(f, "validation failed: {}", rules.join("; "))
            }
            IngestError::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl std::error::Error for IngestError {}
