//! Observability module for correlation and tracing

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Correlation ID for tracking one action call across its stages
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Create a new correlation ID
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CorrelationId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Per-call trace context.
///
/// Every entry point opens an `info_span!` populated from one of these, so all
/// stage logs of one call share `correlation_id`.
#[derive(Debug, Clone, Serialize)]
pub struct TraceContext {
    /// Correlation ID for request tracking
    pub correlation_id: CorrelationId,

    /// Operation name
    pub operation: &'static str,
}

impl TraceContext {
    /// Create a new trace context for an operation
    pub fn new(operation: &'static str) -> Self {
        Self {
            correlation_id: CorrelationId::new(),
            operation,
        }
    }

    /// Span carrying this context's fields
    pub fn span(&self) -> tracing::Span {
        tracing::info_span!(
            "action",
            operation = self.operation,
            correlation_id = %self.correlation_id,
        )
    }

    /// Get the correlation ID
    pub fn correlation_id(&self) -> &CorrelationId {
        &self.correlation_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_context_creation() {
        let ctx = TraceContext::new("create_token_account");
        assert!(!ctx.correlation_id().as_str().is_empty());
        assert_eq!(ctx.operation, "create_token_account");
    }

    #[test]
    fn test_correlation_ids_are_unique() {
        let a = TraceContext::new("op");
        let b = TraceContext::new("op");
        assert_ne!(a.correlation_id(), b.correlation_id());
    }

    #[test]
    fn test_correlation_id_from_str() {
        let id = CorrelationId::from("abc-123");
        assert_eq!(id.to_string(), "abc-123");
    }
}
