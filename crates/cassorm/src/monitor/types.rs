use crate::statement::StatementKind;
use std::fmt;
use std::time::Duration;

/// The statement being executed.
#[derive(Debug, Clone)]
pub struct QueryContext {
    /// CQL text sent to the executor.
    pub cql: String,
    /// Kind detected from the leading keyword.
    pub kind: StatementKind,
}

impl QueryContext {
    pub fn new(cql: &str) -> Self {
        Self {
            cql: cql.to_string(),
            kind: StatementKind::from_cql(cql),
        }
    }
}

/// Maximum length for error messages in `QueryResult::Error`.
const MAX_ERROR_LEN: usize = 512;

/// Outcome of one statement, as seen by monitors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryResult {
    /// The statement returned this many rows.
    Rows(usize),
    /// The statement failed (message truncated to 512 bytes).
    Error(String),
}

impl QueryResult {
    /// Create an error result, truncating long driver messages.
    pub fn error(msg: String) -> Self {
        if msg.len() > MAX_ERROR_LEN {
            Self::Error(format!("{}...", super::truncate_cql(&msg, MAX_ERROR_LEN)))
        } else {
            Self::Error(msg)
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, QueryResult::Error(_))
    }
}

impl fmt::Display for QueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryResult::Rows(n) => write!(f, "{n} rows"),
            QueryResult::Error(e) => write!(f, "error: {e}"),
        }
    }
}

/// Trait for observing statement execution.
///
/// Implement this to collect metrics or forward statements to a log pipeline.
pub trait QueryMonitor: Send + Sync {
    /// Called before a statement is executed.
    fn on_query_start(&self, _ctx: &QueryContext) {}

    /// Called after a statement completes, successfully or not.
    fn on_query_complete(&self, ctx: &QueryContext, duration: Duration, result: &QueryResult);

    /// Called when a statement exceeds the configured slow threshold.
    fn on_slow_query(&self, _ctx: &QueryContext, _duration: Duration) {}
}
