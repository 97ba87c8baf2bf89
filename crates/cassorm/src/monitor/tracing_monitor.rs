use super::truncate_cql;
use super::types::{QueryContext, QueryMonitor, QueryResult};
use std::time::Duration;

/// A `tracing`-based monitor.
///
/// Completed statements are emitted at `debug` (failures at `warn`) and slow
/// statements at `warn`, all on target `cassorm.cql`.
///
/// Enable via the crate feature: `cassorm = { features = ["tracing"] }`.
#[derive(Debug, Clone)]
pub struct TracingMonitor {
    /// Truncate long CQL strings (in bytes). `None` means no truncation.
    pub max_cql_length: Option<usize>,
}

impl Default for TracingMonitor {
    fn default() -> Self {
        Self {
            max_cql_length: Some(200),
        }
    }
}

impl TracingMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum CQL length to display.
    pub fn max_cql_length(mut self, len: usize) -> Self {
        self.max_cql_length = Some(len);
        self
    }

    /// Disable CQL truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_cql_length = None;
        self
    }

    pub(crate) fn display_cql(&self, cql: &str) -> String {
        match self.max_cql_length {
            Some(max) if cql.len() > max => format!("{}...", truncate_cql(cql, max)),
            _ => cql.to_string(),
        }
    }
}

impl QueryMonitor for TracingMonitor {
    fn on_query_complete(&self, ctx: &QueryContext, duration: Duration, result: &QueryResult) {
        let cql = self.display_cql(&ctx.cql);
        match result {
            QueryResult::Error(error) => tracing::warn!(
                target: "cassorm.cql",
                kind = ?ctx.kind,
                ?duration,
                error = %error,
                cql = %cql,
                "statement failed"
            ),
            QueryResult::Rows(rows) => tracing::debug!(
                target: "cassorm.cql",
                kind = ?ctx.kind,
                ?duration,
                rows,
                cql = %cql,
                "statement completed"
            ),
        }
    }

    fn on_slow_query(&self, ctx: &QueryContext, duration: Duration) {
        tracing::warn!(
            target: "cassorm.cql",
            kind = ?ctx.kind,
            ?duration,
            cql = %self.display_cql(&ctx.cql),
            "slow statement"
        );
    }
}
