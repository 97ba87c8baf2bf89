use super::config::MonitorConfig;
use super::monitors::NoopMonitor;
use super::types::{QueryContext, QueryMonitor, QueryResult};
use crate::client::CqlExecutor;
use crate::error::OrmResult;
use crate::value::Record;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// An executor that wraps another `CqlExecutor` with monitoring.
///
/// Monitoring must be explicitly enabled via `MonitorConfig::enable_monitoring()`.
pub struct InstrumentedExecutor<C> {
    client: C,
    monitor: Arc<dyn QueryMonitor>,
    config: MonitorConfig,
}

impl<C: CqlExecutor> InstrumentedExecutor<C> {
    /// Create a new instrumented executor with no monitoring.
    pub fn new(client: C) -> Self {
        Self {
            client,
            monitor: Arc::new(NoopMonitor),
            config: MonitorConfig::default(),
        }
    }

    /// Set the monitor configuration.
    pub fn with_config(mut self, config: MonitorConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the monitor.
    pub fn with_monitor<M: QueryMonitor + 'static>(mut self, monitor: M) -> Self {
        self.monitor = Arc::new(monitor);
        self
    }

    /// Set the monitor from an Arc.
    pub fn with_monitor_arc(mut self, monitor: Arc<dyn QueryMonitor>) -> Self {
        self.monitor = monitor;
        self
    }

    /// Set the slow statement threshold.
    pub fn with_slow_query_threshold(mut self, threshold: Duration) -> Self {
        self.config.slow_query_threshold = Some(threshold);
        self
    }

    pub fn enable_monitoring(mut self) -> Self {
        self.config.monitoring_enabled = true;
        self
    }

    pub fn disable_monitoring(mut self) -> Self {
        self.config.monitoring_enabled = false;
        self
    }

    pub fn is_monitoring_enabled(&self) -> bool {
        self.config.monitoring_enabled
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Get a reference to the inner executor.
    pub fn inner(&self) -> &C {
        &self.client
    }

    /// Get the inner executor, consuming this wrapper.
    pub fn into_inner(self) -> C {
        self.client
    }

    fn report_result(&self, ctx: &QueryContext, duration: Duration, result: &QueryResult) {
        self.monitor.on_query_complete(ctx, duration, result);

        if let Some(threshold) = self.config.slow_query_threshold {
            if duration > threshold {
                self.monitor.on_slow_query(ctx, duration);
            }
        }
    }
}

impl<C: CqlExecutor> CqlExecutor for InstrumentedExecutor<C> {
    async fn execute(&self, cql: &str) -> OrmResult<Vec<Record>> {
        if !self.config.monitoring_enabled {
            return self.client.execute(cql).await;
        }

        let ctx = QueryContext::new(cql);
        self.monitor.on_query_start(&ctx);

        let start = Instant::now();
        let result = self.client.execute(cql).await;
        let duration = start.elapsed();

        let query_result = match &result {
            Ok(rows) => QueryResult::Rows(rows.len()),
            Err(e) => QueryResult::error(e.to_string()),
        };

        self.report_result(&ctx, duration, &query_result);
        result
    }
}
