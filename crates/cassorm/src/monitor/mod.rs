//! Statement monitoring for CQL execution.
//!
//! [`InstrumentedExecutor`] wraps any [`CqlExecutor`](crate::CqlExecutor), times
//! every statement and reports it to a [`QueryMonitor`]:
//!
//! ```rust,ignore
//! use cassorm::monitor::{InstrumentedExecutor, MonitorConfig, StatsMonitor};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let stats = Arc::new(StatsMonitor::new());
//! let session = InstrumentedExecutor::new(session)
//!     .with_config(
//!         MonitorConfig::new()
//!             .with_slow_query_threshold(Duration::from_millis(200))
//!             .enable_monitoring(),
//!     )
//!     .with_monitor_arc(stats.clone());
//!
//! QueryBuilder::new(&session).table("users").find_all("*").await?;
//! println!("{:?}", stats.stats());
//! ```
//!
//! There is no timeout or cancellation here; the driver owns those.

mod config;
mod instrumented;
mod monitors;
mod types;

#[cfg(feature = "tracing")]
mod tracing_monitor;


pub use config::MonitorConfig;
pub use instrumented::InstrumentedExecutor;
pub use monitors::{CompositeMonitor, NoopMonitor, QueryStats, StatsMonitor};
pub use types::{QueryContext, QueryMonitor, QueryResult};

#[cfg(feature = "tracing")]
pub use tracing_monitor::TracingMonitor;

/// Cut `cql` to at most `max_bytes`, backing off to a char boundary.
pub fn truncate_cql(cql: &str, max_bytes: usize) -> &str {
    if cql.len() <= max_bytes {
        return cql;
    }
    let mut end = max_bytes;
    while end > 0 && !cql.is_char_boundary(end) {
        end -= 1;
    }
    &cql[..end]
}
