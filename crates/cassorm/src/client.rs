//! Statement executor trait.

use crate::error::OrmResult;
use crate::value::Record;
use std::sync::Arc;

/// Anything that can run a literal CQL statement and hand back its rows.
///
/// The driver owns the protocol, pooling and consistency handling; this layer only
/// sends text. Errors are propagated unchanged: nothing here retries or classifies
/// them. Statements that produce no rows (DDL, writes) return an empty vector.
pub trait CqlExecutor: Send + Sync {
    /// Execute a statement and return all rows.
    fn execute(
        &self,
        cql: &str,
    ) -> impl std::future::Future<Output = OrmResult<Vec<Record>>> + Send;
}

impl<T: CqlExecutor> CqlExecutor for &T {
    fn execute(
        &self,
        cql: &str,
    ) -> impl std::future::Future<Output = OrmResult<Vec<Record>>> + Send {
        (**self).execute(cql)
    }
}

impl<T: CqlExecutor> CqlExecutor for Arc<T> {
    fn execute(
        &self,
        cql: &str,
    ) -> impl std::future::Future<Output = OrmResult<Vec<Record>>> + Send {
        (**self).execute(cql)
    }
}
