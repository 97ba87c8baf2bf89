//! A recording executor for tests.

use crate::client::CqlExecutor;
use crate::error::OrmResult;
use crate::value::Record;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Records every executed statement and replays queued responses in order.
///
/// When the queue is empty, statements succeed with no rows.
///
/// ```
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// use cassorm::{MockExecutor, QueryBuilder, record};
///
/// let mock = MockExecutor::new();
/// mock.push_rows(vec![record! { "id" => "a" }]);
///
/// let rows = QueryBuilder::new(&mock).table("users").find_all("*").await?;
/// assert_eq!(rows.len(), 1);
/// assert_eq!(mock.last_statement().as_deref(), Some("SELECT * FROM users  "));
/// # Ok::<(), cassorm::OrmError>(())
/// # }).unwrap();
/// ```
#[derive(Debug, Default)]
pub struct MockExecutor {
    executed: Mutex<Vec<String>>,
    responses: Mutex<VecDeque<OrmResult<Vec<Record>>>>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue rows for the next unanswered statement.
    pub fn push_rows(&self, rows: Vec<Record>) -> &Self {
        self.responses.lock().unwrap().push_back(Ok(rows));
        self
    }

    /// Queue an error for the next unanswered statement.
    pub fn push_error(&self, err: crate::error::OrmError) -> &Self {
        self.responses.lock().unwrap().push_back(Err(err));
        self
    }

    /// All statements executed so far, oldest first.
    pub fn statements(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }

    pub fn last_statement(&self) -> Option<String> {
        self.executed.lock().unwrap().last().cloned()
    }

    pub fn execution_count(&self) -> usize {
        self.executed.lock().unwrap().len()
    }

    /// Forget recorded statements and pending responses.
    pub fn reset(&self) {
        self.executed.lock().unwrap().clear();
        self.responses.lock().unwrap().clear();
    }
}

impl CqlExecutor for MockExecutor {
    async fn execute(&self, cql: &str) -> OrmResult<Vec<Record>> {
        self.executed.lock().unwrap().push(cql.to_string());
        let next = self.responses.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(Vec::new()))
    }
}
