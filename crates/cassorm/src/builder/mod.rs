//! CQL query builder.
//!
//! [`QueryBuilder`] is a value: fluent calls (`table`, `take`, `order_by`,
//! `with_id`, and the DDL chain `add_table` → `set_primary_key` / `add_primary_key`
//! → `with_fields`) consume the builder and return a new one. Terminal operations
//! (`create`, `find_by`, `update`, `delete`, ...) borrow it, build one
//! [`Statement`], and hand its text to the executor. Nothing a terminal operation
//! does is visible to the next call.
//!
//! ```ignore
//! let users = QueryBuilder::new(&session).table("users");
//!
//! let id = users.create(record! { "name" => "alice" }, true).await?;
//! let row = users.find_one_by(record! { "id" => id.as_str() }, "*").await?;
//! users.with_id(&id).update(record! { "name" => "bob" }, true).await?;
//!
//! QueryBuilder::new(&session)
//!     .add_table("media")
//!     .set_primary_key("id", "uuid")
//!     .with_fields([("name", "text"), ("size", "int")])
//!     .persist()
//!     .await?;
//! ```

mod crud;
mod table;

use crate::client::CqlExecutor;
use crate::error::{OrmError, OrmResult};
use crate::statement::{Order, Statement};
use crate::value::Record;

/// Fluent CQL builder bound to an executor.
#[derive(Debug, Clone)]
pub struct QueryBuilder<C> {
    client: C,
    table: Option<String>,
    id: Option<String>,
    limit: Option<u32>,
    order: Option<(String, Order)>,
    /// DDL statement assembled by the add_table/alter_table chain
    pending: Option<Statement>,
    /// Build error (validated on persist)
    build_error: Option<String>,
}

impl<C> QueryBuilder<C> {
    /// Create a builder with no table bound.
    pub fn new(client: C) -> Self {
        Self {
            client,
            table: None,
            id: None,
            limit: None,
            order: None,
            pending: None,
            build_error: None,
        }
    }

    /// The executor this builder sends statements to.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// A copy of this builder's state that borrows the executor.
    pub fn by_ref(&self) -> QueryBuilder<&C> {
        QueryBuilder {
            client: &self.client,
            table: self.table.clone(),
            id: self.id.clone(),
            limit: self.limit,
            order: self.order.clone(),
            pending: self.pending.clone(),
            build_error: self.build_error.clone(),
        }
    }

    /// Bind the table that CRUD operations and `create_index` target.
    pub fn table(mut self, name: impl Into<String>) -> Self {
        self.table = Some(name.into());
        self
    }

    /// Cap the number of rows returned by `find_by` / `find_all`.
    ///
    /// A limit of zero means no limit.
    pub fn take(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Append `ORDER BY field direction` to selects.
    pub fn order_by(mut self, field: impl Into<String>, order: Order) -> Self {
        self.order = Some((field.into(), order));
        self
    }

    /// Bind the row id targeted by `update`.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn table_name(&self) -> Option<&str> {
        self.table.as_deref()
    }

    pub fn limit(&self) -> Option<u32> {
        self.limit
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn ordering(&self) -> Option<(&str, Order)> {
        self.order.as_ref().map(|(f, o)| (f.as_str(), *o))
    }

    /// The statement assembled by the DDL chain, if any.
    pub fn pending(&self) -> Option<&Statement> {
        self.pending.as_ref()
    }

    /// The finished DDL statement, or the error `persist` would report.
    pub fn pending_statement(&self) -> OrmResult<&Statement> {
        if let Some(err) = &self.build_error {
            return Err(OrmError::validation(err.clone()));
        }
        self.pending
            .as_ref()
            .ok_or_else(|| OrmError::validation("no statement to persist"))
    }

    /// Render the pending statement (empty when nothing is pending).
    pub fn to_cql(&self) -> String {
        self.pending
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    fn bound_table(&self) -> OrmResult<String> {
        self.table
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| OrmError::validation("no table bound (call table first)"))
    }
}

impl<C: CqlExecutor> QueryBuilder<C> {
    /// Execute the pending statement verbatim.
    pub async fn persist(&self) -> OrmResult<Vec<Record>> {
        let statement = self.pending_statement()?;
        self.run(statement).await
    }

    /// Validate, render and execute one statement.
    pub async fn run(&self, statement: &Statement) -> OrmResult<Vec<Record>> {
        statement.validate()?;
        let cql = statement.to_string();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "cassorm.cql",
            kind = ?statement.kind(),
            cql = %crate::monitor::truncate_cql(&cql, 512),
            "executing statement"
        );

        let result = self.client.execute(&cql).await;

        #[cfg(feature = "tracing")]
        if let Err(err) = &result {
            tracing::warn!(target: "cassorm.cql", kind = ?statement.kind(), error = %err, "statement failed");
        }

        result
    }
}

#[cfg(test)]
mod tests;
