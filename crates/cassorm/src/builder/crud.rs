use super::QueryBuilder;
use crate::client::CqlExecutor;
use crate::error::{OrmError, OrmResult};
use crate::statement::{Fields, Statement};
use crate::value::{Record, Value};
use uuid::Uuid;

/// Columns stamped by `create` / `update` when timestamps are enabled.
pub const CREATED_AT: &str = "created_at";
pub const UPDATED_AT: &str = "updated_at";

/// Current local time, truncated to whole seconds by the timestamp format.
pub fn current_timestamp() -> Value {
    Value::Timestamp(chrono::Local::now().naive_local())
}

/// A fresh version-4 UUID primary key.
pub fn generate_primary_key() -> Uuid {
    Uuid::new_v4()
}

// ==================== Statement construction ====================

impl<C> QueryBuilder<C> {
    /// Build the INSERT for `data`, optionally stamping `updated_at` and `created_at`.
    pub fn insert_statement(&self, mut data: Record, with_timestamps: bool) -> OrmResult<Statement> {
        if with_timestamps {
            let now = current_timestamp();
            data.insert(UPDATED_AT, now.clone());
            data.insert(CREATED_AT, now);
        }
        Ok(Statement::Insert {
            table: self.bound_table()?,
            values: data,
        })
    }

    /// Build the SELECT for `criteria`, honouring the bound limit and ordering.
    pub fn select_statement(&self, criteria: Record, fields: impl Into<Fields>) -> OrmResult<Statement> {
        self.select_with_limit(criteria, fields.into(), self.limit)
    }

    fn select_with_limit(
        &self,
        criteria: Record,
        fields: Fields,
        limit: Option<u32>,
    ) -> OrmResult<Statement> {
        Ok(Statement::Select {
            fields,
            table: self.bound_table()?,
            criteria,
            limit,
            order: self.order.clone(),
        })
    }

    /// Build the UPDATE of the row bound with `with_id`.
    pub fn update_statement(&self, mut data: Record, with_timestamps: bool) -> OrmResult<Statement> {
        let id = self
            .id
            .clone()
            .ok_or_else(|| OrmError::validation("UPDATE requires a row id (call with_id first)"))?;
        if with_timestamps {
            data.insert(UPDATED_AT, current_timestamp());
        }
        Ok(Statement::Update {
            table: self.bound_table()?,
            assignments: data,
            id,
        })
    }

    /// Build a DELETE of `fields` (or the whole row when `fields` is empty).
    pub fn delete_statement(&self, id: &str, fields: impl Into<Fields>) -> OrmResult<Statement> {
        Ok(Statement::Delete {
            fields: fields.into(),
            table: self.bound_table()?,
            id: id.to_string(),
        })
    }
}

// ==================== Execution ====================

impl<C: CqlExecutor> QueryBuilder<C> {
    /// Insert `data` under a freshly generated UUID `id` and return that id.
    ///
    /// The generated `id` is always the first column; an `id` already present in
    /// `data` is replaced.
    pub async fn create(&self, mut data: Record, with_timestamps: bool) -> OrmResult<String> {
        let id = generate_primary_key();
        data.prepend("id", id);
        let statement = self.insert_statement(data, with_timestamps)?;
        self.run(&statement).await?;
        Ok(id.hyphenated().to_string())
    }

    /// Insert `data` as given, without generating a primary key.
    pub async fn insert(&self, data: Record, with_timestamps: bool) -> OrmResult<()> {
        let statement = self.insert_statement(data, with_timestamps)?;
        self.run(&statement).await?;
        Ok(())
    }

    /// Select rows matching every criterion.
    ///
    /// More than one criterion appends `ALLOW FILTERING`.
    pub async fn find_by(&self, criteria: Record, fields: impl Into<Fields>) -> OrmResult<Vec<Record>> {
        let statement = self.select_statement(criteria, fields)?;
        self.run(&statement).await
    }

    /// Select the first row matching `criteria` (`LIMIT 1`).
    pub async fn find_one_by(
        &self,
        criteria: Record,
        fields: impl Into<Fields>,
    ) -> OrmResult<Option<Record>> {
        let statement = self.select_with_limit(criteria, fields.into(), Some(1))?;
        let rows = self.run(&statement).await?;
        Ok(rows.into_iter().next())
    }

    /// Select every row of the bound table.
    pub async fn find_all(&self, fields: impl Into<Fields>) -> OrmResult<Vec<Record>> {
        self.find_by(Record::new(), fields).await
    }

    /// Update the row bound with `with_id`, optionally stamping `updated_at`.
    pub async fn update(&self, data: Record, with_timestamps: bool) -> OrmResult<()> {
        let statement = self.update_statement(data, with_timestamps)?;
        self.run(&statement).await?;
        Ok(())
    }

    /// Delete `fields` from a row, or the whole row when `fields` is empty.
    pub async fn delete(&self, id: &str, fields: impl Into<Fields>) -> OrmResult<Vec<Record>> {
        let statement = self.delete_statement(id, fields)?;
        self.run(&statement).await
    }

    /// Delete a single column value from a row.
    pub async fn delete_field_from_row(&self, id: &str, field: &str) -> OrmResult<Vec<Record>> {
        self.delete(id, field).await
    }
}
