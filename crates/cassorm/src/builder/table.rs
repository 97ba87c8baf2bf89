use super::QueryBuilder;
use crate::client::CqlExecutor;
use crate::error::OrmResult;
use crate::statement::{CreateTable, Fields, Statement};
use crate::value::Record;

/// Column type used by `set_primary_key` when none is given.
pub const DEFAULT_PRIMARY_KEY_TYPE: &str = "varchar";

// ==================== Schema chain ====================

impl<C> QueryBuilder<C> {
    /// Start a `CREATE TABLE name(...)` statement.
    ///
    /// The statement is finished by `with_fields` and executed by `persist`.
    pub fn add_table(mut self, name: impl Into<String>) -> Self {
        self.pending = Some(Statement::CreateTable(CreateTable::new(name)));
        self.build_error = None;
        self
    }

    /// Start an `ALTER TABLE name ADD ...` statement; columns come from `with_fields`.
    pub fn alter_table(mut self, name: impl Into<String>) -> Self {
        self.pending = Some(Statement::AlterTable {
            table: name.into(),
            columns: None,
        });
        self.build_error = None;
        self
    }

    /// Use a raw statement as the pending one.
    pub fn raw(mut self, cql: impl Into<String>) -> Self {
        self.pending = Some(Statement::Raw(cql.into()));
        self.build_error = None;
        self
    }

    /// Declare an inline `field type PRIMARY KEY` ahead of the columns.
    ///
    /// `ty` defaults to [`DEFAULT_PRIMARY_KEY_TYPE`]. Only valid right after `add_table`.
    pub fn set_primary_key<'a>(mut self, field: impl Into<String>, ty: impl Into<Option<&'a str>>) -> Self {
        let ty = ty.into().unwrap_or(DEFAULT_PRIMARY_KEY_TYPE).to_string();
        let applied = match &mut self.pending {
            Some(Statement::CreateTable(create))
                if create.primary_key.is_none() && create.columns.is_none() =>
            {
                create.primary_key = Some((field.into(), ty));
                true
            }
            _ => false,
        };
        if !applied {
            self.fail("set_primary_key must directly follow add_table");
        }
        self
    }

    /// Declare a trailing `PRIMARY KEY(f1, f2, ...)` applied after the columns.
    pub fn add_primary_key(mut self, fields: impl Into<Fields>) -> Self {
        let fields = fields.into();
        if fields.is_empty() {
            self.fail("add_primary_key requires at least one column");
            return self;
        }
        let keys = fields.as_slice().to_vec();
        let applied = match &mut self.pending {
            Some(Statement::CreateTable(create)) => {
                create.composite_key = Some(keys);
                true
            }
            _ => false,
        };
        if !applied {
            self.fail("add_primary_key requires add_table");
        }
        self
    }

    /// Supply the column definitions as `(name, type)` pairs, finishing the statement.
    pub fn with_fields<I, K, V>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let columns: Vec<(String, String)> = fields
            .into_iter()
            .map(|(name, ty)| (name.into(), ty.into()))
            .collect();
        let applied = match &mut self.pending {
            Some(Statement::CreateTable(create)) => {
                create.columns = Some(columns);
                true
            }
            Some(Statement::AlterTable { columns: slot, .. }) => {
                *slot = Some(columns);
                true
            }
            _ => false,
        };
        if !applied {
            self.fail("with_fields requires add_table or alter_table");
        }
        self
    }

    fn fail(&mut self, message: &str) {
        if self.build_error.is_none() {
            self.build_error = Some(message.to_string());
        }
    }

    /// Build `CREATE INDEX name ON table (field)`; an empty name reuses the field.
    pub fn create_index_statement(&self, field: &str, index_name: &str) -> OrmResult<Statement> {
        Ok(Statement::CreateIndex {
            name: index_name.to_string(),
            table: self.bound_table()?,
            field: field.to_string(),
        })
    }
}

// ==================== Schema execution ====================

impl<C: CqlExecutor> QueryBuilder<C> {
    /// Create a secondary index on the bound table.
    pub async fn create_index(&self, field: &str, index_name: &str) -> OrmResult<Vec<Record>> {
        let statement = self.create_index_statement(field, index_name)?;
        self.run(&statement).await
    }

    pub async fn drop_table(&self, name: &str) -> OrmResult<Vec<Record>> {
        self.run(&Statement::DropTable(name.to_string())).await
    }

    pub async fn truncate_table(&self, name: &str) -> OrmResult<Vec<Record>> {
        self.run(&Statement::Truncate(name.to_string())).await
    }
}
