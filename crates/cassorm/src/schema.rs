//! Declarative table definitions.
//!
//! A [`TableDefinition`] describes one table and its secondary indexes. It is
//! usually loaded from JSON by a schema-creation command and applied through a
//! [`QueryBuilder`]:
//!
//! ```ignore
//! let media = TableDefinition::from_json(r#"{
//!     "name": "media",
//!     "primary_key": { "field": "id", "type": "uuid" },
//!     "columns": [
//!         { "name": "name", "type": "text" },
//!         { "name": "owner_id", "type": "uuid" }
//!     ],
//!     "indexes": [{ "field": "owner_id" }]
//! }"#)?;
//!
//! for line in media.apply(&QueryBuilder::new(&session)).await?.lines() {
//!     println!("{line}");
//! }
//! ```

use crate::builder::QueryBuilder;
use crate::client::CqlExecutor;
use crate::error::{OrmError, OrmResult};
use crate::statement::Statement;
use serde::Deserialize;

/// A column as `name type`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ColumnDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

/// Primary key of a table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PrimaryKey {
    /// `PRIMARY KEY(a, b, ...)` after the columns.
    Composite(Vec<String>),
    /// `field type PRIMARY KEY` ahead of the columns; the type defaults to `varchar`.
    Inline {
        field: String,
        #[serde(rename = "type", default)]
        ty: Option<String>,
    },
}

/// A secondary index; the index is named after its field unless `name` is set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IndexDefinition {
    pub field: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TableDefinition {
    pub name: String,
    #[serde(default)]
    pub primary_key: Option<PrimaryKey>,
    pub columns: Vec<ColumnDefinition>,
    #[serde(default)]
    pub indexes: Vec<IndexDefinition>,
}

/// Success lines from applying a definition, one per executed statement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaReport {
    lines: Vec<String>,
}

impl SchemaReport {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl TableDefinition {
    pub fn from_json(json: &str) -> OrmResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Run the `add_table` chain for this definition on `builder`.
    fn table_chain<C>(&self, builder: QueryBuilder<C>) -> QueryBuilder<C> {
        let builder = builder.add_table(self.name.as_str());
        let builder = match &self.primary_key {
            Some(PrimaryKey::Inline { field, ty }) => {
                builder.set_primary_key(field.as_str(), ty.as_deref())
            }
            Some(PrimaryKey::Composite(keys)) => builder.add_primary_key(keys.clone()),
            None => builder,
        };
        builder.with_fields(
            self.columns
                .iter()
                .map(|column| (column.name.as_str(), column.ty.as_str())),
        )
    }

    /// The CREATE TABLE followed by one CREATE INDEX per index.
    pub fn statements(&self) -> OrmResult<Vec<Statement>> {
        if self.columns.is_empty() {
            return Err(OrmError::validation(format!(
                "table {} defines no columns",
                self.name
            )));
        }

        let create = self.table_chain(QueryBuilder::new(())).pending_statement()?.clone();
        create.validate()?;
        let mut statements = vec![create];

        let indexed = QueryBuilder::new(()).table(self.name.as_str());
        for index in &self.indexes {
            let statement =
                indexed.create_index_statement(&index.field, index.name.as_deref().unwrap_or(""))?;
            statement.validate()?;
            statements.push(statement);
        }
        Ok(statements)
    }

    /// Execute every statement in order, stopping at the first failure.
    pub async fn apply<C: CqlExecutor>(&self, builder: &QueryBuilder<C>) -> OrmResult<SchemaReport> {
        let mut report = SchemaReport::default();
        for statement in self.statements()? {
            builder.run(&statement).await?;
            report.lines.push(describe(&statement));
        }
        Ok(report)
    }
}

fn describe(statement: &Statement) -> String {
    match statement {
        Statement::CreateTable(create) => format!("Table {} created", create.name),
        Statement::CreateIndex { name, table, field } => {
            let name = if name.is_empty() { field } else { name };
            format!("Index {name} created on {table} ({field})")
        }
        other => format!("Executed: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockExecutor;

    const MEDIA: &str = r#"{
        "name": "media",
        "primary_key": { "field": "id", "type": "uuid" },
        "columns": [
            { "name": "name", "type": "text" },
            { "name": "owner_id", "type": "uuid" }
        ],
        "indexes": [{ "field": "owner_id" }, { "field": "name", "name": "media_by_name" }]
    }"#;

    #[test]
    fn parses_inline_primary_key() {
        let table = TableDefinition::from_json(MEDIA).unwrap();
        assert_eq!(
            table.primary_key,
            Some(PrimaryKey::Inline {
                field: "id".into(),
                ty: Some("uuid".into())
            })
        );
        assert_eq!(table.indexes.len(), 2);
    }

    #[test]
    fn renders_statements_in_order() {
        let statements = TableDefinition::from_json(MEDIA).unwrap().statements().unwrap();
        let cql: Vec<String> = statements.iter().map(ToString::to_string).collect();
        assert_eq!(
            cql,
            vec![
                "CREATE TABLE media(id uuid PRIMARY KEY,  name text,  owner_id uuid)",
                "CREATE INDEX owner_id ON media (owner_id)",
                "CREATE INDEX media_by_name ON media (name)",
            ]
        );
    }

    #[test]
    fn composite_key_and_default_key_type() {
        let events = TableDefinition::from_json(
            r#"{"name": "events", "primary_key": ["day", "at"],
                "columns": [{"name": "day", "type": "date"}, {"name": "at", "type": "timestamp"}]}"#,
        )
        .unwrap();
        assert_eq!(
            events.statements().unwrap()[0].to_string(),
            "CREATE TABLE events( day date,  at timestamp, PRIMARY KEY(day, at))"
        );

        let tags = TableDefinition::from_json(
            r#"{"name": "tags", "primary_key": {"field": "id"},
                "columns": [{"name": "label", "type": "text"}]}"#,
        )
        .unwrap();
        assert_eq!(
            tags.statements().unwrap()[0].to_string(),
            "CREATE TABLE tags(id varchar PRIMARY KEY,  label text)"
        );
    }

    #[test]
    fn rejects_tables_without_columns() {
        let empty = TableDefinition::from_json(r#"{"name": "t", "columns": []}"#).unwrap();
        assert!(empty.statements().unwrap_err().is_validation());

        let err = TableDefinition::from_json(r#"{"name": "t"}"#).unwrap_err();
        assert!(matches!(err, OrmError::Serialization(_)));
    }

    #[tokio::test]
    async fn apply_executes_and_reports() {
        let mock = MockExecutor::new();
        let report = TableDefinition::from_json(MEDIA)
            .unwrap()
            .apply(&QueryBuilder::new(&mock))
            .await
            .unwrap();

        assert_eq!(mock.execution_count(), 3);
        assert_eq!(
            report.lines(),
            [
                "Table media created",
                "Index owner_id created on media (owner_id)",
                "Index media_by_name created on media (name)",
            ]
        );
    }

    #[tokio::test]
    async fn apply_stops_at_first_failure() {
        let mock = MockExecutor::new();
        mock.push_error(OrmError::query("table media already exists"));

        let err = TableDefinition::from_json(MEDIA)
            .unwrap()
            .apply(&QueryBuilder::new(&mock))
            .await
            .unwrap_err();

        assert!(matches!(err, OrmError::Query(_)));
        assert_eq!(mock.execution_count(), 1);
    }
}
