//! Typed CQL statements.
//!
//! Every builder operation produces a [`Statement`]; its `Display` implementation is
//! the only place CQL text is assembled, so the output grammar lives in one file.

use crate::error::{OrmError, OrmResult};
use crate::render::{AND, COMMA, extract_fields, render_conditions, serialize_values};
use crate::value::Record;
use std::fmt;
use std::str::FromStr;

/// Placeholder left in a CREATE/ALTER TABLE until its columns are supplied.
pub const PLACEHOLDER: &str = "%s";

/// Sort direction for `ORDER BY`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Order {
    #[default]
    Asc,
    Desc,
}

impl Order {
    pub fn as_str(&self) -> &'static str {
        match self {
            Order::Asc => "ASC",
            Order::Desc => "DESC",
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Order {
    type Err = OrmError;

    fn from_str(s: &str) -> OrmResult<Self> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(Order::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(Order::Desc)
        } else {
            Err(OrmError::validation(format!("invalid sort direction: {s}")))
        }
    }
}

/// Column projection for SELECT and DELETE.
///
/// `Fields::all()` renders `*`; `Fields::none()` renders nothing (whole-row DELETE).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fields(Vec<String>);

impl Fields {
    pub fn all() -> Self {
        Self(vec!["*".to_string()])
    }

    pub fn none() -> Self {
        Self(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(String::is_empty)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl Default for Fields {
    fn default() -> Self {
        Self::all()
    }
}

impl fmt::Display for Fields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(", "))
    }
}

impl From<&str> for Fields {
    fn from(s: &str) -> Self {
        Self(vec![s.to_string()])
    }
}

impl From<String> for Fields {
    fn from(s: String) -> Self {
        Self(vec![s])
    }
}

impl From<&[&str]> for Fields {
    fn from(cols: &[&str]) -> Self {
        Self(cols.iter().map(|c| c.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Fields {
    fn from(cols: [&str; N]) -> Self {
        Self(cols.iter().map(|c| c.to_string()).collect())
    }
}

impl From<Vec<String>> for Fields {
    fn from(cols: Vec<String>) -> Self {
        Self(cols)
    }
}

impl From<Vec<&str>> for Fields {
    fn from(cols: Vec<&str>) -> Self {
        Self(cols.into_iter().map(str::to_string).collect())
    }
}

/// The kind of CQL statement, used for logging and statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
    /// CREATE / ALTER / DROP / TRUNCATE
    Schema,
    Other,
}

impl StatementKind {
    /// Classify raw CQL text by its leading keyword.
    pub fn from_cql(cql: &str) -> Self {
        let keyword = cql
            .trim_start()
            .split(|c: char| c.is_whitespace() || c == '(')
            .next()
            .unwrap_or_default()
            .to_ascii_uppercase();
        match keyword.as_str() {
            "SELECT" => StatementKind::Select,
            "INSERT" => StatementKind::Insert,
            "UPDATE" => StatementKind::Update,
            "DELETE" => StatementKind::Delete,
            "CREATE" | "ALTER" | "DROP" | "TRUNCATE" => StatementKind::Schema,
            _ => StatementKind::Other,
        }
    }
}

/// A pending `CREATE TABLE`.
///
/// An inline primary key renders before the columns, a composite key renders after
/// them; until columns are supplied the body keeps its `%s` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTable {
    pub name: String,
    pub primary_key: Option<(String, String)>,
    pub composite_key: Option<Vec<String>>,
    pub columns: Option<Vec<(String, String)>>,
}

impl CreateTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primary_key: None,
            composite_key: None,
            columns: None,
        }
    }

    fn body(&self) -> String {
        let mut body = String::new();
        if let Some((field, ty)) = &self.primary_key {
            body.push_str(&format!("{field} {ty} PRIMARY KEY, "));
        }
        match &self.columns {
            Some(columns) => {
                body.push_str(&extract_fields(columns, ""));
                if let Some(keys) = &self.composite_key {
                    body.push_str(&format!(", PRIMARY KEY({})", keys.join(", ")));
                }
            }
            None => body.push_str(PLACEHOLDER),
        }
        body
    }
}

/// A single CQL statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Insert {
        table: String,
        values: Record,
    },
    Select {
        fields: Fields,
        table: String,
        criteria: Record,
        limit: Option<u32>,
        order: Option<(String, Order)>,
    },
    Update {
        table: String,
        assignments: Record,
        id: String,
    },
    Delete {
        fields: Fields,
        table: String,
        id: String,
    },
    CreateTable(CreateTable),
    AlterTable {
        table: String,
        columns: Option<Vec<(String, String)>>,
    },
    CreateIndex {
        name: String,
        table: String,
        field: String,
    },
    DropTable(String),
    Truncate(String),
    Raw(String),
}

impl Statement {
    pub fn kind(&self) -> StatementKind {
        match self {
            Statement::Select { .. } => StatementKind::Select,
            Statement::Insert { .. } => StatementKind::Insert,
            Statement::Update { .. } => StatementKind::Update,
            Statement::Delete { .. } => StatementKind::Delete,
            Statement::CreateTable(_)
            | Statement::AlterTable { .. }
            | Statement::CreateIndex { .. }
            | Statement::DropTable(_)
            | Statement::Truncate(_) => StatementKind::Schema,
            Statement::Raw(cql) => StatementKind::from_cql(cql),
        }
    }

    /// Reject statements that would send malformed CQL to the cluster.
    pub fn validate(&self) -> OrmResult<()> {
        match self {
            Statement::Insert { table, values } => {
                require_table(table)?;
                if values.is_empty() {
                    return Err(OrmError::validation("INSERT requires at least one value"));
                }
                Ok(())
            }
            Statement::Select { table, .. } | Statement::Delete { table, .. } => {
                require_table(table)
            }
            Statement::Update {
                table,
                assignments,
                id,
            } => {
                require_table(table)?;
                if id.is_empty() {
                    return Err(OrmError::validation(
                        "UPDATE requires a row id (call with_id first)",
                    ));
                }
                if assignments.is_empty() {
                    return Err(OrmError::validation("UPDATE requires at least one assignment"));
                }
                Ok(())
            }
            Statement::CreateTable(create) => {
                require_table(&create.name)?;
                if create.columns.is_none() {
                    return Err(OrmError::validation(format!(
                        "CREATE TABLE {} has no column definitions (call with_fields)",
                        create.name
                    )));
                }
                Ok(())
            }
            Statement::AlterTable { table, columns } => {
                require_table(table)?;
                if columns.as_ref().is_none_or(Vec::is_empty) {
                    return Err(OrmError::validation(format!(
                        "ALTER TABLE {table} has no column definitions (call with_fields)"
                    )));
                }
                Ok(())
            }
            Statement::CreateIndex { table, field, .. } => {
                require_table(table)?;
                if field.is_empty() {
                    return Err(OrmError::validation("CREATE INDEX requires a field"));
                }
                Ok(())
            }
            Statement::DropTable(table) | Statement::Truncate(table) => require_table(table),
            Statement::Raw(cql) => {
                if cql.trim().is_empty() {
                    return Err(OrmError::validation("no statement to execute"));
                }
                Ok(())
            }
        }
    }
}

fn require_table(table: &str) -> OrmResult<()> {
    if table.is_empty() {
        Err(OrmError::validation("no table bound (call table first)"))
    } else {
        Ok(())
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Insert { table, values } => {
                let keys: Vec<&str> = values.keys().collect();
                write!(
                    f,
                    "INSERT INTO {table} ({}) VALUES ({})",
                    keys.join(", "),
                    serialize_values(values)
                )
            }
            Statement::Select {
                fields,
                table,
                criteria,
                limit,
                order,
            } => {
                let mut where_clause = String::new();
                if !criteria.is_empty() {
                    where_clause = format!("WHERE {}", render_conditions(criteria, AND));
                }
                if criteria.len() > 1 {
                    where_clause.push_str(" ALLOW FILTERING");
                }

                let mut parameters = Vec::new();
                if let Some(n) = limit.filter(|n| *n > 0) {
                    parameters.push(format!("LIMIT {n}"));
                }
                if let Some((field, dir)) = order {
                    parameters.push(format!("ORDER BY {field} {dir}"));
                }

                write!(
                    f,
                    "SELECT {fields} FROM {table} {where_clause} {}",
                    parameters.join(" ")
                )
            }
            Statement::Update {
                table,
                assignments,
                id,
            } => write!(
                f,
                "UPDATE {table} SET {} WHERE id='{id}'",
                render_conditions(assignments, COMMA)
            ),
            Statement::Delete { fields, table, id } => {
                write!(f, "DELETE {fields} FROM {table} WHERE id='{id}'")
            }
            Statement::CreateTable(create) => {
                write!(f, "CREATE TABLE {}({})", create.name, create.body())
            }
            Statement::AlterTable { table, columns } => match columns {
                Some(columns) => write!(f, "ALTER TABLE {table} {}", extract_fields(columns, "ADD")),
                None => write!(f, "ALTER TABLE {table} {PLACEHOLDER}"),
            },
            Statement::CreateIndex { name, table, field } => {
                let name = if name.is_empty() { field } else { name };
                write!(f, "CREATE INDEX {name} ON {table} ({field})")
            }
            Statement::DropTable(table) => write!(f, "DROP TABLE {table}"),
            Statement::Truncate(table) => write!(f, "TRUNCATE {table}"),
            Statement::Raw(cql) => f.write_str(cql),
        }
    }
}
