//! `CqlExecutor` for the ScyllaDB / Cassandra driver.
//!
//! Statements are sent unprepared and unpaged; rows come back as [`Record`]s with
//! columns in result order.

use crate::client::CqlExecutor;
use crate::config::SessionConfig;
use crate::error::{OrmError, OrmResult};
use crate::value::{Record, Value};
use scylla::client::session::Session;
use scylla::client::session_builder::SessionBuilder;
use scylla::value::{CqlValue, Row};

/// Connect to the nodes in `config` and select its keyspace, if any.
pub async fn connect(config: &SessionConfig) -> OrmResult<Session> {
    if config.nodes.is_empty() {
        return Err(OrmError::Connection("no contact points configured".into()));
    }

    let mut builder = SessionBuilder::new().known_nodes(&config.nodes);
    if let Some(keyspace) = &config.keyspace {
        builder = builder.use_keyspace(keyspace, false);
    }

    #[cfg(feature = "tracing")]
    tracing::info!(target: "cassorm.session", nodes = ?config.nodes, keyspace = ?config.keyspace, "connecting");

    builder
        .build()
        .await
        .map_err(|e| OrmError::Connection(e.to_string()))
}

impl CqlExecutor for Session {
    async fn execute(&self, cql: &str) -> OrmResult<Vec<Record>> {
        let result = self
            .query_unpaged(cql, ())
            .await
            .map_err(|e| OrmError::Query(e.to_string()))?;
        if !result.is_rows() {
            return Ok(Vec::new());
        }

        let rows = result
            .into_rows_result()
            .map_err(|e| OrmError::Query(e.to_string()))?;
        let columns: Vec<String> = rows
            .column_specs()
            .iter()
            .map(|spec| spec.name().to_string())
            .collect();

        let mut records: Vec<Record> = Vec::with_capacity(rows.rows_num());
        for row in rows.rows::<Row>().map_err(|e| OrmError::Query(e.to_string()))? {
            let row = row.map_err(|e| OrmError::decode("<row>", e.to_string()))?;
            records.push(
                columns
                    .iter()
                    .cloned()
                    .zip(row.columns.into_iter().map(|cell| cell.map_or(Value::Null, from_cql)))
                    .collect::<Record>(),
            );
        }
        Ok(records)
    }
}

/// Convert a driver value; types without a direct counterpart become text.
fn from_cql(value: CqlValue) -> Value {
    match value {
        CqlValue::Boolean(b) => Value::Bool(b),
        CqlValue::TinyInt(i) => Value::Int(i.into()),
        CqlValue::SmallInt(i) => Value::Int(i.into()),
        CqlValue::Int(i) => Value::Int(i.into()),
        CqlValue::BigInt(i) => Value::Int(i),
        CqlValue::Float(f) => Value::Float(f.into()),
        CqlValue::Double(f) => Value::Float(f),
        CqlValue::Ascii(s) | CqlValue::Text(s) => Value::Text(s),
        CqlValue::Uuid(u) => Value::Uuid(u),
        CqlValue::Timeuuid(t) => Value::Uuid(t.into()),
        CqlValue::Timestamp(ts) => chrono::DateTime::from_timestamp_millis(ts.0)
            .map(|dt| Value::Timestamp(dt.naive_utc()))
            .unwrap_or(Value::Null),
        CqlValue::Empty => Value::Null,
        CqlValue::List(items) | CqlValue::Set(items) => {
            Value::List(items.into_iter().map(from_cql).collect())
        }
        other => Value::Text(format!("{other:?}")),
    }
}
