//! CQL literal rendering.
//!
//! Two renderers share the escaping rules here:
//!
//! - the value serializer, producing the `VALUES (...)` list of an INSERT;
//! - the condition renderer, producing `WHERE` predicates and `SET` assignments.
//!
//! Output text is a compatibility surface: spacing (including trailing spaces) is
//! reproduced exactly.

use crate::value::{Record, Value};
use std::sync::OnceLock;

/// Connector used between WHERE predicates.
pub const AND: &str = "AND";
/// Connector used between SET assignments.
pub const COMMA: &str = ",";

/// Whether `s` is a hyphenated 8-4-4-4-12 hex UUID (any version, any case).
pub fn is_uuid(s: &str) -> bool {
    static UUID_RE: OnceLock<regex::Regex> = OnceLock::new();
    UUID_RE
        .get_or_init(|| {
            regex::Regex::new(
                r"^[0-9A-Fa-f]{8}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{12}$",
            )
            .expect("invalid built-in uuid regex")
        })
        .is_match(s)
}

/// Backslash-escape single quotes, double quotes, backslashes and NUL.
pub fn add_slashes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\'' | '"' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            '\0' => out.push_str("\\0"),
            _ => out.push(c),
        }
    }
    out
}

/// Integers and UUIDs, the only values an INSERT leaves unquoted.
fn is_bare_literal(value: &Value) -> bool {
    match value {
        Value::Int(_) | Value::Uuid(_) => true,
        Value::Text(s) => is_uuid(s),
        _ => false,
    }
}

/// Values a condition leaves unquoted: the INSERT set plus booleans.
fn is_bare_condition(value: &Value) -> bool {
    matches!(value, Value::Bool(_)) || is_bare_literal(value)
}

/// Render one value as an INSERT literal.
///
/// Integers and UUIDs pass through; everything else (null, booleans and floats
/// included) is escaped and single-quoted, unless
/// escaping produced `\'`, in which case the value is double-quoted instead.
pub fn serialize_value(value: &Value) -> String {
    if let Value::List(items) = value {
        let inner: Vec<String> = items.iter().map(serialize_value).collect();
        return format!("[{}]", inner.join(", "));
    }
    if is_bare_literal(value) {
        return value.to_string();
    }
    let escaped = add_slashes(&value.to_string());
    if escaped.contains("\\'") {
        format!("\"{escaped}\"")
    } else {
        format!("'{escaped}'")
    }
}

/// Render the `VALUES (...)` content of an INSERT, in record order.
pub fn serialize_values(data: &Record) -> String {
    data.values()
        .map(serialize_value)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render one `field=value ` predicate or assignment.
pub fn render_condition(field: &str, value: &Value) -> String {
    match value {
        Value::List(items) => {
            let members: Vec<String> = items.iter().map(ToString::to_string).collect();
            format!("{field} IN({})", members.join(", "))
        }
        v if is_bare_condition(v) => format!("{field}={v} "),
        v => format!("{field}='{}' ", add_slashes(&v.to_string())),
    }
}

/// Render every pair of `data`, joined by `connector` plus a space.
///
/// Use [`AND`] for WHERE clauses and [`COMMA`] for SET clauses.
pub fn render_conditions(data: &Record, connector: &str) -> String {
    let separator = format!("{connector} ");
    data.iter()
        .map(|(field, value)| render_condition(field, value))
        .collect::<Vec<_>>()
        .join(&separator)
}

/// Render column definitions as `prefix name type`, joined by `, `.
pub fn extract_fields(columns: &[(String, String)], prefix: &str) -> String {
    columns
        .iter()
        .map(|(name, ty)| format!("{prefix} {name} {ty}"))
        .collect::<Vec<_>>()
        .join(", ")
}
