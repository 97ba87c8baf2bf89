//! Entities: typed rows with an explicit field table.
//!
//! An [`Entity`] lists the columns it persists in [`Entity::FILLABLE`] and maps
//! column names to its fields through `assign` (set) and `field` (get). Both are
//! plain `match` tables, usually generated by `#[derive(Entity)]`:
//!
//! ```ignore
//! #[derive(Debug, Default, Entity)]
//! struct Media {
//!     id: String,
//!     name: String,
//!     #[entity(rename = "mime_type")]
//!     mime: Option<String>,
//!     #[entity(skip)]
//!     cached_thumbnail: Option<Vec<u8>>,
//! }
//! ```
//!
//! Decoding is forgiving: unknown columns and values that do not convert into the
//! field's type are skipped, never reported.

use crate::value::{Record, Value};

/// A row type with an `id` and a fixed set of persisted columns.
pub trait Entity: Default {
    /// Persisted columns, excluding `id`, in rendering order.
    const FILLABLE: &'static [&'static str];

    fn id(&self) -> &str;

    fn set_id(&mut self, id: impl Into<String>) -> &mut Self;

    /// Set the field mapped to `column`. Returns `false` when `column` is unknown
    /// or `value` does not convert into the field's type.
    fn assign(&mut self, column: &str, value: Value) -> bool;

    /// Current value of the field mapped to `column`.
    fn field(&self, column: &str) -> Option<Value>;

    /// Build an entity from a row, assigning every column it knows.
    fn create(data: Record) -> Self {
        let mut entity = Self::default();
        for (column, value) in data {
            entity.assign(&column, value);
        }
        entity
    }

    /// `id` followed by every fillable column.
    fn to_record(&self) -> Record {
        let mut record = Record::new().with("id", self.id());
        for column in Self::FILLABLE {
            record.insert(*column, self.field(column).unwrap_or(Value::Null));
        }
        record
    }
}

/// Types a result row can be turned into.
///
/// Implemented for every [`Entity`] and for [`Record`] itself, which passes rows
/// through unchanged.
pub trait FromRecord: Sized {
    fn from_record(record: Record) -> Self;
}

impl FromRecord for Record {
    fn from_record(record: Record) -> Self {
        record
    }
}

impl<T: Entity> FromRecord for T {
    fn from_record(record: Record) -> Self {
        T::create(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record;
    use crate::value::FromValue;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Media {
        id: String,
        name: String,
        size: i64,
        tags: Vec<String>,
    }

    impl Entity for Media {
        const FILLABLE: &'static [&'static str] = &["name", "size", "tags"];

        fn id(&self) -> &str {
            &self.id
        }

        fn set_id(&mut self, id: impl Into<String>) -> &mut Self {
            self.id = id.into();
            self
        }

        fn assign(&mut self, column: &str, value: Value) -> bool {
            match column {
                "id" => String::from_value(value).map(|v| self.id = v).is_ok(),
                "name" => String::from_value(value).map(|v| self.name = v).is_ok(),
                "size" => i64::from_value(value).map(|v| self.size = v).is_ok(),
                "tags" => Vec::<String>::from_value(value).map(|v| self.tags = v).is_ok(),
                _ => false,
            }
        }

        fn field(&self, column: &str) -> Option<Value> {
            match column {
                "id" => Some(Value::from(self.id.clone())),
                "name" => Some(Value::from(self.name.clone())),
                "size" => Some(Value::from(self.size)),
                "tags" => Some(Value::from(self.tags.clone())),
                _ => None,
            }
        }
    }

    fn sample() -> Media {
        let mut media = Media {
            name: "cat.png".into(),
            size: 2048,
            tags: vec!["cat".into(), "pet".into()],
            ..Default::default()
        };
        media.set_id("7f9c4a55-2b8e-4c61-9d3a-1f2e3d4c5b6a");
        media
    }

    #[test]
    fn create_ignores_unknown_columns() {
        let media = Media::create(record! {
            "id" => "m-1",
            "name" => "dog.jpg",
            "colour" => "brown",
        });
        assert_eq!(media.id(), "m-1");
        assert_eq!(media.name, "dog.jpg");
        assert_eq!(media.size, 0);
    }

    #[test]
    fn create_skips_values_of_the_wrong_type() {
        let media = Media::create(record! { "name" => "x", "size" => "big" });
        assert_eq!(media.name, "x");
        assert_eq!(media.size, 0);
    }

    #[test]
    fn to_record_lists_id_then_fillable() {
        let record = sample().to_record();
        let keys: Vec<&str> = record.keys().collect();
        assert_eq!(keys, vec!["id", "name", "size", "tags"]);
        assert_eq!(record.get("size"), Some(&Value::Int(2048)));
    }

    #[test]
    fn record_round_trip() {
        let media = sample();
        let record = media.to_record();
        assert_eq!(Media::create(record.clone()).to_record(), record);
        assert_eq!(Media::create(record), media);
    }

    #[test]
    fn set_id_is_fluent() {
        let mut media = Media::default();
        media.set_id("a").set_id("b");
        assert_eq!(media.id(), "b");
    }

    #[test]
    fn from_record_dispatch() {
        let row = record! { "id" => "m-2", "name" => "n" };
        let raw = Record::from_record(row.clone());
        assert_eq!(raw, row);
        let media = Media::from_record(row);
        assert_eq!(media.id(), "m-2");
    }
}
