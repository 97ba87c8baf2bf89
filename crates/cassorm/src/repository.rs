//! Table-bound repositories returning entities.

use crate::builder::QueryBuilder;
use crate::client::CqlExecutor;
use crate::config::RepositoryConfig;
use crate::entity::{Entity, FromRecord};
use crate::error::{OrmError, OrmResult};
use crate::statement::Fields;
use crate::value::{Record, Value};
use std::marker::PhantomData;

/// Pivot column holding the owner's id in polymorphic relations.
pub const MORPH_ID_COLUMN: &str = "entity_id";
/// Pivot column holding the owner's type name in polymorphic relations.
pub const MORPH_TYPE_COLUMN: &str = "entity_type";

/// CRUD over one table, mapping rows into `T`.
///
/// `T` is any [`FromRecord`] type: an [`Entity`] or [`Record`] for raw rows.
/// Each call binds the table on a fresh copy of the template builder, so calls
/// never see each other's limit or ordering.
///
/// ```ignore
/// let media: EntityRepository<Media, _> = EntityRepository::new(QueryBuilder::new(session), "media");
///
/// let created = media.create(record! { "name" => "cat.png" }).await?;
/// let same = media.find(created.id()).await?;
/// let pngs = media.find_by(record! { "mime_type" => "image/png" }).await?;
/// ```
#[derive(Debug, Clone)]
pub struct EntityRepository<T, C> {
    builder: QueryBuilder<C>,
    table: String,
    config: RepositoryConfig,
    _entity: PhantomData<fn() -> T>,
}

impl<T, C> EntityRepository<T, C> {
    pub fn new(builder: QueryBuilder<C>, table: impl Into<String>) -> Self {
        Self {
            builder,
            table: table.into(),
            config: RepositoryConfig::default(),
            _entity: PhantomData,
        }
    }

    pub fn with_config(mut self, config: RepositoryConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// A builder bound to this repository's table.
    pub fn repository(&self) -> QueryBuilder<&C> {
        self.builder.by_ref().table(self.table.as_str())
    }
}

impl<T: FromRecord, C: CqlExecutor> EntityRepository<T, C> {
    /// Map a row into `T`.
    pub fn transform_into_entity(&self, data: Record) -> T {
        T::from_record(data)
    }

    pub fn parse_records(&self, rows: Vec<Record>) -> Vec<T> {
        rows.into_iter().map(T::from_record).collect()
    }

    pub async fn find_all(&self) -> OrmResult<Vec<T>> {
        let rows = self.repository().find_all(Fields::all()).await?;
        Ok(self.parse_records(rows))
    }

    /// Rows matching `criteria`, capped at `RepositoryConfig::find_limit`.
    pub async fn find_by(&self, criteria: Record) -> OrmResult<Vec<T>> {
        self.find_by_with_limit(criteria, self.config.find_limit).await
    }

    /// Rows matching `criteria`, capped at `limit` (zero means no cap).
    pub async fn find_by_with_limit(&self, criteria: Record, limit: u32) -> OrmResult<Vec<T>> {
        let rows = self
            .repository()
            .take(limit)
            .find_by(criteria, Fields::all())
            .await?;
        Ok(self.parse_records(rows))
    }

    pub async fn find_one_by(
        &self,
        criteria: Record,
        fields: impl Into<Fields>,
    ) -> OrmResult<Option<T>> {
        let row = self.repository().find_one_by(criteria, fields).await?;
        Ok(row.map(T::from_record))
    }

    /// The row with primary key `id`.
    ///
    /// Returns `OrmError::NotFound` when no such row exists.
    pub async fn find(&self, id: &str) -> OrmResult<T> {
        self.find_one_by(Record::new().with("id", id), Fields::all())
            .await?
            .ok_or_else(|| OrmError::not_found(format!("{} with id {id}", self.table)))
    }

    /// Insert `data` under a generated id, then read the row back.
    pub async fn create(&self, data: Record) -> OrmResult<T> {
        let id = self.repository().create(data, self.config.timestamps).await?;
        self.find(&id).await
    }

    /// Entities of this repository related to one owner through a pivot table.
    ///
    /// Pivot rows are matched on `entity_id` / `entity_type`; each carries the
    /// related id in `<related>_id`. An owner without pivot rows yields an empty
    /// list without querying this repository's table.
    pub async fn morph_many(
        &self,
        owner_type: &str,
        owner_id: impl Into<Value>,
        related: &str,
        pivot_table: &str,
    ) -> OrmResult<Vec<T>> {
        let pivot_rows = self
            .builder
            .by_ref()
            .table(pivot_table)
            .find_by(
                Record::new()
                    .with(MORPH_ID_COLUMN, owner_id)
                    .with(MORPH_TYPE_COLUMN, owner_type),
                Fields::all(),
            )
            .await?;

        let related_column = format!("{related}_id");
        let ids: Vec<Value> = pivot_rows
            .into_iter()
            .filter_map(|mut row| row.remove(&related_column))
            .filter(|id| !id.is_null())
            .collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        self.find_by(Record::new().with("id", Value::List(ids))).await
    }
}

impl<T: Entity, C: CqlExecutor> EntityRepository<T, C> {
    /// Write every fillable column of `entity` to its row.
    ///
    /// `id` only appears in the WHERE clause; Cassandra rejects primary key
    /// assignments.
    pub async fn update(&self, entity: T) -> OrmResult<T> {
        let mut data = entity.to_record();
        data.remove("id");
        self.repository()
            .with_id(entity.id())
            .update(data, self.config.timestamps)
            .await?;
        Ok(entity)
    }
}
