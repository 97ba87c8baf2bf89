//! # cassorm
//!
//! A small ActiveRecord-style layer over Cassandra.
//!
//! ## Features
//!
//! - **Literal CQL**: every operation renders one CQL string with a fixed, testable grammar
//! - **Immutable builder**: fluent calls return new values; nothing leaks between calls
//! - **Entities**: explicit column tables via `#[derive(Entity)]`, forgiving decode
//! - **Repositories**: table-bound CRUD returning entities or raw records
//! - **Driver-agnostic**: anything implementing [`CqlExecutor`] can run statements
//! - **Monitoring**: statement timing and statistics through [`monitor`]
//!
//! ## Query Builder
//!
//! ```ignore
//! use cassorm::{QueryBuilder, Order, record};
//!
//! let users = QueryBuilder::new(&session).table("users");
//!
//! // INSERT with a generated UUID id
//! let id = users.create(record! { "name" => "alice", "age" => 30 }, true).await?;
//!
//! // SELECT
//! let adults = users
//!     .take(10)
//!     .order_by("created_at", Order::Desc)
//!     .find_by(record! { "age" => 30 }, "*")
//!     .await?;
//!
//! // UPDATE
//! users.with_id(&id).update(record! { "name" => "bob" }, true).await?;
//!
//! // DELETE one column, then the row
//! users.delete_field_from_row(&id, "age").await?;
//! users.delete(&id, "").await?;
//! ```
//!
//! ## Repositories
//!
//! ```ignore
//! use cassorm::{Entity, EntityRepository, QueryBuilder, record};
//!
//! #[derive(Debug, Default, Entity)]
//! struct Media {
//!     id: String,
//!     name: String,
//! }
//!
//! let media: EntityRepository<Media, _> = EntityRepository::new(QueryBuilder::new(session), "media");
//! let cat = media.create(record! { "name" => "cat.png" }).await?;
//! ```

pub mod builder;
pub mod client;
pub mod config;
pub mod entity;
pub mod error;
pub mod mock;
pub mod monitor;
pub mod prelude;
pub mod render;
pub mod repository;
pub mod schema;
pub mod statement;
pub mod value;

#[cfg(feature = "scylla")]
pub mod session;

pub use builder::QueryBuilder;
pub use client::CqlExecutor;
pub use config::{RepositoryConfig, SessionConfig};
pub use entity::{Entity, FromRecord};
pub use error::{OrmError, OrmResult};
pub use mock::MockExecutor;
pub use repository::EntityRepository;
pub use schema::{SchemaReport, TableDefinition};
pub use statement::{Fields, Order, Statement, StatementKind};
pub use value::{FromValue, Record, Value};

pub use monitor::{
    InstrumentedExecutor, MonitorConfig, NoopMonitor, QueryMonitor, QueryStats, StatsMonitor,
};

#[cfg(feature = "tracing")]
pub use monitor::TracingMonitor;

#[cfg(feature = "scylla")]
pub use session::connect;

// Derive macros share names with the traits they implement.
#[cfg(feature = "derive")]
pub use cassorm_derive::Entity;
