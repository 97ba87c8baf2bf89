//! Convenient imports for typical `cassorm` usage.
//!
//! ```ignore
//! use cassorm::prelude::*;
//! ```

pub use crate::record;
pub use crate::{
    CqlExecutor, Entity, EntityRepository, Fields, FromRecord, FromValue, OrmError, OrmResult,
    Order, QueryBuilder, Record, RepositoryConfig, Value,
};
