//! Derive macros for cassorm
//!
//! Provides `#[derive(Entity)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod entity;

/// Derive the `Entity` trait (and `Display`) for a struct.
///
/// # Example
///
/// ```ignore
/// use cassorm::Entity;
///
/// #[derive(Debug, Default, Entity)]
/// struct Media {
///     id: String,
///     name: String,
///     #[entity(rename = "mime_type")]
///     mime: Option<String>,
///     #[entity(skip)]
///     thumbnail: Option<Vec<u8>>,
/// }
/// ```
///
/// # Generated
///
/// - `FILLABLE` - every non-id, non-skipped column in declaration order
/// - `id` / `set_id` - accessors for the id field
/// - `assign` / `field` - `match` tables from column name to field
/// - `Display` - the entity's record rendered as JSON
///
/// # Attributes
///
/// - `#[entity(id)]` - Mark the id field (defaults to the field named `id`; must be a `String`)
/// - `#[entity(rename = "col")]` - Map the field to a different column name
/// - `#[entity(skip)]` - Leave the field out of the column table
#[proc_macro_derive(Entity, attributes(entity))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    entity::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
