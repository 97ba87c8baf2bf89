//! Entity derive macro implementation

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Result};

/// Parsed `#[entity(...)]` field attributes.
#[derive(Default)]
struct FieldAttr {
    is_id: bool,
    skip: bool,
    rename: Option<String>,
}

fn parse_field_attr(field: &syn::Field) -> Result<FieldAttr> {
    let mut parsed = FieldAttr::default();
    for attr in &field.attrs {
        if !attr.path().is_ident("entity") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("id") {
                parsed.is_id = true;
                Ok(())
            } else if meta.path.is_ident("skip") {
                parsed.skip = true;
                Ok(())
            } else if meta.path.is_ident("rename") {
                let value: syn::LitStr = meta.value()?.parse()?;
                parsed.rename = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("expected `id`, `skip` or `rename = \"...\"`"))
            }
        })?;
    }
    Ok(parsed)
}

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Entity can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Entity can only be derived for structs",
            ));
        }
    };

    let mut explicit_id: Option<&syn::Ident> = None;
    let mut implicit_id: Option<&syn::Ident> = None;
    let mut columns = Vec::with_capacity(fields.len());

    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let attr = parse_field_attr(field)?;

        if attr.is_id {
            if explicit_id.is_some() {
                return Err(syn::Error::new_spanned(
                    field,
                    "only one field can be marked #[entity(id)]",
                ));
            }
            explicit_id = Some(ident);
            continue;
        }
        if attr.skip {
            continue;
        }
        if ident == "id" && attr.rename.is_none() {
            implicit_id = Some(ident);
            continue;
        }

        let column = attr.rename.unwrap_or_else(|| ident.to_string());
        if column == "id" {
            return Err(syn::Error::new_spanned(
                field,
                "the `id` column is reserved for the id field; use #[entity(id)]",
            ));
        }
        columns.push((ident, &field.ty, column));
    }

    // A plain `id` field next to an explicit id field would shadow the `id` column.
    if let (Some(_), Some(ident)) = (explicit_id, implicit_id) {
        return Err(syn::Error::new_spanned(
            ident,
            "field `id` conflicts with the #[entity(id)] field; skip or rename it",
        ));
    }

    let Some(id_ident) = explicit_id.or(implicit_id) else {
        return Err(syn::Error::new_spanned(
            &input,
            "Entity requires an `id: String` field or a field marked #[entity(id)]",
        ));
    };

    let fillable = columns.iter().map(|(_, _, column)| column);

    let assign_arms = columns.iter().map(|(ident, ty, column)| {
        quote! {
            #column => match <#ty as cassorm::FromValue>::from_value(value) {
                Ok(v) => {
                    self.#ident = v;
                    true
                }
                Err(_) => false,
            },
        }
    });

    let field_arms = columns.iter().map(|(ident, _, column)| {
        quote! {
            #column => Some(cassorm::Value::from(self.#ident.clone())),
        }
    });

    Ok(quote! {
        impl #impl_generics cassorm::Entity for #name #ty_generics #where_clause {
            const FILLABLE: &'static [&'static str] = &[#(#fillable),*];

            fn id(&self) -> &str {
                &self.#id_ident
            }

            fn set_id(&mut self, id: impl Into<String>) -> &mut Self {
                self.#id_ident = id.into();
                self
            }

            fn assign(&mut self, column: &str, value: cassorm::Value) -> bool {
                match column {
                    "id" => match <String as cassorm::FromValue>::from_value(value) {
                        Ok(v) => {
                            self.#id_ident = v;
                            true
                        }
                        Err(_) => false,
                    },
                    #(#assign_arms)*
                    _ => false,
                }
            }

            fn field(&self, column: &str) -> Option<cassorm::Value> {
                match column {
                    "id" => Some(cassorm::Value::from(self.#id_ident.clone())),
                    #(#field_arms)*
                    _ => None,
                }
            }
        }

        impl #impl_generics ::std::fmt::Display for #name #ty_generics #where_clause {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt(&cassorm::Entity::to_record(self), f)
            }
        }
    })
}
