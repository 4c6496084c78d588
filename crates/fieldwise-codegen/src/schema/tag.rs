use super::{Diagnostics, Variant};

use std::collections::HashMap;

#[derive(Debug)]
pub(crate) struct Tag {
    /// The tag enum
    pub(crate) ident: syn::Ident,

    /// Name used in diagnostics. Defaults to the enum name without its
    /// `Field` suffix, so `PersonField` reports as `Person`.
    pub(crate) name: String,

    /// Variants in declaration order
    pub(crate) variants: Vec<Variant>,
}

impl Tag {
    pub(crate) fn from_ast(item: &syn::DeriveInput) -> syn::Result<Self> {
        let syn::Data::Enum(data) = &item.data else {
            return Err(syn::Error::new_spanned(
                &item.ident,
                "FieldTag can only be derived for enums",
            ));
        };

        if !item.generics.params.is_empty() {
            return Err(syn::Error::new_spanned(
                &item.generics,
                "FieldTag enums cannot be generic",
            ));
        }

        let mut diagnostics = Diagnostics::new();

        let name = diagnostics
            .absorb(tag_name(&item.attrs))
            .flatten()
            .unwrap_or_else(|| default_name(&item.ident));

        let mut variants = vec![];
        let mut seen: HashMap<String, syn::Ident> = HashMap::new();

        for (ordinal, node) in data.variants.iter().enumerate() {
            let Some(variant) = diagnostics.absorb(Variant::from_ast(node, ordinal)) else {
                continue;
            };

            if let Some(first) = seen.get(&variant.name) {
                diagnostics.error(
                    variant.name_span,
                    format_args!(
                        "duplicate field name `{}`; already used by `{first}`",
                        variant.name
                    ),
                );
                continue;
            }

            seen.insert(variant.name.clone(), variant.ident.clone());
            variants.push(variant);
        }

        diagnostics.finish(Tag {
            ident: item.ident.clone(),
            name,
            variants,
        })
    }
}

/// Reads `#[field(name = "...")]` on the enum itself.
fn tag_name(attrs: &[syn::Attribute]) -> syn::Result<Option<String>> {
    let mut name: Option<syn::LitStr> = None;

    for attr in attrs {
        if !attr.path().is_ident("field") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if !meta.path.is_ident("name") {
                return Err(meta.error("unknown argument; expected `name`"));
            }

            let lit: syn::LitStr = meta.value()?.parse()?;
            if name.is_some() {
                return Err(syn::Error::new_spanned(&meta.path, "duplicate `name` argument"));
            }
            name = Some(lit);
            Ok(())
        })?;
    }

    Ok(name.map(|lit| lit.value()))
}

fn default_name(ident: &syn::Ident) -> String {
    let ident = ident.to_string();

    match ident.strip_suffix("Field") {
        Some(stripped) if !stripped.is_empty() => stripped.to_string(),
        _ => ident,
    }
}
