use super::FieldAttr;

use heck::ToLowerCamelCase;

#[derive(Debug)]
pub(crate) struct Variant {
    /// Declaration index, used as the tag ordinal
    pub(crate) ordinal: usize,

    pub(crate) ident: syn::Ident,

    /// Textual name in the graph form
    pub(crate) name: String,

    /// Where the name came from, for diagnostics
    pub(crate) name_span: proc_macro2::Span,

    pub(crate) nested: Option<syn::Type>,
}

impl Variant {
    pub(super) fn from_ast(variant: &syn::Variant, ordinal: usize) -> syn::Result<Self> {
        if !matches!(variant.fields, syn::Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "FieldTag variants cannot carry data",
            ));
        }

        let attr = FieldAttr::from_ast(&variant.attrs)?;

        let (name, name_span) = match &attr.rename {
            Some(lit) => (lit.value(), lit.span()),
            None => (
                variant.ident.to_string().to_lower_camel_case(),
                variant.ident.span(),
            ),
        };

        if !super::is_graph_identifier(&name) {
            return Err(syn::Error::new(
                name_span,
                format!("`{name}` is not a valid field name; expected [A-Za-z_$][A-Za-z0-9_$]*"),
            ));
        }

        Ok(Variant {
            ordinal,
            ident: variant.ident.clone(),
            name,
            name_span,
            nested: attr.nested,
        })
    }
}
