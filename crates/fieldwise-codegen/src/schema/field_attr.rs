use super::Diagnostics;

/// Arguments of `#[field(...)]` on a variant.
#[derive(Debug, Default)]
pub(crate) struct FieldAttr {
    /// `rename = "name"`: textual name overriding the derived one
    pub(crate) rename: Option<syn::LitStr>,

    /// `nested = OtherField`: tag type of the field-aware values this field
    /// holds
    pub(crate) nested: Option<syn::Type>,
}

impl FieldAttr {
    pub(super) fn from_ast(attrs: &[syn::Attribute]) -> syn::Result<Self> {
        let mut diagnostics = Diagnostics::new();
        let mut result = FieldAttr::default();

        for attr in attrs {
            if !attr.path().is_ident("field") {
                continue;
            }

            let parsed = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    let lit: syn::LitStr = meta.value()?.parse()?;

                    if result.rename.is_some() {
                        diagnostics.spanned(&meta.path, "duplicate `rename` argument");
                    } else {
                        result.rename = Some(lit);
                    }
                } else if meta.path.is_ident("nested") {
                    let ty: syn::Type = meta.value()?.parse()?;

                    if result.nested.is_some() {
                        diagnostics.spanned(&meta.path, "duplicate `nested` argument");
                    } else {
                        result.nested = Some(ty);
                    }
                } else {
                    return Err(meta.error("unknown argument; expected `rename` or `nested`"));
                }

                Ok(())
            });

            diagnostics.absorb(parsed);
        }

        diagnostics.finish(result)
    }
}
