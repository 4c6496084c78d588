mod diagnostics;
pub(crate) use diagnostics::Diagnostics;

mod field_attr;
pub(crate) use field_attr::FieldAttr;

mod tag;
pub(crate) use tag::Tag;

mod variant;
pub(crate) use variant::Variant;

/// Returns `true` if `name` can appear in the textual graph form.
pub(crate) fn is_graph_identifier(name: &str) -> bool {
    let mut chars = name.chars();

    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }

    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
