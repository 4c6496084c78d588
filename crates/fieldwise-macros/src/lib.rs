extern crate proc_macro;

use proc_macro::TokenStream;

/// Implements `FieldTag` for a fieldless enum.
///
/// Variants take `#[field(rename = "...")]` and `#[field(nested = OtherField)]`;
/// the enum takes `#[field(name = "...")]`.
#[proc_macro_derive(FieldTag, attributes(field))]
pub fn derive_field_tag(input: TokenStream) -> TokenStream {
    match fieldwise_codegen::generate(input.into()) {
        Ok(output) => output.into(),
        Err(e) => e.to_compile_error().into(),
    }
}
