use std::fmt;

/// Problems found in a `#[derive(FieldTag)]` input, reported together.
#[derive(Debug, Default)]
pub(crate) struct Diagnostics {
    errors: Vec<syn::Error>,
}

impl Diagnostics {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn error(&mut self, span: proc_macro2::Span, message: impl fmt::Display) {
        self.errors.push(syn::Error::new(span, message));
    }

    pub(crate) fn spanned(&mut self, tokens: impl quote::ToTokens, message: impl fmt::Display) {
        self.errors.push(syn::Error::new_spanned(tokens, message));
    }

    /// Records the error of `result`, if any, and returns its value.
    pub(crate) fn absorb<T>(&mut self, result: syn::Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.errors.push(err);
                None
            }
        }
    }

    /// `value` when nothing was recorded; otherwise every recorded error, in
    /// the order found.
    pub(crate) fn finish<T>(self, value: T) -> syn::Result<T> {
        let mut errors = self.errors.into_iter();

        let Some(mut combined) = errors.next() else {
            return Ok(value);
        };

        for err in errors {
            combined.combine(err);
        }

        Err(combined)
    }
}
