use super::Error;

/// Error when a subgraph is attached to, or requested from, a field with a
/// different nested tag type.
#[derive(Debug)]
pub(super) struct TypeMismatch {
    field: &'static str,
    expected: &'static str,
    actual: &'static str,
}

impl std::error::Error for TypeMismatch {}

impl core::fmt::Display for TypeMismatch {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "type mismatch: field `{}` declares nested {}, got {}",
            self.field, self.expected, self.actual
        )
    }
}

impl Error {
    /// Creates a type mismatch error. `expected` is the nested tag type the
    /// field declares (or `"no nested type"`), `actual` the one supplied.
    pub fn type_mismatch(
        field: &'static str,
        expected: &'static str,
        actual: &'static str,
    ) -> Error {
        Error::from(super::ErrorKind::TypeMismatch(TypeMismatch {
            field,
            expected,
            actual,
        }))
    }

    /// Returns `true` if this error is a type mismatch error.
    pub fn is_type_mismatch(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::TypeMismatch(_)))
    }
}
