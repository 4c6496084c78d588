use super::Error;

/// Error when traversal of a nested field meets a value with no field-aware
/// members: a scalar, or a map whose keys and values are both scalars.
///
/// This is a schema error, the field's declared nested type does not match
/// the value it holds.
#[derive(Debug)]
pub(super) struct UnsupportedShape {
    field: &'static str,
    ty: &'static str,
}

impl std::error::Error for UnsupportedShape {}

impl core::fmt::Display for UnsupportedShape {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "unsupported shape: field `{}` holds {}, which has no field-aware members",
            self.field, self.ty
        )
    }
}

impl Error {
    /// Creates an unsupported shape error for `field` holding a value of type `ty`.
    pub fn unsupported_shape(field: &'static str, ty: &'static str) -> Error {
        Error::from(super::ErrorKind::UnsupportedShape(UnsupportedShape { field, ty }))
    }

    /// Returns `true` if this error is an unsupported shape error.
    pub fn is_unsupported_shape(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::UnsupportedShape(_)))
    }
}
