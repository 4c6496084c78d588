use super::Error;

/// Error when a field is read, or cloned, while it is not initialized.
///
/// This is a contract violation at the call site: callers are expected to
/// request (or check for) a field before touching it.
#[derive(Debug)]
pub(super) struct FieldUnavailable {
    tag_type: &'static str,
    fields: Box<[&'static str]>,
}

impl std::error::Error for FieldUnavailable {}

impl core::fmt::Display for FieldUnavailable {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "field unavailable: {} {{", self.tag_type)?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(field)?;
        }
        f.write_str("}")
    }
}

impl Error {
    /// Creates a field unavailable error naming every missing field.
    pub fn field_unavailable(
        tag_type: &'static str,
        fields: impl IntoIterator<Item = &'static str>,
    ) -> Error {
        Error::from(super::ErrorKind::FieldUnavailable(FieldUnavailable {
            tag_type,
            fields: fields.into_iter().collect(),
        }))
    }

    /// Returns `true` if this error, or any error it wraps, is a field unavailable error.
    pub fn is_field_unavailable(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::FieldUnavailable(_)))
    }
}
