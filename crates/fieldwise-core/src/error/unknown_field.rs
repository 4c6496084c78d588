use super::Error;

/// Error when a textual field graph names a field the tag type does not have.
#[derive(Debug)]
pub(super) struct UnknownField {
    tag_type: &'static str,
    name: Box<str>,
    offset: usize,
}

impl std::error::Error for UnknownField {}

impl core::fmt::Display for UnknownField {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "unknown field `{}` for {} at offset {}",
            self.name, self.tag_type, self.offset
        )
    }
}

impl Error {
    /// Creates an unknown field error for `name`, found at character `offset` of the input.
    pub fn unknown_field(tag_type: &'static str, name: impl Into<String>, offset: usize) -> Error {
        Error::from(super::ErrorKind::UnknownField(UnknownField {
            tag_type,
            name: name.into().into(),
            offset,
        }))
    }

    /// Returns `true` if this error is an unknown field error.
    pub fn is_unknown_field(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::UnknownField(_)))
    }

    /// Returns the offending name and its offset if this is an unknown field error.
    pub fn unknown_field_location(&self) -> Option<(&str, usize)> {
        self.chain().find_map(|err| match err.kind() {
            super::ErrorKind::UnknownField(err) => Some((&*err.name, err.offset)),
            _ => None,
        })
    }
}
