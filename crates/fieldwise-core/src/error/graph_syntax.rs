use super::Error;

/// Error when a textual field graph is structurally malformed.
///
/// This occurs when:
/// - A field name is empty
/// - A `{` is never closed, or a `}` appears where none is open
/// - An illegal character follows a field name
/// - Subfields are given for a field with no nested type
#[derive(Debug)]
pub(super) struct GraphSyntax {
    message: Box<str>,
    offset: usize,
}

impl std::error::Error for GraphSyntax {}

impl core::fmt::Display for GraphSyntax {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "invalid field graph at offset {}: {}",
            self.offset, self.message
        )
    }
}

impl Error {
    /// Creates a field graph syntax error at character `offset` of the input.
    pub fn graph_syntax(message: impl Into<String>, offset: usize) -> Error {
        Error::from(super::ErrorKind::GraphSyntax(GraphSyntax {
            message: message.into().into(),
            offset,
        }))
    }

    /// Returns `true` if this error is a field graph syntax error.
    pub fn is_graph_syntax(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::GraphSyntax(_)))
    }

    /// Returns the character offset of a syntax or unknown field error.
    pub fn offset(&self) -> Option<usize> {
        self.chain().find_map(|err| match err.kind() {
            super::ErrorKind::GraphSyntax(err) => Some(err.offset),
            super::ErrorKind::UnknownField(_) => err.unknown_field_location().map(|(_, o)| o),
            _ => None,
        })
    }
}
