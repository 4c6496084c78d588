use super::Error;

/// Error when a resolver cannot supply data an operation depends on.
///
/// This occurs when:
/// - A resolver reports the entity as absent while extending it
/// - The value a resolver returns does not cover the requested graph
/// - A nested member cannot be located inside the resolved extension
#[derive(Debug)]
pub(super) struct EntityUnavailable {
    entity: Box<str>,
}

impl std::error::Error for EntityUnavailable {}

impl core::fmt::Display for EntityUnavailable {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "entity unavailable: {}", self.entity)
    }
}

impl Error {
    /// Creates an entity unavailable error describing the entity that could not be supplied.
    pub fn entity_unavailable(entity: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::EntityUnavailable(EntityUnavailable {
            entity: entity.into().into(),
        }))
    }

    /// Returns `true` if this error, or any error it wraps, is an entity unavailable error.
    pub fn is_entity_unavailable(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::EntityUnavailable(_)))
    }
}
