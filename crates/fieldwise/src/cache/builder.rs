use super::EntityCache;
use crate::{Entity, Error, FieldSet, Result};

use std::collections::HashMap;
use std::sync::RwLock;

/// Configures an [`EntityCache`].
///
/// ```ignore
/// let cache = EntityCache::<Person>::builder()
///     .cacheable([PersonField::Name, PersonField::Email])
///     .precached([PersonField::Name])
///     .build()?;
/// ```
pub struct Builder<E: Entity> {
    cacheable: FieldSet<E::Field>,
    precached: FieldSet<E::Field>,
}

impl<E: Entity> Builder<E> {
    /// Adds fields the cache stores. At least one is required.
    pub fn cacheable(&mut self, fields: impl IntoIterator<Item = E::Field>) -> &mut Self {
        self.cacheable.extend(fields);
        self
    }

    /// Adds fields fetched along with every read. Each must also be
    /// cacheable.
    pub fn precached(&mut self, fields: impl IntoIterator<Item = E::Field>) -> &mut Self {
        self.precached.extend(fields);
        self
    }

    pub fn build(&mut self) -> Result<EntityCache<E>> {
        if self.cacheable.is_empty() {
            return Err(Error::invalid_configuration(
                "an entity cache needs at least one cacheable field",
            ));
        }

        let stray = self.precached.difference(&self.cacheable);
        if !stray.is_empty() {
            return Err(Error::invalid_configuration(format!(
                "precached fields {:?} are not cacheable",
                stray.names().collect::<Vec<_>>()
            )));
        }

        Ok(EntityCache {
            cacheable: self.cacheable.clone(),
            precached: self.precached.clone(),
            entries: RwLock::new(HashMap::new()),
        })
    }
}

impl<E: Entity> Default for Builder<E> {
    fn default() -> Self {
        Builder {
            cacheable: FieldSet::new(),
            precached: FieldSet::new(),
        }
    }
}
