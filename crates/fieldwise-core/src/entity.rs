use crate::{aware::short_type_name, Error, FieldAware, FieldGraph, Resolver, Result};

use core::fmt;
use core::hash::Hash;

/// A field-aware value with an identity.
///
/// Two values with the same id denote the same entity regardless of which
/// fields they hold, so `PartialEq` implementations compare ids only.
pub trait Entity: FieldAware {
    type Id: Clone + Eq + Hash + fmt::Debug + Send + Sync + 'static;

    fn id(&self) -> &Self::Id;

    /// The reference to `id`: only the identity is set.
    fn reference_to(id: Self::Id) -> Self;

    /// [`extend`](FieldAware::extend) with the gap fetched from `resolver`.
    ///
    /// The resolver reporting the entity as absent is an entity-unavailable
    /// error.
    fn extend_from<R>(&mut self, graph: &FieldGraph<Self::Field>, resolver: &R) -> Result<bool>
    where
        R: Resolver<Self> + ?Sized,
    {
        let id = self.id().clone();

        self.extend(graph, |missing| match resolver.get(&id, missing)? {
            Some(extension) => Ok(Some(extension)),
            None => Err(Error::entity_unavailable(format!(
                "{}({id:?})",
                short_type_name::<Self>()
            ))),
        })
    }
}
