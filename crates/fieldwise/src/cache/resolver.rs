use super::EntityCache;
use crate::{Entity, FieldGraph, Resolver, Result};

use std::sync::Arc;

/// Serves reads through an [`EntityCache`], fetching misses from `inner`.
///
/// Change notifications are fed in through [`modified`](Self::modified) and
/// [`deleted`](Self::deleted); nothing is subscribed to automatically.
pub struct CachingResolver<E: Entity, R> {
    cache: Arc<EntityCache<E>>,
    inner: R,
}

impl<E: Entity, R: Resolver<E>> CachingResolver<E, R> {
    pub fn new(cache: Arc<EntityCache<E>>, inner: R) -> Self {
        CachingResolver { cache, inner }
    }

    pub fn cache(&self) -> &Arc<EntityCache<E>> {
        &self.cache
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Merges a freshly written value into the cache.
    pub fn modified(&self, value: &E) -> Result<()> {
        self.cache.merge(value)
    }

    /// Forgets a deleted entity.
    pub fn deleted(&self, id: &E::Id) -> bool {
        self.cache.clear(id)
    }
}

impl<E: Entity, R: Resolver<E>> Resolver<E> for CachingResolver<E, R> {
    fn get(&self, id: &E::Id, graph: &FieldGraph<E::Field>) -> Result<Option<E>> {
        self.cache.get(id, graph, &self.inner)
    }
}
