mod builder;
pub use builder::Builder;

mod resolver;
pub use resolver::CachingResolver;

use crate::{
    extend_async, AsyncResolver, Entity, Error, FieldAware, FieldGraph, FieldSet, Resolver, Result,
};

use fieldwise_core::short_type_name;
use log::{debug, trace};
use std::collections::hash_map::{Entry, HashMap};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Incremental cache of partially loaded entities.
///
/// Only the configured cacheable fields are ever stored, and nested
/// field-aware values are stored as references. Reads fetch from a resolver
/// exactly the part of the requested graph the cache cannot serve, then
/// return a value holding exactly the requested graph.
///
/// Reads take the shared lock; writes take the exclusive lock. No lock is
/// held while a resolver runs, so two concurrent misses for one id may both
/// fetch; the second refresh merges into the first.
pub struct EntityCache<E: Entity> {
    cacheable: FieldSet<E::Field>,
    precached: FieldSet<E::Field>,
    entries: RwLock<HashMap<E::Id, E>>,
}

impl<E: Entity> EntityCache<E> {
    pub fn builder() -> Builder<E> {
        Builder::default()
    }

    /// Fields that are stored.
    pub fn cacheable_fields(&self) -> &FieldSet<E::Field> {
        &self.cacheable
    }

    /// Fields fetched along with every read, whether requested or not.
    pub fn precached_fields(&self) -> &FieldSet<E::Field> {
        &self.precached
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn contains(&self, id: &E::Id) -> bool {
        self.read().contains_key(id)
    }

    /// Copy of the stored value for `id`, without fetching.
    pub fn cached(&self, id: &E::Id) -> Result<Option<E>> {
        self.read().get(id).map(FieldAware::clone_all).transpose()
    }

    /// Reads `id` holding exactly `graph`, fetching what the cache lacks from
    /// `resolver`.
    ///
    /// Returns `None` when the entity is not cached and `resolver` reports it
    /// absent.
    pub fn get<R>(
        &self,
        id: &E::Id,
        graph: &FieldGraph<E::Field>,
        resolver: &R,
    ) -> Result<Option<E>>
    where
        R: Resolver<E> + ?Sized,
    {
        let request = self.request_graph(graph);

        let value = match self.cached(id)? {
            Some(mut value) => {
                let stored = value.fields().clone();
                value.extend_from(&request, resolver)?;
                self.refresh_if_grown(&stored, &value)?;
                value
            }
            None => {
                debug!(
                    "cache miss for {}({id:?}); fetching {{{request}}}",
                    short_type_name::<E>()
                );
                let Some(value) = resolver.get(id, &request)? else {
                    return Ok(None);
                };
                ensure_fetched(&value, &request)?;
                self.refresh(&value)?;
                value
            }
        };

        narrow(value, graph).map(Some)
    }

    /// [`get`](Self::get) over an asynchronous resolver.
    pub async fn get_async<R>(
        &self,
        id: &E::Id,
        graph: &FieldGraph<E::Field>,
        resolver: &R,
    ) -> Result<Option<E>>
    where
        E: Send + 'static,
        R: AsyncResolver<E> + ?Sized,
    {
        let request = self.request_graph(graph);

        let value = match self.cached(id)? {
            Some(mut value) => {
                let stored = value.fields().clone();
                extend_async(&mut value, &request, resolver).await?;
                self.refresh_if_grown(&stored, &value)?;
                value
            }
            None => {
                debug!(
                    "cache miss for {}({id:?}); fetching {{{request}}}",
                    short_type_name::<E>()
                );
                let Some(value) = resolver.get(id, &request).await? else {
                    return Ok(None);
                };
                ensure_fetched(&value, &request)?;
                self.refresh(&value)?;
                value
            }
        };

        narrow(value, graph).map(Some)
    }

    /// Replaces the stored value of `value`'s id with its cacheable fields.
    pub fn put(&self, value: &E) -> Result<()> {
        let Some(projection) = self.project(value)? else {
            return Ok(());
        };

        self.write().insert(value.id().clone(), projection);
        Ok(())
    }

    /// Merges the cacheable fields of `value` into the stored value,
    /// inserting it if absent.
    pub fn merge(&self, value: &E) -> Result<()> {
        self.refresh(value)
    }

    pub fn clear_all(&self) {
        self.write().clear();
    }

    /// Drops the stored value for `id`. Returns `true` if one existed.
    pub fn clear(&self, id: &E::Id) -> bool {
        self.write().remove(id).is_some()
    }

    /// Drops `fields` from the stored value for `id`, removing the entry
    /// once it holds nothing. Returns `true` if anything was dropped.
    pub fn clear_fields(&self, id: &E::Id, fields: &FieldSet<E::Field>) -> Result<bool> {
        let mut entries = self.write();
        clear_entry_fields(&mut entries, id, fields)
    }

    pub fn clear_entity(&self, value: &E) -> bool {
        self.clear(value.id())
    }

    /// Drops every stored value matching `predicate`. Returns how many were
    /// dropped.
    pub fn clear_matching(&self, mut predicate: impl FnMut(&E) -> bool) -> usize {
        let mut entries = self.write();
        let before = entries.len();
        entries.retain(|_, value| !predicate(&*value));
        before - entries.len()
    }

    /// Drops `fields` from every stored value matching `predicate`.
    pub fn clear_matching_fields(
        &self,
        mut predicate: impl FnMut(&E) -> bool,
        fields: &FieldSet<E::Field>,
    ) -> Result<usize> {
        let mut entries = self.write();

        let matching: Vec<E::Id> = entries
            .iter()
            .filter(|(_, value)| predicate(*value))
            .map(|(id, _)| id.clone())
            .collect();

        let mut cleared = 0;
        for id in &matching {
            if clear_entry_fields(&mut entries, id, fields)? {
                cleared += 1;
            }
        }
        Ok(cleared)
    }

    pub fn clear_ids<'a>(&self, ids: impl IntoIterator<Item = &'a E::Id>) -> usize {
        let mut entries = self.write();
        ids.into_iter()
            .filter(|id| entries.remove(*id).is_some())
            .count()
    }

    pub fn clear_ids_fields<'a>(
        &self,
        ids: impl IntoIterator<Item = &'a E::Id>,
        fields: &FieldSet<E::Field>,
    ) -> Result<usize> {
        let mut entries = self.write();

        let mut cleared = 0;
        for id in ids {
            if clear_entry_fields(&mut entries, id, fields)? {
                cleared += 1;
            }
        }
        Ok(cleared)
    }

    pub fn clear_entities<'a>(&self, values: impl IntoIterator<Item = &'a E>) -> usize
    where
        E: 'a,
    {
        self.clear_ids(values.into_iter().map(Entity::id))
    }

    pub fn clear_entities_fields<'a>(
        &self,
        values: impl IntoIterator<Item = &'a E>,
        fields: &FieldSet<E::Field>,
    ) -> Result<usize>
    where
        E: 'a,
    {
        self.clear_ids_fields(values.into_iter().map(Entity::id), fields)
    }

    fn request_graph(&self, graph: &FieldGraph<E::Field>) -> FieldGraph<E::Field> {
        if self.precached.is_empty() {
            return graph.clone();
        }

        let mut builder = graph.to_builder();
        builder.add_all(self.precached.iter());
        builder.build()
    }

    /// The cacheable part of `value`, flattened. `None` when `value` holds no
    /// cacheable field.
    fn project(&self, value: &E) -> Result<Option<E>> {
        let fields = value.fields().intersection(&self.cacheable);

        if fields.is_empty() {
            return Ok(None);
        }

        value.clone_graph(&FieldGraph::from(&fields)).map(Some)
    }

    fn refresh(&self, value: &E) -> Result<()> {
        let Some(projection) = self.project(value)? else {
            return Ok(());
        };

        let mut entries = self.write();
        match entries.entry(value.id().clone()) {
            Entry::Occupied(mut entry) => {
                debug!(
                    "refreshing {}({:?}) with {:?}",
                    short_type_name::<E>(),
                    value.id(),
                    projection.fields()
                );
                entry.get_mut().pull_all(&projection)?;
            }
            Entry::Vacant(entry) => {
                debug!(
                    "caching {}({:?}) with {:?}",
                    short_type_name::<E>(),
                    value.id(),
                    projection.fields()
                );
                entry.insert(projection);
            }
        }
        Ok(())
    }

    /// Refreshes the stored value only if `value` gained cacheable fields
    /// over the `stored` ones.
    fn refresh_if_grown(&self, stored: &FieldSet<E::Field>, value: &E) -> Result<()> {
        let held = value.fields().intersection(&self.cacheable);

        if held.is_subset(stored) {
            trace!("cache hit for {}({:?})", short_type_name::<E>(), value.id());
            return Ok(());
        }

        self.refresh(value)
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<E::Id, E>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<E::Id, E>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn clear_entry_fields<E: Entity>(
    entries: &mut HashMap<E::Id, E>,
    id: &E::Id,
    fields: &FieldSet<E::Field>,
) -> Result<bool> {
    let Some(value) = entries.get_mut(id) else {
        return Ok(false);
    };

    let cleared = value.clear_fields(fields.iter())?;

    if value.fields().is_empty() {
        entries.remove(id);
    }

    Ok(cleared)
}

/// Fails when a resolver answered with less than `request`.
fn ensure_fetched<E: Entity>(value: &E, request: &FieldGraph<E::Field>) -> Result<()> {
    let lacking = value.missing_graph(request)?;

    if lacking.is_empty() {
        return Ok(());
    }

    Err(Error::entity_unavailable(format!(
        "{}({:?}) was fetched without {{{lacking}}}",
        short_type_name::<E>(),
        value.id()
    )))
}

/// `value` restricted to exactly `graph`.
fn narrow<E: Entity>(mut value: E, graph: &FieldGraph<E::Field>) -> Result<E> {
    value.intersect(graph)?;
    Ok(value)
}

impl<E: Entity> std::fmt::Debug for EntityCache<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityCache")
            .field("cacheable", &self.cacheable)
            .field("precached", &self.precached)
            .field("len", &self.len())
            .finish()
    }
}
