//! Synchronous access to a backing store of entities.

use crate::{Entity, FieldGraph, Result};

use std::sync::Arc;

/// Looks entities up by id.
///
/// A resolver returns a value holding at least the requested graph, or
/// `None` when no entity has the id. Failures are reported as errors and are
/// never retried by callers in this crate.
pub trait Resolver<E: Entity> {
    fn get(&self, id: &E::Id, graph: &FieldGraph<E::Field>) -> Result<Option<E>>;

    /// Returns `true` if an entity with `id` exists.
    fn exists(&self, id: &E::Id) -> Result<bool> {
        Ok(self.get(id, &FieldGraph::none())?.is_some())
    }

    /// Fresh value for `id` with no field initialized.
    fn construct(&self, id: E::Id) -> E {
        E::reference_to(id)
    }
}

impl<E: Entity, R: Resolver<E> + ?Sized> Resolver<E> for &R {
    fn get(&self, id: &E::Id, graph: &FieldGraph<E::Field>) -> Result<Option<E>> {
        (**self).get(id, graph)
    }
}

impl<E: Entity, R: Resolver<E> + ?Sized> Resolver<E> for Box<R> {
    fn get(&self, id: &E::Id, graph: &FieldGraph<E::Field>) -> Result<Option<E>> {
        (**self).get(id, graph)
    }
}

impl<E: Entity, R: Resolver<E> + ?Sized> Resolver<E> for Arc<R> {
    fn get(&self, id: &E::Id, graph: &FieldGraph<E::Field>) -> Result<Option<E>> {
        (**self).get(id, graph)
    }
}

/// Resolver backed by a closure.
///
/// ```ignore
/// let people = resolver::from_fn::<Person, _>(|id, graph| store.load(*id, graph));
/// ```
pub fn from_fn<E, F>(f: F) -> FromFn<F>
where
    E: Entity,
    F: Fn(&E::Id, &FieldGraph<E::Field>) -> Result<Option<E>>,
{
    FromFn(f)
}

/// See [`from_fn`].
#[derive(Clone)]
pub struct FromFn<F>(F);

impl<E, F> Resolver<E> for FromFn<F>
where
    E: Entity,
    F: Fn(&E::Id, &FieldGraph<E::Field>) -> Result<Option<E>>,
{
    fn get(&self, id: &E::Id, graph: &FieldGraph<E::Field>) -> Result<Option<E>> {
        (self.0)(id, graph)
    }
}
