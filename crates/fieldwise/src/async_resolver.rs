use crate::{Entity, Error, FieldGraph, Result};

use async_trait::async_trait;
use std::sync::Arc;

/// Asynchronous counterpart of [`Resolver`](crate::Resolver).
#[async_trait]
pub trait AsyncResolver<E: Entity + Send + 'static>: Send + Sync {
    async fn get(&self, id: &E::Id, graph: &FieldGraph<E::Field>) -> Result<Option<E>>;
}

#[async_trait]
impl<E, R> AsyncResolver<E> for Arc<R>
where
    E: Entity + Send + 'static,
    R: AsyncResolver<E> + ?Sized,
{
    async fn get(&self, id: &E::Id, graph: &FieldGraph<E::Field>) -> Result<Option<E>> {
        (**self).get(id, graph).await
    }
}

#[async_trait]
impl<E, R> AsyncResolver<E> for Box<R>
where
    E: Entity + Send + 'static,
    R: AsyncResolver<E> + ?Sized,
{
    async fn get(&self, id: &E::Id, graph: &FieldGraph<E::Field>) -> Result<Option<E>> {
        (**self).get(id, graph).await
    }
}

/// [`Entity::extend_from`] over an asynchronous resolver.
pub async fn extend_async<E, R>(
    entity: &mut E,
    graph: &FieldGraph<E::Field>,
    resolver: &R,
) -> Result<bool>
where
    E: Entity + Send + 'static,
    R: AsyncResolver<E> + ?Sized,
{
    let missing = entity.missing_graph(graph)?;

    if missing.is_empty() {
        return Ok(false);
    }

    let fetched = resolver.get(entity.id(), &missing).await?;

    let Some(extension) = fetched else {
        return Err(Error::entity_unavailable(format!(
            "{}({:?})",
            fieldwise_core::short_type_name::<E>(),
            entity.id()
        )));
    };

    entity.extend(graph, move |_| Ok(Some(extension)))
}
