use super::{check_nested, FieldGraph, RawGraph};
use crate::{field::FieldTag, Result};

use core::fmt;
use core::marker::PhantomData;

/// Accumulates a [`FieldGraph`].
///
/// Adding a tag that is already present unions its subgraph with the new one;
/// only [`Builder::set`] replaces a subtree.
pub struct Builder<F> {
    raw: RawGraph,
    _tag: PhantomData<fn() -> F>,
}

impl<F: FieldTag> Builder<F> {
    pub fn new() -> Self {
        Self {
            raw: RawGraph::new(F::schema()),
            _tag: PhantomData,
        }
    }

    /// Adds `field` without a subgraph.
    pub fn add(&mut self, field: F) -> &mut Self {
        self.raw.merge_entry(field.ordinal(), None);
        self
    }

    /// Adds every tag in `fields`, without subgraphs.
    pub fn add_all(&mut self, fields: impl IntoIterator<Item = F>) -> &mut Self {
        for field in fields {
            self.add(field);
        }
        self
    }

    /// Adds `field` with `subgraph`, which must be over the nested tag type
    /// `field` declares.
    pub fn add_graph<G: FieldTag>(
        &mut self,
        field: F,
        subgraph: FieldGraph<G>,
    ) -> Result<&mut Self> {
        check_nested::<F, G>(field)?;
        self.raw
            .merge_entry(field.ordinal(), Some(subgraph.into_raw()));
        Ok(self)
    }

    /// Deep union of `graph` into this builder.
    pub fn merge(&mut self, graph: &FieldGraph<F>) -> &mut Self {
        self.raw.merge(graph.raw());
        self
    }

    /// Removes `field` along with its whole subtree.
    pub fn remove(&mut self, field: F) -> &mut Self {
        self.raw.entries.shift_remove(&field.ordinal());
        self
    }

    /// Replaces the subtree of `field`, adding `field` if absent.
    pub fn set<G: FieldTag>(
        &mut self,
        field: F,
        subgraph: Option<FieldGraph<G>>,
    ) -> Result<&mut Self> {
        if subgraph.is_some() {
            check_nested::<F, G>(field)?;
        }
        self.raw
            .entries
            .insert(field.ordinal(), subgraph.map(FieldGraph::into_raw));
        Ok(self)
    }

    /// Unions an untyped subtree under `field`. The subtree must come from a
    /// graph over `F`.
    pub(crate) fn insert_raw(&mut self, field: F, subgraph: Option<RawGraph>) -> &mut Self {
        self.raw.merge_entry(field.ordinal(), subgraph);
        self
    }

    pub fn contains(&self, field: F) -> bool {
        self.raw.entries.contains_key(&field.ordinal())
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn build(&self) -> FieldGraph<F> {
        let mut raw = self.raw.clone();
        raw.normalize();
        FieldGraph::from_raw(raw)
    }
}

impl<F: FieldTag> Default for Builder<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> fmt::Debug for Builder<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Builder<{}>({})", self.raw.schema.name, self.raw)
    }
}

impl<F: FieldTag> From<&FieldGraph<F>> for Builder<F> {
    fn from(graph: &FieldGraph<F>) -> Self {
        Self {
            raw: graph.raw().clone(),
            _tag: PhantomData,
        }
    }
}

impl<F: FieldTag> From<FieldGraph<F>> for Builder<F> {
    fn from(graph: FieldGraph<F>) -> Self {
        Self {
            raw: graph.into_raw(),
            _tag: PhantomData,
        }
    }
}
