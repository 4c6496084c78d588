use crate::{FieldAware, FieldGraph, FieldTag, Result};

use indexmap::{IndexMap, IndexSet};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::{BuildHasher, Hash};

/// A value that holds zero or more field-aware leaves of kind `L`.
///
/// This is the one traversal used by every recursive algorithm: a nested
/// field's value is either a leaf, a sequence or set of trees, or a keyed
/// collection whose keys and/or values are trees. Scalars are opaque trees
/// with no leaves.
///
/// Leaf kinds opt in through [`field_tree_leaf!`](crate::field_tree_leaf).
pub trait FieldTree<L: FieldAware>: Sized {
    /// `true` when no value of this type can ever contain a leaf.
    const OPAQUE: bool = false;

    /// Appends references to every leaf, in traversal order.
    fn leaves<'a>(&'a self, out: &mut Vec<&'a L>);

    /// Applies `f` to every leaf.
    ///
    /// Hash and ordered containers are rebuilt around the mutated members.
    /// On error the first failure is returned, and no member is dropped.
    fn try_for_each_leaf_mut(&mut self, f: &mut dyn FnMut(&mut L) -> Result<()>) -> Result<()>;

    /// Rebuilds the tree, replacing every leaf with the output of `f`.
    fn try_map_leaves(&self, f: &mut dyn FnMut(&L) -> Result<L>) -> Result<Self>;

    /// Copy of this tree for storage in `field`: each leaf is cloned through
    /// `graph`'s subgraph for `field` or, without a graph, cloned in full.
    fn clone_tree<F: FieldTag>(&self, field: F, graph: Option<&FieldGraph<F>>) -> Result<Self> {
        match graph {
            Some(graph) => {
                let subgraph = graph.subgraph::<L::Field>(field)?;
                self.try_map_leaves(&mut |leaf| leaf.clone_graph(&subgraph))
            }
            None => self.try_map_leaves(&mut |leaf| leaf.clone_all()),
        }
    }
}

/// Implements [`FieldTree`] for field-aware types, making each its own leaf.
///
/// ```ignore
/// fieldwise::field_tree_leaf!(Person, Boat, Marina);
/// ```
#[macro_export]
macro_rules! field_tree_leaf {
    ( $( $ty:ty ),* $(,)? ) => {
        $(
            impl $crate::FieldTree<$ty> for $ty {
                fn leaves<'a>(&'a self, out: &mut Vec<&'a $ty>) {
                    out.push(self);
                }

                fn try_for_each_leaf_mut(
                    &mut self,
                    f: &mut dyn FnMut(&mut $ty) -> $crate::Result<()>,
                ) -> $crate::Result<()> {
                    f(self)
                }

                fn try_map_leaves(
                    &self,
                    f: &mut dyn FnMut(&$ty) -> $crate::Result<$ty>,
                ) -> $crate::Result<$ty> {
                    f(self)
                }
            }
        )*
    };
}

macro_rules! opaque {
    ( $( $ty:ty ),* ) => {
        $(
            impl<L: FieldAware> FieldTree<L> for $ty {
                const OPAQUE: bool = true;

                fn leaves<'a>(&'a self, _out: &mut Vec<&'a L>) {}

                fn try_for_each_leaf_mut(
                    &mut self,
                    _f: &mut dyn FnMut(&mut L) -> Result<()>,
                ) -> Result<()> {
                    Ok(())
                }

                fn try_map_leaves(&self, _f: &mut dyn FnMut(&L) -> Result<L>) -> Result<Self> {
                    Ok(self.clone())
                }
            }
        )*
    };
}

opaque!(
    (), bool, char, String, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32,
    f64
);

impl<L: FieldAware, T: FieldTree<L>> FieldTree<L> for Option<T> {
    const OPAQUE: bool = T::OPAQUE;

    fn leaves<'a>(&'a self, out: &mut Vec<&'a L>) {
        if let Some(value) = self {
            value.leaves(out);
        }
    }

    fn try_for_each_leaf_mut(&mut self, f: &mut dyn FnMut(&mut L) -> Result<()>) -> Result<()> {
        match self {
            Some(value) => value.try_for_each_leaf_mut(&mut *f),
            None => Ok(()),
        }
    }

    fn try_map_leaves(&self, f: &mut dyn FnMut(&L) -> Result<L>) -> Result<Self> {
        self.as_ref().map(|value| value.try_map_leaves(&mut *f)).transpose()
    }
}

impl<L: FieldAware, T: FieldTree<L>> FieldTree<L> for Box<T> {
    const OPAQUE: bool = T::OPAQUE;

    fn leaves<'a>(&'a self, out: &mut Vec<&'a L>) {
        (**self).leaves(out);
    }

    fn try_for_each_leaf_mut(&mut self, f: &mut dyn FnMut(&mut L) -> Result<()>) -> Result<()> {
        (**self).try_for_each_leaf_mut(&mut *f)
    }

    fn try_map_leaves(&self, f: &mut dyn FnMut(&L) -> Result<L>) -> Result<Self> {
        (**self).try_map_leaves(&mut *f).map(Box::new)
    }
}

impl<L: FieldAware, T: FieldTree<L>> FieldTree<L> for Vec<T> {
    const OPAQUE: bool = T::OPAQUE;

    fn leaves<'a>(&'a self, out: &mut Vec<&'a L>) {
        for item in self {
            item.leaves(out);
        }
    }

    fn try_for_each_leaf_mut(&mut self, f: &mut dyn FnMut(&mut L) -> Result<()>) -> Result<()> {
        for item in self {
            item.try_for_each_leaf_mut(&mut *f)?;
        }
        Ok(())
    }

    fn try_map_leaves(&self, f: &mut dyn FnMut(&L) -> Result<L>) -> Result<Self> {
        self.iter().map(|item| item.try_map_leaves(&mut *f)).collect()
    }
}

impl<L: FieldAware, T: FieldTree<L>> FieldTree<L> for VecDeque<T> {
    const OPAQUE: bool = T::OPAQUE;

    fn leaves<'a>(&'a self, out: &mut Vec<&'a L>) {
        for item in self {
            item.leaves(out);
        }
    }

    fn try_for_each_leaf_mut(&mut self, f: &mut dyn FnMut(&mut L) -> Result<()>) -> Result<()> {
        for item in self {
            item.try_for_each_leaf_mut(&mut *f)?;
        }
        Ok(())
    }

    fn try_map_leaves(&self, f: &mut dyn FnMut(&L) -> Result<L>) -> Result<Self> {
        self.iter().map(|item| item.try_map_leaves(&mut *f)).collect()
    }
}

/// Moves every member out of `items`, applies `f` while no error has been
/// seen, and hands each member to `insert`.
fn rebuild<T, I>(
    items: I,
    mut visit: impl FnMut(&mut T) -> Result<()>,
    mut insert: impl FnMut(T),
) -> Result<()>
where
    I: IntoIterator<Item = T>,
{
    let mut result = Ok(());

    for mut item in items {
        if result.is_ok() {
            result = visit(&mut item);
        }
        insert(item);
    }

    result
}

impl<L, T, S> FieldTree<L> for HashSet<T, S>
where
    L: FieldAware,
    T: FieldTree<L> + Eq + Hash,
    S: BuildHasher + Default,
{
    const OPAQUE: bool = T::OPAQUE;

    fn leaves<'a>(&'a self, out: &mut Vec<&'a L>) {
        for item in self {
            item.leaves(out);
        }
    }

    fn try_for_each_leaf_mut(&mut self, f: &mut dyn FnMut(&mut L) -> Result<()>) -> Result<()> {
        if T::OPAQUE {
            return Ok(());
        }

        let items = std::mem::take(self);
        rebuild(
            items,
            |item: &mut T| item.try_for_each_leaf_mut(&mut *f),
            |item| {
                self.insert(item);
            },
        )
    }

    fn try_map_leaves(&self, f: &mut dyn FnMut(&L) -> Result<L>) -> Result<Self> {
        self.iter().map(|item| item.try_map_leaves(&mut *f)).collect()
    }
}

impl<L, T> FieldTree<L> for BTreeSet<T>
where
    L: FieldAware,
    T: FieldTree<L> + Ord,
{
    const OPAQUE: bool = T::OPAQUE;

    fn leaves<'a>(&'a self, out: &mut Vec<&'a L>) {
        for item in self {
            item.leaves(out);
        }
    }

    fn try_for_each_leaf_mut(&mut self, f: &mut dyn FnMut(&mut L) -> Result<()>) -> Result<()> {
        if T::OPAQUE {
            return Ok(());
        }

        let items = std::mem::take(self);
        rebuild(
            items,
            |item: &mut T| item.try_for_each_leaf_mut(&mut *f),
            |item| {
                self.insert(item);
            },
        )
    }

    fn try_map_leaves(&self, f: &mut dyn FnMut(&L) -> Result<L>) -> Result<Self> {
        self.iter().map(|item| item.try_map_leaves(&mut *f)).collect()
    }
}

impl<L, T, S> FieldTree<L> for IndexSet<T, S>
where
    L: FieldAware,
    T: FieldTree<L> + Eq + Hash,
    S: BuildHasher + Default,
{
    const OPAQUE: bool = T::OPAQUE;

    fn leaves<'a>(&'a self, out: &mut Vec<&'a L>) {
        for item in self {
            item.leaves(out);
        }
    }

    fn try_for_each_leaf_mut(&mut self, f: &mut dyn FnMut(&mut L) -> Result<()>) -> Result<()> {
        if T::OPAQUE {
            return Ok(());
        }

        let items = std::mem::take(self);
        rebuild(
            items,
            |item: &mut T| item.try_for_each_leaf_mut(&mut *f),
            |item| {
                self.insert(item);
            },
        )
    }

    fn try_map_leaves(&self, f: &mut dyn FnMut(&L) -> Result<L>) -> Result<Self> {
        self.iter().map(|item| item.try_map_leaves(&mut *f)).collect()
    }
}

/// Visits the key and the value of one map entry, skipping opaque sides.
fn visit_entry<L, K, V>(
    key: &mut K,
    value: &mut V,
    f: &mut dyn FnMut(&mut L) -> Result<()>,
) -> Result<()>
where
    L: FieldAware,
    K: FieldTree<L>,
    V: FieldTree<L>,
{
    if !K::OPAQUE {
        key.try_for_each_leaf_mut(&mut *f)?;
    }
    if !V::OPAQUE {
        value.try_for_each_leaf_mut(&mut *f)?;
    }
    Ok(())
}

impl<L, K, V, S> FieldTree<L> for HashMap<K, V, S>
where
    L: FieldAware,
    K: FieldTree<L> + Eq + Hash,
    V: FieldTree<L>,
    S: BuildHasher + Default,
{
    const OPAQUE: bool = K::OPAQUE && V::OPAQUE;

    fn leaves<'a>(&'a self, out: &mut Vec<&'a L>) {
        for (key, value) in self {
            key.leaves(out);
            value.leaves(out);
        }
    }

    fn try_for_each_leaf_mut(&mut self, f: &mut dyn FnMut(&mut L) -> Result<()>) -> Result<()> {
        if K::OPAQUE {
            for value in self.values_mut() {
                value.try_for_each_leaf_mut(&mut *f)?;
            }
            return Ok(());
        }

        let entries = std::mem::take(self);
        rebuild(
            entries,
            |(key, value): &mut (K, V)| visit_entry(key, value, &mut *f),
            |(key, value)| {
                self.insert(key, value);
            },
        )
    }

    fn try_map_leaves(&self, f: &mut dyn FnMut(&L) -> Result<L>) -> Result<Self> {
        self.iter()
            .map(|(key, value)| Ok((key.try_map_leaves(&mut *f)?, value.try_map_leaves(&mut *f)?)))
            .collect()
    }
}

impl<L, K, V> FieldTree<L> for BTreeMap<K, V>
where
    L: FieldAware,
    K: FieldTree<L> + Ord,
    V: FieldTree<L>,
{
    const OPAQUE: bool = K::OPAQUE && V::OPAQUE;

    fn leaves<'a>(&'a self, out: &mut Vec<&'a L>) {
        for (key, value) in self {
            key.leaves(out);
            value.leaves(out);
        }
    }

    fn try_for_each_leaf_mut(&mut self, f: &mut dyn FnMut(&mut L) -> Result<()>) -> Result<()> {
        if K::OPAQUE {
            for value in self.values_mut() {
                value.try_for_each_leaf_mut(&mut *f)?;
            }
            return Ok(());
        }

        let entries = std::mem::take(self);
        rebuild(
            entries,
            |(key, value): &mut (K, V)| visit_entry(key, value, &mut *f),
            |(key, value)| {
                self.insert(key, value);
            },
        )
    }

    fn try_map_leaves(&self, f: &mut dyn FnMut(&L) -> Result<L>) -> Result<Self> {
        self.iter()
            .map(|(key, value)| Ok((key.try_map_leaves(&mut *f)?, value.try_map_leaves(&mut *f)?)))
            .collect()
    }
}

impl<L, K, V, S> FieldTree<L> for IndexMap<K, V, S>
where
    L: FieldAware,
    K: FieldTree<L> + Eq + Hash,
    V: FieldTree<L>,
    S: BuildHasher + Default,
{
    const OPAQUE: bool = K::OPAQUE && V::OPAQUE;

    fn leaves<'a>(&'a self, out: &mut Vec<&'a L>) {
        for (key, value) in self {
            key.leaves(out);
            value.leaves(out);
        }
    }

    fn try_for_each_leaf_mut(&mut self, f: &mut dyn FnMut(&mut L) -> Result<()>) -> Result<()> {
        if K::OPAQUE {
            for value in self.values_mut() {
                value.try_for_each_leaf_mut(&mut *f)?;
            }
            return Ok(());
        }

        let entries = std::mem::take(self);
        rebuild(
            entries,
            |(key, value): &mut (K, V)| visit_entry(key, value, &mut *f),
            |(key, value)| {
                self.insert(key, value);
            },
        )
    }

    fn try_map_leaves(&self, f: &mut dyn FnMut(&L) -> Result<L>) -> Result<Self> {
        self.iter()
            .map(|(key, value)| Ok((key.try_map_leaves(&mut *f)?, value.try_map_leaves(&mut *f)?)))
            .collect()
    }
}
