use super::{short_type_name, FieldAware};
use crate::{graph::Builder, Error, FieldGraph, FieldTag, FieldTree, Result};

/// Receives the value stored in one field of a [`FieldAware`] value.
///
/// Implementations of [`FieldAware::visit`] call `nested` for fields that
/// hold field-aware values (directly or inside collections and maps) and
/// `scalar` for every other field.
pub trait FieldVisitor: Sized {
    type Output;

    fn nested<L: FieldAware, T: FieldTree<L>>(self, value: &T) -> Self::Output;

    fn scalar(self) -> Self::Output;
}

/// Mutable counterpart of [`FieldVisitor`].
///
/// `other` is the same field of a second value of the same kind, when the
/// operation works on a pair.
pub trait FieldVisitorMut: Sized {
    type Output;

    fn nested<L: FieldAware, T: FieldTree<L>>(
        self,
        value: &mut T,
        other: Option<&T>,
    ) -> Self::Output;

    fn scalar(self) -> Self::Output;
}

fn check_shape<L: FieldAware, T: FieldTree<L>, F: FieldTag>(field: F) -> Result<()> {
    if T::OPAQUE {
        return Err(Error::unsupported_shape(
            field.name(),
            core::any::type_name::<T>(),
        ));
    }
    Ok(())
}

fn scalar_error<F: FieldTag>(field: F) -> Error {
    Error::unsupported_shape(field.name(), "a scalar value")
}

/// Collects the part of `graph`'s subgraph for `field` that the field's
/// leaves do not hold yet.
pub(super) struct Missing<'a, F> {
    pub(super) field: F,
    pub(super) graph: &'a FieldGraph<F>,
    pub(super) missing: &'a mut Builder<F>,
}

impl<F: FieldTag> FieldVisitor for Missing<'_, F> {
    type Output = Result<()>;

    fn nested<L: FieldAware, T: FieldTree<L>>(self, value: &T) -> Result<()> {
        check_shape::<L, T, F>(self.field)?;

        let requested = self.graph.subgraph::<L::Field>(self.field)?;

        let mut leaves = vec![];
        value.leaves(&mut leaves);

        let mut missing = Builder::<L::Field>::new();
        for leaf in leaves {
            missing.merge(&leaf.missing_graph(&requested)?);
        }

        if !missing.is_empty() {
            self.missing.add_graph(self.field, missing.build())?;
        }

        Ok(())
    }

    fn scalar(self) -> Result<()> {
        Err(scalar_error(self.field))
    }
}

/// Strips every leaf of a field down to the field's subgraph.
pub(super) struct Intersect<'a, F> {
    pub(super) field: F,
    pub(super) graph: &'a FieldGraph<F>,
}

impl<F: FieldTag> FieldVisitorMut for Intersect<'_, F> {
    type Output = Result<()>;

    fn nested<L: FieldAware, T: FieldTree<L>>(
        self,
        value: &mut T,
        _other: Option<&T>,
    ) -> Result<()> {
        check_shape::<L, T, F>(self.field)?;

        let subgraph = self.graph.subgraph::<L::Field>(self.field)?;
        value.try_for_each_leaf_mut(&mut |leaf| leaf.intersect(&subgraph))
    }

    fn scalar(self) -> Result<()> {
        Err(scalar_error(self.field))
    }
}

/// Merges each leaf of a field with its equal counterpart in the other
/// value's field.
pub(super) struct Merge<'a, F> {
    pub(super) field: F,
    pub(super) graph: &'a FieldGraph<F>,
}

impl<F: FieldTag> FieldVisitorMut for Merge<'_, F> {
    type Output = Result<()>;

    fn nested<L: FieldAware, T: FieldTree<L>>(
        self,
        value: &mut T,
        other: Option<&T>,
    ) -> Result<()> {
        check_shape::<L, T, F>(self.field)?;

        let subgraph = self.graph.subgraph::<L::Field>(self.field)?;

        let mut candidates = vec![];
        if let Some(other) = other {
            other.leaves(&mut candidates);
        }

        let field = self.field;
        value.try_for_each_leaf_mut(&mut |leaf| {
            let extension = candidates
                .iter()
                .copied()
                .find(|candidate| **candidate == *leaf);

            let Some(extension) = extension else {
                return Err(Error::entity_unavailable(format!(
                    "{} {leaf:?} is missing from the extension of `{}`",
                    short_type_name::<L>(),
                    field.name(),
                )));
            };

            leaf.extend_with(extension, &subgraph)
        })
    }

    fn scalar(self) -> Result<()> {
        Err(scalar_error(self.field))
    }
}
