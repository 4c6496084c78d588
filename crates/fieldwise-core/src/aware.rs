mod visit;
pub use visit::{FieldVisitor, FieldVisitorMut};

use crate::{graph::Builder, Error, FieldGraph, FieldSet, FieldTag, Result};

use core::fmt;
use visit::{Intersect, Merge, Missing};

/// A value that tracks which of its fields are initialized.
///
/// Implementations provide storage access through [`pull`](Self::pull),
/// [`visit`](Self::visit) and [`visit_mut`](Self::visit_mut); every other
/// operation is derived from those three.
///
/// Reading a field that is not initialized fails with a field-unavailable
/// error, which [`field_get`](Self::field_get) implements for accessors.
pub trait FieldAware: Clone + PartialEq + fmt::Debug + Sized {
    type Field: FieldTag;

    /// Tags that are currently initialized.
    fn fields(&self) -> &FieldSet<Self::Field>;

    fn fields_mut(&mut self) -> &mut FieldSet<Self::Field>;

    /// A value of the same kind and identity with no field initialized.
    fn reference(&self) -> Self;

    /// Copies `other`'s value for `field` into `self` and marks `field`
    /// initialized.
    ///
    /// Nested field-aware values are cloned through
    /// [`FieldTree::clone_tree`](crate::FieldTree::clone_tree) with `graph`.
    fn pull(
        &mut self,
        field: Self::Field,
        other: &Self,
        graph: Option<&FieldGraph<Self::Field>>,
    ) -> Result<()>;

    /// Hands the value stored for `field` to `visitor`.
    fn visit<V: FieldVisitor>(&self, field: Self::Field, visitor: V) -> V::Output;

    /// Hands the value stored for `field`, and `other`'s when given, to
    /// `visitor`.
    fn visit_mut<V: FieldVisitorMut>(
        &mut self,
        field: Self::Field,
        other: Option<&Self>,
        visitor: V,
    ) -> V::Output;

    fn has_field(&self, field: Self::Field) -> bool {
        self.fields().contains(field)
    }

    fn has_fields(&self, fields: impl IntoIterator<Item = Self::Field>) -> bool {
        fields.into_iter().all(|field| self.has_field(field))
    }

    /// Like [`has_fields`](Self::has_fields), resolving tags by name.
    fn has_fields_named(&self, names: &[&str]) -> Result<bool> {
        for name in names {
            if !self.has_field(Self::parse_field(name)?) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn parse_field(name: &str) -> Result<Self::Field> {
        Self::Field::from_name(name)
            .ok_or_else(|| Error::unknown_field(Self::Field::schema().name, name, 0))
    }

    /// Returns `value` if `field` is initialized.
    ///
    /// ```ignore
    /// pub fn name(&self) -> Result<&str> {
    ///     self.field_get(PersonField::Name, self.name.as_str())
    /// }
    /// ```
    fn field_get<'a, V: ?Sized>(&'a self, field: Self::Field, value: &'a V) -> Result<&'a V> {
        if self.has_field(field) {
            Ok(value)
        } else {
            Err(Error::field_unavailable(
                Self::Field::schema().name,
                [field.name()],
            ))
        }
    }

    /// Marks `field` initialized. Setters call this after storing the value.
    fn field_set(&mut self, field: Self::Field) {
        self.fields_mut().insert(field);
    }

    /// Reads a value through `f` only if every one of `fields` is
    /// initialized, instead of failing with a field-unavailable error.
    ///
    /// ```ignore
    /// let label = person.get_if_present([PersonField::Name, PersonField::Email], |p| {
    ///     format!("{} <{}>", p.name, p.email)
    /// });
    /// ```
    fn get_if_present<'a, X>(
        &'a self,
        fields: impl IntoIterator<Item = Self::Field>,
        f: impl FnOnce(&'a Self) -> X,
    ) -> Option<X> {
        self.has_fields(fields).then(|| f(self))
    }

    /// Uninitializes `fields`, resetting their stored values to those of a
    /// fresh reference. Returns `true` if any field was initialized.
    fn clear_fields(&mut self, fields: impl IntoIterator<Item = Self::Field>) -> Result<bool> {
        let fields: FieldSet<Self::Field> = fields
            .into_iter()
            .filter(|field| self.has_field(*field))
            .collect();

        if fields.is_empty() {
            return Ok(false);
        }

        let mut dummy = self.reference();
        dummy.fields_mut().extend(fields.iter());

        for field in fields.iter() {
            self.pull(field, &dummy, None)?;
            self.fields_mut().remove(field);
        }

        Ok(true)
    }

    /// Copies every initialized field of `other` into `self`.
    fn pull_all(&mut self, other: &Self) -> Result<()> {
        for field in other.fields().iter() {
            self.pull(field, other, None)?;
        }
        Ok(())
    }

    /// Copies `fields` from `other`, which must hold all of them.
    fn pull_fields(
        &mut self,
        other: &Self,
        fields: impl IntoIterator<Item = Self::Field>,
    ) -> Result<()> {
        let fields: FieldSet<Self::Field> = fields.into_iter().collect();
        ensure_fields::<Self>(other.fields(), &fields)?;

        for field in fields.iter() {
            self.pull(field, other, None)?;
        }
        Ok(())
    }

    /// Returns `true` if every selection of `graph` is initialized, at every
    /// depth.
    fn has_graph(&self, graph: &FieldGraph<Self::Field>) -> Result<bool> {
        Ok(self.missing_graph(graph)?.is_empty())
    }

    /// Portion of `graph` that `self` does not hold yet.
    ///
    /// An absent tag contributes its whole requested subtree. A present tag
    /// contributes the union of what its nested values lack.
    fn missing_graph(&self, graph: &FieldGraph<Self::Field>) -> Result<FieldGraph<Self::Field>> {
        let mut missing = Builder::new();

        for field in graph.iter() {
            if !self.has_field(field) {
                let subgraph = graph.raw().subgraph(field.ordinal()).cloned();
                missing.insert_raw(field, subgraph);
            } else if graph.has_subgraph(field) {
                self.visit(
                    field,
                    Missing {
                        field,
                        graph,
                        missing: &mut missing,
                    },
                )?;
            }
        }

        Ok(missing.build())
    }

    /// Copy holding exactly the initialized fields of `self`, nested values
    /// cloned in full.
    fn clone_all(&self) -> Result<Self> {
        let mut clone = self.reference();
        clone.pull_all(self)?;
        Ok(clone)
    }

    /// Copy holding exactly `graph`.
    ///
    /// Fails with a field-unavailable error naming the requested tags that
    /// `self` does not hold.
    fn clone_graph(&self, graph: &FieldGraph<Self::Field>) -> Result<Self> {
        ensure_fields::<Self>(self.fields(), &graph.fields())?;

        let mut clone = self.reference();
        for field in graph.iter() {
            clone.pull(field, self, Some(graph))?;
        }
        Ok(clone)
    }

    /// Copy holding the initialized fields of `self`, nested values reduced
    /// to references.
    fn clone_flat(&self) -> Result<Self> {
        self.clone_graph(&FieldGraph::from(self.fields()))
    }

    /// Reduces every nested value to a reference, in place.
    fn flatten(&mut self) -> Result<()> {
        *self = self.clone_flat()?;
        Ok(())
    }

    /// Strips `self` down to `graph`, recursing into nested values.
    ///
    /// Fields outside `graph` are cleared. Requested fields that `self` does
    /// not hold are ignored.
    fn intersect(&mut self, graph: &FieldGraph<Self::Field>) -> Result<()> {
        let fields = self.fields().clone();

        self.clear_fields(fields.difference(&graph.fields()).iter())?;

        for field in fields.iter() {
            if graph.contains(field) && field.nested().is_some() {
                self.visit_mut(field, None, Intersect { field, graph })?;
            }
        }

        Ok(())
    }

    /// Fetches what `self` lacks of `graph` through `resolve` and merges it
    /// in.
    ///
    /// `resolve` receives the missing graph and must return a value of the
    /// same identity holding at least that graph. Returns `false` without
    /// calling `resolve` when nothing is missing.
    fn extend<R>(&mut self, graph: &FieldGraph<Self::Field>, resolve: R) -> Result<bool>
    where
        R: FnOnce(&FieldGraph<Self::Field>) -> Result<Option<Self>>,
    {
        let missing = self.missing_graph(graph)?;

        if missing.is_empty() {
            return Ok(false);
        }

        let Some(extension) = resolve(&missing)? else {
            return Err(Error::entity_unavailable(format!(
                "{} with {{{missing}}}",
                short_type_name::<Self>()
            )));
        };

        if !extension.has_graph(&missing)? {
            let lacking = extension.missing_graph(&missing)?;
            return Err(Error::entity_unavailable(format!(
                "{} extension lacks {{{lacking}}}",
                short_type_name::<Self>()
            )));
        }

        self.extend_with(&extension, &missing)?;
        Ok(true)
    }

    /// Merges `extension` into `self`.
    ///
    /// Fields `self` lacks are copied, cloned through `graph` when `graph`
    /// selects them. Fields both hold are descended into where `graph`
    /// attaches a subgraph; each nested value of `self` is matched by
    /// equality against the values `extension` holds in the same field.
    fn extend_with(&mut self, extension: &Self, graph: &FieldGraph<Self::Field>) -> Result<()> {
        for field in extension.fields().iter() {
            if !self.has_field(field) {
                self.pull(field, extension, graph.contains(field).then_some(graph))?;
            } else if graph.has_subgraph(field) {
                self.visit_mut(field, Some(extension), Merge { field, graph })?;
            }
        }
        Ok(())
    }
}

fn ensure_fields<T: FieldAware>(
    held: &FieldSet<T::Field>,
    wanted: &FieldSet<T::Field>,
) -> Result<()> {
    let lacking = wanted.difference(held);

    if lacking.is_empty() {
        Ok(())
    } else {
        Err(Error::field_unavailable(
            T::Field::schema().name,
            lacking.names().collect::<Vec<_>>(),
        ))
    }
}

/// `type_name` without the module path, e.g. `Person` or `Vec<app::Boat>`.
#[doc(hidden)]
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let name = core::any::type_name::<T>();
    let end = name.find('<').unwrap_or(name.len());
    let start = name[..end].rfind("::").map_or(0, |i| i + 2);
    &name[start..]
}
