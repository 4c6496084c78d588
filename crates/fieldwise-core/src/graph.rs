mod builder;
pub use builder::Builder;

mod parse;

mod raw;
pub(crate) use raw::RawGraph;

#[cfg(feature = "serde")]
mod serde;

use crate::{
    field::{FieldSet, FieldTag},
    Error, Result,
};

use core::{fmt, marker::PhantomData, str::FromStr};

/// Immutable, recursive selection of fields.
///
/// Each tag of `F` appears at most once per level and may carry a subgraph
/// over the nested tag type it declares. Graphs are combined through a
/// [`Builder`], which deep-merges subgraphs.
///
/// ```
/// # use fieldwise_core::field::{FieldInfo, TagSchema};
/// # use fieldwise_core::{FieldGraph, FieldTag};
/// # #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// # enum Tag { Name }
/// # impl FieldTag for Tag {
/// #     fn schema() -> &'static TagSchema {
/// #         static SCHEMA: TagSchema = TagSchema {
/// #             name: "Tag",
/// #             fields: &[FieldInfo { name: "name", nested: None }],
/// #         };
/// #         &SCHEMA
/// #     }
/// #     fn ordinal(self) -> usize { 0 }
/// #     fn from_ordinal(ordinal: usize) -> Option<Self> { (ordinal == 0).then_some(Tag::Name) }
/// # }
/// let graph: FieldGraph<Tag> = "name".parse().unwrap();
/// assert!(graph.contains(Tag::Name));
/// assert_eq!(graph.to_string(), "name");
/// ```
pub struct FieldGraph<F> {
    raw: RawGraph,
    _tag: PhantomData<fn() -> F>,
}

impl<F: FieldTag> FieldGraph<F> {
    /// Empty graph.
    pub fn none() -> Self {
        Self::from_raw(RawGraph::new(F::schema()))
    }

    /// Every tag of `F`, without subgraphs.
    pub fn all() -> Self {
        Self::of(F::all().iter())
    }

    /// Every tag of `F` except the given ones, without subgraphs.
    pub fn complement_of(fields: impl IntoIterator<Item = F>) -> Self {
        Self::of(FieldSet::complement_of(fields).iter())
    }

    /// The given tags, without subgraphs.
    pub fn of(fields: impl IntoIterator<Item = F>) -> Self {
        let mut raw = RawGraph::new(F::schema());
        for field in fields {
            raw.merge_entry(field.ordinal(), None);
        }
        Self::from_raw(raw)
    }

    /// Parses the canonical textual form, e.g. `name,boat{type,homePort{name}}`.
    pub fn parse(input: &str) -> Result<Self> {
        parse::parse(F::schema(), input).map(Self::from_raw)
    }

    pub fn builder() -> Builder<F> {
        Builder::new()
    }

    /// Builder seeded with a copy of this graph.
    pub fn to_builder(&self) -> Builder<F> {
        Builder::from(self)
    }

    pub fn len(&self) -> usize {
        self.raw.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn contains(&self, field: F) -> bool {
        self.raw.entries.contains_key(&field.ordinal())
    }

    /// Top-level tags, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = F> + '_ {
        self.raw.entries.keys().filter_map(|ordinal| F::from_ordinal(*ordinal))
    }

    /// Top-level tags as a set.
    pub fn fields(&self) -> FieldSet<F> {
        self.iter().collect()
    }

    /// Returns `true` if a non-empty subgraph is attached to `field`.
    pub fn has_subgraph(&self, field: F) -> bool {
        self.raw
            .subgraph(field.ordinal())
            .map(|graph| !graph.is_empty())
            .unwrap_or(false)
    }

    /// Subgraph attached to `field`, or an empty graph when none is.
    ///
    /// Fails with a type mismatch if `G` is not the nested tag type `field`
    /// declares.
    pub fn subgraph<G: FieldTag>(&self, field: F) -> Result<FieldGraph<G>> {
        check_nested::<F, G>(field)?;

        Ok(match self.raw.subgraph(field.ordinal()) {
            Some(raw) => FieldGraph::from_raw(raw.clone()),
            None => FieldGraph::none(),
        })
    }

    /// Returns `true` if every selection of `self`, at every depth, is also
    /// selected by `other`.
    pub fn is_subset(&self, other: &FieldGraph<F>) -> bool {
        self.raw.is_subset(&other.raw)
    }

    pub(crate) fn from_raw(raw: RawGraph) -> Self {
        debug_assert!(raw.schema.is(F::schema()));

        Self {
            raw,
            _tag: PhantomData,
        }
    }

    pub(crate) fn raw(&self) -> &RawGraph {
        &self.raw
    }

    pub(crate) fn into_raw(self) -> RawGraph {
        self.raw
    }
}

/// Verifies that `G` is the nested tag type declared by `field`.
pub(crate) fn check_nested<F: FieldTag, G: FieldTag>(field: F) -> Result<()> {
    match field.nested() {
        Some(nested) if nested.is(G::schema()) => Ok(()),
        Some(nested) => Err(Error::type_mismatch(
            field.name(),
            nested.name,
            G::schema().name,
        )),
        None => Err(Error::type_mismatch(
            field.name(),
            "no nested type",
            G::schema().name,
        )),
    }
}

impl<F> Clone for FieldGraph<F> {
    fn clone(&self) -> Self {
        Self {
            raw: self.raw.clone(),
            _tag: PhantomData,
        }
    }
}

impl<F: FieldTag> Default for FieldGraph<F> {
    fn default() -> Self {
        Self::none()
    }
}

impl<F> PartialEq for FieldGraph<F> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<F> Eq for FieldGraph<F> {}

impl<F> fmt::Display for FieldGraph<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.raw, f)
    }
}

impl<F> fmt::Debug for FieldGraph<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldGraph<{}>({})", self.raw.schema.name, self.raw)
    }
}

impl<F: FieldTag> FromStr for FieldGraph<F> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl<F: FieldTag> From<F> for FieldGraph<F> {
    fn from(field: F) -> Self {
        Self::of([field])
    }
}

impl<F: FieldTag> From<&FieldSet<F>> for FieldGraph<F> {
    fn from(fields: &FieldSet<F>) -> Self {
        Self::of(fields.iter())
    }
}

impl<F: FieldTag> FromIterator<F> for FieldGraph<F> {
    fn from_iter<I: IntoIterator<Item = F>>(iter: I) -> Self {
        Self::of(iter)
    }
}
