use super::FieldTag;

use bit_set::BitSet;
use core::fmt;
use core::marker::PhantomData;

/// Set of initialized (or requested) fields of one tag type.
///
/// Iteration yields tags in declaration order.
pub struct FieldSet<F> {
    container: BitSet,
    _tag: PhantomData<fn() -> F>,
}

impl<F: FieldTag> FieldSet<F> {
    pub fn new() -> Self {
        Self {
            container: BitSet::new(),
            _tag: PhantomData,
        }
    }

    /// Set holding every tag of `F`.
    pub fn all() -> Self {
        F::all()
    }

    /// Set holding every tag of `F` except the given ones.
    pub fn complement_of(fields: impl IntoIterator<Item = F>) -> Self {
        let mut set = Self::all();
        for field in fields {
            set.remove(field);
        }
        set
    }

    pub fn contains(&self, field: F) -> bool {
        self.container.contains(field.ordinal())
    }

    /// Adds `field`, returning `true` if it was not present.
    pub fn insert(&mut self, field: F) -> bool {
        self.container.insert(field.ordinal())
    }

    /// Removes `field`, returning `true` if it was present.
    pub fn remove(&mut self, field: F) -> bool {
        self.container.remove(field.ordinal())
    }

    pub fn clear(&mut self) {
        self.container.clear();
    }

    pub fn len(&self) -> usize {
        self.container.len()
    }

    pub fn is_empty(&self) -> bool {
        self.container.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = F> + '_ {
        self.container.iter().filter_map(F::from_ordinal)
    }

    pub fn is_subset(&self, other: &FieldSet<F>) -> bool {
        self.container.is_subset(&other.container)
    }

    pub fn union(&self, other: &FieldSet<F>) -> FieldSet<F> {
        let mut ret = self.clone();
        ret.container.union_with(&other.container);
        ret
    }

    pub fn intersection(&self, other: &FieldSet<F>) -> FieldSet<F> {
        let mut ret = self.clone();
        ret.container.intersect_with(&other.container);
        ret
    }

    pub fn difference(&self, other: &FieldSet<F>) -> FieldSet<F> {
        let mut ret = self.clone();
        ret.container.difference_with(&other.container);
        ret
    }

    /// Names of the tags in this set, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.iter().map(F::name)
    }
}

impl<F> Clone for FieldSet<F> {
    fn clone(&self) -> Self {
        Self {
            container: self.container.clone(),
            _tag: PhantomData,
        }
    }
}

impl<F: FieldTag> Default for FieldSet<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> PartialEq for FieldSet<F> {
    fn eq(&self, other: &Self) -> bool {
        self.container.iter().eq(other.container.iter())
    }
}

impl<F> Eq for FieldSet<F> {}

impl<F: FieldTag> fmt::Debug for FieldSet<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<F: FieldTag> FromIterator<F> for FieldSet<F> {
    fn from_iter<I: IntoIterator<Item = F>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<F: FieldTag> Extend<F> for FieldSet<F> {
    fn extend<I: IntoIterator<Item = F>>(&mut self, iter: I) {
        for field in iter {
            self.insert(field);
        }
    }
}

impl<'a, F: FieldTag> Extend<&'a F> for FieldSet<F> {
    fn extend<I: IntoIterator<Item = &'a F>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<F: FieldTag, const N: usize> From<[F; N]> for FieldSet<F> {
    fn from(fields: [F; N]) -> Self {
        fields.into_iter().collect()
    }
}
