mod schema;
pub use schema::{FieldInfo, TagSchema};

mod set;
pub use set::FieldSet;

use core::fmt;
use core::hash::Hash;

/// Identifier of one field of one entity kind.
///
/// Implementations are closed, ordered enumerations, normally produced by
/// `#[derive(FieldTag)]`. The ordinal of a tag is its declaration index and
/// determines iteration order everywhere tags are enumerated.
pub trait FieldTag: Copy + Eq + Hash + Ord + fmt::Debug + Send + Sync + 'static {
    /// Static description of the whole enumeration.
    fn schema() -> &'static TagSchema;

    /// Declaration index of this tag.
    fn ordinal(self) -> usize;

    /// Tag at `ordinal`, or `None` when out of range.
    fn from_ordinal(ordinal: usize) -> Option<Self>;

    /// Name of this tag as used in the textual graph form.
    fn name(self) -> &'static str {
        Self::schema().fields[self.ordinal()].name
    }

    /// Schema of the nested tag type this field refers to, if any.
    fn nested(self) -> Option<&'static TagSchema> {
        Self::schema().fields[self.ordinal()].nested_schema()
    }

    /// Resolves a tag by its textual name.
    fn from_name(name: &str) -> Option<Self> {
        Self::schema().position(name).and_then(Self::from_ordinal)
    }

    /// Every tag of this enumeration.
    fn all() -> FieldSet<Self> {
        (0..Self::schema().len())
            .filter_map(Self::from_ordinal)
            .collect()
    }
}
