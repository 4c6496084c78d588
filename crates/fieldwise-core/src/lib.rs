mod aware;
pub use aware::{FieldAware, FieldVisitor, FieldVisitorMut};

#[doc(hidden)]
pub use aware::short_type_name;

mod entity;
pub use entity::Entity;

mod error;
pub use error::{Error, IntoError};

pub mod field;
pub use field::{FieldSet, FieldTag};

pub mod graph;
pub use graph::FieldGraph;

pub mod resolver;
pub use resolver::Resolver;

mod tree;
pub use tree::FieldTree;

/// A Result type alias that uses fieldwise's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;
