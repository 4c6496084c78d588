mod batcher;
pub use batcher::Batcher;

pub mod cache;
pub use cache::{CachingResolver, EntityCache};

pub mod handler;
pub use handler::{Handler, Outcome, Pending, Request};

mod async_resolver;
pub use async_resolver::{extend_async, AsyncResolver};

pub use fieldwise_core::{
    bail, err, field, field_tree_leaf, graph, resolver, Entity, Error, FieldAware,
    FieldGraph, FieldSet, FieldTag, FieldTree, FieldVisitor, FieldVisitorMut, IntoError,
    Resolver, Result,
};

pub use fieldwise_macros::FieldTag;

pub use async_trait::async_trait;

#[doc(hidden)]
pub mod codegen_support {
    pub use fieldwise_core::field::{FieldInfo, FieldTag, TagSchema};
    pub use std::option::Option;
}
