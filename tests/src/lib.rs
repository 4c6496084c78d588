#[macro_use]
mod macros;

mod directory;
pub use directory::{Call, Directory};


pub use models::*;

pub use fieldwise::{Entity, FieldAware, FieldGraph, FieldSet, FieldTag};

/// Routes `log` output through `env_logger`, honoring `RUST_LOG`.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Parses `src`, panicking on malformed test input.
pub fn graph<F: FieldTag>(src: &str) -> FieldGraph<F> {
    match FieldGraph::parse(src) {
        Ok(graph) => graph,
        Err(err) => panic!("invalid graph `{src}`: {err}"),
    }
}
