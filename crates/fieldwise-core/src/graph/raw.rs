use crate::field::TagSchema;

use core::fmt;
use indexmap::IndexMap;

/// Untyped recursive selection over one tag schema.
///
/// Keys are tag ordinals. The typed [`FieldGraph`](super::FieldGraph) wrapper
/// guarantees `schema` matches its tag type, and every subgraph's schema
/// matches the nested schema its tag declares.
#[derive(Clone)]
pub(crate) struct RawGraph {
    pub(crate) schema: &'static TagSchema,
    pub(crate) entries: IndexMap<usize, Option<RawGraph>>,
}

impl RawGraph {
    pub(crate) fn new(schema: &'static TagSchema) -> Self {
        Self {
            schema,
            entries: IndexMap::new(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adds `ordinal`, deep-merging `subgraph` with any subgraph already present.
    pub(crate) fn merge_entry(&mut self, ordinal: usize, subgraph: Option<RawGraph>) {
        let slot = self.entries.entry(ordinal).or_insert(None);

        let Some(subgraph) = subgraph else {
            return;
        };

        match slot {
            Some(existing) => existing.merge(&subgraph),
            slot => *slot = Some(subgraph),
        }
    }

    /// Deep union of `other` into `self`.
    pub(crate) fn merge(&mut self, other: &RawGraph) {
        debug_assert!(self.schema.is(other.schema));

        for (ordinal, subgraph) in &other.entries {
            self.merge_entry(*ordinal, subgraph.clone());
        }
    }

    /// Drops empty subgraphs so that "no subgraph" has a single representation.
    pub(crate) fn normalize(&mut self) {
        for subgraph in self.entries.values_mut() {
            let empty = match subgraph.as_mut() {
                Some(graph) => {
                    graph.normalize();
                    graph.is_empty()
                }
                None => false,
            };

            if empty {
                *subgraph = None;
            }
        }
    }

    pub(crate) fn subgraph(&self, ordinal: usize) -> Option<&RawGraph> {
        self.entries.get(&ordinal).and_then(Option::as_ref)
    }

    /// Returns `true` if every selection of `self` is also selected by `other`.
    pub(crate) fn is_subset(&self, other: &RawGraph) -> bool {
        self.entries.iter().all(|(ordinal, subgraph)| {
            if !other.entries.contains_key(ordinal) {
                return false;
            }

            match (subgraph, other.subgraph(*ordinal)) {
                (None, _) => true,
                (Some(subgraph), None) => subgraph.is_empty(),
                (Some(subgraph), Some(other)) => subgraph.is_subset(other),
            }
        })
    }

    fn name(&self, ordinal: usize) -> &'static str {
        self.schema
            .field(ordinal)
            .map(|field| field.name)
            .unwrap_or("?")
    }
}

impl PartialEq for RawGraph {
    fn eq(&self, other: &Self) -> bool {
        fn is_blank(graph: Option<&RawGraph>) -> bool {
            graph.map(RawGraph::is_empty).unwrap_or(true)
        }

        if !self.schema.is(other.schema) || self.entries.len() != other.entries.len() {
            return false;
        }

        self.entries.iter().all(|(ordinal, subgraph)| {
            let Some(other) = other.entries.get(ordinal) else {
                return false;
            };

            match (subgraph, other) {
                (Some(lhs), Some(rhs)) => lhs == rhs,
                (lhs, rhs) => is_blank(lhs.as_ref()) && is_blank(rhs.as_ref()),
            }
        })
    }
}

impl fmt::Display for RawGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (ordinal, subgraph)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }

            f.write_str(self.name(*ordinal))?;

            if let Some(subgraph) = subgraph.as_ref().filter(|graph| !graph.is_empty()) {
                write!(f, "{{{subgraph}}}")?;
            }
        }

        Ok(())
    }
}
