use super::FieldGraph;
use crate::field::FieldTag;

use core::fmt;
use ::serde::{de, Deserialize, Deserializer, Serialize, Serializer};

impl<F> Serialize for FieldGraph<F> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de, F: FieldTag> Deserialize<'de> for FieldGraph<F> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct GraphVisitor<F>(core::marker::PhantomData<fn() -> F>);

        impl<F: FieldTag> de::Visitor<'_> for GraphVisitor<F> {
            type Value = FieldGraph<F>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "a field graph over {}", F::schema().name)
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                FieldGraph::parse(value).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(GraphVisitor(core::marker::PhantomData))
    }
}
