//! Recursive-descent parser for the textual graph form.
//!
//! ```text
//! graph      := item (',' item)*
//! item       := identifier ('{' graph '}')?
//! identifier := [A-Za-z_$][A-Za-z0-9_$]*
//! ```
//!
//! Offsets in errors count characters from the start of the input.

use super::RawGraph;
use crate::{field::TagSchema, Error, Result};

pub(super) fn parse(schema: &'static TagSchema, input: &str) -> Result<RawGraph> {
    if input.trim().is_empty() {
        return Ok(RawGraph::new(schema));
    }

    let mut parser = Parser {
        chars: input.chars().collect(),
        pos: 0,
    };

    let mut graph = parser.list(schema, false)?;
    graph.normalize();
    Ok(graph)
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn list(&mut self, schema: &'static TagSchema, nested: bool) -> Result<RawGraph> {
        let mut graph = RawGraph::new(schema);

        loop {
            let start = self.pos;
            let name = self.identifier();

            if name.is_empty() {
                return Err(Error::graph_syntax("zero-length field name", start));
            }

            let Some(ordinal) = schema.position(&name) else {
                return Err(Error::unknown_field(schema.name, name, start));
            };

            let subgraph = if self.peek() == Some('{') {
                Some(self.subfields(schema, ordinal, start)?)
            } else {
                None
            };

            graph.merge_entry(ordinal, subgraph);

            match self.peek() {
                None => break,
                Some(',') => self.pos += 1,
                Some('}') if nested => break,
                Some(c) => {
                    return Err(Error::graph_syntax(
                        format!("illegal character '{c}'"),
                        self.pos,
                    ))
                }
            }
        }

        Ok(graph)
    }

    fn subfields(
        &mut self,
        schema: &'static TagSchema,
        ordinal: usize,
        start: usize,
    ) -> Result<RawGraph> {
        let open = self.pos;

        let Some(nested) = schema.fields[ordinal].nested_schema() else {
            return Err(Error::graph_syntax(
                format!(
                    "field `{}` of {} has no subfields",
                    schema.fields[ordinal].name, schema.name
                ),
                open,
            ));
        };

        self.pos += 1;
        let subgraph = self.list(nested, true)?;

        if self.peek() != Some('}') {
            return Err(Error::graph_syntax(
                format!("unterminated subfields declaration (started at {start})"),
                self.pos,
            ));
        }

        self.pos += 1;
        Ok(subgraph)
    }

    fn identifier(&mut self) -> String {
        let start = self.pos;

        while let Some(c) = self.peek() {
            let valid = if self.pos == start {
                c.is_ascii_alphabetic() || c == '_' || c == '$'
            } else {
                c.is_ascii_alphanumeric() || c == '_' || c == '$'
            };

            if !valid {
                break;
            }

            self.pos += 1;
        }

        self.chars[start..self.pos].iter().collect()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }
}
