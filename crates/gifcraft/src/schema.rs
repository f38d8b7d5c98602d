//! Schema: compiled tree of nodes used to decode byte slices into a [Map].

use log::debug;

use crate::{
    compiled::{CompiledNode, compile_parts, evaluate_parts},
    cursor::ByteCursor,
    errors::{CompileError, DecodeError},
    node::Node,
    value::Map,
};

/// A compiled schema. Use [Schema::compile] to build from [Node]s, then
/// [Schema::parse] to decode bytes.
///
/// The top-level nodes are evaluated in order into one shared map, so later
/// nodes can depend on what earlier ones produced.
#[derive(Debug, Clone)]
pub struct Schema {
    /// Compiled top-level nodes in definition order.
    pub nodes: Vec<CompiledNode>,
}

impl Schema {
    /// Compiles a slice of [Node]s into a schema. Fails if any node is invalid.
    pub fn compile(nodes: &[Node]) -> Result<Self, CompileError> {
        Ok(Self {
            nodes: compile_parts(nodes)?,
        })
    }

    /// Decodes `data` according to this schema. Bytes after the last node are ignored.
    pub fn parse(&self, data: &[u8]) -> Result<Map, DecodeError> {
        self.parse_with_extent(data).map(|(_, map)| map)
    }

    /// Like [Schema::parse], also returning how many bytes were consumed.
    pub fn parse_with_extent(&self, data: &[u8]) -> Result<(usize, Map), DecodeError> {
        let mut cursor = ByteCursor::new(data);
        let mut map = Map::new();

        evaluate_parts(&self.nodes, &mut cursor, None, &mut map)?;

        debug!("decoded {} of {} bytes", cursor.position(), data.len());
        Ok((cursor.position(), map))
    }
}
