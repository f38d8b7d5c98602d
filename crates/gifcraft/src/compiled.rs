use std::collections::HashSet;

use log::{trace, warn};

use crate::{
    bits::BitField,
    cursor::ByteCursor,
    errors::{CompileError, DecodeError},
    extract::Extract,
    node::{Gate, Node, NodeKind, Repeat},
    scope::Scope,
    value::{Map, Value},
};

#[derive(Debug, Clone)]
pub enum CompiledNodeKind {
    Parts(Vec<CompiledNode>),
    Extract(Extract),
    Bits(Vec<(String, BitField)>),
}

#[derive(Debug, Clone)]
pub struct CompiledNode {
    pub label: String,
    pub kind: CompiledNodeKind,
    pub requires: Option<Gate>,
    pub repeat: Option<Repeat>,
    pub skip: bool,
}

impl TryFrom<&Node> for CompiledNode {
    type Error = CompileError;

    fn try_from(node: &Node) -> Result<Self, Self::Error> {
        if node.label.is_empty() {
            return Err(CompileError::InvalidLabel);
        }

        let kind = match &node.kind {
            NodeKind::Parts(parts) => CompiledNodeKind::Parts(compile_parts(parts)?),
            NodeKind::Extract(extract) => {
                if let Extract::Array { stride: 0, .. } = extract {
                    return Err(CompileError::InvalidArrayStride(node.label.clone()));
                }

                CompiledNodeKind::Extract(extract.clone())
            }
            NodeKind::Bits(fields) => {
                if fields.is_empty() {
                    return Err(CompileError::EmptyBitField(node.label.clone()));
                }

                let mut compiled = Vec::with_capacity(fields.len());
                for (name, spec) in fields {
                    compiled.push((name.clone(), BitField::compile(name, spec)?));
                }

                CompiledNodeKind::Bits(compiled)
            }
        };

        if node.repeat.is_some() && !matches!(kind, CompiledNodeKind::Parts(_)) {
            return Err(CompileError::InvalidRepeat(node.label.clone()));
        }

        Ok(CompiledNode {
            label: node.label.clone(),
            kind,
            requires: node.requires.clone(),
            repeat: node.repeat.clone(),
            skip: node.skip,
        })
    }
}

/// Compiles siblings, rejecting labels that would overwrite each other.
pub fn compile_parts(nodes: &[Node]) -> Result<Vec<CompiledNode>, CompileError> {
    let mut seen = HashSet::with_capacity(nodes.len());
    let mut compiled = Vec::with_capacity(nodes.len());

    for node in nodes {
        if !seen.insert(node.label.as_str()) {
            return Err(CompileError::DuplicateLabel(node.label.clone()));
        }

        compiled.push(CompiledNode::try_from(node)?);
    }

    Ok(compiled)
}

/// Evaluates `parts` in order into `out`. `parent` is the scope `out` is nested in.
pub fn evaluate_parts(
    parts: &[CompiledNode],
    cursor: &mut ByteCursor<'_>,
    parent: Option<&Scope<'_>>,
    out: &mut Map,
) -> Result<(), DecodeError> {
    for part in parts {
        if let Some(value) = part.evaluate(cursor, parent, out)? {
            out.insert(part.label.clone(), value);
        }
    }

    Ok(())
}

impl CompiledNode {
    /// Evaluates this node against the cursor. `current` is the map the node
    /// will be stored in; it is visible to gates and extractors but only the
    /// caller inserts into it. Returns `None` if the node was gated out or skipped.
    pub fn evaluate(
        &self,
        cursor: &mut ByteCursor<'_>,
        parent: Option<&Scope<'_>>,
        current: &Map,
    ) -> Result<Option<Value>, DecodeError> {
        let scope = match parent {
            Some(parent) => parent.nested(current),
            None => Scope::root_of(current),
        };

        if let Some(gate) = &self.requires {
            if !gate.test(cursor, &scope)? {
                trace!("{} skipped at byte {}", self.label, cursor.position());
                return Ok(None);
            }
        }

        trace!("{} at byte {}", self.label, cursor.position());

        let value = match self.read(cursor, &scope) {
            Ok(value) => value,
            Err(err) => {
                warn!("Failed to read {}: {}", self.label, err);
                return Err(err);
            }
        };

        if self.skip {
            Ok(None)
        } else {
            Ok(Some(value))
        }
    }

    fn read(&self, cursor: &mut ByteCursor<'_>, scope: &Scope<'_>) -> Result<Value, DecodeError> {
        match (&self.kind, &self.repeat) {
            (CompiledNodeKind::Parts(parts), Some(repeat)) => {
                let mut items = Vec::new();

                while repeat.test(cursor)? {
                    let start = cursor.position();
                    let mut item = Map::new();
                    evaluate_parts(parts, cursor, Some(scope), &mut item)?;

                    if cursor.position() == start {
                        return Err(DecodeError::UnrecognizedBlock {
                            position: start,
                            code: cursor.peek_byte()?,
                        });
                    }

                    items.push(Value::Map(item));
                }

                Ok(Value::List(items))
            }
            (CompiledNodeKind::Parts(parts), None) => {
                let mut map = Map::new();
                evaluate_parts(parts, cursor, Some(scope), &mut map)?;
                Ok(Value::Map(map))
            }
            (CompiledNodeKind::Extract(extract), _) => extract.apply(cursor, scope),
            (CompiledNodeKind::Bits(fields), _) => {
                let byte = cursor.read_byte()?;
                let map = fields
                    .iter()
                    .map(|(name, field)| (name.clone(), Value::U64(field.extract(byte) as u64)))
                    .collect();

                Ok(Value::Map(map))
            }
        }
    }
}
