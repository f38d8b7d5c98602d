//! Definition of schema nodes used to build a [crate::schema::Schema].

use crate::{
    bits::BitSpec,
    cursor::{ByteCursor, Endian},
    errors::DecodeError,
    extract::{Count, Extract, ExtractFn},
    scope::Scope,
};

/// A single directive in a schema tree.
#[derive(Debug, Clone)]
pub struct Node {
    /// Key under which the result is stored in the parent map.
    pub label: String,
    /// How the node consumes input.
    pub kind: NodeKind,
    /// If set, the node only applies when the gate passes.
    pub requires: Option<Gate>,
    /// If set (composite nodes only), the parts repeat while the predicate holds.
    pub repeat: Option<Repeat>,
    /// If true, the node is read for its effect on the cursor and nothing is stored.
    pub skip: bool,
}

/// Distinguishes composite, scalar and bit-field nodes.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Ordered children evaluated into a fresh map.
    Parts(Vec<Node>),
    /// Scalar read by a leaf extractor.
    Extract(Extract),
    /// One byte split into named bit ranges.
    Bits(Vec<(String, BitSpec)>),
}

/// Decides whether an optional node applies. Gates only get a shared cursor,
/// so they can peek but not consume.
#[derive(Debug, Clone)]
pub enum Gate {
    /// The unread bytes start with this signature. A buffer too short to hold it does not match.
    Signature(Vec<u8>),
    /// The integer field at this path is non-zero.
    Flag(String),
    Custom(fn(&ByteCursor<'_>, &Scope<'_>) -> Result<bool, DecodeError>),
}

impl Gate {
    pub fn test(&self, cursor: &ByteCursor<'_>, scope: &Scope<'_>) -> Result<bool, DecodeError> {
        match self {
            Gate::Signature(signature) => Ok(cursor.starts_with(signature)),
            Gate::Flag(path) => scope.flag(path),
            Gate::Custom(f) => f(cursor, scope),
        }
    }
}

/// Decides, before every iteration, whether a repeated node runs again.
#[derive(Debug, Clone)]
pub enum Repeat {
    /// The next byte is one of these codes. End of input stops the loop.
    WhileNextIn(Vec<u8>),
    Custom(fn(&ByteCursor<'_>) -> Result<bool, DecodeError>),
}

impl Repeat {
    pub fn test(&self, cursor: &ByteCursor<'_>) -> Result<bool, DecodeError> {
        match self {
            Repeat::WhileNextIn(codes) => Ok(cursor
                .peek_byte()
                .map(|code| codes.contains(&code))
                .unwrap_or(false)),
            Repeat::Custom(f) => f(cursor),
        }
    }
}

impl Node {
    fn new(label: impl Into<String>, kind: NodeKind) -> Self {
        Node {
            label: label.into(),
            kind,
            requires: None,
            repeat: None,
            skip: false,
        }
    }

    pub fn parts(label: impl Into<String>, parts: Vec<Node>) -> Self {
        Node::new(label, NodeKind::Parts(parts))
    }

    pub fn extract(label: impl Into<String>, extract: Extract) -> Self {
        Node::new(label, NodeKind::Extract(extract))
    }

    pub fn bits<S: Into<String>>(
        label: impl Into<String>,
        fields: impl IntoIterator<Item = (S, BitSpec)>,
    ) -> Self {
        let fields = fields
            .into_iter()
            .map(|(name, spec)| (name.into(), spec))
            .collect();
        Node::new(label, NodeKind::Bits(fields))
    }

    pub fn byte(label: impl Into<String>) -> Self {
        Node::extract(label, Extract::Byte)
    }

    pub fn bytes(label: impl Into<String>, count: Count) -> Self {
        Node::extract(label, Extract::Bytes(count))
    }

    pub fn text(label: impl Into<String>, count: Count) -> Self {
        Node::extract(label, Extract::Text(count))
    }

    pub fn u16_le(label: impl Into<String>) -> Self {
        Node::extract(label, Extract::Unsigned(Endian::Little))
    }

    pub fn u16_be(label: impl Into<String>) -> Self {
        Node::extract(label, Extract::Unsigned(Endian::Big))
    }

    pub fn sub_blocks(label: impl Into<String>) -> Self {
        Node::extract(label, Extract::SubBlocks)
    }

    pub fn custom(label: impl Into<String>, f: ExtractFn) -> Self {
        Node::extract(label, Extract::Custom(f))
    }

    pub fn requires(mut self, gate: Gate) -> Self {
        self.requires = Some(gate);
        self
    }

    /// Gate on the unread bytes starting with `signature`.
    pub fn when_next(self, signature: &[u8]) -> Self {
        self.requires(Gate::Signature(signature.to_vec()))
    }

    /// Gate on an already parsed integer field being non-zero.
    pub fn when_flag(self, path: impl Into<String>) -> Self {
        self.requires(Gate::Flag(path.into()))
    }

    pub fn repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = Some(repeat);
        self
    }

    pub fn skip(mut self) -> Self {
        self.skip = true;
        self
    }
}
