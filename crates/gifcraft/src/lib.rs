//! # gifcraft
//!
//! Decodes the container structure of GIF streams with a small declarative
//! schema engine.
//!
//! A schema is a tree of [node::Node]s: fixed-width reads, bit fields packed
//! into one byte, nodes gated on peeked bytes or earlier results, repeated
//! groups, and sub-block runs. [schema::Schema::compile] validates the tree
//! and [schema::Schema::parse] walks it over a byte slice, producing a nested
//! [value::Value] map that mirrors the schema. The GIF layout in [gif] is
//! just one such schema. Pixel data is left LZW-compressed.
//!
//! ## Example
//!
//! ```
//! use gifcraft::bits::BitSpec;
//! use gifcraft::extract::Count;
//! use gifcraft::node::Node;
//! use gifcraft::schema::Schema;
//! use gifcraft::value::Value;
//!
//! let schema = Schema::compile(&[
//!     Node::bits("flags", [("present", BitSpec::flag(0)), ("len", BitSpec::new(4, 4))]),
//!     Node::bytes("payload", Count::field("flags.len")).when_flag("flags.present"),
//! ])
//! .unwrap();
//!
//! let parsed = schema.parse(&[0x82, 0xAA, 0xBB]).unwrap();
//! assert_eq!(parsed.get("payload"), Some(&Value::Bytes(vec![0xAA, 0xBB])));
//! ```
//!
//! Decoding a GIF:
//!
//! ```
//! let data = b"GIF89a\x01\x00\x01\x00\x00\x00\x00\x3B";
//! let gif = gifcraft::gif::decode(data).unwrap();
//! assert_eq!(gif.path("lsd.width").and_then(|v| v.as_u64()), Some(1));
//! ```

pub mod bits;
pub mod blocks;
pub mod compiled;
pub mod cursor;
pub mod errors;
pub mod extract;
pub mod gif;
pub mod node;
pub mod schema;
pub mod scope;
pub mod value;

pub use errors::{CompileError, DecodeError};
pub use gif::decode;
pub use value::{Map, Value};
