//! GIF container schema.
//!
//! Decodes the header, logical screen descriptor, global color table and the
//! sequence of extension/image blocks. Image data stays LZW-compressed: each
//! `image.data.blocks` entry holds the concatenated sub-block payload for an
//! external decoder, alongside `image.data.minCodeSize`.
//!
//! ```text
//! {
//!   header: { signature, version },
//!   lsd: {
//!     width, height, gct: { exists, resolution, sort, size },
//!     backgroundColorIndex, pixelAspectRatio
//!   },
//!   gct?: [ [r, g, b], ... ],
//!   frames: [ { gce?, application?, comment?, image?, text? }, ... ]
//! }
//! ```

use std::sync::OnceLock;

use log::debug;

use crate::{
    bits::BitSpec,
    errors::{CompileError, DecodeError},
    extract::{Count, Extract},
    node::{Node, Repeat},
    schema::Schema,
    scope::Scope,
    value::Value,
};

pub const EXTENSION_INTRODUCER: u8 = 0x21;
pub const IMAGE_SEPARATOR: u8 = 0x2C;
pub const TRAILER: u8 = 0x3B;

pub const GRAPHIC_CONTROL_LABEL: u8 = 0xF9;
pub const APPLICATION_LABEL: u8 = 0xFF;
pub const COMMENT_LABEL: u8 = 0xFE;
pub const PLAIN_TEXT_LABEL: u8 = 0x01;

/// Bytes per color table entry (r, g, b).
const COLOR_STRIDE: usize = 3;

/// Entries in a color table whose packed size field is `size`.
fn color_table_len(size: u64) -> usize {
    1 << (size + 1)
}

fn global_color_table_len(scope: &Scope<'_>) -> Result<usize, DecodeError> {
    Ok(color_table_len(scope.uint("lsd.gct.size")?))
}

fn local_color_table_len(scope: &Scope<'_>) -> Result<usize, DecodeError> {
    Ok(color_table_len(scope.uint("descriptor.lct.size")?))
}

fn codes(n: usize) -> Node {
    Node::bytes("codes", Count::Fixed(n)).skip()
}

fn gce() -> Node {
    Node::parts(
        "gce",
        vec![
            codes(2),
            Node::byte("byteSize"),
            Node::bits(
                "extras",
                [
                    ("future", BitSpec::new(0, 3)),
                    ("disposal", BitSpec::new(3, 3)),
                    ("userInput", BitSpec::flag(6)),
                    ("transparentColorGiven", BitSpec::flag(7)),
                ],
            ),
            Node::u16_le("delay"),
            Node::byte("transparentColorIndex"),
            Node::byte("terminator").skip(),
        ],
    )
    .when_next(&[EXTENSION_INTRODUCER, GRAPHIC_CONTROL_LABEL])
}

// TODO: gate application and comment blocks on the frame not already holding
// a gce, image, text or comment, so they attach to the following frame.
fn application() -> Node {
    Node::parts(
        "application",
        vec![
            codes(2),
            Node::byte("blockSize"),
            Node::text("id", Count::field("blockSize")),
            Node::sub_blocks("blocks"),
        ],
    )
    .when_next(&[EXTENSION_INTRODUCER, APPLICATION_LABEL])
}

fn comment() -> Node {
    Node::parts("comment", vec![codes(2), Node::sub_blocks("blocks")])
        .when_next(&[EXTENSION_INTRODUCER, COMMENT_LABEL])
}

fn image() -> Node {
    Node::parts(
        "image",
        vec![
            Node::byte("code").skip(),
            Node::parts(
                "descriptor",
                vec![
                    Node::u16_le("left"),
                    Node::u16_le("top"),
                    Node::u16_le("width"),
                    Node::u16_le("height"),
                    Node::bits(
                        "lct",
                        [
                            ("exists", BitSpec::flag(0)),
                            ("interlaced", BitSpec::flag(1)),
                            ("sort", BitSpec::flag(2)),
                            ("future", BitSpec::new(3, 2)),
                            ("size", BitSpec::new(5, 3)),
                        ],
                    ),
                ],
            ),
            Node::extract(
                "lct",
                Extract::Array {
                    stride: COLOR_STRIDE,
                    count: Count::Computed(local_color_table_len),
                },
            )
            .when_flag("descriptor.lct.exists"),
            Node::parts(
                "data",
                vec![Node::byte("minCodeSize"), Node::sub_blocks("blocks")],
            ),
        ],
    )
    .when_next(&[IMAGE_SEPARATOR])
}

fn text() -> Node {
    Node::parts(
        "text",
        vec![
            codes(2),
            Node::byte("blockSize"),
            Node::bytes("preData", Count::field("blockSize")),
            Node::sub_blocks("blocks"),
        ],
    )
    .when_next(&[EXTENSION_INTRODUCER, PLAIN_TEXT_LABEL])
}

/// Schema nodes for a whole GIF stream, in evaluation order.
pub fn nodes() -> Vec<Node> {
    vec![
        Node::parts(
            "header",
            vec![
                Node::text("signature", Count::Fixed(3)),
                Node::text("version", Count::Fixed(3)),
            ],
        ),
        Node::parts(
            "lsd",
            vec![
                Node::u16_le("width"),
                Node::u16_le("height"),
                Node::bits(
                    "gct",
                    [
                        ("exists", BitSpec::flag(0)),
                        ("resolution", BitSpec::new(1, 3)),
                        ("sort", BitSpec::flag(4)),
                        ("size", BitSpec::new(5, 3)),
                    ],
                ),
                Node::byte("backgroundColorIndex"),
                Node::byte("pixelAspectRatio"),
            ],
        ),
        Node::extract(
            "gct",
            Extract::Array {
                stride: COLOR_STRIDE,
                count: Count::Computed(global_color_table_len),
            },
        )
        .when_flag("lsd.gct.exists"),
        // Stop on anything that is not a block introducer rather than waiting
        // for the trailer, so garbage after the last block cannot loop forever.
        Node::parts("frames", vec![gce(), application(), comment(), image(), text()])
            .repeat(Repeat::WhileNextIn(vec![EXTENSION_INTRODUCER, IMAGE_SEPARATOR])),
    ]
}

/// The compiled GIF schema, built on first use and shared by every decode.
pub fn schema() -> Result<&'static Schema, CompileError> {
    static SCHEMA: OnceLock<Result<Schema, CompileError>> = OnceLock::new();

    SCHEMA
        .get_or_init(|| Schema::compile(&nodes()))
        .as_ref()
        .map_err(Clone::clone)
}

/// Decodes the block structure of a GIF stream.
pub fn decode(data: &[u8]) -> Result<Value, DecodeError> {
    decode_with_extent(data).map(|(_, value)| value)
}

/// Like [decode], also returning how many bytes were consumed. The trailer
/// byte is not part of the schema, so for a well-formed file this is one
/// less than the file length.
pub fn decode_with_extent(data: &[u8]) -> Result<(usize, Value), DecodeError> {
    let (consumed, map) = schema()?.parse_with_extent(data)?;

    let frames = map.get("frames").and_then(Value::as_list).map_or(0, <[Value]>::len);
    debug!("decoded {} frames from {} bytes", frames, consumed);

    Ok((consumed, Value::Map(map)))
}
