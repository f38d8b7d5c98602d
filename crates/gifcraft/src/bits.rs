//! Bit-field extraction from a single byte.
//!
//! Bits are addressed in MSB-first order: index 0 is the `0x80` bit.

use crate::errors::CompileError;

/// Unchecked description of a bit range inside one byte, as written in a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitSpec {
    /// Offset of the first bit, counted from the most significant bit.
    pub index: u8,
    /// Number of bits.
    pub length: u8,
}

impl BitSpec {
    pub fn new(index: u8, length: u8) -> Self {
        BitSpec { index, length }
    }

    /// A single-bit field, decoded as 0 or 1.
    pub fn flag(index: u8) -> Self {
        BitSpec { index, length: 1 }
    }
}

impl Default for BitSpec {
    fn default() -> Self {
        BitSpec {
            index: 0,
            length: 1,
        }
    }
}

/// A validated [BitSpec]: `index + length` never exceeds 8 and `length` is at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitField {
    shift: u8,
    mask: u8,
}

impl BitField {
    /// Validates `spec`; `name` is only used to describe the failure.
    pub fn compile(name: &str, spec: &BitSpec) -> Result<Self, CompileError> {
        if spec.length == 0 || usize::from(spec.index) + usize::from(spec.length) > 8 {
            return Err(CompileError::MalformedBitField {
                field: name.to_string(),
                index: spec.index,
                length: spec.length,
            });
        }

        let mask = (((1u16 << spec.length) - 1) as u8) << (8 - spec.index - spec.length);

        Ok(BitField {
            shift: 8 - spec.index - spec.length,
            mask,
        })
    }

    /// Returns the field's bits from `byte`, right-aligned.
    pub fn extract(&self, byte: u8) -> u8 {
        (byte & self.mask) >> self.shift
    }
}

impl TryFrom<&BitSpec> for BitField {
    type Error = CompileError;

    fn try_from(spec: &BitSpec) -> Result<Self, Self::Error> {
        BitField::compile("", spec)
    }
}
