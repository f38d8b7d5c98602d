//! Leaf extractors: how a scalar node turns bytes under the cursor into a [Value].

use crate::{
    blocks::read_sub_blocks,
    cursor::{ByteCursor, Endian},
    errors::DecodeError,
    scope::Scope,
    value::Value,
};

/// Signature of a hand-written extractor.
pub type ExtractFn = fn(&mut ByteCursor<'_>, &Scope<'_>) -> Result<Value, DecodeError>;

/// Number of bytes or elements an extractor reads.
#[derive(Debug, Clone)]
pub enum Count {
    Fixed(usize),
    /// Value of an already parsed field, resolved through the [Scope].
    Field(String),
    Computed(fn(&Scope<'_>) -> Result<usize, DecodeError>),
}

impl Count {
    pub fn field(path: impl Into<String>) -> Self {
        Count::Field(path.into())
    }

    pub fn resolve(&self, scope: &Scope<'_>) -> Result<usize, DecodeError> {
        match self {
            Count::Fixed(n) => Ok(*n),
            Count::Field(path) => Ok(scope.uint(path)? as usize),
            Count::Computed(f) => f(scope),
        }
    }
}

/// A leaf parser. Every variant advances the cursor by exactly what it reads.
#[derive(Debug, Clone)]
pub enum Extract {
    /// One byte as [Value::U64].
    Byte,
    Bytes(Count),
    /// Latin-1 text.
    Text(Count),
    /// 16-bit unsigned integer.
    Unsigned(Endian),
    /// Concatenated payload of a sub-block run.
    SubBlocks,
    /// `count` elements of `stride` bytes each, as a list of [Value::Bytes].
    Array { stride: usize, count: Count },
    Custom(ExtractFn),
}

impl Extract {
    pub fn apply(
        &self,
        cursor: &mut ByteCursor<'_>,
        scope: &Scope<'_>,
    ) -> Result<Value, DecodeError> {
        match self {
            Extract::Byte => Ok(Value::U64(cursor.read_byte()? as u64)),
            Extract::Bytes(count) => {
                let n = count.resolve(scope)?;
                Ok(Value::Bytes(cursor.read_bytes(n)?.to_vec()))
            }
            Extract::Text(count) => {
                let n = count.resolve(scope)?;
                Ok(Value::Text(cursor.read_string(n)?))
            }
            Extract::Unsigned(endian) => Ok(Value::U64(cursor.read_unsigned(*endian)? as u64)),
            Extract::SubBlocks => Ok(Value::Bytes(read_sub_blocks(cursor)?)),
            Extract::Array { stride, count } => {
                let count = count.resolve(scope)?;

                // Check the whole extent up front so a bogus count fails before allocating.
                cursor.peek_bytes(stride.saturating_mul(count))?;

                let mut values = Vec::with_capacity(count);
                for _ in 0..count {
                    values.push(Value::Bytes(cursor.read_bytes(*stride)?.to_vec()));
                }

                Ok(Value::List(values))
            }
            Extract::Custom(f) => f(cursor, scope),
        }
    }
}
