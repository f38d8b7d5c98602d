//! The result tree produced by [crate::schema::Schema::parse].

use std::collections::BTreeMap;

/// Parsed values keyed by node label.
pub type Map = BTreeMap<String, Value>;

/// A value produced by evaluating one schema node.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(untagged))]
pub enum Value {
    U64(u64),
    /// Raw bytes, e.g. a sub-block payload or a color triple.
    Bytes(Vec<u8>),
    Text(String),
    /// Result of a composite or bit-field node.
    Map(Map),
    /// Result of a repeated node or an array extractor.
    List(Vec<Value>),
}

impl Value {
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::U64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    /// Looks up `key` if this is a map.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map()?.get(key)
    }

    /// Follows a dotted path such as `lsd.gct.size`. Numeric segments index into lists.
    pub fn path(&self, path: &str) -> Option<&Value> {
        path.split('.').try_fold(self, |value, segment| match value {
            Value::Map(m) => m.get(segment),
            Value::List(l) => l.get(segment.parse::<usize>().ok()?),
            _ => None,
        })
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Map(map)
    }
}

/// Follows a dotted path starting from a map rather than a [Value].
pub fn lookup<'v>(map: &'v Map, path: &str) -> Option<&'v Value> {
    let (head, rest) = match path.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (path, None),
    };

    let value = map.get(head)?;
    match rest {
        Some(rest) => value.path(rest),
        None => Some(value),
    }
}
