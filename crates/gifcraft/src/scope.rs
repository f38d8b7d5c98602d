//! Read-only view of the results parsed so far, handed to gates and extractors.
//!
//! A [Scope] links the map currently being built to the maps of its
//! ancestors. Nothing in the chain can be mutated while a gate or extractor
//! holds it; the evaluator inserts a node's value only after the scope that
//! observed it is gone.

use crate::{
    errors::DecodeError,
    value::{Map, Value, lookup},
};

#[derive(Debug, Clone, Copy)]
pub struct Scope<'s> {
    map: &'s Map,
    parent: Option<&'s Scope<'s>>,
}

impl<'s> Scope<'s> {
    /// Scope whose only map is the schema's top-level result.
    pub fn root_of(map: &'s Map) -> Self {
        Scope { map, parent: None }
    }

    /// Scope for a child map nested inside `self`.
    pub fn nested(&'s self, map: &'s Map) -> Scope<'s> {
        Scope {
            map,
            parent: Some(self),
        }
    }

    /// The map currently being built (the nearest one).
    pub fn current(&self) -> &'s Map {
        self.map
    }

    /// The outermost map, i.e. the top-level result.
    pub fn root(&self) -> &'s Map {
        match self.parent {
            Some(parent) => parent.root(),
            None => self.map,
        }
    }

    /// Resolves a dotted path, trying the nearest map first and walking outward.
    pub fn lookup(&self, path: &str) -> Option<&'s Value> {
        let mut scope = Some(self);
        while let Some(s) = scope {
            if let Some(value) = lookup(s.map, path) {
                return Some(value);
            }
            scope = s.parent;
        }

        None
    }

    /// Like [Scope::lookup], requiring an unsigned integer.
    pub fn uint(&self, path: &str) -> Result<u64, DecodeError> {
        self.lookup(path)
            .ok_or_else(|| DecodeError::MissingField(path.to_string()))?
            .as_u64()
            .ok_or_else(|| DecodeError::TypeMismatch {
                path: path.to_string(),
                expected: "an unsigned integer",
            })
    }

    /// True if the field at `path` is a non-zero integer.
    pub fn flag(&self, path: &str) -> Result<bool, DecodeError> {
        Ok(self.uint(path)? != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_map_wins() {
        let root = Map::from([("size".to_string(), Value::U64(1))]);
        let child = Map::from([("size".to_string(), Value::U64(2))]);

        let outer = Scope::root_of(&root);
        let inner = outer.nested(&child);

        assert_eq!(inner.uint("size").unwrap(), 2);
        assert_eq!(outer.uint("size").unwrap(), 1);
    }

    #[test]
    fn test_falls_back_to_ancestor() {
        let root = Map::from([(
            "lsd".to_string(),
            Value::Map(Map::from([("width".to_string(), Value::U64(10))])),
        )]);
        let child = Map::new();

        let outer = Scope::root_of(&root);
        let inner = outer.nested(&child);

        assert_eq!(inner.uint("lsd.width").unwrap(), 10);
        assert_eq!(inner.root(), &root);
        assert!(inner.current().is_empty());
    }

    #[test]
    fn test_missing_and_mismatched() {
        let root = Map::from([("id".to_string(), Value::Text("NETSCAPE".into()))]);
        let scope = Scope::root_of(&root);

        assert_eq!(
            scope.uint("blockSize").unwrap_err(),
            DecodeError::MissingField("blockSize".to_string())
        );
        assert!(matches!(
            scope.flag("id"),
            Err(DecodeError::TypeMismatch { .. })
        ));
    }
}
