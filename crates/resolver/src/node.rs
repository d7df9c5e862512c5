//! The value tree shared by both pipelines.
//!
//! A [`Node`] is either plain JSON data or a typed object. Decoding produces
//! nodes, and typed objects hand nodes to the encoder through
//! [`Resolvable::fields`](crate::Resolvable::fields).

use indexmap::IndexMap;
use serde_json::{Number, Value};

use crate::error::ResolveError;
use crate::object::Resolvable;

/// A generic JSON value that may also hold typed objects.
#[derive(Debug, Clone, Default)]
pub enum Node {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<Node>),
    /// An untyped mapping, in insertion order.
    Map(IndexMap<String, Node>),
    /// A typed object.
    Object(Box<dyn Resolvable>),
}

impl Node {
    /// Wrap a typed object.
    pub fn object<T: Resolvable>(value: T) -> Self {
        Node::Object(Box::new(value))
    }

    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Null => "null",
            Node::Bool(_) => "bool",
            Node::Number(_) => "number",
            Node::String(_) => "string",
            Node::Array(_) => "array",
            Node::Map(_) => "map",
            Node::Object(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Null)
    }

    pub fn as_object(&self) -> Option<&dyn Resolvable> {
        match self {
            Node::Object(obj) => Some(obj.as_ref()),
            _ => None,
        }
    }

    /// Borrow the typed object as `T`, if this node holds one of that type.
    pub fn downcast_ref<T: Resolvable>(&self) -> Option<&T> {
        self.as_object()
            .and_then(|obj| obj.as_any().downcast_ref::<T>())
    }

    /// Take the typed object out as `T`.
    ///
    /// On failure both sides of the mismatch name type identifiers, so
    /// `expected` is `T`'s identifier rather than its Rust path.
    pub fn into_typed<T: Resolvable + Default>(self) -> Result<T, ResolveError> {
        let expected = || format!("object '{}'", T::default().type_name());
        match self {
            Node::Object(obj) => {
                let found = format!("object '{}'", obj.type_name());
                obj.into_any()
                    .downcast::<T>()
                    .map(|boxed| *boxed)
                    .map_err(|_| ResolveError::mismatch(expected(), found))
            }
            other => Err(ResolveError::mismatch(expected(), other.kind())),
        }
    }

    /// Convert back to plain JSON.
    ///
    /// Fails if a typed object is reachable; use
    /// [`Resolver::to_value`](crate::Resolver::to_value) to encode those.
    pub fn into_value(self) -> Result<Value, ResolveError> {
        Ok(match self {
            Node::Null => Value::Null,
            Node::Bool(b) => Value::Bool(b),
            Node::Number(n) => Value::Number(n),
            Node::String(s) => Value::String(s),
            Node::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(Node::into_value)
                    .collect::<Result<Vec<_>, ResolveError>>()?,
            ),
            Node::Map(map) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| v.into_value().map(|v| (k, v)))
                    .collect::<Result<_, ResolveError>>()?,
            ),
            Node::Object(obj) => {
                return Err(ResolveError::mismatch(
                    "untyped value",
                    format!("object '{}'", obj.type_name()),
                ))
            }
        })
    }
}

/// Structural conversion. Tagged mappings stay untyped.
impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Bool(b),
            Value::Number(n) => Node::Number(n),
            Value::String(s) => Node::String(s),
            Value::Array(items) => Node::Array(items.into_iter().map(Node::from).collect()),
            Value::Object(map) => {
                Node::Map(map.into_iter().map(|(k, v)| (k, Node::from(v))).collect())
            }
        }
    }
}

impl From<Box<dyn Resolvable>> for Node {
    fn from(obj: Box<dyn Resolvable>) -> Self {
        Node::Object(obj)
    }
}

/// Typed objects compare by type identifier and field map. Objects whose
/// fields cannot be listed are never equal.
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Node::Null, Node::Null) => true,
            (Node::Bool(a), Node::Bool(b)) => a == b,
            (Node::Number(a), Node::Number(b)) => a == b,
            (Node::String(a), Node::String(b)) => a == b,
            (Node::Array(a), Node::Array(b)) => a == b,
            (Node::Map(a), Node::Map(b)) => a == b,
            (Node::Object(a), Node::Object(b)) => {
                a.type_name() == b.type_name()
                    && matches!((a.fields(), b.fields()), (Ok(x), Ok(y)) if x == y)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_keeps_tagged_maps_untyped() {
        let node = Node::from(json!({"json_resolve_class": "Anything", "x": [1, 2]}));
        match &node {
            Node::Map(map) => {
                assert_eq!(map["json_resolve_class"], Node::String("Anything".to_string()));
                assert_eq!(map["x"].kind(), "array");
            }
            other => panic!("expected Map, got {:?}", other),
        }
    }

    #[test]
    fn test_into_value_preserves_key_order() {
        let value = json!({"b": 1, "a": {"z": null, "y": true}});
        let back = Node::from(value.clone()).into_value().unwrap();
        assert_eq!(back, value);
        let keys: Vec<_> = back.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn test_into_typed_rejects_scalars() {
        #[derive(Debug, Clone, Default)]
        struct Unit;
        crate::resolvable!(Unit as "test.Unit" {});

        let err = Node::String("x".to_string()).into_typed::<Unit>().unwrap_err();
        match err {
            ResolveError::TypeMismatch { expected, found } => {
                assert_eq!(expected, "object 'test.Unit'");
                assert_eq!(found, "string");
            }
            other => panic!("expected TypeMismatch, got {:?}", other),
        }
        assert!(Node::object(Unit).into_typed::<Unit>().is_ok());
    }

    #[test]
    fn test_into_typed_names_identifiers_on_both_sides() {
        #[derive(Debug, Clone, Default)]
        struct Cat;
        crate::resolvable!(Cat as "pets.Cat" {});
        #[derive(Debug, Clone, Default)]
        struct Dog;
        crate::resolvable!(Dog as "pets.Dog" {});

        let err = Node::object(Cat).into_typed::<Dog>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "expected object 'pets.Dog', found object 'pets.Cat'"
        );
    }
}
