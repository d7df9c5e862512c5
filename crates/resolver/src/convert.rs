//! Conversions between [`Node`] and the Rust types typed objects store.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use indexmap::IndexMap;
use serde_json::{Number, Value};

use crate::error::ResolveError;
use crate::node::Node;
use crate::object::Resolvable;

/// Build a field value from a decoded node.
pub trait FromNode: Sized {
    fn from_node(node: Node) -> Result<Self, ResolveError>;
}

/// Produce the node an encoder sees for a field value.
///
/// Fails for values that have no JSON form, such as non-finite floats.
pub trait ToNode {
    fn to_node(&self) -> Result<Node, ResolveError>;
}

impl FromNode for Node {
    fn from_node(node: Node) -> Result<Self, ResolveError> {
        Ok(node)
    }
}

impl ToNode for Node {
    fn to_node(&self) -> Result<Node, ResolveError> {
        Ok(self.clone())
    }
}

impl FromNode for Box<dyn Resolvable> {
    fn from_node(node: Node) -> Result<Self, ResolveError> {
        match node {
            Node::Object(obj) => Ok(obj),
            other => Err(ResolveError::mismatch("object", other.kind())),
        }
    }
}

impl ToNode for Box<dyn Resolvable> {
    fn to_node(&self) -> Result<Node, ResolveError> {
        Ok(Node::Object(self.clone_box()))
    }
}

/// Untyped JSON only; a typed object is a mismatch.
impl FromNode for Value {
    fn from_node(node: Node) -> Result<Self, ResolveError> {
        node.into_value()
    }
}

impl ToNode for Value {
    fn to_node(&self) -> Result<Node, ResolveError> {
        Ok(Node::from(self.clone()))
    }
}

impl FromNode for bool {
    fn from_node(node: Node) -> Result<Self, ResolveError> {
        match node {
            Node::Bool(b) => Ok(b),
            other => Err(ResolveError::mismatch("bool", other.kind())),
        }
    }
}

impl ToNode for bool {
    fn to_node(&self) -> Result<Node, ResolveError> {
        Ok(Node::Bool(*self))
    }
}

impl FromNode for String {
    fn from_node(node: Node) -> Result<Self, ResolveError> {
        match node {
            Node::String(s) => Ok(s),
            other => Err(ResolveError::mismatch("string", other.kind())),
        }
    }
}

impl ToNode for String {
    fn to_node(&self) -> Result<Node, ResolveError> {
        Ok(Node::String(self.clone()))
    }
}

impl ToNode for str {
    fn to_node(&self) -> Result<Node, ResolveError> {
        Ok(Node::String(self.to_string()))
    }
}

macro_rules! int_conversions {
    ($($t:ty),*) => {
        $(
            impl FromNode for $t {
                fn from_node(node: Node) -> Result<Self, ResolveError> {
                    let n = match node {
                        Node::Number(n) => n,
                        other => return Err(ResolveError::mismatch(stringify!($t), other.kind())),
                    };
                    let converted = if let Some(i) = n.as_i64() {
                        <$t>::try_from(i).ok()
                    } else if let Some(u) = n.as_u64() {
                        <$t>::try_from(u).ok()
                    } else {
                        None
                    };
                    converted.ok_or_else(|| ResolveError::mismatch(stringify!($t), n.to_string()))
                }
            }

            impl ToNode for $t {
                fn to_node(&self) -> Result<Node, ResolveError> {
                    Ok(Node::Number(Number::from(*self)))
                }
            }
        )*
    };
}

int_conversions!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl FromNode for f64 {
    fn from_node(node: Node) -> Result<Self, ResolveError> {
        match node {
            Node::Number(n) => n
                .as_f64()
                .ok_or_else(|| ResolveError::mismatch("f64", n.to_string())),
            other => Err(ResolveError::mismatch("f64", other.kind())),
        }
    }
}

/// NaN and the infinities have no JSON form.
impl ToNode for f64 {
    fn to_node(&self) -> Result<Node, ResolveError> {
        Number::from_f64(*self)
            .map(Node::Number)
            .ok_or(ResolveError::NonFiniteNumber(*self))
    }
}

/// Values outside the `f32` range are a mismatch rather than infinity.
impl FromNode for f32 {
    fn from_node(node: Node) -> Result<Self, ResolveError> {
        let n = match node {
            Node::Number(n) => n,
            other => return Err(ResolveError::mismatch("f32", other.kind())),
        };
        n.as_f64()
            .map(|f| f as f32)
            .filter(|f| f.is_finite())
            .ok_or_else(|| ResolveError::mismatch("f32", n.to_string()))
    }
}

impl ToNode for f32 {
    fn to_node(&self) -> Result<Node, ResolveError> {
        f64::from(*self).to_node()
    }
}

impl<T: FromNode> FromNode for Option<T> {
    fn from_node(node: Node) -> Result<Self, ResolveError> {
        match node {
            Node::Null => Ok(None),
            other => T::from_node(other).map(Some),
        }
    }
}

impl<T: ToNode> ToNode for Option<T> {
    fn to_node(&self) -> Result<Node, ResolveError> {
        self.as_ref().map_or(Ok(Node::Null), |v| v.to_node())
    }
}

impl<T: FromNode> FromNode for Vec<T> {
    fn from_node(node: Node) -> Result<Self, ResolveError> {
        match node {
            Node::Array(items) => items.into_iter().map(T::from_node).collect(),
            other => Err(ResolveError::mismatch("array", other.kind())),
        }
    }
}

impl<T: ToNode> ToNode for Vec<T> {
    fn to_node(&self) -> Result<Node, ResolveError> {
        self.iter()
            .map(|v| v.to_node())
            .collect::<Result<Vec<_>, _>>()
            .map(Node::Array)
    }
}

fn map_entries<T: FromNode>(
    node: Node,
) -> Result<impl Iterator<Item = Result<(String, T), ResolveError>>, ResolveError> {
    match node {
        Node::Map(map) => Ok(map
            .into_iter()
            .map(|(k, v)| T::from_node(v).map(|v| (k, v)))),
        other => Err(ResolveError::mismatch("map", other.kind())),
    }
}

fn to_map_node<'a, T: ToNode + 'a>(
    entries: impl Iterator<Item = (&'a String, &'a T)>,
) -> Result<Node, ResolveError> {
    entries
        .map(|(k, v)| v.to_node().map(|v| (k.clone(), v)))
        .collect::<Result<IndexMap<_, _>, _>>()
        .map(Node::Map)
}

impl<T: FromNode> FromNode for IndexMap<String, T> {
    fn from_node(node: Node) -> Result<Self, ResolveError> {
        map_entries(node)?.collect()
    }
}

impl<T: ToNode> ToNode for IndexMap<String, T> {
    fn to_node(&self) -> Result<Node, ResolveError> {
        to_map_node(self.iter())
    }
}

impl<T: FromNode> FromNode for BTreeMap<String, T> {
    fn from_node(node: Node) -> Result<Self, ResolveError> {
        map_entries(node)?.collect()
    }
}

impl<T: ToNode> ToNode for BTreeMap<String, T> {
    fn to_node(&self) -> Result<Node, ResolveError> {
        to_map_node(self.iter())
    }
}

impl<T: FromNode, S: BuildHasher + Default> FromNode for HashMap<String, T, S> {
    fn from_node(node: Node) -> Result<Self, ResolveError> {
        map_entries(node)?.collect()
    }
}

impl<T: ToNode, S> ToNode for HashMap<String, T, S> {
    fn to_node(&self) -> Result<Node, ResolveError> {
        to_map_node(self.iter())
    }
}
