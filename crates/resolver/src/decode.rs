//! JSON text to typed object graph.
//!
//! Resolution is driven by discriminators: a tagged mapping becomes a typed
//! object and the values of its fields are walked for further tags. Anything
//! reached without going through a typed object's fields is returned as
//! plain data, so a top-level array of tagged mappings stays untyped.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::config::UnknownFieldPolicy;
use crate::error::ResolveError;
use crate::node::Node;
use crate::object::Resolvable;
use crate::resolver::Resolver;

impl Resolver<'_> {
    /// Parse and resolve a JSON payload.
    ///
    /// Fails with [`ResolveError::InvalidPayload`] on a syntax error and on a
    /// top-level value that counts as empty (see [`is_empty_payload`]).
    pub fn decode(&self, json: &str) -> Result<Node, ResolveError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| ResolveError::InvalidPayload(e.to_string()))?;
        if is_empty_payload(&value) {
            return Err(ResolveError::InvalidPayload(format!(
                "empty top-level value: {}",
                value
            )));
        }
        self.decode_value(value)
    }

    /// Resolve an already parsed value. No emptiness check is applied.
    pub fn decode_value(&self, value: Value) -> Result<Node, ResolveError> {
        self.resolve_object(value, 0)
    }

    /// Decode a payload whose root must be a `T`.
    pub fn decode_as<T: Resolvable + Default>(&self, json: &str) -> Result<T, ResolveError> {
        self.decode(json)?.into_typed()
    }

    fn resolve_object(&self, value: Value, depth: usize) -> Result<Node, ResolveError> {
        let map = match value {
            Value::Object(map) => map,
            other => return Ok(Node::from(other)),
        };
        let tag = match map.get(self.discriminator()) {
            None => None,
            Some(Value::String(name)) => Some(name.clone()),
            Some(other) => {
                return Err(ResolveError::InvalidDiscriminator {
                    field: self.discriminator().to_string(),
                    found: value_kind(other),
                })
            }
        };
        let Some(type_name) = tag else {
            return Ok(Node::from(Value::Object(map)));
        };
        self.check_depth(depth)?;

        log::trace!("resolving '{}' at depth {}", type_name, depth);
        let mut target = self.registry.instantiate(&type_name)?;
        self.convert(target.as_mut(), map, depth)?;
        Ok(Node::Object(target))
    }

    /// Copy every non-discriminator key of `source` onto `target`.
    fn convert(
        &self,
        target: &mut dyn Resolvable,
        source: Map<String, Value>,
        depth: usize,
    ) -> Result<(), ResolveError> {
        for (key, value) in source {
            if key == self.discriminator() {
                continue;
            }
            let value = self.convert_property_value(value, depth + 1)?;
            match target.set_field(&key, value) {
                Ok(None) => {}
                Ok(Some(unmatched)) => self.assign_unmatched(target, key, unmatched)?,
                Err(err) => return Err(err.in_field(target.type_name(), &key)),
            }
        }
        Ok(())
    }

    fn assign_unmatched(
        &self,
        target: &mut dyn Resolvable,
        key: String,
        value: Node,
    ) -> Result<(), ResolveError> {
        if let Some(extra) = target.extra_fields_mut() {
            extra.insert(key, value);
            return Ok(());
        }
        match self.config.unknown_fields {
            UnknownFieldPolicy::Ignore => {
                log::debug!(
                    "dropping undeclared field '{}' of '{}'",
                    key,
                    target.type_name()
                );
                Ok(())
            }
            UnknownFieldPolicy::Reject => Err(ResolveError::FieldMismatch {
                type_name: target.type_name().to_string(),
                field: key,
            }),
        }
    }

    fn convert_property_value(&self, value: Value, depth: usize) -> Result<Node, ResolveError> {
        match value {
            Value::Object(map) if map.contains_key(self.discriminator()) => {
                self.resolve_object(Value::Object(map), depth)
            }
            Value::Object(map) => {
                self.check_depth(depth)?;
                map.into_iter()
                    .map(|(k, v)| self.convert_property_value(v, depth + 1).map(|n| (k, n)))
                    .collect::<Result<IndexMap<_, _>, ResolveError>>()
                    .map(Node::Map)
            }
            Value::Array(items) => {
                self.check_depth(depth)?;
                items
                    .into_iter()
                    .map(|v| self.convert_property_value(v, depth + 1))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Node::Array)
            }
            scalar => Ok(Node::from(scalar)),
        }
    }
}

/// A top-level value that carries no data: `null`, `false`, numeric zero,
/// `""`, `"0"` or `[]`. An empty object is not empty in this sense.
pub fn is_empty_payload(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(_) => false,
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
