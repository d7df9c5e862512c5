//! Typed object graph to JSON text.

use serde_json::{Map, Value};

use crate::error::ResolveError;
use crate::node::Node;
use crate::object::Resolvable;
use crate::resolver::Resolver;

impl Resolver<'_> {
    /// Encode `object` and everything reachable from its fields, tagging each
    /// typed object with its identifier.
    pub fn encode(&self, object: &dyn Resolvable) -> Result<String, ResolveError> {
        let repr = self.build_representation(object, 0)?;
        Ok(serde_json::to_string(&repr)?)
    }

    pub fn encode_pretty(&self, object: &dyn Resolvable) -> Result<String, ResolveError> {
        let repr = self.build_representation(object, 0)?;
        Ok(serde_json::to_string_pretty(&repr)?)
    }

    /// Encode an arbitrary node, typed or not.
    pub fn encode_node(&self, node: Node) -> Result<String, ResolveError> {
        let value = self.to_value(node)?;
        Ok(serde_json::to_string(&value)?)
    }

    /// Build the tagged JSON tree for a node without serializing it.
    pub fn to_value(&self, node: Node) -> Result<Value, ResolveError> {
        self.build_property_value(node, 0)
    }

    fn build_representation(
        &self,
        object: &dyn Resolvable,
        depth: usize,
    ) -> Result<Map<String, Value>, ResolveError> {
        self.check_depth(depth)?;
        log::trace!("encoding '{}' at depth {}", object.type_name(), depth);

        // Replaces a same-named field in place, otherwise lands last.
        let mut fields = object.fields()?;
        fields.insert(
            self.discriminator().to_string(),
            Node::String(object.type_name().to_string()),
        );

        fields
            .into_iter()
            .map(|(k, v)| self.build_property_value(v, depth + 1).map(|v| (k, v)))
            .collect()
    }

    fn build_property_value(&self, node: Node, depth: usize) -> Result<Value, ResolveError> {
        match node {
            Node::Object(obj) => self
                .build_representation(obj.as_ref(), depth)
                .map(Value::Object),
            Node::Array(items) => {
                self.check_depth(depth)?;
                items
                    .into_iter()
                    .map(|v| self.build_property_value(v, depth + 1))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Array)
            }
            Node::Map(map) => {
                self.check_depth(depth)?;
                map.into_iter()
                    .map(|(k, v)| self.build_property_value(v, depth + 1).map(|v| (k, v)))
                    .collect::<Result<Map<_, _>, _>>()
                    .map(Value::Object)
            }
            Node::Null => Ok(Value::Null),
            Node::Bool(b) => Ok(Value::Bool(b)),
            Node::Number(n) => Ok(Value::Number(n)),
            Node::String(s) => Ok(Value::String(s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolverConfig;
    use crate::object::Fields;
    use crate::registry::TypeRegistry;
    use indexmap::IndexMap;
    use serde_json::json;

    #[derive(Debug, Clone, Default)]
    struct Engine {
        cylinders: u8,
    }
    crate::resolvable!(Engine as "car.Engine" { cylinders });

    #[derive(Debug, Clone, Default)]
    struct Car {
        model: String,
        engine: Option<Engine>,
        spares: Vec<Engine>,
        notes: IndexMap<String, Engine>,
    }
    crate::resolvable!(Car as "car.Car" { model, engine, spares, notes });

    /// Carries arbitrary keys, including the discriminator itself.
    #[derive(Debug, Clone, Default)]
    struct Clash {
        extra: Fields,
    }
    crate::resolvable!(Clash as "test.Clash" {} extra extra);

    #[test]
    fn test_discriminator_injected_at_every_level() {
        let registry = TypeRegistry::new();
        let resolver = Resolver::new(&registry);
        let mut notes = IndexMap::new();
        notes.insert("old".to_string(), Engine { cylinders: 4 });
        let car = Car {
            model: "roadster".to_string(),
            engine: Some(Engine { cylinders: 8 }),
            spares: vec![Engine { cylinders: 6 }],
            notes,
        };

        let value: Value = serde_json::from_str(&resolver.encode(&car).unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                "model": "roadster",
                "engine": {"cylinders": 8, "json_resolve_class": "car.Engine"},
                "spares": [{"cylinders": 6, "json_resolve_class": "car.Engine"}],
                "notes": {"old": {"cylinders": 4, "json_resolve_class": "car.Engine"}},
                "json_resolve_class": "car.Car"
            })
        );
    }

    #[test]
    fn test_key_order_is_field_order_then_discriminator() {
        let registry = TypeRegistry::new();
        let resolver = Resolver::new(&registry);
        let text = resolver.encode(&Engine { cylinders: 2 }).unwrap();
        assert_eq!(text, r#"{"cylinders":2,"json_resolve_class":"car.Engine"}"#);
    }

    #[test]
    fn test_discriminator_overrides_same_named_field() {
        let registry = TypeRegistry::new();
        let resolver = Resolver::new(&registry);
        let mut clash = Clash::default();
        clash
            .extra
            .insert("json_resolve_class".to_string(), Node::String("forged".to_string()));
        clash.extra.insert("after".to_string(), Node::Bool(true));
        let text = resolver.encode(&clash).unwrap();
        assert_eq!(text, r#"{"json_resolve_class":"test.Clash","after":true}"#);
    }

    #[test]
    fn test_untyped_nodes_encode_unchanged() {
        let registry = TypeRegistry::new();
        let resolver = Resolver::new(&registry);
        let value = json!({"a": [1, "two", null, {"b": false}]});
        let out = resolver.to_value(Node::from(value.clone())).unwrap();
        assert_eq!(out, value);
    }

    #[test]
    fn test_custom_discriminator_and_pretty() {
        let registry = TypeRegistry::new();
        let resolver =
            Resolver::with_config(&registry, ResolverConfig::default().with_discriminator("kind"));
        let text = resolver.encode_pretty(&Engine { cylinders: 1 }).unwrap();
        assert!(text.contains('\n'));
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["kind"], "car.Engine");
        assert!(value.get("json_resolve_class").is_none());
    }

    #[test]
    fn test_depth_limit() {
        let registry = TypeRegistry::new();
        let resolver =
            Resolver::with_config(&registry, ResolverConfig::default().with_max_depth(Some(1)));
        assert!(resolver.encode(&Engine { cylinders: 1 }).is_ok());

        let car = Car {
            engine: Some(Engine::default()),
            ..Car::default()
        };
        assert!(matches!(
            resolver.encode(&car),
            Err(ResolveError::DepthExceeded { limit: 1 })
        ));
    }
}
