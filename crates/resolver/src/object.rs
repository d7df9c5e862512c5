//! Typed objects and their field descriptors.
//!
//! A type takes part in both pipelines by implementing [`Resolvable`]: it
//! names itself, lists its own fields, and accepts field assignments by name.
//! Most types get all of that from the [`resolvable!`](crate::resolvable)
//! macro:
//!
//! ```
//! use json_resolver::{resolvable, Fields};
//!
//! #[derive(Debug, Clone, Default)]
//! struct Address {
//!     street: String,
//!     zip: Option<String>,
//! }
//! resolvable!(Address as "app.Address" { street, zip });
//!
//! #[derive(Debug, Clone, Default)]
//! struct Person {
//!     name: String,
//!     home: Option<Address>,
//!     extra: Fields,
//! }
//! resolvable!(Person as "app.Person" { name, home } extra extra);
//! ```

use std::any::Any;
use std::fmt;

use indexmap::IndexMap;

use crate::error::ResolveError;
use crate::node::Node;

/// A shallow field map, in declaration order.
pub type Fields = IndexMap<String, Node>;

/// A typed object that can be decoded from and encoded to tagged JSON.
pub trait Resolvable: Any + fmt::Debug + Send + Sync {
    /// Identifier written to the discriminator field and looked up in the
    /// [`TypeRegistry`](crate::TypeRegistry) on decode.
    fn type_name(&self) -> &str;

    /// The object's own fields. Nested typed objects are returned as
    /// [`Node::Object`]; the encoder expands them. Fails when a field value
    /// has no JSON form.
    fn fields(&self) -> Result<Fields, ResolveError>;

    /// Assign a declared field. If the type has no field called `name` the
    /// value is handed back untouched.
    fn set_field(&mut self, name: &str, value: Node) -> Result<Option<Node>, ResolveError>;

    /// Sink for keys the type does not declare. Types without one leave
    /// those keys to the resolver's [`UnknownFieldPolicy`](crate::UnknownFieldPolicy).
    fn extra_fields_mut(&mut self) -> Option<&mut Fields> {
        None
    }

    fn clone_box(&self) -> Box<dyn Resolvable>;

    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl Clone for Box<dyn Resolvable> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Implement [`Resolvable`], [`FromNode`](crate::FromNode) and
/// [`ToNode`](crate::ToNode) for a struct.
///
/// The struct must be `Clone + Default + Debug`, and every listed field must
/// implement both conversion traits. An optional `extra <field>` names a
/// [`Fields`] member that collects undeclared keys on decode and is written
/// back after the declared fields on encode.
#[macro_export]
macro_rules! resolvable {
    ($ty:ty as $name:literal { $($field:ident),* $(,)? } $(extra $extra:ident)?) => {
        impl $crate::Resolvable for $ty {
            fn type_name(&self) -> &str {
                $name
            }

            fn fields(&self) -> ::std::result::Result<$crate::Fields, $crate::ResolveError> {
                #[allow(unused_mut)]
                let mut fields = $crate::Fields::new();
                $(
                    fields.insert(
                        stringify!($field).to_string(),
                        $crate::ToNode::to_node(&self.$field)
                            .map_err(|err| err.in_field($name, stringify!($field)))?,
                    );
                )*
                $(
                    for (key, value) in &self.$extra {
                        if !fields.contains_key(key) {
                            fields.insert(key.clone(), value.clone());
                        }
                    }
                )?
                Ok(fields)
            }

            fn set_field(
                &mut self,
                name: &str,
                value: $crate::Node,
            ) -> ::std::result::Result<::std::option::Option<$crate::Node>, $crate::ResolveError> {
                match name {
                    $(
                        stringify!($field) => {
                            self.$field = $crate::FromNode::from_node(value)?;
                            Ok(None)
                        }
                    )*
                    _ => Ok(Some(value)),
                }
            }

            $(
                fn extra_fields_mut(&mut self) -> ::std::option::Option<&mut $crate::Fields> {
                    Some(&mut self.$extra)
                }
            )?

            fn clone_box(&self) -> ::std::boxed::Box<dyn $crate::Resolvable> {
                ::std::boxed::Box::new(::std::clone::Clone::clone(self))
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn into_any(self: ::std::boxed::Box<Self>) -> ::std::boxed::Box<dyn ::std::any::Any> {
                self
            }
        }

        impl $crate::FromNode for $ty {
            fn from_node(node: $crate::Node) -> ::std::result::Result<Self, $crate::ResolveError> {
                node.into_typed::<$ty>()
            }
        }

        impl $crate::ToNode for $ty {
            fn to_node(&self) -> ::std::result::Result<$crate::Node, $crate::ResolveError> {
                Ok($crate::Node::Object(::std::boxed::Box::new(::std::clone::Clone::clone(self))))
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Point {
        x: i64,
        y: i64,
        label: Option<String>,
    }
    crate::resolvable!(Point as "geo.Point" { x, y, label });

    #[derive(Debug, Clone, Default)]
    struct Open {
        id: u32,
        rest: Fields,
    }
    crate::resolvable!(Open as "test.Open" { id } extra rest);

    #[test]
    fn test_fields_in_declaration_order() {
        let p = Point {
            x: 1,
            y: -2,
            label: None,
        };
        let fields = p.fields().unwrap();
        let keys: Vec<_> = fields.keys().cloned().collect();
        assert_eq!(keys, vec!["x", "y", "label"]);
        assert!(fields["label"].is_null());
    }

    #[test]
    fn test_set_field_reports_unknown_names() {
        let mut p = Point::default();
        assert!(p.set_field("x", Node::Number(7.into())).unwrap().is_none());
        let rejected = p.set_field("z", Node::Number(8.into())).unwrap();
        assert_eq!(rejected, Some(Node::Number(8.into())));
        assert_eq!(p.x, 7);
    }

    #[test]
    fn test_set_field_type_mismatch() {
        let mut p = Point::default();
        let err = p.set_field("y", Node::String("up".to_string())).unwrap_err();
        assert!(matches!(err, ResolveError::TypeMismatch { .. }));
    }

    #[test]
    fn test_extra_fields_follow_declared_fields() {
        let mut open = Open::default();
        open.rest.insert("note".to_string(), Node::Bool(true));
        open.rest.insert("id".to_string(), Node::Null);
        let fields = open.fields().unwrap();
        let keys: Vec<_> = fields.keys().cloned().collect();
        assert_eq!(keys, vec!["id", "note"]);
        assert_eq!(fields["id"], Node::Number(0.into()));
        assert!(open.extra_fields_mut().is_some());
        assert!(Point::default().extra_fields_mut().is_none());
    }

    #[derive(Debug, Clone, Default)]
    struct Reading {
        value: f64,
    }
    crate::resolvable!(Reading as "test.Reading" { value });

    #[test]
    fn test_fields_fail_on_non_finite_float() {
        let err = Reading { value: f64::NAN }.fields().unwrap_err();
        assert_eq!(
            err.to_string(),
            "test.Reading.value: cannot encode non-finite number NaN"
        );
        assert!(Reading { value: 1.5 }.fields().is_ok());
    }

    #[test]
    fn test_clone_box_and_downcast() {
        let p = Point {
            x: 3,
            y: 4,
            label: Some("corner".to_string()),
        };
        let boxed: Box<dyn Resolvable> = Box::new(p.clone());
        let copy = boxed.clone();
        assert_eq!(copy.type_name(), "geo.Point");
        assert_eq!(copy.as_any().downcast_ref::<Point>(), Some(&p));
    }
}
