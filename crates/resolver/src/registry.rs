use std::collections::HashMap;

use crate::error::ResolveError;
use crate::object::Resolvable;

/// Builds a default instance of a registered type.
pub type Factory = fn() -> Box<dyn Resolvable>;

/// Lookup from type identifier to factory.
///
/// The registry is owned by the embedding application: populate it once at
/// startup, then hand `&TypeRegistry` to every [`Resolver`](crate::Resolver).
/// Decoding never mutates it, so one registry can serve any number of threads.
#[derive(Debug, Default, Clone)]
pub struct TypeRegistry {
    factories: HashMap<String, Factory>,
}

fn default_instance<T: Resolvable + Default>() -> Box<dyn Resolvable> {
    Box::new(T::default())
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `T` under the identifier its default instance reports from
    /// [`Resolvable::type_name`].
    pub fn register<T: Resolvable + Default>(&mut self) -> Result<&mut Self, ResolveError> {
        let name = T::default().type_name().to_string();
        self.register_as(name, default_instance::<T>)
    }

    /// Register a factory under an explicit identifier, e.g. an alias kept
    /// for payloads written under an older type name.
    pub fn register_as(
        &mut self,
        name: impl Into<String>,
        factory: Factory,
    ) -> Result<&mut Self, ResolveError> {
        let name = name.into();
        if self.factories.contains_key(&name) {
            return Err(ResolveError::DuplicateType(name));
        }
        log::trace!("registered type '{}'", name);
        self.factories.insert(name, factory);
        Ok(self)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Registered identifiers, sorted.
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Build a fresh default instance of the named type.
    pub fn instantiate(&self, name: &str) -> Result<Box<dyn Resolvable>, ResolveError> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| ResolveError::UnknownType(name.to_string()))
    }
}
