//! Resolver configuration.
//!
//! [`ResolverConfig`] is plain data and derives serde so an embedding
//! application can keep it alongside its own settings, e.g.
//!
//! ```
//! use json_resolver::{ResolverConfig, UnknownFieldPolicy};
//!
//! let config: ResolverConfig =
//!     serde_json::from_str(r#"{"discriminator": "@type", "unknown_fields": "reject"}"#).unwrap();
//! assert_eq!(config.discriminator, "@type");
//! assert_eq!(config.unknown_fields, UnknownFieldPolicy::Reject);
//! assert_eq!(config.max_depth, Some(64));
//! ```

use serde::{Deserialize, Serialize};

/// Field name that carries the type identifier unless configured otherwise.
pub const DEFAULT_DISCRIMINATOR: &str = "json_resolve_class";

/// Nesting limit applied by [`ResolverConfig::default`].
///
/// Must stay below `serde_json`'s parser recursion limit (128) so the
/// decoder can parse anything the encoder produces.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// What to do with a source key the destination type does not declare.
///
/// Types that expose an overflow sink through
/// [`Resolvable::extra_fields_mut`](crate::Resolvable::extra_fields_mut)
/// always receive such keys; the policy only applies to types without one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownFieldPolicy {
    /// Drop the key and carry on.
    #[default]
    Ignore,
    /// Fail with [`ResolveError::FieldMismatch`](crate::ResolveError::FieldMismatch).
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Reserved key holding the type identifier. Must match between the
    /// producer and the consumer of a payload.
    pub discriminator: String,
    pub unknown_fields: UnknownFieldPolicy,
    /// Maximum nesting of arrays, maps and objects. `None` disables the guard.
    pub max_depth: Option<usize>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            discriminator: DEFAULT_DISCRIMINATOR.to_string(),
            unknown_fields: UnknownFieldPolicy::default(),
            max_depth: Some(DEFAULT_MAX_DEPTH),
        }
    }
}

impl ResolverConfig {
    pub fn with_discriminator(mut self, name: impl Into<String>) -> Self {
        self.discriminator = name.into();
        self
    }

    pub fn with_unknown_fields(mut self, policy: UnknownFieldPolicy) -> Self {
        self.unknown_fields = policy;
        self
    }

    pub fn with_max_depth(mut self, limit: Option<usize>) -> Self {
        self.max_depth = limit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ResolverConfig::default();
        assert_eq!(config.discriminator, "json_resolve_class");
        assert_eq!(config.unknown_fields, UnknownFieldPolicy::Ignore);
        assert_eq!(config.max_depth, Some(DEFAULT_MAX_DEPTH));
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: ResolverConfig = serde_json::from_str(r#"{"max_depth": null}"#).unwrap();
        assert_eq!(config.discriminator, DEFAULT_DISCRIMINATOR);
        assert_eq!(config.max_depth, None);
    }

    #[test]
    fn test_builder_setters() {
        let config = ResolverConfig::default()
            .with_discriminator("kind")
            .with_unknown_fields(UnknownFieldPolicy::Reject)
            .with_max_depth(Some(4));
        assert_eq!(config.discriminator, "kind");
        assert_eq!(config.unknown_fields, UnknownFieldPolicy::Reject);
        assert_eq!(config.max_depth, Some(4));
    }
}
