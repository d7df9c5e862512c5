use crate::config::ResolverConfig;
use crate::error::ResolveError;
use crate::registry::TypeRegistry;

/// Entry point for both pipelines.
///
/// A resolver borrows the caller's [`TypeRegistry`] and carries its own
/// [`ResolverConfig`]. It holds no per-call state, so one instance can be
/// shared freely between threads.
///
/// The decode half lives in `decode.rs`, the encode half in `encode.rs`.
#[derive(Debug, Clone)]
pub struct Resolver<'r> {
    pub(crate) registry: &'r TypeRegistry,
    pub(crate) config: ResolverConfig,
}

impl<'r> Resolver<'r> {
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self::with_config(registry, ResolverConfig::default())
    }

    pub fn with_config(registry: &'r TypeRegistry, config: ResolverConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &'r TypeRegistry {
        self.registry
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub(crate) fn discriminator(&self) -> &str {
        &self.config.discriminator
    }

    /// Fails once `depth` containers have been entered and the limit is reached.
    pub(crate) fn check_depth(&self, depth: usize) -> Result<(), ResolveError> {
        match self.config.max_depth {
            Some(limit) if depth >= limit => Err(ResolveError::DepthExceeded { limit }),
            _ => Ok(()),
        }
    }
}
