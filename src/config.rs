//! Resolver configuration: cache retention policy and named OS mount roots, loadable from a TOML
//! file so the CLI demos don't hard-code either.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{VfsError, VfsResult};
use crate::resolver::ResolverContext;

/// Deserialized shape of a resolver configuration file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Number of idle file-system handles the Resolver Context keeps open before closing the
    /// oldest; `0` closes a handle as soon as its last reference is released.
    pub retention_capacity: usize,
    /// Named OS directories a `MOUNT(location = <name>)` spec resolves against.
    pub mount_roots: HashMap<String, String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig { retention_capacity: 0, mount_roots: HashMap::new() }
    }
}

impl ResolverConfig {
    /// Parses a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> VfsResult<Self> {
        toml::from_str(text).map_err(|err| VfsError::BadPathSpec(format!("invalid config: {err}")))
    }

    /// Reads and parses a configuration file from disk.
    pub fn from_path(path: impl AsRef<Path>) -> VfsResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Builds a [`ResolverContext`] with this configuration's retention policy and mount roots
    /// already registered.
    pub fn build_context(&self) -> VfsResult<ResolverContext> {
        let context = ResolverContext::with_retention(self.retention_capacity);
        for (identifier, target) in &self.mount_roots {
            let os_spec = crate::path_spec::PathSpec::new(
                crate::path_spec::TypeIndicator::Os,
                None,
                crate::path_spec::PathSpecAttrs::with_location(target.clone()),
            )?;
            context.register_mount_point(identifier.clone(), os_spec);
        }
        Ok(context)
    }
}
