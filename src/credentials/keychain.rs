//! Key Chain: per-session credential storage keyed on a path spec's [`comparable`] identity
//! rather than object identity, because two independently constructed but semantically equal
//! specs must see the same credentials (SPEC_FULL.md §9).
//!
//! [`comparable`]: crate::path_spec::PathSpec::comparable

use std::collections::HashMap;

use crate::error::{VfsError, VfsResult};
use crate::path_spec::PathSpec;

use super::accepted_credentials;

/// Maps `(path_spec.comparable, credential_id) -> credential_bytes`.
#[derive(Debug, Default)]
pub struct KeyChain {
    credentials_per_path_spec: HashMap<String, HashMap<String, Vec<u8>>>,
}

impl KeyChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a credential, rejecting identifiers the variant's Credentials Manager entry does
    /// not declare.
    pub fn set_credential(
        &mut self,
        path_spec: &PathSpec,
        identifier: &str,
        data: impl Into<Vec<u8>>,
    ) -> VfsResult<()> {
        let supported = accepted_credentials(path_spec.type_indicator());
        if !supported.contains(&identifier) {
            return Err(VfsError::NoSuchCredential(identifier.to_string()));
        }

        self.credentials_per_path_spec
            .entry(path_spec.comparable())
            .or_default()
            .insert(identifier.to_string(), data.into());
        Ok(())
    }

    /// Retrieves a previously stored credential, or `None` if absent.
    pub fn get_credential(&self, path_spec: &PathSpec, identifier: &str) -> Option<&[u8]> {
        self.credentials_per_path_spec
            .get(&path_spec.comparable())
            .and_then(|creds| creds.get(identifier))
            .map(Vec::as_slice)
    }
}
