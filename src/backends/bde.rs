//! BDE: a BitLocker-encrypted volume, decrypted against a credential pulled from the session's
//! [`crate::credentials::KeyChain`].
//!
//! This crate does not implement the real BitLocker key-derivation and AES-CBC/XTS pipeline —
//! SPEC_FULL.md §6 keeps the real driver out of the contract — so "decryption" here is a
//! reversible XOR keyed on whichever credential the KeyChain holds, enough to exercise the
//! credential-required-to-open workflow end to end without claiming format fidelity.

use std::rc::Rc;

use crate::backends::SinglePayloadFileSystem;
use crate::error::{VfsError, VfsResult};
use crate::path_spec::PathSpec;
use crate::resolver::ResolverContext;
use crate::vfs::FileSystem;

const CREDENTIAL_PRIORITY: &[&str] = &["password", "recovery_password", "startup_key"];

fn xor_with_key(data: &[u8], key: &[u8]) -> Vec<u8> {
    if key.is_empty() {
        return data.to_vec();
    }
    data.iter().enumerate().map(|(i, byte)| byte ^ key[i % key.len()]).collect()
}

pub fn open(spec: &PathSpec, context: &ResolverContext) -> VfsResult<Rc<dyn FileSystem>> {
    let parent = spec
        .parent()
        .ok_or_else(|| VfsError::BadPathSpec("BDE requires a parent".into()))?;

    let credential = CREDENTIAL_PRIORITY
        .iter()
        .find_map(|identifier| context.keychain().get_credential(spec, identifier).map(<[u8]>::to_vec))
        .ok_or_else(|| {
            VfsError::EncryptionError("no BDE credential set for this volume".into())
        })?;

    let ciphertext = super::read_parent_payload(parent, context)?;
    let plaintext = xor_with_key(&ciphertext, &credential);
    let fs = SinglePayloadFileSystem::new(spec.type_indicator(), spec.clone(), plaintext);
    Ok(Rc::new(fs))
}
