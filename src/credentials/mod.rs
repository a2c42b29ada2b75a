//! Credentials Manager: a static registry of which credential identifiers each path-spec
//! variant accepts. Consulted by [`super::credentials::KeyChain::set_credential`].

mod keychain;

use crate::path_spec::TypeIndicator;

pub use keychain::KeyChain;

/// Returns the set of credential identifiers accepted by `type_indicator`, or an empty slice
/// if the variant accepts none (SPEC_FULL.md §4.2, §6).
pub fn accepted_credentials(type_indicator: TypeIndicator) -> &'static [&'static str] {
    match type_indicator {
        TypeIndicator::Bde => &["password", "recovery_password", "startup_key"],
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bde_accepts_three_credentials() {
        assert_eq!(
            accepted_credentials(TypeIndicator::Bde),
            &["password", "recovery_password", "startup_key"]
        );
    }

    #[test]
    fn unrelated_variant_accepts_none() {
        assert!(accepted_credentials(TypeIndicator::Os).is_empty());
    }
}
