//! MOUNT: a named indirection to a path spec registered on the [`ResolverContext`] at runtime,
//! so a caller can address "whatever is currently mounted at /evidence" without rebuilding the
//! full chain underneath it each time.

use std::rc::Rc;

use crate::error::{VfsError, VfsResult};
use crate::path_spec::PathSpec;
use crate::resolver::ResolverContext;
use crate::vfs::FileSystem;

pub fn open(spec: &PathSpec, context: &ResolverContext) -> VfsResult<Rc<dyn FileSystem>> {
    let identifier = spec
        .location()
        .ok_or_else(|| VfsError::BadPathSpec("MOUNT requires a location identifier".into()))?;
    let target = context
        .resolve_mount_point(identifier)
        .ok_or_else(|| VfsError::NotFound)?;
    crate::resolver::open_file_system(&target, context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path_spec::{PathSpecAttrs, TypeIndicator};
    use crate::resolver;

    #[test]
    fn mount_resolves_to_the_registered_target() {
        let context = ResolverContext::new();
        let target =
            PathSpec::new(TypeIndicator::Fake, None, PathSpecAttrs::with_location("/")).unwrap();
        context.register_mount_point("evidence", target.clone());

        let mount_spec =
            PathSpec::new(TypeIndicator::Mount, None, PathSpecAttrs::with_location("evidence"))
                .unwrap();
        let file_system = resolver::open_file_system(&mount_spec, &context).unwrap();
        assert_eq!(file_system.type_indicator(), TypeIndicator::Fake);
    }

    #[test]
    fn unregistered_mount_point_is_not_found() {
        let context = ResolverContext::new();
        let mount_spec =
            PathSpec::new(TypeIndicator::Mount, None, PathSpecAttrs::with_location("nope"))
                .unwrap();
        let err = resolver::open_file_system(&mount_spec, &context);
        assert!(matches!(err, Err(VfsError::NotFound)));
    }
}
