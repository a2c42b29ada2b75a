//! Dispatches a [`PathSpec`] to the back end registered for its
//! [`TypeIndicator`](crate::path_spec::TypeIndicator), consulting and populating a
//! [`ResolverContext`] cache along the way.

pub mod context;

use std::rc::Rc;

use crate::error::{VfsError, VfsResult};
use crate::path_spec::{PathSpec, TypeIndicator};
use crate::vfs::{FileEntry, FileSystem};

pub use context::ResolverContext;

/// Opens the back end for `spec`, reusing a cached handle from `context` when one already exists
/// for this spec's `comparable` identity. Parents are opened before children: each opener that
/// needs its parent's data calls back into [`open_file_system`] itself.
pub fn open_file_system(spec: &PathSpec, context: &ResolverContext) -> VfsResult<Rc<dyn FileSystem>> {
    if let Some(cached) = context.get_file_system(spec) {
        tracing::debug!(type_indicator = ?spec.type_indicator(), "reusing cached file system");
        return Ok(cached);
    }

    tracing::debug!(type_indicator = ?spec.type_indicator(), "opening file system");
    let file_system = match dispatch(spec, context) {
        Ok(file_system) => file_system,
        Err(err) => {
            tracing::warn!(type_indicator = ?spec.type_indicator(), %err, "opener failed");
            return Err(err);
        }
    };
    file_system.open(spec)?;
    context.cache_file_system(spec, file_system.clone());
    Ok(file_system)
}

/// Convenience wrapper: opens the back end for `spec` and wraps its root descriptor in a
/// [`FileEntry`].
pub fn get_root_file_entry(spec: &PathSpec, context: &ResolverContext) -> VfsResult<FileEntry> {
    let file_system = open_file_system(spec, context)?;
    let descriptor = file_system.lookup_entry(spec)?.ok_or(VfsError::NotFound)?;
    Ok(FileEntry::new(file_system, spec.clone(), descriptor))
}

/// Releases the reference this caller's [`open_file_system`] call took out.
pub fn close_file_system(spec: &PathSpec, context: &ResolverContext) -> VfsResult<()> {
    context.release_file_system(spec)
}

fn dispatch(spec: &PathSpec, context: &ResolverContext) -> VfsResult<Rc<dyn FileSystem>> {
    match spec.type_indicator() {
        TypeIndicator::Os => Ok(Rc::new(crate::backends::os::OsFileSystem::new())),
        TypeIndicator::Fake => Ok(Rc::new(crate::backends::fake::FakeFileSystem::new())),
        TypeIndicator::Mount => crate::backends::mount::open(spec, context),
        TypeIndicator::Raw
        | TypeIndicator::Qcow
        | TypeIndicator::Vhdi
        | TypeIndicator::Vmdk
        | TypeIndicator::Ewf => crate::backends::image::open(spec, context),
        TypeIndicator::Bde => crate::backends::bde::open(spec, context),
        TypeIndicator::TskPartition => crate::backends::tsk_partition::open(spec, context),
        TypeIndicator::Tsk => crate::backends::tsk::open(spec, context),
        TypeIndicator::Vshadow => crate::backends::vshadow::open(spec, context),
        TypeIndicator::Gzip => crate::backends::gzip::open(spec, context),
        TypeIndicator::Tar => crate::backends::tar::open(spec, context),
        TypeIndicator::Zip => crate::backends::zip::open(spec, context),
        TypeIndicator::Cpio => crate::backends::cpio::open(spec, context),
        TypeIndicator::CompressedStream => crate::backends::compressed_stream::open(spec, context),
        TypeIndicator::EncodedStream => crate::backends::encoded_stream::open(spec, context),
        TypeIndicator::DataRange => crate::backends::data_range::open(spec, context),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path_spec::PathSpecAttrs;

    #[test]
    fn opening_the_same_spec_twice_shares_one_handle() {
        let context = ResolverContext::new();
        let spec =
            PathSpec::new(TypeIndicator::Fake, None, PathSpecAttrs::with_location("/")).unwrap();

        open_file_system(&spec, &context).unwrap();
        open_file_system(&spec, &context).unwrap();
        assert_eq!(context.len(), 1);

        close_file_system(&spec, &context).unwrap();
        assert_eq!(context.len(), 1);
        close_file_system(&spec, &context).unwrap();
        assert_eq!(context.len(), 0);
    }

    #[test]
    fn root_entry_for_fake_fs_is_the_root_descriptor() {
        let context = ResolverContext::new();
        let spec =
            PathSpec::new(TypeIndicator::Fake, None, PathSpecAttrs::with_location("/")).unwrap();
        let entry = get_root_file_entry(&spec, &context).unwrap();
        assert!(entry.is_root());
    }
}
