//! TAR: an archive hierarchy derived from sequential tar records via the `tar` crate.

use std::io::{Cursor, Read};
use std::rc::Rc;

use crate::backends::flat_tree::{FlatTree, FlatTreeFileSystem};
use crate::error::{VfsError, VfsResult};
use crate::path_spec::{PathSpec, PathSpecAttrs, TypeIndicator};
use crate::resolver::ResolverContext;
use crate::vfs::{FileEntryType, FileSystem};

pub fn open(spec: &PathSpec, context: &ResolverContext) -> VfsResult<Rc<dyn FileSystem>> {
    let parent =
        spec.parent().ok_or_else(|| VfsError::BadPathSpec("TAR requires a parent".into()))?;
    let bytes = super::read_parent_payload(parent, context)?;

    let mut archive = tar::Archive::new(Cursor::new(bytes));
    let mut tree = FlatTree::new();
    let entries = archive
        .entries()
        .map_err(|err| VfsError::BackEndError(format!("malformed tar archive: {err}")))?;

    for entry in entries {
        let mut entry =
            entry.map_err(|err| VfsError::BackEndError(format!("malformed tar entry: {err}")))?;
        let raw_path = entry
            .path()
            .map_err(|err| VfsError::BackEndError(format!("malformed tar member path: {err}")))?
            .to_string_lossy()
            .trim_end_matches('/')
            .to_string();
        if raw_path.is_empty() {
            continue;
        }
        let location = format!("/{raw_path}");

        let kind = match entry.header().entry_type() {
            tar::EntryType::Directory => FileEntryType::Directory,
            tar::EntryType::Symlink => FileEntryType::Link,
            _ => FileEntryType::File,
        };
        let link_target = if kind == FileEntryType::Link {
            entry
                .link_name()
                .ok()
                .flatten()
                .map(|target| format!("/{}", target.to_string_lossy()))
        } else {
            None
        };
        let data = if kind == FileEntryType::File {
            let mut buf = Vec::new();
            entry
                .read_to_end(&mut buf)
                .map_err(|err| VfsError::BackEndError(format!("unreadable tar member: {err}")))?;
            Some(buf)
        } else {
            None
        };

        tree.ensure_ancestors(&location);
        tree.insert_if_absent(location, kind, data, link_target);
    }

    let root = PathSpec::new(TypeIndicator::Tar, Some(parent.clone()), PathSpecAttrs::default())?;
    Ok(Rc::new(FlatTreeFileSystem::new(TypeIndicator::Tar, root, tree)))
}
