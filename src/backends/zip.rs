//! ZIP: an archive hierarchy derived from the format's central directory via the `zip` crate.

use std::io::{Cursor, Read};
use std::rc::Rc;

use crate::backends::flat_tree::{FlatTree, FlatTreeFileSystem};
use crate::error::{VfsError, VfsResult};
use crate::path_spec::{PathSpec, PathSpecAttrs, TypeIndicator};
use crate::resolver::ResolverContext;
use crate::vfs::{FileEntryType, FileSystem};

pub fn open(spec: &PathSpec, context: &ResolverContext) -> VfsResult<Rc<dyn FileSystem>> {
    let parent =
        spec.parent().ok_or_else(|| VfsError::BadPathSpec("ZIP requires a parent".into()))?;
    let bytes = super::read_parent_payload(parent, context)?;

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|err| VfsError::BackEndError(format!("malformed zip archive: {err}")))?;
    let mut tree = FlatTree::new();

    for index in 0..archive.len() {
        let mut file = archive
            .by_index(index)
            .map_err(|err| VfsError::BackEndError(format!("malformed zip entry: {err}")))?;
        let raw_name = file.name().trim_end_matches('/').to_string();
        if raw_name.is_empty() {
            continue;
        }
        let location = format!("/{raw_name}");

        let kind = if file.is_dir() { FileEntryType::Directory } else { FileEntryType::File };
        let data = if kind == FileEntryType::File {
            let mut buf = Vec::new();
            file.read_to_end(&mut buf)
                .map_err(|err| VfsError::BackEndError(format!("unreadable zip member: {err}")))?;
            Some(buf)
        } else {
            None
        };

        tree.ensure_ancestors(&location);
        tree.insert_if_absent(location, kind, data, None);
    }

    let root = PathSpec::new(TypeIndicator::Zip, Some(parent.clone()), PathSpecAttrs::default())?;
    Ok(Rc::new(FlatTreeFileSystem::new(TypeIndicator::Zip, root, tree)))
}
