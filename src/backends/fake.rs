//! FAKE: an in-memory back end for building fixtures without touching the real filesystem.
//!
//! Grounded on `dfvfs/vfs/fake_file_system.py`: entries are added explicitly by full path (there
//! is no implicit directory creation), `AddFileEntry` rejects a duplicate path or a payload that
//! does not match the declared entry type, and `/` always exists as the root directory.

use std::cell::RefCell;

use crate::backends::flat_tree::{FlatTree, LOCATION_ROOT};
use crate::error::{VfsError, VfsResult};
use crate::path_spec::{PathSpec, PathSpecAttrs, TypeIndicator};
use crate::vfs::{EntryDescriptor, FileEntryType, FileSystem, VfsStat};

pub struct FakeFileSystem {
    tree: RefCell<FlatTree>,
}

impl Default for FakeFileSystem {
    fn default() -> Self {
        FakeFileSystem { tree: RefCell::new(FlatTree::new()) }
    }
}

impl FakeFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry at `location`. Fails if the path is already present, or if `data`/
    /// `link_target` is supplied for a kind that cannot carry it (only `File` takes `data`, only
    /// `Link` takes `link_target`).
    pub fn add_file_entry(
        &self,
        location: &str,
        kind: FileEntryType,
        data: Option<Vec<u8>>,
        link_target: Option<String>,
    ) -> VfsResult<()> {
        self.tree.borrow_mut().insert(location, kind, data, link_target)
    }

    pub fn path_spec_for(&self, location: impl Into<String>) -> PathSpec {
        PathSpec::new(TypeIndicator::Fake, None, PathSpecAttrs::with_location(location)).unwrap()
    }
}

impl FileSystem for FakeFileSystem {
    fn type_indicator(&self) -> TypeIndicator {
        TypeIndicator::Fake
    }

    fn open(&self, _path_spec: &PathSpec) -> VfsResult<()> {
        Ok(())
    }

    fn close(&self) -> VfsResult<()> {
        Ok(())
    }

    fn root_path_spec(&self) -> PathSpec {
        self.path_spec_for(LOCATION_ROOT)
    }

    fn file_entry_exists(&self, path_spec: &PathSpec) -> bool {
        let Some(location) = path_spec.location() else { return false };
        self.tree.borrow().contains(location)
    }

    fn lookup_entry(&self, path_spec: &PathSpec) -> VfsResult<Option<EntryDescriptor>> {
        let Some(location) = path_spec.location() else { return Ok(None) };
        if !self.tree.borrow().contains(location) {
            return Ok(None);
        }
        Ok(Some(EntryDescriptor { is_root: location == LOCATION_ROOT, is_virtual: false }))
    }

    fn stat(&self, path_spec: &PathSpec) -> VfsResult<VfsStat> {
        let location = path_spec.location().ok_or(VfsError::NotFound)?;
        let tree = self.tree.borrow();
        let node = tree.get(location).ok_or(VfsError::NotFound)?;
        Ok(VfsStat {
            kind: Some(node.kind),
            size: (node.kind == FileEntryType::File).then(|| node.data.len() as u64),
            is_allocated: Some(true),
            ..Default::default()
        })
    }

    fn list_children(&self, path_spec: &PathSpec) -> VfsResult<Vec<PathSpec>> {
        let location = path_spec.location().ok_or(VfsError::NotFound)?;
        let children = self.tree.borrow().direct_children_of(location);
        Ok(children.iter().map(|path| self.path_spec_for(path.clone())).collect())
    }

    fn link_target(&self, path_spec: &PathSpec) -> VfsResult<Option<String>> {
        let location = path_spec.location().ok_or(VfsError::NotFound)?;
        let tree = self.tree.borrow();
        let node = tree.get(location).ok_or(VfsError::NotFound)?;
        Ok(node.link_target.clone())
    }

    fn read_file(&self, path_spec: &PathSpec) -> VfsResult<Vec<u8>> {
        let location = path_spec.location().ok_or(VfsError::NotFound)?;
        let tree = self.tree.borrow();
        let node = tree.get(location).ok_or(VfsError::NotFound)?;
        if node.kind != FileEntryType::File {
            return Err(VfsError::Unsupported("only a File entry has readable payload"));
        }
        Ok(node.data.clone())
    }

    fn basename(&self, location: &str) -> String {
        FlatTree::basename(location)
    }
}
