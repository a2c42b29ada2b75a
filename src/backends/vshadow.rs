//! VSHADOW: Volume Shadow Copy stores found on an NTFS volume. The root is a virtual directory
//! whose children are `/vss1…/vssN`, each a FILE whose size is the store's volume size and
//! whose `crtime` is the store's creation time.
//!
//! Grounded on `dfvfs/vfs/vshadow_file_entry.py`'s root-enumeration and virtual/non-virtual
//! stat logic.

use std::rc::Rc;

use crate::adapter::ContainerTable;
use crate::error::{VfsError, VfsResult};
use crate::helpers::shadow_store_selector::select_store_index;
use crate::path_spec::{PathSpec, PathSpecAttrs, TypeIndicator};
use crate::resolver::ResolverContext;
use crate::vfs::{EntryDescriptor, FileEntryType, FileSystem, VfsStat};

pub struct VshadowFileSystem {
    root: PathSpec,
    parent_payload: Vec<u8>,
    table: ContainerTable,
}

pub fn open(spec: &PathSpec, context: &ResolverContext) -> VfsResult<Rc<dyn FileSystem>> {
    let parent =
        spec.parent().ok_or_else(|| VfsError::BadPathSpec("VSHADOW requires a parent".into()))?;
    let parent_payload = super::read_parent_payload(parent, context)?;
    let table = ContainerTable::parse(&parent_payload)?;
    let root = PathSpec::new(TypeIndicator::Vshadow, Some(parent.clone()), PathSpecAttrs::default())?;
    Ok(Rc::new(VshadowFileSystem { root, parent_payload, table }))
}

impl VshadowFileSystem {
    fn child_spec(&self, index: usize) -> PathSpec {
        let attrs = PathSpecAttrs {
            location: Some(format!("/vss{}", index + 1)),
            store_index: Some(index as u64),
            ..Default::default()
        };
        PathSpec::new(TypeIndicator::Vshadow, self.root.parent().cloned(), attrs).unwrap()
    }
}

impl FileSystem for VshadowFileSystem {
    fn type_indicator(&self) -> TypeIndicator {
        TypeIndicator::Vshadow
    }

    fn open(&self, _path_spec: &PathSpec) -> VfsResult<()> {
        Ok(())
    }

    fn close(&self) -> VfsResult<()> {
        Ok(())
    }

    fn root_path_spec(&self) -> PathSpec {
        self.root.clone()
    }

    fn file_entry_exists(&self, path_spec: &PathSpec) -> bool {
        self.lookup_entry(path_spec).ok().flatten().is_some()
    }

    fn lookup_entry(&self, path_spec: &PathSpec) -> VfsResult<Option<EntryDescriptor>> {
        match select_store_index(path_spec)? {
            None => Ok(Some(EntryDescriptor { is_root: true, is_virtual: true })),
            Some(index) if index < self.table.entries().len() => {
                Ok(Some(EntryDescriptor { is_root: false, is_virtual: false }))
            }
            Some(_) => Ok(None),
        }
    }

    fn stat(&self, path_spec: &PathSpec) -> VfsResult<VfsStat> {
        match select_store_index(path_spec)? {
            None => Ok(VfsStat { kind: Some(FileEntryType::Directory), ..Default::default() }),
            Some(index) => {
                let entry = self.table.entries().get(index).ok_or(VfsError::NotFound)?;
                Ok(VfsStat {
                    kind: Some(FileEntryType::File),
                    size: Some(entry.length),
                    crtime: entry.creation_time,
                    is_allocated: Some(true),
                    ..Default::default()
                })
            }
        }
    }

    fn list_children(&self, path_spec: &PathSpec) -> VfsResult<Vec<PathSpec>> {
        if select_store_index(path_spec)?.is_some() {
            return Ok(Vec::new());
        }
        Ok((0..self.table.entries().len()).map(|index| self.child_spec(index)).collect())
    }

    fn link_target(&self, _path_spec: &PathSpec) -> VfsResult<Option<String>> {
        Ok(None)
    }

    fn read_file(&self, path_spec: &PathSpec) -> VfsResult<Vec<u8>> {
        let index = select_store_index(path_spec)?
            .ok_or_else(|| VfsError::Unsupported("the shadow store root has no payload"))?;
        let entry = self.table.entries().get(index).ok_or(VfsError::NotFound)?;
        let start = entry.offset as usize;
        let end = start + entry.length as usize;
        self.parent_payload
            .get(start..end)
            .map(<[u8]>::to_vec)
            .ok_or_else(|| VfsError::BackEndError("shadow store extends past parent image".into()))
    }

    fn basename(&self, location: &str) -> String {
        location.rsplit('/').next().unwrap_or(location).to_string()
    }
}
