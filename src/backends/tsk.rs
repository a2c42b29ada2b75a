//! TSK: a file system tree inside a partition, indexed by inode rather than path, surfacing both
//! allocated and unallocated entries the way a real inode walk would.
//!
//! Grounded on `dfvfs/path/tsk_path_spec.py`'s `inode` attribute and on
//! `dfvfs/vfs/tsk_file_entry.py`'s exposure of `is_allocated` on stat.

use std::rc::Rc;

use crate::adapter::{InodeEntry, InodeTable};
use crate::error::{VfsError, VfsResult};
use crate::path_spec::{PathSpec, PathSpecAttrs, TypeIndicator};
use crate::resolver::ResolverContext;
use crate::vfs::{EntryDescriptor, FileEntryType, FileSystem, VfsStat};

const ROOT_INODE: u64 = 2;

pub struct TskFileSystem {
    root: PathSpec,
    parent_payload: Vec<u8>,
    table: InodeTable,
}

fn root_spec(spec: &PathSpec) -> VfsResult<PathSpec> {
    let parent = spec.parent().ok_or_else(|| VfsError::BadPathSpec("TSK requires a parent".into()))?;
    let attrs = PathSpecAttrs { inode: Some(ROOT_INODE), ..Default::default() };
    PathSpec::new(TypeIndicator::Tsk, Some(parent.clone()), attrs)
}

pub fn open(spec: &PathSpec, context: &ResolverContext) -> VfsResult<Rc<dyn FileSystem>> {
    let parent = spec.parent().ok_or_else(|| VfsError::BadPathSpec("TSK requires a parent".into()))?;
    let parent_payload = super::read_parent_payload(parent, context)?;
    let table = InodeTable::parse(&parent_payload)?;
    Ok(Rc::new(TskFileSystem { root: root_spec(spec)?, parent_payload, table }))
}

impl TskFileSystem {
    fn find(&self, inode: u64) -> Option<&InodeEntry> {
        self.table.entries().iter().find(|entry| entry.inode == inode)
    }

    fn requested_inode(&self, path_spec: &PathSpec) -> u64 {
        path_spec.inode().unwrap_or(ROOT_INODE)
    }

    fn child_spec(&self, entry: &InodeEntry) -> PathSpec {
        let attrs = PathSpecAttrs {
            location: Some(format!("/{}", entry.name)),
            inode: Some(entry.inode),
            ..Default::default()
        };
        PathSpec::new(TypeIndicator::Tsk, self.root.parent().cloned(), attrs).unwrap()
    }
}

impl FileSystem for TskFileSystem {
    fn type_indicator(&self) -> TypeIndicator {
        TypeIndicator::Tsk
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
        let inode = self.requested_inode(path_spec);
        if inode == ROOT_INODE {
            return Ok(Some(EntryDescriptor { is_root: true, is_virtual: false }));
        }
        Ok(self.find(inode).map(|_| EntryDescriptor { is_root: false, is_virtual: false }))
    }

    fn stat(&self, path_spec: &PathSpec) -> VfsResult<VfsStat> {
        let inode = self.requested_inode(path_spec);
        if inode == ROOT_INODE {
            return Ok(VfsStat {
                kind: Some(FileEntryType::Directory),
                is_allocated: Some(true),
                ino: Some(ROOT_INODE),
                ..Default::default()
            });
        }
        let entry = self.find(inode).ok_or(VfsError::NotFound)?;
        Ok(VfsStat {
            kind: Some(if entry.is_directory { FileEntryType::Directory } else { FileEntryType::File }),
            size: (!entry.is_directory).then_some(entry.length),
            is_allocated: Some(entry.is_allocated),
            ino: Some(entry.inode),
            ..Default::default()
        })
    }

    fn list_children(&self, path_spec: &PathSpec) -> VfsResult<Vec<PathSpec>> {
        let inode = self.requested_inode(path_spec);
        Ok(self
            .table
            .entries()
            .iter()
            .filter(|entry| entry.parent_inode == inode && entry.inode != inode)
            .map(|entry| self.child_spec(entry))
            .collect())
    }

    fn link_target(&self, _path_spec: &PathSpec) -> VfsResult<Option<String>> {
        Ok(None)
    }

    fn read_file(&self, path_spec: &PathSpec) -> VfsResult<Vec<u8>> {
        let inode = self.requested_inode(path_spec);
        let entry = self.find(inode).ok_or(VfsError::NotFound)?;
        if entry.is_directory {
            return Err(VfsError::Unsupported("a directory entry has no readable payload"));
        }
        let start = entry.offset as usize;
        let end = start + entry.length as usize;
        self.parent_payload
            .get(start..end)
            .map(<[u8]>::to_vec)
            .ok_or_else(|| VfsError::BackEndError("inode content extends past the partition".into()))
    }

    fn basename(&self, location: &str) -> String {
        location.rsplit('/').next().unwrap_or(location).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::fake::FakeFileSystem;
    use crate::resolver;
    use crate::vfs::FileEntry;

    fn fixture() -> (ResolverContext, PathSpec) {
        let file_content = b"recovered data";
        let root_entry = InodeEntry {
            inode: 2,
            parent_inode: 2,
            name: "".into(),
            is_directory: true,
            is_allocated: true,
            offset: 0,
            length: 0,
        };
        let probe_entries = vec![
            root_entry.clone(),
            InodeEntry {
                inode: 5,
                parent_inode: 2,
                name: "deleted.txt".into(),
                is_directory: false,
                is_allocated: false,
                offset: 0,
                length: file_content.len() as u64,
            },
        ];
        let data_offset = InodeTable::encode(&probe_entries).len() as u64;
        let entries = vec![
            root_entry,
            InodeEntry { offset: data_offset, ..probe_entries[1].clone() },
        ];
        let mut payload = InodeTable::encode(&entries);
        payload.extend_from_slice(file_content);

        let fake = FakeFileSystem::new();
        fake.add_file_entry("/partition.raw", FileEntryType::File, Some(payload), None).unwrap();
        let fake: Rc<dyn FileSystem> = Rc::new(fake);
        let context = ResolverContext::new();
        let parent = PathSpec::new(
            TypeIndicator::Fake,
            None,
            PathSpecAttrs::with_location("/partition.raw"),
        )
        .unwrap();
        context.cache_file_system(&parent, fake);
        let tsk_spec = PathSpec::new(TypeIndicator::Tsk, Some(parent), PathSpecAttrs::default())
            .unwrap();
        (context, tsk_spec)
    }

    #[test]
    fn root_lists_one_unallocated_child() {
        let (context, tsk_spec) = fixture();
        let entry = resolver::get_root_file_entry(&tsk_spec, &context).unwrap();
        assert_eq!(entry.number_of_sub_file_entries().unwrap(), 1);
        let child = entry.get_sub_file_entry_by_name("deleted.txt").unwrap().unwrap();
        assert!(!child.get_stat().unwrap().is_allocated.unwrap());
    }

    #[test]
    fn unallocated_inode_still_reads_its_recovered_bytes() {
        let (context, tsk_spec) = fixture();
        let fs = resolver::open_file_system(&tsk_spec, &context).unwrap();
        let attrs = PathSpecAttrs { inode: Some(5), ..Default::default() };
        let child_spec = PathSpec::new(TypeIndicator::Tsk, tsk_spec.parent().cloned(), attrs)
            .unwrap();
        let descriptor = fs.lookup_entry(&child_spec).unwrap().unwrap();
        let entry = FileEntry::new(fs, child_spec, descriptor);
        let mut object = entry.get_file_object().unwrap();
        assert_eq!(object.read(None).unwrap(), b"recovered data");
    }
}
