//! TSK_PARTITION: the partition table found on a raw disk image. Its root is a virtual directory
//! listing `/p1…/pN`; each child is a FILE whose content is the partition's raw bytes.
//!
//! Grounded on `dfvfs/path/tsk_partition_path_spec.py`'s constraint that a TSK_PARTITION spec
//! always needs a parent, and on its `comparable` field ordering (location, then part index,
//! then start offset).

use std::rc::Rc;

use crate::adapter::ContainerTable;
use crate::error::{VfsError, VfsResult};
use crate::helpers::partition_selector::select_partition_index;
use crate::path_spec::{PathSpec, PathSpecAttrs, TypeIndicator};
use crate::resolver::ResolverContext;
use crate::vfs::{EntryDescriptor, FileEntryType, FileSystem, VfsStat};

pub struct TskPartitionFileSystem {
    root: PathSpec,
    parent_payload: Vec<u8>,
    table: ContainerTable,
}

fn root_spec(spec: &PathSpec) -> VfsResult<PathSpec> {
    let parent = spec
        .parent()
        .ok_or_else(|| VfsError::BadPathSpec("TSK_PARTITION requires a parent".into()))?;
    PathSpec::new(TypeIndicator::TskPartition, Some(parent.clone()), PathSpecAttrs::default())
}

pub fn open(spec: &PathSpec, context: &ResolverContext) -> VfsResult<Rc<dyn FileSystem>> {
    let parent = spec
        .parent()
        .ok_or_else(|| VfsError::BadPathSpec("TSK_PARTITION requires a parent".into()))?;
    let parent_payload = super::read_parent_payload(parent, context)?;
    let table = ContainerTable::parse(&parent_payload)?;
    Ok(Rc::new(TskPartitionFileSystem { root: root_spec(spec)?, parent_payload, table }))
}

impl TskPartitionFileSystem {
    fn child_spec(&self, index: usize) -> PathSpec {
        let attrs = PathSpecAttrs {
            location: Some(format!("/p{}", index + 1)),
            part_index: Some(index as u64),
            start_offset: Some(self.table.entries()[index].offset),
            ..Default::default()
        };
        PathSpec::new(TypeIndicator::TskPartition, self.root.parent().cloned(), attrs).unwrap()
    }
}

impl FileSystem for TskPartitionFileSystem {
    fn type_indicator(&self) -> TypeIndicator {
        TypeIndicator::TskPartition
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
        match select_partition_index(path_spec, self.table.entries())? {
            None => Ok(Some(EntryDescriptor { is_root: true, is_virtual: true })),
            Some(index) if index < self.table.entries().len() => {
                Ok(Some(EntryDescriptor { is_root: false, is_virtual: false }))
            }
            Some(_) => Ok(None),
        }
    }

    fn stat(&self, path_spec: &PathSpec) -> VfsResult<VfsStat> {
        match select_partition_index(path_spec, self.table.entries())? {
            None => Ok(VfsStat { kind: Some(FileEntryType::Directory), ..Default::default() }),
            Some(index) => {
                let entry =
                    self.table.entries().get(index).ok_or(VfsError::NotFound)?;
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
        if select_partition_index(path_spec, self.table.entries())?.is_some() {
            return Ok(Vec::new());
        }
        Ok((0..self.table.entries().len()).map(|index| self.child_spec(index)).collect())
    }

    fn link_target(&self, _path_spec: &PathSpec) -> VfsResult<Option<String>> {
        Ok(None)
    }

    fn read_file(&self, path_spec: &PathSpec) -> VfsResult<Vec<u8>> {
        let index = select_partition_index(path_spec, self.table.entries())?
            .ok_or_else(|| VfsError::Unsupported("the partition table root has no payload"))?;
        let entry = self.table.entries().get(index).ok_or(VfsError::NotFound)?;
        let start = entry.offset as usize;
        let end = start + entry.length as usize;
        self.parent_payload
            .get(start..end)
            .map(<[u8]>::to_vec)
            .ok_or_else(|| VfsError::BackEndError("partition extends past parent image".into()))
    }

    fn basename(&self, location: &str) -> String {
        location.rsplit('/').next().unwrap_or(location).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::ContainerEntry;
    use crate::backends::fake::FakeFileSystem;
    use crate::resolver;
    use crate::vfs::FileEntry;

    fn fixture() -> (ResolverContext, PathSpec) {
        let entries = vec![
            ContainerEntry { offset: 200, length: 50, creation_time: None },
            ContainerEntry { offset: 300, length: 80, creation_time: None },
        ];
        let mut payload = ContainerTable::encode(&entries);
        payload.resize(200, 0);
        payload.extend(vec![b'A'; 50]);
        payload.extend(vec![b'B'; 80]);

        let fake = FakeFileSystem::new();
        fake.add_file_entry("/disk.dd", FileEntryType::File, Some(payload), None).unwrap();
        let fake: Rc<dyn FileSystem> = Rc::new(fake);
        let context = ResolverContext::new();
        let parent =
            PathSpec::new(TypeIndicator::Fake, None, PathSpecAttrs::with_location("/disk.dd"))
                .unwrap();
        context.cache_file_system(&parent, fake);
        let table_spec =
            PathSpec::new(TypeIndicator::TskPartition, Some(parent), PathSpecAttrs::default())
                .unwrap();
        (context, table_spec)
    }

    #[test]
    fn root_lists_two_partitions() {
        let (context, table_spec) = fixture();
        let entry = resolver::get_root_file_entry(&table_spec, &context).unwrap();
        assert!(entry.is_virtual());
        assert_eq!(entry.number_of_sub_file_entries().unwrap(), 2);
    }

    #[test]
    fn second_partition_reads_its_own_bytes() {
        let (context, table_spec) = fixture();
        let fs = resolver::open_file_system(&table_spec, &context).unwrap();
        let attrs = PathSpecAttrs { location: Some("/p2".into()), ..Default::default() };
        let child = PathSpec::new(TypeIndicator::TskPartition, table_spec.parent().cloned(), attrs)
            .unwrap();
        let descriptor = fs.lookup_entry(&child).unwrap().unwrap();
        let entry = FileEntry::new(fs, child, descriptor);
        let mut object = entry.get_file_object().unwrap();
        assert_eq!(object.read(None).unwrap(), vec![b'B'; 80]);
    }
}
