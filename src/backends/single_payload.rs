//! Shared [`FileSystem`] for every back end that projects exactly one file onto its parent
//! stream: the image formats (RAW/QCOW/VHDI/VMDK/EWF), BDE once decrypted, and the stream
//! transforms (GZIP/COMPRESSED_STREAM/ENCODED_STREAM/DATA_RANGE). Each of those modules only
//! has to produce the projected bytes; the rest of the uniform VFS surface is identical across
//! all of them.

use crate::error::{VfsError, VfsResult};
use crate::path_spec::{PathSpec, TypeIndicator};
use crate::vfs::{EntryDescriptor, FileEntryType, FileSystem, VfsStat};

pub struct SinglePayloadFileSystem {
    type_indicator: TypeIndicator,
    spec: PathSpec,
    payload: Vec<u8>,
    creation_time: Option<i64>,
}

impl SinglePayloadFileSystem {
    pub fn new(type_indicator: TypeIndicator, spec: PathSpec, payload: Vec<u8>) -> Self {
        SinglePayloadFileSystem { type_indicator, spec, payload, creation_time: None }
    }

    pub fn with_creation_time(mut self, creation_time: Option<i64>) -> Self {
        self.creation_time = creation_time;
        self
    }

    fn is_self(&self, path_spec: &PathSpec) -> bool {
        path_spec.comparable() == self.spec.comparable()
    }
}

impl FileSystem for SinglePayloadFileSystem {
    fn type_indicator(&self) -> TypeIndicator {
        self.type_indicator
    }

    fn open(&self, _path_spec: &PathSpec) -> VfsResult<()> {
        Ok(())
    }

    fn close(&self) -> VfsResult<()> {
        Ok(())
    }

    fn root_path_spec(&self) -> PathSpec {
        self.spec.clone()
    }

    fn file_entry_exists(&self, path_spec: &PathSpec) -> bool {
        self.is_self(path_spec)
    }

    fn lookup_entry(&self, path_spec: &PathSpec) -> VfsResult<Option<EntryDescriptor>> {
        if !self.is_self(path_spec) {
            return Ok(None);
        }
        Ok(Some(EntryDescriptor { is_root: true, is_virtual: false }))
    }

    fn stat(&self, path_spec: &PathSpec) -> VfsResult<VfsStat> {
        if !self.is_self(path_spec) {
            return Err(VfsError::NotFound);
        }
        Ok(VfsStat {
            kind: Some(FileEntryType::File),
            size: Some(self.payload.len() as u64),
            crtime: self.creation_time,
            is_allocated: Some(true),
            ..Default::default()
        })
    }

    fn list_children(&self, _path_spec: &PathSpec) -> VfsResult<Vec<PathSpec>> {
        Ok(Vec::new())
    }

    fn link_target(&self, _path_spec: &PathSpec) -> VfsResult<Option<String>> {
        Ok(None)
    }

    fn read_file(&self, path_spec: &PathSpec) -> VfsResult<Vec<u8>> {
        if !self.is_self(path_spec) {
            return Err(VfsError::NotFound);
        }
        Ok(self.payload.clone())
    }

    fn basename(&self, _location: &str) -> String {
        self.type_indicator.as_str().to_ascii_lowercase()
    }
}
