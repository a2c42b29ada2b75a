//! OS: a thin pass-through to the host filesystem.
//!
//! Grounded on the host-filesystem wrapper pattern (metadata-to-attr translation, symlink-aware
//! stat) used for `ShadowFS`, stripped of its mutation surface — this crate only ever reads
//! forensic evidence, it never edits the host tree it walks.

use std::fs;
use std::os::unix::fs::{FileTypeExt, MetadataExt};
use std::path::Path;

use crate::error::{VfsError, VfsResult};
use crate::path_spec::{PathSpec, PathSpecAttrs, TypeIndicator};
use crate::vfs::{EntryDescriptor, FileEntryType, FileSystem, VfsStat};

pub struct OsFileSystem;

impl Default for OsFileSystem {
    fn default() -> Self {
        OsFileSystem
    }
}

impl OsFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path_spec_for(&self, location: impl Into<String>) -> PathSpec {
        PathSpec::new(TypeIndicator::Os, None, PathSpecAttrs::with_location(location)).unwrap()
    }

    fn entry_type(metadata: &fs::Metadata) -> FileEntryType {
        let file_type = metadata.file_type();
        if file_type.is_dir() {
            FileEntryType::Directory
        } else if file_type.is_symlink() {
            FileEntryType::Link
        } else if file_type.is_block_device() || file_type.is_char_device() {
            FileEntryType::Device
        } else if file_type.is_fifo() {
            FileEntryType::Pipe
        } else if file_type.is_socket() {
            FileEntryType::Socket
        } else {
            FileEntryType::File
        }
    }
}

impl FileSystem for OsFileSystem {
    fn type_indicator(&self) -> TypeIndicator {
        TypeIndicator::Os
    }

    fn open(&self, _path_spec: &PathSpec) -> VfsResult<()> {
        Ok(())
    }

    fn close(&self) -> VfsResult<()> {
        Ok(())
    }

    fn root_path_spec(&self) -> PathSpec {
        self.path_spec_for("/")
    }

    fn file_entry_exists(&self, path_spec: &PathSpec) -> bool {
        let Some(location) = path_spec.location() else { return false };
        fs::symlink_metadata(location).is_ok()
    }

    fn lookup_entry(&self, path_spec: &PathSpec) -> VfsResult<Option<EntryDescriptor>> {
        let Some(location) = path_spec.location() else { return Ok(None) };
        if fs::symlink_metadata(location).is_err() {
            return Ok(None);
        }
        Ok(Some(EntryDescriptor { is_root: location == "/", is_virtual: false }))
    }

    fn stat(&self, path_spec: &PathSpec) -> VfsResult<VfsStat> {
        let location = path_spec.location().ok_or(VfsError::NotFound)?;
        let metadata = fs::symlink_metadata(location)?;
        Ok(VfsStat {
            kind: Some(Self::entry_type(&metadata)),
            size: Some(metadata.size()),
            atime: Some(metadata.atime()),
            mtime: Some(metadata.mtime()),
            ctime: Some(metadata.ctime()),
            crtime: None,
            mode: Some(metadata.mode()),
            uid: Some(metadata.uid()),
            gid: Some(metadata.gid()),
            ino: Some(metadata.ino()),
            is_allocated: Some(true),
        })
    }

    fn list_children(&self, path_spec: &PathSpec) -> VfsResult<Vec<PathSpec>> {
        let location = path_spec.location().ok_or(VfsError::NotFound)?;
        let mut children = Vec::new();
        for entry in fs::read_dir(location)? {
            let entry = entry?;
            let child_path = entry.path();
            children.push(self.path_spec_for(child_path.to_string_lossy().into_owned()));
        }
        children.sort_by(|a, b| a.location().cmp(&b.location()));
        Ok(children)
    }

    fn link_target(&self, path_spec: &PathSpec) -> VfsResult<Option<String>> {
        let location = path_spec.location().ok_or(VfsError::NotFound)?;
        match fs::read_link(Path::new(location)) {
            Ok(target) => Ok(Some(target.to_string_lossy().into_owned())),
            Err(err) if err.kind() == std::io::ErrorKind::InvalidInput => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn read_file(&self, path_spec: &PathSpec) -> VfsResult<Vec<u8>> {
        let location = path_spec.location().ok_or(VfsError::NotFound)?;
        Ok(fs::read(location)?)
    }

    fn basename(&self, location: &str) -> String {
        Path::new(location)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "/".to_string())
    }
}
