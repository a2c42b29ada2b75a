//! The uniform virtual file system surface every back end implements identically: a
//! [`FileSystem`] opens [`FileEntry`] values by [`PathSpec`](crate::path_spec::PathSpec), entries
//! expose [`VfsStat`] metadata and children, and regular files hand out a [`FileObject`] for
//! random-access reads.
//!
//! Back ends live under [`crate::backends`]; this module only defines the contract and the
//! generic [`FileEntry`] wrapper that every back end shares (SPEC_FULL.md §4.3).

mod buffer_file_object;

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::VfsResult;
use crate::path_spec::PathSpec;

pub use buffer_file_object::BufferFileObject;

/// What kind of thing a [`FileEntry`] names, independent of the back end that produced it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FileEntryType {
    Device,
    Directory,
    File,
    Link,
    Pipe,
    Socket,
    Whiteout,
}

/// Origin-relative seek, mirroring [`std::io::SeekFrom`] but kept as a small dyn-safe enum so it
/// crosses the [`FileObject`] trait-object boundary without an extra indirection.
#[derive(Debug, Copy, Clone)]
pub enum SeekFrom {
    Start(u64),
    Current(i64),
    End(i64),
}

/// Metadata a back end can report about a file entry. Every field is optional because not every
/// back end or underlying format tracks every attribute (an in-memory FAKE entry has no uid/gid,
/// a TAR member may lack a creation time).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VfsStat {
    pub kind: Option<FileEntryType>,
    pub size: Option<u64>,
    pub atime: Option<i64>,
    pub mtime: Option<i64>,
    pub ctime: Option<i64>,
    pub crtime: Option<i64>,
    pub mode: Option<u32>,
    pub uid: Option<u32>,
    pub gid: Option<u32>,
    pub ino: Option<u64>,
    /// `false` for a directory entry whose underlying blocks have been deallocated (e.g. a
    /// deleted-but-unallocated TSK inode still reachable through a dangling directory record).
    pub is_allocated: Option<bool>,
}

/// What a [`FileSystem`] knows about an entry before a [`FileEntry`] wrapper is built around it.
///
/// Kept minimal on purpose: everything else ([`VfsStat`], children, link target) is fetched
/// lazily through the [`FileSystem`] methods rather than pushed into this descriptor, so a
/// back end that never needs to stat an entry never pays for it.
#[derive(Debug, Clone, Copy)]
pub struct EntryDescriptor {
    pub is_root: bool,
    /// A virtual entry has no concrete backing data (e.g. the VSHADOW root, or a synthetic
    /// directory inserted to complete a path). [`FileEntry::get_file_object`] always fails with
    /// [`crate::error::VfsError::Unsupported`] for one.
    pub is_virtual: bool,
}

/// Random-access reader over a single file entry's payload.
pub trait FileObject {
    fn read(&mut self, length: Option<u64>) -> VfsResult<Vec<u8>>;
    fn seek(&mut self, position: SeekFrom) -> VfsResult<u64>;
    fn offset(&self) -> u64;
    fn size(&self) -> VfsResult<u64>;
}

/// A back end: the single abstraction every storage, image, or archive format implements so the
/// rest of the crate never has to know which one it is talking to.
///
/// `self` is never `mut`: back ends that need interior state (an open handle, a decoded header)
/// hold it behind `RefCell`/`Cell`, matching the single-threaded cooperative model (SPEC_FULL.md
/// §5) the crate targets — there is never a second call in flight to synchronize against.
pub trait FileSystem {
    fn type_indicator(&self) -> crate::path_spec::TypeIndicator;

    /// Opens the back end against its root path spec. Must be called before any other method;
    /// back ends that need no setup (FAKE) implement this as a no-op.
    fn open(&self, path_spec: &PathSpec) -> VfsResult<()>;
    fn close(&self) -> VfsResult<()>;

    fn root_path_spec(&self) -> PathSpec;
    fn file_entry_exists(&self, path_spec: &PathSpec) -> bool;
    fn lookup_entry(&self, path_spec: &PathSpec) -> VfsResult<Option<EntryDescriptor>>;

    fn stat(&self, path_spec: &PathSpec) -> VfsResult<VfsStat>;
    fn list_children(&self, path_spec: &PathSpec) -> VfsResult<Vec<PathSpec>>;
    fn link_target(&self, path_spec: &PathSpec) -> VfsResult<Option<String>>;

    /// Reads the full payload backing `path_spec`. Back ends with streamable formats may read it
    /// once and hand the bytes to a [`BufferFileObject`]; there is no requirement to stream,
    /// given the forensic images this crate targets are read in full far more often than seeked.
    fn read_file(&self, path_spec: &PathSpec) -> VfsResult<Vec<u8>>;

    fn basename(&self, location: &str) -> String;
}

/// A directory's materialized child list.
///
/// [`FileEntry`] builds one lazily on first access and caches it — an open question resolved in
/// SPEC_FULL.md §9 in favor of memoize-on-first-use over re-enumerating the back end on every
/// call, since a TSK or ZIP directory listing can require re-parsing the whole container index.
#[derive(Debug, Clone)]
pub struct Directory {
    entries: Vec<PathSpec>,
}

impl Directory {
    pub fn entries(&self) -> &[PathSpec] {
        &self.entries
    }
}

/// A named, stat-able, possibly-enumerable node in a back end's namespace.
///
/// Holds a reference-counted handle to the [`FileSystem`] that produced it rather than a copy of
/// its state, so opening the same entry twice through [`crate::resolver::Resolver`] shares one
/// underlying back end instance.
pub struct FileEntry {
    file_system: Rc<dyn FileSystem>,
    path_spec: PathSpec,
    descriptor: EntryDescriptor,
    stat_cache: RefCell<Option<VfsStat>>,
    directory_cache: RefCell<Option<Option<Directory>>>,
}

impl FileEntry {
    pub fn new(
        file_system: Rc<dyn FileSystem>,
        path_spec: PathSpec,
        descriptor: EntryDescriptor,
    ) -> Self {
        FileEntry {
            file_system,
            path_spec,
            descriptor,
            stat_cache: RefCell::new(None),
            directory_cache: RefCell::new(None),
        }
    }

    pub fn path_spec(&self) -> &PathSpec {
        &self.path_spec
    }

    pub fn is_root(&self) -> bool {
        self.descriptor.is_root
    }

    pub fn is_virtual(&self) -> bool {
        self.descriptor.is_virtual
    }

    /// The entry's basename, derived from its own location if the back end tracks one, or from
    /// the type indicator chain otherwise (a leaf entry such as a QCOW root has no location of
    /// its own).
    pub fn name(&self) -> String {
        match self.path_spec.location() {
            Some(location) => self.file_system.basename(location),
            None => self.path_spec.type_indicator().as_str().to_ascii_lowercase(),
        }
    }

    fn stat_object(&self) -> VfsResult<VfsStat> {
        if let Some(cached) = self.stat_cache.borrow().as_ref() {
            return Ok(cached.clone());
        }
        let stat = self.file_system.stat(&self.path_spec)?;
        *self.stat_cache.borrow_mut() = Some(stat.clone());
        Ok(stat)
    }

    pub fn entry_type(&self) -> VfsResult<Option<FileEntryType>> {
        Ok(self.stat_object()?.kind)
    }

    pub fn is_directory(&self) -> VfsResult<bool> {
        Ok(self.entry_type()? == Some(FileEntryType::Directory))
    }

    pub fn is_file(&self) -> VfsResult<bool> {
        Ok(self.entry_type()? == Some(FileEntryType::File))
    }

    pub fn is_link(&self) -> VfsResult<bool> {
        Ok(self.entry_type()? == Some(FileEntryType::Link))
    }

    pub fn get_stat(&self) -> VfsResult<VfsStat> {
        self.stat_object()
    }

    pub fn get_link_target(&self) -> VfsResult<Option<String>> {
        self.file_system.link_target(&self.path_spec)
    }

    fn directory(&self) -> VfsResult<Option<Directory>> {
        if let Some(cached) = self.directory_cache.borrow().as_ref() {
            return Ok(cached.clone());
        }
        let directory = if self.is_directory()? {
            let entries = self.file_system.list_children(&self.path_spec)?;
            Some(Directory { entries })
        } else {
            None
        };
        *self.directory_cache.borrow_mut() = Some(directory.clone());
        Ok(directory)
    }

    pub fn number_of_sub_file_entries(&self) -> VfsResult<usize> {
        Ok(self.directory()?.map_or(0, |dir| dir.entries.len()))
    }

    pub fn sub_file_entries(&self) -> VfsResult<Vec<FileEntry>> {
        let Some(directory) = self.directory()? else {
            return Ok(Vec::new());
        };
        directory
            .entries
            .iter()
            .map(|child| {
                let descriptor = EntryDescriptor { is_root: false, is_virtual: false };
                Ok(FileEntry::new(self.file_system.clone(), child.clone(), descriptor))
            })
            .collect()
    }

    /// Looks up a child by name: an exact match returns immediately, otherwise the first
    /// case-insensitive match found while scanning the whole directory is returned. Mirrors the
    /// upstream dfvfs directory-lookup algorithm exactly — a case-insensitive match earlier in
    /// iteration order does **not** short-circuit the search for a later exact match.
    pub fn get_sub_file_entry_by_name(&self, name: &str) -> VfsResult<Option<FileEntry>> {
        let Some(directory) = self.directory()? else {
            return Ok(None);
        };

        let mut case_insensitive_match: Option<&PathSpec> = None;
        for child in &directory.entries {
            let child_name = match child.location() {
                Some(location) => self.file_system.basename(location),
                None => continue,
            };
            if child_name == name {
                let descriptor = EntryDescriptor { is_root: false, is_virtual: false };
                return Ok(Some(FileEntry::new(
                    self.file_system.clone(),
                    child.clone(),
                    descriptor,
                )));
            }
            if case_insensitive_match.is_none() && child_name.eq_ignore_ascii_case(name) {
                case_insensitive_match = Some(child);
            }
        }

        Ok(case_insensitive_match.map(|child| {
            let descriptor = EntryDescriptor { is_root: false, is_virtual: false };
            FileEntry::new(self.file_system.clone(), child.clone(), descriptor)
        }))
    }

    pub fn get_file_object(&self) -> VfsResult<Box<dyn FileObject>> {
        if self.descriptor.is_virtual {
            return Err(crate::error::VfsError::Unsupported(
                "a virtual entry has no payload to open",
            ));
        }
        let data = self.file_system.read_file(&self.path_spec)?;
        Ok(Box::new(BufferFileObject::new(data)))
    }
}
