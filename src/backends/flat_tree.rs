//! Shared "full path to node" hierarchy used by every back end whose whole namespace is known up
//! front: FAKE (explicitly built fixtures) and the TAR/ZIP/CPIO archive readers (built once from
//! the archive's member list on open). Mirrors `dfvfs/vfs/fake_file_system.py`'s flat `_paths`
//! dict and duplicate/type-mismatch validation.

use std::collections::HashMap;

use crate::error::{VfsError, VfsResult};
use crate::path_spec::{PathSpec, TypeIndicator};
use crate::vfs::{EntryDescriptor, FileEntryType, FileSystem, VfsStat};

pub const LOCATION_ROOT: &str = "/";

pub struct FlatNode {
    pub kind: FileEntryType,
    pub data: Vec<u8>,
    pub link_target: Option<String>,
}

pub struct FlatTree {
    nodes: HashMap<String, FlatNode>,
}

impl Default for FlatTree {
    fn default() -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(
            LOCATION_ROOT.to_string(),
            FlatNode { kind: FileEntryType::Directory, data: Vec::new(), link_target: None },
        );
        FlatTree { nodes }
    }
}

impl FlatTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        location: impl Into<String>,
        kind: FileEntryType,
        data: Option<Vec<u8>>,
        link_target: Option<String>,
    ) -> VfsResult<()> {
        let location = location.into();
        if self.nodes.contains_key(&location) {
            return Err(VfsError::BadPathSpec(format!("path already exists: {location}")));
        }
        if data.is_some() && kind != FileEntryType::File {
            return Err(VfsError::BadPathSpec("only a File entry may carry data".into()));
        }
        if link_target.is_some() && kind != FileEntryType::Link {
            return Err(VfsError::BadPathSpec("only a Link entry may carry a target".into()));
        }
        self.nodes.insert(location, FlatNode { kind, data: data.unwrap_or_default(), link_target });
        Ok(())
    }

    /// Like [`Self::insert`], but silently keeps the existing entry instead of erroring when
    /// `location` is already present — archive formats occasionally repeat a directory record.
    pub fn insert_if_absent(
        &mut self,
        location: impl Into<String>,
        kind: FileEntryType,
        data: Option<Vec<u8>>,
        link_target: Option<String>,
    ) {
        let location = location.into();
        self.nodes
            .entry(location)
            .or_insert_with(|| FlatNode { kind, data: data.unwrap_or_default(), link_target });
    }

    /// Inserts an empty `Directory` placeholder for every ancestor of `location` that is not yet
    /// present, so an archive's member list need not include explicit directory records for
    /// every intermediate path component.
    pub fn ensure_ancestors(&mut self, location: &str) {
        let mut components: Vec<&str> = location.trim_start_matches('/').split('/').collect();
        components.pop();
        let mut path = String::new();
        for component in components {
            if component.is_empty() {
                continue;
            }
            path.push('/');
            path.push_str(component);
            self.insert_if_absent(path.clone(), FileEntryType::Directory, None, None);
        }
    }

    pub fn get(&self, location: &str) -> Option<&FlatNode> {
        self.nodes.get(location)
    }

    pub fn contains(&self, location: &str) -> bool {
        self.nodes.contains_key(location)
    }

    pub fn direct_children_of(&self, directory: &str) -> Vec<String> {
        let prefix =
            if directory == LOCATION_ROOT { LOCATION_ROOT.to_string() } else { format!("{directory}/") };
        let mut children: Vec<String> = self
            .nodes
            .keys()
            .filter(|path| {
                path.starts_with(&prefix) && *path != directory && !path[prefix.len()..].contains('/')
            })
            .cloned()
            .collect();
        children.sort();
        children
    }

    pub fn basename(location: &str) -> String {
        if location == LOCATION_ROOT {
            return LOCATION_ROOT.to_string();
        }
        location.rsplit('/').next().unwrap_or(location).to_string()
    }
}

/// Generic [`FileSystem`] over an already-built, immutable [`FlatTree`] — the archive back ends
/// (TAR/ZIP/CPIO) parse their whole member list once in `open` and hand the result here rather
/// than each reimplementing the same lookup/stat/list_children/read_file logic FAKE already has.
pub struct FlatTreeFileSystem {
    type_indicator: TypeIndicator,
    root: PathSpec,
    tree: FlatTree,
}

impl FlatTreeFileSystem {
    pub fn new(type_indicator: TypeIndicator, root: PathSpec, tree: FlatTree) -> Self {
        FlatTreeFileSystem { type_indicator, root, tree }
    }
}

impl FileSystem for FlatTreeFileSystem {
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
        self.root.clone()
    }

    fn file_entry_exists(&self, path_spec: &PathSpec) -> bool {
        path_spec.location().is_some_and(|location| self.tree.contains(location))
    }

    fn lookup_entry(&self, path_spec: &PathSpec) -> VfsResult<Option<EntryDescriptor>> {
        let Some(location) = path_spec.location() else { return Ok(None) };
        if !self.tree.contains(location) {
            return Ok(None);
        }
        Ok(Some(EntryDescriptor { is_root: location == LOCATION_ROOT, is_virtual: false }))
    }

    fn stat(&self, path_spec: &PathSpec) -> VfsResult<VfsStat> {
        let location = path_spec.location().ok_or(VfsError::NotFound)?;
        let node = self.tree.get(location).ok_or(VfsError::NotFound)?;
        Ok(VfsStat {
            kind: Some(node.kind),
            size: (node.kind == FileEntryType::File).then(|| node.data.len() as u64),
            is_allocated: Some(true),
            ..Default::default()
        })
    }

    fn list_children(&self, path_spec: &PathSpec) -> VfsResult<Vec<PathSpec>> {
        let location = path_spec.location().ok_or(VfsError::NotFound)?;
        Ok(self
            .tree
            .direct_children_of(location)
            .into_iter()
            .map(|child| {
                crate::path_spec::PathSpec::new(
                    self.type_indicator,
                    self.root.parent().cloned(),
                    crate::path_spec::PathSpecAttrs::with_location(child),
                )
                .unwrap()
            })
            .collect())
    }

    fn link_target(&self, path_spec: &PathSpec) -> VfsResult<Option<String>> {
        let location = path_spec.location().ok_or(VfsError::NotFound)?;
        Ok(self.tree.get(location).ok_or(VfsError::NotFound)?.link_target.clone())
    }

    fn read_file(&self, path_spec: &PathSpec) -> VfsResult<Vec<u8>> {
        let location = path_spec.location().ok_or(VfsError::NotFound)?;
        let node = self.tree.get(location).ok_or(VfsError::NotFound)?;
        if node.kind != FileEntryType::File {
            return Err(VfsError::Unsupported("only a File entry has readable payload"));
        }
        Ok(node.data.clone())
    }

    fn basename(&self, location: &str) -> String {
        Self::basename_of(location)
    }
}

impl FlatTreeFileSystem {
    fn basename_of(location: &str) -> String {
        FlatTree::basename(location)
    }
}
