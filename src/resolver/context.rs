//! Per-session cache of opened back ends, keyed by [`PathSpec::comparable`].
//!
//! A single `ResolverContext` is not safe to share across preemptive threads without an external
//! mutex (SPEC_FULL.md §5) — callers that want parallelism run one Context per worker instead.

use std::cell::{Ref, RefCell, RefMut};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use crate::credentials::KeyChain;
use crate::error::VfsResult;
use crate::path_spec::PathSpec;
use crate::vfs::FileSystem;

struct Entry {
    handle: Rc<dyn FileSystem>,
    refcount: usize,
}

/// Owns opened [`FileSystem`] handles and the session's [`KeyChain`].
///
/// `retention_capacity` of `0` (the default, via [`ResolverContext::new`]) closes a back end the
/// instant its refcount reaches zero. A positive capacity keeps up to that many idle handles
/// around in case the same spec is reopened shortly after, evicting the least-recently-idled
/// entry once the bound is exceeded (SPEC_FULL.md §4.6's "bounded... cache when retention is
/// enabled" — see DESIGN.md for why this is a hand-rolled LRU rather than `moka::sync::Cache`).
pub struct ResolverContext {
    entries: RefCell<HashMap<String, Entry>>,
    idle_order: RefCell<VecDeque<String>>,
    retention_capacity: usize,
    keychain: RefCell<KeyChain>,
    mount_points: RefCell<HashMap<String, PathSpec>>,
}

impl Default for ResolverContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolverContext {
    pub fn new() -> Self {
        ResolverContext {
            entries: RefCell::new(HashMap::new()),
            idle_order: RefCell::new(VecDeque::new()),
            retention_capacity: 0,
            keychain: RefCell::new(KeyChain::new()),
            mount_points: RefCell::new(HashMap::new()),
        }
    }

    /// Registers `identifier` (a MOUNT path spec's `location`) as pointing at `target`, the
    /// already-constructed path spec a MOUNT back end should resolve to.
    pub fn register_mount_point(&self, identifier: impl Into<String>, target: PathSpec) {
        self.mount_points.borrow_mut().insert(identifier.into(), target);
    }

    pub fn resolve_mount_point(&self, identifier: &str) -> Option<PathSpec> {
        self.mount_points.borrow().get(identifier).cloned()
    }

    pub fn with_retention(capacity: usize) -> Self {
        ResolverContext { retention_capacity: capacity, ..Self::new() }
    }

    pub fn keychain(&self) -> Ref<'_, KeyChain> {
        self.keychain.borrow()
    }

    pub fn keychain_mut(&self) -> RefMut<'_, KeyChain> {
        self.keychain.borrow_mut()
    }

    /// Looks up a cached handle, incrementing its refcount on a hit (whether the handle was
    /// actively in use or sitting idle in the retention window).
    pub fn get_file_system(&self, spec: &PathSpec) -> Option<Rc<dyn FileSystem>> {
        let key = spec.comparable();
        let mut entries = self.entries.borrow_mut();
        let entry = entries.get_mut(&key)?;
        if entry.refcount == 0 {
            self.idle_order.borrow_mut().retain(|idle_key| idle_key != &key);
        }
        entry.refcount += 1;
        Some(entry.handle.clone())
    }

    pub fn cache_file_system(&self, spec: &PathSpec, handle: Rc<dyn FileSystem>) {
        self.entries.borrow_mut().insert(spec.comparable(), Entry { handle, refcount: 1 });
    }

    /// Drops one reference to the handle for `spec`. At refcount zero the handle is either
    /// closed immediately or, under a positive retention capacity, kept idle until evicted.
    pub fn release_file_system(&self, spec: &PathSpec) -> VfsResult<()> {
        let key = spec.comparable();
        let refcount_hit_zero = {
            let mut entries = self.entries.borrow_mut();
            match entries.get_mut(&key) {
                Some(entry) => {
                    entry.refcount = entry.refcount.saturating_sub(1);
                    entry.refcount == 0
                }
                None => return Ok(()),
            }
        };
        if !refcount_hit_zero {
            return Ok(());
        }

        if self.retention_capacity == 0 {
            let entry = self.entries.borrow_mut().remove(&key);
            if let Some(entry) = entry {
                entry.handle.close()?;
            }
            return Ok(());
        }

        self.idle_order.borrow_mut().push_back(key);
        self.evict_over_capacity()
    }

    fn evict_over_capacity(&self) -> VfsResult<()> {
        while self.idle_order.borrow().len() > self.retention_capacity {
            let Some(oldest) = self.idle_order.borrow_mut().pop_front() else { break };
            let entry = self.entries.borrow_mut().remove(&oldest);
            if let Some(entry) = entry {
                entry.handle.close()?;
            }
        }
        Ok(())
    }

    /// Closes and drops every cached handle, active or idle.
    pub fn empty(&self) -> VfsResult<()> {
        let drained: Vec<Entry> = self.entries.borrow_mut().drain().map(|(_, v)| v).collect();
        self.idle_order.borrow_mut().clear();
        for entry in drained {
            entry.handle.close()?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
