//! Back ends: one [`crate::vfs::FileSystem`] implementation per
//! [`crate::path_spec::TypeIndicator`] variant.
//!
//! Every module here is grounded on the matching upstream dfvfs back end (see DESIGN.md) but
//! expressed as a small, dyn-safe, synchronous Rust type rather than a class hierarchy.

pub mod bde;
pub mod compressed_stream;
pub mod cpio;
pub mod data_range;
pub mod encoded_stream;
pub mod fake;
mod flat_tree;
pub mod gzip;
pub mod image;
pub mod mount;
pub mod os;
mod single_payload;
pub mod tar;
pub mod tsk;
pub mod tsk_partition;
pub mod vshadow;
pub mod zip;

use std::rc::Rc;

use crate::error::VfsResult;
use crate::path_spec::PathSpec;
use crate::resolver::ResolverContext;
use crate::vfs::FileEntry;

pub use single_payload::SinglePayloadFileSystem;

/// Reads a path spec's full payload by opening its own back end through the resolver. Every
/// "topologically single-file" back end (RAW/QCOW/VHDI/VMDK/EWF/BDE/GZIP/COMPRESSED_STREAM/
/// ENCODED_STREAM/DATA_RANGE) and every archive back end derives its content this way rather
/// than re-implementing parent traversal.
pub fn read_parent_payload(parent: &PathSpec, context: &ResolverContext) -> VfsResult<Vec<u8>> {
    let file_system = crate::resolver::open_file_system(parent, context)?;
    let descriptor = file_system
        .lookup_entry(parent)?
        .ok_or(crate::error::VfsError::NotFound)?;
    let entry = FileEntry::new(file_system, parent.clone(), descriptor);
    let mut object = entry.get_file_object()?;
    object.read(None)
}
