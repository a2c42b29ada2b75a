//! CPIO: an archive hierarchy parsed from the "newc" (SVR4 no-checksum) format by hand, since no
//! established crate for it exists in the ecosystem.

use std::rc::Rc;

use crate::backends::flat_tree::{FlatTree, FlatTreeFileSystem};
use crate::error::{VfsError, VfsResult};
use crate::path_spec::{PathSpec, PathSpecAttrs, TypeIndicator};
use crate::resolver::ResolverContext;
use crate::vfs::{FileEntryType, FileSystem};

const MAGIC: &[u8; 6] = b"070701";
const HEADER_LEN: usize = 110;
const TRAILER_NAME: &str = "TRAILER!!!";
const MODE_TYPE_MASK: u32 = 0o170000;
const MODE_DIR: u32 = 0o040000;
const MODE_SYMLINK: u32 = 0o120000;

fn hex_field(bytes: &[u8]) -> VfsResult<u32> {
    let text = std::str::from_utf8(bytes)
        .map_err(|_| VfsError::BackEndError("cpio header field is not ASCII".into()))?;
    u32::from_str_radix(text, 16)
        .map_err(|_| VfsError::BackEndError("cpio header field is not hex".into()))
}

fn round_up(value: usize, multiple: usize) -> usize {
    value.div_ceil(multiple) * multiple
}

/// Parses every "newc" entry out of `bytes`, inserting each into `tree`. Returns once the
/// `TRAILER!!!` sentinel entry is reached (or the buffer is exhausted, whichever comes first).
fn parse_newc(bytes: &[u8], tree: &mut FlatTree) -> VfsResult<()> {
    let mut offset = 0usize;
    while offset + HEADER_LEN <= bytes.len() {
        let header = &bytes[offset..offset + HEADER_LEN];
        if &header[0..6] != MAGIC {
            return Err(VfsError::BackEndError("unrecognized cpio magic".into()));
        }
        let mode = hex_field(&header[14..22])?;
        let filesize = hex_field(&header[54..62])? as usize;
        let namesize = hex_field(&header[94..102])? as usize;

        let name_start = offset + HEADER_LEN;
        let name_end = name_start + namesize;
        if name_end > bytes.len() || namesize == 0 {
            return Err(VfsError::BackEndError("cpio entry name overruns buffer".into()));
        }
        let name = std::str::from_utf8(&bytes[name_start..name_end - 1])
            .map_err(|_| VfsError::BackEndError("cpio entry name is not UTF-8".into()))?
            .to_string();

        let data_start = round_up(name_end, 4);
        let data_end = data_start + filesize;
        if data_end > bytes.len() {
            return Err(VfsError::BackEndError("cpio entry payload overruns buffer".into()));
        }

        if name == TRAILER_NAME {
            break;
        }

        let location = format!("/{name}");
        let file_type = mode & MODE_TYPE_MASK;
        if file_type == MODE_DIR {
            tree.ensure_ancestors(&location);
            tree.insert_if_absent(location, FileEntryType::Directory, None, None);
        } else if file_type == MODE_SYMLINK {
            let target = std::str::from_utf8(&bytes[data_start..data_end])
                .map_err(|_| VfsError::BackEndError("cpio symlink target is not UTF-8".into()))?
                .to_string();
            tree.ensure_ancestors(&location);
            tree.insert_if_absent(location, FileEntryType::Link, None, Some(target));
        } else {
            let data = bytes[data_start..data_end].to_vec();
            tree.ensure_ancestors(&location);
            tree.insert_if_absent(location, FileEntryType::File, Some(data), None);
        }

        offset = round_up(data_end, 4);
    }
    Ok(())
}

pub fn open(spec: &PathSpec, context: &ResolverContext) -> VfsResult<Rc<dyn FileSystem>> {
    let parent =
        spec.parent().ok_or_else(|| VfsError::BadPathSpec("CPIO requires a parent".into()))?;
    let bytes = super::read_parent_payload(parent, context)?;

    let mut tree = FlatTree::new();
    parse_newc(&bytes, &mut tree)?;

    let root = PathSpec::new(TypeIndicator::Cpio, Some(parent.clone()), PathSpecAttrs::default())?;
    Ok(Rc::new(FlatTreeFileSystem::new(TypeIndicator::Cpio, root, tree)))
}
