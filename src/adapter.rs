//! The seam between this crate's back ends and a real disk-image / forensic-container driver.
//!
//! SPEC_FULL.md §6 deliberately keeps "a real TSK/QCOW/EWF binding" out of the contract: this
//! module defines the small trait surface those drivers would implement (`open`, `size`,
//! `read_buffer`, `get_creation_time`, indexed enumeration) and ships the in-memory
//! implementation this crate's own back ends and tests use in its place.

use crate::error::{VfsError, VfsResult};

/// A single logical payload behind RAW/QCOW/VHDI/VMDK/EWF/BDE — one contiguous byte range with
/// an optional creation timestamp, however the real format stores it.
pub trait ImageSource {
    fn size(&self) -> u64;
    fn read_buffer(&self, offset: u64, length: u64) -> VfsResult<Vec<u8>>;
    fn creation_time(&self) -> Option<i64>;
}

/// In-memory stand-in for a real image driver: the payload is already fully materialized, so
/// `read_buffer` is a bounds-checked slice.
pub struct InMemoryImage {
    data: Vec<u8>,
    creation_time: Option<i64>,
}

impl InMemoryImage {
    pub fn new(data: Vec<u8>) -> Self {
        InMemoryImage { data, creation_time: None }
    }

    pub fn with_creation_time(data: Vec<u8>, creation_time: i64) -> Self {
        InMemoryImage { data, creation_time: Some(creation_time) }
    }
}

impl ImageSource for InMemoryImage {
    fn size(&self) -> u64 {
        self.data.len() as u64
    }

    fn read_buffer(&self, offset: u64, length: u64) -> VfsResult<Vec<u8>> {
        let start = offset.min(self.data.len() as u64) as usize;
        let end = (offset + length).min(self.data.len() as u64) as usize;
        Ok(self.data[start..end.max(start)].to_vec())
    }

    fn creation_time(&self) -> Option<i64> {
        self.creation_time
    }
}

/// One indexed child of a container adapter (a TSK_PARTITION partition, a VSHADOW store).
#[derive(Debug, Clone, Copy)]
pub struct ContainerEntry {
    pub offset: u64,
    pub length: u64,
    pub creation_time: Option<i64>,
}

/// A flat index of [`ContainerEntry`] values parsed from a small fixed-layout header prefixed to
/// the parent payload: a 4-byte little-endian count, followed by one 24-byte record per entry
/// (`offset: u64`, `length: u64`, `creation_time: i64`, `0` meaning absent). Entry payloads
/// themselves live at their recorded absolute offsets within the *parent* stream, after the
/// header — this crate's stand-in for a real MBR/GPT or VSS-store parser (SPEC_FULL.md §6).
pub struct ContainerTable {
    entries: Vec<ContainerEntry>,
}

const RECORD_LEN: usize = 24;

impl ContainerTable {
    pub fn parse(data: &[u8]) -> VfsResult<Self> {
        if data.len() < 4 {
            return Err(VfsError::BackEndError("container header truncated".into()));
        }
        let count = u32::from_le_bytes(data[0..4].try_into().unwrap()) as usize;
        let mut entries = Vec::with_capacity(count);
        let mut cursor = 4usize;
        for _ in 0..count {
            if data.len() < cursor + RECORD_LEN {
                return Err(VfsError::BackEndError("container record truncated".into()));
            }
            let offset = u64::from_le_bytes(data[cursor..cursor + 8].try_into().unwrap());
            let length = u64::from_le_bytes(data[cursor + 8..cursor + 16].try_into().unwrap());
            let creation_time_raw =
                i64::from_le_bytes(data[cursor + 16..cursor + 24].try_into().unwrap());
            entries.push(ContainerEntry {
                offset,
                length,
                creation_time: (creation_time_raw != 0).then_some(creation_time_raw),
            });
            cursor += RECORD_LEN;
        }
        Ok(ContainerTable { entries })
    }

    pub fn entries(&self) -> &[ContainerEntry] {
        &self.entries
    }

    /// Builds the header+record bytes a [`ContainerTable::parse`] call can read back. Entry
    /// offsets must already account for this header's own length plus whatever payload bytes
    /// precede each entry; used by back-end tests to build synthetic fixtures.
    pub fn encode(entries: &[ContainerEntry]) -> Vec<u8> {
        let mut out = Vec::with_capacity(4 + entries.len() * RECORD_LEN);
        out.extend_from_slice(&(entries.len() as u32).to_le_bytes());
        for entry in entries {
            out.extend_from_slice(&entry.offset.to_le_bytes());
            out.extend_from_slice(&entry.length.to_le_bytes());
            out.extend_from_slice(&entry.creation_time.unwrap_or(0).to_le_bytes());
        }
        out
    }
}

/// One node of an [`InodeTable`] — a TSK back end's stand-in for a real inode walk: a name, its
/// parent's inode number, whether the allocation bitmap marks it live, and the byte range of its
/// content within the partition payload (directories carry a zero-length range).
#[derive(Debug, Clone)]
pub struct InodeEntry {
    pub inode: u64,
    pub parent_inode: u64,
    pub name: String,
    pub is_directory: bool,
    pub is_allocated: bool,
    pub offset: u64,
    pub length: u64,
}

/// A flat index of [`InodeEntry`] values parsed from a small fixed-layout header prefixed to the
/// parent payload: a 4-byte little-endian count, then one variable-length record per entry
/// (`inode: u64`, `parent_inode: u64`, `offset: u64`, `length: u64`, `is_directory: u8`,
/// `is_allocated: u8`, `name_len: u16`, followed by `name_len` bytes of UTF-8 name). This crate's
/// stand-in for a real TSK metadata walk (SPEC_FULL.md §6).
pub struct InodeTable {
    entries: Vec<InodeEntry>,
}

impl InodeTable {
    pub fn parse(data: &[u8]) -> VfsResult<Self> {
        if data.len() < 4 {
            return Err(VfsError::BackEndError("inode table header truncated".into()));
        }
        let count = u32::from_le_bytes(data[0..4].try_into().unwrap()) as usize;
        let mut entries = Vec::with_capacity(count);
        let mut cursor = 4usize;
        for _ in 0..count {
            if data.len() < cursor + 34 {
                return Err(VfsError::BackEndError("inode table record truncated".into()));
            }
            let inode = u64::from_le_bytes(data[cursor..cursor + 8].try_into().unwrap());
            let parent_inode = u64::from_le_bytes(data[cursor + 8..cursor + 16].try_into().unwrap());
            let offset = u64::from_le_bytes(data[cursor + 16..cursor + 24].try_into().unwrap());
            let length = u64::from_le_bytes(data[cursor + 24..cursor + 32].try_into().unwrap());
            let is_directory = data[cursor + 32] != 0;
            let is_allocated = data[cursor + 33] != 0;
            let name_len =
                u16::from_le_bytes(data[cursor + 34..cursor + 36].try_into().unwrap()) as usize;
            let name_start = cursor + 36;
            let name_end = name_start + name_len;
            if data.len() < name_end {
                return Err(VfsError::BackEndError("inode table name truncated".into()));
            }
            let name = std::str::from_utf8(&data[name_start..name_end])
                .map_err(|_| VfsError::BackEndError("inode table name is not UTF-8".into()))?
                .to_string();
            entries.push(InodeEntry {
                inode,
                parent_inode,
                name,
                is_directory,
                is_allocated,
                offset,
                length,
            });
            cursor = name_end;
        }
        Ok(InodeTable { entries })
    }

    pub fn entries(&self) -> &[InodeEntry] {
        &self.entries
    }

    /// Builds the header+record bytes an [`InodeTable::parse`] call can read back; used by
    /// back-end tests to build synthetic fixtures.
    pub fn encode(entries: &[InodeEntry]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&(entries.len() as u32).to_le_bytes());
        for entry in entries {
            out.extend_from_slice(&entry.inode.to_le_bytes());
            out.extend_from_slice(&entry.parent_inode.to_le_bytes());
            out.extend_from_slice(&entry.offset.to_le_bytes());
            out.extend_from_slice(&entry.length.to_le_bytes());
            out.push(entry.is_directory as u8);
            out.push(entry.is_allocated as u8);
            out.extend_from_slice(&(entry.name.len() as u16).to_le_bytes());
            out.extend_from_slice(entry.name.as_bytes());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_image_reads_a_sub_range() {
        let image = InMemoryImage::new(b"0123456789".to_vec());
        assert_eq!(image.read_buffer(3, 4).unwrap(), b"3456");
    }

    #[test]
    fn in_memory_image_clamps_reads_past_the_end() {
        let image = InMemoryImage::new(b"abc".to_vec());
        assert_eq!(image.read_buffer(1, 100).unwrap(), b"bc");
    }

    #[test]
    fn container_table_round_trips_through_encode_and_parse() {
        let entries = vec![
            ContainerEntry { offset: 28, length: 100, creation_time: Some(1_000) },
            ContainerEntry { offset: 128, length: 50, creation_time: None },
        ];
        let encoded = ContainerTable::encode(&entries);
        let parsed = ContainerTable::parse(&encoded).unwrap();
        assert_eq!(parsed.entries().len(), 2);
        assert_eq!(parsed.entries()[0].creation_time, Some(1_000));
        assert_eq!(parsed.entries()[1].creation_time, None);
    }

    #[test]
    fn truncated_header_is_rejected() {
        let err = ContainerTable::parse(&[1, 2]);
        assert!(matches!(err, Err(VfsError::BackEndError(_))));
    }

    #[test]
    fn inode_table_round_trips_through_encode_and_parse() {
        let entries = vec![
            InodeEntry {
                inode: 2,
                parent_inode: 2,
                name: "root".into(),
                is_directory: true,
                is_allocated: true,
                offset: 0,
                length: 0,
            },
            InodeEntry {
                inode: 5,
                parent_inode: 2,
                name: "deleted.txt".into(),
                is_directory: false,
                is_allocated: false,
                offset: 10,
                length: 4,
            },
        ];
        let encoded = InodeTable::encode(&entries);
        let parsed = InodeTable::parse(&encoded).unwrap();
        assert_eq!(parsed.entries().len(), 2);
        assert!(parsed.entries()[0].is_directory);
        assert!(!parsed.entries()[1].is_allocated);
    }

    #[test]
    fn inode_table_truncated_record_is_rejected() {
        let err = InodeTable::parse(&[1, 0, 0, 0, 9, 9]);
        assert!(matches!(err, Err(VfsError::BackEndError(_))));
    }
}
