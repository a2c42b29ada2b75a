//! The one [`super::FileObject`] implementation every back end needs: a seekable cursor over a
//! payload that has already been fully materialized into memory.
//!
//! Forensic containers (an EWF image, a ZIP member) are read far more often in full than they
//! are seeked into a handful of bytes at a time, so back ends read once through
//! [`super::FileSystem::read_file`] and hand the bytes here rather than each reimplementing
//! buffering and seek bookkeeping.

use crate::error::{VfsError, VfsResult};

use super::{FileObject, SeekFrom};

pub struct BufferFileObject {
    data: Vec<u8>,
    offset: u64,
}

impl BufferFileObject {
    pub fn new(data: Vec<u8>) -> Self {
        BufferFileObject { data, offset: 0 }
    }
}

impl FileObject for BufferFileObject {
    fn read(&mut self, length: Option<u64>) -> VfsResult<Vec<u8>> {
        let start = self.offset.min(self.data.len() as u64) as usize;
        let available = self.data.len() - start;
        let want = length.map_or(available, |n| n.min(available as u64) as usize);
        let end = start + want;
        self.offset = end as u64;
        Ok(self.data[start..end].to_vec())
    }

    fn seek(&mut self, position: SeekFrom) -> VfsResult<u64> {
        let len = self.data.len() as i64;
        let target = match position {
            SeekFrom::Start(offset) => offset as i64,
            SeekFrom::Current(delta) => self.offset as i64 + delta,
            SeekFrom::End(delta) => len + delta,
        };
        if target < 0 {
            return Err(VfsError::BadPathSpec("seek before start of file".into()));
        }
        self.offset = target as u64;
        Ok(self.offset)
    }

    fn offset(&self) -> u64 {
        self.offset
    }

    fn size(&self) -> VfsResult<u64> {
        Ok(self.data.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_without_length_consumes_to_end() {
        let mut object = BufferFileObject::new(b"hello world".to_vec());
        let data = object.read(None).unwrap();
        assert_eq!(data, b"hello world");
        assert_eq!(object.offset(), 11);
    }

    #[test]
    fn read_with_length_stops_short_and_is_resumable() {
        let mut object = BufferFileObject::new(b"hello world".to_vec());
        assert_eq!(object.read(Some(5)).unwrap(), b"hello");
        assert_eq!(object.read(Some(6)).unwrap(), b" world");
    }

    #[test]
    fn seek_from_end_then_read_remainder() {
        let mut object = BufferFileObject::new(b"0123456789".to_vec());
        object.seek(SeekFrom::End(-3)).unwrap();
        assert_eq!(object.read(None).unwrap(), b"789");
    }

    #[test]
    fn seek_before_start_is_rejected() {
        let mut object = BufferFileObject::new(b"abc".to_vec());
        let err = object.seek(SeekFrom::Current(-1));
        assert!(matches!(err, Err(VfsError::BadPathSpec(_))));
    }

    #[test]
    fn read_past_end_returns_empty() {
        let mut object = BufferFileObject::new(b"abc".to_vec());
        object.seek(SeekFrom::Start(100)).unwrap();
        assert_eq!(object.read(None).unwrap(), Vec::<u8>::new());
    }
}
