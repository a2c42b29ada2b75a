//! DATA_RANGE: a single-file back end that windows a byte range out of its parent stream,
//! starting at `range_offset` and spanning `range_size` bytes.

use std::rc::Rc;

use crate::backends::SinglePayloadFileSystem;
use crate::error::VfsError;
use crate::error::VfsResult;
use crate::path_spec::PathSpec;
use crate::resolver::ResolverContext;
use crate::vfs::FileSystem;

pub fn open(spec: &PathSpec, context: &ResolverContext) -> VfsResult<Rc<dyn FileSystem>> {
    let parent = spec
        .parent()
        .ok_or_else(|| VfsError::BadPathSpec("DATA_RANGE requires a parent".into()))?;
    let offset = spec.range_offset().ok_or_else(|| {
        VfsError::BadPathSpec("DATA_RANGE requires a range_offset attribute".into())
    })?;
    let size = spec.range_size().ok_or_else(|| {
        VfsError::BadPathSpec("DATA_RANGE requires a range_size attribute".into())
    })?;

    let full = super::read_parent_payload(parent, context)?;
    let start = (offset as usize).min(full.len());
    let end = (start + size as usize).min(full.len());
    let window = full[start..end].to_vec();

    Ok(Rc::new(SinglePayloadFileSystem::new(spec.type_indicator(), spec.clone(), window)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::fake::FakeFileSystem;
    use crate::path_spec::{PathSpecAttrs, TypeIndicator};
    use crate::resolver;
    use crate::vfs::{FileEntry, FileEntryType};

    #[test]
    fn windows_a_byte_range_out_of_the_parent() {
        let fake = FakeFileSystem::new();
        fake.add_file_entry("/x", FileEntryType::File, Some(b"0123456789".to_vec()), None)
            .unwrap();
        let fake: Rc<dyn FileSystem> = Rc::new(fake);
        let context = ResolverContext::new();
        let parent =
            PathSpec::new(TypeIndicator::Fake, None, PathSpecAttrs::with_location("/x")).unwrap();
        context.cache_file_system(&parent, fake);

        let attrs =
            PathSpecAttrs { range_offset: Some(3), range_size: Some(4), ..Default::default() };
        let spec = PathSpec::new(TypeIndicator::DataRange, Some(parent), attrs).unwrap();
        let fs = resolver::open_file_system(&spec, &context).unwrap();
        let descriptor = fs.lookup_entry(&spec).unwrap().unwrap();
        let entry = FileEntry::new(fs, spec, descriptor);
        let mut object = entry.get_file_object().unwrap();
        assert_eq!(object.read(None).unwrap(), b"3456");
    }

    #[test]
    fn range_past_the_end_is_clamped() {
        let fake = FakeFileSystem::new();
        fake.add_file_entry("/x", FileEntryType::File, Some(b"abc".to_vec()), None).unwrap();
        let fake: Rc<dyn FileSystem> = Rc::new(fake);
        let context = ResolverContext::new();
        let parent =
            PathSpec::new(TypeIndicator::Fake, None, PathSpecAttrs::with_location("/x")).unwrap();
        context.cache_file_system(&parent, fake);

        let attrs =
            PathSpecAttrs { range_offset: Some(1), range_size: Some(100), ..Default::default() };
        let spec = PathSpec::new(TypeIndicator::DataRange, Some(parent), attrs).unwrap();
        let fs = resolver::open_file_system(&spec, &context).unwrap();
        let descriptor = fs.lookup_entry(&spec).unwrap().unwrap();
        let entry = FileEntry::new(fs, spec, descriptor);
        let mut object = entry.get_file_object().unwrap();
        assert_eq!(object.read(None).unwrap(), b"bc");
    }
}
