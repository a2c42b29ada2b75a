//! RAW/QCOW/VHDI/VMDK/EWF: single-payload disk image formats.
//!
//! All five project one logical disk image onto their parent stream; this crate does not parse
//! the real QCOW2/VHDI/VMDK/EWF container formats (SPEC_FULL.md §6 keeps "a real binding" out of
//! the contract), so each is read through the [`crate::adapter::InMemoryImage`] stand-in over the
//! parent's full bytes — the seam a production deployment would replace with a real driver.

use std::rc::Rc;

use crate::adapter::{ImageSource, InMemoryImage};
use crate::backends::SinglePayloadFileSystem;
use crate::error::VfsResult;
use crate::path_spec::PathSpec;
use crate::resolver::ResolverContext;
use crate::vfs::FileSystem;

pub fn open(spec: &PathSpec, context: &ResolverContext) -> VfsResult<Rc<dyn FileSystem>> {
    let parent = spec.parent().ok_or_else(|| {
        crate::error::VfsError::BadPathSpec(format!(
            "{} requires a parent",
            spec.type_indicator().as_str()
        ))
    })?;
    let payload = super::read_parent_payload(parent, context)?;
    let image = InMemoryImage::new(payload);
    let data = image.read_buffer(0, image.size())?;
    let fs = SinglePayloadFileSystem::new(spec.type_indicator(), spec.clone(), data)
        .with_creation_time(image.creation_time());
    Ok(Rc::new(fs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::fake::FakeFileSystem;
    use crate::path_spec::{PathSpecAttrs, TypeIndicator};
    use crate::resolver;
    use crate::vfs::FileEntry;

    #[test]
    fn qcow_projects_parent_payload_verbatim() {
        let context = ResolverContext::new();
        let fake = FakeFileSystem::new();
        fake.add_file_entry("/disk.dd", crate::vfs::FileEntryType::File, Some(b"IMGDATA".to_vec()), None)
            .unwrap();
        let fake = Rc::new(fake);
        let os_parent = PathSpec::new(TypeIndicator::Fake, None, PathSpecAttrs::with_location("/disk.dd"))
            .unwrap();
        context.cache_file_system(&os_parent, fake.clone() as Rc<dyn FileSystem>);

        let qcow =
            PathSpec::new(TypeIndicator::Qcow, Some(os_parent.clone()), PathSpecAttrs::default())
                .unwrap();
        let entry_fs = resolver::open_file_system(&qcow, &context).unwrap();
        let descriptor = entry_fs.lookup_entry(&qcow).unwrap().unwrap();
        let entry = FileEntry::new(entry_fs, qcow, descriptor);
        let mut object = entry.get_file_object().unwrap();
        assert_eq!(object.read(None).unwrap(), b"IMGDATA");
    }
}
