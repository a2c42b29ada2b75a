//! ENCODED_STREAM: a single-file back end that decodes its parent stream using the scheme named
//! by the path spec's `encoding_method` attribute. Only `base16` (hex) is implemented — enough
//! to exercise the decoding seam without pulling in a codec crate the rest of the stack has no
//! other use for.

use std::rc::Rc;

use crate::backends::SinglePayloadFileSystem;
use crate::error::{VfsError, VfsResult};
use crate::path_spec::PathSpec;
use crate::resolver::ResolverContext;
use crate::vfs::FileSystem;

fn decode_base16(data: &[u8]) -> VfsResult<Vec<u8>> {
    if data.len() % 2 != 0 {
        return Err(VfsError::BackEndError("base16 stream has odd length".into()));
    }
    data.chunks(2)
        .map(|pair| {
            let text = std::str::from_utf8(pair)
                .map_err(|_| VfsError::BackEndError("base16 stream is not ASCII".into()))?;
            u8::from_str_radix(text, 16)
                .map_err(|_| VfsError::BackEndError("invalid base16 digit".into()))
        })
        .collect()
}

pub fn open(spec: &PathSpec, context: &ResolverContext) -> VfsResult<Rc<dyn FileSystem>> {
    let parent = spec
        .parent()
        .ok_or_else(|| VfsError::BadPathSpec("ENCODED_STREAM requires a parent".into()))?;
    let method = spec.encoding_method().ok_or_else(|| {
        VfsError::BadPathSpec("ENCODED_STREAM requires an encoding_method attribute".into())
    })?;
    let encoded = super::read_parent_payload(parent, context)?;

    let decoded = match method {
        "base16" => decode_base16(&encoded)?,
        _ => return Err(VfsError::Unsupported("unrecognized encoding method")),
    };

    Ok(Rc::new(SinglePayloadFileSystem::new(spec.type_indicator(), spec.clone(), decoded)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::fake::FakeFileSystem;
    use crate::path_spec::{PathSpecAttrs, TypeIndicator};
    use crate::resolver;
    use crate::vfs::{FileEntry, FileEntryType};

    #[test]
    fn decodes_base16() {
        let fake = FakeFileSystem::new();
        fake.add_file_entry("/x.hex", FileEntryType::File, Some(b"68656c6c6f".to_vec()), None)
            .unwrap();
        let fake: Rc<dyn FileSystem> = Rc::new(fake);
        let context = ResolverContext::new();
        let parent =
            PathSpec::new(TypeIndicator::Fake, None, PathSpecAttrs::with_location("/x.hex"))
                .unwrap();
        context.cache_file_system(&parent, fake);

        let attrs = PathSpecAttrs { encoding_method: Some("base16".into()), ..Default::default() };
        let spec = PathSpec::new(TypeIndicator::EncodedStream, Some(parent), attrs).unwrap();
        let fs = resolver::open_file_system(&spec, &context).unwrap();
        let descriptor = fs.lookup_entry(&spec).unwrap().unwrap();
        let entry = FileEntry::new(fs, spec, descriptor);
        let mut object = entry.get_file_object().unwrap();
        assert_eq!(object.read(None).unwrap(), b"hello");
    }

    #[test]
    fn odd_length_base16_is_a_back_end_error() {
        let fake = FakeFileSystem::new();
        fake.add_file_entry("/x.hex", FileEntryType::File, Some(b"abc".to_vec()), None).unwrap();
        let fake: Rc<dyn FileSystem> = Rc::new(fake);
        let context = ResolverContext::new();
        let parent =
            PathSpec::new(TypeIndicator::Fake, None, PathSpecAttrs::with_location("/x.hex"))
                .unwrap();
        context.cache_file_system(&parent, fake);

        let attrs = PathSpecAttrs { encoding_method: Some("base16".into()), ..Default::default() };
        let spec = PathSpec::new(TypeIndicator::EncodedStream, Some(parent), attrs).unwrap();
        let err = resolver::open_file_system(&spec, &context);
        assert!(matches!(err, Err(VfsError::BackEndError(_))));
    }
}
