//! COMPRESSED_STREAM: a single-file back end that decompresses its parent stream using the
//! method named by the path spec's `compression_method` attribute.

use std::io::Read;
use std::rc::Rc;

use flate2::read::{DeflateDecoder, ZlibDecoder};

use crate::backends::SinglePayloadFileSystem;
use crate::error::{VfsError, VfsResult};
use crate::path_spec::PathSpec;
use crate::resolver::ResolverContext;
use crate::vfs::FileSystem;

pub fn open(spec: &PathSpec, context: &ResolverContext) -> VfsResult<Rc<dyn FileSystem>> {
    let parent = spec
        .parent()
        .ok_or_else(|| VfsError::BadPathSpec("COMPRESSED_STREAM requires a parent".into()))?;
    let method = spec.compression_method().ok_or_else(|| {
        VfsError::BadPathSpec("COMPRESSED_STREAM requires a compression_method attribute".into())
    })?;
    let compressed = super::read_parent_payload(parent, context)?;

    let plaintext = match method {
        "zlib" => {
            let mut decoder = ZlibDecoder::new(compressed.as_slice());
            let mut out = Vec::new();
            decoder
                .read_to_end(&mut out)
                .map_err(|err| VfsError::BackEndError(format!("zlib decompression failed: {err}")))?;
            out
        }
        "deflate" => {
            let mut decoder = DeflateDecoder::new(compressed.as_slice());
            let mut out = Vec::new();
            decoder.read_to_end(&mut out).map_err(|err| {
                VfsError::BackEndError(format!("deflate decompression failed: {err}"))
            })?;
            out
        }
        _ => return Err(VfsError::Unsupported("unrecognized compression method")),
    };

    Ok(Rc::new(SinglePayloadFileSystem::new(spec.type_indicator(), spec.clone(), plaintext)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::fake::FakeFileSystem;
    use crate::path_spec::{PathSpecAttrs, TypeIndicator};
    use crate::resolver;
    use crate::vfs::{FileEntry, FileEntryType};
    use flate2::write::ZlibEncoder;
    use flate2::Compression;
    use std::io::Write;

    #[test]
    fn decompresses_zlib_by_method_name() {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"compressed case notes").unwrap();
        let compressed = encoder.finish().unwrap();

        let fake = FakeFileSystem::new();
        fake.add_file_entry("/notes.zlib", FileEntryType::File, Some(compressed), None).unwrap();
        let fake: Rc<dyn FileSystem> = Rc::new(fake);
        let context = ResolverContext::new();
        let parent =
            PathSpec::new(TypeIndicator::Fake, None, PathSpecAttrs::with_location("/notes.zlib"))
                .unwrap();
        context.cache_file_system(&parent, fake);

        let attrs =
            PathSpecAttrs { compression_method: Some("zlib".into()), ..Default::default() };
        let spec =
            PathSpec::new(TypeIndicator::CompressedStream, Some(parent), attrs).unwrap();
        let fs = resolver::open_file_system(&spec, &context).unwrap();
        let descriptor = fs.lookup_entry(&spec).unwrap().unwrap();
        let entry = FileEntry::new(fs, spec, descriptor);
        let mut object = entry.get_file_object().unwrap();
        assert_eq!(object.read(None).unwrap(), b"compressed case notes");
    }

    #[test]
    fn unknown_method_is_unsupported() {
        let fake = FakeFileSystem::new();
        fake.add_file_entry("/x", FileEntryType::File, Some(Vec::new()), None).unwrap();
        let fake: Rc<dyn FileSystem> = Rc::new(fake);
        let context = ResolverContext::new();
        let parent =
            PathSpec::new(TypeIndicator::Fake, None, PathSpecAttrs::with_location("/x")).unwrap();
        context.cache_file_system(&parent, fake);

        let attrs = PathSpecAttrs { compression_method: Some("bz2".into()), ..Default::default() };
        let spec = PathSpec::new(TypeIndicator::CompressedStream, Some(parent), attrs).unwrap();
        let err = resolver::open_file_system(&spec, &context);
        assert!(matches!(err, Err(VfsError::Unsupported(_))));
    }
}
