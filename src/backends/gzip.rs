//! GZIP: a single-file back end that decompresses its parent stream with the real gzip codec
//! (`flate2`), projecting the decompressed bytes as its one entry.

use std::io::Read;
use std::rc::Rc;

use flate2::read::GzDecoder;

use crate::backends::SinglePayloadFileSystem;
use crate::error::{VfsError, VfsResult};
use crate::path_spec::PathSpec;
use crate::resolver::ResolverContext;
use crate::vfs::FileSystem;

pub fn open(spec: &PathSpec, context: &ResolverContext) -> VfsResult<Rc<dyn FileSystem>> {
    let parent =
        spec.parent().ok_or_else(|| VfsError::BadPathSpec("GZIP requires a parent".into()))?;
    let compressed = super::read_parent_payload(parent, context)?;

    let mut decoder = GzDecoder::new(compressed.as_slice());
    let mut plaintext = Vec::new();
    decoder
        .read_to_end(&mut plaintext)
        .map_err(|err| VfsError::BackEndError(format!("gzip decompression failed: {err}")))?;

    Ok(Rc::new(SinglePayloadFileSystem::new(spec.type_indicator(), spec.clone(), plaintext)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::fake::FakeFileSystem;
    use crate::path_spec::{PathSpecAttrs, TypeIndicator};
    use crate::resolver;
    use crate::vfs::{FileEntry, FileEntryType};
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    #[test]
    fn decompresses_a_real_gzip_stream() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"forensic evidence payload").unwrap();
        let compressed = encoder.finish().unwrap();

        let fake = FakeFileSystem::new();
        fake.add_file_entry("/evidence.gz", FileEntryType::File, Some(compressed), None).unwrap();
        let fake: Rc<dyn FileSystem> = Rc::new(fake);
        let context = ResolverContext::new();
        let parent =
            PathSpec::new(TypeIndicator::Fake, None, PathSpecAttrs::with_location("/evidence.gz"))
                .unwrap();
        context.cache_file_system(&parent, fake);

        let gzip_spec =
            PathSpec::new(TypeIndicator::Gzip, Some(parent), PathSpecAttrs::default()).unwrap();
        let fs = resolver::open_file_system(&gzip_spec, &context).unwrap();
        let descriptor = fs.lookup_entry(&gzip_spec).unwrap().unwrap();
        let entry = FileEntry::new(fs, gzip_spec, descriptor);
        let mut object = entry.get_file_object().unwrap();
        assert_eq!(object.read(None).unwrap(), b"forensic evidence payload");
    }
}
