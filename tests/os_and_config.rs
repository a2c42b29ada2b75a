//! Integration coverage for the OS back end against a real temporary directory, and for loading
//! a [`dfvfs_rs::ResolverConfig`] end to end into a working mount point.

use std::io::Write;

use dfvfs_rs::path_spec::{PathSpecAttrs, TypeIndicator};
use dfvfs_rs::{PathSpec, ResolverConfig, ResolverContext};

#[test]
fn os_back_end_reads_a_real_file_through_the_resolver() {
    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("evidence.txt");
    std::fs::File::create(&file_path).unwrap().write_all(b"chain of custody").unwrap();

    let context = ResolverContext::new();
    let spec = PathSpec::new(
        TypeIndicator::Os,
        None,
        PathSpecAttrs::with_location(file_path.to_string_lossy().into_owned()),
    )
    .unwrap();

    let entry = dfvfs_rs::resolver::get_root_file_entry(&spec, &context).unwrap();
    let mut object = entry.get_file_object().unwrap();
    assert_eq!(object.read(None).unwrap(), b"chain of custody");
}

#[test]
fn config_mount_point_resolves_to_the_registered_os_file_via_mount_back_end() {
    let dir = tempfile::tempdir().unwrap();
    let image_path = dir.path().join("case-17.img");
    std::fs::write(&image_path, b"disk image bytes").unwrap();

    let toml = format!(
        "retention_capacity = 2\n\n[mount_roots]\nevidence = {:?}\n",
        image_path.to_string_lossy()
    );
    let config = ResolverConfig::from_toml_str(&toml).unwrap();
    let context = config.build_context().unwrap();

    let mount_spec = PathSpec::new(
        TypeIndicator::Mount,
        None,
        PathSpecAttrs::with_location("evidence"),
    )
    .unwrap();
    let fs = dfvfs_rs::resolver::open_file_system(&mount_spec, &context).unwrap();

    let file_spec = PathSpec::new(
        TypeIndicator::Os,
        None,
        PathSpecAttrs::with_location(image_path.to_string_lossy().into_owned()),
    )
    .unwrap();
    let descriptor = fs.lookup_entry(&file_spec).unwrap().unwrap();
    let entry = dfvfs_rs::FileEntry::new(fs, file_spec, descriptor);
    let mut object = entry.get_file_object().unwrap();
    assert_eq!(object.read(None).unwrap(), b"disk image bytes");
}
