//! Registers each [`super::TypeIndicator`] variant with a constructor so that callers can build
//! a [`super::PathSpec`] from a type-indicator string plus a variant-tagged attribute map,
//! without depending on every back end's constructor directly.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::error::VfsError;

use super::{PathSpec, PathSpecAttrs, TypeIndicator};

type Constructor = fn(Option<PathSpec>, PathSpecAttrs) -> crate::error::VfsResult<PathSpec>;

/// Registry mapping a type-indicator string to its [`PathSpec`] constructor.
pub struct Factory {
    constructors: HashMap<&'static str, Constructor>,
}

impl Factory {
    /// The process-wide factory instance.
    pub fn global() -> &'static Factory {
        static INSTANCE: OnceLock<Factory> = OnceLock::new();
        INSTANCE.get_or_init(|| {
            let mut constructors: HashMap<&'static str, Constructor> = HashMap::new();
            for (indicator, ctor) in REGISTRY {
                constructors.insert(indicator.as_str(), *ctor);
            }
            Factory { constructors }
        })
    }

    /// Construct a [`PathSpec`] for the given type-indicator string.
    ///
    /// Fails with [`VfsError::BadPathSpec`] when the indicator is not registered (an unknown
    /// variant) or when the variant's own constraints reject the parent/attrs combination.
    pub fn create(
        &self,
        type_indicator: &str,
        parent: Option<PathSpec>,
        attrs: PathSpecAttrs,
    ) -> crate::error::VfsResult<PathSpec> {
        let ctor = self.constructors.get(type_indicator).ok_or_else(|| {
            VfsError::BadPathSpec(format!("unknown type indicator: {type_indicator}"))
        })?;
        ctor(parent, attrs)
    }
}

macro_rules! ctor_for {
    ($name:ident, $indicator:expr) => {
        fn $name(
            parent: Option<PathSpec>,
            attrs: PathSpecAttrs,
        ) -> crate::error::VfsResult<PathSpec> {
            PathSpec::new($indicator, parent, attrs)
        }
    };
}

ctor_for!(construct_os, TypeIndicator::Os);
ctor_for!(construct_fake, TypeIndicator::Fake);
ctor_for!(construct_mount, TypeIndicator::Mount);
ctor_for!(construct_raw, TypeIndicator::Raw);
ctor_for!(construct_qcow, TypeIndicator::Qcow);
ctor_for!(construct_vhdi, TypeIndicator::Vhdi);
ctor_for!(construct_vmdk, TypeIndicator::Vmdk);
ctor_for!(construct_ewf, TypeIndicator::Ewf);
ctor_for!(construct_bde, TypeIndicator::Bde);
ctor_for!(construct_tsk, TypeIndicator::Tsk);
ctor_for!(construct_tsk_partition, TypeIndicator::TskPartition);
ctor_for!(construct_vshadow, TypeIndicator::Vshadow);
ctor_for!(construct_gzip, TypeIndicator::Gzip);
ctor_for!(construct_tar, TypeIndicator::Tar);
ctor_for!(construct_zip, TypeIndicator::Zip);
ctor_for!(construct_cpio, TypeIndicator::Cpio);
ctor_for!(construct_compressed_stream, TypeIndicator::CompressedStream);
ctor_for!(construct_encoded_stream, TypeIndicator::EncodedStream);
ctor_for!(construct_data_range, TypeIndicator::DataRange);

const REGISTRY: &[(TypeIndicator, Constructor)] = &[
    (TypeIndicator::Os, construct_os),
    (TypeIndicator::Fake, construct_fake),
    (TypeIndicator::Mount, construct_mount),
    (TypeIndicator::Raw, construct_raw),
    (TypeIndicator::Qcow, construct_qcow),
    (TypeIndicator::Vhdi, construct_vhdi),
    (TypeIndicator::Vmdk, construct_vmdk),
    (TypeIndicator::Ewf, construct_ewf),
    (TypeIndicator::Bde, construct_bde),
    (TypeIndicator::Tsk, construct_tsk),
    (TypeIndicator::TskPartition, construct_tsk_partition),
    (TypeIndicator::Vshadow, construct_vshadow),
    (TypeIndicator::Gzip, construct_gzip),
    (TypeIndicator::Tar, construct_tar),
    (TypeIndicator::Zip, construct_zip),
    (TypeIndicator::Cpio, construct_cpio),
    (TypeIndicator::CompressedStream, construct_compressed_stream),
    (TypeIndicator::EncodedStream, construct_encoded_stream),
    (TypeIndicator::DataRange, construct_data_range),
];
