//! Path-specification algebra: immutable, recursive addresses naming a location inside a
//! (possibly deep) stack of storage containers.
//!
//! A [`PathSpec`] is a value type, never mutated after construction. Equality, hashing, and
//! resolver/keychain cache keys are all defined in terms of [`PathSpec::comparable`].

mod factory;

use std::fmt::Write as _;
use std::sync::Arc;

use crate::error::{VfsError, VfsResult};

pub use factory::Factory;

/// Closed set of back-end variants (SPEC_FULL.md §6).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TypeIndicator {
    Os,
    Fake,
    Mount,
    Raw,
    Qcow,
    Vhdi,
    Vmdk,
    Ewf,
    Bde,
    Tsk,
    TskPartition,
    Vshadow,
    Gzip,
    Tar,
    Zip,
    Cpio,
    CompressedStream,
    EncodedStream,
    DataRange,
}

impl TypeIndicator {
    /// The canonical string constant used in `comparable` output and factory registration.
    pub fn as_str(self) -> &'static str {
        match self {
            TypeIndicator::Os => "OS",
            TypeIndicator::Fake => "FAKE",
            TypeIndicator::Mount => "MOUNT",
            TypeIndicator::Raw => "RAW",
            TypeIndicator::Qcow => "QCOW",
            TypeIndicator::Vhdi => "VHDI",
            TypeIndicator::Vmdk => "VMDK",
            TypeIndicator::Ewf => "EWF",
            TypeIndicator::Bde => "BDE",
            TypeIndicator::Tsk => "TSK",
            TypeIndicator::TskPartition => "TSK_PARTITION",
            TypeIndicator::Vshadow => "VSHADOW",
            TypeIndicator::Gzip => "GZIP",
            TypeIndicator::Tar => "TAR",
            TypeIndicator::Zip => "ZIP",
            TypeIndicator::Cpio => "CPIO",
            TypeIndicator::CompressedStream => "COMPRESSED_STREAM",
            TypeIndicator::EncodedStream => "ENCODED_STREAM",
            TypeIndicator::DataRange => "DATA_RANGE",
        }
    }

    /// Whether this variant must be constructed without a parent.
    pub fn is_leaf(self) -> bool {
        matches!(self, TypeIndicator::Os | TypeIndicator::Fake | TypeIndicator::Mount)
    }
}

/// A single variant-specific attribute value.
///
/// Kept deliberately small: the factory and each variant constructor translate between this
/// loosely-typed bag (used when parsing externally-supplied descriptors) and the strongly-typed
/// fields on [`PathSpec`].
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Text(String),
    Integer(i64),
}

/// An immutable, recursive path specification.
///
/// Cloning a `PathSpec` is cheap: the parent chain is shared via [`Arc`].
#[derive(Debug, Clone, PartialEq)]
pub struct PathSpec {
    inner: Arc<Inner>,
}

#[derive(Debug, PartialEq)]
struct Inner {
    type_indicator: TypeIndicator,
    parent: Option<PathSpec>,
    location: Option<String>,
    inode: Option<u64>,
    part_index: Option<u64>,
    start_offset: Option<u64>,
    store_index: Option<u64>,
    encoding_method: Option<String>,
    compression_method: Option<String>,
    range_offset: Option<u64>,
    range_size: Option<u64>,
}

/// Builder-style attribute set accepted by [`PathSpec::new`] and the [`Factory`].
#[derive(Debug, Clone, Default)]
pub struct PathSpecAttrs {
    pub location: Option<String>,
    pub inode: Option<u64>,
    pub part_index: Option<u64>,
    pub start_offset: Option<u64>,
    pub store_index: Option<u64>,
    pub encoding_method: Option<String>,
    pub compression_method: Option<String>,
    pub range_offset: Option<u64>,
    pub range_size: Option<u64>,
}

impl PathSpecAttrs {
    pub fn with_location(location: impl Into<String>) -> Self {
        Self { location: Some(location.into()), ..Default::default() }
    }
}

impl PathSpec {
    /// Construct a path spec, enforcing the leaf/parent invariant and the required attributes
    /// per variant (SPEC_FULL.md §4.1).
    pub fn new(
        type_indicator: TypeIndicator,
        parent: Option<PathSpec>,
        attrs: PathSpecAttrs,
    ) -> VfsResult<Self> {
        if type_indicator.is_leaf() && parent.is_some() {
            return Err(VfsError::BadPathSpec(format!(
                "{} is a leaf variant and must not have a parent",
                type_indicator.as_str()
            )));
        }
        if !type_indicator.is_leaf() && parent.is_none() {
            return Err(VfsError::BadPathSpec(format!(
                "{} requires a parent",
                type_indicator.as_str()
            )));
        }

        if type_indicator == TypeIndicator::EncodedStream && attrs.encoding_method.is_none() {
            return Err(VfsError::BadPathSpec(
                "ENCODED_STREAM requires an encoding_method attribute".into(),
            ));
        }
        if type_indicator == TypeIndicator::CompressedStream && attrs.compression_method.is_none()
        {
            return Err(VfsError::BadPathSpec(
                "COMPRESSED_STREAM requires a compression_method attribute".into(),
            ));
        }
        if type_indicator == TypeIndicator::DataRange
            && (attrs.range_offset.is_none() || attrs.range_size.is_none())
        {
            return Err(VfsError::BadPathSpec(
                "DATA_RANGE requires range_offset and range_size attributes".into(),
            ));
        }
        if type_indicator == TypeIndicator::TskPartition {
            check_partition_attrs_consistent(&attrs)?;
        }

        Ok(PathSpec {
            inner: Arc::new(Inner {
                type_indicator,
                parent,
                location: attrs.location,
                inode: attrs.inode,
                part_index: attrs.part_index,
                start_offset: attrs.start_offset,
                store_index: attrs.store_index,
                encoding_method: attrs.encoding_method,
                compression_method: attrs.compression_method,
                range_offset: attrs.range_offset,
                range_size: attrs.range_size,
            }),
        })
    }

    pub fn type_indicator(&self) -> TypeIndicator {
        self.inner.type_indicator
    }

    pub fn parent(&self) -> Option<&PathSpec> {
        self.inner.parent.as_ref()
    }

    pub fn location(&self) -> Option<&str> {
        self.inner.location.as_deref()
    }

    pub fn inode(&self) -> Option<u64> {
        self.inner.inode
    }

    pub fn part_index(&self) -> Option<u64> {
        self.inner.part_index
    }

    pub fn start_offset(&self) -> Option<u64> {
        self.inner.start_offset
    }

    pub fn store_index(&self) -> Option<u64> {
        self.inner.store_index
    }

    pub fn encoding_method(&self) -> Option<&str> {
        self.inner.encoding_method.as_deref()
    }

    pub fn compression_method(&self) -> Option<&str> {
        self.inner.compression_method.as_deref()
    }

    pub fn range_offset(&self) -> Option<u64> {
        self.inner.range_offset
    }

    pub fn range_size(&self) -> Option<u64> {
        self.inner.range_size
    }

    /// Canonical, sorted, line-oriented textual identity of this spec's chain.
    ///
    /// Used for equality, hashing, and resolver/keychain cache keys (SPEC_FULL.md §4.1, §6).
    pub fn comparable(&self) -> String {
        let mut out = String::new();
        self.write_comparable(&mut out);
        out
    }

    fn write_comparable(&self, out: &mut String) {
        if let Some(parent) = self.parent() {
            parent.write_comparable(out);
        }

        let mut fields = Vec::new();
        // location is always first when present, then numeric selectors, then offsets, per
        // the canonical per-variant ordering documented in SPEC_FULL.md §4.1.
        if let Some(location) = self.location() {
            fields.push(format!("location: {location}"));
        }
        if let Some(inode) = self.inode() {
            fields.push(format!("inode: {inode}"));
        }
        if let Some(part_index) = self.part_index() {
            fields.push(format!("part_index: {part_index}"));
        }
        if let Some(store_index) = self.store_index() {
            fields.push(format!("store_index: {store_index}"));
        }
        if let Some(method) = self.encoding_method() {
            fields.push(format!("encoding_method: {method}"));
        }
        if let Some(method) = self.compression_method() {
            fields.push(format!("compression_method: {method}"));
        }
        if let Some(offset) = self.range_offset() {
            fields.push(format!("range_offset: 0x{offset:08x}"));
        }
        if let Some(size) = self.range_size() {
            fields.push(format!("range_size: 0x{size:08x}"));
        }
        if let Some(start_offset) = self.start_offset() {
            fields.push(format!("start_offset: 0x{start_offset:08x}"));
        }

        write!(out, "type: {}", self.type_indicator().as_str()).expect("String write never fails");
        for field in &fields {
            write!(out, ", {field}").expect("String write never fails");
        }
        out.push('\n');
    }
}

fn check_partition_attrs_consistent(attrs: &PathSpecAttrs) -> VfsResult<()> {
    // Open question resolved in SPEC_FULL.md §9: `location` wins when both are given and
    // agree; disagreement is rejected outright rather than silently preferring one.
    let location_index = attrs
        .location
        .as_deref()
        .and_then(|loc| loc.strip_prefix("/p"))
        .and_then(|n| n.parse::<u64>().ok())
        .map(|n| n.saturating_sub(1));

    if let (Some(from_location), Some(explicit)) = (location_index, attrs.part_index) {
        if from_location != explicit {
            return Err(VfsError::BadPathSpec(format!(
                "location {:?} disagrees with part_index {}",
                attrs.location, explicit
            )));
        }
    }
    Ok(())
}
