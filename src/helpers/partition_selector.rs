//! Given a TSK_PARTITION path spec, decides which partition it names by consulting `location`
//! (`/pN`), `part_index`, or `start_offset`, in that priority. Returns `None` when the spec
//! carries none of the three (it names the partition table's virtual root), and fails when two
//! selectors are both present but disagree.

use crate::adapter::ContainerEntry;
use crate::error::{VfsError, VfsResult};
use crate::path_spec::PathSpec;

pub fn select_partition_index(
    spec: &PathSpec,
    entries: &[ContainerEntry],
) -> VfsResult<Option<usize>> {
    let mut candidates: Vec<(&'static str, usize)> = Vec::new();

    if let Some(index) = location_index(spec.location()) {
        candidates.push(("location", index));
    }
    if let Some(index) = spec.part_index() {
        candidates.push(("part_index", index as usize));
    }
    if let Some(offset) = spec.start_offset() {
        if let Some(position) = entries.iter().position(|entry| entry.offset == offset) {
            candidates.push(("start_offset", position));
        }
    }

    let Some((_, first)) = candidates.first().copied() else { return Ok(None) };
    if candidates.iter().any(|(_, index)| *index != first) {
        return Err(VfsError::BadPathSpec(
            "partition selectors (location/part_index/start_offset) disagree".into(),
        ));
    }
    Ok(Some(first))
}

fn location_index(location: Option<&str>) -> Option<usize> {
    location?.strip_prefix("/p")?.parse::<u64>().ok().map(|n| n.saturating_sub(1) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path_spec::{PathSpecAttrs, TypeIndicator};

    fn raw_parent() -> PathSpec {
        PathSpec::new(
            TypeIndicator::Raw,
            Some(
                PathSpec::new(TypeIndicator::Os, None, PathSpecAttrs::with_location("disk.dd"))
                    .unwrap(),
            ),
            PathSpecAttrs::default(),
        )
        .unwrap()
    }

    #[test]
    fn location_selects_zero_based_index() {
        let attrs = PathSpecAttrs { location: Some("/p2".into()), ..Default::default() };
        let spec =
            PathSpec::new(TypeIndicator::TskPartition, Some(raw_parent()), attrs).unwrap();
        assert_eq!(select_partition_index(&spec, &[]).unwrap(), Some(1));
    }

    #[test]
    fn no_selector_means_the_table_root() {
        let spec = PathSpec::new(
            TypeIndicator::TskPartition,
            Some(raw_parent()),
            PathSpecAttrs::default(),
        )
        .unwrap();
        assert_eq!(select_partition_index(&spec, &[]).unwrap(), None);
    }

    #[test]
    fn agreeing_location_and_part_index_is_accepted() {
        let attrs = PathSpecAttrs {
            location: Some("/p1".into()),
            part_index: Some(0),
            ..Default::default()
        };
        let spec =
            PathSpec::new(TypeIndicator::TskPartition, Some(raw_parent()), attrs).unwrap();
        assert_eq!(select_partition_index(&spec, &[]).unwrap(), Some(0));
    }
}
