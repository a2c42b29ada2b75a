//! Analogous to [`super::partition_selector`] for VSHADOW: resolves which shadow store a path
//! spec names from `location` (`/vssN`) or `store_index`.

use crate::error::{VfsError, VfsResult};
use crate::path_spec::PathSpec;

pub fn select_store_index(spec: &PathSpec) -> VfsResult<Option<usize>> {
    let mut candidates: Vec<(&'static str, usize)> = Vec::new();

    if let Some(index) = location_index(spec.location()) {
        candidates.push(("location", index));
    }
    if let Some(index) = spec.store_index() {
        candidates.push(("store_index", index as usize));
    }

    let Some((_, first)) = candidates.first().copied() else { return Ok(None) };
    if candidates.iter().any(|(_, index)| *index != first) {
        return Err(VfsError::BadPathSpec(
            "shadow store selectors (location/store_index) disagree".into(),
        ));
    }
    Ok(Some(first))
}

fn location_index(location: Option<&str>) -> Option<usize> {
    location?.strip_prefix("/vss")?.parse::<u64>().ok().map(|n| n.saturating_sub(1) as usize)
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
    fn location_selects_zero_based_store_index() {
        let attrs = PathSpecAttrs { location: Some("/vss3".into()), ..Default::default() };
        let spec = PathSpec::new(TypeIndicator::Vshadow, Some(raw_parent()), attrs).unwrap();
        assert_eq!(select_store_index(&spec).unwrap(), Some(2));
    }

    #[test]
    fn disagreeing_selectors_are_rejected() {
        let attrs = PathSpecAttrs {
            location: Some("/vss1".into()),
            store_index: Some(5),
            ..Default::default()
        };
        let spec = PathSpec::new(TypeIndicator::Vshadow, Some(raw_parent()), attrs).unwrap();
        let err = select_store_index(&spec);
        assert!(matches!(err, Err(VfsError::BadPathSpec(_))));
    }
}
