//! # Containment and Evaluation Properties
//!
//! Property tests over randomly generated region codes and distributor
//! hierarchies. Segments are drawn from a tiny alphabet so that matches
//! and near-misses both occur often.

use proptest::prelude::*;

use territory_core::{
    is_subregion, DistributorGraph, PermissionKind, PermissionPolicy, RegionCode,
};

fn segment() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["A", "B", "C"]).prop_map(str::to_string)
}

fn segments(len: std::ops::RangeInclusive<usize>) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(segment(), len)
}

fn code_of(segs: &[String]) -> RegionCode {
    RegionCode::new(segs.join("-")).unwrap()
}

fn as_strs(segs: &[String]) -> Vec<&str> {
    segs.iter().map(String::as_str).collect()
}

proptest! {
    /// A country pattern matches exactly when the candidate ends in that country.
    #[test]
    fn country_pattern_matches_last_segment(candidate in segments(1..=3), country in segment()) {
        let c = as_strs(&candidate);
        let expected = candidate.last() == Some(&country);
        prop_assert_eq!(is_subregion(&c, &[country.as_str()]), expected);
    }

    /// A province pattern matches exactly when the candidate's last two segments equal it.
    #[test]
    fn province_pattern_matches_suffix(candidate in segments(1..=3), pattern in segments(2..=2)) {
        let c = as_strs(&candidate);
        let p = as_strs(&pattern);
        let expected = candidate.len() >= 2 && candidate[candidate.len() - 2..] == pattern[..];
        prop_assert_eq!(is_subregion(&c, &p), expected);
    }

    /// City patterns match only identical city candidates.
    #[test]
    fn city_pattern_is_exact(candidate in segments(1..=3), pattern in segments(3..=3)) {
        let c = as_strs(&candidate);
        let p = as_strs(&pattern);
        let matched = is_subregion(&c, &p);
        if candidate.len() < 3 {
            prop_assert!(!matched);
        } else {
            prop_assert_eq!(matched, candidate == pattern);
        }
    }

    /// Patterns longer than three segments never match.
    #[test]
    fn long_patterns_never_match(candidate in segments(1..=5), pattern in segments(4..=5)) {
        prop_assert!(!is_subregion(&as_strs(&candidate), &as_strs(&pattern)));
    }

    /// A matching exclude denies regardless of includes, at any depth.
    #[test]
    fn exclude_always_denies(
        region in segments(1..=3),
        include in segments(1..=3),
        exclude in segments(1..=3),
    ) {
        let region = code_of(&region);
        let exclude = code_of(&exclude);
        let policy = PermissionPolicy::default();

        let mut graph = DistributorGraph::new();
        let id = graph.add_distributor("root", None).unwrap();
        graph.add_permission(id, code_of(&include), PermissionKind::Include, &policy).unwrap();
        graph.add_permission(id, exclude.clone(), PermissionKind::Exclude, &policy).unwrap();

        if region.is_within(&exclude) {
            prop_assert!(!graph.has_permission(id, &region));
        }
    }

    /// A child is never authorized where its parent is not.
    #[test]
    fn child_never_exceeds_parent(
        parent_rules in prop::collection::vec((segments(1..=3), any::<bool>()), 0..6),
        child_rules in prop::collection::vec((segments(1..=3), any::<bool>()), 0..6),
        region in segments(1..=3),
    ) {
        let policy = PermissionPolicy::default();
        let mut graph = DistributorGraph::new();
        let parent = graph.add_distributor("parent", None).unwrap();
        let child = graph.add_distributor("child", Some("parent")).unwrap();

        for (segs, include) in &parent_rules {
            let kind = if *include { PermissionKind::Include } else { PermissionKind::Exclude };
            graph.add_permission(parent, code_of(segs), kind, &policy).unwrap();
        }
        for (segs, include) in &child_rules {
            let kind = if *include { PermissionKind::Include } else { PermissionKind::Exclude };
            // Rejected includes are fine; they just leave the child unchanged.
            let _ = graph.add_permission(child, code_of(segs), kind, &policy);
        }

        let region = code_of(&region);
        if graph.has_permission(child, &region) {
            prop_assert!(graph.has_permission(parent, &region));
        }
    }
}
