//! Reuse and invalidation of materialized query results.

use crate::common::*;
use castor::{CasConfig, FlattenConfig, TypeTable};

#[test]
fn repeated_query_hits_cache() {
    let (mut cas, t) = empty_cas();
    for i in 0..10 {
        cas.create_and_add_annotation(t.token, i, i + 2).unwrap();
    }
    let count = |cas: &castor::Cas| {
        cas.select(t.token)
            .unwrap()
            .covered_by_span(2, 8)
            .count()
            .unwrap()
    };
    assert_eq!(count(&cas), 5);
    let misses = cas.flat_cache().misses();
    assert_eq!(count(&cas), 5);
    assert_eq!(cas.flat_cache().misses(), misses);
    assert!(cas.flat_cache().hits() >= 1);

    cas.create_and_add_annotation(t.token, 3, 4).unwrap();
    assert_eq!(count(&cas), 6);
    assert_eq!(cas.flat_cache().misses(), misses + 1);
}

#[test]
fn removal_invalidates() {
    let (mut cas, t) = empty_cas();
    let a = cas.create_and_add_annotation(t.token, 0, 2).unwrap();
    cas.create_and_add_annotation(t.token, 2, 4).unwrap();
    let select = |cas: &castor::Cas| cas.select(t.token).unwrap().non_overlapping().count().unwrap();
    assert_eq!(select(&cas), 2);
    cas.remove_fs(&a);
    assert_eq!(select(&cas), 1);
    assert!(!cas.is_indexed(&a));
    assert!(cas.get_fs(a.id()).is_some());
}

#[test]
fn disabled_cache_never_hits() {
    let config = CasConfig {
        flatten: FlattenConfig {
            enabled: false,
            max_entries: 4,
        },
        ..CasConfig::default()
    };
    let (mut cas, t) = empty_cas_with(&config);
    cas.create_and_add_annotation(t.token, 0, 2).unwrap();
    for _ in 0..3 {
        assert_eq!(
            cas.select(TypeTable::ANNOTATION)
                .unwrap()
                .covered_by_span(0, 5)
                .count()
                .unwrap(),
            1
        );
    }
    assert_eq!(cas.flat_cache().hits(), 0);
    assert!(cas.flat_cache().is_empty());
}

#[test]
fn bounded_cache_stays_within_limit() {
    let config = CasConfig {
        flatten: FlattenConfig {
            enabled: true,
            max_entries: 4,
        },
        ..CasConfig::default()
    };
    let (mut cas, t) = empty_cas_with(&config);
    for i in 0..20 {
        cas.create_and_add_annotation(t.token, i, i + 1).unwrap();
    }
    for i in 0..12 {
        let n = cas.select(t.token).unwrap().start_at(i).count().unwrap();
        assert_eq!(n, 20 - i as usize);
        assert!(cas.flat_cache().len() <= 4);
    }
}

#[test]
fn reset_clears_cache() {
    let (mut cas, t) = empty_cas();
    cas.create_and_add_annotation(t.token, 0, 2).unwrap();
    cas.select(t.token).unwrap().covered_by_span(0, 3).count().unwrap();
    assert!(!cas.flat_cache().is_empty());
    cas.reset();
    assert!(cas.flat_cache().is_empty());
    assert_eq!(cas.select(t.token).unwrap().covered_by_span(0, 3).count().unwrap(), 0);
}
