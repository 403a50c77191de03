//! Randomized checks of the query semantics against brute-force scans.

use crate::common::*;
use castor::{Cas, FsRef, TypeTable};
use proptest::prelude::*;
use std::cmp::Reverse;

fn spans_strategy() -> impl Strategy<Value = Vec<(i32, i32, bool)>> {
    prop::collection::vec((0i32..50, 0i32..15, any::<bool>()), 0..40)
}

fn populated(spans: &[(i32, i32, bool)]) -> (Cas, Types) {
    let (mut cas, t) = empty_cas();
    for &(begin, len, sentence) in spans {
        let ty = if sentence { t.sentence } else { t.token };
        cas.create_and_add_annotation(ty, begin, begin + len).unwrap();
    }
    (cas, t)
}

fn brute_force(cas: &Cas, keep: impl Fn(&FsRef) -> bool) -> Vec<FsRef> {
    let mut all: Vec<FsRef> = cas
        .annotation_index()
        .cursor()
        .filter(|fs| keep(fs))
        .collect();
    all.sort_by_key(|fs| (fs.begin(), Reverse(fs.end()), fs.id()));
    all
}

fn ids(records: &[FsRef]) -> Vec<u64> {
    records.iter().map(|fs| fs.id().as_u64()).collect()
}

proptest! {
    #[test]
    fn index_is_in_annotation_order(spans in spans_strategy()) {
        let (cas, _) = populated(&spans);
        let all = cas.annotation_index().cursor().to_vec();
        prop_assert_eq!(all.len(), spans.len());
        for pair in all.windows(2) {
            let a = (pair[0].begin(), Reverse(pair[0].end()), pair[0].id());
            let b = (pair[1].begin(), Reverse(pair[1].end()), pair[1].id());
            prop_assert!(a < b);
        }
    }

    #[test]
    fn covered_by_matches_scan(spans in spans_strategy(), lo in 0i32..50, len in 0i32..30) {
        let (cas, _) = populated(&spans);
        let hi = lo + len;
        let select = || cas.select(TypeTable::ANNOTATION).unwrap().covered_by_span(lo, hi);

        let strict = brute_force(&cas, |fs| fs.begin() >= lo && fs.end() <= hi);
        prop_assert_eq!(ids(&select().to_vec().unwrap()), ids(&strict));

        let permissive = brute_force(&cas, |fs| fs.begin() >= lo && fs.begin() <= hi);
        prop_assert_eq!(
            ids(&select().include_annotations_with_end_beyond_bounds().to_vec().unwrap()),
            ids(&permissive)
        );

        let mut backwards = select().backwards().to_vec().unwrap();
        backwards.reverse();
        prop_assert_eq!(ids(&backwards), ids(&strict));
    }

    #[test]
    fn non_overlapping_is_greedy(spans in spans_strategy()) {
        let (cas, t) = populated(&spans);
        let result = cas.select(t.token).unwrap().non_overlapping().to_vec().unwrap();

        let mut expected = Vec::new();
        let mut reach = None;
        for fs in brute_force(&cas, |fs| fs.type_id() == t.token) {
            if reach.map_or(true, |r| fs.begin() >= r) {
                reach = Some(fs.end());
                expected.push(fs);
            }
        }
        prop_assert_eq!(ids(&result), ids(&expected));
        for pair in result.windows(2) {
            prop_assert!(pair[1].begin() >= pair[0].end());
        }
    }

    #[test]
    fn positional_modes_partition(spans in spans_strategy(), begin in 0i32..50, len in 0i32..15) {
        let (cas, _) = populated(&spans);
        let end = begin + len;
        let select = || cas.select(TypeTable::ANNOTATION).unwrap();
        let following = select().following_span(begin, end).count().unwrap();
        let preceding = select().preceding_span(begin, end).count().unwrap();
        let at = select().at_span(begin, end).count().unwrap();
        prop_assert_eq!(following + preceding + at, spans.len());
    }

    #[test]
    fn skip_and_limit_slice_results(spans in spans_strategy(), skip in 0usize..45, limit in 0usize..45) {
        let (cas, _) = populated(&spans);
        let all = cas.select(TypeTable::ANNOTATION).unwrap().to_vec().unwrap();
        let sliced = cas
            .select(TypeTable::ANNOTATION)
            .unwrap()
            .skip(skip)
            .limit(limit)
            .to_vec()
            .unwrap();
        let expected: Vec<FsRef> = all.into_iter().skip(skip).take(limit).collect();
        prop_assert_eq!(ids(&sliced), ids(&expected));
    }

    #[test]
    fn remove_all_empties_indexes(spans in spans_strategy()) {
        let (mut cas, t) = populated(&spans);
        let all = cas.annotation_index().cursor().to_vec();
        for fs in &all {
            prop_assert_eq!(cas.remove_fs(fs), 1);
        }
        prop_assert!(cas.annotation_index().is_empty());
        prop_assert_eq!(cas.select(t.sentence).unwrap().covered_by_span(0, 100).count().unwrap(), 0);
        prop_assert_eq!(cas.len(), spans.len());
    }

    #[test]
    fn seek_lands_on_first_equal_key(spans in spans_strategy(), pick in any::<prop::sample::Index>()) {
        prop_assume!(!spans.is_empty());
        let (cas, _) = populated(&spans);
        let all = cas.annotation_index().cursor().to_vec();
        let target = pick.get(&all);
        let key = |fs: &FsRef| (fs.begin(), Reverse(fs.end()));

        let mut cursor = cas.annotation_index().cursor();
        cursor.move_to(target);
        let pos = cursor.position().unwrap();
        prop_assert_eq!(key(cursor.get().unwrap()), key(target));
        prop_assert!(all[..pos].iter().all(|fs| key(fs) < key(target)));
    }

    #[test]
    fn forward_and_backward_traversal_agree(spans in spans_strategy()) {
        let (cas, _) = populated(&spans);
        let mut cursor = cas.annotation_index().cursor();
        let forward = cursor.to_vec();

        let mut backward = Vec::new();
        cursor.move_to_last();
        while cursor.is_valid() {
            backward.push(cursor.get().unwrap().clone());
            cursor.move_to_previous().unwrap();
        }
        backward.reverse();
        prop_assert_eq!(ids(&backward), ids(&forward));
        prop_assert!(cursor.move_to_previous().unwrap_err().is_invalid_position());
    }
}
