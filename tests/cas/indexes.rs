//! Configured sorted, set and bag indexes next to the annotation index.

use crate::common::*;
use castor::{
    CasConfig, Direction, Error, FeatureValue, IndexConfig, IndexDefinition, IndexKeyConfig,
    IndexKind, SortKey, ANNOTATION_INDEX,
};

fn lemma_config() -> CasConfig {
    let by_lemma = |label: &str, kind, direction| IndexConfig {
        label: label.to_string(),
        type_name: "Token".to_string(),
        kind,
        keys: vec![IndexKeyConfig {
            feature: "lemma".to_string(),
            direction,
        }],
    };
    CasConfig {
        indexes: vec![
            by_lemma("lemma-sorted", IndexKind::Sorted, Direction::Descending),
            by_lemma("lemma-set", IndexKind::Set, Direction::Ascending),
            IndexConfig {
                label: "token-bag".to_string(),
                type_name: "Token".to_string(),
                kind: IndexKind::Bag,
                keys: Vec::new(),
            },
        ],
        ..CasConfig::default()
    }
}

fn lemmas(records: &[castor::FsRef]) -> Vec<String> {
    records
        .iter()
        .map(|fs| {
            fs.feature("lemma")
                .and_then(FeatureValue::as_str)
                .unwrap_or_default()
                .to_string()
        })
        .collect()
}

fn add_token(cas: &mut castor::Cas, t: Types, begin: i32, lemma: &str) -> castor::FsRef {
    let fs = cas
        .create(t.token)
        .span(begin, begin + 1)
        .feature("lemma", lemma)
        .build()
        .unwrap();
    cas.add_fs(&fs);
    fs
}

#[test]
fn sorted_set_and_bag_orders() {
    let (mut cas, t) = empty_cas_with(&lemma_config());
    for (begin, lemma) in [(0, "walk"), (1, "run"), (2, "walk"), (3, "be")] {
        add_token(&mut cas, t, begin, lemma);
    }

    let sorted = cas.index("lemma-sorted").unwrap().cursor().to_vec();
    assert_eq!(lemmas(&sorted), vec!["walk", "walk", "run", "be"]);
    assert!(sorted[0].id() < sorted[1].id());

    let set = cas.index("lemma-set").unwrap().cursor().to_vec();
    assert_eq!(lemmas(&set), vec!["be", "run", "walk"]);
    assert_eq!(set[2].begin(), 0);

    let bag = cas.index("token-bag").unwrap().cursor().to_vec();
    assert_eq!(lemmas(&bag), vec!["walk", "run", "walk", "be"]);

    assert_eq!(cas.annotation_index().len(), 4);
    assert_eq!(cas.index(ANNOTATION_INDEX).unwrap().len(), 4);
}

#[test]
fn set_removal_frees_key() {
    let (mut cas, t) = empty_cas_with(&lemma_config());
    let first = add_token(&mut cas, t, 0, "walk");
    let second = add_token(&mut cas, t, 1, "walk");
    let set = || cas.index("lemma-set").unwrap();
    assert!(set().contains(&first));
    assert!(!set().contains(&second));

    assert_eq!(cas.remove_fs(&first), 4);
    assert_eq!(cas.add_fs(&second), 1);
    assert!(cas.index("lemma-set").unwrap().contains(&second));
}

#[test]
fn bag_answers_only_unbounded_queries() {
    let (mut cas, t) = empty_cas_with(&lemma_config());
    add_token(&mut cas, t, 0, "walk");
    add_token(&mut cas, t, 2, "run");
    let bag = cas.index("token-bag").unwrap();
    assert_eq!(bag.select().count().unwrap(), 2);
    assert_eq!(bag.iter(true).unwrap().len(), 2);
    assert!(matches!(bag.iter(false), Err(Error::TypeMismatch { .. })));
    assert!(matches!(
        bag.select().covered_by_span(0, 5).count(),
        Err(Error::TypeMismatch { .. })
    ));
    assert!(matches!(
        cas.index("lemma-sorted").unwrap().select().start_at(1).to_vec(),
        Err(Error::TypeMismatch { .. })
    ));
}

#[test]
fn non_annotation_index() {
    let (mut cas, t) = empty_cas();
    cas.define_index(IndexDefinition::sorted(
        "lemma-values",
        t.lemma,
        vec![SortKey::Feature {
            name: "value".to_string(),
            direction: Direction::Ascending,
        }],
    ))
    .unwrap();
    for value in ["b", "c", "a"] {
        let fs = cas.create(t.lemma).feature("value", value).build().unwrap();
        assert_eq!(cas.add_fs(&fs), 1);
    }
    let values: Vec<String> = cas
        .index("lemma-values")
        .unwrap()
        .cursor()
        .filter_map(|fs| fs.feature("value").and_then(FeatureValue::as_str).map(str::to_string))
        .collect();
    assert_eq!(values, vec!["a", "b", "c"]);
    assert!(cas.annotation_index().is_empty());
}

#[test]
fn registration_errors() {
    let (mut cas, t) = empty_cas();
    assert!(matches!(
        cas.define_index(IndexDefinition::bag(ANNOTATION_INDEX, t.token)),
        Err(Error::DuplicateIndex(_))
    ));
    assert!(matches!(
        cas.define_index(IndexDefinition::sorted(
            "by-pos",
            t.token,
            vec![SortKey::Feature {
                name: "pos".to_string(),
                direction: Direction::Ascending,
            }],
        )),
        Err(Error::UnknownFeature { .. })
    ));
    assert!(matches!(
        cas.define_index(IndexDefinition::annotation("lemma-spans", t.lemma)),
        Err(Error::TypeMismatch { .. })
    ));

    let bad = CasConfig {
        indexes: vec![IndexConfig {
            label: "x".to_string(),
            type_name: "Nope".to_string(),
            kind: IndexKind::Sorted,
            keys: Vec::new(),
        }],
        ..CasConfig::default()
    };
    let (types, _) = type_system();
    assert!(matches!(
        castor::Cas::with_config(types, &bad),
        Err(Error::UnknownType(_))
    ));
}

#[test]
fn late_bag_keeps_insertion_order() {
    let (mut cas, t) = empty_cas();
    let early = cas.create_annotation(t.token, 100, 101).unwrap();
    let mut expected = Vec::new();
    for i in 0..40 {
        expected.push(cas.create_and_add_annotation(t.token, i, i + 1).unwrap().id());
    }
    let removed = expected.remove(7);
    let gone = cas.get_fs(removed).unwrap().clone();
    cas.remove_fs(&gone);
    cas.add_fs(&early);
    expected.push(early.id());

    cas.define_index(IndexDefinition::bag("late-bag", castor::TypeTable::ANNOTATION))
        .unwrap();
    let ids: Vec<_> = cas
        .index("late-bag")
        .unwrap()
        .cursor()
        .map(|fs| fs.id())
        .collect();
    assert_eq!(ids, expected);
}
