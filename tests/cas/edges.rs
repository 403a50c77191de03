//! Boundary cases of covered-by and covering against a fixed bound.
//!
//! Setups are written `begin-end-kind` joined by `:` (`-` for nothing),
//! where kind 0 is a phrase, 1 a sentence and 2 a token. The bound is the
//! phrase `[10, 20)`. The store is reset between cases while the bound
//! record is kept.
//!
//! Flag strings are `TP:NO:LE:ST` with `--` for an unset slot: type
//! priority, non-overlapping, ends beyond bounds, skip same begin/end/type.

use crate::common::*;
use castor::{BoundsUse, Cas, FsRef, TypeTable};

fn populate(cas: &mut Cas, types: Types, setup: &str) {
    cas.reset();
    for part in setup.split(':').filter(|p| !p.is_empty() && *p != "-") {
        let fields: Vec<i32> = part.split('-').map(|f| f.parse().unwrap()).collect();
        let t = match fields[2] {
            0 => types.phrase,
            1 => types.sentence,
            _ => types.token,
        };
        cas.create_and_add_annotation(t, fields[0], fields[1]).unwrap();
    }
}

fn bound(cas: &mut Cas, types: Types) -> FsRef {
    cas.create_annotation(types.phrase, 10, 20).unwrap()
}

#[test]
fn covered_by_edges() {
    let (mut cas, types) = empty_cas();
    let bound = bound(&mut cas, types);
    let cases = [
        ("0-10-2:11-20-2", 1, 1),
        ("0-10-2:11-21-2", 0, 1),
        ("", 0, 0),
        ("10-20-2", 1, 1),
        ("10-10-2:20-20-2", 2, 2),
        ("20-25-2", 0, 1),
        ("5-15-2:9-12-1", 0, 0),
    ];
    for (setup, strict, permissive) in cases {
        populate(&mut cas, types, setup);
        let select = || cas.select(types.token).unwrap().covered_by(&bound);
        assert_eq!(select().count().unwrap(), strict, "strict {setup}");
        assert_eq!(
            select()
                .include_annotations_with_end_beyond_bounds()
                .count()
                .unwrap(),
            permissive,
            "permissive {setup}"
        );
    }
}

#[test]
fn covering_edges() {
    let (mut cas, types) = empty_cas();
    let bound = bound(&mut cas, types);
    let cases = [
        ("0-10-2", 0),
        ("", 0),
        ("10-20-2", 1),
        ("9-21-2:10-19-2:11-20-2", 1),
        ("0-30-1:5-25-2", 2),
    ];
    for (setup, expected) in cases {
        populate(&mut cas, types, setup);
        let count = cas
            .select(castor::TypeTable::ANNOTATION)
            .unwrap()
            .covering(&bound)
            .count()
            .unwrap();
        assert_eq!(count, expected, "covering {setup}");
    }
}

#[test]
fn bound_survives_reset() {
    let (mut cas, types) = empty_cas();
    let bound = bound(&mut cas, types);
    populate(&mut cas, types, "12-14-2");
    populate(&mut cas, types, "12-14-2:15-16-2");
    assert!(cas.get_fs(bound.id()).is_none());
    assert_eq!(
        cas.select(types.token).unwrap().covered_by(&bound).count().unwrap(),
        2
    );
}

fn edge(cas: &mut Cas, types: Types, bound: &FsRef, setup: &str, mode: BoundsUse, flags: &str) -> usize {
    populate(cas, types, setup);
    let flags: Vec<&str> = flags.split(':').collect();
    let mut select = cas.select(TypeTable::ANNOTATION).unwrap();
    select = match mode {
        BoundsUse::CoveredBy => select.covered_by(bound),
        BoundsUse::Covering => select.covering(bound),
        BoundsUse::SameBeginEnd => select.at(bound),
        _ => select,
    };
    if flags[0] == "TP" {
        select = select.type_priority();
    }
    if flags[1] == "NO" {
        select = select.non_overlapping();
    }
    if flags[2] == "LE" {
        select = select.include_annotations_with_end_beyond_bounds();
    }
    if flags[3] == "ST" {
        select = select.skip_when_same_begin_end_type();
    }
    select.count().unwrap()
}

#[test]
fn flag_edges() {
    use BoundsUse::{CoveredBy, Covering, NotBounded, SameBeginEnd};

    let (mut cas, types) = empty_cas();
    let bound = bound(&mut cas, types);
    let none = "--:--:--:--";
    let cases = [
        ("-", CoveredBy, none, 0),
        ("-", Covering, none, 0),
        ("-", SameBeginEnd, none, 0),
        ("-", NotBounded, none, 0),
        ("0-10-2", CoveredBy, none, 0),
        ("0-10-2", Covering, none, 0),
        ("0-10-2:11-20-2", CoveredBy, none, 1),
        ("0-10-2:11-21-2", CoveredBy, none, 0),
        ("0-10-2:11-21-2", CoveredBy, "--:--:LE:--", 1),
        // same span and type as the bound
        ("10-20-0", SameBeginEnd, none, 1),
        ("10-20-0", SameBeginEnd, "TP:--:--:--", 1),
        ("10-20-0", SameBeginEnd, "--:--:--:ST", 0),
        ("10-20-0", SameBeginEnd, "TP:--:--:ST", 0),
        ("10-20-0:10-20-0", SameBeginEnd, none, 2),
        ("10-20-0:10-20-0", SameBeginEnd, "--:--:--:ST", 0),
        // same span, other types
        ("10-20-1:10-20-2", SameBeginEnd, none, 2),
        ("10-20-1:10-20-2", SameBeginEnd, "TP:--:--:ST", 2),
        ("10-20-1:10-20-2", SameBeginEnd, "--:NO:--:--", 1),
        ("11-19-2:11-19-1", CoveredBy, "TP:--:--:--", 2),
        // covering
        ("0-30-1:10-20-0", Covering, none, 2),
        ("0-30-1:10-20-0", Covering, "--:--:--:ST", 1),
        ("0-30-1:5-25-2", Covering, "--:NO:--:--", 1),
        ("0-30-1:5-25-2", Covering, "TP:--:--:--", 2),
        // non-overlapping inside and around the bound
        ("11-15-2:12-14-2:15-19-2", CoveredBy, none, 3),
        ("11-15-2:12-14-2:15-19-2", CoveredBy, "--:NO:--:--", 2),
        ("11-25-2:15-19-2", CoveredBy, none, 1),
        ("11-25-2:15-19-2", CoveredBy, "--:--:LE:--", 2),
        ("11-25-2:15-19-2", CoveredBy, "--:NO:LE:--", 1),
        ("0-10-2:5-15-2:10-20-2", NotBounded, none, 3),
        ("0-10-2:5-15-2:10-20-2", NotBounded, "--:NO:--:--", 2),
    ];
    for (setup, mode, flags, expected) in cases {
        assert_eq!(
            edge(&mut cas, types, &bound, setup, mode, flags),
            expected,
            "{setup} {mode:?} {flags}"
        );
    }
}
