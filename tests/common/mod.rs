//! Shared test utilities for the integration suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's main.rs.

#![allow(dead_code)]

use castor::{Cas, CasConfig, FeatureRange, FsRef, TypeCapability, TypeId, TypeTable};
use std::sync::{Arc, Once};

static INIT_TRACING: Once = Once::new();

/// Route `castor::*` events to the test writer once per process.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init()
            .ok();
    });
}

/// Type handles of the test type system
#[derive(Debug, Clone, Copy)]
pub struct Types {
    pub token: TypeId,
    pub sentence: TypeId,
    pub phrase: TypeId,
    pub lemma: TypeId,
}

/// Token (with a string `lemma` and a `pos` reference), Sentence, Phrase
/// under Sentence, and a span-less Lemma.
pub fn type_system() -> (Arc<dyn TypeCapability>, Types) {
    let mut b = TypeTable::builder();
    let token = b.add_type("Token", TypeTable::ANNOTATION).unwrap();
    let sentence = b.add_type("Sentence", TypeTable::ANNOTATION).unwrap();
    let phrase = b.add_type("Phrase", sentence).unwrap();
    let lemma = b.add_type("Lemma", TypeTable::TOP).unwrap();
    b.add_feature(token, "lemma", FeatureRange::Str).unwrap();
    b.add_feature(lemma, "value", FeatureRange::Str).unwrap();
    b.set_priorities(&[sentence, token]).unwrap();
    (
        Arc::new(b.build()),
        Types {
            token,
            sentence,
            phrase,
            lemma,
        },
    )
}

/// Empty store over [`type_system`]
pub fn empty_cas() -> (Cas, Types) {
    empty_cas_with(&CasConfig::default())
}

pub fn empty_cas_with(config: &CasConfig) -> (Cas, Types) {
    init_tracing();
    let (types, t) = type_system();
    (Cas::with_config(types, config).unwrap(), t)
}

/// Length of the fixture document
pub const DOC_LEN: i32 = 60;

/// Phrase spans of the fixture
pub const PHRASES: [(i32, i32); 10] = [
    (0, 5),
    (6, 9),
    (9, 16),
    (15, 20),
    (21, 24),
    (24, 31),
    (30, 35),
    (36, 39),
    (39, 46),
    (45, 50),
];

/// The standard 77-record document:
/// - 55 tokens `[i, i + 5)`
/// - 10 sentences `[i, i + 10)` every 5 positions
/// - 10 phrases (see [`PHRASES`])
/// - one long sentence `[12, 31)`
/// - the document annotation `[0, 60)`
pub struct Document {
    pub cas: Cas,
    pub types: Types,
    pub sentences: Vec<FsRef>,
    pub long_sentence: FsRef,
}

pub fn document() -> Document {
    let (mut cas, types) = empty_cas();
    for i in 0..55 {
        cas.create_and_add_annotation(types.token, i, i + 5).unwrap();
    }
    let mut sentences = Vec::new();
    for i in (0..50).step_by(5) {
        sentences.push(cas.create_and_add_annotation(types.sentence, i, i + 10).unwrap());
    }
    for (begin, end) in PHRASES {
        cas.create_and_add_annotation(types.phrase, begin, end).unwrap();
    }
    let long_sentence = cas.create_and_add_annotation(types.sentence, 12, 31).unwrap();
    cas.set_document_annotation(DOC_LEN).unwrap();
    Document {
        cas,
        types,
        sentences,
        long_sentence,
    }
}

/// `(begin, end)` pairs of a result list
pub fn spans(records: &[FsRef]) -> Vec<(i32, i32)> {
    records.iter().map(|fs| (fs.begin(), fs.end())).collect()
}
