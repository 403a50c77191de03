//! Feature values carried in record attribute slots
//!
//! The engine treats feature values as opaque except when an index declares
//! a feature as a sort key. For that case [`FeatureValue`] has a total order:
//! variant rank first (`Null < Bool < Int < Float < Str < Ref`), then the
//! value itself. Floats compare with `f64::total_cmp`.

use crate::types::FsId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Value stored in a feature slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FeatureValue {
    /// Unset slot
    Null,
    /// Boolean value
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point
    Float(f64),
    /// UTF-8 string
    Str(String),
    /// Reference to another feature structure
    Ref(FsId),
}

impl FeatureValue {
    fn rank(&self) -> u8 {
        match self {
            FeatureValue::Null => 0,
            FeatureValue::Bool(_) => 1,
            FeatureValue::Int(_) => 2,
            FeatureValue::Float(_) => 3,
            FeatureValue::Str(_) => 4,
            FeatureValue::Ref(_) => 5,
        }
    }

    /// Integer payload, if this is an `Int`
    pub fn as_int(&self) -> Option<i64> {
        match self {
            FeatureValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// String payload, if this is a `Str`
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FeatureValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// True for `Null`
    pub fn is_null(&self) -> bool {
        matches!(self, FeatureValue::Null)
    }
}

impl Ord for FeatureValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (FeatureValue::Null, FeatureValue::Null) => Ordering::Equal,
            (FeatureValue::Bool(a), FeatureValue::Bool(b)) => a.cmp(b),
            (FeatureValue::Int(a), FeatureValue::Int(b)) => a.cmp(b),
            (FeatureValue::Float(a), FeatureValue::Float(b)) => a.total_cmp(b),
            (FeatureValue::Str(a), FeatureValue::Str(b)) => a.cmp(b),
            (FeatureValue::Ref(a), FeatureValue::Ref(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for FeatureValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Equality follows the total order so that set indexes dedup consistently
impl PartialEq for FeatureValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FeatureValue {}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Null => write!(f, "null"),
            FeatureValue::Bool(v) => write!(f, "{}", v),
            FeatureValue::Int(v) => write!(f, "{}", v),
            FeatureValue::Float(v) => write!(f, "{}", v),
            FeatureValue::Str(v) => write!(f, "{:?}", v),
            FeatureValue::Ref(id) => write!(f, "{}", id),
        }
    }
}

impl From<i64> for FeatureValue {
    fn from(v: i64) -> Self {
        FeatureValue::Int(v)
    }
}

impl From<i32> for FeatureValue {
    fn from(v: i32) -> Self {
        FeatureValue::Int(i64::from(v))
    }
}

impl From<f64> for FeatureValue {
    fn from(v: f64) -> Self {
        FeatureValue::Float(v)
    }
}

impl From<bool> for FeatureValue {
    fn from(v: bool) -> Self {
        FeatureValue::Bool(v)
    }
}

impl From<&str> for FeatureValue {
    fn from(v: &str) -> Self {
        FeatureValue::Str(v.to_string())
    }
}

impl From<String> for FeatureValue {
    fn from(v: String) -> Self {
        FeatureValue::Str(v)
    }
}

impl From<FsId> for FeatureValue {
    fn from(v: FsId) -> Self {
        FeatureValue::Ref(v)
    }
}
