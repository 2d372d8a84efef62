//! Store-native field values.
//!
//! The store only understands flat values: scalars, homogeneous scalar
//! lists, and references to other records. Everything a domain object holds
//! has to be expressed as one of the [`FieldValue`] variants.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::RecordId;

/// What the store does to a referencing record when its parent goes away.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CascadeAction {
    /// The referenced record is deleted together with the record holding
    /// the reference.
    #[default]
    DeleteWithParent,
    /// The referenced record has its own lifetime.
    Independent,
}

impl fmt::Display for CascadeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeleteWithParent => write!(f, "delete-with-parent"),
            Self::Independent => write!(f, "independent"),
        }
    }
}

/// A foreign-key link to another record.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    /// The record being pointed at.
    pub target: RecordId,
    /// Store-side deletion semantics.
    #[serde(default)]
    pub action: CascadeAction,
}

impl Reference {
    /// Reference with the default cascade action.
    pub fn new(target: RecordId) -> Self {
        Self {
            target,
            action: CascadeAction::default(),
        }
    }

    /// Reference with an explicit cascade action.
    pub fn with_action(target: RecordId, action: CascadeAction) -> Self {
        Self { target, action }
    }

    /// The referenced record name.
    pub fn target_name(&self) -> &str {
        &self.target.name
    }
}

/// Handle to a blob held outside the record, addressed by file path.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetHandle {
    /// Location of the blob contents.
    pub path: PathBuf,
}

impl AssetHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// A single store-native scalar.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Scalar {
    Text(String),
    Int(i64),
    Double(f64),
    Bool(bool),
    Timestamp(DateTime<Utc>),
    Asset(AssetHandle),
}

impl Scalar {
    /// Short name of the variant, used in type-mismatch diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Int(_) => "int",
            Self::Double(_) => "double",
            Self::Bool(_) => "bool",
            Self::Timestamp(_) => "timestamp",
            Self::Asset(_) => "asset",
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s:?}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Double(d) => write!(f, "{d}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Timestamp(t) => write!(f, "{}", t.to_rfc3339()),
            Self::Asset(a) => write!(f, "asset({})", a.path.display()),
        }
    }
}

/// The value stored under one field of a record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    /// A single scalar.
    Scalar(Scalar),
    /// An ordered sequence of scalars.
    List(Vec<Scalar>),
    /// A link to one nested record.
    Reference(Reference),
    /// An ordered sequence of links to nested records.
    References(Vec<Reference>),
}

impl FieldValue {
    /// Short name of the shape, used in type-mismatch diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Scalar(s) => s.kind(),
            Self::List(_) => "list",
            Self::Reference(_) => "reference",
            Self::References(_) => "reference list",
        }
    }

    /// Every reference held by this value, in order.
    pub fn references(&self) -> &[Reference] {
        match self {
            Self::Reference(r) => std::slice::from_ref(r),
            Self::References(refs) => refs,
            Self::Scalar(_) | Self::List(_) => &[],
        }
    }

    /// Returns `true` for single or sequence references.
    pub fn is_reference(&self) -> bool {
        matches!(self, Self::Reference(_) | Self::References(_))
    }
}

impl From<Scalar> for FieldValue {
    fn from(value: Scalar) -> Self {
        Self::Scalar(value)
    }
}

impl From<Reference> for FieldValue {
    fn from(value: Reference) -> Self {
        Self::Reference(value)
    }
}
