use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::identity::RecordId;
use crate::value::{FieldValue, Reference};

/// The flat unit of storage: type tag, identity, and a field map.
///
/// A record never embeds another record; nested objects appear as
/// [`Reference`]s. Fields are kept in a `BTreeMap` so that two encodes of
/// the same object produce byte-identical records.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Type tag of the domain object this record came from.
    pub record_type: String,
    /// Identity of this record.
    pub id: RecordId,
    /// Field name to store-native value.
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,
}

impl Record {
    /// Create an empty record.
    pub fn new(record_type: impl Into<String>, id: RecordId) -> Self {
        Self {
            record_type: record_type.into(),
            id,
            fields: BTreeMap::new(),
        }
    }

    /// The record name (identifier within the store).
    pub fn name(&self) -> &str {
        &self.id.name
    }

    /// Look up a field.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Set a field, returning the previous value.
    pub fn set(&mut self, field: impl Into<String>, value: FieldValue) -> Option<FieldValue> {
        self.fields.insert(field.into(), value)
    }

    /// Remove a field.
    pub fn remove(&mut self, field: &str) -> Option<FieldValue> {
        self.fields.remove(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Field names in sorted order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// All references held by this record, single and sequence, in field
    /// order and then sequence order.
    pub fn references(&self) -> Vec<&Reference> {
        self.fields
            .values()
            .flat_map(FieldValue::references)
            .collect()
    }
}
