use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::record::Record;
use crate::value::Reference;

/// An ordered collection of records, unique by record name.
///
/// Inserting a record whose name is already present is a silent no-op: the
/// first occurrence always wins. This is what makes an object referenced
/// from two parents come out of the encoder exactly once.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Record>", into = "Vec<Record>")]
pub struct RecordSet {
    records: Vec<Record>,
    /// Record name to position in `records`.
    index: HashMap<String, usize>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record. Returns `false` if a record with the same name was
    /// already present (the new one is discarded).
    pub fn insert(&mut self, record: Record) -> bool {
        if self.index.contains_key(record.name()) {
            debug!(id = %record.id, "discarding duplicate record");
            return false;
        }
        self.index
            .insert(record.name().to_string(), self.records.len());
        self.records.push(record);
        true
    }

    /// Insert every record, first occurrence wins.
    pub fn extend(&mut self, records: impl IntoIterator<Item = Record>) {
        for record in records {
            self.insert(record);
        }
    }

    /// Look up a record by name.
    pub fn get(&self, name: &str) -> Option<&Record> {
        self.index.get(name).map(|&i| &self.records[i])
    }

    /// Resolve a reference to its record.
    pub fn resolve(&self, reference: &Reference) -> Option<&Record> {
        self.get(reference.target_name())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The first record inserted, if any.
    pub fn first(&self) -> Option<&Record> {
        self.records.first()
    }

    /// The last record inserted, if any.
    pub fn last(&self) -> Option<&Record> {
        self.records.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[Record] {
        &self.records
    }

    pub fn into_vec(self) -> Vec<Record> {
        self.records
    }

    /// References that do not resolve inside this set, deduplicated by
    /// target name, in discovery order.
    ///
    /// An empty result means the set is closed.
    pub fn dangling_references(&self) -> Vec<&Reference> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .flat_map(Record::references)
            .filter(|r| !self.contains(r.target_name()))
            .filter(|r| seen.insert(r.target_name()))
            .collect()
    }

    /// Returns `true` if every reference resolves inside the set.
    pub fn is_closed(&self) -> bool {
        self.dangling_references().is_empty()
    }
}

impl From<Vec<Record>> for RecordSet {
    fn from(records: Vec<Record>) -> Self {
        let mut set = Self::new();
        set.extend(records);
        set
    }
}

impl From<RecordSet> for Vec<Record> {
    fn from(set: RecordSet) -> Self {
        set.records
    }
}

impl FromIterator<Record> for RecordSet {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl IntoIterator for RecordSet {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::RecordId;
    use crate::value::{FieldValue, Scalar};

    fn record(name: &str, title: &str) -> Record {
        let mut r = Record::new("Book", RecordId::new(name));
        r.set("title", FieldValue::Scalar(Scalar::Text(title.into())));
        r
    }

    fn linked(name: &str, targets: &[&str]) -> Record {
        let mut r = Record::new("Node", RecordId::new(name));
        r.set(
            "next",
            FieldValue::References(
                targets
                    .iter()
                    .map(|t| Reference::new(RecordId::new(*t)))
                    .collect(),
            ),
        );
        r
    }

    #[test]
    fn first_occurrence_wins() {
        let mut set = RecordSet::new();
        assert!(set.insert(record("a", "first")));
        assert!(!set.insert(record("a", "second")));
        assert_eq!(set.len(), 1);
        assert_eq!(
            set.get("a").unwrap().get("title"),
            Some(&FieldValue::Scalar(Scalar::Text("first".into())))
        );
    }

    #[test]
    fn insertion_order_is_preserved() {
        let set: RecordSet = vec![record("c", "c"), record("a", "a"), record("b", "b")]
            .into_iter()
            .collect();
        let names: Vec<&str> = set.iter().map(Record::name).collect();
        assert_eq!(names, ["c", "a", "b"]);
        assert_eq!(set.first().unwrap().name(), "c");
        assert_eq!(set.last().unwrap().name(), "b");
    }

    #[test]
    fn from_vec_deduplicates() {
        let set = RecordSet::from(vec![record("a", "1"), record("b", "2"), record("a", "3")]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.into_vec().len(), 2);
    }

    #[test]
    fn resolve_finds_target() {
        let set = RecordSet::from(vec![record("a", "1")]);
        assert!(set.resolve(&Reference::new(RecordId::new("a"))).is_some());
        assert!(set.resolve(&Reference::new(RecordId::new("z"))).is_none());
    }

    #[test]
    fn dangling_references_reported_once() {
        let set = RecordSet::from(vec![
            linked("root", &["a", "missing"]),
            linked("a", &["missing"]),
        ]);
        let dangling: Vec<&str> = set
            .dangling_references()
            .into_iter()
            .map(Reference::target_name)
            .collect();
        assert_eq!(dangling, ["missing"]);
        assert!(!set.is_closed());
    }

    #[test]
    fn closed_set() {
        let set = RecordSet::from(vec![linked("root", &["a"]), linked("a", &[])]);
        assert!(set.is_closed());
    }

    #[test]
    fn serde_as_plain_array() {
        let set = RecordSet::from(vec![record("a", "1"), record("b", "2")]);
        let json = serde_json::to_value(&set).unwrap();
        assert!(json.is_array());
        let back: RecordSet = serde_json::from_value(json).unwrap();
        assert_eq!(back, set);
    }
}
