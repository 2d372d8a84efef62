use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// A store partition that records are written into.
///
/// Every record and every reference carries the zone it lives in. Records
/// produced by one encode call always share a single zone.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ZoneId {
    /// Zone name, unique per owner.
    pub name: String,
    /// Owner of the zone.
    #[serde(default = "default_owner")]
    pub owner: String,
}

fn default_owner() -> String {
    ZoneId::DEFAULT_OWNER.to_string()
}

impl ZoneId {
    /// Name of the zone every store provides out of the box.
    pub const DEFAULT_NAME: &'static str = "_defaultZone";
    /// Owner placeholder meaning "the current user".
    pub const DEFAULT_OWNER: &'static str = "__defaultOwner__";

    /// Create a zone owned by the current user.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owner: Self::DEFAULT_OWNER.to_string(),
        }
    }

    /// Create a zone with an explicit owner.
    pub fn with_owner(name: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owner: owner.into(),
        }
    }

    /// Returns `true` if this is the well-known default zone.
    pub fn is_default(&self) -> bool {
        self.name == Self::DEFAULT_NAME && self.owner == Self::DEFAULT_OWNER
    }

    /// Reject empty zone names.
    pub fn validate(&self) -> Result<(), TypeError> {
        if self.name.trim().is_empty() {
            return Err(TypeError::InvalidZone(self.name.clone()));
        }
        Ok(())
    }
}

impl Default for ZoneId {
    fn default() -> Self {
        Self::new(Self::DEFAULT_NAME)
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.owner, self.name)
    }
}

/// Identity of a record: a record name unique within the store plus the
/// zone the record lives in.
///
/// Lookups inside a record set match on [`RecordId::name`] only; the zone
/// tells the store where to put the record.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId {
    /// The record name (the domain object's identifier).
    pub name: String,
    /// The zone this record belongs to.
    #[serde(default)]
    pub zone: ZoneId,
}

impl RecordId {
    /// Create an identifier in the default zone.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            zone: ZoneId::default(),
        }
    }

    /// Create an identifier in a specific zone.
    pub fn in_zone(name: impl Into<String>, zone: ZoneId) -> Self {
        Self {
            name: name.into(),
            zone,
        }
    }

    /// Generate a fresh, time-ordered record name (UUID v7).
    ///
    /// Domain types call this once when the object is created and keep the
    /// result, so the identifier is stable across encodes.
    pub fn generate() -> String {
        uuid::Uuid::now_v7().to_string()
    }

    /// Parse a `zone-owner:zone-name/record-name` or bare `record-name` string.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        let (zone, name) = match s.split_once('/') {
            Some((zone, name)) => {
                let zone = match zone.split_once(':') {
                    Some((owner, zone_name)) => ZoneId::with_owner(zone_name, owner),
                    None => ZoneId::new(zone),
                };
                zone.validate()?;
                (zone, name)
            }
            None => (ZoneId::default(), s),
        };
        if name.trim().is_empty() {
            return Err(TypeError::InvalidIdentifier(s.to_string()));
        }
        Ok(Self::in_zone(name, zone))
    }

    /// Short display form used in logs.
    pub fn short(&self) -> &str {
        let end = self
            .name
            .char_indices()
            .nth(12)
            .map_or(self.name.len(), |(i, _)| i);
        &self.name[..end]
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.zone, self.name)
    }
}
