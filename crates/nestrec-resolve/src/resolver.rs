use std::collections::HashSet;

use nestrec_codec::{DecodeError, DecodeResult, RecordDecodable, RecordDecoder};
use nestrec_types::{Record, RecordId, RecordSet};
use tracing::{debug, info, warn};

use crate::config::ResolverConfig;
use crate::fetcher::RecordFetcher;

/// A closed record set produced by the resolver.
#[derive(Clone, Debug)]
pub struct Resolution {
    /// The root first, then every reachable record in the order fetched.
    pub records: RecordSet,
    /// Number of fetch rounds it took.
    pub rounds: usize,
}

impl Resolution {
    pub fn root(&self) -> Option<&Record> {
        self.records.first()
    }

    pub fn into_records(self) -> RecordSet {
        self.records
    }
}

/// Fetches every record transitively reachable from a root record.
///
/// Round `k` fetches, in one batch, exactly the records first referenced
/// by records fetched in round `k - 1`. A graph whose longest reference
/// path from the root has `D` edges therefore takes `D` rounds.
#[derive(Clone, Debug, Default)]
pub struct ReferenceResolver {
    config: ResolverConfig,
}

impl ReferenceResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Fetch the root by identifier, then resolve it.
    pub async fn resolve_id<F>(&self, id: &RecordId, fetcher: &F) -> DecodeResult<Resolution>
    where
        F: RecordFetcher + ?Sized,
    {
        let root = fetcher
            .fetch_records(std::slice::from_ref(id))
            .await?
            .into_iter()
            .find(|r| r.name() == id.name)
            .ok_or_else(|| DecodeError::RecordNotFound(id.name.clone()))?;
        self.resolve(root, fetcher).await
    }

    /// Collect the closed record set reachable from `root`.
    pub async fn resolve<F>(&self, root: Record, fetcher: &F) -> DecodeResult<Resolution>
    where
        F: RecordFetcher + ?Sized,
    {
        let root_id = root.id.clone();
        let mut seen: HashSet<String> = HashSet::new();
        seen.insert(root.name().to_string());

        let mut frontier = first_sightings(&root, &mut seen);
        let mut records = RecordSet::new();
        records.insert(root);

        let mut rounds = 0;
        while !frontier.is_empty() {
            if rounds >= self.config.max_rounds {
                warn!(
                    root = %root_id,
                    max_rounds = self.config.max_rounds,
                    pending = frontier.len(),
                    "reference resolution did not close"
                );
                return Err(DecodeError::RoundLimit(self.config.max_rounds));
            }
            rounds += 1;
            debug!(round = rounds, requested = frontier.len(), "fetching referenced records");

            let fetched = fetcher.fetch_records(&frontier).await?;
            let requested: HashSet<&str> = frontier.iter().map(|id| id.name.as_str()).collect();

            let mut next = Vec::new();
            let mut received = 0;
            for record in fetched {
                if !requested.contains(record.name()) || records.contains(record.name()) {
                    debug!(id = record.id.short(), "ignoring unrequested record");
                    continue;
                }
                next.extend(first_sightings(&record, &mut seen));
                records.insert(record);
                received += 1;
            }

            if received < frontier.len() {
                let missing: Vec<&str> = frontier
                    .iter()
                    .map(|id| id.name.as_str())
                    .filter(|name| !records.contains(name))
                    .collect();
                if self.config.fail_on_missing {
                    let name = missing.first().copied().unwrap_or_default();
                    return Err(DecodeError::RecordNotFound(name.to_string()));
                }
                warn!(round = rounds, missing = ?missing, "referenced records not returned by store");
            }
            frontier = next;
        }

        info!(
            root = %root_id,
            records = records.len(),
            rounds,
            "resolved references"
        );
        Ok(Resolution { records, rounds })
    }

    /// Resolve `root`, then decode it from the closed set.
    pub async fn decode<T, F>(&self, root: Record, fetcher: &F) -> DecodeResult<T>
    where
        T: RecordDecodable,
        F: RecordFetcher + ?Sized,
    {
        let resolution = self.resolve(root, fetcher).await?;
        RecordDecoder::new(&resolution.records).decode()
    }
}

/// Targets of `record`'s references that nobody has asked for yet.
fn first_sightings(record: &Record, seen: &mut HashSet<String>) -> Vec<RecordId> {
    record
        .references()
        .into_iter()
        .filter(|r| seen.insert(r.target_name().to_string()))
        .map(|r| r.target.clone())
        .collect()
}
