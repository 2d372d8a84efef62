use nestrec_codec::{RecordDecodable, RecordDecoder, RecordEncodable, RecordEncoder, RecordRepresentable};
use nestrec_resolve::{RecordFetcher, ReferenceResolver};
use nestrec_store::RecordStore;
use nestrec_types::{Record, RecordId, RecordSet};
use tracing::info;

use crate::config::CodecConfig;
use crate::error::SdkResult;

/// High-level nestrec API.
///
/// Encoding and decoding are pure; [`save`](Self::save),
/// [`load`](Self::load) and [`delete`](Self::delete) additionally talk to a
/// record store.
#[derive(Clone, Debug, Default)]
pub struct Codec {
    config: CodecConfig,
    encoder: RecordEncoder,
    resolver: ReferenceResolver,
}

impl Codec {
    pub fn new(config: CodecConfig) -> Self {
        let encoder = RecordEncoder::new()
            .with_zone(config.zone.clone())
            .with_assets(config.asset_stager());
        let resolver = ReferenceResolver::new(config.resolver.clone());
        Self {
            config,
            encoder,
            resolver,
        }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Identifier `name` gets in the configured zone.
    pub fn record_id(&self, name: &str) -> RecordId {
        RecordId::in_zone(name, self.config.zone.clone())
    }

    // ---- Pure operations ----

    /// Flatten `value` into records, children first and the root last.
    pub fn encode<T: RecordEncodable>(&self, value: &T) -> SdkResult<Vec<Record>> {
        Ok(self.encoder.encode(value)?)
    }

    /// Decode `name` out of an already closed record set.
    pub fn decode_set<T: RecordDecodable>(&self, records: &RecordSet, name: &str) -> SdkResult<T> {
        Ok(RecordDecoder::new(records).decode_root(name)?)
    }

    // ---- Store operations ----

    /// Fetch everything `root` references, then decode it.
    pub async fn decode<T, F>(&self, root: Record, fetcher: &F) -> SdkResult<T>
    where
        T: RecordDecodable,
        F: RecordFetcher + ?Sized,
    {
        Ok(self.resolver.decode(root, fetcher).await?)
    }

    /// Encode `value` and save all of its records in one batch.
    pub fn save<T, S>(&self, value: &T, store: &S) -> SdkResult<RecordId>
    where
        T: RecordEncodable,
        S: RecordStore + ?Sized,
    {
        let records = self.encoder.encode(value)?;
        store.save_batch(&records)?;
        let id = self.record_id(value.record_name());
        info!(root = %id, records = records.len(), "saved object graph");
        Ok(id)
    }

    /// Fetch the record named `name` and everything it references, then
    /// decode it.
    pub async fn load<T, F>(&self, name: &str, fetcher: &F) -> SdkResult<T>
    where
        T: RecordDecodable,
        F: RecordFetcher + ?Sized,
    {
        let resolution = self.resolver.resolve_id(&self.record_id(name), fetcher).await?;
        Ok(RecordDecoder::new(&resolution.records).decode()?)
    }

    /// Delete `value`'s record and whatever it owns.
    pub fn delete<T, S>(&self, value: &T, store: &S) -> SdkResult<Vec<RecordId>>
    where
        T: RecordRepresentable,
        S: RecordStore + ?Sized,
    {
        let removed = store.delete(&self.record_id(value.record_name()))?;
        info!(root = value.record_name(), removed = removed.len(), "deleted object graph");
        Ok(removed)
    }
}
