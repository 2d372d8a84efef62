use std::path::{Path, PathBuf};

use nestrec_resolve::ResolverConfig;
use nestrec_transcode::AssetStager;
use nestrec_types::ZoneId;
use serde::{Deserialize, Serialize};

use crate::error::{SdkError, SdkResult};

/// Configuration for a [`Codec`](crate::Codec).
///
/// ```toml
/// asset_dir = "/var/lib/app/assets"
///
/// [zone]
/// name = "school"
///
/// [resolver]
/// max_rounds = 16
/// fail_on_missing = true
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Zone stamped on every encoded record and reference.
    pub zone: ZoneId,
    /// Where binary payloads are staged; the OS temp dir when unset.
    pub asset_dir: Option<PathBuf>,
    pub resolver: ResolverConfig,
}

impl CodecConfig {
    pub fn from_toml_str(s: &str) -> SdkResult<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> SdkResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SdkError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub(crate) fn asset_stager(&self) -> AssetStager {
        match &self.asset_dir {
            Some(dir) => AssetStager::new(dir),
            None => AssetStager::in_temp_dir(),
        }
    }
}
