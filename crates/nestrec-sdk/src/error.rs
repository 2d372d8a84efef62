use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("cannot read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("encode error: {0}")]
    Encode(#[from] nestrec_codec::EncodeError),

    #[error("decode error: {0}")]
    Decode(#[from] nestrec_codec::DecodeError),

    #[error("store error: {0}")]
    Store(#[from] nestrec_store::StoreError),
}

pub type SdkResult<T> = Result<T, SdkError>;
