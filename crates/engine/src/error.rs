use gazetteer_core::{Aggregate, CoreError, RecordType};
use gazetteer_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("core error: {0}")]
    Core(#[from] CoreError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("unknown {aggregate} record type code: {code}")]
    UnknownRecordType { aggregate: Aggregate, code: u16 },

    #[error("no validator registered for {0}")]
    MissingValidator(RecordType),
}
