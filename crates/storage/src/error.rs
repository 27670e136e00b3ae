use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("checksum mismatch for key: {key}")]
    ChecksumMismatch { key: String },

    #[error("invalid checksum length for key: {key}")]
    InvalidChecksum { key: String },
}
