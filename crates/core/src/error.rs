use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("unknown {aggregate} record type code: {code}")]
    UnknownRecordType { aggregate: &'static str, code: u16 },
}
