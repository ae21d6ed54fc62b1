use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("meal store unavailable: {0}")]
    StoreUnavailable(#[source] anyhow::Error),
}
