use habitstake_core::error::CoreError;

/// Failure of a ledger transaction.
///
/// `Rejected` means a domain rule refused the operation and nothing was
/// written; `Database` means the transaction failed and was rolled back.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error(transparent)]
    Rejected(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
