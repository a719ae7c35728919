use thiserror::Error;

use crate::provider::ProviderKind;

/// Everything that can go wrong at the session boundary.
///
/// None of these are fatal to the page: each maps to a one-line user-facing
/// notification and the session remains (or returns to) `Disconnected`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("{0} is not installed")]
    ProviderNotInstalled(ProviderKind),

    #[error("a wallet connection is already in progress")]
    AlreadyConnecting,

    #[error("connection request was rejected in the wallet")]
    UserRejected,

    #[error("wallet is on the wrong network, please switch to Solana")]
    NetworkMismatch,

    #[error("{0} connection is not fully implemented yet")]
    NotImplemented(ProviderKind),

    #[error("wallet connection failed: {0}")]
    Unknown(String),
}
