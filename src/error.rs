//! Error taxonomy.
//!
//! User cancellation is a value (`None` out of a picker or out of
//! [`connect`](crate::WalletManager::connect)), never an error.
//! `connect` is the only public operation allowed to surface errors to its
//! caller; restore, disconnect, and the detector callbacks absorb failures
//! internally because nothing upstream of them can handle a thrown error
//! meaningfully.

use std::time::Duration;
use thiserror::Error;

/// Failures [`connect`](crate::WalletManager::connect) reports to its
/// caller, expected to be shown near the triggering control.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// No installed wallet advertises a Sui chain.
    #[error("no Sui-compatible wallet found")]
    NoProviderFound,

    /// The chosen wallet connected but authorized zero accounts.
    #[error("wallet has no accounts")]
    NoAccountsFound,

    /// The wallet's own connect call rejected (user declined in the
    /// extension UI).
    #[error("wallet rejected connection: {0}")]
    Rejected(#[from] ProviderError),

    /// The pending connect call outlived the configured bound. Distinct
    /// from user cancellation, which is `Ok(None)`.
    #[error("wallet connect timed out after {0:?}")]
    Timeout(Duration),
}

/// A provider capability call failed; carries the extension's own message.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct ProviderError(pub String);

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
