//! Wallet registry - read-only view over the host environment's ambient
//! wallet collection.

use super::ProviderHandle;

/// The host's installed-wallet collection.
///
/// Implementations must read the underlying source fresh on every call:
/// extensions can register at any time after page load, so a cached list
/// goes stale. An empty host registry is an empty vec, not a failure.
pub trait WalletRegistry {
    /// Every registered provider, in registration order.
    fn providers(&self) -> Vec<ProviderHandle>;

    /// Providers advertising at least one `sui:`-namespaced chain.
    fn sui_providers(&self) -> Vec<ProviderHandle> {
        self.providers()
            .into_iter()
            .filter(|p| p.is_sui_compatible())
            .collect()
    }
}
