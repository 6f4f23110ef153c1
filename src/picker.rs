//! Picker contract - modal disambiguation of wallets and accounts.

use async_trait::async_trait;

/// One selectable row.
#[derive(Debug, Clone)]
pub struct PickItem {
    pub icon: String,
    pub label: String,
    pub detail: Option<String>,
    /// Opaque value handed back on selection (a wallet name or an account
    /// address).
    pub value: String,
}

/// A single modal invocation.
#[derive(Debug, Clone)]
pub struct PickRequest {
    pub title: String,
    pub subtitle: String,
    pub hint: Option<String>,
    pub items: Vec<PickItem>,
}

/// Resolves exactly once: `Some(value)` for the clicked item, `None` on
/// dismissal (close control, backdrop click, Escape). Dismissal is a
/// normal outcome, never an error.
///
/// Implementations must survive rapid repeated invocation - the wallet
/// picker is often followed immediately by the account picker - without
/// leaking interaction handlers from the previous call: every resolution
/// path tears down everything registered for that invocation before the
/// result settles.
#[async_trait(?Send)]
pub trait Picker {
    async fn pick(&self, request: PickRequest) -> Option<String>;
}
