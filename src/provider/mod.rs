//! Wallet provider surface - the in-process projection of an installed
//! wallet extension.
//!
//! Providers are supplied by the host environment and are externally
//! mutable: the authorized account list can change at any moment without
//! this crate's involvement. Everything here is therefore either a trait
//! over the live extension object or an immutable snapshot taken from it.

pub mod registry;

use crate::error::ProviderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::rc::Rc;

/// Chain namespace recognized by the Sui compatibility filter.
pub const SUI_CHAIN_PREFIX: &str = "sui:";

/// An authorized account snapshot. Supplied by the provider, never
/// constructed or mutated here. Identity is the address; label, key, and
/// chain list are display/signing metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub address: String,
    pub label: Option<String>,
    pub public_key: Vec<u8>,
    pub chains: Vec<String>,
}

/// Optional capabilities, probed once when the provider handle is built
/// and cached for its lifetime - never re-probed per call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProviderCapabilities {
    /// `standard:disconnect` - the wallet can revoke its cached
    /// authorization.
    pub disconnect: bool,
    /// `standard:events` - the wallet emits change events. Known to be
    /// unreliable on some extensions, which is why the visibility poll
    /// exists alongside it.
    pub events: bool,
}

/// Callback invoked by the event channel with the provider's new
/// authorized account list.
pub type ChangeHandler = Box<dyn Fn(Vec<Account>)>;

/// Guard for an event-channel subscription.
pub struct ChangeSubscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl ChangeSubscription {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Remove the underlying event listener. Idempotent.
    pub fn unsubscribe(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for ChangeSubscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

/// A wallet extension as seen by the session manager.
///
/// The display name doubles as the durable lookup key for session restore.
/// It is NOT a stable identifier: two installed wallets sharing a name, or
/// a renamed/reinstalled wallet, can make restore bind to the wrong
/// provider. The host registry exposes nothing stronger, so the limitation
/// stands rather than being papered over with an invented id.
#[async_trait(?Send)]
pub trait WalletProvider {
    fn name(&self) -> String;
    fn icon(&self) -> String;

    /// Chain identifiers the wallet supports (`sui:mainnet`, ...).
    fn chains(&self) -> Vec<String>;

    /// Live authorized account list. Reflects the extension's real-time
    /// state without a fresh connect call; the visibility poll reads this.
    fn accounts(&self) -> Vec<Account>;

    /// Cached optional-capability set.
    fn capabilities(&self) -> ProviderCapabilities;

    /// `standard:connect`. Prompts the user on first use; later calls
    /// return the cached authorization silently. May reject.
    async fn connect(&self) -> Result<Vec<Account>, ProviderError>;

    /// `standard:disconnect`. Only meaningful when
    /// [`capabilities`](Self::capabilities) reports it.
    async fn disconnect(&self) -> Result<(), ProviderError> {
        Ok(())
    }

    /// `standard:events`. `None` when the wallet has no event capability;
    /// the manager then relies on the visibility poll alone.
    fn subscribe_change(&self, handler: ChangeHandler) -> Option<ChangeSubscription>;

    /// Sign-and-submit capability. Opaque payload in, opaque execution
    /// result out; the session manager never interprets either side.
    async fn sign_and_execute(&self, account: &Account, tx: Value) -> Result<Value, ProviderError>;

    /// Whether at least one supported chain carries the Sui namespace.
    fn is_sui_compatible(&self) -> bool {
        self.chains().iter().any(|c| c.starts_with(SUI_CHAIN_PREFIX))
    }
}

/// Shared handle to a provider adapter.
pub type ProviderHandle = Rc<dyn WalletProvider>;
