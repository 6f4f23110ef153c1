//! Connection state machine - discovery, picking, connecting, restoring,
//! change tracking, disconnecting.
//!
//! One [`WalletManager`] exists per page session. Handles are cheap clones
//! sharing the same state cell, so the status surface and the detector
//! callbacks hold a clone instead of reaching into globals.
//!
//! Invariant maintained by every public operation, success or failure:
//! `wallet` and `account` are both unset or both set - never one without
//! the other. Failure paths that run after the wallet was tentatively
//! bound reset both before surfacing the error.

mod status;
mod watcher;

pub use status::ConnectionStatus;
pub use watcher::ListenerId;

use crate::config::LinkConfig;
use crate::error::ConnectError;
use crate::picker::{PickItem, PickRequest, Picker};
use crate::provider::registry::WalletRegistry;
use crate::provider::{Account, ChangeSubscription, ProviderHandle};
use crate::session::{Session, SessionStore};
use crate::time;
use std::cell::RefCell;
use std::rc::Rc;
use watcher::ChangeListeners;

/// In-memory connection state.
#[derive(Default)]
struct ConnectionState {
    wallet: Option<ProviderHandle>,
    account: Option<Account>,
    subscription: Option<ChangeSubscription>,
    /// A connect is in flight. A second connect resolves to `None` instead
    /// of interleaving with the pending picker or extension prompt.
    connecting: bool,
}

/// Clears the in-flight flag on every exit path out of `connect`.
struct ConnectGuard(Rc<RefCell<ConnectionState>>);

impl Drop for ConnectGuard {
    fn drop(&mut self) {
        self.0.borrow_mut().connecting = false;
    }
}

/// The connection state machine.
#[derive(Clone)]
pub struct WalletManager {
    registry: Rc<dyn WalletRegistry>,
    store: Rc<dyn SessionStore>,
    picker: Rc<dyn Picker>,
    state: Rc<RefCell<ConnectionState>>,
    listeners: ChangeListeners,
    config: Rc<LinkConfig>,
}

impl WalletManager {
    pub fn new(
        registry: Rc<dyn WalletRegistry>,
        store: Rc<dyn SessionStore>,
        picker: Rc<dyn Picker>,
    ) -> Self {
        Self::with_config(registry, store, picker, LinkConfig::default())
    }

    pub fn with_config(
        registry: Rc<dyn WalletRegistry>,
        store: Rc<dyn SessionStore>,
        picker: Rc<dyn Picker>,
        config: LinkConfig,
    ) -> Self {
        Self {
            registry,
            store,
            picker,
            state: Rc::new(RefCell::new(ConnectionState::default())),
            listeners: ChangeListeners::new(),
            config: Rc::new(config),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn is_connected(&self) -> bool {
        let state = self.state.borrow();
        state.wallet.is_some() && state.account.is_some()
    }

    pub fn address(&self) -> Option<String> {
        self.state
            .borrow()
            .account
            .as_ref()
            .map(|a| a.address.clone())
    }

    pub fn provider(&self) -> Option<ProviderHandle> {
        self.state.borrow().wallet.clone()
    }

    pub fn account(&self) -> Option<Account> {
        self.state.borrow().account.clone()
    }

    // =========================================================================
    // Connect
    // =========================================================================

    /// Negotiate a new session.
    ///
    /// Returns the connected address, or `None` when the user dismissed a
    /// picker - cancellation is a value here, never an error. Calling
    /// while already connected short-circuits to the current address
    /// without re-running discovery.
    pub async fn connect(&self) -> Result<Option<String>, ConnectError> {
        if let Some(address) = self.address() {
            return Ok(Some(address));
        }
        if self.state.borrow().connecting {
            tracing::debug!("connect already in flight");
            return Ok(None);
        }
        self.state.borrow_mut().connecting = true;
        let _guard = ConnectGuard(self.state.clone());

        self.drive_connect().await
    }

    async fn drive_connect(&self) -> Result<Option<String>, ConnectError> {
        let candidates = self.registry.sui_providers();
        if candidates.is_empty() {
            return Err(ConnectError::NoProviderFound);
        }

        let provider = if candidates.len() == 1 {
            Some(candidates[0].clone())
        } else {
            self.pick_provider(&candidates).await
        };
        let provider = match provider {
            Some(provider) => provider,
            None => return Ok(None),
        };

        // Tentatively bind the wallet so every failure path below restores
        // the pairing invariant through one place.
        self.state.borrow_mut().wallet = Some(provider.clone());

        let accounts = match time::timeout(self.config.connect_timeout, provider.connect()).await {
            Ok(Ok(accounts)) => accounts,
            Ok(Err(err)) => {
                self.reset_in_memory();
                return Err(ConnectError::Rejected(err));
            }
            Err(time::Elapsed) => {
                self.reset_in_memory();
                return Err(ConnectError::Timeout(self.config.connect_timeout));
            }
        };

        if accounts.is_empty() {
            self.reset_in_memory();
            return Err(ConnectError::NoAccountsFound);
        }

        let account = if accounts.len() == 1 {
            Some(accounts[0].clone())
        } else {
            self.pick_account(&provider, &accounts).await
        };
        let account = match account {
            Some(account) => account,
            None => {
                // Dismissal leaves everything exactly as before the call.
                self.reset_in_memory();
                return Ok(None);
            }
        };

        let address = account.address.clone();
        self.store.save(&Session {
            provider_name: provider.name(),
            account_address: address.clone(),
        });
        {
            let mut state = self.state.borrow_mut();
            state.wallet = Some(provider.clone());
            state.account = Some(account);
        }
        self.start_subscription(&provider);
        tracing::info!(address = %address, wallet = %provider.name(), "wallet connected");
        Ok(Some(address))
    }

    async fn pick_provider(&self, candidates: &[ProviderHandle]) -> Option<ProviderHandle> {
        let items = candidates
            .iter()
            .map(|p| PickItem {
                icon: p.icon(),
                label: p.name(),
                detail: None,
                value: p.name(),
            })
            .collect();
        let request = PickRequest {
            title: "Connect a wallet".to_string(),
            subtitle: "Choose which wallet to use".to_string(),
            hint: Some("Install a Sui wallet extension if none are listed.".to_string()),
            items,
        };
        let choice = self.picker.pick(request).await?;
        candidates.iter().find(|p| p.name() == choice).cloned()
    }

    async fn pick_account(
        &self,
        provider: &ProviderHandle,
        accounts: &[Account],
    ) -> Option<Account> {
        let items = accounts
            .iter()
            .map(|account| PickItem {
                icon: provider.icon(),
                label: account
                    .label
                    .clone()
                    .unwrap_or_else(|| status::truncate_address(&account.address)),
                detail: Some(status::truncate_address(&account.address)),
                value: account.address.clone(),
            })
            .collect();
        let request = PickRequest {
            title: "Select an account".to_string(),
            subtitle: provider.name(),
            hint: None,
            items,
        };
        let choice = self.picker.pick(request).await?;
        accounts.iter().find(|a| a.address == choice).cloned()
    }

    // =========================================================================
    // Restore
    // =========================================================================

    /// Silently re-establish the previous session, if any.
    ///
    /// Never fails: every internal error collapses into disconnect-style
    /// cleanup and a `None` return, so page initialization always
    /// proceeds. A `None` simply renders as "disconnected".
    pub async fn restore_connection(&self) -> Option<String> {
        if let Some(address) = self.address() {
            return Some(address);
        }
        let session = self.store.load()?;
        match self.try_restore(session).await {
            Ok(address) => address,
            Err(err) => {
                tracing::debug!(error = %err, "session restore failed");
                self.disconnect().await;
                None
            }
        }
    }

    async fn try_restore(&self, session: Session) -> anyhow::Result<Option<String>> {
        let provider = match self.find_provider(&session.provider_name).await {
            Some(provider) => provider,
            None => {
                tracing::debug!(
                    wallet = %session.provider_name,
                    "saved wallet not installed; clearing session"
                );
                self.store.clear();
                return Ok(None);
            }
        };

        // The extension remembers prior grants, so this resolves without
        // prompting the user.
        let accounts = provider.connect().await?;
        if accounts.is_empty() {
            self.disconnect().await;
            return Ok(None);
        }

        let account = accounts
            .iter()
            .find(|a| a.address == session.account_address)
            .cloned()
            .unwrap_or_else(|| accounts[0].clone());

        // Falling back to the first account also rewrites the saved
        // address, so the next restore targets what was actually used.
        self.store.save(&Session {
            provider_name: provider.name(),
            account_address: account.address.clone(),
        });

        let address = account.address.clone();
        {
            let mut state = self.state.borrow_mut();
            state.wallet = Some(provider.clone());
            state.account = Some(account);
        }
        self.start_subscription(&provider);
        tracing::info!(address = %address, wallet = %provider.name(), "session restored");
        Ok(Some(address))
    }

    /// Look up a provider by display name, retrying to tolerate extensions
    /// that register after page load.
    async fn find_provider(&self, name: &str) -> Option<ProviderHandle> {
        for attempt in 0..self.config.restore_retries {
            if attempt > 0 {
                time::sleep(self.config.restore_retry_delay).await;
            }
            if let Some(provider) = self
                .registry
                .sui_providers()
                .into_iter()
                .find(|p| p.name() == name)
            {
                return Some(provider);
            }
            tracing::trace!(wallet = %name, attempt, "provider not yet registered");
        }
        None
    }

    // =========================================================================
    // Disconnect
    // =========================================================================

    /// Tear down the session. Idempotent; revoke failures are swallowed so
    /// disconnect can never strand half-cleared state.
    pub async fn disconnect(&self) {
        let (provider, subscription) = {
            let mut state = self.state.borrow_mut();
            state.account = None;
            (state.wallet.take(), state.subscription.take())
        };
        if let Some(mut subscription) = subscription {
            subscription.unsubscribe();
        }
        if let Some(provider) = provider {
            if provider.capabilities().disconnect {
                // Best effort: revoke the cached grant so the next connect
                // prompts instead of silently reusing it.
                if let Err(err) = provider.disconnect().await {
                    tracing::debug!(error = %err, "wallet revoke failed");
                }
            }
            tracing::info!(wallet = %provider.name(), "wallet disconnected");
        }
        self.store.clear();
    }

    // =========================================================================
    // Change detector
    // =========================================================================

    /// Register a change listener; the callback receives the new address.
    pub fn on_account_change(&self, listener: impl Fn(&str) + 'static) -> ListenerId {
        self.listeners.add(listener)
    }

    /// Remove a previously registered listener. Idempotent.
    pub fn remove_listener(&self, id: ListenerId) {
        self.listeners.remove(id);
    }

    /// Event-channel entry point: the provider announced a new authorized
    /// account list.
    pub fn handle_change_event(&self, accounts: Vec<Account>) {
        let next = match accounts.into_iter().next() {
            Some(account) => account,
            None => return,
        };
        self.adopt_if_changed(next);
    }

    /// Visibility-poll entry point: called on every return to the
    /// foreground. Reads the provider's live account list directly and
    /// no-ops while disconnected, so the hook can stay attached for the
    /// page's lifetime.
    pub fn sync_accounts(&self) {
        let (provider, current) = {
            let state = self.state.borrow();
            match (&state.wallet, &state.account) {
                (Some(wallet), Some(account)) => (wallet.clone(), account.address.clone()),
                _ => return,
            }
        };
        let live = provider.accounts();
        let first = match live.first() {
            Some(account) => account.clone(),
            None => return,
        };
        let still_present = live.iter().any(|a| a.address == current);
        if !still_present || first.address != current {
            self.adopt_if_changed(first);
        }
    }

    /// Shared tail of both detector channels: swap in the new account,
    /// persist it, notify listeners. Re-validates current state under the
    /// borrow - a detector callback can land between two awaited steps of
    /// another operation, so nothing read earlier is trusted here.
    fn adopt_if_changed(&self, next: Account) {
        let address = next.address.clone();
        let provider_name = {
            let mut guard = self.state.borrow_mut();
            let state = &mut *guard;
            match (&state.wallet, &mut state.account) {
                (Some(wallet), Some(current)) => {
                    if current.address == address {
                        return;
                    }
                    *current = next;
                    wallet.name()
                }
                _ => return,
            }
        };
        self.store.save(&Session {
            provider_name,
            account_address: address.clone(),
        });
        tracing::info!(address = %address, "active account changed");
        self.listeners.emit(&address);
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Event channel of the change detector. Present only when the wallet
    /// exposes `standard:events`; the visibility poll covers wallets that
    /// do not, and wallets whose events go missing in practice.
    fn start_subscription(&self, provider: &ProviderHandle) {
        if !provider.capabilities().events {
            return;
        }
        let manager = self.clone();
        let subscription = provider.subscribe_change(Box::new(move |accounts| {
            manager.handle_change_event(accounts);
        }));
        self.state.borrow_mut().subscription = subscription;
    }

    /// Drop wallet, account, and subscription together, restoring the
    /// pairing invariant on failure paths. The subscription is released
    /// outside the borrow in case its cancel closure re-enters the
    /// manager.
    fn reset_in_memory(&self) {
        let subscription = {
            let mut state = self.state.borrow_mut();
            state.wallet = None;
            state.account = None;
            state.subscription.take()
        };
        if let Some(mut subscription) = subscription {
            subscription.unsubscribe();
        }
    }
}
