//! Shared fixtures for the integration tests: scripted pickers, mock
//! providers with live account lists, and registries whose contents can
//! change between polls.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;
use suilink::{
    Account, ChangeHandler, ChangeSubscription, LinkConfig, MemorySessionStore, PickRequest,
    Picker, ProviderCapabilities, ProviderError, ProviderHandle, WalletManager, WalletProvider,
    WalletRegistry,
};

pub fn account(address: &str) -> Account {
    Account {
        address: address.to_string(),
        label: None,
        public_key: vec![0u8; 32],
        chains: vec!["sui:testnet".to_string()],
    }
}

/// Observable internals of a [`MockProvider`].
#[derive(Default)]
pub struct MockState {
    /// Live authorized list; also what `connect` returns.
    pub accounts: Vec<Account>,
    /// When set, `connect` rejects with this message.
    pub reject_connect: Option<String>,
    /// When set, `connect` never resolves.
    pub hang_connect: bool,
    pub connect_calls: u32,
    pub disconnect_calls: u32,
    pub unsubscribes: u32,
    handler: Option<Rc<dyn Fn(Vec<Account>)>>,
}

/// A wallet extension stand-in the tests can mutate mid-flight.
pub struct MockProvider {
    name: String,
    chains: Vec<String>,
    capabilities: ProviderCapabilities,
    pub state: Rc<RefCell<MockState>>,
}

impl MockProvider {
    pub fn new(name: &str, accounts: Vec<Account>) -> Rc<Self> {
        Self::with_capabilities(
            name,
            accounts,
            ProviderCapabilities {
                disconnect: true,
                events: true,
            },
        )
    }

    pub fn with_capabilities(
        name: &str,
        accounts: Vec<Account>,
        capabilities: ProviderCapabilities,
    ) -> Rc<Self> {
        Rc::new(Self {
            name: name.to_string(),
            chains: vec!["sui:testnet".to_string()],
            capabilities,
            state: Rc::new(RefCell::new(MockState {
                accounts,
                ..Default::default()
            })),
        })
    }

    /// A wallet from another ecosystem; discovery must skip it.
    pub fn non_sui(name: &str) -> Rc<Self> {
        Rc::new(Self {
            name: name.to_string(),
            chains: vec!["eip155:1".to_string()],
            capabilities: ProviderCapabilities::default(),
            state: Rc::new(RefCell::new(MockState::default())),
        })
    }

    pub fn handle(self: &Rc<Self>) -> ProviderHandle {
        self.clone()
    }

    /// Fire the event channel the way the extension would.
    pub fn fire_change(&self, accounts: Vec<Account>) {
        let handler = self.state.borrow().handler.clone();
        if let Some(handler) = handler {
            handler(accounts);
        }
    }

    /// Mutate the live authorized list behind the page's back.
    pub fn set_accounts(&self, accounts: Vec<Account>) {
        self.state.borrow_mut().accounts = accounts;
    }

    pub fn has_change_handler(&self) -> bool {
        self.state.borrow().handler.is_some()
    }
}

#[async_trait(?Send)]
impl WalletProvider for MockProvider {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn icon(&self) -> String {
        format!("data:,{}", self.name)
    }

    fn chains(&self) -> Vec<String> {
        self.chains.clone()
    }

    fn accounts(&self) -> Vec<Account> {
        self.state.borrow().accounts.clone()
    }

    fn capabilities(&self) -> ProviderCapabilities {
        self.capabilities
    }

    async fn connect(&self) -> Result<Vec<Account>, ProviderError> {
        let hang = {
            let mut state = self.state.borrow_mut();
            state.connect_calls += 1;
            if let Some(message) = &state.reject_connect {
                return Err(ProviderError::new(message.clone()));
            }
            state.hang_connect
        };
        if hang {
            std::future::pending::<()>().await;
        }
        Ok(self.state.borrow().accounts.clone())
    }

    async fn disconnect(&self) -> Result<(), ProviderError> {
        self.state.borrow_mut().disconnect_calls += 1;
        Ok(())
    }

    fn subscribe_change(&self, handler: ChangeHandler) -> Option<ChangeSubscription> {
        if !self.capabilities.events {
            return None;
        }
        self.state.borrow_mut().handler = Some(handler.into());
        let state = self.state.clone();
        Some(ChangeSubscription::new(move || {
            let mut state = state.borrow_mut();
            state.handler = None;
            state.unsubscribes += 1;
        }))
    }

    async fn sign_and_execute(&self, _account: &Account, _tx: Value) -> Result<Value, ProviderError> {
        Ok(json!({ "digest": "mock" }))
    }
}

/// Registry over an externally mutable provider list. Counts polls so
/// tests can assert discovery really was skipped or retried.
#[derive(Clone, Default)]
pub struct MockRegistry {
    providers: Rc<RefCell<Vec<ProviderHandle>>>,
    polls: Rc<RefCell<u32>>,
}

impl MockRegistry {
    pub fn new(providers: Vec<ProviderHandle>) -> Self {
        Self {
            providers: Rc::new(RefCell::new(providers)),
            polls: Rc::new(RefCell::new(0)),
        }
    }

    pub fn poll_count(&self) -> u32 {
        *self.polls.borrow()
    }
}

impl WalletRegistry for MockRegistry {
    fn providers(&self) -> Vec<ProviderHandle> {
        *self.polls.borrow_mut() += 1;
        self.providers.borrow().clone()
    }
}

/// Registry whose provider only shows up after a number of polls - an
/// extension that registers late, the case the restore retry exists for.
pub struct LateRegistry {
    provider: ProviderHandle,
    appear_after: u32,
    polls: Rc<RefCell<u32>>,
}

impl LateRegistry {
    pub fn new(provider: ProviderHandle, appear_after: u32) -> Self {
        Self {
            provider,
            appear_after,
            polls: Rc::new(RefCell::new(0)),
        }
    }

    pub fn poll_count(&self) -> u32 {
        *self.polls.borrow()
    }
}

impl WalletRegistry for LateRegistry {
    fn providers(&self) -> Vec<ProviderHandle> {
        let mut polls = self.polls.borrow_mut();
        *polls += 1;
        if *polls > self.appear_after {
            vec![self.provider.clone()]
        } else {
            Vec::new()
        }
    }
}

/// Picker that replays a scripted response sequence and records every
/// request it was shown; an exhausted script dismisses.
#[derive(Default)]
pub struct ScriptedPicker {
    responses: RefCell<VecDeque<Option<String>>>,
    pub requests: RefCell<Vec<PickRequest>>,
}

impl ScriptedPicker {
    /// Every invocation is dismissed.
    pub fn dismiss_all() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn with_responses(responses: Vec<Option<String>>) -> Rc<Self> {
        Rc::new(Self {
            responses: RefCell::new(responses.into_iter().collect()),
            requests: RefCell::new(Vec::new()),
        })
    }

    pub fn times_shown(&self) -> usize {
        self.requests.borrow().len()
    }
}

#[async_trait(?Send)]
impl Picker for ScriptedPicker {
    async fn pick(&self, request: PickRequest) -> Option<String> {
        self.requests.borrow_mut().push(request);
        self.responses.borrow_mut().pop_front().flatten()
    }
}

/// Picker that stalls before answering - long enough for a second
/// operation to overlap the first.
pub struct SlowPicker {
    pub response: Option<String>,
    pub delay: Duration,
}

#[async_trait(?Send)]
impl Picker for SlowPicker {
    async fn pick(&self, _request: PickRequest) -> Option<String> {
        tokio::time::sleep(self.delay).await;
        self.response.clone()
    }
}

/// Manager wired to the given collaborators with test-speed timings.
pub fn manager_with(
    registry: Rc<dyn WalletRegistry>,
    picker: Rc<dyn Picker>,
) -> (WalletManager, Rc<MemorySessionStore>) {
    let store = Rc::new(MemorySessionStore::new());
    let manager = WalletManager::with_config(
        registry,
        store.clone(),
        picker,
        LinkConfig::default()
            .with_restore_retries(3)
            .with_restore_retry_delay(Duration::from_millis(10))
            .with_connect_timeout(Duration::from_millis(200)),
    );
    (manager, store)
}
