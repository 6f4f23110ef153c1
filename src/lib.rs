//! Suilink: browser-resident Sui wallet session manager.
//!
//! Negotiates a connection between a page and one of several installed
//! wallet extensions, persists the resulting session across reloads, and
//! keeps the page's view of "who is connected" aligned with the extension's
//! own state - which can change at any time outside the page's control
//! (account switch, revoked grant, extension loading after the page).
//!
//! # Architecture
//!
//! ```text
//! WalletManager (connection state machine)
//!   │
//!   ├── WalletRegistry ──── installed providers (read fresh, never cached)
//!   ├── SessionStore ────── durable {wallet name, address} record
//!   ├── Picker ──────────── modal disambiguation (wallet, then account)
//!   └── change detector ─── event subscription + visibility poll
//!         └── listener fan-out → page chrome
//! ```
//!
//! # Operations
//!
//! | Operation | Behavior |
//! |-----------|----------|
//! | `connect` | discover → pick → authorize → persist → watch |
//! | `restore_connection` | silent re-connect from the saved session; never fails |
//! | `disconnect` | unsubscribe, best-effort revoke, clear state + session |
//! | `sync_accounts` | visibility-poll channel of the change detector |
//!
//! # Features
//!
//! - `native` (default) - tokio timers and the tracing subscriber; the
//!   platform the test suite runs on.
//! - `wasm` - browser platform: Wallet Standard window registry,
//!   localStorage session store, DOM picker, `visibilitychange` hook, and
//!   the JS-facing [`wasm::WalletBridge`].
//!
//! One of the two platform features must be enabled.
//!
//! # Usage
//!
//! ```ignore
//! use std::rc::Rc;
//! use suilink::{MemorySessionStore, WalletManager};
//!
//! let manager = WalletManager::new(registry, Rc::new(MemorySessionStore::new()), picker);
//!
//! // Page init: silently pick up where the last visit left off.
//! let restored = manager.restore_connection().await;
//!
//! // Connect button: discovery, picker(s), extension prompt.
//! match manager.connect().await? {
//!     Some(address) => println!("connected as {address}"),
//!     None => {} // user closed the picker; not an error
//! }
//! ```

// =============================================================================
// Shared modules (compile everywhere)
// =============================================================================
pub mod config;
pub mod error;
pub mod manager;
pub mod picker;
pub mod provider;
pub mod session;
pub mod time;

// =============================================================================
// Native-only modules
// =============================================================================
#[cfg(feature = "native")]
pub mod logging;

// =============================================================================
// WASM-only modules (browser, wasm-bindgen)
// =============================================================================
#[cfg(feature = "wasm")]
pub mod wasm;

// =============================================================================
// Re-exports
// =============================================================================
pub use config::LinkConfig;
pub use error::{ConnectError, ProviderError};
pub use manager::{ConnectionStatus, ListenerId, WalletManager};
pub use picker::{PickItem, PickRequest, Picker};
pub use provider::registry::WalletRegistry;
pub use provider::{
    Account, ChangeHandler, ChangeSubscription, ProviderCapabilities, ProviderHandle,
    WalletProvider, SUI_CHAIN_PREFIX,
};
pub use session::{MemorySessionStore, Session, SessionStore};

#[cfg(feature = "wasm")]
pub use wasm::{DomPicker, DomWalletRegistry, LocalStorageSessionStore, WalletBridge};
