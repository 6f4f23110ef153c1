//! WASM module: the browser edition.
//!
//! Wires the platform-independent state machine to the real page
//! environment:
//! - Wallet Standard window registry (discovery handshake)
//! - localStorage session store
//! - DOM modal picker
//! - `visibilitychange` hook (the poll channel of the change detector)
//! - [`WalletBridge`], the JS-facing facade
//!
//! Architecture:
//! ```text
//! ┌─────────────────────────────────────────┐
//! │        WalletBridge (JS API)            │
//! │  connect, restoreConnection,            │
//! │  disconnect, onAccountChange            │
//! └─────────────────┬───────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────┐
//! │      WalletManager (state machine)      │
//! └──┬──────────────┬──────────────────┬────┘
//!    │              │                  │
//! ┌──▼───────┐ ┌────▼────────────┐ ┌───▼──────────┐
//! │DomPicker │ │DomWalletRegistry│ │ localStorage │
//! └──────────┘ └─────────────────┘ └──────────────┘
//! ```

mod bindings;
mod bridge;
mod picker;
mod registry;
mod storage;
mod visibility;

pub use bridge::WalletBridge;
pub use picker::DomPicker;
pub use registry::{DomWalletRegistry, StandardWalletProvider};
pub use storage::LocalStorageSessionStore;
pub use visibility::VisibilityHook;

use wasm_bindgen::prelude::*;

/// Initialize WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Log to browser console
pub fn console_log(s: &str) {
    web_sys::console::log_1(&JsValue::from_str(s));
}

macro_rules! log {
    ($($t:tt)*) => {
        crate::wasm::console_log(&format!($($t)*))
    }
}

pub(crate) use log;
