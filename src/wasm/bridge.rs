//! JS-facing facade - exposes the state machine to the page.

use super::log;
use super::picker::DomPicker;
use super::registry::DomWalletRegistry;
use super::storage::LocalStorageSessionStore;
use super::visibility::{self, VisibilityHook};
use crate::manager::{ListenerId, WalletManager};
use std::rc::Rc;
use wasm_bindgen::prelude::*;

/// Browser entry point. Construct once per page; hand the instance to
/// whatever chrome renders the connect/disconnect affordances.
#[wasm_bindgen]
pub struct WalletBridge {
    manager: WalletManager,
    _visibility: VisibilityHook,
}

#[wasm_bindgen]
impl WalletBridge {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WalletBridge, JsValue> {
        log!("[suilink] bridge starting");
        let registry = Rc::new(DomWalletRegistry::attach()?);
        let manager = WalletManager::new(
            registry,
            Rc::new(LocalStorageSessionStore::new()),
            Rc::new(DomPicker::new()),
        );
        let visibility = visibility::attach(manager.clone())?;
        Ok(Self {
            manager,
            _visibility: visibility,
        })
    }

    /// User-initiated connect. Resolves to the address, or `null` when
    /// the user dismissed a picker; rejects on reportable setup errors
    /// (no wallet, no accounts, wallet refused, timeout).
    #[wasm_bindgen]
    pub async fn connect(&self) -> Result<Option<String>, JsValue> {
        self.manager
            .connect()
            .await
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }

    /// Silent session restore for page init. Never rejects; a failed
    /// restore just leaves the page disconnected.
    #[wasm_bindgen(js_name = "restoreConnection")]
    pub async fn restore_connection(&self) -> Option<String> {
        self.manager.restore_connection().await
    }

    #[wasm_bindgen]
    pub async fn disconnect(&self) {
        self.manager.disconnect().await;
    }

    #[wasm_bindgen(js_name = "isConnected")]
    pub fn is_connected(&self) -> bool {
        self.manager.is_connected()
    }

    #[wasm_bindgen(getter)]
    pub fn address(&self) -> Option<String> {
        self.manager.address()
    }

    /// Truncated address (`0x4f2a...4455`) for tight chrome.
    #[wasm_bindgen(getter, js_name = "displayAddress")]
    pub fn display_address(&self) -> Option<String> {
        self.manager.status().display_address
    }

    /// Subscribe a JS callback to account changes; returns a token for
    /// [`offAccountChange`](Self::off_account_change).
    #[wasm_bindgen(js_name = "onAccountChange")]
    pub fn on_account_change(&self, callback: js_sys::Function) -> u32 {
        let id = self.manager.on_account_change(move |address| {
            let _ = callback.call1(&JsValue::NULL, &JsValue::from_str(address));
        });
        id.0
    }

    #[wasm_bindgen(js_name = "offAccountChange")]
    pub fn off_account_change(&self, token: u32) {
        self.manager.remove_listener(ListenerId(token));
    }
}
