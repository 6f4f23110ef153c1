//! Wallet Standard discovery: the window event handshake, plus the
//! adapter that turns a raw standard wallet into a [`WalletProvider`].

use super::bindings::{self, StandardAccount, StandardWallet};
use super::log;
use crate::error::ProviderError;
use crate::provider::registry::WalletRegistry;
use crate::provider::{
    Account, ChangeHandler, ChangeSubscription, ProviderCapabilities, ProviderHandle,
    WalletProvider,
};
use async_trait::async_trait;
use js_sys::{Array, Function, Object, Promise, Reflect, Uint8Array};
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

const FEATURE_CONNECT: &str = "standard:connect";
const FEATURE_DISCONNECT: &str = "standard:disconnect";
const FEATURE_EVENTS: &str = "standard:events";
const FEATURE_SIGN_EXECUTE: &str = "sui:signAndExecuteTransactionBlock";

const EVENT_REGISTER: &str = "wallet-standard:register-wallet";
const EVENT_APP_READY: &str = "wallet-standard:app-ready";

fn js_error_message(err: &JsValue) -> String {
    err.as_string()
        .or_else(|| {
            Reflect::get(err, &JsValue::from_str("message"))
                .ok()
                .and_then(|m| m.as_string())
        })
        .unwrap_or_else(|| "wallet call failed".to_string())
}

fn account_from_js(account: &StandardAccount) -> Account {
    Account {
        address: account.address(),
        label: account.label(),
        public_key: Uint8Array::new(&account.public_key()).to_vec(),
        chains: account
            .account_chains()
            .iter()
            .filter_map(|c| c.as_string())
            .collect(),
    }
}

fn accounts_from_array(array: &Array) -> Vec<Account> {
    array
        .iter()
        .map(|value| account_from_js(&value.unchecked_into::<StandardAccount>()))
        .collect()
}

fn set(target: &Object, key: &str, value: &JsValue) -> Result<(), ProviderError> {
    Reflect::set(target, &JsValue::from_str(key), value)
        .map(|_| ())
        .map_err(|err| ProviderError::new(js_error_message(&err)))
}

/// Adapter from a raw standard wallet to the session manager's provider
/// trait. Capabilities are probed once here and cached for the life of
/// the handle.
pub struct StandardWalletProvider {
    wallet: StandardWallet,
    capabilities: ProviderCapabilities,
}

impl StandardWalletProvider {
    pub fn new(wallet: StandardWallet) -> Self {
        let capabilities = ProviderCapabilities {
            disconnect: bindings::feature(&wallet, FEATURE_DISCONNECT).is_some(),
            events: bindings::feature(&wallet, FEATURE_EVENTS).is_some(),
        };
        Self {
            wallet,
            capabilities,
        }
    }

    fn call_feature(&self, key: &str, method: &str, args: &Array) -> Result<JsValue, ProviderError> {
        let feature = bindings::feature(&self.wallet, key)
            .ok_or_else(|| ProviderError::new(format!("wallet lacks {key}")))?;
        let function = bindings::feature_method(&feature, method)
            .ok_or_else(|| ProviderError::new(format!("{key} has no {method} method")))?;
        function
            .apply(&feature, args)
            .map_err(|err| ProviderError::new(js_error_message(&err)))
    }

    async fn await_feature(
        &self,
        key: &str,
        method: &str,
        args: &Array,
    ) -> Result<JsValue, ProviderError> {
        let value = self.call_feature(key, method, args)?;
        let promise: Promise = value
            .dyn_into()
            .map_err(|_| ProviderError::new(format!("{key}.{method} did not return a promise")))?;
        JsFuture::from(promise)
            .await
            .map_err(|err| ProviderError::new(js_error_message(&err)))
    }
}

#[async_trait(?Send)]
impl WalletProvider for StandardWalletProvider {
    fn name(&self) -> String {
        self.wallet.name()
    }

    fn icon(&self) -> String {
        self.wallet.icon()
    }

    fn chains(&self) -> Vec<String> {
        self.wallet
            .chains()
            .iter()
            .filter_map(|c| c.as_string())
            .collect()
    }

    fn accounts(&self) -> Vec<Account> {
        accounts_from_array(&self.wallet.accounts())
    }

    fn capabilities(&self) -> ProviderCapabilities {
        self.capabilities
    }

    async fn connect(&self) -> Result<Vec<Account>, ProviderError> {
        let result = self
            .await_feature(FEATURE_CONNECT, "connect", &Array::new())
            .await?;
        let accounts = Reflect::get(&result, &JsValue::from_str("accounts"))
            .ok()
            .and_then(|a| a.dyn_into::<Array>().ok())
            .map(|a| accounts_from_array(&a))
            .unwrap_or_default();
        Ok(accounts)
    }

    async fn disconnect(&self) -> Result<(), ProviderError> {
        self.await_feature(FEATURE_DISCONNECT, "disconnect", &Array::new())
            .await?;
        Ok(())
    }

    fn subscribe_change(&self, handler: ChangeHandler) -> Option<ChangeSubscription> {
        let feature = bindings::feature(&self.wallet, FEATURE_EVENTS)?;
        let on = bindings::feature_method(&feature, "on")?;

        let callback = Closure::<dyn Fn(JsValue)>::new(move |event: JsValue| {
            let accounts = Reflect::get(&event, &JsValue::from_str("accounts"))
                .ok()
                .and_then(|a| a.dyn_into::<Array>().ok())
                .map(|a| accounts_from_array(&a))
                .unwrap_or_default();
            handler(accounts);
        });

        let unsubscribe = on
            .call2(&feature, &JsValue::from_str("change"), callback.as_ref())
            .ok()?;
        let unsubscribe: Option<Function> = unsubscribe.dyn_into().ok();

        // The callback must stay alive until the wallet lets go of it;
        // moving it into the cancel closure ties the two lifetimes.
        Some(ChangeSubscription::new(move || {
            if let Some(f) = &unsubscribe {
                let _ = f.call0(&JsValue::NULL);
            }
            drop(callback);
        }))
    }

    async fn sign_and_execute(&self, account: &Account, tx: Value) -> Result<Value, ProviderError> {
        // The wallet expects its own live account object, not a snapshot.
        let js_account = self
            .wallet
            .accounts()
            .iter()
            .map(|v| v.unchecked_into::<StandardAccount>())
            .find(|a| a.address() == account.address)
            .ok_or_else(|| ProviderError::new("account is no longer authorized"))?;

        let input = Object::new();
        let payload = serde_wasm_bindgen::to_value(&tx)
            .map_err(|err| ProviderError::new(err.to_string()))?;
        set(&input, "transactionBlock", &payload)?;
        set(&input, "account", js_account.as_ref())?;

        let result = self
            .await_feature(
                FEATURE_SIGN_EXECUTE,
                "signAndExecuteTransactionBlock",
                &Array::of1(&input),
            )
            .await?;
        serde_wasm_bindgen::from_value(result).map_err(|err| ProviderError::new(err.to_string()))
    }
}

/// The window-level wallet collection, populated through the Wallet
/// Standard handshake.
///
/// `providers()` wraps the raw wallets fresh on every call - wallets can
/// register at any time after page load, and the capability probe belongs
/// to the handle built at connect time, not to discovery.
pub struct DomWalletRegistry {
    wallets: Rc<RefCell<Vec<StandardWallet>>>,
    // Handed to wallets during the handshake; they may call register()
    // long after attach() returns.
    _register: Closure<dyn Fn(JsValue)>,
    _on_register: Closure<dyn Fn(web_sys::Event)>,
}

impl DomWalletRegistry {
    /// Join the Wallet Standard handshake: listen for late registrations
    /// and announce readiness so already-loaded wallets call back in.
    pub fn attach() -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let wallets: Rc<RefCell<Vec<StandardWallet>>> = Rc::new(RefCell::new(Vec::new()));

        let sink = wallets.clone();
        let register = Closure::<dyn Fn(JsValue)>::new(move |wallet: JsValue| {
            let wallet: StandardWallet = wallet.unchecked_into();
            log!("[suilink] wallet registered: {}", wallet.name());
            sink.borrow_mut().push(wallet);
        });

        let api = Object::new();
        Reflect::set(&api, &JsValue::from_str("register"), register.as_ref())?;

        // Wallets that load after us fire register-wallet with a callback
        // wanting our api object.
        let api_for_listener: JsValue = api.clone().into();
        let on_register = Closure::<dyn Fn(web_sys::Event)>::new(move |event: web_sys::Event| {
            let custom: web_sys::CustomEvent = match event.dyn_into() {
                Ok(custom) => custom,
                Err(_) => return,
            };
            let callback: Function = match custom.detail().dyn_into() {
                Ok(callback) => callback,
                Err(_) => return,
            };
            let _ = callback.call1(&JsValue::NULL, &api_for_listener);
        });
        window.add_event_listener_with_callback(
            EVENT_REGISTER,
            on_register.as_ref().unchecked_ref(),
        )?;

        // Wallets that loaded before us hear this and register back.
        let init = web_sys::CustomEventInit::new();
        init.set_detail(&api);
        let ready = web_sys::CustomEvent::new_with_event_init_dict(EVENT_APP_READY, &init)?;
        window.dispatch_event(&ready)?;

        Ok(Self {
            wallets,
            _register: register,
            _on_register: on_register,
        })
    }
}

impl WalletRegistry for DomWalletRegistry {
    fn providers(&self) -> Vec<ProviderHandle> {
        self.wallets
            .borrow()
            .iter()
            .map(|wallet| {
                Rc::new(StandardWalletProvider::new(wallet.clone())) as ProviderHandle
            })
            .collect()
    }
}
