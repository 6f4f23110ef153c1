//! Raw bindings to Wallet Standard wallet objects.
//!
//! A standard wallet is a plain JS object: `name`/`icon`/`chains`/
//! `accounts` data properties plus a `features` record keyed by strings
//! like `"standard:connect"`. Feature methods are reached through
//! `Reflect` because the feature set is open-ended and wallet-defined.

use js_sys::{Function, Object, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

#[wasm_bindgen]
extern "C" {
    /// A wallet registered through the `wallet-standard:register-wallet`
    /// handshake.
    #[derive(Clone)]
    pub type StandardWallet;

    /// A name for the wallet, shown when asking the user which wallet to
    /// connect with. Also the durable session lookup key.
    #[wasm_bindgen(method, getter)]
    pub fn name(this: &StandardWallet) -> String;

    /// A data-URI image for the wallet picker.
    #[wasm_bindgen(method, getter)]
    pub fn icon(this: &StandardWallet) -> String;

    /// Chain identifiers the wallet supports (`sui:mainnet`, ...).
    #[wasm_bindgen(method, getter)]
    pub fn chains(this: &StandardWallet) -> js_sys::Array;

    /// The live authorized account list. Reflects real-time authorization
    /// state without a fresh connect call.
    #[wasm_bindgen(method, getter)]
    pub fn accounts(this: &StandardWallet) -> js_sys::Array;

    /// The feature record (`"standard:connect"`, `"standard:events"`, ...).
    #[wasm_bindgen(method, getter)]
    pub fn features(this: &StandardWallet) -> Object;

    /// An account object exposed by a standard wallet.
    #[derive(Clone)]
    pub type StandardAccount;

    #[wasm_bindgen(method, getter)]
    pub fn address(this: &StandardAccount) -> String;

    #[wasm_bindgen(method, getter)]
    pub fn label(this: &StandardAccount) -> Option<String>;

    #[wasm_bindgen(method, getter, js_name = "publicKey")]
    pub fn public_key(this: &StandardAccount) -> JsValue;

    #[wasm_bindgen(method, getter, js_name = "chains")]
    pub fn account_chains(this: &StandardAccount) -> js_sys::Array;
}

/// Look up `features[key]`, if the wallet carries it.
pub(super) fn feature(wallet: &StandardWallet, key: &str) -> Option<Object> {
    let value = Reflect::get(&wallet.features(), &JsValue::from_str(key)).ok()?;
    value.dyn_into::<Object>().ok()
}

/// Fetch `feature[method]` as a callable.
pub(super) fn feature_method(feature: &Object, method: &str) -> Option<Function> {
    let value = Reflect::get(feature, &JsValue::from_str(method)).ok()?;
    value.dyn_into::<Function>().ok()
}
