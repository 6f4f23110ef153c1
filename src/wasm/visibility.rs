//! Page-visibility channel of the change detector.
//!
//! Process-wide and always active: one `visibilitychange` listener that
//! pokes the manager whenever the tab returns to the foreground. The
//! manager no-ops while disconnected, so the hook stays attached for the
//! page's lifetime rather than churning with connect/disconnect.

use crate::manager::WalletManager;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// Keeps the listener closure alive; dropping this detaches the channel,
/// so the bridge holds it for as long as the page runs.
pub struct VisibilityHook {
    _closure: Closure<dyn Fn()>,
}

pub fn attach(manager: WalletManager) -> Result<VisibilityHook, JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let doc = document.clone();
    let closure = Closure::<dyn Fn()>::new(move || {
        if doc.visibility_state() == web_sys::VisibilityState::Visible {
            manager.sync_accounts();
        }
    });
    document
        .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref())?;

    Ok(VisibilityHook { _closure: closure })
}
