//! localStorage-backed session store (browser edition).

use crate::session::{Session, SessionStore, ADDRESS_KEY, PROVIDER_KEY};

/// Origin-scoped persistence via `window.localStorage`. Both keys are
/// written and cleared together; localStorage writes are synchronous, so
/// a half-written pair is never observable.
///
/// A page without storage access (sandboxed iframe, privacy mode) degrades
/// to the no-session behavior: saves vanish and loads return nothing.
#[derive(Debug, Default)]
pub struct LocalStorageSessionStore;

impl LocalStorageSessionStore {
    pub fn new() -> Self {
        Self
    }

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

impl SessionStore for LocalStorageSessionStore {
    fn save(&self, session: &Session) {
        if let Some(storage) = Self::storage() {
            let _ = storage.set_item(PROVIDER_KEY, &session.provider_name);
            let _ = storage.set_item(ADDRESS_KEY, &session.account_address);
        }
    }

    fn load(&self) -> Option<Session> {
        let storage = Self::storage()?;
        let provider_name = storage.get_item(PROVIDER_KEY).ok().flatten()?;
        let account_address = storage.get_item(ADDRESS_KEY).ok().flatten()?;
        Some(Session {
            provider_name,
            account_address,
        })
    }

    fn clear(&self) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(PROVIDER_KEY);
            let _ = storage.remove_item(ADDRESS_KEY);
        }
    }
}
