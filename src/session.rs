//! Session persistence - the durable record that makes reconnects silent.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;

/// Storage keys for the browser edition. Always written and cleared
/// together; partial session state is never persisted.
pub const PROVIDER_KEY: &str = "suilink.wallet";
pub const ADDRESS_KEY: &str = "suilink.address";

/// The persisted session record.
///
/// Valid at write time only: it implies the named wallet had the address
/// in its authorized set when saved, and nothing more. The wallet is
/// externally mutable, so the record can go stale at any moment - restore
/// re-validates against the live registry instead of trusting it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub provider_name: String,
    pub account_address: String,
}

/// Origin-scoped durable key/value persistence.
///
/// Side effect only: implementations store and return. Whether the saved
/// wallet or account still exists is the caller's problem at restore time.
pub trait SessionStore {
    fn save(&self, session: &Session);
    fn load(&self) -> Option<Session>;
    fn clear(&self);
}

/// In-memory store - the native counterpart of the browser's localStorage
/// edition, and the default for tests.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: RefCell<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn save(&self, session: &Session) {
        *self.slot.borrow_mut() = Some(session.clone());
    }

    fn load(&self) -> Option<Session> {
        self.slot.borrow().clone()
    }

    fn clear(&self) {
        self.slot.borrow_mut().take();
    }
}
