//! Change-notification fan-out shared by both detector channels.

use std::cell::RefCell;
use std::rc::Rc;

/// Token returned by [`ChangeListeners::add`]; removal is idempotent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u32);

type Listener = Box<dyn Fn(&str)>;

/// Registered change listeners. Every emit reaches every listener: a
/// panicking listener is contained and the rest still run.
#[derive(Clone, Default)]
pub(crate) struct ChangeListeners {
    inner: Rc<RefCell<Inner>>,
}

#[derive(Default)]
struct Inner {
    next_id: u32,
    listeners: Vec<(ListenerId, Rc<Listener>)>,
}

impl ChangeListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, listener: impl Fn(&str) + 'static) -> ListenerId {
        let mut inner = self.inner.borrow_mut();
        let id = ListenerId(inner.next_id);
        inner.next_id += 1;
        inner.listeners.push((id, Rc::new(Box::new(listener))));
        id
    }

    pub fn remove(&self, id: ListenerId) {
        self.inner.borrow_mut().listeners.retain(|(lid, _)| *lid != id);
    }

    /// Invoke every listener with the new address. The list is
    /// snapshotted first, so a listener that adds or removes
    /// registrations does not invalidate the iteration.
    pub fn emit(&self, address: &str) {
        let snapshot: Vec<Rc<Listener>> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in snapshot {
            Self::invoke(&listener, address);
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn invoke(listener: &Listener, address: &str) {
        use std::panic::{catch_unwind, AssertUnwindSafe};
        if catch_unwind(AssertUnwindSafe(|| listener(address))).is_err() {
            tracing::warn!("change listener panicked");
        }
    }

    // wasm32 builds abort on panic; there is nothing to contain.
    #[cfg(target_arch = "wasm32")]
    fn invoke(listener: &Listener, address: &str) {
        listener(address);
    }
}
