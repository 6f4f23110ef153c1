//! Change-detector tests: both channels, the notification fan-out, and
//! disconnect teardown.

mod common;

use common::*;
use std::cell::RefCell;
use std::rc::Rc;
use suilink::{MemorySessionStore, ProviderCapabilities, Session, SessionStore, WalletManager};

type Notifications = Rc<RefCell<Vec<String>>>;

fn recorder(manager: &WalletManager) -> Notifications {
    let log: Notifications = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    manager.on_account_change(move |address| sink.borrow_mut().push(address.to_string()));
    log
}

async fn connected_manager() -> (WalletManager, Rc<MemorySessionStore>, Rc<MockProvider>) {
    let provider = MockProvider::new("Acme", vec![account("0xAAA")]);
    let registry = MockRegistry::new(vec![provider.handle()]);
    let (manager, store) = manager_with(Rc::new(registry), ScriptedPicker::dismiss_all());
    manager.connect().await.expect("connect");
    (manager, store, provider)
}

// =============================================================================
// Event channel
// =============================================================================

#[tokio::test]
async fn event_channel_adopts_the_new_account() {
    let (manager, store, provider) = connected_manager().await;
    let log = recorder(&manager);

    provider.fire_change(vec![account("0xBBB")]);

    assert_eq!(manager.address().as_deref(), Some("0xBBB"));
    assert_eq!(*log.borrow(), vec!["0xBBB".to_string()]);
    assert_eq!(
        store.load(),
        Some(Session {
            provider_name: "Acme".into(),
            account_address: "0xBBB".into(),
        })
    );
}

#[tokio::test]
async fn event_with_unchanged_address_is_quiet() {
    let (manager, _store, provider) = connected_manager().await;
    let log = recorder(&manager);

    provider.fire_change(vec![account("0xAAA")]);

    assert_eq!(manager.address().as_deref(), Some("0xAAA"));
    assert!(log.borrow().is_empty());
}

#[tokio::test]
async fn empty_change_event_is_ignored() {
    let (manager, _store, provider) = connected_manager().await;
    let log = recorder(&manager);

    provider.fire_change(vec![]);

    assert_eq!(manager.address().as_deref(), Some("0xAAA"));
    assert!(log.borrow().is_empty());
}

// =============================================================================
// Visibility-poll channel
// =============================================================================

#[tokio::test]
async fn visibility_poll_adopts_the_new_first_account() {
    let (manager, store, provider) = connected_manager().await;
    let first = recorder(&manager);
    let second = recorder(&manager);

    provider.set_accounts(vec![account("0xBBB")]);
    manager.sync_accounts();

    assert_eq!(manager.address().as_deref(), Some("0xBBB"));
    // Exactly one notification per listener.
    assert_eq!(*first.borrow(), vec!["0xBBB".to_string()]);
    assert_eq!(*second.borrow(), vec!["0xBBB".to_string()]);
    assert_eq!(
        store.load(),
        Some(Session {
            provider_name: "Acme".into(),
            account_address: "0xBBB".into(),
        })
    );
}

#[tokio::test]
async fn visibility_poll_is_quiet_while_current_stays_first() {
    let (manager, _store, provider) = connected_manager().await;
    let log = recorder(&manager);

    provider.set_accounts(vec![account("0xAAA"), account("0xBBB")]);
    manager.sync_accounts();

    assert_eq!(manager.address().as_deref(), Some("0xAAA"));
    assert!(log.borrow().is_empty());
}

#[tokio::test]
async fn visibility_poll_catches_a_removed_current_account() {
    let (manager, _store, provider) = connected_manager().await;
    let log = recorder(&manager);

    provider.set_accounts(vec![account("0xBBB"), account("0xCCC")]);
    manager.sync_accounts();

    assert_eq!(manager.address().as_deref(), Some("0xBBB"));
    assert_eq!(*log.borrow(), vec!["0xBBB".to_string()]);
}

#[tokio::test]
async fn empty_live_list_is_ignored() {
    let (manager, _store, provider) = connected_manager().await;
    let log = recorder(&manager);

    provider.set_accounts(vec![]);
    manager.sync_accounts();

    assert_eq!(manager.address().as_deref(), Some("0xAAA"));
    assert!(log.borrow().is_empty());
}

#[tokio::test]
async fn sync_accounts_is_a_noop_while_disconnected() {
    let registry = MockRegistry::new(vec![]);
    let (manager, _store) = manager_with(Rc::new(registry), ScriptedPicker::dismiss_all());
    let log = recorder(&manager);

    manager.sync_accounts();

    assert!(log.borrow().is_empty());
    assert!(!manager.is_connected());
}

// =============================================================================
// Fan-out
// =============================================================================

#[tokio::test]
async fn panicking_listener_does_not_starve_the_rest() {
    let (manager, _store, provider) = connected_manager().await;
    manager.on_account_change(|_| panic!("listener exploded"));
    let log = recorder(&manager);

    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(|_| {}));
    provider.fire_change(vec![account("0xBBB")]);
    std::panic::set_hook(previous);

    assert_eq!(*log.borrow(), vec!["0xBBB".to_string()]);
    assert_eq!(manager.address().as_deref(), Some("0xBBB"));
}

#[tokio::test]
async fn removed_listener_is_not_notified() {
    let (manager, _store, provider) = connected_manager().await;
    let log: Notifications = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    let id = manager.on_account_change(move |address| sink.borrow_mut().push(address.to_string()));

    manager.remove_listener(id);
    // Removing again is fine.
    manager.remove_listener(id);
    provider.fire_change(vec![account("0xBBB")]);

    assert!(log.borrow().is_empty());
}

// =============================================================================
// Disconnect teardown
// =============================================================================

#[tokio::test]
async fn disconnect_unsubscribes_revokes_and_clears() {
    let (manager, store, provider) = connected_manager().await;

    manager.disconnect().await;

    assert!(!manager.is_connected());
    assert_eq!(manager.address(), None);
    assert_eq!(store.load(), None);
    assert!(!provider.has_change_handler());
    assert_eq!(provider.state.borrow().unsubscribes, 1);
    assert_eq!(provider.state.borrow().disconnect_calls, 1);
}

#[tokio::test]
async fn disconnect_twice_matches_disconnect_once() {
    let (manager, store, provider) = connected_manager().await;

    manager.disconnect().await;
    manager.disconnect().await;

    assert!(!manager.is_connected());
    assert_eq!(store.load(), None);
    assert_eq!(provider.state.borrow().unsubscribes, 1);
    assert_eq!(provider.state.borrow().disconnect_calls, 1);
}

#[tokio::test]
async fn wallet_without_revoke_or_events_disconnects_cleanly() {
    let provider = MockProvider::with_capabilities(
        "Acme",
        vec![account("0xAAA")],
        ProviderCapabilities::default(),
    );
    let registry = MockRegistry::new(vec![provider.handle()]);
    let (manager, store) = manager_with(Rc::new(registry), ScriptedPicker::dismiss_all());

    manager.connect().await.expect("connect");
    // No event capability: the poll channel is the only detector.
    assert!(!provider.has_change_handler());

    manager.disconnect().await;

    assert!(!manager.is_connected());
    assert_eq!(store.load(), None);
    assert_eq!(provider.state.borrow().disconnect_calls, 0);
}

#[tokio::test]
async fn change_events_stop_after_disconnect() {
    let (manager, _store, provider) = connected_manager().await;
    let log = recorder(&manager);

    manager.disconnect().await;
    // The extension keeps mutating its own state; nothing should land.
    provider.fire_change(vec![account("0xBBB")]);
    provider.set_accounts(vec![account("0xBBB")]);
    manager.sync_accounts();

    assert!(log.borrow().is_empty());
    assert_eq!(manager.address(), None);
}
