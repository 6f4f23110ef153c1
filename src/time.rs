//! Timer shim - tokio on native, `setTimeout` in the browser.

use std::future::Future;
use std::time::Duration;

/// Timeout expiry marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elapsed;

#[cfg(all(feature = "native", not(target_arch = "wasm32")))]
pub async fn sleep(duration: Duration) {
    tokio::time::sleep(duration).await;
}

#[cfg(all(feature = "native", not(target_arch = "wasm32")))]
pub async fn timeout<F: Future>(duration: Duration, future: F) -> Result<F::Output, Elapsed> {
    tokio::time::timeout(duration, future)
        .await
        .map_err(|_| Elapsed)
}

#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
pub async fn sleep(duration: Duration) {
    use wasm_bindgen_futures::JsFuture;

    let millis = duration.as_millis().min(i32::MAX as u128) as i32;
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        if let Some(window) = web_sys::window() {
            let _ = window
                .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, millis);
        }
    });
    let _ = JsFuture::from(promise).await;
}

#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
pub async fn timeout<F: Future>(duration: Duration, future: F) -> Result<F::Output, Elapsed> {
    use futures::future::{select, Either};

    let future = Box::pin(future);
    let deadline = Box::pin(sleep(duration));
    match select(future, deadline).await {
        Either::Left((value, _)) => Ok(value),
        Either::Right(((), _)) => Err(Elapsed),
    }
}
