//! DOM modal picker - one long-lived overlay, rebuilt per invocation.
//!
//! Interaction handlers are attached when the modal opens and torn down
//! on every resolution path, so back-to-back invocations (wallet picker
//! straight into account picker) never leak listeners from the previous
//! call.

use super::log;
use crate::picker::{PickRequest, Picker};
use async_trait::async_trait;
use futures::channel::oneshot;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, KeyboardEvent};

type PendingChoice = Rc<RefCell<Option<oneshot::Sender<Option<String>>>>>;

/// Modal picker rendered straight into `document.body`.
pub struct DomPicker {
    root: RefCell<Option<HtmlElement>>,
}

impl DomPicker {
    pub fn new() -> Self {
        Self {
            root: RefCell::new(None),
        }
    }

    fn ensure_root(&self, document: &Document) -> Result<HtmlElement, JsValue> {
        if let Some(root) = self.root.borrow().clone() {
            return Ok(root);
        }
        let root: HtmlElement = document.create_element("div")?.unchecked_into();
        root.set_class_name("suilink-picker");
        root.set_attribute("hidden", "")?;
        document
            .body()
            .ok_or_else(|| JsValue::from_str("no body"))?
            .append_child(&root)?;
        *self.root.borrow_mut() = Some(root.clone());
        Ok(root)
    }

    async fn open(&self, request: PickRequest) -> Result<Option<String>, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let root = self.ensure_root(&document)?;

        // Fresh content for this invocation; the previous invocation's
        // rows, and the handlers bound to them, go away with it.
        root.set_inner_html("");

        let (sender, receiver) = oneshot::channel::<Option<String>>();
        let pending: PendingChoice = Rc::new(RefCell::new(Some(sender)));
        let mut row_closures: Vec<Closure<dyn FnMut()>> = Vec::new();

        // Backdrop click dismisses; the panel swallows clicks so only a
        // true backdrop hit reaches the root.
        let dismiss = pending.clone();
        let on_backdrop = Closure::<dyn FnMut()>::new(move || {
            resolve(&dismiss, None);
        });
        root.set_onclick(Some(on_backdrop.as_ref().unchecked_ref()));

        let panel: HtmlElement = document.create_element("div")?.unchecked_into();
        panel.set_class_name("suilink-picker__panel");
        let on_panel = Closure::<dyn FnMut(web_sys::Event)>::new(|event: web_sys::Event| {
            event.stop_propagation();
        });
        panel.set_onclick(Some(on_panel.as_ref().unchecked_ref()));

        let title = document.create_element("h2")?;
        title.set_text_content(Some(&request.title));
        panel.append_child(&title)?;

        let subtitle = document.create_element("p")?;
        subtitle.set_class_name("suilink-picker__subtitle");
        subtitle.set_text_content(Some(&request.subtitle));
        panel.append_child(&subtitle)?;

        let close: HtmlElement = document.create_element("button")?.unchecked_into();
        close.set_class_name("suilink-picker__close");
        close.set_text_content(Some("\u{2715}"));
        let dismiss = pending.clone();
        let on_close = Closure::<dyn FnMut()>::new(move || {
            resolve(&dismiss, None);
        });
        close.set_onclick(Some(on_close.as_ref().unchecked_ref()));
        panel.append_child(&close)?;

        let list = document.create_element("ul")?;
        list.set_class_name("suilink-picker__list");
        for item in &request.items {
            let row: HtmlElement = document.create_element("li")?.unchecked_into();
            row.set_class_name("suilink-picker__item");

            let icon = document.create_element("img")?;
            icon.set_attribute("src", &item.icon)?;
            icon.set_attribute("alt", "")?;
            row.append_child(&icon)?;

            let label = document.create_element("span")?;
            label.set_text_content(Some(&item.label));
            row.append_child(&label)?;

            if let Some(detail) = &item.detail {
                let detail_el = document.create_element("small")?;
                detail_el.set_text_content(Some(detail));
                row.append_child(&detail_el)?;
            }

            let choose = pending.clone();
            let value = item.value.clone();
            let on_click = Closure::<dyn FnMut()>::new(move || {
                resolve(&choose, Some(value.clone()));
            });
            row.set_onclick(Some(on_click.as_ref().unchecked_ref()));
            row_closures.push(on_click);

            list.append_child(&row)?;
        }
        panel.append_child(&list)?;

        if let Some(hint) = &request.hint {
            let hint_el = document.create_element("p")?;
            hint_el.set_class_name("suilink-picker__hint");
            hint_el.set_text_content(Some(hint));
            panel.append_child(&hint_el)?;
        }

        root.append_child(&panel)?;

        // Escape dismisses; this is the one handler that outlives the
        // modal subtree, so it gets an explicit detach below.
        let dismiss = pending.clone();
        let on_key = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
            if event.key() == "Escape" {
                resolve(&dismiss, None);
            }
        });
        document.add_event_listener_with_callback("keydown", on_key.as_ref().unchecked_ref())?;

        root.remove_attribute("hidden")?;

        let choice = receiver.await.unwrap_or(None);

        // Teardown for this invocation: hide, detach the document-level
        // handler, drop the subtree and every closure bound into it.
        root.set_attribute("hidden", "")?;
        document
            .remove_event_listener_with_callback("keydown", on_key.as_ref().unchecked_ref())?;
        root.set_onclick(None);
        root.set_inner_html("");
        drop(on_key);
        drop(on_backdrop);
        drop(on_panel);
        drop(on_close);
        drop(row_closures);

        Ok(choice)
    }
}

impl Default for DomPicker {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve(pending: &PendingChoice, choice: Option<String>) {
    if let Some(sender) = pending.borrow_mut().take() {
        let _ = sender.send(choice);
    }
}

#[async_trait(?Send)]
impl Picker for DomPicker {
    async fn pick(&self, request: PickRequest) -> Option<String> {
        match self.open(request).await {
            Ok(choice) => choice,
            Err(err) => {
                log!("[suilink] picker failed to open: {err:?}");
                None
            }
        }
    }
}
