//! Browser entry point: wires the `ui` behaviours to the live page.

use std::rc::Rc;

use tracing::{info, warn};
use ui::config::CONFIG_ELEMENT_ID;
use ui::SiteConfig;
use wasm_bindgen::prelude::*;
use web_sys::Document;

mod app;
mod dom;
mod logging;
mod storage;
mod transport;

use dom::BrowserDom;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let raw = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content());
    let loaded = SiteConfig::load(raw.as_deref());
    let config = loaded.as_ref().ok().cloned().unwrap_or_default();
    logging::init(&config.log_filter);
    if let Err(e) = &loaded {
        warn!("startup: {e:#}; using defaults");
    }
    info!(
        "startup: storage_key={} theme={} log_filter={}",
        config.storage_key, config.theme, config.log_filter
    );

    when_ready(&document, move |document| {
        let dom = Rc::new(BrowserDom::new(document));
        if let Err(e) = app::run(&window, dom, &config) {
            warn!("startup: binding failed: {e:?}");
        }
    })
}

/// Runs `f` once the document is parsed: immediately when it already is,
/// otherwise on `DOMContentLoaded`.
fn when_ready(document: &Document, f: impl FnOnce(Document) + 'static) -> Result<(), JsValue> {
    if is_parsed(&document.ready_state()) {
        f(document.clone());
        return Ok(());
    }
    let ready = {
        let document = document.clone();
        Closure::once_into_js(move || f(document))
    };
    document.add_event_listener_with_callback("DOMContentLoaded", ready.unchecked_ref())
}

/// `readyState` is `loading` until the parser is done, then `interactive`
/// and `complete`.
fn is_parsed(ready_state: &str) -> bool {
    ready_state != "loading"
}
