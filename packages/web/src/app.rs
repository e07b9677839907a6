//! Binds every behaviour of the `ui` crate to browser events.
//!
//! Listeners live as long as the page, so their closures are leaked with
//! `Closure::forget`.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, info, warn};
use ui::header::{self, HeaderState};
use ui::nav::MobileNav;
use ui::reveal::{self, ObserverOptions, ANIMATE_SELECTOR, STEP_SELECTOR};
use ui::tilt::{self, Rect, TiltConfig, TiltFrame, TILT_SELECTOR};
use ui::{
    dom::Dom, page, ContactForm, LanguageSwitcher, SiteConfig, TextKind, TOGGLE_SELECTOR,
};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Element, Event, EventTarget, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, KeyboardEvent, MouseEvent, Window,
};

use crate::dom::BrowserDom;
use crate::storage::LocalStore;
use crate::transport::HttpTransport;

type Switcher = Rc<RefCell<LanguageSwitcher<LocalStore>>>;

pub fn run(window: &Window, dom: Rc<BrowserDom>, config: &SiteConfig) -> Result<(), JsValue> {
    bind_nav(&dom)?;
    bind_reveal(&dom, &config.reveal)?;
    bind_storyline(&dom, &config.storyline)?;

    let reduced_motion = media_matches(window, "(prefers-reduced-motion: reduce)");
    let fine_pointer = media_matches(window, "(pointer: fine)");
    if tilt::tilt_enabled(reduced_motion, fine_pointer) {
        bind_tilt(window, &dom, config.tilt)?;
    } else {
        debug!("app.run: tilt disabled (reduced_motion={reduced_motion} fine_pointer={fine_pointer})");
    }

    page::set_theme(&*dom, &config.theme);

    let switcher: Switcher = Rc::new(RefCell::new(LanguageSwitcher::new(LocalStore::new(
        &config.storage_key,
    ))));
    let locale = window.navigator().language();
    switcher.borrow_mut().start(&*dom, locale.as_deref());
    bind_language_toggles(&dom, &switcher)?;

    page::stamp_year(&*dom, js_sys::Date::new_0().get_full_year() as i32);
    bind_contact(&dom, &switcher)?;
    bind_debug_shortcut(&dom)?;
    bind_header(window, &dom, config.header_scroll_threshold)?;

    info!("app.run: ready");
    Ok(())
}

fn listen(
    target: &EventTarget,
    event: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn media_matches(window: &Window, query: &str) -> bool {
    window
        .match_media(query)
        .ok()
        .flatten()
        .is_some_and(|list| list.matches())
}

fn bind_nav(dom: &Rc<BrowserDom>) -> Result<(), JsValue> {
    let Some(nav) = MobileNav::discover(&**dom) else {
        return Ok(());
    };
    nav.init(&**dom);
    let toggle = nav.toggle_node().clone();
    let links = nav.links(&**dom);
    let nav = Rc::new(nav);

    {
        let (dom, nav) = (dom.clone(), nav.clone());
        listen(&toggle, "click", move |_| nav.toggle(&*dom))?;
    }
    for link in links {
        let (dom, nav) = (dom.clone(), nav.clone());
        listen(&link, "click", move |_| nav.close(&*dom))?;
    }
    Ok(())
}

/// Observes `nodes`, calling `on_entry(target, intersecting, observer)` for
/// every intersection change.
fn observe(
    nodes: &[Element],
    options: &ObserverOptions,
    mut on_entry: impl FnMut(&Element, bool, &IntersectionObserver) + 'static,
) -> Result<(), JsValue> {
    if nodes.is_empty() {
        return Ok(());
    }
    let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
        move |entries: js_sys::Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                if let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() {
                    on_entry(&entry.target(), entry.is_intersecting(), &observer);
                }
            }
        },
    );
    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(options.threshold));
    init.set_root_margin(&options.root_margin);
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
    callback.forget();
    for node in nodes {
        observer.observe(node);
    }
    Ok(())
}

fn bind_reveal(dom: &Rc<BrowserDom>, options: &ObserverOptions) -> Result<(), JsValue> {
    let nodes = dom.query_all(ANIMATE_SELECTOR);
    let dom = dom.clone();
    observe(&nodes, options, move |target, intersecting, observer| {
        if reveal::reveal(&*dom, target, intersecting) {
            observer.unobserve(target);
        }
    })
}

fn bind_storyline(dom: &Rc<BrowserDom>, options: &ObserverOptions) -> Result<(), JsValue> {
    let steps = dom.query_all(STEP_SELECTOR);
    let observed = steps.clone();
    let dom = dom.clone();
    observe(&observed, options, move |target, intersecting, _| {
        reveal::activate_step(&*dom, &steps, target, intersecting);
    })
}

fn bind_tilt(window: &Window, dom: &Rc<BrowserDom>, config: TiltConfig) -> Result<(), JsValue> {
    for element in dom.query_all(TILT_SELECTOR) {
        let state: Rc<RefCell<TiltFrame<i32>>> = Rc::default();
        // One frame callback per element, reused by every request.
        let on_frame: js_sys::Function = {
            let (dom, state, el) = (dom.clone(), state.clone(), element.clone());
            Closure::<dyn FnMut()>::new(move || {
                let next = state.borrow_mut().fire();
                if let Some(transform) = next {
                    tilt::write(&*dom, &el, &transform);
                }
            })
            .into_js_value()
            .unchecked_into()
        };
        {
            let (window, state, el) = (window.clone(), state.clone(), element.clone());
            listen(&element, "pointermove", move |event| {
                let Some(pointer) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                let r = el.get_bounding_client_rect();
                let rect = Rect {
                    left: r.left(),
                    top: r.top(),
                    width: r.width(),
                    height: r.height(),
                };
                let (rx, ry) = tilt::rotation(
                    rect,
                    f64::from(pointer.client_x()),
                    f64::from(pointer.client_y()),
                    &config,
                );
                match window.request_animation_frame(&on_frame) {
                    Ok(handle) => {
                        let previous = state
                            .borrow_mut()
                            .schedule(tilt::transform(rx, ry, &config), handle);
                        if let Some(previous) = previous {
                            let _ = window.cancel_animation_frame(previous);
                        }
                    }
                    Err(e) => warn!("tilt.schedule: {e:?}"),
                }
            })?;
        }
        {
            let (window, dom, el) = (window.clone(), dom.clone(), element.clone());
            listen(&element, "pointerleave", move |_| {
                let pending = state.borrow_mut().leave();
                if let Some(pending) = pending {
                    let _ = window.cancel_animation_frame(pending);
                }
                tilt::reset(&*dom, &el);
            })?;
        }
    }
    Ok(())
}

fn bind_language_toggles(dom: &Rc<BrowserDom>, switcher: &Switcher) -> Result<(), JsValue> {
    for toggle in dom.query_all(TOGGLE_SELECTOR) {
        let (dom, switcher) = (dom.clone(), switcher.clone());
        listen(&toggle, "click", move |_| match switcher.try_borrow_mut() {
            Ok(mut switcher) => {
                switcher.toggle(&*dom);
            }
            Err(_) => warn!("i18n.toggle: switcher busy"),
        })?;
    }
    Ok(())
}

fn bind_contact(dom: &Rc<BrowserDom>, switcher: &Switcher) -> Result<(), JsValue> {
    let Some(form) = ContactForm::discover(&**dom) else {
        return Ok(());
    };
    let form = Rc::new(form);
    let transport = Rc::new(HttpTransport::default());
    let target = form.form().clone();
    let (dom, switcher) = (dom.clone(), switcher.clone());

    listen(&target, "submit", move |event| {
        event.prevent_default();
        let (dom, switcher, form, transport) =
            (dom.clone(), switcher.clone(), form.clone(), transport.clone());
        wasm_bindgen_futures::spawn_local(async move {
            let state = switcher.borrow().state();
            let outcome = form
                .submit(&*dom, &*transport, &state, |node| {
                    switcher.borrow().pair(&*dom, node, TextKind::Content)
                })
                .await;
            debug!("contact.submit: outcome={outcome:?}");
        });
    })
}

fn bind_debug_shortcut(dom: &Rc<BrowserDom>) -> Result<(), JsValue> {
    let target = dom.document().clone();
    let dom = dom.clone();
    listen(&target, "keydown", move |event| {
        if let Some(key) = event.dyn_ref::<KeyboardEvent>() {
            if page::is_debug_shortcut(&key.key(), key.shift_key()) {
                page::toggle_layout_debug(&*dom);
            }
        }
    })
}

fn bind_header(window: &Window, dom: &Rc<BrowserDom>, threshold: f64) -> Result<(), JsValue> {
    let Some(head) = header::discover(&**dom) else {
        return Ok(());
    };
    let update = {
        let (window, dom) = (window.clone(), dom.clone());
        move || {
            let offset = window.scroll_y().unwrap_or(0.0);
            header::apply(&*dom, &head, HeaderState::for_offset(offset, threshold));
        }
    };
    update();
    listen(window, "scroll", move |_| update())
}
