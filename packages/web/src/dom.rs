//! `ui::dom::Dom` over the live document.

use std::cell::Cell;

use js_sys::{Array, WeakMap};
use tracing::warn;
use ui::dom::{Dom, NodeKey};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, FormData, HtmlElement, HtmlFormElement, NodeList};

pub struct BrowserDom {
    document: Document,
    // Element -> key; entries go away with their elements.
    keys: WeakMap,
    next_key: Cell<u32>,
}

impl BrowserDom {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            keys: WeakMap::new(),
            next_key: Cell::new(0),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}

fn elements(list: Result<NodeList, JsValue>, selector: &str) -> Vec<Element> {
    match list {
        Ok(list) => (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect(),
        Err(e) => {
            warn!("dom.query: bad selector {selector:?}: {e:?}");
            Vec::new()
        }
    }
}

fn report(op: &str, result: Result<(), JsValue>) {
    if let Err(e) = result {
        warn!("dom.{op}: {e:?}");
    }
}

impl Dom for BrowserDom {
    type Node = Element;

    fn root(&self) -> Option<Element> {
        self.document.document_element()
    }

    fn body(&self) -> Option<Element> {
        self.document.body().map(Into::into)
    }

    fn query_all(&self, selector: &str) -> Vec<Element> {
        elements(self.document.query_selector_all(selector), selector)
    }

    fn query_within(&self, scope: &Element, selector: &str) -> Vec<Element> {
        elements(scope.query_selector_all(selector), selector)
    }

    fn node_key(&self, node: &Element) -> NodeKey {
        if let Some(key) = self.keys.get(node).as_f64() {
            return NodeKey(key as u32);
        }
        let key = self.next_key.get();
        self.next_key.set(key + 1);
        self.keys.set(node, &JsValue::from(key));
        NodeKey(key)
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&self, node: &Element, name: &str, value: &str) {
        report("set_attribute", node.set_attribute(name, value));
    }

    fn remove_attribute(&self, node: &Element, name: &str) {
        report("remove_attribute", node.remove_attribute(name));
    }

    fn inner_html(&self, node: &Element) -> String {
        node.inner_html()
    }

    fn set_inner_html(&self, node: &Element, html: &str) {
        node.set_inner_html(html);
    }

    fn text_content(&self, node: &Element) -> String {
        node.text_content().unwrap_or_default()
    }

    fn set_text_content(&self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn set_class(&self, node: &Element, class: &str, on: bool) {
        report(
            "set_class",
            node.class_list().toggle_with_force(class, on).map(|_| ()),
        );
    }

    fn set_style(&self, node: &Element, property: &str, value: &str) {
        let Some(el) = node.dyn_ref::<HtmlElement>() else {
            return;
        };
        let style = el.style();
        if value.is_empty() {
            report("set_style", style.remove_property(property).map(|_| ()));
        } else {
            report("set_style", style.set_property(property, value));
        }
    }

    fn form_action(&self, form: &Element) -> String {
        form.dyn_ref::<HtmlFormElement>()
            .map(HtmlFormElement::action)
            .unwrap_or_default()
    }

    fn form_fields(&self, form: &Element) -> Vec<(String, String)> {
        let Some(form) = form.dyn_ref::<HtmlFormElement>() else {
            return Vec::new();
        };
        let data = match FormData::new_with_form(form) {
            Ok(data) => data,
            Err(e) => {
                warn!("dom.form_fields: {e:?}");
                return Vec::new();
            }
        };
        let entries = match js_sys::try_iter(&data) {
            Ok(Some(entries)) => entries,
            _ => return Vec::new(),
        };
        entries
            .filter_map(Result::ok)
            .filter_map(|entry| entry.dyn_into::<Array>().ok())
            // File inputs have no string value and cannot be URL-encoded.
            .filter_map(|pair| Some((pair.get(0).as_string()?, pair.get(1).as_string()?)))
            .collect()
    }

    fn reset_form(&self, form: &Element) {
        if let Some(form) = form.dyn_ref::<HtmlFormElement>() {
            form.reset();
        }
    }
}
