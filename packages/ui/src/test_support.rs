//! In-memory doubles for the `Dom`, the language store and the transport.
//!
//! `FakeDom` understands the selectors the behaviours use: tag, `#id`,
//! `.class`, `[attr]`, `[attr="value"]`, compounds of those, and the
//! descendant combinator.

#![cfg(test)]

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use anyhow::{bail, Result};
use async_trait::async_trait;

use crate::contact::ContactTransport;
use crate::dom::{Dom, NodeKey};
use crate::switcher::LanguageStore;

#[derive(Debug, Clone, Default)]
struct Element {
    tag: String,
    parent: Option<usize>,
    attrs: BTreeMap<String, String>,
    html: String,
    style: BTreeMap<String, String>,
    // Live value of a form field, as typed by the user.
    typed: Option<String>,
}

#[derive(Debug)]
pub struct FakeDom {
    nodes: RefCell<Vec<Element>>,
    pub resets: Cell<usize>,
    pub action: String,
}

pub const ROOT: usize = 0;
pub const BODY: usize = 1;

impl Default for FakeDom {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeDom {
    pub fn new() -> Self {
        let html = Element {
            tag: "html".to_string(),
            ..Default::default()
        };
        let body = Element {
            tag: "body".to_string(),
            parent: Some(ROOT),
            ..Default::default()
        };
        Self {
            nodes: RefCell::new(vec![html, body]),
            resets: Cell::new(0),
            action: "https://forms.example.test/contact".to_string(),
        }
    }

    pub fn add(&self, parent: usize, tag: &str, attrs: &[(&str, &str)], html: &str) -> usize {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(Element {
            tag: tag.to_string(),
            parent: Some(parent),
            attrs: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            html: html.to_string(),
            ..Default::default()
        });
        nodes.len() - 1
    }

    pub fn attr(&self, node: usize, name: &str) -> Option<String> {
        self.nodes.borrow()[node].attrs.get(name).cloned()
    }

    pub fn html(&self, node: usize) -> String {
        self.nodes.borrow()[node].html.clone()
    }

    pub fn style(&self, node: usize, property: &str) -> Option<String> {
        self.nodes.borrow()[node].style.get(property).cloned()
    }

    pub fn classes(&self, node: usize) -> Vec<String> {
        self.attr(node, "class")
            .unwrap_or_default()
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }

    pub fn type_into(&self, node: usize, value: &str) {
        self.nodes.borrow_mut()[node].typed = Some(value.to_string());
    }

    /// Every attribute and inner HTML, for whole-document comparisons.
    pub fn snapshot(&self) -> Vec<(BTreeMap<String, String>, String)> {
        self.nodes
            .borrow()
            .iter()
            .map(|n| (n.attrs.clone(), n.html.clone()))
            .collect()
    }

    fn is_descendant(&self, node: usize, ancestor: usize) -> bool {
        let nodes = self.nodes.borrow();
        let mut cur = nodes[node].parent;
        while let Some(p) = cur {
            if p == ancestor {
                return true;
            }
            cur = nodes[p].parent;
        }
        false
    }

    fn matches(&self, node: usize, selector: &[Compound]) -> bool {
        let nodes = self.nodes.borrow();
        let Some((last, ancestors)) = selector.split_last() else {
            return false;
        };
        if !last.matches(&nodes[node]) {
            return false;
        }
        let mut cur = nodes[node].parent;
        for compound in ancestors.iter().rev() {
            loop {
                let Some(p) = cur else {
                    return false;
                };
                cur = nodes[p].parent;
                if compound.matches(&nodes[p]) {
                    break;
                }
            }
        }
        true
    }

    fn select(&self, selector: &str, scope: Option<usize>) -> Vec<usize> {
        let parsed: Vec<Compound> = selector.split_whitespace().map(Compound::parse).collect();
        let count = self.nodes.borrow().len();
        (0..count)
            .filter(|&n| scope.map_or(true, |s| self.is_descendant(n, s)))
            .filter(|&n| self.matches(n, &parsed))
            .collect()
    }

    fn descendants(&self, scope: usize) -> Vec<usize> {
        let count = self.nodes.borrow().len();
        (0..count).filter(|&n| self.is_descendant(n, scope)).collect()
    }
}

#[derive(Debug, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, Option<String>)>,
}

impl Compound {
    fn parse(s: &str) -> Self {
        let mut c = Compound::default();
        let is_sigil = |ch: char| ch == '#' || ch == '.' || ch == '[';
        let tag_end = s.find(is_sigil).unwrap_or(s.len());
        if tag_end > 0 {
            c.tag = Some(s[..tag_end].to_string());
        }
        let mut rest = &s[tag_end..];
        while let Some(sigil) = rest.chars().next() {
            let tail = &rest[1..];
            match sigil {
                '[' => {
                    let end = tail.find(']').expect("unclosed attribute selector");
                    let inner = &tail[..end];
                    match inner.split_once('=') {
                        Some((k, v)) => c
                            .attrs
                            .push((k.to_string(), Some(v.trim_matches('"').to_string()))),
                        None => c.attrs.push((inner.to_string(), None)),
                    }
                    rest = &tail[end + 1..];
                }
                '#' | '.' => {
                    let end = tail.find(is_sigil).unwrap_or(tail.len());
                    let name = tail[..end].to_string();
                    if sigil == '#' {
                        c.id = Some(name);
                    } else {
                        c.classes.push(name);
                    }
                    rest = &tail[end..];
                }
                other => panic!("unsupported selector character {other:?} in {s}"),
            }
        }
        c
    }

    fn matches(&self, el: &Element) -> bool {
        if self.tag.as_deref().is_some_and(|t| t != el.tag) {
            return false;
        }
        if self.id.is_some() && self.id.as_ref() != el.attrs.get("id") {
            return false;
        }
        let classes = el.attrs.get("class").map(String::as_str).unwrap_or("");
        if !self
            .classes
            .iter()
            .all(|c| classes.split_whitespace().any(|have| have == c))
        {
            return false;
        }
        self.attrs.iter().all(|(k, v)| match (el.attrs.get(k), v) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(have), Some(want)) => have == want,
        })
    }
}

fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

/// What a browser's `innerHTML` shows after `textContent` was assigned.
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn unescape(html: &str) -> String {
    html.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

impl Dom for FakeDom {
    type Node = usize;

    fn root(&self) -> Option<usize> {
        Some(ROOT)
    }

    fn body(&self) -> Option<usize> {
        Some(BODY)
    }

    fn query_all(&self, selector: &str) -> Vec<usize> {
        self.select(selector, None)
    }

    fn query_within(&self, scope: &usize, selector: &str) -> Vec<usize> {
        self.select(selector, Some(*scope))
    }

    fn node_key(&self, node: &usize) -> NodeKey {
        NodeKey(*node as u32)
    }

    fn attribute(&self, node: &usize, name: &str) -> Option<String> {
        self.attr(*node, name)
    }

    fn set_attribute(&self, node: &usize, name: &str, value: &str) {
        self.nodes.borrow_mut()[*node]
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    fn remove_attribute(&self, node: &usize, name: &str) {
        self.nodes.borrow_mut()[*node].attrs.remove(name);
    }

    fn inner_html(&self, node: &usize) -> String {
        self.html(*node)
    }

    fn set_inner_html(&self, node: &usize, html: &str) {
        self.nodes.borrow_mut()[*node].html = html.to_string();
    }

    fn text_content(&self, node: &usize) -> String {
        unescape(&strip_tags(&self.html(*node)))
    }

    fn set_text_content(&self, node: &usize, text: &str) {
        self.set_inner_html(node, &escape(text));
    }

    fn has_class(&self, node: &usize, class: &str) -> bool {
        self.classes(*node).iter().any(|c| c == class)
    }

    fn set_class(&self, node: &usize, class: &str, on: bool) {
        let mut classes = self.classes(*node);
        classes.retain(|c| c != class);
        if on {
            classes.push(class.to_string());
        }
        self.set_attribute(node, "class", &classes.join(" "));
    }

    fn set_style(&self, node: &usize, property: &str, value: &str) {
        let mut nodes = self.nodes.borrow_mut();
        if value.is_empty() {
            nodes[*node].style.remove(property);
        } else {
            nodes[*node]
                .style
                .insert(property.to_string(), value.to_string());
        }
    }

    fn form_action(&self, _form: &usize) -> String {
        self.action.clone()
    }

    fn form_fields(&self, form: &usize) -> Vec<(String, String)> {
        let nodes = self.nodes.borrow();
        self.descendants(*form)
            .into_iter()
            .filter_map(|n| {
                let el = &nodes[n];
                if !matches!(el.tag.as_str(), "input" | "textarea" | "select") {
                    return None;
                }
                let name = el.attrs.get("name")?.clone();
                let value = el
                    .typed
                    .clone()
                    .or_else(|| el.attrs.get("value").cloned())
                    .unwrap_or_default();
                Some((name, value))
            })
            .collect()
    }

    fn reset_form(&self, form: &usize) {
        for n in self.descendants(*form) {
            self.nodes.borrow_mut()[n].typed = None;
        }
        self.resets.set(self.resets.get() + 1);
    }
}

/// Language store whose contents stay observable after being moved into
/// a switcher.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore(Rc<RefCell<Option<String>>>);

impl MemoryStore {
    pub fn with(code: &str) -> Self {
        Self(Rc::new(RefCell::new(Some(code.to_string()))))
    }

    pub fn saved(&self) -> Option<String> {
        self.0.borrow().clone()
    }
}

impl LanguageStore for MemoryStore {
    fn load(&self) -> Option<String> {
        self.saved()
    }

    fn save(&self, code: &str) {
        *self.0.borrow_mut() = Some(code.to_string());
    }
}

/// What the submit button looked like while the request was pending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonDuringSend {
    pub disabled: bool,
    pub label: String,
}

/// Answers every post with a fixed HTTP status (or a network error) after
/// yielding once, so concurrent submissions can overlap.
pub struct ScriptedTransport {
    status: Option<u16>,
    pub posts: RefCell<Vec<(String, Vec<(String, String)>)>>,
    watch: Option<(Rc<FakeDom>, usize)>,
    pub seen: RefCell<Vec<ButtonDuringSend>>,
}

impl ScriptedTransport {
    pub fn status(status: u16) -> Self {
        Self {
            status: Some(status),
            posts: RefCell::new(Vec::new()),
            watch: None,
            seen: RefCell::new(Vec::new()),
        }
    }

    pub fn network_error() -> Self {
        Self {
            status: None,
            ..Self::status(0)
        }
    }

    pub fn watching(mut self, dom: Rc<FakeDom>, button: usize) -> Self {
        self.watch = Some((dom, button));
        self
    }
}

#[async_trait(?Send)]
impl ContactTransport for ScriptedTransport {
    async fn post_form(&self, action: &str, fields: &[(String, String)]) -> Result<()> {
        self.posts
            .borrow_mut()
            .push((action.to_string(), fields.to_vec()));
        if let Some((dom, button)) = &self.watch {
            self.seen.borrow_mut().push(ButtonDuringSend {
                disabled: dom.attr(*button, "disabled").is_some(),
                label: dom.html(*button),
            });
        }
        tokio::task::yield_now().await;
        match self.status {
            Some(code) if (200..300).contains(&code) => Ok(()),
            Some(code) => bail!("request failed: HTTP {code}"),
            None => bail!("network unreachable"),
        }
    }
}
