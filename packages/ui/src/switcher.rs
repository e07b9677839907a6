//! French/English text swap over marked elements.
//!
//! An element opts into translation by carrying the English marker of a
//! [`TextKind`] (`data-i18n-en`, `data-i18n-en-placeholder`, ...). Its French
//! value is frozen in an [`OriginalCache`] the first time the switcher sees
//! it: the declared French marker when present, otherwise the live value.
//! [`LanguageSwitcher::start`] freezes every element before the first write,
//! so a first visit in English still records the French markup.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::dom::{non_empty_attribute, Dom, NodeKey};
use crate::i18n::{Lang, LanguageState};

pub const TOGGLE_SELECTOR: &str = "[data-lang-toggle]";

/// What part of an element gets translated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextKind {
    Content,
    Placeholder,
    AriaLabel,
    Title,
    Value,
}

impl TextKind {
    pub const ALL: [TextKind; 5] = [
        TextKind::Content,
        TextKind::Placeholder,
        TextKind::AriaLabel,
        TextKind::Title,
        TextKind::Value,
    ];

    /// Attribute written for this kind; `None` means inner HTML.
    pub fn target_attribute(self) -> Option<&'static str> {
        match self {
            TextKind::Content => None,
            TextKind::Placeholder => Some("placeholder"),
            TextKind::AriaLabel => Some("aria-label"),
            TextKind::Title => Some("title"),
            TextKind::Value => Some("value"),
        }
    }

    /// Opt-in marker, also carrying the English value.
    pub fn english_marker(self) -> &'static str {
        match self {
            TextKind::Content => "data-i18n-en",
            TextKind::Placeholder => "data-i18n-en-placeholder",
            TextKind::AriaLabel => "data-i18n-en-aria-label",
            TextKind::Title => "data-i18n-en-title",
            TextKind::Value => "data-i18n-en-value",
        }
    }

    pub fn french_marker(self) -> &'static str {
        match self {
            TextKind::Content => "data-i18n-fr",
            TextKind::Placeholder => "data-i18n-fr-placeholder",
            TextKind::AriaLabel => "data-i18n-fr-aria-label",
            TextKind::Title => "data-i18n-fr-title",
            TextKind::Value => "data-i18n-fr-value",
        }
    }

    pub fn selector(self) -> String {
        format!("[{}]", self.english_marker())
    }
}

/// A French value and its English counterpart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPair {
    pub fr: String,
    pub en: String,
}

impl TextPair {
    /// An empty or missing English value means "same as French".
    pub fn new(fr: impl Into<String>, en: Option<String>) -> Self {
        let fr = fr.into();
        let en = en.filter(|v| !v.is_empty()).unwrap_or_else(|| fr.clone());
        Self { fr, en }
    }

    /// Reads a pair from two marker attributes, using `fallback` when the
    /// French marker is missing or empty.
    pub fn from_markers<D: Dom>(
        dom: &D,
        node: &D::Node,
        fr_marker: &str,
        en_marker: &str,
        fallback: impl FnOnce() -> String,
    ) -> Self {
        let fr = non_empty_attribute(dom, node, fr_marker).unwrap_or_else(fallback);
        Self::new(fr, dom.attribute(node, en_marker))
    }

    pub fn get(&self, lang: Lang) -> &str {
        lang.pick(&self.fr, &self.en)
    }
}

/// French originals, frozen once per (element, kind).
#[derive(Debug, Default)]
pub struct OriginalCache {
    frozen: HashMap<(NodeKey, TextKind), String>,
}

impl OriginalCache {
    pub fn get(&self, key: NodeKey, kind: TextKind) -> Option<&str> {
        self.frozen.get(&(key, kind)).map(String::as_str)
    }

    /// Returns the frozen value, calling `capture` only on first sight.
    pub fn freeze(&mut self, key: NodeKey, kind: TextKind, capture: impl FnOnce() -> String) -> &str {
        self.frozen.entry((key, kind)).or_insert_with(capture)
    }

    pub fn len(&self) -> usize {
        self.frozen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frozen.is_empty()
    }
}

/// Load/save pair for the persisted language code.
pub trait LanguageStore {
    fn load(&self) -> Option<String>;
    fn save(&self, code: &str);
}

pub struct LanguageSwitcher<S> {
    state: LanguageState,
    originals: OriginalCache,
    store: S,
}

impl<S: LanguageStore> LanguageSwitcher<S> {
    pub fn new(store: S) -> Self {
        Self {
            state: LanguageState::default(),
            originals: OriginalCache::default(),
            store,
        }
    }

    /// Handle for behaviours that need to read the active language.
    pub fn state(&self) -> LanguageState {
        self.state.clone()
    }

    pub fn current(&self) -> Lang {
        self.state.get()
    }

    pub fn originals(&self) -> &OriginalCache {
        &self.originals
    }

    /// Freezes every marked element, then applies the default language.
    pub fn start<D: Dom>(&mut self, dom: &D, browser_locale: Option<&str>) -> Lang {
        self.capture_all(dom);
        let lang = self.resolve_default_language(browser_locale);
        info!(
            "i18n.start: lang={} originals={}",
            lang.code(),
            self.originals.len()
        );
        self.apply(dom, lang);
        lang
    }

    pub fn capture_all<D: Dom>(&mut self, dom: &D) {
        for kind in TextKind::ALL {
            for node in dom.query_all(&kind.selector()) {
                let key = dom.node_key(&node);
                self.originals
                    .freeze(key, kind, || declared_or_live(dom, &node, kind));
            }
        }
    }

    /// Persisted choice first, then the browser locale, then French.
    pub fn resolve_default_language(&self, browser_locale: Option<&str>) -> Lang {
        if let Some(saved) = self.store.load().filter(|v| !v.trim().is_empty()) {
            debug!("i18n.resolve_default_language: persisted={saved}");
            return Lang::from_code_or_default(&saved);
        }
        let lang = Lang::from_locale(browser_locale.unwrap_or("fr"));
        debug!(
            "i18n.resolve_default_language: locale={:?} -> {}",
            browser_locale,
            lang.code()
        );
        lang
    }

    pub fn apply<D: Dom>(&mut self, dom: &D, lang: Lang) {
        let mut written = 0usize;
        for kind in TextKind::ALL {
            for node in dom.query_all(&kind.selector()) {
                let key = dom.node_key(&node);
                let fr = self
                    .originals
                    .freeze(key, kind, || declared_or_live(dom, &node, kind))
                    .to_string();
                let pair = TextPair::new(fr, dom.attribute(&node, kind.english_marker()));
                write_value(dom, &node, kind, pair.get(lang));
                written += 1;
            }
        }

        if let Some(root) = dom.root() {
            dom.set_attribute(&root, "lang", lang.code());
        }
        self.store.save(lang.code());
        let pressed = if lang == Lang::En { "true" } else { "false" };
        for toggle in dom.query_all(TOGGLE_SELECTOR) {
            dom.set_attribute(&toggle, "aria-pressed", pressed);
        }
        self.state.set(lang);
        debug!("i18n.apply: lang={} written={written}", lang.code());
    }

    pub fn toggle<D: Dom>(&mut self, dom: &D) -> Lang {
        let next = self.current().opposite();
        info!("i18n.toggle: {} -> {}", self.current().code(), next.code());
        self.apply(dom, next);
        next
    }

    /// French/English pair for a node, without freezing anything.
    pub fn pair<D: Dom>(&self, dom: &D, node: &D::Node, kind: TextKind) -> TextPair {
        let fr = match self.originals.get(dom.node_key(node), kind) {
            Some(frozen) => frozen.to_string(),
            None => declared_or_live(dom, node, kind),
        };
        TextPair::new(fr, dom.attribute(node, kind.english_marker()))
    }
}

fn declared_or_live<D: Dom>(dom: &D, node: &D::Node, kind: TextKind) -> String {
    non_empty_attribute(dom, node, kind.french_marker()).unwrap_or_else(|| live_value(dom, node, kind))
}

fn live_value<D: Dom>(dom: &D, node: &D::Node, kind: TextKind) -> String {
    match kind.target_attribute() {
        None => dom.inner_html(node).trim().to_string(),
        Some(attr) => dom.attribute(node, attr).unwrap_or_default(),
    }
}

fn write_value<D: Dom>(dom: &D, node: &D::Node, kind: TextKind, value: &str) {
    match kind.target_attribute() {
        None => dom.set_inner_html(node, value),
        Some(attr) => dom.set_attribute(node, attr, value),
    }
}
