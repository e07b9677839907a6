use tracing::debug;

use crate::dom::{set_flag, Dom};

pub const TOGGLE_SELECTOR: &str = ".nav-toggle";
pub const MENU_SELECTOR: &str = "#menu-mobile";
pub const LINK_SELECTOR: &str = "#menu-mobile a";
const OPEN_CLASS: &str = "is-open";
const NO_SCROLL_CLASS: &str = "no-scroll";

/// Burger button plus the mobile menu it controls. Both must exist.
#[derive(Debug, Clone)]
pub struct MobileNav<N> {
    toggle: N,
    menu: N,
}

impl<N: Clone> MobileNav<N> {
    pub fn discover<D: Dom<Node = N>>(dom: &D) -> Option<Self> {
        let toggle = dom.query(TOGGLE_SELECTOR)?;
        let menu = dom.query(MENU_SELECTOR)?;
        Some(Self { toggle, menu })
    }

    pub fn toggle_node(&self) -> &N {
        &self.toggle
    }

    /// Starts closed regardless of the markup.
    pub fn init<D: Dom<Node = N>>(&self, dom: &D) {
        set_flag(dom, &self.menu, "hidden", true);
    }

    pub fn links<D: Dom<Node = N>>(&self, dom: &D) -> Vec<N> {
        dom.query_all(LINK_SELECTOR)
    }

    pub fn is_expanded<D: Dom<Node = N>>(&self, dom: &D) -> bool {
        dom.attribute(&self.toggle, "aria-expanded").as_deref() == Some("true")
    }

    pub fn toggle<D: Dom<Node = N>>(&self, dom: &D) {
        let open = !self.is_expanded(dom);
        dom.set_attribute(&self.toggle, "aria-expanded", if open { "true" } else { "false" });
        set_flag(dom, &self.menu, "hidden", !open);
        dom.set_class(&self.menu, OPEN_CLASS, open);
        if let Some(body) = dom.body() {
            dom.set_class(&body, NO_SCROLL_CLASS, open);
        }
        debug!("nav.toggle: open={open}");
    }

    /// Following a menu link closes an open menu.
    pub fn close<D: Dom<Node = N>>(&self, dom: &D) {
        if self.is_expanded(dom) {
            self.toggle(dom);
        }
    }
}
