use crate::dom::Dom;

pub const HEADER_SELECTOR: &str = ".site-header";
pub const LOGO_SELECTOR: &str = ".site-header .brand img";
pub const DEFAULT_SCROLL_THRESHOLD: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderState {
    Top,
    Scrolled,
}

impl HeaderState {
    pub fn for_offset(scroll_y: f64, threshold: f64) -> Self {
        if scroll_y < threshold {
            HeaderState::Top
        } else {
            HeaderState::Scrolled
        }
    }
}

/// The header only switches style when it carries the brand logo.
pub fn discover<D: Dom>(dom: &D) -> Option<D::Node> {
    let header = dom.query(HEADER_SELECTOR)?;
    dom.query(LOGO_SELECTOR)?;
    Some(header)
}

pub fn apply<D: Dom>(dom: &D, header: &D::Node, state: HeaderState) {
    let top = state == HeaderState::Top;
    dom.set_class(header, "is-top", top);
    dom.set_class(header, "is-scrolled", !top);
}
