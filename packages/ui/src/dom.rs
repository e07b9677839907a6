//! The slice of the DOM every behaviour needs.
//!
//! Behaviours never touch browser types directly; the web crate implements
//! [`Dom`] over `web_sys::Document` and the tests implement it over an
//! in-memory tree. Every method is infallible: a missing node or attribute
//! reads as empty and a failed write is dropped.

/// Stable identity of an element for the lifetime of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(pub u32);

pub trait Dom {
    type Node: Clone;

    /// The document element (`<html>`).
    fn root(&self) -> Option<Self::Node>;
    fn body(&self) -> Option<Self::Node>;

    fn query_all(&self, selector: &str) -> Vec<Self::Node>;
    fn query_within(&self, scope: &Self::Node, selector: &str) -> Vec<Self::Node>;

    fn query(&self, selector: &str) -> Option<Self::Node> {
        self.query_all(selector).into_iter().next()
    }

    fn query_first_within(&self, scope: &Self::Node, selector: &str) -> Option<Self::Node> {
        self.query_within(scope, selector).into_iter().next()
    }

    fn node_key(&self, node: &Self::Node) -> NodeKey;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;
    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str);
    fn remove_attribute(&self, node: &Self::Node, name: &str);

    fn inner_html(&self, node: &Self::Node) -> String;
    fn set_inner_html(&self, node: &Self::Node, html: &str);
    fn text_content(&self, node: &Self::Node) -> String;
    fn set_text_content(&self, node: &Self::Node, text: &str);

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;
    fn set_class(&self, node: &Self::Node, class: &str, on: bool);

    fn set_style(&self, node: &Self::Node, property: &str, value: &str);

    /// Resolved submission URL of a form.
    fn form_action(&self, form: &Self::Node) -> String;
    /// Name/value pairs the form would submit.
    fn form_fields(&self, form: &Self::Node) -> Vec<(String, String)>;
    fn reset_form(&self, form: &Self::Node);
}

/// Boolean attribute such as `hidden` or `disabled`.
pub fn set_flag<D: Dom>(dom: &D, node: &D::Node, name: &str, on: bool) {
    if on {
        dom.set_attribute(node, name, "");
    } else {
        dom.remove_attribute(node, name);
    }
}

pub fn has_flag<D: Dom>(dom: &D, node: &D::Node, name: &str) -> bool {
    dom.attribute(node, name).is_some()
}

/// Attribute value, with an empty string counting as absent.
pub fn non_empty_attribute<D: Dom>(dom: &D, node: &D::Node, name: &str) -> Option<String> {
    dom.attribute(node, name).filter(|v| !v.is_empty())
}
