//! Intersection-driven classes: one-shot reveal and the storyline step.

use serde::Deserialize;

use crate::dom::Dom;

pub const ANIMATE_SELECTOR: &str = "[data-animate]";
pub const STEP_SELECTOR: &str = "[data-scroll-step]";
pub const VISIBLE_CLASS: &str = "is-visible";
pub const ACTIVE_CLASS: &str = "is-active";

/// Options handed to the browser's intersection observer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ObserverOptions {
    pub threshold: f64,
    pub root_margin: String,
}

impl ObserverOptions {
    pub fn reveal() -> Self {
        Self {
            threshold: 0.12,
            root_margin: "0px 0px -10% 0px".to_string(),
        }
    }

    pub fn storyline() -> Self {
        Self {
            threshold: 0.5,
            root_margin: "-20% 0px -20% 0px".to_string(),
        }
    }
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self::reveal()
    }
}

/// Marks an element visible. Returns `true` when the caller should stop
/// observing it, i.e. when it actually intersects.
pub fn reveal<D: Dom>(dom: &D, node: &D::Node, intersecting: bool) -> bool {
    if !intersecting {
        return false;
    }
    dom.set_class(node, VISIBLE_CLASS, true);
    true
}

/// Storyline steps: at most one is active at a time.
pub fn activate_step<D: Dom>(dom: &D, steps: &[D::Node], target: &D::Node, intersecting: bool) {
    if !intersecting {
        return;
    }
    for step in steps {
        dom.set_class(step, ACTIVE_CLASS, false);
    }
    dom.set_class(target, ACTIVE_CLASS, true);
}
