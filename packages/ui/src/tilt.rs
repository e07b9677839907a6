//! Pointer tilt for `[data-tilt]` cards.
//!
//! Pointer moves are coalesced through a [`TiltFrame`]: each move cancels the
//! pending animation frame and schedules a new one, so at most one style
//! write happens per frame.

use serde::Deserialize;

use crate::dom::Dom;

pub const TILT_SELECTOR: &str = "[data-tilt]";

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct TiltConfig {
    /// Rotation reached at the element's edge, in degrees.
    pub max_rotation_deg: f64,
    pub perspective_px: f64,
    pub scale: f64,
}

impl Default for TiltConfig {
    fn default() -> Self {
        Self {
            max_rotation_deg: 6.0,
            perspective_px: 900.0,
            scale: 1.02,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// `(rotate_x, rotate_y)` in degrees for a pointer at client coordinates.
pub fn rotation(rect: Rect, client_x: f64, client_y: f64, config: &TiltConfig) -> (f64, f64) {
    if rect.width <= 0.0 || rect.height <= 0.0 {
        return (0.0, 0.0);
    }
    let center_x = rect.left + rect.width / 2.0;
    let center_y = rect.top + rect.height / 2.0;
    let rotate_x = (client_y - center_y) / rect.height * -config.max_rotation_deg;
    let rotate_y = (client_x - center_x) / rect.width * config.max_rotation_deg;
    (normalize_zero(rotate_x), normalize_zero(rotate_y))
}

pub fn transform(rotate_x: f64, rotate_y: f64, config: &TiltConfig) -> String {
    let s = config.scale;
    format!(
        "perspective({}px) rotateX({rotate_x}deg) rotateY({rotate_y}deg) scale3d({s}, {s}, {s})",
        config.perspective_px
    )
}

pub fn write<D: Dom>(dom: &D, node: &D::Node, transform: &str) {
    dom.set_style(node, "transform", transform);
}

pub fn reset<D: Dom>(dom: &D, node: &D::Node) {
    dom.set_style(node, "transform", "");
}

/// Tilt only runs for precise pointers and when motion is welcome.
pub fn tilt_enabled(prefers_reduced_motion: bool, fine_pointer: bool) -> bool {
    !prefers_reduced_motion && fine_pointer
}

// -0.0 would print as "-0".
fn normalize_zero(v: f64) -> f64 {
    if v == 0.0 {
        0.0
    } else {
        v
    }
}

/// Pointer state of one tilted element between animation frames: the
/// latest transform and the frame request that will write it. At most one
/// request is pending per element.
#[derive(Debug)]
pub struct TiltFrame<H> {
    pending: Option<H>,
    transform: Option<String>,
}

impl<H> Default for TiltFrame<H> {
    fn default() -> Self {
        Self {
            pending: None,
            transform: None,
        }
    }
}

impl<H> TiltFrame<H> {
    /// Records a new frame request for `transform` and hands back the one it
    /// replaces, which the caller must cancel.
    pub fn schedule(&mut self, transform: String, handle: H) -> Option<H> {
        self.transform = Some(transform);
        self.pending.replace(handle)
    }

    /// The frame fired: the transform to write, if the pointer is still over
    /// the element.
    pub fn fire(&mut self) -> Option<String> {
        self.pending = None;
        self.transform.take()
    }

    /// Pointer left: drops the pending transform and returns the request to
    /// cancel.
    pub fn leave(&mut self) -> Option<H> {
        self.transform = None;
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
