//! Active-item indicator placement.

use std::rc::Weak;

use sidle_animation::Easing;
use sidle_core::Rect;

/// Capability handle for the host view the indicator points at.
///
/// The drawer never owns the anchor. It looks the view up each frame and
/// skips the indicator when the handle has gone stale.
pub trait AnchorView {
    /// Whether the view is still part of the host hierarchy.
    fn is_attached(&self) -> bool;
    /// The view's rectangle in drawer coordinates.
    fn bounds(&self) -> Rect;
    /// The host-side position tag, if one was assigned.
    fn tag(&self) -> Option<i32>;
}

/// Computes where the indicator should be drawn, if anywhere.
///
/// The indicator stretches out of the moving content edge with a quadratic
/// ease-out and sits vertically centered on the anchor. A dropped or
/// detached anchor, or a tag that no longer matches the active position,
/// yields `None`.
pub(crate) fn indicator_bounds(
    anchor: &Weak<dyn AnchorView>,
    active_position: i32,
    width: f32,
    height: f32,
    content_left: f32,
    open_fraction: f32,
) -> Option<Rect> {
    let anchor = anchor.upgrade()?;
    if !anchor.is_attached() {
        return None;
    }
    // An untagged anchor reads as position 0.
    if anchor.tag().unwrap_or(0) != active_position {
        return None;
    }

    let anchor_rect = anchor.bounds();
    let stretched = width * Easing::EaseOutQuad.transform(open_fraction);
    let top = anchor_rect.y + (anchor_rect.height - height) / 2.0;
    Some(Rect::new(content_left - stretched, top, stretched, height))
}
