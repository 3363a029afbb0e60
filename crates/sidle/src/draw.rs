//! Derived per-frame draw values.

use sidle_core::Rect;

/// Maximum alpha of the dark overlay dimming the menu; it fades out as the
/// drawer opens.
pub const MAX_OVERLAY_ALPHA: u8 = 185;

/// Width of the drop shadow the content casts onto the menu, in logical
/// pixels.
pub const DROP_SHADOW_WIDTH: f32 = 6.0;

/// Everything the rendering layer needs for one frame, derived from the
/// drawer's current offset. Pure values; nothing here is retained.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawMetrics {
    /// Content panel displacement from the left edge.
    pub offset: f32,
    /// `offset / menu_width`, in `[0, 1]`.
    pub open_fraction: f32,
    /// Whether any of the menu is showing.
    pub menu_visible: bool,
    /// Alpha of the menu dim overlay.
    pub overlay_alpha: u8,
    /// Region covered by the dim overlay (the revealed menu area).
    pub overlay_bounds: Rect,
    /// Where the content's drop shadow falls on the menu.
    pub drop_shadow_bounds: Rect,
    /// Left edge of the menu panel; the menu pans in at a quarter of the
    /// content speed.
    pub menu_left: f32,
    /// Extra top inset for the menu in window drag mode.
    pub menu_top_inset: f32,
    /// Indicator rectangle, when an attached, matching anchor exists.
    pub indicator_bounds: Option<Rect>,
}
