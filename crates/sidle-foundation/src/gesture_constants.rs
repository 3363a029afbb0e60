//! Shared gesture constants for drawer touch handling.
//!
//! Values are in logical pixels. For very high-density touch screens the
//! host may want to scale them by its density factor before layout; the
//! defaults work well for typical phone and desktop displays.

/// Movement threshold before a touch sequence reads as a drag.
///
/// Until the pointer travels this far from its initial position the
/// sequence can still become a tap. 8.0 is large enough to ignore finger
/// jitter and matches common platform touch slop.
pub const TOUCH_SLOP: f32 = 8.0;

/// Maximum width of the edge strip that may start a drag while the drawer
/// is closed.
///
/// The effective strip is the smaller of this and a tenth of the layout
/// width, recomputed on every layout pass.
pub const MAX_DRAG_BEZEL: f32 = 16.0;

/// Maximum release velocity in logical pixels per second.
///
/// Velocities estimated above this are clamped before they feed the
/// commit decision and the animation duration.
pub const MAX_FLING_VELOCITY: f32 = 8_000.0;
