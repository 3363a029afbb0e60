//! Animation system for Sidle.
//!
//! Provides the easing curves, the time-based offset scroller, and the
//! tick-driven tween driver that moves the drawer between its edges.

mod animator;
mod easing;
mod scroller;

pub use animator::{OffsetAnimator, ANIMATION_DELAY_MS};
pub use easing::Easing;
pub use scroller::{scroll_duration, OffsetScroller, DURATION_MAX_MS};
