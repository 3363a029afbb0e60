//! Pointer input and gesture recognition for Sidle.
//!
//! Hosts feed raw timestamped pointer samples in; the recognizer decides
//! whether a touch sequence is a horizontal drag, a tap, or something to
//! pass through, and the velocity tracker estimates the release speed a
//! fling commits with.

mod drag;
mod gesture_constants;
mod input;
mod velocity_tracker;

pub use drag::{DragEvent, DragRecognizer};
pub use gesture_constants::{MAX_DRAG_BEZEL, MAX_FLING_VELOCITY, TOUCH_SLOP};
pub use input::{PointerEventKind, PointerSample};
pub use velocity_tracker::VelocityTracker;
