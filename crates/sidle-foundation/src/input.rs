//! Raw pointer samples fed by the host.

use sidle_core::Point;

/// Pointer action kinds, mirroring the host's down/move/up/cancel stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEventKind {
    Down,
    Move,
    Up,
    Cancel,
}

/// A single timestamped pointer sample.
#[derive(Clone, Copy, Debug)]
pub struct PointerSample {
    pub kind: PointerEventKind,
    pub position: Point,
    /// Host event timestamp in milliseconds. Only differences matter.
    pub time_ms: u64,
}

impl PointerSample {
    pub fn new(kind: PointerEventKind, x: f32, y: f32, time_ms: u64) -> Self {
        Self {
            kind,
            position: Point::new(x, y),
            time_ms,
        }
    }
}
