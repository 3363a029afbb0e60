//! Drag recognition for the drawer edge gesture.

use sidle_core::Point;

use crate::gesture_constants::TOUCH_SLOP;
use crate::input::{PointerEventKind, PointerSample};
use crate::velocity_tracker::VelocityTracker;

/// Outcome of feeding one pointer sample to the recognizer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragEvent {
    /// The sample changed nothing (or arrived out of sequence).
    Ignored,
    /// A touch sequence began.
    Pressed,
    /// The slop threshold was crossed. `delta` is measured from a position
    /// anchored one slop past the initial touch, so applying it does not
    /// jump the content.
    DragStarted { delta: f32 },
    /// Horizontal movement while dragging, 1:1.
    Dragged { delta: f32 },
    /// The pointer lifted (or the stream was cancelled) mid-drag, with the
    /// clamped release velocity in px/s.
    Flung { velocity: f32 },
    /// The pointer lifted without a drag having started.
    Released { x: f32 },
    /// The stream was cancelled without a drag having started.
    Cancelled { x: f32 },
}

/// Ephemeral per-touch-sequence state.
struct GestureSession {
    initial: Point,
    last: Point,
    eligible: bool,
    dragging: bool,
    tracker: VelocityTracker,
}

/// Classifies a pointer stream into drawer drag gestures.
///
/// At most one session exists at a time, created on `Down` and destroyed on
/// `Up`/`Cancel` or [`DragRecognizer::reset`]. Whether a sequence may
/// become a drag is decided by the caller at `Down` time and latched for
/// the whole sequence.
pub struct DragRecognizer {
    touch_slop: f32,
    max_velocity: f32,
    session: Option<GestureSession>,
}

impl DragRecognizer {
    pub fn new(max_velocity: f32) -> Self {
        Self {
            touch_slop: TOUCH_SLOP,
            max_velocity,
            session: None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.session.as_ref().is_some_and(|session| session.dragging)
    }

    /// Destroys the current session, if any. Called when an animation takes
    /// over the offset, so a tween and a gesture never coexist.
    pub fn reset(&mut self) {
        self.session = None;
    }

    /// Feeds one pointer sample. `may_start_drag` is consulted only for
    /// `Down` samples; it records whether this sequence landed somewhere a
    /// drag is allowed to start.
    pub fn on_pointer(&mut self, sample: &PointerSample, may_start_drag: bool) -> DragEvent {
        match sample.kind {
            PointerEventKind::Down => self.on_down(sample, may_start_drag),
            PointerEventKind::Move => self.on_move(sample),
            PointerEventKind::Up | PointerEventKind::Cancel => self.on_end(sample),
        }
    }

    fn on_down(&mut self, sample: &PointerSample, eligible: bool) -> DragEvent {
        let mut tracker = VelocityTracker::new();
        tracker.add_sample(sample.time_ms, sample.position.x);
        self.session = Some(GestureSession {
            initial: sample.position,
            last: sample.position,
            eligible,
            dragging: false,
            tracker,
        });
        DragEvent::Pressed
    }

    fn on_move(&mut self, sample: &PointerSample) -> DragEvent {
        let Some(session) = self.session.as_mut() else {
            log::trace!("move without a preceding down, ignored");
            return DragEvent::Ignored;
        };

        session.tracker.add_sample(sample.time_ms, sample.position.x);
        let x = sample.position.x;
        let y = sample.position.y;

        if !session.dragging {
            // `last` still holds the initial touch here, so these are
            // cumulative displacements.
            let dx = x - session.last.x;
            let dy = y - session.last.y;
            if dx.abs() > self.touch_slop && dx.abs() > dy.abs() && session.eligible {
                session.dragging = true;
                let anchor = if dx > 0.0 {
                    session.initial.x + self.touch_slop
                } else {
                    session.initial.x - self.touch_slop
                };
                session.last = Point::new(x, y);
                return DragEvent::DragStarted { delta: x - anchor };
            }
            return DragEvent::Ignored;
        }

        let delta = x - session.last.x;
        session.last = Point::new(x, y);
        DragEvent::Dragged { delta }
    }

    fn on_end(&mut self, sample: &PointerSample) -> DragEvent {
        let Some(mut session) = self.session.take() else {
            log::trace!("{:?} without a preceding down, ignored", sample.kind);
            return DragEvent::Ignored;
        };

        if session.dragging {
            session.tracker.add_sample(sample.time_ms, sample.position.x);
            return DragEvent::Flung {
                velocity: session.tracker.velocity_clamped(self.max_velocity),
            };
        }

        match sample.kind {
            PointerEventKind::Cancel => DragEvent::Cancelled {
                x: sample.position.x,
            },
            _ => DragEvent::Released {
                x: sample.position.x,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture_constants::MAX_FLING_VELOCITY;

    fn down(x: f32, y: f32, t: u64) -> PointerSample {
        PointerSample::new(PointerEventKind::Down, x, y, t)
    }

    fn mv(x: f32, y: f32, t: u64) -> PointerSample {
        PointerSample::new(PointerEventKind::Move, x, y, t)
    }

    fn up(x: f32, y: f32, t: u64) -> PointerSample {
        PointerSample::new(PointerEventKind::Up, x, y, t)
    }

    fn cancel(x: f32, y: f32, t: u64) -> PointerSample {
        PointerSample::new(PointerEventKind::Cancel, x, y, t)
    }

    #[test]
    fn slop_crossing_anchors_the_tracked_position() {
        let mut recognizer = DragRecognizer::new(MAX_FLING_VELOCITY);
        assert_eq!(recognizer.on_pointer(&down(10.0, 10.0, 0), true), DragEvent::Pressed);

        // 20px right, 2px down: horizontal wins and exceeds the slop.
        let event = recognizer.on_pointer(&mv(30.0, 12.0, 10), false);
        assert_eq!(event, DragEvent::DragStarted { delta: 12.0 });
        assert!(recognizer.is_dragging());

        let event = recognizer.on_pointer(&mv(45.0, 12.0, 20), false);
        assert_eq!(event, DragEvent::Dragged { delta: 15.0 });
    }

    #[test]
    fn leftward_slop_anchors_on_the_other_side() {
        let mut recognizer = DragRecognizer::new(MAX_FLING_VELOCITY);
        recognizer.on_pointer(&down(300.0, 10.0, 0), true);

        let event = recognizer.on_pointer(&mv(280.0, 10.0, 10), false);
        // Anchor sits at 300 - 8 = 292.
        assert_eq!(event, DragEvent::DragStarted { delta: -12.0 });
    }

    #[test]
    fn ineligible_sequences_never_become_drags() {
        let mut recognizer = DragRecognizer::new(MAX_FLING_VELOCITY);
        recognizer.on_pointer(&down(50.0, 10.0, 0), false);

        assert_eq!(recognizer.on_pointer(&mv(200.0, 10.0, 10), false), DragEvent::Ignored);
        assert!(!recognizer.is_dragging());
        assert_eq!(
            recognizer.on_pointer(&up(200.0, 10.0, 20), false),
            DragEvent::Released { x: 200.0 }
        );
    }

    #[test]
    fn vertical_movement_is_not_a_drag() {
        let mut recognizer = DragRecognizer::new(MAX_FLING_VELOCITY);
        recognizer.on_pointer(&down(10.0, 10.0, 0), true);

        assert_eq!(recognizer.on_pointer(&mv(22.0, 40.0, 10), false), DragEvent::Ignored);
        assert!(!recognizer.is_dragging());
    }

    #[test]
    fn sub_slop_movement_keeps_watching() {
        let mut recognizer = DragRecognizer::new(MAX_FLING_VELOCITY);
        recognizer.on_pointer(&down(10.0, 10.0, 0), true);

        assert_eq!(recognizer.on_pointer(&mv(15.0, 10.0, 10), false), DragEvent::Ignored);
        // Displacement is cumulative from the initial touch.
        assert_ne!(
            recognizer.on_pointer(&mv(25.0, 10.0, 20), false),
            DragEvent::Ignored
        );
    }

    #[test]
    fn release_mid_drag_reports_a_clamped_fling() {
        let mut recognizer = DragRecognizer::new(MAX_FLING_VELOCITY);
        recognizer.on_pointer(&down(10.0, 10.0, 0), true);
        recognizer.on_pointer(&mv(60.0, 10.0, 10), false);
        recognizer.on_pointer(&mv(160.0, 10.0, 20), false);

        let event = recognizer.on_pointer(&up(160.0, 10.0, 20), false);
        let DragEvent::Flung { velocity } = event else {
            panic!("expected a fling, got {event:?}");
        };
        assert!(velocity > 0.0);
        assert!(velocity <= MAX_FLING_VELOCITY);
        assert!(!recognizer.is_dragging());
    }

    #[test]
    fn cancel_without_drag_is_distinct_from_release() {
        let mut recognizer = DragRecognizer::new(MAX_FLING_VELOCITY);
        recognizer.on_pointer(&down(10.0, 10.0, 0), true);
        assert_eq!(
            recognizer.on_pointer(&cancel(12.0, 10.0, 10), false),
            DragEvent::Cancelled { x: 12.0 }
        );
    }

    #[test]
    fn orphan_samples_are_ignored() {
        let mut recognizer = DragRecognizer::new(MAX_FLING_VELOCITY);
        assert_eq!(recognizer.on_pointer(&mv(10.0, 10.0, 0), false), DragEvent::Ignored);
        assert_eq!(recognizer.on_pointer(&up(10.0, 10.0, 10), false), DragEvent::Ignored);
    }

    #[test]
    fn reset_destroys_the_session() {
        let mut recognizer = DragRecognizer::new(MAX_FLING_VELOCITY);
        recognizer.on_pointer(&down(10.0, 10.0, 0), true);
        recognizer.on_pointer(&mv(40.0, 10.0, 10), false);
        assert!(recognizer.is_dragging());

        recognizer.reset();
        assert!(!recognizer.is_dragging());
        assert_eq!(recognizer.on_pointer(&mv(60.0, 10.0, 20), false), DragEvent::Ignored);
    }
}
