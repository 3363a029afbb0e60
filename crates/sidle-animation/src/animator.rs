//! Drives drawer open/close tweens through the tick scheduler.

use std::cell::RefCell;
use std::rc::Rc;

use sidle_core::{TickClock, TickRegistration};

use crate::easing::Easing;
use crate::scroller::{scroll_duration, OffsetScroller};

/// Delay between animation ticks, nominally 60Hz.
pub const ANIMATION_DELAY_MS: u64 = 1000 / 60;

struct ActiveTween {
    scroller: OffsetScroller,
    registration: Option<TickRegistration>,
}

/// Tween driver for the drawer offset.
///
/// At most one tween is active at a time. Starting a new one or cancelling
/// removes the pending tick synchronously, so a stale tick can never write
/// an offset after another owner has taken over. Clones share the same
/// tween.
pub struct OffsetAnimator {
    clock: TickClock,
    tween: Rc<RefCell<Option<ActiveTween>>>,
}

impl OffsetAnimator {
    pub fn new(clock: TickClock) -> Self {
        Self {
            clock,
            tween: Rc::new(RefCell::new(None)),
        }
    }

    /// Starts a tween from `start` to `target`.
    ///
    /// `velocity` is the release velocity in px/s (0 for programmatic
    /// moves); `span` is the full travel distance, used by the
    /// proportional-duration fallback. `on_frame` receives each
    /// intermediate offset; `on_settle` receives the exact target once the
    /// tween completes. A tween with no distance to cover settles
    /// immediately without scheduling.
    pub fn start<F, G>(
        &self,
        start: f32,
        target: f32,
        velocity: f32,
        span: f32,
        on_frame: F,
        on_settle: G,
    ) where
        F: Fn(f32) + 'static,
        G: FnOnce(f32) + 'static,
    {
        self.cancel();

        if start == target {
            on_settle(target);
            return;
        }

        let duration = scroll_duration(target - start, span, velocity);
        let mut scroller = OffsetScroller::new(Easing::EaseOutQuint);
        scroller.start_scroll(start, target - start, duration);

        *self.tween.borrow_mut() = Some(ActiveTween {
            scroller,
            registration: None,
        });
        schedule_tick(self.tween.clone(), self.clock.clone(), on_frame, on_settle);
    }

    /// Aborts the running tween without settling and removes its pending
    /// tick.
    pub fn cancel(&self) {
        if let Some(tween) = self.tween.borrow_mut().take() {
            drop(tween.registration);
        }
    }

    pub fn is_running(&self) -> bool {
        self.tween.borrow().is_some()
    }
}

impl Clone for OffsetAnimator {
    fn clone(&self) -> Self {
        Self {
            clock: self.clock.clone(),
            tween: self.tween.clone(),
        }
    }
}

enum TickOutcome {
    Frame(f32),
    Settle(f32),
    Stale,
}

fn schedule_tick<F, G>(
    tween: Rc<RefCell<Option<ActiveTween>>>,
    clock: TickClock,
    on_frame: F,
    on_settle: G,
) where
    F: Fn(f32) + 'static,
    G: FnOnce(f32) + 'static,
{
    let tween_cb = tween.clone();
    let clock_cb = clock.clone();

    let registration = clock.with_tick_millis(ANIMATION_DELAY_MS, move |now_ms| {
        let outcome = {
            let mut guard = tween_cb.borrow_mut();
            match guard.as_mut() {
                None => TickOutcome::Stale,
                Some(active) => {
                    active.registration = None;
                    active.scroller.compute_offset(now_ms);
                    if active.scroller.is_finished() {
                        TickOutcome::Settle(active.scroller.final_offset())
                    } else {
                        TickOutcome::Frame(active.scroller.curr_offset())
                    }
                }
            }
        };

        match outcome {
            TickOutcome::Frame(offset) => {
                on_frame(offset);
                // `on_frame` may have handed the offset to a new owner; only
                // keep ticking while this tween is still the unscheduled one.
                let still_ours = tween_cb
                    .borrow()
                    .as_ref()
                    .is_some_and(|active| active.registration.is_none());
                if still_ours {
                    schedule_tick(tween_cb, clock_cb, on_frame, on_settle);
                }
            }
            TickOutcome::Settle(offset) => {
                tween_cb.borrow_mut().take();
                on_settle(offset);
            }
            TickOutcome::Stale => {}
        }
    });

    if let Some(active) = tween.borrow_mut().as_mut() {
        active.registration = Some(registration);
    }
}

#[cfg(test)]
#[path = "tests/animator_tests.rs"]
mod tests;
