//! Deterministic drawer driving for tests.

use std::cell::RefCell;
use std::rc::Rc;

use sidle::{DrawerState, MenuDrawer};
use sidle_animation::ANIMATION_DELAY_MS;
use sidle_core::ManualTickScheduler;
use sidle_foundation::{PointerEventKind, PointerSample};

/// Drives a [`MenuDrawer`] with synthetic input on a virtual clock.
///
/// Pointer samples are stamped with the scheduler's current time, so a
/// test advances time explicitly between samples to shape gesture
/// velocities, and pumps the scheduler to run animation ticks.
pub struct DrawerRobot {
    drawer: MenuDrawer,
    scheduler: Rc<ManualTickScheduler>,
    transitions: Rc<RefCell<Vec<(DrawerState, DrawerState)>>>,
}

impl DrawerRobot {
    /// Builds a drawer laid out at `width` x `height` on a manual
    /// scheduler, with every state transition recorded.
    pub fn new(width: f32, height: f32) -> Self {
        let robot = Self::without_layout();
        robot.drawer.set_bounds(width, height);
        robot
    }

    /// Builds a drawer that has not seen a layout pass yet.
    pub fn without_layout() -> Self {
        let scheduler = Rc::new(ManualTickScheduler::new());
        let drawer = MenuDrawer::new(scheduler.clone());

        let transitions = Rc::new(RefCell::new(Vec::new()));
        let recorder = Rc::clone(&transitions);
        drawer.set_state_listener(move |old, new| recorder.borrow_mut().push((old, new)));

        Self {
            drawer,
            scheduler,
            transitions,
        }
    }

    pub fn drawer(&self) -> &MenuDrawer {
        &self.drawer
    }

    pub fn scheduler(&self) -> &Rc<ManualTickScheduler> {
        &self.scheduler
    }

    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    /// Recorded `(old, new)` transitions, oldest first.
    pub fn transitions(&self) -> Vec<(DrawerState, DrawerState)> {
        self.transitions.borrow().clone()
    }

    pub fn clear_transitions(&self) {
        self.transitions.borrow_mut().clear();
    }

    /// Feeds one pointer sample stamped with the current virtual time.
    /// Returns the drawer's capture decision.
    pub fn touch(&self, kind: PointerEventKind, x: f32, y: f32) -> bool {
        self.drawer
            .handle_pointer(&PointerSample::new(kind, x, y, self.now_ms()))
    }

    pub fn press(&self, x: f32, y: f32) -> bool {
        self.touch(PointerEventKind::Down, x, y)
    }

    /// Advances the clock by `dt_ms`, then feeds a move sample.
    pub fn move_to(&self, x: f32, y: f32, dt_ms: u64) -> bool {
        self.scheduler.advance_by(dt_ms);
        self.touch(PointerEventKind::Move, x, y)
    }

    pub fn release(&self, x: f32, y: f32) -> bool {
        self.touch(PointerEventKind::Up, x, y)
    }

    pub fn cancel(&self, x: f32, y: f32) -> bool {
        self.touch(PointerEventKind::Cancel, x, y)
    }

    /// Presses at `from`, moves to `to` in `steps` samples `dt_ms` apart,
    /// and releases at the destination.
    pub fn drag(&self, from: (f32, f32), to: (f32, f32), steps: u32, dt_ms: u64) {
        self.press(from.0, from.1);
        for step in 1..=steps {
            let t = step as f32 / steps as f32;
            self.move_to(
                from.0 + (to.0 - from.0) * t,
                from.1 + (to.1 - from.1) * t,
                dt_ms,
            );
        }
        self.release(to.0, to.1);
    }

    /// Pumps `ticks` animation frames.
    pub fn pump(&self, ticks: u32) {
        for _ in 0..ticks {
            self.scheduler.advance_by(ANIMATION_DELAY_MS);
        }
    }

    /// Runs pending animation ticks until the drawer goes quiet.
    pub fn settle(&self) {
        let mut guard = 0;
        while self.scheduler.has_pending() {
            self.scheduler.advance_by(ANIMATION_DELAY_MS);
            guard += 1;
            assert!(guard < 10_000, "drawer never settled");
        }
    }
}
