//! Tick scheduling capability.
//!
//! Animations are driven by delayed callbacks rather than a busy loop: each
//! tick either reschedules itself or terminates. The scheduler is a
//! host-provided capability; the rest of the workspace only ever sees
//! [`TickClock`] and the registrations it hands out.

use std::rc::Rc;

pub type TickCallbackId = u64;

/// Host-provided scheduler for delayed callbacks.
///
/// Implementations deliver each scheduled callback at most once, passing
/// their current time in milliseconds. `cancel` must take effect
/// synchronously: a cancelled callback never fires afterwards.
pub trait TickScheduler {
    fn schedule(&self, delay_ms: u64, callback: Box<dyn FnOnce(u64)>) -> TickCallbackId;
    fn cancel(&self, id: TickCallbackId);
}

/// Clock facade over a [`TickScheduler`].
#[derive(Clone)]
pub struct TickClock {
    scheduler: Rc<dyn TickScheduler>,
}

impl TickClock {
    pub fn new(scheduler: Rc<dyn TickScheduler>) -> Self {
        Self { scheduler }
    }

    /// Schedules `callback` to run after `delay_ms`.
    ///
    /// The returned registration cancels the callback when dropped, so a
    /// pending tick can never outlive the code that asked for it.
    pub fn with_tick_millis(
        &self,
        delay_ms: u64,
        callback: impl FnOnce(u64) + 'static,
    ) -> TickRegistration {
        let id = self.scheduler.schedule(delay_ms, Box::new(callback));
        TickRegistration {
            scheduler: self.scheduler.clone(),
            id: Some(id),
        }
    }
}

/// Handle to a pending tick callback.
pub struct TickRegistration {
    scheduler: Rc<dyn TickScheduler>,
    id: Option<TickCallbackId>,
}

impl TickRegistration {
    pub fn cancel(mut self) {
        if let Some(id) = self.id.take() {
            self.scheduler.cancel(id);
        }
    }
}

impl Drop for TickRegistration {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            self.scheduler.cancel(id);
        }
    }
}
