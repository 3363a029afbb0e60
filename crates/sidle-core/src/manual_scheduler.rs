//! Deterministic scheduler for tests and headless hosts.

use std::cell::RefCell;

use crate::tick::{TickCallbackId, TickScheduler};

struct Pending {
    id: TickCallbackId,
    due_ms: u64,
    callback: Box<dyn FnOnce(u64)>,
}

struct Inner {
    now_ms: u64,
    next_id: TickCallbackId,
    pending: Vec<Pending>,
}

/// A [`TickScheduler`] driven by explicit time advancement.
///
/// Callbacks run in due-time order (insertion order on ties) with the clock
/// set to each callback's due time. Callbacks may schedule further ticks;
/// ticks that become due inside the advanced window run in the same pass.
pub struct ManualTickScheduler {
    inner: RefCell<Inner>,
}

impl ManualTickScheduler {
    pub fn new() -> Self {
        Self {
            inner: RefCell::new(Inner {
                now_ms: 0,
                next_id: 1,
                pending: Vec::new(),
            }),
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.inner.borrow().now_ms
    }

    pub fn has_pending(&self) -> bool {
        !self.inner.borrow().pending.is_empty()
    }

    pub fn advance_by(&self, ms: u64) {
        let target = self.now_ms() + ms;
        self.advance_to(target);
    }

    /// Moves the clock to `target_ms`, running every callback due on the way.
    pub fn advance_to(&self, target_ms: u64) {
        loop {
            let next = {
                let mut inner = self.inner.borrow_mut();
                let mut earliest: Option<(usize, (u64, TickCallbackId))> = None;
                for (index, pending) in inner.pending.iter().enumerate() {
                    if pending.due_ms > target_ms {
                        continue;
                    }
                    let key = (pending.due_ms, pending.id);
                    if earliest.is_none_or(|(_, best)| key < best) {
                        earliest = Some((index, key));
                    }
                }
                match earliest {
                    Some((index, _)) => {
                        let pending = inner.pending.remove(index);
                        inner.now_ms = inner.now_ms.max(pending.due_ms);
                        Some(pending)
                    }
                    None => {
                        inner.now_ms = inner.now_ms.max(target_ms);
                        None
                    }
                }
            };

            match next {
                Some(pending) => {
                    let now = self.now_ms();
                    (pending.callback)(now);
                }
                None => break,
            }
        }
    }
}

impl Default for ManualTickScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl TickScheduler for ManualTickScheduler {
    fn schedule(&self, delay_ms: u64, callback: Box<dyn FnOnce(u64)>) -> TickCallbackId {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        let due_ms = inner.now_ms + delay_ms;
        inner.pending.push(Pending {
            id,
            due_ms,
            callback,
        });
        id
    }

    fn cancel(&self, id: TickCallbackId) {
        self.inner
            .borrow_mut()
            .pending
            .retain(|pending| pending.id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn runs_callbacks_in_due_order() {
        let scheduler = ManualTickScheduler::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        for (label, delay) in [("b", 20u64), ("a", 10), ("c", 30)] {
            let order = Rc::clone(&order);
            scheduler.schedule(delay, Box::new(move |_| order.borrow_mut().push(label)));
        }

        scheduler.advance_by(30);
        assert_eq!(*order.borrow(), vec!["a", "b", "c"]);
        assert_eq!(scheduler.now_ms(), 30);
    }

    #[test]
    fn cancelled_callbacks_never_run() {
        let scheduler = ManualTickScheduler::new();
        let ran = Rc::new(RefCell::new(false));

        let ran_flag = Rc::clone(&ran);
        let id = scheduler.schedule(10, Box::new(move |_| *ran_flag.borrow_mut() = true));
        scheduler.cancel(id);

        scheduler.advance_by(100);
        assert!(!*ran.borrow());
    }

    #[test]
    fn reentrant_scheduling_runs_within_the_same_pass() {
        let scheduler = Rc::new(ManualTickScheduler::new());
        let ticks = Rc::new(RefCell::new(Vec::new()));

        let inner_scheduler = Rc::clone(&scheduler);
        let inner_ticks = Rc::clone(&ticks);
        scheduler.schedule(
            10,
            Box::new(move |now| {
                inner_ticks.borrow_mut().push(now);
                let ticks = Rc::clone(&inner_ticks);
                inner_scheduler.schedule(10, Box::new(move |now| ticks.borrow_mut().push(now)));
            }),
        );

        scheduler.advance_by(25);
        assert_eq!(*ticks.borrow(), vec![10, 20]);
        assert!(!scheduler.has_pending());
    }

    #[test]
    fn pending_beyond_the_window_stays_queued() {
        let scheduler = ManualTickScheduler::new();
        scheduler.schedule(50, Box::new(|_| {}));

        scheduler.advance_by(20);
        assert!(scheduler.has_pending());
        assert_eq!(scheduler.now_ms(), 20);

        scheduler.advance_by(30);
        assert!(!scheduler.has_pending());
    }
}
