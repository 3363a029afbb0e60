use super::*;

use sidle_core::{ManualTickScheduler, TickClock};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

fn animator() -> (Rc<ManualTickScheduler>, OffsetAnimator) {
    let scheduler = Rc::new(ManualTickScheduler::new());
    let clock = TickClock::new(scheduler.clone());
    (scheduler, OffsetAnimator::new(clock))
}

fn run_to_completion(scheduler: &ManualTickScheduler) {
    let mut guard = 0;
    while scheduler.has_pending() {
        scheduler.advance_by(ANIMATION_DELAY_MS);
        guard += 1;
        assert!(guard < 1_000, "animation never settled");
    }
}

#[test]
fn tween_reaches_the_exact_target_and_settles_once() {
    let (scheduler, animator) = animator();
    let frames = Rc::new(RefCell::new(Vec::new()));
    let settled = Rc::new(RefCell::new(Vec::new()));

    let frames_sink = Rc::clone(&frames);
    let settled_sink = Rc::clone(&settled);
    animator.start(
        0.0,
        300.0,
        0.0,
        300.0,
        move |offset| frames_sink.borrow_mut().push(offset),
        move |offset| settled_sink.borrow_mut().push(offset),
    );
    assert!(animator.is_running());

    run_to_completion(&scheduler);

    assert!(!animator.is_running());
    assert_eq!(*settled.borrow(), vec![300.0]);

    let frames = frames.borrow();
    assert!(!frames.is_empty());
    let mut last = 0.0;
    for &offset in frames.iter() {
        assert!(offset >= last, "offset regressed");
        assert!(offset <= 300.0, "intermediate frame overshot the target");
        last = offset;
    }
}

#[test]
fn full_span_tween_runs_for_the_base_duration() {
    let (scheduler, animator) = animator();
    let settled_at = Rc::new(Cell::new(0u64));

    let scheduler_probe = Rc::clone(&scheduler);
    let settled_clock = Rc::clone(&settled_at);
    animator.start(0.0, 300.0, 0.0, 300.0, |_| {}, move |_| {
        settled_clock.set(scheduler_probe.now_ms());
    });

    run_to_completion(&scheduler);

    // The timeline starts at the first tick; 600ms of travel settle on the
    // first tick at or past that mark.
    let elapsed = settled_at.get() - ANIMATION_DELAY_MS;
    assert!(
        (600..600 + ANIMATION_DELAY_MS).contains(&elapsed),
        "settled after {elapsed}ms"
    );
}

#[test]
fn cancel_removes_the_pending_tick() {
    let (scheduler, animator) = animator();
    let frames = Rc::new(Cell::new(0u32));

    let frames_counter = Rc::clone(&frames);
    animator.start(
        0.0,
        300.0,
        0.0,
        300.0,
        move |_| frames_counter.set(frames_counter.get() + 1),
        |_| panic!("cancelled tween must not settle"),
    );
    scheduler.advance_by(ANIMATION_DELAY_MS * 4);
    let seen = frames.get();
    assert!(seen > 0);

    animator.cancel();
    assert!(!animator.is_running());
    assert!(!scheduler.has_pending());

    scheduler.advance_by(ANIMATION_DELAY_MS * 10);
    assert_eq!(frames.get(), seen);
}

#[test]
fn starting_a_new_tween_takes_over_from_the_old_one() {
    let (scheduler, animator) = animator();
    let old_frames = Rc::new(Cell::new(0u32));

    let old_counter = Rc::clone(&old_frames);
    animator.start(
        0.0,
        300.0,
        0.0,
        300.0,
        move |_| old_counter.set(old_counter.get() + 1),
        |_| panic!("superseded tween must not settle"),
    );
    scheduler.advance_by(ANIMATION_DELAY_MS * 4);
    let seen = old_frames.get();

    let settled = Rc::new(Cell::new(false));
    let settled_flag = Rc::clone(&settled);
    animator.start(120.0, 0.0, 0.0, 300.0, |_| {}, move |offset| {
        assert_eq!(offset, 0.0);
        settled_flag.set(true);
    });

    run_to_completion(&scheduler);
    assert_eq!(old_frames.get(), seen, "old tween kept producing frames");
    assert!(settled.get());
}

#[test]
fn zero_distance_settles_immediately_without_scheduling() {
    let (scheduler, animator) = animator();
    let settled = Rc::new(Cell::new(false));

    let settled_flag = Rc::clone(&settled);
    animator.start(300.0, 300.0, 0.0, 300.0, |_| panic!("no frames expected"), move |offset| {
        assert_eq!(offset, 300.0);
        settled_flag.set(true);
    });

    assert!(settled.get());
    assert!(!animator.is_running());
    assert!(!scheduler.has_pending());
}

#[test]
fn release_velocity_shortens_the_travel() {
    let (scheduler, animator) = animator();
    let settled_at = Rc::new(Cell::new(0u64));

    let scheduler_probe = Rc::clone(&scheduler);
    let settled_clock = Rc::clone(&settled_at);
    // 4 * 1000 * 100 / 1000 = 400ms of travel.
    animator.start(200.0, 300.0, 1000.0, 300.0, |_| {}, move |_| {
        settled_clock.set(scheduler_probe.now_ms());
    });

    run_to_completion(&scheduler);
    let elapsed = settled_at.get() - ANIMATION_DELAY_MS;
    assert!(
        (400..400 + ANIMATION_DELAY_MS).contains(&elapsed),
        "settled after {elapsed}ms"
    );
}
