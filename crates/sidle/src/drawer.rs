//! The sliding drawer controller.
//!
//! `MenuDrawer` coordinates the gesture recognizer and the offset animator
//! so that exactly one of them drives the content offset at any moment:
//! an eligible touch cancels a running tween before the drag can begin,
//! and starting a tween destroys the live gesture session. All mutation
//! happens on one logical thread, driven by host input events and
//! scheduler ticks.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use sidle_animation::OffsetAnimator;
use sidle_core::{Rect, TickClock, TickScheduler};
use sidle_foundation::{
    DragEvent, DragRecognizer, PointerEventKind, PointerSample, MAX_DRAG_BEZEL,
    MAX_FLING_VELOCITY,
};

use crate::draw::{DrawMetrics, DROP_SHADOW_WIDTH, MAX_OVERLAY_ALPHA};
use crate::indicator::{indicator_bounds, AnchorView};
use crate::position::ContentPosition;
use crate::state::DrawerState;

/// How dragging affects the window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DragMode {
    /// Only the content pane slides.
    #[default]
    Content,
    /// The entire window slides; the menu is inset below the content's
    /// top inset.
    Window,
}

/// Persisted drawer state. The host serializes it however it likes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SavedMenuState {
    pub menu_visible: bool,
}

type Listener = Rc<dyn Fn(DrawerState, DrawerState)>;
type InvalidateHook = Rc<dyn Fn()>;
type Notification = (Listener, DrawerState, DrawerState);

struct DrawerInner {
    position: ContentPosition,
    state: DrawerState,
    recognizer: DragRecognizer,
    animator: OffsetAnimator,
    width: f32,
    height: f32,
    bezel: f32,
    menu_width_override: Option<f32>,
    drag_mode: DragMode,
    content_top_inset: f32,
    listener: Option<Listener>,
    invalidate_hook: Option<InvalidateHook>,
    anchor: Option<Weak<dyn AnchorView>>,
    active_position: i32,
    indicator_size: Option<(f32, f32)>,
    pending_restore: Option<bool>,
}

impl DrawerInner {
    /// Records a transition and hands back the notification to fire once
    /// the borrow is released. No-op transitions notify nobody.
    fn set_state(&mut self, state: DrawerState) -> Option<Notification> {
        if state == self.state {
            return None;
        }
        let old = self.state;
        self.state = state;
        log::trace!("drawer state {old:?} -> {state:?}");
        self.listener.clone().map(|listener| (listener, old, state))
    }

    fn apply_menu_width(&mut self, menu_width: f32) -> bool {
        let mut changed = self.position.set_menu_width(menu_width);
        // A settled-open drawer stays pinned to the (possibly moved) edge.
        if self.state == DrawerState::Open {
            changed |= self.position.set_offset(menu_width);
        }
        changed
    }
}

/// Sliding menu drawer controller.
///
/// Cheap to clone; clones share the same drawer. The host feeds layout
/// bounds through [`set_bounds`](MenuDrawer::set_bounds) and pointer
/// samples through [`handle_pointer`](MenuDrawer::handle_pointer), and
/// reads [`draw_metrics`](MenuDrawer::draw_metrics) each frame.
#[derive(Clone)]
pub struct MenuDrawer {
    inner: Rc<RefCell<DrawerInner>>,
}

impl MenuDrawer {
    /// Creates a drawer driving its animation ticks through `scheduler`.
    pub fn new(scheduler: Rc<dyn TickScheduler>) -> Self {
        let clock = TickClock::new(scheduler);
        let inner = DrawerInner {
            position: ContentPosition::default(),
            state: DrawerState::Closed,
            recognizer: DragRecognizer::new(MAX_FLING_VELOCITY),
            animator: OffsetAnimator::new(clock),
            width: 0.0,
            height: 0.0,
            bezel: 0.0,
            menu_width_override: None,
            drag_mode: DragMode::Content,
            content_top_inset: 0.0,
            listener: None,
            invalidate_hook: None,
            anchor: None,
            active_position: 0,
            indicator_size: None,
            pending_restore: None,
        };
        Self {
            inner: Rc::new(RefCell::new(inner)),
        }
    }

    /// Supplies the layout bounds. Must be called with the final size on
    /// every layout pass; non-positive bounds are a host bug.
    pub fn set_bounds(&self, width: f32, height: f32) {
        assert!(
            width > 0.0 && height > 0.0,
            "drawer bounds must be positive, got {width}x{height}"
        );

        let (hook, notification) = {
            let mut inner = self.inner.borrow_mut();
            inner.width = width;
            inner.height = height;
            inner.bezel = (width / 10.0).min(MAX_DRAG_BEZEL);

            let menu_width = inner.menu_width_override.unwrap_or(width * 0.8);
            let mut changed = inner.apply_menu_width(menu_width);
            log::debug!(
                "layout {width}x{height}: menu width {menu_width}, bezel {}",
                inner.bezel
            );

            let mut notification = None;
            if let Some(visible) = inner.pending_restore.take() {
                let target = if visible { menu_width } else { 0.0 };
                changed |= inner.position.set_offset(target);
                notification = inner.set_state(if visible {
                    DrawerState::Open
                } else {
                    DrawerState::Closed
                });
            }

            (changed.then(|| inner.invalidate_hook.clone()).flatten(), notification)
        };

        self.run_effects(hook, notification);
    }

    /// Overrides the computed menu width (otherwise 80% of the layout
    /// width).
    pub fn set_menu_width(&self, menu_width: f32) {
        let hook = {
            let mut inner = self.inner.borrow_mut();
            inner.menu_width_override = Some(menu_width);
            let changed = inner.width > 0.0 && inner.apply_menu_width(menu_width);
            changed.then(|| inner.invalidate_hook.clone()).flatten()
        };
        self.run_effects(hook, None);
    }

    pub fn set_drag_mode(&self, drag_mode: DragMode) {
        self.inner.borrow_mut().drag_mode = drag_mode;
    }

    /// Top inset of the content (e.g. a status bar); the menu mirrors it
    /// in [`DragMode::Window`].
    pub fn set_content_top_inset(&self, inset: f32) {
        self.inner.borrow_mut().content_top_inset = inset;
    }

    /// Registers the single observer for `(old, new)` state transitions.
    pub fn set_state_listener(&self, listener: impl Fn(DrawerState, DrawerState) + 'static) {
        self.inner.borrow_mut().listener = Some(Rc::new(listener));
    }

    /// Registers the redraw/relayout hook, called whenever the offset
    /// changes.
    pub fn set_invalidate_hook(&self, hook: impl Fn() + 'static) {
        self.inner.borrow_mut().invalidate_hook = Some(Rc::new(hook));
    }

    /// Sets the view the indicator points at. `position` is matched
    /// against the anchor's tag on every frame.
    pub fn set_active_anchor(&self, anchor: Weak<dyn AnchorView>, position: i32) {
        let mut inner = self.inner.borrow_mut();
        inner.anchor = Some(anchor);
        inner.active_position = position;
    }

    /// Sets the indicator's natural size. Without one no indicator bounds
    /// are produced.
    pub fn set_indicator_size(&self, width: f32, height: f32) {
        self.inner.borrow_mut().indicator_size = Some((width, height));
    }

    pub fn state(&self) -> DrawerState {
        self.inner.borrow().state
    }

    /// Whether any of the menu is showing, independent of the transient
    /// sub-state.
    pub fn is_visible(&self) -> bool {
        self.inner.borrow().position.is_visible()
    }

    pub fn offset(&self) -> f32 {
        self.inner.borrow().position.offset()
    }

    pub fn open_fraction(&self) -> f32 {
        self.inner.borrow().position.open_fraction()
    }

    /// Opens the menu with the default animation.
    pub fn open(&self) {
        self.animate(true, 0.0);
    }

    /// Closes the menu with the default animation.
    pub fn close(&self) {
        self.animate(false, 0.0);
    }

    /// Toggles the menu, re-targeting a tween already in flight.
    pub fn toggle(&self) {
        match self.state() {
            DrawerState::Open | DrawerState::Opening => self.close(),
            DrawerState::Closed | DrawerState::Closing => self.open(),
            DrawerState::Dragging => {}
        }
    }

    /// Captures the drawer's persistable state.
    pub fn save_state(&self) -> SavedMenuState {
        SavedMenuState {
            menu_visible: self.inner.borrow().position.is_visible(),
        }
    }

    /// Restores a previously saved state: the offset snaps straight to the
    /// matching edge, no animation. Before the first layout pass the
    /// restore is deferred and applied by `set_bounds`.
    pub fn restore_state(&self, saved: SavedMenuState) {
        let (animator, hook, notification) = {
            let mut inner = self.inner.borrow_mut();
            inner.recognizer.reset();
            let animator = inner.animator.clone();

            if inner.position.menu_width() <= 0.0 {
                inner.pending_restore = Some(saved.menu_visible);
                (animator, None, None)
            } else {
                let target = if saved.menu_visible {
                    inner.position.menu_width()
                } else {
                    0.0
                };
                let changed = inner.position.set_offset(target);
                let notification = inner.set_state(if saved.menu_visible {
                    DrawerState::Open
                } else {
                    DrawerState::Closed
                });
                (
                    animator,
                    changed.then(|| inner.invalidate_hook.clone()).flatten(),
                    notification,
                )
            }
        };

        animator.cancel();
        self.run_effects(hook, notification);
    }

    /// Feeds one raw pointer sample. Returns true when the drawer captures
    /// the stream: while a drag is in progress, and for any touch landing
    /// on the content region while the menu is visible.
    pub fn handle_pointer(&self, sample: &PointerSample) -> bool {
        match sample.kind {
            PointerEventKind::Down => self.on_down(sample),
            PointerEventKind::Move => self.on_move(sample),
            PointerEventKind::Up | PointerEventKind::Cancel => self.on_end(sample),
        }
    }

    /// Derived draw values for the current frame.
    pub fn draw_metrics(&self) -> DrawMetrics {
        let inner = self.inner.borrow();
        let offset = inner.position.offset();
        let fraction = inner.position.open_fraction();
        let menu_width = inner.position.menu_width();
        let height = inner.height;

        let indicator = match (&inner.anchor, inner.indicator_size) {
            (Some(anchor), Some((width, indicator_height))) => indicator_bounds(
                anchor,
                inner.active_position,
                width,
                indicator_height,
                offset,
                fraction,
            ),
            _ => None,
        };

        DrawMetrics {
            offset,
            open_fraction: fraction,
            menu_visible: inner.position.is_visible(),
            overlay_alpha: (f32::from(MAX_OVERLAY_ALPHA) * (1.0 - fraction)) as u8,
            overlay_bounds: Rect::new(0.0, 0.0, offset, height),
            drop_shadow_bounds: Rect::new(offset - DROP_SHADOW_WIDTH, 0.0, DROP_SHADOW_WIDTH, height),
            menu_left: -0.25 * (menu_width - offset),
            menu_top_inset: if inner.drag_mode == DragMode::Window {
                inner.content_top_inset
            } else {
                0.0
            },
            indicator_bounds: indicator,
        }
    }

    fn on_down(&self, sample: &PointerSample) -> bool {
        let (animator, eligible, notification, captured) = {
            let mut inner = self.inner.borrow_mut();
            let x = sample.position.x;
            let visible = inner.position.is_visible();
            let offset = inner.position.offset();

            // A drag may only start from the bezel while closed, or from
            // the still-visible content region while open.
            let eligible = (!visible && x <= inner.bezel) || (visible && x >= offset);
            let notification = if eligible {
                // Freeze a running animation where it stands; the state
                // label snaps to the settled name for the current side.
                inner.set_state(if visible {
                    DrawerState::Open
                } else {
                    DrawerState::Closed
                })
            } else {
                None
            };

            let _ = inner.recognizer.on_pointer(sample, eligible);
            let animator = inner.animator.clone();
            (animator, eligible, notification, visible && x > offset)
        };

        if eligible {
            animator.cancel();
        }
        self.run_effects(None, notification);
        captured
    }

    fn on_move(&self, sample: &PointerSample) -> bool {
        let (animator, event) = {
            let mut inner = self.inner.borrow_mut();
            let event = inner.recognizer.on_pointer(sample, false);
            (inner.animator.clone(), event)
        };

        match event {
            DragEvent::DragStarted { delta } => {
                animator.cancel();
                self.transition(DrawerState::Dragging);
                self.offset_by(delta);
            }
            DragEvent::Dragged { delta } => self.offset_by(delta),
            _ => {}
        }

        self.is_captured(sample)
    }

    fn on_end(&self, sample: &PointerSample) -> bool {
        let (event, visible, offset, menu_width) = {
            let mut inner = self.inner.borrow_mut();
            let event = inner.recognizer.on_pointer(sample, false);
            (
                event,
                inner.position.is_visible(),
                inner.position.offset(),
                inner.position.menu_width(),
            )
        };

        match event {
            // A fling commits by direction: rightward opens.
            DragEvent::Flung { velocity } => self.animate(velocity > 0.0, velocity),
            // A tap on the content region while the menu is showing
            // closes it.
            DragEvent::Released { x } => {
                if visible && x > offset {
                    self.animate(false, 0.0);
                }
            }
            // A bare cancel snaps to whichever edge is closest.
            DragEvent::Cancelled { .. } => self.animate(offset > menu_width / 2.0, 0.0),
            _ => {}
        }

        self.is_captured(sample)
    }

    /// Starts (or snaps) a commit towards open or closed. Ends any live
    /// gesture session first; the animator cancels its own predecessor.
    fn animate(&self, open: bool, velocity: f32) {
        let (animator, start, target, span) = {
            let mut inner = self.inner.borrow_mut();
            inner.recognizer.reset();
            let span = inner.position.menu_width();
            let start = inner.position.offset();
            let target = if open { span } else { 0.0 };
            (inner.animator.clone(), start, target, span)
        };

        if start == target {
            // Already at the bound; no tween, the settled state derives
            // from the offset itself.
            animator.cancel();
            self.transition(if start == 0.0 {
                DrawerState::Closed
            } else {
                DrawerState::Open
            });
            return;
        }

        self.transition(if open {
            DrawerState::Opening
        } else {
            DrawerState::Closing
        });

        let frame_inner = Rc::downgrade(&self.inner);
        let settle_inner = Rc::downgrade(&self.inner);
        animator.start(
            start,
            target,
            velocity,
            span,
            move |offset| apply_offset(&frame_inner, offset),
            move |final_offset| settle(&settle_inner, final_offset),
        );
    }

    fn transition(&self, state: DrawerState) {
        let notification = self.inner.borrow_mut().set_state(state);
        self.run_effects(None, notification);
    }

    fn offset_by(&self, delta: f32) {
        let hook = {
            let mut inner = self.inner.borrow_mut();
            let next = inner.position.offset() + delta;
            let changed = inner.position.set_offset(next);
            changed.then(|| inner.invalidate_hook.clone()).flatten()
        };
        self.run_effects(hook, None);
    }

    fn is_captured(&self, sample: &PointerSample) -> bool {
        let inner = self.inner.borrow();
        inner.recognizer.is_dragging()
            || (inner.position.is_visible() && sample.position.x > inner.position.offset())
    }

    /// Fires collected side effects with no borrow held, so listeners may
    /// re-enter the drawer freely.
    fn run_effects(&self, hook: Option<InvalidateHook>, notification: Option<Notification>) {
        if let Some(hook) = hook {
            hook();
        }
        if let Some((listener, old, new)) = notification {
            listener(old, new);
        }
    }
}

fn apply_offset(inner: &Weak<RefCell<DrawerInner>>, offset: f32) {
    let Some(inner) = inner.upgrade() else {
        return;
    };
    let hook = {
        let mut guard = inner.borrow_mut();
        let changed = guard.position.set_offset(offset);
        changed.then(|| guard.invalidate_hook.clone()).flatten()
    };
    if let Some(hook) = hook {
        hook();
    }
}

fn settle(inner: &Weak<RefCell<DrawerInner>>, final_offset: f32) {
    let Some(inner) = inner.upgrade() else {
        return;
    };
    let (hook, notification) = {
        let mut guard = inner.borrow_mut();
        let changed = guard.position.set_offset(final_offset);
        let hook = changed.then(|| guard.invalidate_hook.clone()).flatten();
        let state = if guard.position.offset() == 0.0 {
            DrawerState::Closed
        } else {
            DrawerState::Open
        };
        (hook, guard.set_state(state))
    };
    if let Some(hook) = hook {
        hook();
    }
    if let Some((listener, old, new)) = notification {
        listener(old, new);
    }
}
