//! Sidle: a sliding menu drawer controller.
//!
//! A menu panel hides behind a content panel; the user reveals it by
//! dragging from the left edge (or programmatically via
//! [`MenuDrawer::open`]) and it animates open or closed with a
//! physics-like settle. The crate is headless: the host feeds layout
//! bounds and raw pointer samples in, implements the tick scheduler its
//! event loop provides, and reads derived draw values each frame.

mod draw;
mod drawer;
mod indicator;
mod position;
mod state;

pub use draw::{DrawMetrics, DROP_SHADOW_WIDTH, MAX_OVERLAY_ALPHA};
pub use drawer::{DragMode, MenuDrawer, SavedMenuState};
pub use indicator::AnchorView;
pub use position::ContentPosition;
pub use state::DrawerState;
