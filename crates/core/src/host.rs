//! Seams through which the engine reads host state.
//!
//! The engine never subscribes to anything: it pulls geometry when a
//! computation starts and writes panel state back through a setter.

use std::collections::HashMap;

use floatkit_protocol::{PanelState, ScreenRect, ViewportMetrics};

/// Looks up the current bounding box of a live UI element.
pub trait ElementRects {
    fn element_rect(&self, id: &str) -> Option<ScreenRect>;
}

impl ElementRects for HashMap<String, ScreenRect> {
    fn element_rect(&self, id: &str) -> Option<ScreenRect> {
        self.get(id).copied()
    }
}

/// Adapts a lookup closure, for hosts that resolve ids on the fly.
pub struct RectLookup<F>(pub F);

impl<F> ElementRects for RectLookup<F>
where
    F: Fn(&str) -> Option<ScreenRect>,
{
    fn element_rect(&self, id: &str) -> Option<ScreenRect> {
        (self.0)(id)
    }
}

pub trait ViewportSource {
    fn viewport(&self) -> ViewportMetrics;
}

impl ViewportSource for ViewportMetrics {
    fn viewport(&self) -> ViewportMetrics {
        *self
    }
}

/// Caller-owned panel state: a read-modify-write getter/setter pair.
pub trait PanelStore {
    fn panel_state(&self) -> PanelState;
    fn set_panel_state(&mut self, state: PanelState);
}

/// A bare `PanelState` is its own in-memory store.
impl PanelStore for PanelState {
    fn panel_state(&self) -> PanelState {
        *self
    }

    fn set_panel_state(&mut self, state: PanelState) {
        *self = state;
    }
}
