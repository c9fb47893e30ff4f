//! Movable, resizable floating panels.
//!
//! A [`PanelController`] owns at most one pointer session at a time. Hosts
//! forward pointer-down over a handle to [`PanelController::begin_drag`] or
//! [`PanelController::begin_resize`], every pointer move to
//! [`PanelController::pointer_move`], and pointer-up (wherever it lands) to
//! [`PanelController::end_session`].
//!
//! ```text
//! Idle --begin_drag/begin_resize--> Active --end_session--> Idle
//!   ^                                 |
//!   +----------- drop ----------------+
//! ```

use floatkit_protocol::{PanelState, Point, Size, ViewportMetrics};
use serde::{Deserialize, Serialize};

use crate::config::{DragBounds, PanelConfig};
use crate::geometry::clamp_span;
use crate::host::PanelStore;

/// What the pointer went down on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerTarget {
    /// A drag handle: header strip, resize grip, or a panel that is all handle.
    Handle,
    /// A child with its own click handling (tab, button).
    Interactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub position: Point,
    pub target: PointerTarget,
}

impl PointerEvent {
    pub fn on_handle(position: Point) -> Self {
        Self {
            position,
            target: PointerTarget::Handle,
        }
    }

    pub fn on_interactive(position: Point) -> Self {
        Self {
            position,
            target: PointerTarget::Interactive,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    Drag,
    Resize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuppressReason {
    InteractiveChild,
    SessionAlreadyActive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum SessionStart {
    Started(SessionKind),
    Suppressed(SuppressReason),
}

impl SessionStart {
    pub fn is_started(self) -> bool {
        matches!(self, SessionStart::Started(_))
    }
}

/// Where a point falls on a panel, used to route pointer-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelRegion {
    Header,
    ResizeGrip,
    Body,
    Outside,
}

/// Snapshot taken at pointer-down. Only the start values are kept; the
/// current panel state is re-read from the store on every move.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Session {
    Drag {
        start_pointer: Point,
        start_position: Point,
    },
    Resize {
        start_pointer: Point,
        start_size: Size,
    },
}

impl Session {
    fn kind(&self) -> SessionKind {
        match self {
            Session::Drag { .. } => SessionKind::Drag,
            Session::Resize { .. } => SessionKind::Resize,
        }
    }
}

#[derive(Debug)]
pub struct PanelController {
    config: PanelConfig,
    session: Option<Session>,
}

impl PanelController {
    pub fn new(config: PanelConfig) -> Self {
        Self {
            config,
            session: None,
        }
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    pub fn active_session(&self) -> Option<SessionKind> {
        self.session.as_ref().map(Session::kind)
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Start moving the panel. Subsequent moves place it at
    /// `current_position + (pointer - event.position)`, so pressing anywhere
    /// on the header never makes the panel jump.
    pub fn begin_drag(&mut self, event: PointerEvent, current_position: Point) -> SessionStart {
        self.install(
            event,
            Session::Drag {
                start_pointer: event.position,
                start_position: current_position,
            },
        )
    }

    /// Start resizing the panel from its bottom-right corner.
    pub fn begin_resize(&mut self, event: PointerEvent, current_size: Size) -> SessionStart {
        self.install(
            event,
            Session::Resize {
                start_pointer: event.position,
                start_size: current_size,
            },
        )
    }

    fn install(&mut self, event: PointerEvent, session: Session) -> SessionStart {
        if event.target == PointerTarget::Interactive {
            return SessionStart::Suppressed(SuppressReason::InteractiveChild);
        }
        if let Some(active) = &self.session {
            tracing::debug!(active = ?active.kind(), "panel session already active");
            return SessionStart::Suppressed(SuppressReason::SessionAlreadyActive);
        }
        let kind = session.kind();
        tracing::debug!(?kind, x = event.position.x, y = event.position.y, "panel session started");
        self.session = Some(session);
        SessionStart::Started(kind)
    }

    /// Apply one pointer move. Writes the new state to `store` exactly once
    /// and returns it; without an active session nothing is written.
    pub fn pointer_move<S>(
        &mut self,
        pointer: Point,
        viewport: ViewportMetrics,
        store: &mut S,
    ) -> Option<PanelState>
    where
        S: PanelStore + ?Sized,
    {
        let session = self.session?;
        let current = store.panel_state();
        let next = match session {
            Session::Drag {
                start_pointer,
                start_position,
            } => {
                let position = start_position + (pointer - start_pointer);
                let floored = self.normalize(current.with_position(position));
                self.bound_position(floored, viewport)
            }
            Session::Resize {
                start_pointer,
                start_size,
            } => {
                let delta = pointer - start_pointer;
                current.with_size(self.floor_size(Size::new(
                    start_size.width + delta.x,
                    start_size.height + delta.y,
                )))
            }
        };
        store.set_panel_state(next);
        Some(next)
    }

    /// Tear down the active session. Safe to call any number of times; only
    /// the first call after a `begin_*` returns the ended kind.
    pub fn end_session(&mut self) -> Option<SessionKind> {
        let ended = self.session.take().map(|s| s.kind());
        if let Some(kind) = ended {
            tracing::debug!(?kind, "panel session ended");
        }
        ended
    }

    pub fn hit_test(&self, panel: &PanelState, point: Point) -> PanelRegion {
        let rect = panel.rect();
        if !rect.contains(point) {
            return PanelRegion::Outside;
        }
        let grip = self.config.grip_size;
        if point.x >= rect.right() - grip && point.y >= rect.bottom() - grip {
            PanelRegion::ResizeGrip
        } else if point.y < rect.y + self.config.header_height {
            PanelRegion::Header
        } else {
            PanelRegion::Body
        }
    }

    /// Re-apply the drag-bounds policy, e.g. after the viewport shrank.
    pub fn clamp_into_viewport(&self, state: PanelState, viewport: ViewportMetrics) -> PanelState {
        self.bound_position(state, viewport)
    }

    /// Enforce the minimum size on state read back from persistence.
    pub fn normalize(&self, state: PanelState) -> PanelState {
        state.with_size(self.floor_size(state.size))
    }

    fn floor_size(&self, size: Size) -> Size {
        Size::new(
            size.width.max(self.config.min_width),
            size.height.max(self.config.min_height),
        )
    }

    fn bound_position(&self, state: PanelState, viewport: ViewportMetrics) -> PanelState {
        match self.config.drag_bounds {
            DragBounds::Unbounded => state,
            DragBounds::Viewport => state.with_position(Point::new(
                clamp_span(state.position.x, state.size.width, viewport.width, 0.0),
                clamp_span(state.position.y, state.size.height, viewport.height, 0.0),
            )),
        }
    }
}

impl Default for PanelController {
    fn default() -> Self {
        Self::new(PanelConfig::default())
    }
}

/// Unmounting the panel tears down any session still in flight.
impl Drop for PanelController {
    fn drop(&mut self) {
        self.end_session();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> ViewportMetrics {
        ViewportMetrics::new(1280.0, 800.0)
    }

    fn notes_panel() -> PanelState {
        PanelState::new(Point::new(100.0, 100.0), Size::new(320.0, 240.0))
    }

    #[test]
    fn drag_applies_pointer_delta() {
        let mut controller = PanelController::default();
        let mut state = notes_panel();

        let start = controller.begin_drag(
            PointerEvent::on_handle(Point::new(150.0, 150.0)),
            state.position,
        );
        assert_eq!(start, SessionStart::Started(SessionKind::Drag));

        let moved = controller.pointer_move(Point::new(170.0, 130.0), viewport(), &mut state);
        assert_eq!(moved.map(|s| s.position), Some(Point::new(120.0, 80.0)));
        assert_eq!(state.position, Point::new(120.0, 80.0));
        assert_eq!(state.size, Size::new(320.0, 240.0));
    }

    #[test]
    fn moves_are_relative_to_session_start() {
        let mut controller = PanelController::default();
        let mut state = notes_panel();
        controller.begin_drag(
            PointerEvent::on_handle(Point::new(150.0, 150.0)),
            state.position,
        );
        controller.pointer_move(Point::new(400.0, 400.0), viewport(), &mut state);
        controller.pointer_move(Point::new(160.0, 155.0), viewport(), &mut state);
        assert_eq!(state.position, Point::new(110.0, 105.0));
    }

    #[test]
    fn interactive_child_suppresses_drag() {
        let mut controller = PanelController::default();
        let mut state = notes_panel();
        let start = controller.begin_drag(
            PointerEvent::on_interactive(Point::new(120.0, 110.0)),
            state.position,
        );
        assert_eq!(
            start,
            SessionStart::Suppressed(SuppressReason::InteractiveChild)
        );
        assert!(!controller.is_active());
        assert_eq!(
            controller.pointer_move(Point::new(300.0, 300.0), viewport(), &mut state),
            None
        );
        assert_eq!(state, notes_panel());
    }

    #[test]
    fn second_session_is_refused() {
        let mut controller = PanelController::default();
        let state = notes_panel();
        controller.begin_drag(PointerEvent::on_handle(Point::new(150.0, 110.0)), state.position);
        let second =
            controller.begin_resize(PointerEvent::on_handle(Point::new(410.0, 330.0)), state.size);
        assert_eq!(
            second,
            SessionStart::Suppressed(SuppressReason::SessionAlreadyActive)
        );
        assert_eq!(controller.active_session(), Some(SessionKind::Drag));
    }

    #[test]
    fn resize_adds_delta_to_size() {
        let mut controller = PanelController::default();
        let mut state = notes_panel();
        controller.begin_resize(PointerEvent::on_handle(Point::new(410.0, 330.0)), state.size);
        controller.pointer_move(Point::new(450.0, 300.0), viewport(), &mut state);
        assert_eq!(state.size, Size::new(360.0, 210.0));
        assert_eq!(state.position, Point::new(100.0, 100.0));
    }

    #[test]
    fn resize_is_floored_at_minimum() {
        let mut controller = PanelController::default();
        let mut state = notes_panel();
        controller.begin_resize(PointerEvent::on_handle(Point::new(410.0, 330.0)), state.size);
        controller.pointer_move(Point::new(-5000.0, -5000.0), viewport(), &mut state);
        assert_eq!(state.size, Size::new(200.0, 150.0));
    }

    #[test]
    fn resize_is_not_clamped_to_viewport() {
        let mut controller = PanelController::default();
        let mut state = notes_panel();
        controller.begin_resize(PointerEvent::on_handle(Point::new(410.0, 330.0)), state.size);
        controller.pointer_move(Point::new(3000.0, 330.0), viewport(), &mut state);
        assert_eq!(state.size.width, 320.0 + 2590.0);
    }

    #[test]
    fn end_session_is_idempotent() {
        let mut controller = PanelController::default();
        controller.begin_drag(PointerEvent::on_handle(Point::new(1.0, 1.0)), Point::ORIGIN);
        assert_eq!(controller.end_session(), Some(SessionKind::Drag));
        assert_eq!(controller.end_session(), None);
        assert!(!controller.is_active());
    }

    #[test]
    fn end_without_session_is_a_noop() {
        let mut controller = PanelController::default();
        assert_eq!(controller.end_session(), None);
    }

    #[test]
    fn new_session_after_teardown() {
        let mut controller = PanelController::default();
        let state = notes_panel();
        controller.begin_drag(PointerEvent::on_handle(Point::new(150.0, 110.0)), state.position);
        controller.end_session();
        let start =
            controller.begin_resize(PointerEvent::on_handle(Point::new(410.0, 330.0)), state.size);
        assert!(start.is_started());
    }

    #[test]
    fn drag_is_clamped_to_viewport_by_default() {
        let mut controller = PanelController::default();
        let mut state = notes_panel();
        controller.begin_drag(PointerEvent::on_handle(Point::new(150.0, 110.0)), state.position);
        controller.pointer_move(Point::new(-500.0, 5000.0), viewport(), &mut state);
        assert_eq!(state.position, Point::new(0.0, 800.0 - 240.0));
    }

    #[test]
    fn unbounded_drag_can_leave_the_screen() {
        let mut controller = PanelController::new(PanelConfig {
            drag_bounds: DragBounds::Unbounded,
            ..PanelConfig::default()
        });
        let mut state = notes_panel();
        controller.begin_drag(PointerEvent::on_handle(Point::new(150.0, 110.0)), state.position);
        controller.pointer_move(Point::new(-500.0, 110.0), viewport(), &mut state);
        assert_eq!(state.position, Point::new(-550.0, 100.0));
    }

    #[test]
    fn hit_test_regions() {
        let controller = PanelController::default();
        let panel = notes_panel();
        assert_eq!(
            controller.hit_test(&panel, Point::new(200.0, 110.0)),
            PanelRegion::Header
        );
        assert_eq!(
            controller.hit_test(&panel, Point::new(415.0, 335.0)),
            PanelRegion::ResizeGrip
        );
        assert_eq!(
            controller.hit_test(&panel, Point::new(200.0, 200.0)),
            PanelRegion::Body
        );
        assert_eq!(
            controller.hit_test(&panel, Point::new(50.0, 50.0)),
            PanelRegion::Outside
        );
    }

    #[test]
    fn clamp_after_viewport_shrink() {
        let controller = PanelController::default();
        let state = PanelState::new(Point::new(1100.0, 700.0), Size::new(200.0, 150.0));
        let clamped = controller.clamp_into_viewport(state, ViewportMetrics::new(1024.0, 768.0));
        assert_eq!(clamped.position, Point::new(824.0, 618.0));
    }

    #[test]
    fn normalize_restores_minimum_size() {
        let controller = PanelController::default();
        let state = PanelState::new(Point::ORIGIN, Size::new(10.0, 400.0));
        assert_eq!(controller.normalize(state).size, Size::new(200.0, 400.0));
    }

    #[test]
    fn drag_floors_undersized_stored_state() {
        let mut controller = PanelController::default();
        let mut state = PanelState::new(Point::new(50.0, 50.0), Size::new(40.0, 20.0));
        controller.begin_drag(PointerEvent::on_handle(Point::new(60.0, 60.0)), state.position);
        controller.pointer_move(Point::new(70.0, 70.0), viewport(), &mut state);
        assert_eq!(state.position, Point::new(60.0, 60.0));
        assert_eq!(state.size, Size::new(200.0, 150.0));
    }
}
