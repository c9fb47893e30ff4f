//! End-to-end scenarios: a tour step flipping under the top edge, a notes
//! panel dragged and resized through a full pointer session, and tour
//! effects applied by a host across a layout switch.

use std::collections::HashMap;

use floatkit_core::panel::{PanelController, PointerEvent, SessionKind};
use floatkit_core::{EngineConfig, OverlayState, Solver, Tour, TourStep};
use floatkit_protocol::{PanelState, Point, ScreenRect, Side, Size, ViewportMetrics};

#[test]
fn tooltip_under_top_edge_flips_below_target() {
    let solver = Solver::new(EngineConfig::default().placement);
    let target = ScreenRect::new(500.0, 10.0, 40.0, 40.0);
    let result = solver.solve(
        target,
        Size::new(300.0, 150.0),
        Side::Top,
        ViewportMetrics::new(800.0, 600.0),
    );

    assert_eq!(result.side, Side::Bottom);
    assert_eq!(result.arrow.side, Side::Top);
    assert!((370.0..=470.0).contains(&result.final_rect.x));
    assert!(result.final_rect.y > target.bottom());
    assert_eq!(result.final_rect.y - target.bottom(), solver.config().offset);
}

#[test]
fn drag_session_from_header() {
    let mut controller = PanelController::default();
    let mut state = PanelState::new(Point::new(100.0, 100.0), Size::new(320.0, 240.0));
    let viewport = ViewportMetrics::new(1280.0, 800.0);

    let start = controller.begin_drag(
        PointerEvent::on_handle(Point::new(150.0, 150.0)),
        state.position,
    );
    assert!(start.is_started());
    controller.pointer_move(Point::new(170.0, 130.0), viewport, &mut state);
    assert_eq!(controller.end_session(), Some(SessionKind::Drag));

    assert_eq!(state.position, Point::new(120.0, 80.0));

    // Pointer-up arriving twice (e.g. after the handle was left) is harmless.
    assert_eq!(controller.end_session(), None);
    assert_eq!(
        controller.pointer_move(Point::new(999.0, 999.0), viewport, &mut state),
        None
    );
    assert_eq!(state.position, Point::new(120.0, 80.0));
}

#[test]
fn persisted_state_survives_a_session() {
    let mut controller = PanelController::default();
    let raw = r#"{"position":{"x":40,"y":60},"size":{"width":260,"height":180}}"#;
    let mut state: PanelState = serde_json::from_str(raw).expect("failed to parse panel state");

    controller.begin_resize(
        PointerEvent::on_handle(Point::new(300.0, 240.0)),
        state.size,
    );
    controller.pointer_move(
        Point::new(340.0, 200.0),
        ViewportMetrics::new(1280.0, 800.0),
        &mut state,
    );
    controller.end_session();

    let saved = serde_json::to_string(&state).expect("failed to serialize panel state");
    let reloaded: PanelState = serde_json::from_str(&saved).expect("failed to parse saved state");
    assert_eq!(
        reloaded,
        PanelState::new(Point::new(40.0, 60.0), Size::new(300.0, 150.0))
    );
}

#[test]
fn dropping_controller_mid_session_is_clean() {
    let mut state = PanelState::new(Point::new(10.0, 10.0), Size::new(200.0, 150.0));
    {
        let mut controller = PanelController::default();
        controller.begin_drag(PointerEvent::on_handle(Point::new(20.0, 20.0)), state.position);
        controller.pointer_move(
            Point::new(30.0, 30.0),
            ViewportMetrics::new(800.0, 600.0),
            &mut state,
        );
    }
    assert_eq!(state.position, Point::new(20.0, 20.0));
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Layout {
    Single,
    Split,
}

/// Host stand-in: the notes tab only exists in the split layout.
struct Host {
    layout: Layout,
}

impl Host {
    fn apply(&mut self, effects: &[Layout]) {
        for effect in effects {
            self.layout = *effect;
        }
    }

    fn rects(&self) -> HashMap<String, ScreenRect> {
        let mut rects = HashMap::new();
        rects.insert(
            "editor".to_string(),
            ScreenRect::new(40.0, 80.0, 500.0, 400.0),
        );
        if self.layout == Layout::Split {
            rects.insert(
                "notes-tab".to_string(),
                ScreenRect::new(560.0, 80.0, 80.0, 24.0),
            );
        }
        rects
    }
}

#[test]
fn tour_effects_make_the_target_measurable() {
    let solver = Solver::default();
    let viewport = ViewportMetrics::new(800.0, 600.0);
    let tooltip = Size::new(220.0, 90.0);
    let mut host = Host {
        layout: Layout::Single,
    };
    let mut tour = Tour::new(vec![
        TourStep::new("editor", "Editor", "Write here.", Side::Right),
        TourStep::new("notes-tab", "Notes", "Notes open beside the page.", Side::Bottom)
            .with_before(Layout::Split)
            .with_after(Layout::Single),
    ]);

    host.apply(&tour.start().effects);
    tour.measure(&solver, &host.rects(), tooltip, viewport);
    assert!(tour.current_placement().is_some());

    // Without applying the before-effect the target would be missing.
    let transition = tour.advance();
    assert!(tour.needs_measure());
    assert_eq!(
        tour.clone().measure(&solver, &host.rects(), tooltip, viewport),
        &OverlayState::Hidden(floatkit_core::PlacementError::MissingTarget {
            id: "notes-tab".into()
        })
    );

    host.apply(&transition.effects);
    assert_eq!(host.layout, Layout::Split);
    tour.measure(&solver, &host.rects(), tooltip, viewport);
    assert_eq!(tour.current_placement().map(|p| p.side), Some(Side::Bottom));

    host.apply(&tour.end().effects);
    assert_eq!(host.layout, Layout::Single);
}
