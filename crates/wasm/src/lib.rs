use std::sync::{Mutex, MutexGuard};

use floatkit_core::{EngineConfig, PanelController, PointerEvent, Solver};
use floatkit_protocol::placement::UnknownSide;
use floatkit_protocol::{PanelState, Point, ScreenRect, Side, Size, ViewportMetrics};
use wasm_bindgen::prelude::*;

static CONFIG: Mutex<Option<EngineConfig>> = Mutex::new(None);
static PANELS: Mutex<Vec<Option<Panel>>> = Mutex::new(Vec::new());

struct Panel {
    controller: PanelController,
    state: PanelState,
}

#[derive(Debug, thiserror::Error)]
enum BridgeError {
    #[error(transparent)]
    Engine(#[from] floatkit_core::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Side(#[from] UnknownSide),
    #[error("invalid panel handle {0}")]
    UnknownHandle(usize),
    #[error("engine state lock poisoned")]
    Poisoned,
}

fn config() -> Result<EngineConfig, BridgeError> {
    let guard = CONFIG.lock().map_err(|_| BridgeError::Poisoned)?;
    Ok(guard.unwrap_or_default())
}

fn panels() -> Result<MutexGuard<'static, Vec<Option<Panel>>>, BridgeError> {
    PANELS.lock().map_err(|_| BridgeError::Poisoned)
}

fn with_panel<T>(
    handle: usize,
    f: impl FnOnce(&mut Panel) -> Result<T, BridgeError>,
) -> Result<T, BridgeError> {
    let mut panels = panels()?;
    let panel = panels
        .get_mut(handle)
        .and_then(Option::as_mut)
        .ok_or(BridgeError::UnknownHandle(handle))?;
    f(panel)
}

fn pointer_event(x: f64, y: f64, interactive: bool) -> PointerEvent {
    let p = Point::new(x, y);
    if interactive {
        PointerEvent::on_interactive(p)
    } else {
        PointerEvent::on_handle(p)
    }
}

fn configure_inner(config_json: &str) -> Result<(), BridgeError> {
    let config = EngineConfig::from_json(config_json).map_err(floatkit_core::Error::from)?;
    *CONFIG.lock().map_err(|_| BridgeError::Poisoned)? = Some(config);
    Ok(())
}

fn place_tooltip_inner(
    target_json: &str,
    tooltip: Size,
    side: &str,
    viewport: ViewportMetrics,
) -> Result<String, BridgeError> {
    let target: ScreenRect = serde_json::from_str(target_json)?;
    let preferred: Side = side.parse()?;
    let solver = Solver::new(config()?.placement);
    let result = solver.solve(target, tooltip, preferred, viewport);
    Ok(serde_json::to_string(&result)?)
}

fn create_panel_inner(state_json: &str) -> Result<usize, BridgeError> {
    let state: PanelState = serde_json::from_str(state_json)?;
    let controller = PanelController::new(config()?.panel);
    let state = controller.normalize(state);
    let mut panels = panels()?;
    let handle = panels.len();
    panels.push(Some(Panel { controller, state }));
    Ok(handle)
}

fn pointer_move_inner(
    handle: usize,
    pointer: Point,
    viewport: ViewportMetrics,
) -> Result<Option<String>, BridgeError> {
    with_panel(handle, |panel| {
        panel
            .controller
            .pointer_move(pointer, viewport, &mut panel.state)
            .map(|state| serde_json::to_string(&state))
            .transpose()
            .map_err(BridgeError::from)
    })
}

fn panel_state_inner(handle: usize) -> Result<String, BridgeError> {
    with_panel(handle, |panel| Ok(serde_json::to_string(&panel.state)?))
}

/// Replace the engine configuration used by later calls. Panels created
/// earlier keep the settings they were created with.
#[wasm_bindgen]
pub fn configure(config_json: &str) -> Result<(), JsError> {
    Ok(configure_inner(config_json)?)
}

/// Place a tooltip of the given size next to `target_json` (a `ScreenRect`),
/// returning the `PlacementResult` as JSON.
#[wasm_bindgen]
pub fn place_tooltip(
    target_json: &str,
    tooltip_width: f64,
    tooltip_height: f64,
    side: &str,
    viewport_width: f64,
    viewport_height: f64,
) -> Result<String, JsError> {
    Ok(place_tooltip_inner(
        target_json,
        Size::new(tooltip_width, tooltip_height),
        side,
        ViewportMetrics::new(viewport_width, viewport_height),
    )?)
}

/// Register a panel from its persisted state. Returns a handle for later use.
#[wasm_bindgen]
pub fn create_panel(state_json: &str) -> Result<usize, JsError> {
    Ok(create_panel_inner(state_json)?)
}

/// Drop a panel, ending any session it still has open.
#[wasm_bindgen]
pub fn release_panel(handle: usize) -> Result<(), JsError> {
    let mut panels = panels()?;
    let slot = panels
        .get_mut(handle)
        .ok_or(BridgeError::UnknownHandle(handle))?;
    *slot = None;
    Ok(())
}

/// Pointer-down on the panel header. `interactive` marks presses on buttons
/// or inputs inside the header, which never start a drag.
#[wasm_bindgen]
pub fn begin_drag(handle: usize, x: f64, y: f64, interactive: bool) -> Result<bool, JsError> {
    Ok(with_panel(handle, |panel| {
        let position = panel.state.position;
        Ok(panel
            .controller
            .begin_drag(pointer_event(x, y, interactive), position)
            .is_started())
    })?)
}

#[wasm_bindgen]
pub fn begin_resize(handle: usize, x: f64, y: f64, interactive: bool) -> Result<bool, JsError> {
    Ok(with_panel(handle, |panel| {
        let size = panel.state.size;
        Ok(panel
            .controller
            .begin_resize(pointer_event(x, y, interactive), size)
            .is_started())
    })?)
}

/// Returns the updated `PanelState` as JSON, or `undefined` when no session
/// is active.
#[wasm_bindgen]
pub fn pointer_move(
    handle: usize,
    x: f64,
    y: f64,
    viewport_width: f64,
    viewport_height: f64,
) -> Result<Option<String>, JsError> {
    Ok(pointer_move_inner(
        handle,
        Point::new(x, y),
        ViewportMetrics::new(viewport_width, viewport_height),
    )?)
}

/// Pointer-up or cancel. Returns whether a session was actually ended.
#[wasm_bindgen]
pub fn end_session(handle: usize) -> Result<bool, JsError> {
    Ok(with_panel(handle, |panel| {
        Ok(panel.controller.end_session().is_some())
    })?)
}

#[wasm_bindgen]
pub fn panel_state(handle: usize) -> Result<String, JsError> {
    Ok(panel_state_inner(handle)?)
}

#[cfg(test)]
mod tests {
    use floatkit_protocol::PlacementResult;

    use super::*;

    #[test]
    fn places_scenario_a_below_target() {
        let json = place_tooltip_inner(
            r#"{"x":500,"y":10,"width":40,"height":40}"#,
            Size::new(300.0, 150.0),
            "top",
            ViewportMetrics::new(800.0, 600.0),
        )
        .expect("failed to place tooltip");
        let result: PlacementResult =
            serde_json::from_str(&json).expect("failed to parse placement");
        assert_eq!(result.side, Side::Bottom);
        assert!(result.flipped);
        assert_eq!(result.arrow.side, Side::Top);
    }

    #[test]
    fn rejects_unknown_side() {
        let err = place_tooltip_inner(
            r#"{"x":0,"y":0,"width":10,"height":10}"#,
            Size::new(10.0, 10.0),
            "diagonal",
            ViewportMetrics::new(800.0, 600.0),
        )
        .unwrap_err();
        assert!(matches!(err, BridgeError::Side(_)));
    }

    #[test]
    fn drag_session_through_handle() {
        let handle = create_panel_inner(
            r#"{"position":{"x":100,"y":100},"size":{"width":300,"height":200}}"#,
        )
        .expect("failed to create panel");
        let viewport = ViewportMetrics::new(1280.0, 800.0);
        with_panel(handle, |panel| {
            Ok(panel
                .controller
                .begin_drag(PointerEvent::on_handle(Point::new(150.0, 150.0)), panel.state.position))
        })
        .expect("failed to begin drag");
        let moved = pointer_move_inner(handle, Point::new(170.0, 130.0), viewport)
            .expect("pointer move failed")
            .expect("drag session should move the panel");
        let state: PanelState = serde_json::from_str(&moved).expect("failed to parse panel state");
        assert_eq!(state.position, Point::new(120.0, 80.0));

        let ended = with_panel(handle, |p| Ok(p.controller.end_session()))
            .expect("failed to end session");
        assert!(ended.is_some());
        assert_eq!(
            pointer_move_inner(handle, Point::new(400.0, 400.0), viewport)
                .expect("pointer move failed"),
            None
        );
    }

    #[test]
    fn unknown_handle_is_an_error() {
        assert!(matches!(
            panel_state_inner(usize::MAX),
            Err(BridgeError::UnknownHandle(_))
        ));
    }

    #[test]
    fn invalid_config_is_not_stored() {
        let err = configure_inner(r#"{"placement":{"margin":-4}}"#).unwrap_err();
        assert!(matches!(err, BridgeError::Engine(_)));
    }

    #[test]
    fn nan_pointer_keeps_registry_usable() {
        let handle = create_panel_inner(
            r#"{"position":{"x":10,"y":10},"size":{"width":300,"height":200}}"#,
        )
        .expect("failed to create panel");
        with_panel(handle, |panel| {
            Ok(panel
                .controller
                .begin_drag(PointerEvent::on_handle(Point::new(20.0, 20.0)), panel.state.position))
        })
        .expect("failed to begin drag");
        let viewport = ViewportMetrics::new(f64::NAN, 800.0);
        pointer_move_inner(handle, Point::new(f64::NAN, 40.0), viewport)
            .expect("pointer move failed");
        assert!(panel_state_inner(handle).is_ok());
    }

    #[test]
    fn bridge_errors_are_std_errors() {
        fn assert_error<E: std::error::Error>(_: &E) {}
        assert_error(&BridgeError::UnknownHandle(3));
    }
}
