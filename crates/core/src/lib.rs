//! Floating-UI positioning engine.
//!
//! Two subsystems share one contract, "keep a rectangle visible and attached
//! to something":
//!
//! - [`panel::PanelController`] moves and resizes a single floating panel
//!   through pointer sessions.
//! - [`placement::Solver`] anchors a tooltip to a target, flipping and
//!   clamping it into the viewport; [`tour::Tour`] drives it step by step.
//!
//! ```text
//!   host geometry ──▶ Solver / PanelController ──▶ PlacementResult / PanelState
//!   (ElementRects,                                        │
//!    ViewportMetrics)                                     ▼
//!                                    views::* ──▶ RenderCommand[] ──▶ host renderer
//! ```

pub mod config;
pub mod error;
pub mod geometry;
pub mod host;
pub mod panel;
pub mod placement;
pub mod tour;
pub mod views;

pub use config::{DragBounds, EngineConfig, PanelConfig, PlacementConfig, TourConfig};
pub use error::{Error, PlacementError};
pub use panel::{PanelController, PointerEvent, SessionKind, SessionStart};
pub use placement::Solver;
pub use tour::{OverlayState, Tour, TourStatus, TourStep, TourTransition};
