use serde::{Deserialize, Serialize};

use crate::placement::Side;
use crate::shared_str::SharedStr;
use crate::theme::ThemeToken;
use crate::types::{Point, ScreenRect};

/// A single, stateless draw instruction for a floating panel or tour overlay.
///
/// The core emits a `Vec<RenderCommand>` per overlay; host renderers consume
/// the list in order, each command carrying everything it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderCommand {
    /// Filled rectangle with an optional border.
    DrawRect {
        rect: ScreenRect,
        color: ThemeToken,
        border_color: Option<ThemeToken>,
    },

    /// Border-only rectangle (target spotlight).
    StrokeRect {
        rect: ScreenRect,
        color: ThemeToken,
        width: f64,
    },

    /// Text anchored at its top-left corner, cut off at `max_width`.
    DrawText {
        position: Point,
        text: SharedStr,
        color: ThemeToken,
        max_width: f64,
    },

    /// Tooltip pointer. `tip` lies on the tooltip edge named by `side` and
    /// the arrow points outward from that edge, toward the target.
    DrawArrow {
        tip: Point,
        side: Side,
        size: f64,
        color: ThemeToken,
    },

    /// Begin a logical group (one panel or one overlay).
    BeginGroup {
        id: SharedStr,
        label: Option<SharedStr>,
    },

    EndGroup,
}
