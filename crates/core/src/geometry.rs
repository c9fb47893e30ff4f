//! Clamping helpers shared by the placement solver and the panel controller.

use floatkit_protocol::{ScreenRect, ViewportMetrics};

/// Clamp the start of a span of length `len` into
/// `[margin, extent - len - margin]`.
///
/// When the span cannot fit (`len + 2 * margin > extent`) the start is
/// pinned to `margin` and the span overflows the far edge. A NaN extent or
/// length counts as not fitting.
pub fn clamp_span(start: f64, len: f64, extent: f64, margin: f64) -> f64 {
    let hi = extent - len - margin;
    if hi.is_nan() || hi < margin {
        margin
    } else {
        start.clamp(margin, hi)
    }
}

/// Whether a span of length `len` fits inside `extent` with `margin` on both
/// ends.
pub fn fits(len: f64, extent: f64, margin: f64) -> bool {
    len + 2.0 * margin <= extent
}

/// Clamp both axes of `rect` independently into the viewport, keeping `margin`
/// from every edge. Size is preserved.
pub fn clamp_rect(rect: ScreenRect, viewport: ViewportMetrics, margin: f64) -> ScreenRect {
    ScreenRect {
        x: clamp_span(rect.x, rect.width, viewport.width, margin),
        y: clamp_span(rect.y, rect.height, viewport.height, margin),
        ..rect
    }
}

/// Clamp a position along an edge of length `len` into `[inset, len - inset]`.
/// Edges shorter than `2 * inset`, or of NaN length, get the midpoint.
pub fn clamp_inset(pos: f64, len: f64, inset: f64) -> f64 {
    if len.is_nan() || len < 2.0 * inset {
        len / 2.0
    } else {
        pos.clamp(inset, len - inset)
    }
}
