//! Anchored overlay placement: put a tooltip next to a target, flip it to the
//! opposite side when the preferred side would overflow, clamp it into the
//! viewport and derive where its arrow goes.

use floatkit_protocol::{Arrow, PlacementResult, Point, ScreenRect, Side, Size, ViewportMetrics};

use crate::config::PlacementConfig;
use crate::error::PlacementError;
use crate::geometry::{clamp_inset, clamp_rect, fits};
use crate::host::ElementRects;

#[derive(Debug, Clone, Copy, Default)]
pub struct Solver {
    config: PlacementConfig,
}

impl Solver {
    pub fn new(config: PlacementConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    /// Place a tooltip of size `tooltip` against `target`.
    ///
    /// Steps:
    /// 1. Anchor on the preferred side, centred on the target along the
    ///    perpendicular axis.
    /// 2. If that crosses the margin on the anchored side, flip once to the
    ///    opposite side. There is no second flip.
    /// 3. Clamp both axes into `[margin, viewport - size - margin]`. Axes that
    ///    cannot fit pin to `margin`.
    /// 4. Point the arrow at the target centre, kept `arrow_margin` away from
    ///    the tooltip's corners, on the tooltip edge facing the target.
    pub fn solve(
        &self,
        target: ScreenRect,
        tooltip: Size,
        preferred: Side,
        viewport: ViewportMetrics,
    ) -> PlacementResult {
        let PlacementConfig {
            offset,
            margin,
            arrow_margin,
        } = self.config;

        let preferred_origin = anchor(target, tooltip, preferred, offset);
        let (side, origin, flipped) =
            if overflows(preferred_origin, tooltip, preferred, viewport, margin) {
                let side = preferred.opposite();
                tracing::debug!(%preferred, flipped_to = %side, "tooltip overflows, flipping");
                (side, anchor(target, tooltip, side, offset), true)
            } else {
                (preferred, preferred_origin, false)
            };

        if !fits(tooltip.width, viewport.width, margin)
            || !fits(tooltip.height, viewport.height, margin)
        {
            tracing::debug!(
                tooltip_width = tooltip.width,
                tooltip_height = tooltip.height,
                viewport_width = viewport.width,
                viewport_height = viewport.height,
                "viewport smaller than tooltip plus margins, pinning to margin"
            );
        }

        let final_rect = clamp_rect(
            ScreenRect::from_origin_size(origin, tooltip),
            viewport,
            margin,
        );

        PlacementResult {
            final_rect,
            side,
            flipped,
            arrow: arrow_for(target, final_rect, side, arrow_margin),
        }
    }

    /// Look the target up through the host and place against it.
    pub fn place<R>(
        &self,
        rects: &R,
        target_id: &str,
        tooltip: Size,
        preferred: Side,
        viewport: ViewportMetrics,
    ) -> Result<PlacementResult, PlacementError>
    where
        R: ElementRects + ?Sized,
    {
        let Some(target) = rects.element_rect(target_id) else {
            tracing::debug!(target_id, "placement target not present");
            return Err(PlacementError::MissingTarget {
                id: target_id.to_string(),
            });
        };
        Ok(self.solve(target, tooltip, preferred, viewport))
    }
}

/// Unconstrained tooltip origin for `side`.
fn anchor(target: ScreenRect, tooltip: Size, side: Side, offset: f64) -> Point {
    let centre = target.center();
    match side {
        Side::Top => Point::new(
            centre.x - tooltip.width / 2.0,
            target.y - offset - tooltip.height,
        ),
        Side::Bottom => Point::new(centre.x - tooltip.width / 2.0, target.bottom() + offset),
        Side::Left => Point::new(
            target.x - offset - tooltip.width,
            centre.y - tooltip.height / 2.0,
        ),
        Side::Right => Point::new(target.right() + offset, centre.y - tooltip.height / 2.0),
    }
}

/// Whether a tooltip at `origin` crosses the margin on the side it was
/// anchored to. The perpendicular axis is left to the clamp.
fn overflows(
    origin: Point,
    tooltip: Size,
    side: Side,
    viewport: ViewportMetrics,
    margin: f64,
) -> bool {
    match side {
        Side::Top => origin.y < margin,
        Side::Bottom => origin.y + tooltip.height > viewport.height - margin,
        Side::Left => origin.x < margin,
        Side::Right => origin.x + tooltip.width > viewport.width - margin,
    }
}

fn arrow_for(target: ScreenRect, rect: ScreenRect, side: Side, arrow_margin: f64) -> Arrow {
    let centre = target.center();
    let (pos, len) = if side.is_vertical() {
        (centre.x - rect.x, rect.width)
    } else {
        (centre.y - rect.y, rect.height)
    };
    Arrow {
        side: side.opposite(),
        offset: clamp_inset(pos, len, arrow_margin),
    }
}
