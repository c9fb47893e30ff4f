use serde::{Deserialize, Serialize};

use crate::types::{Point, ScreenRect, Size};

/// Position and size of a floating panel (notes surface, countdown indicator).
///
/// Owned and persisted by the hosting feature. Serializes as the flat record
/// `{"position":{"x":..,"y":..},"size":{"width":..,"height":..}}` so it can
/// go through any generic key/value persistence without engine involvement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelState {
    pub position: Point,
    pub size: Size,
}

impl PanelState {
    pub fn new(position: Point, size: Size) -> Self {
        Self { position, size }
    }

    pub fn rect(&self) -> ScreenRect {
        ScreenRect::from_origin_size(self.position, self.size)
    }

    #[must_use]
    pub fn with_position(self, position: Point) -> Self {
        Self { position, ..self }
    }

    #[must_use]
    pub fn with_size(self, size: Size) -> Self {
        Self { size, ..self }
    }
}
