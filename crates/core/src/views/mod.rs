pub mod panel;
pub mod tour_overlay;

use serde::{Deserialize, Serialize};

/// Unit-agnostic text layout constants: pixels in a browser host, cells in a
/// terminal host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextMetrics {
    pub padding: f64,
    pub line_height: f64,
    /// Advance of one character, for measuring tooltip width.
    pub char_width: f64,
    pub max_tooltip_width: f64,
    pub arrow_size: f64,
    /// Gap between the target and its spotlight outline.
    pub spotlight_padding: f64,
}

impl TextMetrics {
    pub fn pixels() -> Self {
        Self {
            padding: 12.0,
            line_height: 20.0,
            char_width: 8.0,
            max_tooltip_width: 320.0,
            arrow_size: 8.0,
            spotlight_padding: 4.0,
        }
    }

    pub fn cells() -> Self {
        Self {
            padding: 1.0,
            line_height: 1.0,
            char_width: 1.0,
            max_tooltip_width: 40.0,
            arrow_size: 1.0,
            spotlight_padding: 0.0,
        }
    }
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self::pixels()
    }
}
