pub mod commands;
pub mod panel;
pub mod placement;
pub mod shared_str;
pub mod theme;
pub mod types;

pub use commands::RenderCommand;
pub use panel::PanelState;
pub use placement::{Arrow, PlacementResult, Side};
pub use shared_str::SharedStr;
pub use theme::ThemeToken;
pub use types::{Point, ScreenRect, Size, ViewportMetrics};
