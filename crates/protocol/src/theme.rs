use serde::{Deserialize, Serialize};

/// Semantic color tokens resolved by the host renderer's active theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    // Floating panels
    PanelBackground,
    PanelBorder,
    PanelHeader,
    PanelTitle,
    ResizeGrip,

    // Tour overlay
    Spotlight,
    TooltipBackground,
    TooltipBorder,
    TooltipTitle,
    TooltipText,
    TooltipMuted,
    Arrow,
}
