use floatkit_protocol::{PanelState, Point, RenderCommand, ScreenRect, ThemeToken};

use crate::config::PanelConfig;
use crate::views::TextMetrics;

/// Render a floating panel frame: body, draggable header with its title, and
/// the resize grip in the bottom-right corner. Panel content is the host's.
pub fn render_panel(
    id: &str,
    panel: &PanelState,
    title: &str,
    config: &PanelConfig,
    metrics: &TextMetrics,
) -> Vec<RenderCommand> {
    let rect = panel.rect();
    let header_height = config.header_height.min(rect.height);
    let grip = config.grip_size.min(rect.width).min(rect.height);

    vec![
        RenderCommand::BeginGroup {
            id: id.into(),
            label: Some(title.into()),
        },
        RenderCommand::DrawRect {
            rect,
            color: ThemeToken::PanelBackground,
            border_color: Some(ThemeToken::PanelBorder),
        },
        RenderCommand::DrawRect {
            rect: ScreenRect::new(rect.x, rect.y, rect.width, header_height),
            color: ThemeToken::PanelHeader,
            border_color: None,
        },
        RenderCommand::DrawText {
            position: Point::new(
                rect.x + metrics.padding,
                rect.y + ((header_height - metrics.line_height) / 2.0).max(0.0),
            ),
            text: title.into(),
            color: ThemeToken::PanelTitle,
            max_width: (rect.width - 2.0 * metrics.padding).max(0.0),
        },
        RenderCommand::DrawRect {
            rect: ScreenRect::new(rect.right() - grip, rect.bottom() - grip, grip, grip),
            color: ThemeToken::ResizeGrip,
            border_color: None,
        },
        RenderCommand::EndGroup,
    ]
}

/// Content area below the header, inset by the text padding.
pub fn panel_content_rect(
    panel: &PanelState,
    config: &PanelConfig,
    metrics: &TextMetrics,
) -> ScreenRect {
    let rect = panel.rect();
    let top = rect.y + config.header_height;
    ScreenRect::new(
        rect.x + metrics.padding,
        top,
        (rect.width - 2.0 * metrics.padding).max(0.0),
        (rect.bottom() - top - metrics.padding).max(0.0),
    )
}

#[cfg(test)]
mod tests {
    use floatkit_protocol::Size;

    use super::*;

    #[test]
    fn panel_frame_commands() {
        let panel = PanelState::new(Point::new(100.0, 100.0), Size::new(320.0, 240.0));
        let config = PanelConfig::default();
        let cmds = render_panel("notes", &panel, "Notes", &config, &TextMetrics::pixels());

        assert!(matches!(cmds.first(), Some(RenderCommand::BeginGroup { .. })));
        assert!(matches!(cmds.last(), Some(RenderCommand::EndGroup)));
        let grip = cmds.iter().find_map(|c| match c {
            RenderCommand::DrawRect {
                rect,
                color: ThemeToken::ResizeGrip,
                ..
            } => Some(*rect),
            _ => None,
        });
        assert_eq!(grip, Some(ScreenRect::new(404.0, 324.0, 16.0, 16.0)));
    }

    #[test]
    fn content_sits_below_header() {
        let panel = PanelState::new(Point::new(0.0, 0.0), Size::new(200.0, 150.0));
        let content =
            panel_content_rect(&panel, &PanelConfig::default(), &TextMetrics::pixels());
        assert_eq!(content, ScreenRect::new(12.0, 32.0, 176.0, 106.0));
    }
}
