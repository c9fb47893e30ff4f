use std::io::{Stdout, stdout};

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use floatkit_protocol::{RenderCommand, ScreenRect, Side, ThemeToken};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear},
};

pub type Term = Terminal<CrosstermBackend<Stdout>>;

pub fn setup() -> Result<Term> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

pub fn restore(terminal: &mut Term) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

fn theme_to_color(token: ThemeToken) -> Color {
    match token {
        ThemeToken::PanelBackground => Color::Rgb(30, 30, 46),
        ThemeToken::PanelBorder => Color::Rgb(88, 91, 112),
        ThemeToken::PanelHeader => Color::Rgb(49, 50, 68),
        ThemeToken::PanelTitle => Color::White,
        ThemeToken::ResizeGrip => Color::Rgb(137, 180, 250),
        ThemeToken::Spotlight => Color::Yellow,
        ThemeToken::TooltipBackground => Color::Rgb(24, 24, 37),
        ThemeToken::TooltipBorder => Color::Rgb(137, 180, 250),
        ThemeToken::TooltipTitle => Color::Rgb(137, 180, 250),
        ThemeToken::TooltipText => Color::White,
        ThemeToken::TooltipMuted => Color::DarkGray,
        ThemeToken::Arrow => Color::Rgb(137, 180, 250),
    }
}

/// Convert an engine rect to a cell rect clipped to `bounds`. Rects that end
/// up empty are dropped.
pub fn to_cells(rect: ScreenRect, bounds: Rect) -> Option<Rect> {
    let left = rect.x.round().max(f64::from(bounds.left()));
    let top = rect.y.round().max(f64::from(bounds.top()));
    let right = rect.right().round().min(f64::from(bounds.right()));
    let bottom = rect.bottom().round().min(f64::from(bounds.bottom()));
    if right <= left || bottom <= top {
        return None;
    }
    Some(Rect::new(
        left as u16,
        top as u16,
        (right - left) as u16,
        (bottom - top) as u16,
    ))
}

fn put(frame: &mut Frame, x: f64, y: f64, symbol: &str, style: Style) {
    if x < 0.0 || y < 0.0 {
        return;
    }
    if let Some(cell) = frame.buffer_mut().cell_mut((x as u16, y as u16)) {
        cell.set_symbol(symbol).set_style(style);
    }
}

/// Draw engine render commands on top of whatever the host already drew.
pub fn draw_commands(frame: &mut Frame, commands: &[RenderCommand]) {
    let bounds = frame.area();
    for cmd in commands {
        match cmd {
            RenderCommand::DrawRect {
                rect,
                color,
                border_color,
            } => {
                let Some(area) = to_cells(*rect, bounds) else {
                    continue;
                };
                let mut block = Block::default().style(Style::default().bg(theme_to_color(*color)));
                if let Some(border) = border_color {
                    block = block
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(theme_to_color(*border)));
                }
                frame.render_widget(Clear, area);
                frame.render_widget(block, area);
            }
            RenderCommand::StrokeRect { rect, color, .. } => {
                if let Some(area) = to_cells(*rect, bounds) {
                    let block = Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(theme_to_color(*color)));
                    frame.render_widget(block, area);
                }
            }
            RenderCommand::DrawText {
                position,
                text,
                color,
                max_width,
            } => {
                let (x, y) = (position.x.round(), position.y.round());
                if x < f64::from(bounds.left())
                    || y < f64::from(bounds.top())
                    || x >= f64::from(bounds.right())
                    || y >= f64::from(bounds.bottom())
                {
                    continue;
                }
                let style = match color {
                    ThemeToken::TooltipTitle | ThemeToken::PanelTitle => Style::default()
                        .fg(theme_to_color(*color))
                        .add_modifier(Modifier::BOLD),
                    _ => Style::default().fg(theme_to_color(*color)),
                };
                frame.buffer_mut().set_stringn(
                    x as u16,
                    y as u16,
                    text.as_str(),
                    max_width.max(0.0) as usize,
                    style,
                );
            }
            RenderCommand::DrawArrow {
                tip, side, color, ..
            } => {
                // The arrow occupies the cell just outside the tooltip edge.
                let style = Style::default().fg(theme_to_color(*color));
                let x = tip.x.round();
                let y = tip.y.round();
                match side {
                    Side::Top => put(frame, x, y - 1.0, "▲", style),
                    Side::Bottom => put(frame, x, y, "▼", style),
                    Side::Left => put(frame, x - 1.0, y, "◀", style),
                    Side::Right => put(frame, x, y, "▶", style),
                }
            }
            RenderCommand::BeginGroup { .. } | RenderCommand::EndGroup => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clips_to_bounds() {
        let bounds = Rect::new(0, 0, 80, 24);
        let area = to_cells(ScreenRect::new(-5.0, 20.0, 20.0, 10.0), bounds);
        assert_eq!(area, Some(Rect::new(0, 20, 15, 4)));
    }

    #[test]
    fn offscreen_rect_is_dropped() {
        let bounds = Rect::new(0, 0, 80, 24);
        assert_eq!(to_cells(ScreenRect::new(90.0, 2.0, 5.0, 5.0), bounds), None);
    }
}
