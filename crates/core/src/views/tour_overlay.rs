use floatkit_protocol::{
    PlacementResult, Point, RenderCommand, ScreenRect, SharedStr, Side, Size, ThemeToken,
};

use crate::host::ElementRects;
use crate::tour::{Tour, TourStep};
use crate::views::TextMetrics;

/// Characters that fit on one line of a tooltip `width` wide.
fn chars_per_line(width: f64, metrics: &TextMetrics) -> usize {
    let inner = (width - 2.0 * metrics.padding) / metrics.char_width;
    if inner.is_finite() && inner >= 1.0 {
        inner.floor() as usize
    } else {
        1
    }
}

/// Word-wrap `text` at `max_chars`. Hosts break paragraphs with `\n`; words
/// longer than a line are split hard.
fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        let mut width = 0;
        for word in paragraph.split_whitespace() {
            let chars: Vec<char> = word.chars().collect();
            for chunk in chars.chunks(max_chars) {
                if width > 0 && width + 1 + chunk.len() <= max_chars {
                    current.push(' ');
                    width += 1;
                } else if width > 0 {
                    lines.push(std::mem::take(&mut current));
                    width = 0;
                }
                current.extend(chunk);
                width += chunk.len();
            }
        }
        lines.push(current);
    }
    lines
}

/// Title followed by body lines, wrapped to a tooltip `width` wide.
fn text_lines<E>(
    step: &TourStep<E>,
    width: f64,
    metrics: &TextMetrics,
) -> (Vec<String>, Vec<String>) {
    let max_chars = chars_per_line(width, metrics);
    (wrap(&step.title, max_chars), wrap(&step.content, max_chars))
}

/// Size of the tooltip box for `step`: wrapped title, wrapped content and
/// the step counter, padded on every side. Lines wrap at
/// `max_tooltip_width`, so long content grows the box downwards.
pub fn measure_tooltip<E>(step: &TourStep<E>, metrics: &TextMetrics) -> Size {
    let (title, content) = text_lines(step, metrics.max_tooltip_width, metrics);
    let widest = title
        .iter()
        .chain(&content)
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0);
    let lines = title.len() + content.len() + 1;
    let width = (widest as f64 * metrics.char_width + 2.0 * metrics.padding)
        .min(metrics.max_tooltip_width);
    let height = lines as f64 * metrics.line_height + 2.0 * metrics.padding;
    Size::new(width, height)
}

/// Point on the tooltip edge where the arrow starts.
pub fn arrow_tip(placement: &PlacementResult) -> Point {
    let rect = placement.final_rect;
    let offset = placement.arrow.offset;
    match placement.arrow.side {
        Side::Top => Point::new(rect.x + offset, rect.y),
        Side::Bottom => Point::new(rect.x + offset, rect.bottom()),
        Side::Left => Point::new(rect.x, rect.y + offset),
        Side::Right => Point::new(rect.right(), rect.y + offset),
    }
}

/// Render the overlay for the tour's current step. Renders nothing unless the
/// overlay is shown and the target is still present.
pub fn render_tour_overlay<E, R>(
    tour: &Tour<E>,
    rects: &R,
    metrics: &TextMetrics,
) -> Vec<RenderCommand>
where
    E: Clone,
    R: ElementRects + ?Sized,
{
    let (Some(step), Some(placement)) = (tour.current_step(), tour.current_placement()) else {
        return Vec::new();
    };
    let Some(target) = rects.element_rect(&step.target_id) else {
        return Vec::new();
    };

    let rect = placement.final_rect;
    let text_x = rect.x + metrics.padding;
    let text_width = (rect.width - 2.0 * metrics.padding).max(0.0);
    let mut y = rect.y + metrics.padding;

    let mut commands = vec![
        RenderCommand::BeginGroup {
            id: "tour".into(),
            label: Some(step.title.clone()),
        },
        RenderCommand::StrokeRect {
            rect: target.inflate(metrics.spotlight_padding),
            color: ThemeToken::Spotlight,
            width: 2.0,
        },
        RenderCommand::DrawRect {
            rect,
            color: ThemeToken::TooltipBackground,
            border_color: Some(ThemeToken::TooltipBorder),
        },
    ];

    let (title, content) = text_lines(step, rect.width, metrics);
    let styled = title
        .into_iter()
        .map(|l| (l, ThemeToken::TooltipTitle))
        .chain(content.into_iter().map(|l| (l, ThemeToken::TooltipText)));
    for (line, color) in styled {
        commands.push(RenderCommand::DrawText {
            position: Point::new(text_x, y),
            text: line.into(),
            color,
            max_width: text_width,
        });
        y += metrics.line_height;
    }

    if let Some((current, total)) = tour.progress() {
        commands.push(RenderCommand::DrawText {
            position: Point::new(text_x, rect.bottom() - metrics.padding - metrics.line_height),
            text: SharedStr::from(format!("{current} / {total}")),
            color: ThemeToken::TooltipMuted,
            max_width: text_width,
        });
    }

    commands.push(RenderCommand::DrawArrow {
        tip: arrow_tip(placement),
        side: placement.arrow.side,
        size: metrics.arrow_size,
        color: ThemeToken::Arrow,
    });
    commands.push(RenderCommand::EndGroup);
    commands
}

/// Spotlight outline of the current target, for hosts that dim everything
/// else.
pub fn spotlight_rect<E, R>(tour: &Tour<E>, rects: &R, metrics: &TextMetrics) -> Option<ScreenRect>
where
    E: Clone,
    R: ElementRects + ?Sized,
{
    tour.current_step()
        .and_then(|step| rects.element_rect(&step.target_id))
        .map(|r| r.inflate(metrics.spotlight_padding))
}
