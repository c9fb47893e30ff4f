use std::collections::HashMap;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, MouseButton, MouseEventKind};
use floatkit_core::config::{PanelConfig, PlacementConfig};
use floatkit_core::panel::{PanelRegion, PointerEvent, SessionStart};
use floatkit_core::views::panel::{panel_content_rect, render_panel};
use floatkit_core::views::tour_overlay::{measure_tooltip, render_tour_overlay};
use floatkit_core::views::TextMetrics;
use floatkit_core::{
    DragBounds, EngineConfig, PanelController, Solver, Tour, TourStep, TourTransition,
};
use floatkit_protocol::{PanelState, Point, ScreenRect, Side, Size, ViewportMetrics};
use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
};

use crate::renderer::{self, Term};

const FOCUS_SECONDS: u64 = 25 * 60;
const TICK: Duration = Duration::from_millis(50);

/// Engine defaults scaled to terminal cells.
pub fn terminal_config() -> EngineConfig {
    EngineConfig {
        placement: PlacementConfig {
            offset: 1.0,
            margin: 1.0,
            arrow_margin: 2.0,
        },
        panel: PanelConfig {
            min_width: 20.0,
            min_height: 6.0,
            drag_bounds: DragBounds::Viewport,
            grip_size: 1.0,
            header_height: 1.0,
        },
        ..EngineConfig::default()
    }
}

/// Host layout the tour switches between. The notes tab only exists in
/// `Split`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Single,
    Split,
}

fn tour_steps() -> Vec<TourStep<Layout>> {
    vec![
        TourStep::new(
            "tour-button",
            "Guided tour",
            "Right arrow: next step\nLeft arrow: back\nEsc: leave the tour",
            Side::Bottom,
        ),
        TourStep::new(
            "layout-button",
            "Layouts",
            "Press l to switch between\nsingle and split view.",
            Side::Bottom,
        ),
        TourStep::new(
            "notes-tab",
            "Notes tab",
            "In split view your notes\nsit next to the material.",
            Side::Left,
        )
        .with_before(Layout::Split)
        .with_after(Layout::Single),
        TourStep::new(
            "notes",
            "Notes panel",
            "Drag the header to move it,\nthe corner to resize it.",
            Side::Right,
        ),
        TourStep::new(
            "timer",
            "Countdown",
            "Drag it anywhere;\nit always stays on screen.",
            Side::Top,
        ),
    ]
}

pub struct App {
    config: EngineConfig,
    solver: Solver,
    metrics: TextMetrics,
    viewport: ViewportMetrics,
    layout: Layout,
    notes: PanelState,
    notes_visible: bool,
    notes_ctl: PanelController,
    timer: PanelState,
    timer_ctl: PanelController,
    tour: Tour<Layout>,
    /// When the pending tour overlay may be measured.
    measure_at: Option<Instant>,
    focus_started: Instant,
    quit: bool,
}

impl App {
    pub fn new(config: EngineConfig) -> Self {
        let notes_ctl = PanelController::new(config.panel);
        let timer_ctl = PanelController::new(PanelConfig {
            min_width: 12.0,
            min_height: 3.0,
            ..config.panel
        });
        let notes = notes_ctl.normalize(PanelState::new(
            Point::new(4.0, 4.0),
            Size::new(34.0, 10.0),
        ));
        let timer = timer_ctl.normalize(PanelState::new(
            Point::new(50.0, 16.0),
            Size::new(14.0, 3.0),
        ));
        Self {
            config,
            solver: Solver::new(config.placement),
            metrics: TextMetrics::cells(),
            viewport: ViewportMetrics::new(80.0, 24.0),
            layout: Layout::Single,
            notes,
            notes_visible: true,
            notes_ctl,
            timer,
            timer_ctl,
            tour: Tour::new(tour_steps()),
            measure_at: None,
            focus_started: Instant::now(),
            quit: false,
        }
    }

    pub fn run(mut self, terminal: &mut Term) -> Result<()> {
        let size = terminal.size()?;
        self.resize(size.width, size.height);

        while !self.quit {
            self.measure_if_due();
            terminal.draw(|frame| self.draw(frame))?;

            if event::poll(TICK)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key(key.code),
                    Event::Mouse(mouse) => {
                        let p = Point::new(f64::from(mouse.column), f64::from(mouse.row));
                        match mouse.kind {
                            MouseEventKind::Down(MouseButton::Left) => self.pointer_down(p),
                            MouseEventKind::Drag(MouseButton::Left) => self.pointer_move(p),
                            MouseEventKind::Up(MouseButton::Left) => self.pointer_up(),
                            _ => {}
                        }
                    }
                    Event::Resize(w, h) => self.resize(w, h),
                    _ => {}
                }
            }
        }
        Ok(())
    }

    fn element_rects(&self) -> HashMap<String, ScreenRect> {
        let vw = self.viewport.width;
        let vh = self.viewport.height;
        let mut rects = HashMap::new();
        rects.insert("tour-button".into(), ScreenRect::new(1.0, 0.0, 8.0, 1.0));
        rects.insert("layout-button".into(), ScreenRect::new(10.0, 0.0, 10.0, 1.0));
        let editor_width = match self.layout {
            Layout::Single => vw,
            Layout::Split => (vw * 0.6).floor(),
        };
        rects.insert(
            "editor".into(),
            ScreenRect::new(0.0, 1.0, editor_width, (vh - 1.0).max(0.0)),
        );
        if self.layout == Layout::Split {
            rects.insert(
                "notes-tab".into(),
                ScreenRect::new(editor_width, 1.0, vw - editor_width, 3.0),
            );
        }
        if self.notes_visible {
            rects.insert("notes".into(), self.notes.rect());
        }
        rects.insert("timer".into(), self.timer.rect());
        rects
    }

    fn apply(&mut self, transition: TourTransition<Layout>) {
        if transition.is_noop() {
            return;
        }
        for layout in transition.effects {
            tracing::debug!(?layout, "applying tour effect");
            self.layout = layout;
        }
        self.measure_at =
            Some(Instant::now() + Duration::from_millis(self.config.tour.settle_delay_ms));
    }

    fn measure_if_due(&mut self) {
        if !self.tour.needs_measure() {
            return;
        }
        if self.measure_at.is_some_and(|at| Instant::now() < at) {
            return;
        }
        let Some(step) = self.tour.current_step() else {
            return;
        };
        let tooltip = measure_tooltip(step, &self.metrics);
        let rects = self.element_rects();
        self.tour.measure(&self.solver, &rects, tooltip, self.viewport);
        self.measure_at = None;
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.viewport = ViewportMetrics::new(f64::from(width), f64::from(height));
        self.notes = self.notes_ctl.clamp_into_viewport(self.notes, self.viewport);
        self.timer = self.timer_ctl.clamp_into_viewport(self.timer, self.viewport);
        self.tour.invalidate();
        self.measure_at = None;
        tracing::debug!(width, height, "viewport resized");
    }

    fn on_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => self.quit = true,
            KeyCode::Char('t') => {
                let transition = self.tour.start();
                self.apply(transition);
            }
            KeyCode::Right | KeyCode::Enter if self.tour.is_active() => {
                let transition = self.tour.advance();
                self.apply(transition);
            }
            KeyCode::Left if self.tour.is_active() => {
                let transition = self.tour.retreat();
                self.apply(transition);
            }
            KeyCode::Esc => {
                let transition = self.tour.end();
                self.apply(transition);
            }
            KeyCode::Char('l') => {
                self.layout = match self.layout {
                    Layout::Single => Layout::Split,
                    Layout::Split => Layout::Single,
                };
                self.tour.invalidate();
            }
            KeyCode::Char('o') => {
                self.notes_visible = true;
                self.tour.invalidate();
            }
            _ => {}
        }
    }

    /// Close button at the right end of the notes header. It is an
    /// interactive child, so pressing it never starts a drag.
    fn notes_close_button(&self) -> ScreenRect {
        let rect = self.notes.rect();
        ScreenRect::new(rect.right() - 4.0, rect.y, 3.0, 1.0)
    }

    fn pointer_down(&mut self, p: Point) {
        // Topmost first: countdown, then notes, then the toolbar.
        if self.timer.rect().contains(p) {
            self.timer_ctl
                .begin_drag(PointerEvent::on_handle(p), self.timer.position);
            return;
        }
        if self.notes_visible {
            match self.notes_ctl.hit_test(&self.notes, p) {
                PanelRegion::Header => {
                    let on_close = self.notes_close_button().contains(p);
                    let event = if on_close {
                        PointerEvent::on_interactive(p)
                    } else {
                        PointerEvent::on_handle(p)
                    };
                    let start = self.notes_ctl.begin_drag(event, self.notes.position);
                    if on_close && !start.is_started() {
                        self.notes_visible = false;
                        self.tour.invalidate();
                    }
                    return;
                }
                PanelRegion::ResizeGrip => {
                    let start = self
                        .notes_ctl
                        .begin_resize(PointerEvent::on_handle(p), self.notes.size);
                    if let SessionStart::Suppressed(reason) = start {
                        tracing::debug!(?reason, "resize not started");
                    }
                    return;
                }
                PanelRegion::Body => return,
                PanelRegion::Outside => {}
            }
        }
        let rects = self.element_rects();
        let hit = |id: &str| rects.get(id).is_some_and(|r| r.contains(p));
        if hit("tour-button") {
            self.on_key(KeyCode::Char('t'));
        } else if hit("layout-button") {
            self.on_key(KeyCode::Char('l'));
        }
    }

    fn pointer_move(&mut self, p: Point) {
        let moved_notes = self
            .notes_ctl
            .pointer_move(p, self.viewport, &mut self.notes)
            .is_some();
        let moved_timer = self
            .timer_ctl
            .pointer_move(p, self.viewport, &mut self.timer)
            .is_some();
        if moved_notes || moved_timer {
            self.tour.invalidate();
        }
    }

    /// Pointer-up ends any session, wherever the pointer is now.
    fn pointer_up(&mut self) {
        self.notes_ctl.end_session();
        self.timer_ctl.end_session();
    }

    fn countdown_text(&self) -> String {
        let elapsed = self.focus_started.elapsed().as_secs();
        let left = FOCUS_SECONDS.saturating_sub(elapsed);
        format!("{:02}:{:02}", left / 60, left % 60)
    }

    fn draw(&self, frame: &mut Frame) {
        let rects = self.element_rects();
        let bounds = frame.area();
        let area = |id: &str| rects.get(id).and_then(|r| renderer::to_cells(*r, bounds));

        let button = Style::default().fg(Color::Black).bg(Color::Rgb(137, 180, 250));
        if let Some(a) = area("tour-button") {
            frame.render_widget(Paragraph::new(" [Tour] ").style(button), a);
        }
        if let Some(a) = area("layout-button") {
            frame.render_widget(Paragraph::new(" [Layout] ").style(button), a);
        }
        if let Some(a) = area("editor") {
            let body = Paragraph::new(vec![
                Line::from("Chapter 3: Cell respiration"),
                Line::from(""),
                Line::from("Glycolysis splits glucose into two pyruvate molecules."),
                Line::from(""),
                Line::from("t: tour   l: layout   o: reopen notes   q: quit"),
            ])
            .block(Block::default().borders(Borders::ALL).title(" Study "));
            frame.render_widget(body, a);
        }
        if let Some(a) = area("notes-tab") {
            frame.render_widget(
                Paragraph::new(" Notes ")
                    .style(Style::default().add_modifier(Modifier::BOLD))
                    .block(Block::default().borders(Borders::ALL)),
                a,
            );
        }

        if self.notes_visible {
            let commands = render_panel(
                "notes",
                &self.notes,
                "Notes",
                self.notes_ctl.config(),
                &self.metrics,
            );
            renderer::draw_commands(frame, &commands);
            if let Some(a) = renderer::to_cells(self.notes_close_button(), bounds) {
                frame.render_widget(Paragraph::new("[x]"), a);
            }
            let content =
                panel_content_rect(&self.notes, self.notes_ctl.config(), &self.metrics);
            if let Some(a) = renderer::to_cells(content, bounds) {
                frame.render_widget(
                    Paragraph::new("- ATP yield: 2 net\n- occurs in cytoplasm"),
                    a,
                );
            }
        }

        let commands = render_panel(
            "timer",
            &self.timer,
            "Focus",
            self.timer_ctl.config(),
            &self.metrics,
        );
        renderer::draw_commands(frame, &commands);
        let content = panel_content_rect(&self.timer, self.timer_ctl.config(), &self.metrics);
        if let Some(a) = renderer::to_cells(content, bounds) {
            frame.render_widget(Paragraph::new(self.countdown_text()), a);
        }

        let overlay = render_tour_overlay(&self.tour, &rects, &self.metrics);
        renderer::draw_commands(frame, &overlay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notes_tab_exists_only_in_split() {
        let mut app = App::new(terminal_config());
        assert!(!app.element_rects().contains_key("notes-tab"));
        app.layout = Layout::Split;
        assert!(app.element_rects().contains_key("notes-tab"));
    }

    #[test]
    fn tour_step_switches_layout_and_back() {
        let mut app = App::new(terminal_config());
        app.on_key(KeyCode::Char('t'));
        app.on_key(KeyCode::Right);
        app.on_key(KeyCode::Right);
        assert_eq!(app.layout, Layout::Split);
        app.on_key(KeyCode::Esc);
        assert_eq!(app.layout, Layout::Single);
    }

    #[test]
    fn header_drag_moves_notes() {
        let mut app = App::new(terminal_config());
        app.resize(120, 40);
        app.pointer_down(Point::new(10.0, 4.0));
        app.pointer_move(Point::new(15.0, 6.0));
        app.pointer_up();
        assert_eq!(app.notes.position, Point::new(9.0, 6.0));
    }

    #[test]
    fn close_button_never_drags() {
        let mut app = App::new(terminal_config());
        app.resize(120, 40);
        let close = app.notes_close_button();
        app.pointer_down(Point::new(close.x + 1.0, close.y));
        app.pointer_move(Point::new(close.x + 20.0, close.y + 10.0));
        assert!(!app.notes_visible);
        assert_eq!(app.notes.position, Point::new(4.0, 4.0));
    }

    #[test]
    fn countdown_stays_on_screen_after_shrink() {
        let mut app = App::new(terminal_config());
        app.resize(40, 12);
        assert!(app.timer.rect().right() <= 40.0);
        assert!(app.timer.rect().bottom() <= 12.0);
    }

    #[test]
    fn overlay_measured_once_due() {
        let mut app = App::new(terminal_config());
        app.resize(120, 40);
        app.on_key(KeyCode::Char('t'));
        app.measure_at = None;
        app.measure_if_due();
        assert!(app.tour.current_placement().is_some());
    }
}
