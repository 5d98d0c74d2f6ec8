//! UI rendering for the TUI.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Circle, Rectangle},
        Block, Borders, Clear, Paragraph, Wrap,
    },
    Frame,
};

use crate::breath::{Phase, Stage, PREPARATION_TEXT};
use crate::core::{format_duration_mmss, from_std};
use crate::tui::animation::shade;
use crate::tui::app::{App, CenterText};

/// Canvas units. The square spans `SQUARE_MIN..SQUARE_MAX` on both axes.
const BOUND: f64 = 100.0;
const SQUARE_MIN: f64 = 25.0;
const SQUARE_MAX: f64 = 75.0;
const SQUARE_SIDE: f64 = SQUARE_MAX - SQUARE_MIN;

const HINTS: &str = "+/-:volume | m:mute | ?:help | q:quit";

/// Render the application UI.
pub fn render(frame: &mut Frame<'_>, app: &App) {
    // Create layout: header, square, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Square
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_square(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);

    if app.show_help {
        render_help(frame, chunks[1]);
    }
}

/// Render the header.
fn render_header(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let stats = app.stats();
    let breathed = chrono::Duration::seconds(i64::try_from(stats.running_seconds).unwrap_or(i64::MAX));

    let mut title = format!(
        " Box Breathing │ {} │ {} breathed │ {} cycles ",
        app.stage(),
        format_duration_mmss(breathed),
        app.snapshot.completed_cycles
    );
    if let Some(audio) = app.audio_label() {
        title.push_str(&format!("│ {audio} "));
    }

    let header = Paragraph::new(title)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );

    frame.render_widget(header, area);
}

/// Largest area with a 2:1 cell ratio (a visual square) centered in `area`.
fn square_area(area: Rect) -> Rect {
    let height = area.height.min(area.width / 2);
    let width = height * 2;
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn label_style(active: bool) -> Style {
    if active {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

/// Render the square, its labels, the dot and the centre text.
fn render_square(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let area = square_area(area);
    if area.width < 8 || area.height < 4 {
        return;
    }

    let running = app.stage() == Stage::Running;
    let (phase, _) = app.indicator();
    let dot = indicator_dot(app);
    let cell = BOUND / f64::from(area.width);
    let box_color = if running { Color::White } else { Color::DarkGray };

    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([0.0, BOUND])
        .y_bounds([0.0, BOUND])
        .paint(move |ctx| {
            ctx.draw(&Rectangle {
                x: SQUARE_MIN,
                y: SQUARE_MIN,
                width: SQUARE_SIDE,
                height: SQUARE_SIDE,
                color: box_color,
            });

            for side_phase in Phase::ALL {
                let text = side_phase.label().to_uppercase();
                #[allow(clippy::cast_precision_loss)]
                let half = text.len() as f64 / 2.0 * cell;
                let (lx, ly) = match side_phase {
                    Phase::Inhale => (BOUND / 2.0 - half, SQUARE_MAX + 8.0),
                    Phase::Hold1 => (SQUARE_MAX + 3.0, BOUND / 2.0),
                    Phase::Exhale => (BOUND / 2.0 - half, SQUARE_MIN - 10.0),
                    Phase::Hold2 => (SQUARE_MIN - 3.0 - 2.0 * half, BOUND / 2.0),
                };
                let active = running && side_phase == phase;
                ctx.print(lx, ly, Span::styled(text, label_style(active)));
            }

            if let Some(dot) = &dot {
                ctx.draw(dot);
            }
        });

    frame.render_widget(canvas, area);
    render_center(frame, app, area);
}

/// The travelling dot, drawn only while running.
fn indicator_dot(app: &App) -> Option<Circle> {
    if app.stage() != Stage::Running {
        return None;
    }
    let (_, (x, y)) = app.indicator();
    // Unit square has y growing downward; the canvas grows upward.
    Some(Circle {
        x: SQUARE_MIN + SQUARE_SIDE * x,
        y: SQUARE_MAX - SQUARE_SIDE * y,
        radius: 2.5,
        color: Color::Cyan,
    })
}

/// Render the text in the middle of the square.
fn render_center(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let lines: Vec<Line<'_>> = match app.center_text() {
        CenterText::Prompt => vec![
            Line::from(Span::styled("Press", Style::default().fg(Color::Gray))),
            Line::from(Span::styled(
                "Start",
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
        ],
        CenterText::Preparation { opacity } => vec![Line::from(Span::styled(
            PREPARATION_TEXT,
            Style::default().fg(shade(opacity)),
        ))],
        CenterText::Countdown { digit, opacity } => vec![Line::from(Span::styled(
            digit.to_string(),
            Style::default().fg(shade(opacity)).add_modifier(Modifier::BOLD),
        ))],
        CenterText::Seconds(remaining) => vec![Line::from(Span::styled(
            remaining.to_string(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ))],
    };

    // Inside the square, away from its border.
    let inner = Rect {
        x: area.x + area.width / 4 + 1,
        y: area.y + area.height / 2 - 1,
        width: (area.width / 2).saturating_sub(2),
        height: 3.min(area.height / 2),
    };
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, inner);
}

/// Render the status bar.
fn render_status_bar(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let toggle = if app.stage() == Stage::Idle {
        "space:start"
    } else {
        "space:stop"
    };
    let elapsed = format_duration_mmss(from_std(app.elapsed()));

    let mut spans = vec![
        Span::styled(format!("{elapsed} "), Style::default().fg(Color::DarkGray)),
        Span::styled(toggle, Style::default().fg(Color::Yellow)),
        Span::styled(format!(" | {HINTS}"), Style::default().fg(Color::DarkGray)),
    ];
    if let Some(status) = &app.status {
        spans.push(Span::styled(format!("  {status}"), Style::default().fg(Color::Gray)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the key help popup.
fn render_help(frame: &mut Frame<'_>, area: Rect) {
    let text = vec![
        Line::from("space / enter   start or stop"),
        Line::from("+ / -           volume up / down"),
        Line::from("m               mute"),
        Line::from("?               close this help"),
        Line::from("q / esc         quit"),
    ];
    let width = 38.min(area.width);
    let height = 7.min(area.height);
    let popup = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };

    let help = Paragraph::new(text).block(
        Block::default()
            .title(" Keys ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    frame.render_widget(Clear, popup);
    frame.render_widget(help, popup);
}
