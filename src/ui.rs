//! Drawing the scene with ratatui

use crate::app::App;
use crate::effects::LogoKind;
use crate::scene::{Display, Scene};
use crate::stage::FINAL_COLOR;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const BOARD_COLUMNS: u8 = 15;

/// 3x5 glyphs for 0-9 and '-'
const DIGITS: [[&str; 5]; 11] = [
    ["███", "█ █", "█ █", "█ █", "███"],
    ["  █", "  █", "  █", "  █", "  █"],
    ["███", "  █", "███", "█  ", "███"],
    ["███", "  █", "███", "  █", "███"],
    ["█ █", "█ █", "███", "  █", "  █"],
    ["███", "█  ", "███", "  █", "███"],
    ["███", "█  ", "███", "█ █", "███"],
    ["███", "  █", "  █", "  █", "  █"],
    ["███", "█ █", "███", "█ █", "███"],
    ["███", "█ █", "███", "  █", "███"],
    ["   ", "   ", "███", "   ", "   "],
];

pub fn draw(f: &mut Frame, app: &App) {
    let area = f.size();
    let scene = app.scene();

    draw_backdrop(f, scene, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(9),
            Constraint::Min(7),
            Constraint::Length(3),
        ])
        .split(area);

    let title = Paragraph::new(Line::from(Span::styled(
        "B  I  N  G  O",
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(title, chunks[0]);

    draw_number_display(f, scene, chunks[1]);
    draw_board(f, scene, chunks[2]);
    draw_status(f, app, chunks[3]);
    draw_confetti(f, scene, area);

    if let Some(notice) = scene.notice() {
        draw_popup(f, area, notice.message(), "Press any key", Color::Yellow);
    } else if let Some(prompt) = app.prompt() {
        draw_popup(f, area, prompt.question(), "y: yes   any other key: no", Color::Red);
    }
}

fn draw_number_display(f: &mut Frame, scene: &Scene, area: Rect) {
    let (number, style, label) = match scene.display() {
        Display::Idle => (None, Style::default().fg(Color::DarkGray), ""),
        Display::Spinning { number, hue } => {
            let (r, g, b) = hsl_to_rgb(hue, 0.7, 0.5);
            (Some(number), Style::default().fg(Color::Rgb(r, g, b)), "spinning")
        }
        Display::Landed { number } => {
            let (r, g, b) = FINAL_COLOR;
            (
                Some(number),
                Style::default()
                    .fg(Color::Rgb(r, g, b))
                    .add_modifier(Modifier::BOLD),
                "!!",
            )
        }
        Display::Shown { number } => (Some(number), Style::default().fg(Color::White), ""),
    };

    let lines: Vec<Line> = big_number(number)
        .into_iter()
        .map(|row| Line::from(Span::styled(row, style)))
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Number {label}"))
        .border_style(style);
    f.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block),
        area,
    );
}

/// Five text rows spelling `number` (or a dash) in block glyphs
fn big_number(number: Option<u8>) -> Vec<String> {
    let glyphs: Vec<usize> = match number {
        Some(n) => n
            .to_string()
            .chars()
            .filter_map(|c| c.to_digit(10))
            .map(|d| d as usize)
            .collect(),
        None => vec![10],
    };

    (0..5)
        .map(|row| {
            glyphs
                .iter()
                .map(|&g| DIGITS[g][row])
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

fn draw_board(f: &mut Frame, scene: &Scene, area: Rect) {
    let max = scene.range().max();
    let mut lines = Vec::new();

    for row_start in (1..=max).step_by(BOARD_COLUMNS as usize) {
        let row_end = (row_start + BOARD_COLUMNS - 1).min(max);
        let spans: Vec<Span> = (row_start..=row_end)
            .map(|number| {
                let style = if scene.is_celebrating(number) {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else if scene.is_drawn(number) {
                    let (r, g, b) = FINAL_COLOR;
                    Style::default().fg(Color::Black).bg(Color::Rgb(r, g, b))
                } else {
                    Style::default().fg(Color::Gray)
                };
                Span::styled(format!(" {number:>2} "), style)
            })
            .collect();
        lines.push(Line::from(spans));
    }

    let block = Block::default().borders(Borders::ALL).title(format!(
        " Board  {} / {} ",
        scene.drawn_count(),
        max
    ));
    f.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block),
        area,
    );
}

fn draw_status(f: &mut Frame, app: &App, area: Rect) {
    let button = if app.scene().trigger_enabled() {
        Span::styled(
            " [ DRAW ] ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(" [ .... ] ", Style::default().fg(Color::DarkGray))
    };
    let sound = if app.is_muted() { "  (muted)" } else { "" };

    let line = Line::from(vec![
        button,
        Span::raw("  "),
        Span::styled(app.status().to_string(), Style::default().fg(Color::White)),
        Span::styled(sound, Style::default().fg(Color::DarkGray)),
        Span::styled(
            "   Space: draw  n: new game  m: mute  q: quit",
            Style::default().fg(Color::Gray),
        ),
    ]);
    f.render_widget(
        Paragraph::new(line).block(Block::default().borders(Borders::TOP)),
        area,
    );
}

fn draw_backdrop(f: &mut Frame, scene: &Scene, area: Rect) {
    let now = scene.now();
    for logo in scene.logos() {
        let Some(progress) = logo.position(now) else {
            continue;
        };
        let glyph = match logo.kind {
            LogoKind::Common => '◆',
            LogoKind::Uncommon => '●',
            LogoKind::Rare => '★',
        };
        let level = (logo.opacity * 255.0) as u8;
        put(f, area, logo.left, progress, glyph, Color::Rgb(level, level, level));
    }
}

fn draw_confetti(f: &mut Frame, scene: &Scene, area: Rect) {
    let now = scene.now();
    for piece in scene.confetti() {
        if let Some(progress) = piece.position(now) {
            let (r, g, b) = piece.color;
            put(f, area, piece.left, progress, '▪', Color::Rgb(r, g, b));
        }
    }
}

/// Write one glyph at fractional coordinates inside `area`
fn put(f: &mut Frame, area: Rect, x_frac: f64, y_frac: f64, glyph: char, color: Color) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let x = area.x + (x_frac.clamp(0.0, 1.0) * (area.width - 1) as f64) as u16;
    let y = area.y + (y_frac.clamp(0.0, 1.0) * (area.height - 1) as f64) as u16;
    if x < area.right() && y < area.bottom() {
        f.buffer_mut().get_mut(x, y).set_char(glyph).set_fg(color);
    }
}

fn draw_popup(f: &mut Frame, area: Rect, message: &str, hint: &str, color: Color) {
    let popup = centered_rect(60, 5, area);
    let text = vec![
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(hint.to_string(), Style::default().fg(Color::Gray))),
    ];
    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(color))),
        popup,
    );
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// `hue` in degrees, saturation and lightness in `[0, 1]`
pub fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> (u8, u8, u8) {
    let h = hue.rem_euclid(360.0) / 60.0;
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = lightness - c / 2.0;
    let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    (channel(r), channel(g), channel(b))
}
