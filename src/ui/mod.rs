//! User interface components.
//!
//! Provides TUI widgets and drawing functions for the application's
//! terminal-based user interface using ratatui.

mod diagram;
mod slide;

pub use diagram::draw_diagram;
pub use slide::draw_slide;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use unicode_width::UnicodeWidthStr;

use crate::app::{App, AppMode};
use crate::constants::ui::{JUMP_FIELD_WIDTH, NAV_BUTTON_WIDTH, STATUS_BAR_HEIGHT};

/// Render the full application UI to the terminal frame.
pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(STATUS_BAR_HEIGHT)])
        .split(f.size());

    app.view.set_viewport_width(chunks[0].width);
    draw_slide(f, app, chunks[0]);
    draw_status_bar(f, app, chunks[1]);

    if app.show_help {
        draw_help_modal(f, app);
    }
}

fn draw_status_bar(f: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(Span::styled(app.deck.title.as_str(), Style::default().fg(Color::Yellow)));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(NAV_BUTTON_WIDTH),
            Constraint::Length(9),
            Constraint::Length(NAV_BUTTON_WIDTH),
            Constraint::Length(JUMP_FIELD_WIDTH),
            Constraint::Min(1),
            Constraint::Length(16),
        ])
        .split(inner);

    app.hit_areas.prev = chunks[0];
    app.hit_areas.next = chunks[2];
    app.hit_areas.jump = chunks[3];

    f.render_widget(nav_button("◀ Prev", app.view.prev_enabled()), chunks[0]);
    f.render_widget(Paragraph::new(app.view.counter()).alignment(Alignment::Center), chunks[1]);
    f.render_widget(nav_button("Next ▶", app.view.next_enabled()), chunks[2]);
    draw_jump_field(f, app, chunks[3]);

    let hints = match app.mode {
        AppMode::Presenting => create_help_text(&[("←/→", "Navigate"), ("g", "Jump"), ("d", "Diagrams"), ("?", "Help")]),
        AppMode::JumpInput => create_help_text(&[("Enter", "Go"), ("Esc", "Leave")]),
        AppMode::Diagram => create_help_text(&[("Tab", "Next element"), ("Enter", "Click"), ("Esc", "Done")]),
    };
    f.render_widget(Paragraph::new(Line::from(hints)), chunks[4]);

    let mut right = Vec::new();
    if app.is_loading {
        right.push(Span::styled("loading ", Style::default().fg(Color::Yellow)));
    }
    if app.navigator.timed_slide() == Some(app.navigator.current_slide()) {
        right.push(Span::styled(
            format!("⏱ {} ", app.navigator.timer().display()),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));
    }
    right.push(Span::styled(chrono::Local::now().format("%H:%M").to_string(), Style::default().fg(Color::Gray)));
    f.render_widget(Paragraph::new(Line::from(right)).alignment(Alignment::Right), chunks[5]);
}

fn nav_button(label: &str, enabled: bool) -> Paragraph<'_> {
    let style = if enabled {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Paragraph::new(label).style(style).alignment(Alignment::Center)
}

fn draw_jump_field(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.mode == AppMode::JumpInput;
    let style = if app.view.jump_error() {
        Style::default().fg(Color::White).bg(Color::Red)
    } else if focused {
        Style::default().fg(Color::Black).bg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray).bg(Color::DarkGray)
    };
    let text = if app.view.jump_input.is_empty() && !focused {
        "Go to…".to_string()
    } else {
        format!(" {}", app.view.jump_input)
    };
    f.render_widget(Paragraph::new(text).style(style), area);
    if focused {
        let column = u16::try_from(app.view.jump_input.width()).unwrap_or(u16::MAX);
        f.set_cursor(area.x.saturating_add(column).saturating_add(1).min(area.right().saturating_sub(1)), area.y);
    }
}

/// Build styled help text spans from key-description pairs for the status bar.
pub fn create_help_text<'a>(commands: &[(&'a str, &'a str)]) -> Vec<Span<'a>> {
    let mut text = vec![Span::raw(" ")];

    for (i, (key, description)) in commands.iter().enumerate() {
        text.push(Span::styled(*key, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)));
        text.push(Span::raw(format!(": {description}")));
        if i < commands.len() - 1 {
            text.push(Span::raw(" | "));
        }
    }

    text
}

/// Create a bordered block with a title, highlighted when focused.
pub fn create_titled_block(title: &str, is_focused: bool) -> Block<'_> {
    let (title_style, border_style) = if is_focused {
        (Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD), Style::default().fg(Color::Yellow))
    } else {
        (Style::default(), Style::default())
    };

    Block::default().title(Span::styled(title, title_style)).borders(Borders::ALL).border_style(border_style)
}

fn centered(size: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(size.width.saturating_sub(4));
    let height = height.min(size.height.saturating_sub(4));
    Rect { x: (size.width.saturating_sub(width)) / 2, y: (size.height.saturating_sub(height)) / 2, width, height }
}

fn draw_help_modal(f: &mut Frame, app: &App) {
    let area = centered(f.size(), 60, 24);

    let block = Block::default()
        .title(Span::styled(" Help - Keybindings ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .style(Style::default().bg(Color::Black));
    let inner_area = block.inner(area);

    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let help_text: Vec<Line> = build_help_content(app)
        .iter()
        .map(|(key, desc, is_header)| {
            if *is_header {
                Line::from(Span::styled(*key, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)))
            } else {
                Line::from(vec![
                    Span::styled(format!("{key:>12}"), Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
                    Span::raw("  "),
                    Span::styled(*desc, Style::default().fg(Color::White)),
                ])
            }
        })
        .collect();

    f.render_widget(Paragraph::new(help_text).wrap(Wrap { trim: true }), inner_area);
}

fn build_help_content(app: &App) -> Vec<(&'static str, &'static str, bool)> {
    let mut lines = vec![
        ("── Global ──", "", true),
        ("F1 / ?", "Show this help", false),
        ("q / Ctrl+C", "Quit", false),
        ("", "", false),
        ("── Slides ──", "", true),
        ("← ", "Previous slide", false),
        ("→ / Space", "Reveal next item or next slide", false),
        ("Home / End", "First / last slide", false),
        ("g / 0-9", "Jump to slide number", false),
        ("Click", "Reveal next item or next slide", false),
    ];

    if app.mode == AppMode::Diagram || !app.current_diagrams().is_empty() {
        lines.extend([
            ("", "", false),
            ("── Diagrams ──", "", true),
            ("d", "Focus diagrams on this slide", false),
            ("Tab / S-Tab", "Hover next / previous element", false),
            ("Enter", "Click hovered element", false),
            ("Mouse", "Hover, click and drag shapes", false),
            ("Esc", "Leave diagrams", false),
        ]);
    }

    lines.push(("", "", false));
    lines.push(("Press Esc, F1 or ? to close", "", true));

    lines
}
