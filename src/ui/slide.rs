use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, AppMode};
use crate::deck::{ItemKind, Slide};
use crate::ui::{create_titled_block, draw_diagram};

/// Draw the slide the viewport shows, recording diagram hit areas.
pub fn draw_slide(f: &mut Frame, app: &mut App, area: Rect) {
    let index = app.view.visible_slide();
    app.hit_areas.diagrams.clear();
    let Some(slide) = app.deck.slide(index).cloned() else { return };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::LightBlue))
        .title(Span::styled(
            format!(" {} ", slide.title),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let visible: Vec<_> = slide.diagrams.iter().filter(|d| app.board.is_visible(&d.id)).collect();
    let (text_area, diagram_area) = if visible.is_empty() {
        (inner, None)
    } else {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
            .split(inner);
        (chunks[0], Some(chunks[1]))
    };

    f.render_widget(Paragraph::new(slide_text(app, &slide, index)).wrap(Wrap { trim: false }), text_area);

    if let Some(area) = diagram_area {
        let constraints: Vec<Constraint> =
            visible.iter().map(|_| Constraint::Ratio(1, u32::try_from(visible.len()).unwrap_or(1))).collect();
        let cells = Layout::default().direction(Direction::Vertical).constraints(constraints).split(area);
        let focused = app.focused_diagram.and_then(|i| slide.diagrams.get(i)).map(|d| d.id.clone());
        for (reference, cell) in visible.iter().zip(cells.iter()) {
            let Some(slot) = app.board.slot(&reference.id) else { continue };
            let is_focused = app.mode == AppMode::Diagram && focused.as_ref() == Some(&reference.id);
            let block = create_titled_block(reference.id.as_str(), is_focused);
            if let Some(hit) = draw_diagram(f, slot, block, *cell) {
                app.hit_areas.diagrams.push(hit);
            }
        }
    }
}

fn slide_text(app: &App, slide: &Slide, index: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if let Some(subtitle) = &slide.subtitle {
        lines.push(Line::from(Span::styled(subtitle.clone(), Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC))));
        lines.push(Line::default());
    }

    let reveal = app.navigator.reveal(index);
    for (i, item) in slide.items.iter().enumerate() {
        if !reveal.is_some_and(|r| r.is_visible(i)) {
            continue;
        }
        let line = match item.kind {
            ItemKind::Regular => Line::from(vec![
                Span::styled("• ", Style::default().fg(Color::Yellow)),
                Span::raw(item.text.clone()),
            ]),
            ItemKind::Explanation => Line::from(Span::styled(
                format!("  {}", item.text),
                Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
            )),
        };
        lines.push(line);
    }

    for (i, paragraph) in slide.paragraphs.iter().enumerate() {
        if app.view.paragraph_visible(index, i) {
            lines.push(Line::default());
            lines.push(Line::from(paragraph.clone()));
        }
    }

    if !slide.profiles.is_empty() {
        lines.push(Line::default());
        let animated = app.view.profiles_animated(index);
        for profile in &slide.profiles {
            let name_style = if animated {
                Style::default().fg(Color::LightMagenta).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let marker = if animated { "◆ " } else { "◇ " };
            lines.push(Line::from(vec![
                Span::styled(marker, name_style),
                Span::styled(profile.name.clone(), name_style),
                Span::styled(format!("  {}", profile.role), Style::default().fg(Color::Gray)),
            ]));
        }
    }
    lines
}
