//! Field rendering utilities for host widgets

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Everything needed to draw one input box
pub struct FieldView<'a> {
    pub label: &'a str,
    pub value: &'a str,
    pub placeholder: &'a str,
    pub error: &'a str,
    pub is_focused: bool,
    pub is_multiline: bool,
    /// Border color while focused
    pub accent: Color,
    /// Right-aligned text in the bottom border (e.g. a counter)
    pub footer: Option<String>,
}

/// Border color: error wins over focus
pub fn border_color(error: &str, is_focused: bool, accent: Color) -> Color {
    if !error.is_empty() {
        Color::Red
    } else if is_focused {
        accent
    } else {
        Color::DarkGray
    }
}

/// Draw an input box with its error line underneath
pub fn draw_field(frame: &mut Frame, area: Rect, view: &FieldView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Input box
            Constraint::Length(1), // Error line
        ])
        .split(area);

    let border = border_color(view.error, view.is_focused, view.accent);
    let border_style = Style::default().fg(border);
    let cursor = if view.is_focused { "▌" } else { "" };
    let cursor_style = Style::default().fg(view.accent);

    let content = if view.value.is_empty() && !view.is_focused {
        Paragraph::new(Line::from(Span::styled(
            view.placeholder,
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )))
    } else if view.is_multiline {
        let mut lines: Vec<Line> = view
            .value
            .split('\n')
            .map(|l| Line::from(l.to_string()))
            .collect();
        if view.is_focused {
            if let Some(last) = lines.last_mut() {
                last.spans.push(Span::styled(cursor, cursor_style));
            }
        }
        Paragraph::new(lines)
    } else {
        Paragraph::new(Line::from(vec![
            Span::raw(view.value),
            Span::styled(cursor, cursor_style),
        ]))
    };

    let mut title = vec![Span::raw(format!(" {} ", view.label))];
    if !view.error.is_empty() {
        title.push(Span::styled(
            "! ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }

    let mut block = Block::default()
        .title(Line::from(title))
        .borders(Borders::ALL)
        .border_style(border_style);
    if let Some(footer) = &view.footer {
        block = block.title_bottom(Line::from(format!(" {footer} ")).right_aligned());
    }

    frame.render_widget(content.wrap(Wrap { trim: false }).block(block), chunks[0]);

    if !view.error.is_empty() {
        let error = Paragraph::new(Line::from(Span::styled(
            format!(" ! {}", view.error),
            Style::default().fg(Color::Red),
        )));
        frame.render_widget(error, chunks[1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_border_color_prefers_error() {
        assert_eq!(border_color("bad", true, Color::Blue), Color::Red);
        assert_eq!(border_color("bad", false, Color::Blue), Color::Red);
    }

    #[test]
    fn test_border_color_focus_uses_accent() {
        assert_eq!(border_color("", true, Color::Green), Color::Green);
        assert_eq!(border_color("", false, Color::Green), Color::DarkGray);
    }
}
