//! Layout components (header, form column, side panels, status bar)

use crate::app::App;
use crate::keymap::Shortcut;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Screen regions
pub struct ScreenLayout {
    pub header: Rect,
    pub form: Rect,
    pub side: Rect,
    pub status: Rect,
}

/// Split the screen into header, form column, side column and status bar
pub fn create_layout(area: Rect) -> ScreenLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(55), // Form
            Constraint::Percentage(45), // Results + architecture
        ])
        .split(rows[1]);

    ScreenLayout {
        header: rows[0],
        form: columns[0],
        side: columns[1],
        status: rows[2],
    }
}

/// Split the form column into one slot per widget plus the button row
pub fn form_slots(area: Rect, heights: [u16; 4], button_height: u16) -> [Rect; 5] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(heights[0]),
            Constraint::Length(heights[1]),
            Constraint::Length(heights[2]),
            Constraint::Length(heights[3]),
            Constraint::Length(button_height),
            Constraint::Min(0),
        ])
        .horizontal_margin(1)
        .split(area);
    [chunks[0], chunks[1], chunks[2], chunks[3], chunks[4]]
}

pub fn draw_header(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            "Micro Frontend Form",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Independent widgets sharing one reactive store",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

/// Draw the status bar: key help on the left, latest message on the right
pub fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let help = format!(
        " Tab: next field | {} | F5: remount | Esc: quit",
        Shortcut::help()
    );

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(40)])
        .split(area);

    frame.render_widget(
        Paragraph::new(Span::styled(help, Style::default().fg(Color::DarkGray))),
        chunks[0],
    );

    if let Some(message) = &app.status_message {
        let color = if app.store.submission().failure().is_some() {
            Color::Red
        } else {
            Color::Yellow
        };
        frame.render_widget(
            Paragraph::new(Span::styled(message.as_str(), Style::default().fg(color)))
                .alignment(Alignment::Right),
            chunks[1],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_covers_screen() {
        let layout = create_layout(Rect::new(0, 0, 100, 40));
        assert_eq!(layout.header.height, 2);
        assert_eq!(layout.status.height, 1);
        assert_eq!(layout.status.y, 39);
        assert_eq!(layout.form.width + layout.side.width, 100);
    }

    #[test]
    fn test_form_slots_follow_heights() {
        let slots = form_slots(Rect::new(0, 0, 50, 40), [4, 4, 4, 8], 3);
        assert_eq!(slots[0].height, 4);
        assert_eq!(slots[3].height, 8);
        assert_eq!(slots[4].height, 3);
        assert_eq!(slots[1].y, slots[0].y + 4);
        assert_eq!(slots[0].x, 1);
    }
}
