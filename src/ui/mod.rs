//! UI module for rendering the TUI

mod components;
pub mod fields;
pub mod island;
mod layout;
mod results;

use crate::app::{App, Focus};
use crate::state::FieldId;
use crate::ui::fields::FieldWidget;
use components::{render_button, BUTTON_HEIGHT};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Rows reserved for the country island (box + error line)
const ISLAND_HEIGHT: u16 = 4;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let screen = layout::create_layout(frame.area());

    layout::draw_header(frame, screen.header);
    draw_form(frame, screen.form, app);
    results::draw(frame, screen.side, app);
    layout::draw_status_bar(frame, screen.status, app);
}

fn draw_form(frame: &mut Frame, area: Rect, app: &App) {
    let slots = layout::form_slots(
        area,
        [
            app.name_input.height(),
            app.email_input.height(),
            ISLAND_HEIGHT,
            app.message_input.height(),
        ],
        BUTTON_HEIGHT,
    );

    app.name_input.render(frame, slots[0]);
    app.email_input.render(frame, slots[1]);
    draw_island(frame, slots[2], app);
    app.message_input.render(frame, slots[3]);
    draw_buttons(frame, slots[4], app);
}

/// Size the island's container to its slot and copy its contents over
fn draw_island(frame: &mut Frame, area: Rect, app: &App) {
    if !app.country_site.is_mounted() {
        let block = Block::default()
            .title(format!(" {} ", FieldId::Country.label()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let placeholder = Paragraph::new("Widget not mounted")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(
            placeholder,
            Rect {
                height: area.height.min(3),
                ..area
            },
        );
        return;
    }
    let container = app.country_site.container();
    container.resize(area.width, area.height);
    container.blit(frame.buffer_mut(), area);
}

fn draw_buttons(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(area);

    let submitting = app.store.submission().is_submitting();
    let label = if submitting {
        "Submitting..."
    } else {
        "Submit Form"
    };
    render_button(
        frame,
        chunks[0],
        label,
        app.focus == Focus::Submit,
        app.controller.can_submit(),
        Color::Cyan,
    );
    render_button(
        frame,
        chunks[1],
        "Reset",
        app.focus == Focus::Reset,
        true,
        Color::Yellow,
    );
}
