//! Results and architecture panels

use crate::app::App;
use crate::state::{country_name, FieldId, SubmissionState, SubmittedForm};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

/// Widgets listed in the architecture panel: (name, component model, color)
const ARCHITECTURE: &[(&str, &str, Color)] = &[
    ("Text Input", "host widget", Color::Blue),
    ("Email Input", "host widget", Color::Green),
    ("Select Input", "island (mounted via adapter)", Color::LightRed),
    ("TextArea Input", "host widget", Color::Magenta),
];

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(8),    // Results
            Constraint::Length(8), // Architecture
        ])
        .split(area);

    draw_results(frame, chunks[0], app);
    draw_architecture(frame, chunks[1]);
}

fn draw_results(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Form Results ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match app.store.submission() {
        SubmissionState::Submitted(SubmittedForm { receipt, data }) => {
            let label = Style::default().fg(Color::DarkGray);
            let mut lines = vec![
                Line::from(Span::styled(
                    "Form Submitted Successfully!",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from("Thank you for testing the micro frontend form."),
                Line::from(""),
            ];
            for field in FieldId::ALL {
                let value = match field {
                    FieldId::Country => country_name(&data.country)
                        .unwrap_or(data.country.as_str())
                        .to_string(),
                    _ => data.get(field).to_string(),
                };
                lines.push(Line::from(Span::styled(field.label(), label)));
                lines.push(Line::from(format!("  {value}")));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!(
                    "Receipt {} at {}",
                    receipt.id,
                    receipt.submitted_at.format("%Y-%m-%d %H:%M:%S UTC")
                ),
                label,
            )));
            frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
        }
        SubmissionState::Submitting => {
            let ratio = app.submit_progress().unwrap_or(0.0);
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(1), Constraint::Length(1)])
                .split(inner);
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "Submitting...",
                    Style::default().fg(Color::Yellow),
                )),
                rows[0],
            );
            frame.render_widget(
                Gauge::default()
                    .gauge_style(Style::default().fg(Color::Cyan))
                    .ratio(ratio.clamp(0.0, 1.0)),
                rows[1],
            );
        }
        SubmissionState::Failed(message) => {
            let lines = vec![
                Line::from(Span::styled(
                    "Submission failed",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
                Line::from(message),
                Line::from(""),
                Line::from(Span::styled(
                    "Fix the problem and submit again",
                    Style::default().fg(Color::DarkGray),
                )),
            ];
            frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
        }
        SubmissionState::Idle => {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "Complete and submit the form to see results here",
                    Style::default().fg(Color::DarkGray),
                ))
                .wrap(Wrap { trim: false }),
                inner,
            );
        }
    }
}

fn draw_architecture(frame: &mut Frame, area: Rect) {
    let mut lines: Vec<Line> = ARCHITECTURE
        .iter()
        .map(|(name, model, color)| {
            Line::from(vec![
                Span::styled("● ", Style::default().fg(*color)),
                Span::styled(*name, Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(format!(": {model}")),
            ])
        })
        .collect();
    lines.push(Line::from(Span::styled(
        "Each widget keeps its own state and talks only through the store",
        Style::default().fg(Color::DarkGray),
    )));

    let block = Block::default()
        .title(" Architecture ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }).block(block), area);
}
