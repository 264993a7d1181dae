use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::centered_rect;
use super::status_bar::render_status_bar;

/// A bordered box with some text and a key hint bar. Used for every
/// yes/no and easier/harder question.
pub fn render_prompt(frame: &mut Frame, title: &str, body: Vec<Line>, hints: &[(&str, &str)]) {
    let area = frame.area();

    let width = 72u16.min(area.width.saturating_sub(4));
    let height = (body.len() as u16 + 6).min(area.height.saturating_sub(2));
    let prompt_area = centered_rect(width, height, area);

    let block = Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    frame.render_widget(Clear, prompt_area);
    frame.render_widget(block, prompt_area);

    let inner = prompt_area.inner(Margin::new(2, 1));
    let layout = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .split(inner);

    let text = Paragraph::new(body)
        .style(Style::default().fg(Color::White))
        .wrap(Wrap { trim: false });
    frame.render_widget(text, layout[0]);

    render_status_bar(frame, layout[2], hints);
}
