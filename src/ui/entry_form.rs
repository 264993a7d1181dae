use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::centered_rect;
use super::status_bar::render_status_bar;

const FIELD_COUNT: usize = 3;
const FIELD_LABELS: [&str; FIELD_COUNT] = ["Unlocked by", "Difficulty", "Topics"];
const FIELD_HINTS: [&str; FIELD_COUNT] = [
    "Slug of the exercise that unlocks this one (blank for none)",
    "1 (easiest) to 10 (hardest)",
    "Comma-separated, at least one",
];

pub const UNLOCKED_BY: usize = 0;
pub const DIFFICULTY: usize = 1;
pub const TOPICS: usize = 2;

pub struct EntryForm {
    pub fields: [String; FIELD_COUNT],
    pub active_field: usize,
    pub error: Option<String>,
}

pub enum FormAction {
    None,
    Submit,
    Quit,
}

impl EntryForm {
    pub fn new() -> Self {
        Self {
            fields: Default::default(),
            active_field: 0,
            error: None,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.active_field = (self.active_field + 1) % FIELD_COUNT;
                FormAction::None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.active_field = (self.active_field + FIELD_COUNT - 1) % FIELD_COUNT;
                FormAction::None
            }
            KeyCode::Char(c) => {
                self.fields[self.active_field].push(c);
                FormAction::None
            }
            KeyCode::Backspace => {
                self.fields[self.active_field].pop();
                FormAction::None
            }
            KeyCode::Enter => FormAction::Submit,
            KeyCode::Esc => FormAction::Quit,
            _ => FormAction::None,
        }
    }
}

pub fn render_entry_form(frame: &mut Frame, form: &EntryForm, exercise: &str) {
    let area = frame.area();

    let form_width = 72u16.min(area.width.saturating_sub(4));
    let form_height = 17u16.min(area.height.saturating_sub(2));
    let form_area = centered_rect(form_width, form_height, area);

    let block = Block::default()
        .title(format!(" config.json entry for {exercise} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    frame.render_widget(Clear, form_area);
    frame.render_widget(block, form_area);

    let inner = form_area.inner(Margin::new(2, 1));

    let layout = Layout::vertical([
        Constraint::Length(1), // intro
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(1), // validation error
        Constraint::Length(1),
        Constraint::Length(1), // status bar
    ])
    .split(inner);

    let intro = Paragraph::new("Describe where this exercise sits in the track:")
        .style(Style::default().fg(Color::White));
    frame.render_widget(intro, layout[0]);

    for i in 0..FIELD_COUNT {
        render_field(frame, layout[i + 2], i, form);
    }

    if let Some(ref error) = form.error {
        let error = Paragraph::new(format!("Problem: {error}")).style(Style::default().fg(Color::Red));
        frame.render_widget(error, layout[5]);
    }

    render_status_bar(
        frame,
        layout[7],
        &[
            ("Tab/↓", "Next"),
            ("Shift+Tab/↑", "Prev"),
            ("Enter", "Review"),
            ("Esc", "Skip config"),
        ],
    );
}

fn render_field(frame: &mut Frame, area: Rect, index: usize, form: &EntryForm) {
    let is_active = form.active_field == index;
    let label_style = if is_active {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };

    let layout = Layout::vertical([Constraint::Length(1), Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let label = Line::from(vec![
        Span::styled(FIELD_LABELS[index], label_style),
        Span::styled(format!("  {}", FIELD_HINTS[index]), Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(label), layout[0]);

    let cursor = if is_active { "▎" } else { "" };
    let input = Line::from(vec![
        Span::styled(
            format!(" {}", form.fields[index]),
            Style::default().fg(if is_active { Color::White } else { Color::Gray }),
        ),
        Span::styled(cursor, Style::default().fg(Color::Cyan)),
    ]);
    let input = Paragraph::new(input).style(Style::default().bg(if is_active {
        Color::DarkGray
    } else {
        Color::Black
    }));
    frame.render_widget(input, layout[1]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(form: &mut EntryForm, code: KeyCode) -> FormAction {
        form.handle_key(KeyEvent::from(code))
    }

    #[test]
    fn typing_goes_to_the_active_field() {
        let mut form = EntryForm::new();
        press(&mut form, KeyCode::Char('l'));
        press(&mut form, KeyCode::Tab);
        press(&mut form, KeyCode::Char('4'));
        press(&mut form, KeyCode::Char('2'));
        press(&mut form, KeyCode::Backspace);

        assert_eq!(form.fields[UNLOCKED_BY], "l");
        assert_eq!(form.fields[DIFFICULTY], "4");
        assert_eq!(form.fields[TOPICS], "");
    }

    #[test]
    fn navigation_wraps() {
        let mut form = EntryForm::new();
        press(&mut form, KeyCode::Up);
        assert_eq!(form.active_field, TOPICS);
        press(&mut form, KeyCode::Down);
        assert_eq!(form.active_field, UNLOCKED_BY);
        press(&mut form, KeyCode::BackTab);
        assert_eq!(form.active_field, TOPICS);
    }

    #[test]
    fn enter_and_escape() {
        let mut form = EntryForm::new();
        assert!(matches!(press(&mut form, KeyCode::Enter), FormAction::Submit));
        assert!(matches!(press(&mut form, KeyCode::Esc), FormAction::Quit));
        assert!(matches!(press(&mut form, KeyCode::F(1)), FormAction::None));
    }
}
