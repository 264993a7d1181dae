use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use tracing::debug;

use crate::event::{Event, EventHandler};
use crate::track::{self, Answer, ExerciseEntry, Placement, Ranker, TrackConfig};
use crate::ui::entry_form::{self, EntryForm, FormAction};
use crate::ui::prompt::render_prompt;

pub enum Screen {
    Form(EntryForm),
    Review {
        form: EntryForm,
        entry: ExerciseEntry,
    },
    Rank {
        entry: ExerciseEntry,
        ranker: Ranker,
    },
    Placement {
        entry: ExerciseEntry,
        ranker: Ranker,
        position: usize,
    },
    Done,
}

/// Interactive placement of one exercise in the track's `config.json`.
pub struct App {
    pub screen: Screen,
    pub exercise: String,
    pub track: TrackConfig,
    pub should_quit: bool,
    /// Set once the entry has been inserted into `track`.
    pub placed: Option<String>,
}

impl App {
    pub fn new(exercise: &str, track: TrackConfig) -> Self {
        Self {
            screen: Screen::Form(EntryForm::new()),
            exercise: exercise.to_string(),
            track,
            should_quit: false,
            placed: None,
        }
    }

    pub async fn run(
        &mut self,
        terminal: &mut ratatui::DefaultTerminal,
        events: &mut EventHandler,
    ) -> Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            match events.next().await? {
                Event::Key(key) => self.handle_key(key)?,
                Event::Resize => {}
            }
        }
        Ok(())
    }

    fn render(&self, frame: &mut Frame) {
        match &self.screen {
            Screen::Form(form) => entry_form::render_entry_form(frame, form, &self.exercise),
            Screen::Review { entry, .. } => {
                let mut body: Vec<Line> = vec![Line::from("You have configured this exercise as follows:")];
                body.extend(
                    entry
                        .to_pretty_json()
                        .lines()
                        .map(|l| Line::styled(l.to_string(), Style::default().fg(Color::Gray))),
                );
                body.push(Line::from(""));
                body.push(Line::from("Is this correct?"));
                render_prompt(frame, "Review", body, &[("y", "Yes"), ("n", "Edit"), ("Esc", "Skip config")]);
            }
            Screen::Rank { ranker, .. } => {
                let other = ranker.probe().map_or("?", |idx| self.track.slug_at(idx));
                let body = vec![Line::from(vec![
                    Span::raw(format!("Is {} easier or harder than ", self.exercise)),
                    Span::styled(
                        other.to_string(),
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("?"),
                ])];
                render_prompt(frame, "Relative difficulty", body, &[("e", "Easier"), ("h", "Harder"), ("Esc", "Skip config")]);
            }
            Screen::Placement { position, .. } => {
                let body = vec![
                    Line::from(format!(
                        "You have indicated that {}",
                        self.track.describe_position(&self.exercise, *position)
                    )),
                    Line::from(""),
                    Line::from("Is this correct?"),
                ];
                render_prompt(frame, "Placement", body, &[("y", "Yes"), ("n", "Ask again"), ("Esc", "Skip config")]);
            }
            Screen::Done => {}
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return Ok(());
        }

        let screen = std::mem::replace(&mut self.screen, Screen::Done);
        self.screen = match screen {
            Screen::Form(mut form) => match form.handle_key(key) {
                FormAction::None => Screen::Form(form),
                FormAction::Quit => {
                    self.should_quit = true;
                    Screen::Form(form)
                }
                FormAction::Submit => match self.validate(&form) {
                    Ok(entry) => {
                        form.error = None;
                        Screen::Review { form, entry }
                    }
                    Err(e) => {
                        form.error = Some(e.to_string());
                        Screen::Form(form)
                    }
                },
            },
            Screen::Review { form, entry } => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => match self.track.placement(entry.difficulty) {
                    Placement::Sorted => self.finish(|track| track.insert_sorted(&entry), &entry)?,
                    Placement::Ranked(ranker) => Self::rank_or_place(entry, ranker),
                },
                KeyCode::Esc => {
                    self.should_quit = true;
                    Screen::Review { form, entry }
                }
                // Anything but yes goes back to editing
                _ => Screen::Form(form),
            },
            Screen::Rank { entry, mut ranker } => {
                let answer = match key.code {
                    KeyCode::Char('e') | KeyCode::Char('E') => Some(Answer::Easier),
                    KeyCode::Char('h') | KeyCode::Char('H') => Some(Answer::Harder),
                    _ => None,
                };
                match answer {
                    Some(answer) => {
                        debug!(?answer, probe = ?ranker.probe(), "ranking answer");
                        ranker.answer(answer);
                        Self::rank_or_place(entry, ranker)
                    }
                    None => {
                        if key.code == KeyCode::Esc {
                            self.should_quit = true;
                        }
                        Screen::Rank { entry, ranker }
                    }
                }
            }
            Screen::Placement {
                entry,
                mut ranker,
                position,
            } => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    self.finish(|track| track.insert_at(position, &entry), &entry)?
                }
                KeyCode::Esc => {
                    self.should_quit = true;
                    Screen::Placement {
                        entry,
                        ranker,
                        position,
                    }
                }
                _ => {
                    ranker.restart();
                    Self::rank_or_place(entry, ranker)
                }
            },
            Screen::Done => Screen::Done,
        };
        Ok(())
    }

    fn validate(&self, form: &EntryForm) -> Result<ExerciseEntry> {
        let unlocked_by = self.track.parse_unlocked_by(&form.fields[entry_form::UNLOCKED_BY])?;
        let difficulty = track::parse_difficulty(&form.fields[entry_form::DIFFICULTY])?;
        let topics = track::parse_topics(&form.fields[entry_form::TOPICS])?;
        Ok(ExerciseEntry::new(&self.exercise, unlocked_by, difficulty, topics))
    }

    fn rank_or_place(entry: ExerciseEntry, ranker: Ranker) -> Screen {
        match ranker.position() {
            Some(position) => Screen::Placement {
                entry,
                ranker,
                position,
            },
            None => Screen::Rank { entry, ranker },
        }
    }

    fn finish(
        &mut self,
        insert: impl FnOnce(&mut TrackConfig) -> Result<()>,
        entry: &ExerciseEntry,
    ) -> Result<Screen> {
        insert(&mut self.track)?;
        self.placed = Some(entry.slug.clone());
        self.should_quit = true;
        Ok(Screen::Done)
    }
}
