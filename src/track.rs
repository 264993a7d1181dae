//! The track's `config.json` and where a new exercise goes in it.
//!
//! Exercises are kept ordered by difficulty. Within a run of equal
//! difficulty the position is found by asking the maintainer a series of
//! easier/harder questions (a binary search driven by [`Ranker`]).

use anyhow::{Context, Result, bail};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const MAX_DIFFICULTY: u8 = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseEntry {
    pub uuid: String,
    pub slug: String,
    pub core: bool,
    pub unlocked_by: Option<String>,
    pub difficulty: u8,
    pub topics: Vec<String>,
}

impl ExerciseEntry {
    pub fn new(slug: &str, unlocked_by: Option<String>, difficulty: u8, topics: Vec<String>) -> Self {
        Self {
            uuid: new_uuid(),
            slug: slug.to_string(),
            core: false,
            unlocked_by,
            difficulty,
            topics,
        }
    }

    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Random (version 4) UUID in its hyphenated form.
pub fn new_uuid() -> String {
    Uuid::new_v4().to_string()
}

/// `config.json`, with every key the tool does not touch kept as-is and in
/// its original order.
#[derive(Debug, Clone)]
pub struct TrackConfig {
    path: PathBuf,
    doc: Map<String, Value>,
}

impl TrackConfig {
    pub fn path_in(track: &Path) -> PathBuf {
        track.join("config.json")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let doc: Map<String, Value> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        if !matches!(doc.get("exercises"), Some(Value::Array(_))) {
            bail!("{} has no exercises list", path.display());
        }
        Ok(Self {
            path: path.to_path_buf(),
            doc,
        })
    }

    pub fn save(&self) -> Result<()> {
        let mut contents =
            serde_json::to_string_pretty(&self.doc).context("Failed to serialize config.json")?;
        contents.push('\n');
        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }

    pub fn exercises(&self) -> &[Value] {
        match self.doc.get("exercises") {
            Some(Value::Array(exercises)) => exercises,
            _ => &[],
        }
    }

    fn exercises_mut(&mut self) -> Result<&mut Vec<Value>> {
        self.doc
            .get_mut("exercises")
            .and_then(Value::as_array_mut)
            .with_context(|| format!("{} has no exercises list", self.path.display()))
    }

    pub fn slug_at(&self, idx: usize) -> &str {
        self.exercises()
            .get(idx)
            .and_then(|ex| ex.get("slug"))
            .and_then(Value::as_str)
            .unwrap_or("?")
    }

    pub fn contains_slug(&self, slug: &str) -> bool {
        (0..self.exercises().len()).any(|idx| self.slug_at(idx) == slug)
    }

    /// How the entry will be placed: directly when no exercise shares its
    /// difficulty, otherwise by ranking within the equal-difficulty run.
    pub fn placement(&self, difficulty: u8) -> Placement {
        let difficulties: Vec<Option<u64>> = self.exercises().iter().map(difficulty_of).collect();
        let target = Some(u64::from(difficulty));

        let Some(first) = difficulties.iter().position(|d| *d == target) else {
            return Placement::Sorted;
        };
        let last = difficulties[first..]
            .iter()
            .position(|d| d.is_some() && *d != target)
            .map_or(difficulties.len(), |offset| first + offset);
        Placement::Ranked(Ranker::new(first, last))
    }

    /// Append and re-sort by difficulty. Exercises without one sort first.
    pub fn insert_sorted(&mut self, entry: &ExerciseEntry) -> Result<()> {
        let value = serde_json::to_value(entry).context("Failed to serialize exercise entry")?;
        let exercises = self.exercises_mut()?;
        exercises.push(value);
        exercises.sort_by_key(|ex| difficulty_of(ex).unwrap_or(0));
        Ok(())
    }

    pub fn insert_at(&mut self, idx: usize, entry: &ExerciseEntry) -> Result<()> {
        let value = serde_json::to_value(entry).context("Failed to serialize exercise entry")?;
        let exercises = self.exercises_mut()?;
        let idx = idx.min(exercises.len());
        exercises.insert(idx, value);
        Ok(())
    }

    /// Human description of inserting `slug` at `idx`.
    pub fn describe_position(&self, slug: &str, idx: usize) -> String {
        if idx == 0 {
            format!("{slug} is the easiest exercise in the track.")
        } else if idx >= self.exercises().len() {
            format!("{slug} is the hardest exercise in the track.")
        } else {
            format!(
                "{slug} fits between {} and {} in difficulty.",
                self.slug_at(idx - 1),
                self.slug_at(idx)
            )
        }
    }

    pub fn parse_unlocked_by(&self, input: &str) -> Result<Option<String>> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(None);
        }
        if !self.contains_slug(input) {
            bail!("{input} is not an existing exercise slug");
        }
        Ok(Some(input.to_string()))
    }
}

fn difficulty_of(exercise: &Value) -> Option<u64> {
    exercise.get("difficulty").and_then(Value::as_u64)
}

pub fn parse_difficulty(input: &str) -> Result<u8> {
    let difficulty: i64 = input
        .trim()
        .parse()
        .with_context(|| format!("{:?} is not a number", input.trim()))?;
    if difficulty <= 0 || difficulty > i64::from(MAX_DIFFICULTY) {
        bail!("difficulty must be > 0 and <= {MAX_DIFFICULTY}");
    }
    Ok(difficulty as u8)
}

pub fn parse_topics(input: &str) -> Result<Vec<String>> {
    let topics: Vec<String> = input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    if topics.is_empty() {
        bail!("must enter at least one topic");
    }
    Ok(topics)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    Sorted,
    Ranked(Ranker),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Easier,
    Harder,
}

/// Binary search over `[first, last)` driven by easier/harder answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ranker {
    first: usize,
    last: usize,
    start: usize,
    end: usize,
}

impl Ranker {
    pub fn new(first: usize, last: usize) -> Self {
        Self {
            first,
            last,
            start: first,
            end: last,
        }
    }

    /// Index of the exercise to compare against next, or `None` once the
    /// position is known.
    pub fn probe(&self) -> Option<usize> {
        (self.start < self.end).then(|| self.start + (self.end - self.start) / 2)
    }

    pub fn answer(&mut self, answer: Answer) {
        let Some(mid) = self.probe() else {
            return;
        };
        match answer {
            Answer::Easier => self.end = mid,
            Answer::Harder => self.start = mid + 1,
        }
    }

    pub fn position(&self) -> Option<usize> {
        self.probe().is_none().then_some(self.start)
    }

    pub fn restart(&mut self) {
        self.start = self.first;
        self.end = self.last;
    }
}
