use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use macroquad::prelude::*;
use serde::{Deserialize, Serialize};

// Frames per score point.
const FRAMES_PER_POINT: i32 = 4;
// Entries kept in the persistent table.
const TABLE_SIZE: usize = 10;

pub const SCORE_FILE: &str = "scores.json";

// Running score of the current session, derived from the frame counter.
pub struct Score {
    value: i32,
}

impl Score {
    pub fn new() -> Self {
        Self { value: 0 }
    }

    pub fn update(&mut self, frame: i32) {
        self.value = frame / FRAMES_PER_POINT;
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn draw(&self) {
        draw_text(&format!("Score: {}", self.value), 20.0, 40.0, 32.0, WHITE);
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub value: i32,
}

// Best runs across sessions, stored as a JSON array on disk.
#[derive(Clone, Debug, Default)]
pub struct HighScores {
    entries: Vec<ScoreEntry>,
}

impl HighScores {
    // A missing file is a fresh table, any other failure is reported.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScoreIoError> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(Self {
                entries: serde_json::from_str(&text)?,
            }),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ScoreIoError::Io(err)),
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ScoreIoError> {
        let text = serde_json::to_string_pretty(&self.entries)?;
        fs::write(path, text)?;
        Ok(())
    }

    // Inserts when the run makes the cut. Returns whether it did.
    pub fn record(&mut self, name: &str, value: i32) -> bool {
        if !self.qualifies(value) {
            return false;
        }
        self.entries.push(ScoreEntry {
            name: name.to_string(),
            value,
        });
        self.entries.sort_by(|a, b| b.value.cmp(&a.value));
        self.entries.truncate(TABLE_SIZE);
        true
    }

    pub fn qualifies(&self, value: i32) -> bool {
        self.entries.len() < TABLE_SIZE
            || self.entries.last().map_or(false, |e| value > e.value)
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn best(&self) -> Option<&ScoreEntry> {
        self.entries.first()
    }
}

#[derive(Debug)]
pub enum ScoreIoError {
    Io(io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for ScoreIoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreIoError::Io(err) => write!(f, "score file io error: {}", err),
            ScoreIoError::Json(err) => write!(f, "score file parse error: {}", err),
        }
    }
}

impl std::error::Error for ScoreIoError {}

impl From<io::Error> for ScoreIoError {
    fn from(err: io::Error) -> Self {
        ScoreIoError::Io(err)
    }
}

impl From<serde_json::Error> for ScoreIoError {
    fn from(err: serde_json::Error) -> Self {
        ScoreIoError::Json(err)
    }
}
