// gridmark/src/annotations.rs

use crate::grid::Cell;
use log::trace;
use std::collections::BTreeMap;

/// Longest note kept, in characters.
pub const MAX_NOTE_LENGTH: usize = 512;
/// Characters of a note shown inside a grid cell before it is elided.
pub const DISPLAY_NOTE_LENGTH: usize = 40;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Annotation {
    pub cell: Cell,
    pub text: String,
}

impl Annotation {
    /// Short form of the note for cell display.
    pub fn preview(&self) -> String {
        preview(&self.text, DISPLAY_NOTE_LENGTH)
    }

    pub fn is_truncated_in_preview(&self) -> bool {
        self.text.chars().count() > DISPLAY_NOTE_LENGTH
    }
}

pub fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let mut short: String = text.chars().take(max_chars).collect();
        short.push_str("...");
        short
    } else {
        text.to_string()
    }
}

/// Sparse notes keyed by cell. Iteration is always in (tab, row, col) order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnnotationStore {
    notes: BTreeMap<Cell, String>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a note, or clears the cell when the normalized text is empty.
    pub fn set(&mut self, cell: Cell, text: &str) {
        let text = Self::normalize(text);
        if text.is_empty() {
            self.clear(cell);
            return;
        }
        trace!("Set note at {:?}: {:?}", cell, text);
        self.notes.insert(cell, text);
    }

    pub fn clear(&mut self, cell: Cell) {
        if self.notes.remove(&cell).is_some() {
            trace!("Cleared note at {:?}", cell);
        }
    }

    pub fn clear_all(&mut self) {
        self.notes.clear();
    }

    pub fn get(&self, cell: Cell) -> Option<&str> {
        self.notes.get(&cell).map(String::as_str)
    }

    pub fn all(&self) -> Vec<Annotation> {
        self.iter()
            .map(|(cell, text)| Annotation {
                cell,
                text: text.to_string(),
            })
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Cell, &str)> {
        self.notes.iter().map(|(cell, text)| (*cell, text.as_str()))
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    fn normalize(text: &str) -> String {
        let single_line = text
            .trim()
            .split(['\r', '\n'])
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        single_line.chars().take(MAX_NOTE_LENGTH).collect::<String>().trim_end().to_string()
    }
}
