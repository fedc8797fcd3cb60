//! Text field input handling utilities.
//!
//! Cursor positions are counted in characters, so names with accents or
//! CJK text edit correctly.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Helper for the single-line editors (inline rename, prompts).
pub struct TextField;

impl TextField {
    /// Byte offset of character `cursor` in `input`
    fn byte_index(input: &str, cursor: usize) -> usize {
        input
            .char_indices()
            .nth(cursor)
            .map(|(i, _)| i)
            .unwrap_or(input.len())
    }

    /// Handle backspace key - delete character before cursor
    #[inline]
    pub fn backspace(input: &mut String, cursor: &mut usize) {
        if *cursor > 0 {
            *cursor -= 1;
            let at = Self::byte_index(input, *cursor);
            input.remove(at);
        }
    }

    /// Handle delete key - delete character at cursor
    #[inline]
    pub fn delete(input: &mut String, cursor: usize) {
        if cursor < input.chars().count() {
            let at = Self::byte_index(input, cursor);
            input.remove(at);
        }
    }

    #[inline]
    pub fn left(cursor: &mut usize) {
        *cursor = cursor.saturating_sub(1);
    }

    #[inline]
    pub fn right(input: &str, cursor: &mut usize) {
        if *cursor < input.chars().count() {
            *cursor += 1;
        }
    }

    #[inline]
    pub fn home(cursor: &mut usize) {
        *cursor = 0;
    }

    #[inline]
    pub fn end(input: &str, cursor: &mut usize) {
        *cursor = input.chars().count();
    }

    /// Handle character input - insert at cursor
    #[inline]
    pub fn insert_char(input: &mut String, cursor: &mut usize, c: char) {
        let at = Self::byte_index(input, *cursor);
        input.insert(at, c);
        *cursor += 1;
    }

    /// Apply an editing key. Returns false when the key is not an editing key
    /// (Enter, Esc, Tab and friends are left to the caller).
    pub fn handle_key(input: &mut String, cursor: &mut usize, key: &KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Backspace => Self::backspace(input, cursor),
            KeyCode::Delete => Self::delete(input, *cursor),
            KeyCode::Left => Self::left(cursor),
            KeyCode::Right => Self::right(input, cursor),
            KeyCode::Home => Self::home(cursor),
            KeyCode::End => Self::end(input, cursor),
            KeyCode::Char('a') if ctrl => Self::home(cursor),
            KeyCode::Char('e') if ctrl => Self::end(input, cursor),
            KeyCode::Char('u') if ctrl => {
                input.clear();
                *cursor = 0;
            }
            KeyCode::Char(c) if !ctrl => Self::insert_char(input, cursor, c),
            _ => return false,
        }
        true
    }
}
