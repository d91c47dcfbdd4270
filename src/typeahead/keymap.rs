//! Key bindings for the typeahead.
//!
//! Keys fall into two groups. Semantic keys (escape, the arrows, enter, tab,
//! backspace) are classified into a [`KeyKind`] and drive the interaction
//! table. Editing keys move the cursor or change the field text and otherwise
//! count as a plain text edit.
//!
//! ```rust
//! use bubbletea_typeahead::key::{KeyMap, KeyPress};
//! use bubbletea_typeahead::typeahead::{KeyKind, TypeaheadKeyMap};
//! use crossterm::event::KeyCode;
//!
//! let keymap = TypeaheadKeyMap::default();
//! assert_eq!(keymap.classify(&KeyPress::from(KeyCode::Tab)), KeyKind::Accept);
//! assert!(!keymap.short_help().is_empty());
//! ```

use super::interaction::KeyKind;
use crate::key::{self, Binding, KeyPress};
use crossterm::event::{KeyCode, KeyModifiers};

/// Key bindings for the text field and the menu.
#[derive(Debug, Clone)]
pub struct TypeaheadKeyMap {
    /// Close the dropdown or leave the menu.
    pub escape: Binding,
    /// Enter the menu or move down it.
    pub next: Binding,
    /// Move up the menu.
    pub prev: Binding,
    /// Commit the typed text or the focused item.
    pub commit: Binding,
    /// Commit the typed text and keep typing.
    pub accept: Binding,
    /// Delete backward; on an empty field, remove the last tag.
    pub remove: Binding,
    /// Delete the char under the cursor.
    pub delete_forward: Binding,
    /// Move the cursor right.
    pub character_forward: Binding,
    /// Move the cursor left.
    pub character_backward: Binding,
    /// Move to the start of the field.
    pub line_start: Binding,
    /// Move to the end of the field.
    pub line_end: Binding,
    /// Paste from the clipboard.
    pub paste: Binding,
}

impl Default for TypeaheadKeyMap {
    fn default() -> Self {
        Self {
            escape: Binding::new(vec![KeyCode::Esc]).with_help("esc", "close"),
            next: Binding::new(vec![KeyCode::Down]).with_help("↓", "next"),
            prev: Binding::new(vec![KeyCode::Up]).with_help("↑", "previous"),
            commit: Binding::new(vec![KeyCode::Enter]).with_help("enter", "select"),
            accept: Binding::new(vec![KeyCode::Tab]).with_help("tab", "add"),
            remove: Binding::new(vec![
                KeyPress::from(KeyCode::Backspace),
                KeyPress::from((KeyCode::Char('h'), KeyModifiers::CONTROL)),
            ])
            .with_help("backspace", "remove"),
            delete_forward: Binding::new(vec![
                KeyPress::from(KeyCode::Delete),
                KeyPress::from((KeyCode::Char('d'), KeyModifiers::CONTROL)),
            ])
            .with_help("del", "delete"),
            character_forward: Binding::new(vec![
                KeyPress::from(KeyCode::Right),
                KeyPress::from((KeyCode::Char('f'), KeyModifiers::CONTROL)),
            ])
            .with_help("→", "right"),
            character_backward: Binding::new(vec![
                KeyPress::from(KeyCode::Left),
                KeyPress::from((KeyCode::Char('b'), KeyModifiers::CONTROL)),
            ])
            .with_help("←", "left"),
            line_start: Binding::new(vec![
                KeyPress::from(KeyCode::Home),
                KeyPress::from((KeyCode::Char('a'), KeyModifiers::CONTROL)),
            ])
            .with_help("home", "start"),
            line_end: Binding::new(vec![
                KeyPress::from(KeyCode::End),
                KeyPress::from((KeyCode::Char('e'), KeyModifiers::CONTROL)),
            ])
            .with_help("end", "end"),
            paste: Binding::new(vec![(KeyCode::Char('v'), KeyModifiers::CONTROL)])
                .with_help("ctrl+v", "paste"),
        }
    }
}

impl TypeaheadKeyMap {
    /// What `press` means to the interaction table.
    pub fn classify(&self, press: &KeyPress) -> KeyKind {
        if self.escape.matches(press) {
            KeyKind::Escape
        } else if self.next.matches(press) {
            KeyKind::Next
        } else if self.prev.matches(press) {
            KeyKind::Prev
        } else if self.commit.matches(press) {
            KeyKind::Commit
        } else if self.accept.matches(press) {
            KeyKind::Accept
        } else if self.remove.matches(press) {
            KeyKind::Remove
        } else {
            KeyKind::Other
        }
    }
}

impl key::KeyMap for TypeaheadKeyMap {
    fn short_help(&self) -> Vec<&Binding> {
        vec![&self.next, &self.commit, &self.accept, &self.escape]
    }

    fn full_help(&self) -> Vec<Vec<&Binding>> {
        vec![
            vec![&self.next, &self.prev, &self.commit, &self.escape],
            vec![&self.accept, &self.remove, &self.paste],
            vec![
                &self.character_backward,
                &self.character_forward,
                &self.line_start,
                &self.line_end,
                &self.delete_forward,
            ],
        ]
    }
}
