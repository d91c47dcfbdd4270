//! Type-safe key bindings.
//!
//! A [`Binding`] groups one or more [`KeyPress`]es under a help entry. Component
//! key maps are plain structs of bindings that implement [`KeyMap`] so a help
//! view can list them.
//!
//! ```rust
//! use bubbletea_typeahead::key::{matches_binding, Binding, KeyPress};
//! use crossterm::event::{KeyCode, KeyModifiers};
//!
//! let paste = Binding::new(vec![(KeyCode::Char('v'), KeyModifiers::CONTROL)])
//!     .with_help("ctrl+v", "paste");
//!
//! let press = KeyPress::from((KeyCode::Char('v'), KeyModifiers::CONTROL));
//! assert!(matches_binding(&press, &paste));
//! ```

use bubbletea_rs::KeyMsg;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A single key combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyPress {
    /// The key itself.
    pub code: KeyCode,
    /// Held modifiers.
    pub mods: KeyModifiers,
}

impl From<KeyCode> for KeyPress {
    fn from(code: KeyCode) -> Self {
        Self {
            code,
            mods: KeyModifiers::NONE,
        }
    }
}

impl From<(KeyCode, KeyModifiers)> for KeyPress {
    fn from((code, mods): (KeyCode, KeyModifiers)) -> Self {
        Self { code, mods }
    }
}

impl From<&KeyMsg> for KeyPress {
    fn from(msg: &KeyMsg) -> Self {
        Self {
            code: msg.key,
            mods: msg.modifiers,
        }
    }
}

impl From<&KeyEvent> for KeyPress {
    fn from(event: &KeyEvent) -> Self {
        Self {
            code: event.code,
            mods: event.modifiers,
        }
    }
}

/// Help text attached to a binding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Help {
    /// Short rendering of the keys, e.g. `"↓"`.
    pub key: String,
    /// What the binding does.
    pub desc: String,
}

/// A set of keys that trigger the same action.
#[derive(Debug, Clone, Default)]
pub struct Binding {
    keys: Vec<KeyPress>,
    help: Help,
    disabled: bool,
}

impl Binding {
    /// Creates a binding from anything convertible into key presses.
    pub fn new<K: Into<KeyPress>>(keys: Vec<K>) -> Self {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            help: Help::default(),
            disabled: false,
        }
    }

    /// Attaches help text.
    pub fn with_help(mut self, key: impl Into<String>, desc: impl Into<String>) -> Self {
        self.help = Help {
            key: key.into(),
            desc: desc.into(),
        };
        self
    }

    /// The keys in this binding.
    pub fn keys(&self) -> &[KeyPress] {
        &self.keys
    }

    /// The help entry.
    pub fn help(&self) -> &Help {
        &self.help
    }

    /// Whether the binding responds to input and shows in help.
    pub fn enabled(&self) -> bool {
        !self.disabled && !self.keys.is_empty()
    }

    /// Enables or disables the binding.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.disabled = !enabled;
    }

    /// Returns true if `press` is one of this binding's keys.
    ///
    /// Shift is ignored for character keys since the terminal already encodes
    /// it in the character's case.
    pub fn matches(&self, press: &KeyPress) -> bool {
        if !self.enabled() {
            return false;
        }
        self.keys.iter().any(|k| {
            if k.code != press.code {
                return false;
            }
            match press.code {
                KeyCode::Char(_) => {
                    k.mods.difference(KeyModifiers::SHIFT) == press.mods.difference(KeyModifiers::SHIFT)
                }
                _ => k.mods == press.mods,
            }
        })
    }
}

/// Returns true if `press` triggers `binding`.
pub fn matches_binding(press: &KeyPress, binding: &Binding) -> bool {
    binding.matches(press)
}

/// Implemented by component key maps so help views can render them.
pub trait KeyMap {
    /// Bindings shown in the compact help line.
    fn short_help(&self) -> Vec<&Binding>;
    /// Bindings shown in the expanded help, grouped in columns.
    fn full_help(&self) -> Vec<Vec<&Binding>>;
}
