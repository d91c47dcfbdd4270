#![warn(missing_docs)]

//! # bubbletea-typeahead
//!
//! An autocomplete and tag-input component for [bubbletea-rs](https://github.com/joshka/bubbletea-rs)
//! applications.
//!
//! ## Overview
//!
//! The typeahead keeps a live-filtered list of suggestions while the user types
//! and produces either a single value or an ordered list of values. Suggestions
//! come from a finite list or an asynchronous stream, as plain strings or as
//! `{id, name}` records. Like every bubbletea component it follows the Elm
//! Architecture with `init()`, `update()` and `view()`.
//!
//! ## Features
//!
//! - **Debounced matching**: only the text that stays put for `typeDelay`
//!   triggers a filter pass, and only the latest pass is published
//! - **Accent-insensitive** substring matching
//! - **Streaming sources** with values queued until the candidates arrive
//! - **Single, multi and complex modes**, with or without free text
//! - **Form binding** through the [`typeahead::ValueAccessor`] trait
//!
//! ## Example
//!
//! ```rust
//! use bubbletea_typeahead::prelude::*;
//! use bubbletea_rs::{Cmd, Model as BubbleTeaModel, Msg};
//!
//! struct App {
//!     fruit: Typeahead,
//! }
//!
//! impl BubbleTeaModel for App {
//!     fn init() -> (Self, Option<Cmd>) {
//!         let source = CandidateSource::from_list(["Apple", "Banana", "Cherry"]);
//!         let config = TypeaheadConfig::new().with_multi(true).with_placeholder("Fruit...");
//!         let mut fruit = Typeahead::new(config, source);
//!         let cmd = fruit.init();
//!         fruit.focus();
//!         (Self { fruit }, cmd)
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Option<Cmd> {
//!         self.fruit.update(msg)
//!     }
//!
//!     fn view(&self) -> String {
//!         self.fruit.view()
//!     }
//! }
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events (debounce triggers, recomputes, stream
//! completion, deferred work) and never installs a subscriber.

pub mod error;
pub mod key;
pub mod normalize;
pub mod typeahead;

use bubbletea_rs::Cmd;

/// Core trait for components that support focus management.
///
/// - `focus()` sets the focused state and may return a command.
/// - `blur()` unsets it and runs whatever cleanup leaving focus implies.
/// - `focused()` reports the current state.
///
/// ```rust
/// use bubbletea_typeahead::prelude::*;
///
/// let mut typeahead = Typeahead::new(TypeaheadConfig::new(), CandidateSource::from_list(["a"]));
/// assert!(!typeahead.focused());
/// typeahead.focus();
/// assert!(typeahead.focused());
/// typeahead.blur();
/// assert!(!typeahead.focused());
/// ```
pub trait Component {
    /// Sets the component to focused state.
    fn focus(&mut self) -> Option<Cmd>;

    /// Sets the component to blurred (unfocused) state.
    fn blur(&mut self);

    /// Returns the current focus state of the component.
    fn focused(&self) -> bool;
}

pub use error::{Result, TypeaheadError};
pub use key::{matches_binding, Binding, Help as KeyHelp, KeyMap, KeyPress};
pub use normalize::normalize;
pub use typeahead::{
    Candidate, CandidateSender, CandidateSource, Model as Typeahead, Selection, TypeaheadConfig,
    TypeaheadKeyMap, TypeaheadSettings, TypeaheadStyles, ValueAccessor,
};

/// Prelude module for convenient imports.
///
/// ```rust
/// use bubbletea_typeahead::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Result, TypeaheadError};
    pub use crate::key::{matches_binding, Binding, KeyMap, KeyPress};
    pub use crate::typeahead::{
        Candidate, CandidateSender, CandidateSource, FocusMsg, PointerMsg, Selection,
        SettingsOverrides, TypeaheadConfig, TypeaheadKeyMap, TypeaheadSettings, TypeaheadStyles,
        ValueAccessor,
    };
    pub use crate::typeahead::Model as Typeahead;
    pub use crate::Component;
}
