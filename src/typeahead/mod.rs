//! Typeahead component for Bubble Tea applications.
//!
//! A text field with a live-filtered dropdown of suggestions. It holds a single
//! value or an ordered list of tags, takes suggestions from a list or an
//! asynchronous stream, and works with plain strings or `{id, name}` records.
//!
//! # Basic Usage
//!
//! ```rust
//! use bubbletea_typeahead::typeahead::{CandidateSource, Model, TypeaheadConfig};
//!
//! let source = CandidateSource::from_list(["Apple", "Apricot", "Banana"]);
//! let mut typeahead = Model::new(TypeaheadConfig::new().with_multi(true), source);
//! let _ = typeahead.init();
//! assert_eq!(typeahead.matches().len(), 3);
//! ```
//!
//! # Streaming Suggestions
//!
//! ```rust
//! use bubbletea_typeahead::typeahead::{Candidate, CandidateSource, Model, TypeaheadConfig};
//!
//! let (tx, source) = CandidateSource::channel();
//! let mut typeahead = Model::new(TypeaheadConfig::new().with_complex(true), source);
//! let pull = typeahead.init(); // run this command and feed its message back
//! assert!(pull.is_some());
//! tx.send(Candidate::record(1, "Apple")).unwrap();
//! ```
//!
//! # Modes
//!
//! - **multi**: the value is an ordered list of tags; Tab or Enter adds the
//!   typed text, Backspace on an empty field removes the last tag.
//! - **complex**: candidates are records; the value holds ids while the field
//!   and tags show names.
//! - **custom**: free text is accepted. With custom off (or in complex mode)
//!   text that matches no suggestion is cleared when focus leaves.
//!
//! # Keys
//!
//! Terminal key messages carry no release event, so each `KeyMsg` is handled
//! as a key-down followed by a key-up. Hosts that report releases can send
//! `crossterm::event::KeyEvent`s instead.

pub mod accessor;
pub mod field;
pub mod interaction;
pub mod keymap;
pub mod model;
pub mod pipeline;
pub mod selection;
pub mod settings;
pub mod source;
pub mod style;
pub mod types;
pub mod view;


pub use accessor::{ChangeCallback, TouchedCallback, ValueAccessor};
pub use field::FieldBuffer;
pub use interaction::{
    Action, FieldContext, InteractionState, InteractionStateMachine, KeyKind, Transition,
};
pub use keymap::TypeaheadKeyMap;
pub use model::{paste, Model};
pub use pipeline::{MatchFilter, MatchList, SuggestionPipeline};
pub use selection::{Commit, Resolution, Resolver, SelectionModel};
pub use settings::{SettingsOverrides, TypeaheadConfig, TypeaheadSettings};
pub use source::{CandidateSender, CandidateSource, SourceState};
pub use style::TypeaheadStyles;
pub use types::{
    same_identity, Candidate, DebounceMsg, Dropdown, FieldNames, Focus, FocusMsg, Identity,
    KeyPhase, PasteErrMsg, PasteMsg, PointerMsg, Selection, SourceEvent, SourceMsg,
};
