//! Keyboard and pointer transition table.
//!
//! [`InteractionStateMachine`] is a pure function from the current
//! [`InteractionState`] and a classified event to a [`Transition`]: the next
//! state plus a list of [`Action`]s for the controller to carry out. It never
//! touches the value, the field buffer or the pipeline itself, so every row of
//! the table can be tested without a model or a rendering surface.
//!
//! Keys arrive in two phases. A terminal `KeyMsg` is delivered as a key-down
//! immediately followed by a key-up on the same focus target. Key-down sees the
//! field text before the key edits it, key-up sees it afterwards.

use super::types::{Dropdown, Focus, KeyPhase};

/// What a key means to the typeahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    /// Close the dropdown.
    Escape,
    /// Move into or down the menu.
    Next,
    /// Move up the menu.
    Prev,
    /// Enter.
    Commit,
    /// Tab.
    Accept,
    /// Backspace.
    Remove,
    /// Anything else, including plain text edits.
    Other,
}

/// The live, non-value state of the control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InteractionState {
    /// Whether the dropdown is shown.
    pub dropdown: Dropdown,
    /// Where keyboard focus is.
    pub focus: Focus,
    /// A Backspace key-down on an empty field is waiting for its key-up.
    pub remove_armed: bool,
}

/// Side effects requested by a transition, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Commit the field text as a value.
    CommitText,
    /// Commit the n-th published match.
    CommitMatch(usize),
    /// Remove the last tag.
    RemoveLast,
    /// Clear the value.
    ClearValue,
    /// Trim surrounding whitespace off the field text.
    TrimText,
    /// Empty the field.
    ClearText,
    /// Push the field text into the suggestion pipeline.
    PushQuery,
    /// Tell the host the control was touched.
    NotifyTouched,
}

/// Result of one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// State after the event.
    pub state: InteractionState,
    /// Effects to apply, in order.
    pub actions: Vec<Action>,
}

impl Transition {
    fn new(state: InteractionState) -> Self {
        Self {
            state,
            actions: Vec::new(),
        }
    }

    fn then(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    fn close(mut self) -> Self {
        self.state.dropdown = Dropdown::Closed;
        self
    }

    fn focus_input(mut self) -> Self {
        self.state.focus = Focus::Input;
        self
    }
}

/// Facts about the text field at the time of a key event.
#[derive(Debug, Clone, Copy)]
pub struct FieldContext<'a> {
    /// Field text as the key sees it.
    pub text: &'a str,
    /// Number of published matches.
    pub match_count: usize,
    /// Whether any tag is selected.
    pub has_values: bool,
}

/// Mode-dependent transition rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionStateMachine {
    multi: bool,
    complex: bool,
    constrained: bool,
}

impl InteractionStateMachine {
    /// Rules for the given mode. `constrained` is `!custom || complex`.
    pub fn new(multi: bool, complex: bool, constrained: bool) -> Self {
        Self {
            multi,
            complex,
            constrained,
        }
    }

    /// A key on the text field.
    pub fn on_field_key(
        &self,
        state: InteractionState,
        phase: KeyPhase,
        kind: KeyKind,
        field: FieldContext<'_>,
    ) -> Transition {
        let mut t = Transition::new(state).focus_input();
        let filled = !field.text.is_empty();

        if kind == KeyKind::Escape {
            return t.close();
        }
        if phase == KeyPhase::Down && kind == KeyKind::Next && field.match_count > 0 {
            t.state.dropdown = Dropdown::Open;
            t.state.focus = Focus::MenuItem(0);
            return t;
        }

        t.state.dropdown = Dropdown::Open;
        if filled {
            t.state.remove_armed = false;
        }

        if self.multi || self.complex {
            let enter_up = phase == KeyPhase::Up && kind == KeyKind::Commit;
            let tab_down = phase == KeyPhase::Down && kind == KeyKind::Accept;
            if filled && (enter_up || tab_down) {
                t = t.then(Action::CommitText);
                if enter_up && !self.multi {
                    t = t.close();
                }
            }
            if kind == KeyKind::Remove {
                if !filled {
                    match phase {
                        KeyPhase::Down => t.state.remove_armed = true,
                        KeyPhase::Up => {
                            if t.state.remove_armed && self.multi && field.has_values {
                                t = t.then(Action::RemoveLast);
                            }
                            t.state.remove_armed = false;
                        }
                    }
                } else if self.complex && !self.multi && phase == KeyPhase::Down {
                    t = t.then(Action::ClearValue);
                }
            }
        } else if phase == KeyPhase::Up {
            t = t.then(Action::CommitText);
            if kind == KeyKind::Commit && filled {
                t = t.close();
            }
        }

        t.then(Action::PushQuery)
    }

    /// A key on the n-th menu item.
    pub fn on_item_key(
        &self,
        state: InteractionState,
        index: usize,
        phase: KeyPhase,
        kind: KeyKind,
        match_count: usize,
    ) -> Transition {
        let t = Transition::new(state);
        match (phase, kind) {
            (KeyPhase::Up, KeyKind::Commit) => t
                .then(Action::CommitMatch(index))
                .then(Action::PushQuery)
                .close()
                .focus_input(),
            (KeyPhase::Up, KeyKind::Escape) => t.focus_input().close(),
            (KeyPhase::Down, KeyKind::Next) if index + 1 < match_count => {
                let mut t = t;
                t.state.focus = Focus::MenuItem(index + 1);
                t
            }
            (KeyPhase::Down, KeyKind::Prev) if index > 0 => {
                let mut t = t;
                t.state.focus = Focus::MenuItem(index - 1);
                t
            }
            _ => t,
        }
    }

    /// Pointer activation of the n-th menu item.
    pub fn on_item_pointer(&self, state: InteractionState, index: usize) -> Transition {
        Transition::new(state)
            .then(Action::CommitMatch(index))
            .then(Action::PushQuery)
            .close()
            .focus_input()
    }

    /// Focus left the control entirely.
    ///
    /// `text_matches` tells whether the trimmed field text matches a published
    /// suggestion.
    pub fn on_blur(&self, state: InteractionState, text_matches: bool) -> Transition {
        let mut t = Transition::new(state).close().then(Action::NotifyTouched);
        t.state.focus = Focus::Outside;
        t.state.remove_armed = false;

        if self.multi {
            return t.then(Action::ClearText).then(Action::PushQuery);
        }
        if self.constrained {
            t = t.then(Action::TrimText);
            if !text_matches {
                t = t
                    .then(Action::ClearText)
                    .then(Action::ClearValue)
                    .then(Action::PushQuery);
            }
        }
        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE: InteractionStateMachine = InteractionStateMachine {
        multi: false,
        complex: false,
        constrained: false,
    };
    const MULTI: InteractionStateMachine = InteractionStateMachine {
        multi: true,
        complex: false,
        constrained: false,
    };
    const COMPLEX: InteractionStateMachine = InteractionStateMachine {
        multi: false,
        complex: true,
        constrained: true,
    };

    fn open() -> InteractionState {
        InteractionState {
            dropdown: Dropdown::Open,
            focus: Focus::Input,
            remove_armed: false,
        }
    }

    fn field(text: &str) -> FieldContext<'_> {
        FieldContext {
            text,
            match_count: 2,
            has_values: true,
        }
    }

    #[test]
    fn test_escape_closes_without_push() {
        for phase in [KeyPhase::Down, KeyPhase::Up] {
            let t = MULTI.on_field_key(open(), phase, KeyKind::Escape, field("ap"));
            assert_eq!(t.state.dropdown, Dropdown::Closed);
            assert!(t.actions.is_empty());
        }
    }

    #[test]
    fn test_arrow_down_enters_menu_only_with_matches() {
        let t = SIMPLE.on_field_key(open(), KeyPhase::Down, KeyKind::Next, field("a"));
        assert_eq!(t.state.focus, Focus::MenuItem(0));
        assert!(t.actions.is_empty());

        let empty = FieldContext {
            match_count: 0,
            ..field("a")
        };
        let t = SIMPLE.on_field_key(open(), KeyPhase::Down, KeyKind::Next, empty);
        assert_eq!(t.state.focus, Focus::Input);
        assert_eq!(t.actions, vec![Action::PushQuery]);
    }

    #[test]
    fn test_text_edit_opens_and_pushes() {
        let closed = InteractionState::default();
        let t = MULTI.on_field_key(closed, KeyPhase::Down, KeyKind::Other, field("k"));
        assert_eq!(t.state.dropdown, Dropdown::Open);
        assert_eq!(t.actions, vec![Action::PushQuery]);
    }

    #[test]
    fn test_tab_commits_without_closing() {
        let t = MULTI.on_field_key(open(), KeyPhase::Down, KeyKind::Accept, field("kiwi"));
        assert_eq!(t.actions, vec![Action::CommitText, Action::PushQuery]);
        assert_eq!(t.state.dropdown, Dropdown::Open);

        let t = MULTI.on_field_key(open(), KeyPhase::Down, KeyKind::Accept, field(""));
        assert_eq!(t.actions, vec![Action::PushQuery]);
    }

    #[test]
    fn test_enter_commits_on_key_up() {
        let t = MULTI.on_field_key(open(), KeyPhase::Down, KeyKind::Commit, field("kiwi"));
        assert_eq!(t.actions, vec![Action::PushQuery]);

        let t = MULTI.on_field_key(open(), KeyPhase::Up, KeyKind::Commit, field("kiwi"));
        assert_eq!(t.actions, vec![Action::CommitText, Action::PushQuery]);
        assert_eq!(t.state.dropdown, Dropdown::Open);

        let t = COMPLEX.on_field_key(open(), KeyPhase::Up, KeyKind::Commit, field("apple"));
        assert_eq!(t.actions, vec![Action::CommitText, Action::PushQuery]);
        assert_eq!(t.state.dropdown, Dropdown::Closed);
    }

    #[test]
    fn test_simple_single_commits_every_key_up() {
        let t = SIMPLE.on_field_key(open(), KeyPhase::Up, KeyKind::Other, field("ki"));
        assert_eq!(t.actions, vec![Action::CommitText, Action::PushQuery]);
        assert_eq!(t.state.dropdown, Dropdown::Open);

        let t = SIMPLE.on_field_key(open(), KeyPhase::Up, KeyKind::Commit, field("kiwi"));
        assert_eq!(t.state.dropdown, Dropdown::Closed);

        let t = SIMPLE.on_field_key(open(), KeyPhase::Down, KeyKind::Other, field("ki"));
        assert_eq!(t.actions, vec![Action::PushQuery]);
    }

    #[test]
    fn test_backspace_two_phase_removes_last() {
        let down = MULTI.on_field_key(open(), KeyPhase::Down, KeyKind::Remove, field(""));
        assert!(down.state.remove_armed);
        assert_eq!(down.actions, vec![Action::PushQuery]);

        let up = MULTI.on_field_key(down.state, KeyPhase::Up, KeyKind::Remove, field(""));
        assert_eq!(up.actions, vec![Action::RemoveLast, Action::PushQuery]);
        assert!(!up.state.remove_armed);
    }

    #[test]
    fn test_backspace_up_with_text_does_not_remove() {
        let down = MULTI.on_field_key(open(), KeyPhase::Down, KeyKind::Remove, field(""));
        let up = MULTI.on_field_key(down.state, KeyPhase::Up, KeyKind::Remove, field("x"));
        assert_eq!(up.actions, vec![Action::PushQuery]);
        assert!(!up.state.remove_armed);
    }

    #[test]
    fn test_backspace_up_without_arming_does_not_remove() {
        let up = MULTI.on_field_key(open(), KeyPhase::Up, KeyKind::Remove, field(""));
        assert_eq!(up.actions, vec![Action::PushQuery]);
    }

    #[test]
    fn test_backspace_with_no_tags_does_nothing() {
        let ctx = FieldContext {
            has_values: false,
            ..field("")
        };
        let down = MULTI.on_field_key(open(), KeyPhase::Down, KeyKind::Remove, ctx);
        let up = MULTI.on_field_key(down.state, KeyPhase::Up, KeyKind::Remove, ctx);
        assert_eq!(up.actions, vec![Action::PushQuery]);
    }

    #[test]
    fn test_backspace_in_complex_single_clears_value() {
        let t = COMPLEX.on_field_key(open(), KeyPhase::Down, KeyKind::Remove, field("Apple"));
        assert_eq!(t.actions, vec![Action::ClearValue, Action::PushQuery]);
        assert_eq!(t.state.dropdown, Dropdown::Open);
    }

    #[test]
    fn test_menu_navigation_stops_at_edges() {
        let at_first = InteractionState {
            focus: Focus::MenuItem(0),
            ..open()
        };
        let t = SIMPLE.on_item_key(at_first, 0, KeyPhase::Down, KeyKind::Prev, 2);
        assert_eq!(t.state.focus, Focus::MenuItem(0));
        let t = SIMPLE.on_item_key(at_first, 0, KeyPhase::Down, KeyKind::Next, 2);
        assert_eq!(t.state.focus, Focus::MenuItem(1));
        let t = SIMPLE.on_item_key(t.state, 1, KeyPhase::Down, KeyKind::Next, 2);
        assert_eq!(t.state.focus, Focus::MenuItem(1));
        let t = SIMPLE.on_item_key(t.state, 1, KeyPhase::Down, KeyKind::Prev, 2);
        assert_eq!(t.state.focus, Focus::MenuItem(0));
    }

    #[test]
    fn test_menu_enter_commits_and_refocuses() {
        let on_item = InteractionState {
            focus: Focus::MenuItem(1),
            ..open()
        };
        let t = SIMPLE.on_item_key(on_item, 1, KeyPhase::Up, KeyKind::Commit, 2);
        assert_eq!(t.actions, vec![Action::CommitMatch(1), Action::PushQuery]);
        assert_eq!(t.state.dropdown, Dropdown::Closed);
        assert_eq!(t.state.focus, Focus::Input);

        let t = SIMPLE.on_item_key(on_item, 1, KeyPhase::Down, KeyKind::Commit, 2);
        assert!(t.actions.is_empty());
    }

    #[test]
    fn test_menu_escape_refocuses() {
        let on_item = InteractionState {
            focus: Focus::MenuItem(0),
            ..open()
        };
        let t = SIMPLE.on_item_key(on_item, 0, KeyPhase::Up, KeyKind::Escape, 2);
        assert!(t.actions.is_empty());
        assert_eq!(t.state.focus, Focus::Input);
        assert_eq!(t.state.dropdown, Dropdown::Closed);
    }

    #[test]
    fn test_pointer_commits() {
        let t = MULTI.on_item_pointer(open(), 1);
        assert_eq!(t.actions, vec![Action::CommitMatch(1), Action::PushQuery]);
        assert_eq!(t.state.dropdown, Dropdown::Closed);
        assert_eq!(t.state.focus, Focus::Input);
    }

    #[test]
    fn test_blur_policies() {
        let t = MULTI.on_blur(open(), false);
        assert_eq!(
            t.actions,
            vec![Action::NotifyTouched, Action::ClearText, Action::PushQuery]
        );
        assert_eq!(t.state.focus, Focus::Outside);

        let t = SIMPLE.on_blur(open(), false);
        assert_eq!(t.actions, vec![Action::NotifyTouched]);

        let t = COMPLEX.on_blur(open(), true);
        assert_eq!(t.actions, vec![Action::NotifyTouched, Action::TrimText]);

        let t = COMPLEX.on_blur(open(), false);
        assert_eq!(
            t.actions,
            vec![
                Action::NotifyTouched,
                Action::TrimText,
                Action::ClearText,
                Action::ClearValue,
                Action::PushQuery
            ]
        );
        assert_eq!(t.state.dropdown, Dropdown::Closed);
    }
}
