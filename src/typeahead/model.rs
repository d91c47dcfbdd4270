//! The typeahead controller.
//!
//! [`Model`] wires a [`CandidateSource`] into the [`SuggestionPipeline`], owns
//! the [`SelectionModel`], runs events through the
//! [`InteractionStateMachine`] and carries out the resulting actions. It is a
//! regular bubbletea component: feed it messages through
//! [`update`](Model::update) and run the commands it returns.

use super::accessor::{ChangeCallback, ChangeListeners, TouchedCallback, ValueAccessor};
use super::field::FieldBuffer;
use super::interaction::{
    Action, FieldContext, InteractionState, InteractionStateMachine, Transition,
};
use super::keymap::TypeaheadKeyMap;
use super::pipeline::{DeferredTask, MatchFilter, MatchList, SuggestionPipeline};
use super::selection::{Commit, Resolver, SelectionModel};
use super::settings::{SettingsOverrides, TypeaheadConfig};
use super::source::{CandidateSource, Progress};
use super::style::TypeaheadStyles;
use super::types::{
    DebounceMsg, Dropdown, FieldNames, Focus, FocusMsg, Identity, KeyPhase, PasteErrMsg, PasteMsg,
    PointerMsg, Selection, SourceMsg,
};
use crate::error::{Result, TypeaheadError};
use crate::key::KeyPress;
use crate::normalize::eq_normalized;
use crate::Component;
use bubbletea_rs::{Cmd, KeyMsg, Model as BubbleTeaModel, Msg};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use serde_json::Value;
use std::time::Duration;

/// The typeahead component.
///
/// # Examples
///
/// ```rust
/// use bubbletea_typeahead::typeahead::{Candidate, CandidateSource, Model, TypeaheadConfig};
/// use serde_json::json;
///
/// let source = CandidateSource::from_list([
///     Candidate::record(1, "Apple"),
///     Candidate::record(2, "Banana"),
/// ]);
/// let mut typeahead = Model::new(TypeaheadConfig::new().with_complex(true), source);
/// let _ = typeahead.init();
///
/// typeahead.write_value(json!(2)).unwrap();
/// assert_eq!(typeahead.input_text(), "Banana");
/// assert_eq!(typeahead.value_json(), json!(2));
/// ```
pub struct Model {
    /// Key bindings.
    pub keymap: TypeaheadKeyMap,
    /// Rendering styles.
    pub styles: TypeaheadStyles,

    pub(super) config: TypeaheadConfig,
    pub(super) fields: FieldNames,
    pub(super) machine: InteractionStateMachine,
    pub(super) source: CandidateSource,
    pub(super) pipeline: SuggestionPipeline,
    pub(super) selection: SelectionModel,
    pub(super) state: InteractionState,
    pub(super) field: FieldBuffer,
    pub(super) disabled: bool,
    pub(super) torn_down: bool,
    listeners: ChangeListeners,
    on_touched: Option<TouchedCallback>,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("value", self.selection.value())
            .field("input", &self.field.text())
            .field("matches", &self.pipeline.matches().len())
            .field("disabled", &self.disabled)
            .finish()
    }
}

fn resolver<'a>(
    pipeline: &'a SuggestionPipeline,
    fields: &'a FieldNames,
    config: &TypeaheadConfig,
) -> Resolver<'a> {
    Resolver {
        snapshot: pipeline.snapshot(),
        fields,
        complex: config.complex,
        custom: config.custom,
    }
}

/// Creates a command that reads the system clipboard.
///
/// Resolves to [`PasteMsg`] with the clipboard text, or [`PasteErrMsg`] when
/// the clipboard cannot be read or the `clipboard-support` feature is off.
pub fn paste() -> Cmd {
    use bubbletea_rs::tick as bubbletea_tick;
    bubbletea_tick(Duration::from_nanos(1), |_| {
        #[cfg(feature = "clipboard-support")]
        {
            use clipboard::{ClipboardContext, ClipboardProvider};
            let res: std::result::Result<String, String> = (|| {
                let mut ctx: ClipboardContext = ClipboardProvider::new()
                    .map_err(|e| format!("Failed to create clipboard context: {}", e))?;
                ctx.get_contents()
                    .map_err(|e| format!("Failed to read clipboard: {}", e))
            })();
            match res {
                Ok(s) => Box::new(PasteMsg(s)) as Msg,
                Err(e) => Box::new(PasteErrMsg(e)) as Msg,
            }
        }
        #[cfg(not(feature = "clipboard-support"))]
        {
            Box::new(PasteErrMsg("Clipboard support not enabled".to_string())) as Msg
        }
    })
}

impl Model {
    /// Creates a typeahead over `source`. Call [`init`](Self::init) before use.
    pub fn new(config: TypeaheadConfig, source: CandidateSource) -> Self {
        let fields = config.fields();
        let machine = InteractionStateMachine::new(config.multi, config.complex, config.constrained());
        let pipeline = SuggestionPipeline::new(config.settings.type_delay(), config.settings.limit());
        let selection = SelectionModel::new(config.multi);
        Self {
            keymap: TypeaheadKeyMap::default(),
            styles: TypeaheadStyles::default(),
            config,
            fields,
            machine,
            source,
            pipeline,
            selection,
            state: InteractionState::default(),
            field: FieldBuffer::new(),
            disabled: false,
            torn_down: false,
            listeners: ChangeListeners::default(),
            on_touched: None,
        }
    }

    /// Computes the initial matches and starts listening to the source.
    ///
    /// For a list source the matches for the empty query are available on
    /// return. For a stream the returned command pulls the first emission.
    pub fn init(&mut self) -> Option<Cmd> {
        if self.torn_down {
            return None;
        }
        self.state.dropdown = Dropdown::Closed;
        self.attach_source()
    }

    fn attach_source(&mut self) -> Option<Cmd> {
        let _ = self.pipeline.push_input("");
        let filter = MatchFilter {
            fields: &self.fields,
            excluded: self.selection.excluded(),
        };
        self.pipeline.trigger(&self.source, filter);
        if self.source.is_ready() {
            self.on_source_ready()
        } else {
            self.source.pull()
        }
    }

    /// The configuration this control was built with.
    pub fn config(&self) -> &TypeaheadConfig {
        &self.config
    }

    /// The current value.
    pub fn value(&self) -> &Selection {
        self.selection.value()
    }

    /// The current value as JSON: `null`, a scalar, or an array in multi mode.
    pub fn value_json(&self) -> Value {
        self.selection.value().to_json()
    }

    /// The latest published matches.
    pub fn matches(&self) -> MatchList {
        self.pipeline.matches()
    }

    /// Whether the dropdown is shown.
    pub fn is_expanded(&self) -> bool {
        self.state.dropdown == Dropdown::Open
    }

    /// Where keyboard focus is inside the control.
    pub fn focus_target(&self) -> Focus {
        self.state.focus
    }

    /// The text in the field.
    pub fn input_text(&self) -> String {
        self.field.text()
    }

    /// Whether user interaction is disabled.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// The candidate source.
    pub fn source(&self) -> &CandidateSource {
        &self.source
    }

    /// The suggestion pipeline.
    pub fn pipeline(&self) -> &SuggestionPipeline {
        &self.pipeline
    }

    /// Display names of the selected tags, in order.
    ///
    /// In complex mode a tag whose id is not in the snapshot shows the raw id.
    pub fn tags(&self) -> Vec<String> {
        let resolver = resolver(&self.pipeline, &self.fields, &self.config);
        self.selection
            .excluded()
            .iter()
            .map(|id| match resolver.lookup(id) {
                Some(candidate) => candidate.display_name(&self.fields),
                None => match id {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                },
            })
            .collect()
    }

    /// Registers a `valueChange` subscriber, called after every change.
    pub fn subscribe_value_change(&mut self, callback: ChangeCallback) {
        self.listeners.subscribe(callback);
    }

    /// Opens or closes the dropdown and refocuses the input.
    pub fn toggle_dropdown(&mut self) {
        self.state.focus = Focus::Input;
        self.state.dropdown = match self.state.dropdown {
            Dropdown::Open => Dropdown::Closed,
            Dropdown::Closed => Dropdown::Open,
        };
    }

    /// Replaces the candidate source.
    ///
    /// The previous source is released before the new one is attached. Values
    /// waiting for a snapshot stay queued and resolve against the new source.
    pub fn set_suggestions(&mut self, source: CandidateSource) -> Option<Cmd> {
        self.source.release();
        self.source = source;
        self.pipeline.reset();
        if self.torn_down {
            return None;
        }
        tracing::debug!(source = self.source.id(), "candidate source replaced");
        self.attach_source()
    }

    /// Merges settings overrides at runtime and recomputes the matches for the
    /// current query under the new bound.
    pub fn set_settings(&mut self, overrides: SettingsOverrides) {
        self.config.settings.apply(overrides);
        let settings = &self.config.settings;
        self.pipeline.configure(settings.type_delay(), settings.limit());
        if !self.torn_down {
            self.refresh_now();
        }
    }

    /// Releases the source and the pipeline. Later messages are ignored.
    pub fn teardown(&mut self) {
        self.source.release();
        self.pipeline.release();
        self.listeners.clear();
        self.on_touched = None;
        self.torn_down = true;
    }

    /// Sets the value from outside, applying the mode's resolution rules.
    ///
    /// `null` clears. Multi mode takes an array of identities. In complex mode
    /// identities are ids; once the candidate snapshot is ready an unknown id is
    /// rejected unless free text is accepted. Before that the value is stored
    /// as given and checked when the snapshot arrives, when unknown ids are
    /// dropped.
    ///
    /// # Errors
    ///
    /// - [`TypeaheadError::InvalidValue`] when the shape does not fit the mode.
    /// - [`TypeaheadError::UnresolvableIdentity`] for an unknown id as above.
    ///
    /// The value is unchanged on error.
    pub fn write_value(&mut self, value: Value) -> Result<()> {
        if self.torn_down {
            return Ok(());
        }
        let next = self.parse_value(value)?;

        let ready = self.pipeline.snapshot().is_some();
        if self.config.complex && !self.config.custom && ready {
            let resolver = resolver(&self.pipeline, &self.fields, &self.config);
            if let Some(unknown) = next.identities().iter().find(|id| resolver.lookup(id).is_none()) {
                return Err(TypeaheadError::UnresolvableIdentity(unknown.to_string()));
            }
        }

        if self.selection.replace(next) {
            self.emit_change();
        }
        if self.config.complex && !ready {
            if !self.config.custom && !self.selection.value().is_empty() {
                self.pipeline.defer(DeferredTask::ValidateValue);
            }
            if !self.config.multi {
                self.pipeline.defer(DeferredTask::SyncDisplay);
            }
        } else if !self.config.multi {
            self.sync_display();
        }
        Ok(())
    }

    fn parse_value(&self, value: Value) -> Result<Selection> {
        match (value, self.config.multi) {
            (Value::Null, multi) => Ok(Selection::empty(multi)),
            (Value::Array(ids), true) => Ok(Selection::Multi(ids)),
            (other @ (Value::Array(_) | Value::Object(_)), false) => Err(TypeaheadError::InvalidValue {
                mode: "single",
                value: other.to_string(),
            }),
            (Value::String(s), false) if s.is_empty() => Ok(Selection::Single(None)),
            (scalar, false) => Ok(Selection::Single(Some(scalar))),
            (other, true) => Err(TypeaheadError::InvalidValue {
                mode: "multi",
                value: other.to_string(),
            }),
        }
    }

    /// Processes one message.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if self.torn_down {
            return None;
        }

        if let Some(tick) = msg.downcast_ref::<DebounceMsg>() {
            if self.pipeline.accepts(tick) {
                tracing::debug!(pipeline = self.pipeline.id(), "debounce elapsed");
                self.refresh_now();
            }
            return None;
        }
        if let Some(source_msg) = msg.downcast_ref::<SourceMsg>() {
            return self.on_source_msg(source_msg.clone());
        }

        if self.disabled {
            return None;
        }

        if let Some(key) = msg.downcast_ref::<KeyMsg>() {
            let press = KeyPress::from(key);
            let down = self.on_key(press, KeyPhase::Down);
            if self.keymap.paste.matches(&press) {
                return down;
            }
            let up = self.on_key(press, KeyPhase::Up);
            return up.or(down);
        }
        if let Some(event) = msg.downcast_ref::<KeyEvent>() {
            let phase = match event.kind {
                KeyEventKind::Release => KeyPhase::Up,
                KeyEventKind::Press | KeyEventKind::Repeat => KeyPhase::Down,
            };
            return self.on_key(KeyPress::from(event), phase);
        }
        if let Some(PasteMsg(text)) = msg.downcast_ref::<PasteMsg>() {
            self.field.insert_str(text);
            self.state.dropdown = Dropdown::Open;
            self.state.focus = Focus::Input;
            return self.push_query();
        }
        if let Some(PasteErrMsg(err)) = msg.downcast_ref::<PasteErrMsg>() {
            tracing::warn!(error = %err, "clipboard read failed");
            return None;
        }
        if let Some(pointer) = msg.downcast_ref::<PointerMsg>() {
            return self.on_pointer(*pointer);
        }
        if let Some(focus) = msg.downcast_ref::<FocusMsg>() {
            return match focus {
                FocusMsg::Gained => {
                    if self.state.focus == Focus::Outside {
                        self.state.focus = Focus::Input;
                    }
                    None
                }
                FocusMsg::Lost => self.on_focus_lost(),
            };
        }
        None
    }

    fn on_source_msg(&mut self, msg: SourceMsg) -> Option<Cmd> {
        if !self.source.accepts(&msg) {
            return None;
        }
        match self.source.apply(msg.event) {
            Progress::Appended => {
                let filter = MatchFilter {
                    fields: &self.fields,
                    excluded: self.selection.excluded(),
                };
                self.pipeline.on_arrival(&self.source, filter);
                self.source.pull()
            }
            Progress::Finished => self.on_source_ready(),
        }
    }

    /// Captures the snapshot and replays queued work in order, re-asserting
    /// the current query after each task.
    fn on_source_ready(&mut self) -> Option<Cmd> {
        let filter = MatchFilter {
            fields: &self.fields,
            excluded: self.selection.excluded(),
        };
        self.pipeline.on_complete(&self.source, filter);

        let pending = self.pipeline.deferred_len();
        if pending > 0 {
            tracing::debug!(tasks = pending, "flushing deferred tasks");
        }
        let mut cmd = None;
        while let Some(task) = self.pipeline.take_deferred() {
            match task {
                DeferredTask::ValidateValue => self.validate_value(),
                DeferredTask::CommitText(text) => self.commit_deferred_text(&text),
                DeferredTask::SyncDisplay => self.sync_display(),
            }
            cmd = self.push_query();
        }
        cmd
    }

    fn on_key(&mut self, press: KeyPress, phase: KeyPhase) -> Option<Cmd> {
        let kind = self.keymap.classify(&press);
        if let Focus::MenuItem(index) = self.state.focus {
            let t = self
                .machine
                .on_item_key(self.state, index, phase, kind, self.pipeline.matches().len());
            return self.apply(t, None);
        }

        if phase == KeyPhase::Down && self.keymap.paste.matches(&press) {
            self.state.focus = Focus::Input;
            return Some(paste());
        }

        let text = self.field.text();
        let context = FieldContext {
            text: &text,
            match_count: self.pipeline.matches().len(),
            has_values: !self.selection.value().is_empty(),
        };
        let t = self.machine.on_field_key(self.state, phase, kind, context);
        let edit = (phase == KeyPhase::Down).then_some(press);
        self.apply(t, edit)
    }

    fn on_pointer(&mut self, pointer: PointerMsg) -> Option<Cmd> {
        match pointer {
            PointerMsg::Item(index) => {
                if index >= self.pipeline.matches().len() {
                    return None;
                }
                let t = self.machine.on_item_pointer(self.state, index);
                self.apply(t, None)
            }
            PointerMsg::Input => {
                self.state.focus = Focus::Input;
                self.state.dropdown = Dropdown::Open;
                None
            }
            PointerMsg::Toggle => {
                self.toggle_dropdown();
                None
            }
            PointerMsg::RemoveTag(index) => {
                let id = self.selection.value().identities().get(index).cloned()?;
                self.remove_value(&id)
            }
        }
    }

    fn on_focus_lost(&mut self) -> Option<Cmd> {
        let text = self.field.text();
        let t = self.machine.on_blur(self.state, self.has_match_text(text.trim()));
        self.apply(t, None)
    }

    /// Removes one tag by identity and re-runs the query.
    pub fn remove_value(&mut self, id: &Identity) -> Option<Cmd> {
        if !self.selection.remove_value(id) {
            return None;
        }
        self.emit_change();
        self.state.focus = Focus::Input;
        self.push_query()
    }

    /// Runs a transition. `edit` is the key to apply to the field after the
    /// actions and before the query is pushed.
    fn apply(&mut self, t: Transition, edit: Option<KeyPress>) -> Option<Cmd> {
        self.state = t.state;
        let mut push = false;
        for action in t.actions {
            match action {
                Action::PushQuery => push = true,
                Action::CommitText => self.commit_text(),
                Action::CommitMatch(index) => self.commit_match(index),
                Action::RemoveLast => {
                    if self.selection.remove_last().is_some() {
                        self.emit_change();
                    }
                }
                Action::ClearValue => {
                    if self.selection.clear() {
                        self.emit_change();
                    }
                }
                Action::TrimText => self.field.trim(),
                Action::ClearText => self.field.clear(),
                Action::NotifyTouched => {
                    if let Some(cb) = self.on_touched.as_mut() {
                        cb();
                    }
                }
            }
        }
        if let Some(press) = edit {
            self.edit_field(&press);
        }
        if push {
            self.push_query()
        } else {
            None
        }
    }

    fn edit_field(&mut self, press: &KeyPress) {
        let k = &self.keymap;
        if k.remove.matches(press) {
            self.field.delete_backward();
        } else if k.delete_forward.matches(press) {
            self.field.delete_forward();
        } else if k.character_backward.matches(press) {
            self.field.move_left();
        } else if k.character_forward.matches(press) {
            self.field.move_right();
        } else if k.line_start.matches(press) {
            self.field.move_home();
        } else if k.line_end.matches(press) {
            self.field.move_end();
        } else if let KeyCode::Char(c) = press.code {
            if !press.mods.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
                self.field.insert_char(c);
            }
        }
    }

    fn push_query(&mut self) -> Option<Cmd> {
        self.pipeline.push_input(&self.field.text())
    }

    /// Recomputes the matches for the latest pushed input right away.
    fn refresh_now(&mut self) {
        let filter = MatchFilter {
            fields: &self.fields,
            excluded: self.selection.excluded(),
        };
        self.pipeline.trigger(&self.source, filter);
    }

    /// Whether `text` names one of the published matches.
    fn has_match_text(&self, text: &str) -> bool {
        self.pipeline
            .matches()
            .iter()
            .any(|c| eq_normalized(&c.display_name(&self.fields), text))
    }

    fn snapshot_has_name(&self, text: &str) -> bool {
        self.pipeline
            .snapshot()
            .is_some_and(|all| all.iter().any(|c| eq_normalized(&c.display_name(&self.fields), text)))
    }

    fn commit_text(&mut self) {
        let text = self.field.text();
        // Matches of a still-loading stream are partial; names resolve on flush.
        let waiting = self.config.complex && self.pipeline.snapshot().is_none();
        if self.config.constrained() && !waiting && !self.has_match_text(&text) {
            return;
        }
        self.commit_text_resolved(&text);
    }

    /// Commits text queued before the snapshot, gated against the snapshot.
    fn commit_deferred_text(&mut self, text: &str) {
        if self.config.constrained() && !self.snapshot_has_name(text) {
            tracing::warn!(text = %text, "queued text matches no candidate, dropping");
            return;
        }
        self.commit_text_resolved(text);
    }

    fn commit_text_resolved(&mut self, text: &str) {
        if !self.config.multi && !self.config.complex && text.is_empty() {
            if self.selection.clear() {
                self.emit_change();
            }
            return;
        }
        let resolver = resolver(&self.pipeline, &self.fields, &self.config);
        match self.selection.set_value(text, &resolver) {
            Ok(Commit::Changed) => {
                self.emit_change();
                if self.config.multi {
                    self.field.clear();
                }
            }
            Ok(Commit::Unchanged) => {}
            Ok(Commit::Deferred) => {
                tracing::debug!(text = %text, "commit waits for candidate snapshot");
                self.pipeline.defer(DeferredTask::CommitText(text.to_string()));
                if self.config.multi {
                    self.field.clear();
                }
            }
            Err(err) => {
                tracing::error!(error = %err, "typed value could not be committed");
            }
        }
    }

    fn commit_match(&mut self, index: usize) {
        let Some(candidate) = self.pipeline.matches().get(index).cloned() else {
            return;
        };
        if self.selection.commit_identity(candidate.identity(&self.fields)) == Commit::Changed {
            self.emit_change();
        }
        if self.config.multi {
            self.field.clear();
        } else {
            self.field.set_text(&candidate.display_name(&self.fields));
        }
    }

    /// Drops identities the snapshot does not know. Runs once the snapshot is
    /// ready for values written before it.
    fn validate_value(&mut self) {
        if !self.config.complex || self.config.custom {
            return;
        }
        let resolver = resolver(&self.pipeline, &self.fields, &self.config);
        let ids = self.selection.value().identities();
        let kept: Vec<Identity> = ids
            .iter()
            .filter(|id| resolver.lookup(id).is_some())
            .cloned()
            .collect();
        if kept.len() == ids.len() {
            return;
        }
        tracing::warn!(
            dropped = ids.len() - kept.len(),
            "written value not found in candidates, dropping"
        );
        let next = if self.config.multi {
            Selection::Multi(kept)
        } else {
            Selection::Single(kept.into_iter().next())
        };
        if self.selection.replace(next) {
            self.emit_change();
        }
    }

    /// Shows the single value's name in the field.
    fn sync_display(&mut self) {
        if self.config.multi {
            return;
        }
        let name = match self.selection.value() {
            Selection::Single(Some(id)) => {
                resolver(&self.pipeline, &self.fields, &self.config).resolve_display_name(id)
            }
            _ => String::new(),
        };
        self.field.set_text(&name);
    }

    fn emit_change(&mut self) {
        let value = self.selection.value().to_json();
        tracing::debug!(value = %value, "value changed");
        self.listeners.emit(&value);
    }
}

impl ValueAccessor for Model {
    fn write_value(&mut self, value: Value) -> Result<()> {
        Model::write_value(self, value)
    }

    fn register_on_change(&mut self, callback: ChangeCallback) {
        self.listeners.set_on_change(callback);
    }

    fn register_on_touched(&mut self, callback: TouchedCallback) {
        self.on_touched = Some(callback);
    }

    fn set_disabled_state(&mut self, disabled: bool) {
        self.disabled = disabled;
    }
}

impl Component for Model {
    fn focus(&mut self) -> Option<Cmd> {
        if self.state.focus == Focus::Outside {
            self.state.focus = Focus::Input;
        }
        None
    }

    fn blur(&mut self) {
        if self.disabled || self.torn_down {
            self.state.focus = Focus::Outside;
            return;
        }
        if self.on_focus_lost().is_some() {
            self.refresh_now();
        }
    }

    fn focused(&self) -> bool {
        self.state.focus != Focus::Outside
    }
}

impl BubbleTeaModel for Model {
    fn init() -> (Self, Option<Cmd>) {
        let mut model = Model::new(
            TypeaheadConfig::default(),
            CandidateSource::from_list(Vec::<super::types::Candidate>::new()),
        );
        let cmd = model.init();
        (model, cmd)
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        self.update(msg)
    }

    fn view(&self) -> String {
        self.view()
    }
}
