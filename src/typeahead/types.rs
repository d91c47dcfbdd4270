//! Core types for the typeahead component.

use crate::normalize::normalize;
use bubbletea_rs::Msg;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The comparison key of a committed value.
///
/// Plain strings in simple mode, the id field (any JSON scalar) in complex mode.
pub type Identity = Value;

/// Names of the fields read off complex candidates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldNames {
    /// Field holding the display name. Defaults to `"name"`.
    pub name: String,
    /// Field holding the identity. Defaults to `"id"`.
    pub id: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            name: "name".to_string(),
            id: "id".to_string(),
        }
    }
}

/// A value eligible for suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Candidate {
    /// A plain string, its own identity.
    Text(String),
    /// A record read through [`FieldNames`].
    Record(Map<String, Value>),
}

impl Candidate {
    /// Builds a `{id, name}` record with the default field names.
    pub fn record(id: impl Into<Value>, name: impl Into<String>) -> Self {
        let mut map = Map::new();
        map.insert("id".to_string(), id.into());
        map.insert("name".to_string(), Value::String(name.into()));
        Candidate::Record(map)
    }

    /// The text shown to the user and matched against queries.
    pub fn display_name(&self, fields: &FieldNames) -> String {
        match self {
            Candidate::Text(s) => s.clone(),
            Candidate::Record(map) => match map.get(&fields.name) {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Null) | None => String::new(),
                Some(other) => other.to_string(),
            },
        }
    }

    /// The identity used for dedup and exclusion.
    pub fn identity(&self, fields: &FieldNames) -> Identity {
        match self {
            Candidate::Text(s) => Value::String(s.clone()),
            Candidate::Record(map) => map.get(&fields.id).cloned().unwrap_or(Value::Null),
        }
    }
}

impl From<&str> for Candidate {
    fn from(s: &str) -> Self {
        Candidate::Text(s.to_string())
    }
}

impl From<String> for Candidate {
    fn from(s: String) -> Self {
        Candidate::Text(s)
    }
}

/// Compares two identities.
///
/// Strings compare after normalization; everything else structurally.
pub fn same_identity(a: &Identity, b: &Identity) -> bool {
    match (a, b) {
        (Value::String(x), Value::String(y)) => normalize(x) == normalize(y),
        _ => a == b,
    }
}

/// The authoritative value held by the control.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// Single mode: one identity or nothing.
    Single(Option<Identity>),
    /// Multi mode: ordered identities without duplicates.
    Multi(Vec<Identity>),
}

impl Selection {
    /// An empty selection for the given mode.
    pub fn empty(multi: bool) -> Self {
        if multi {
            Selection::Multi(Vec::new())
        } else {
            Selection::Single(None)
        }
    }

    /// Identities held, in order.
    pub fn identities(&self) -> &[Identity] {
        match self {
            Selection::Single(Some(id)) => std::slice::from_ref(id),
            Selection::Single(None) => &[],
            Selection::Multi(ids) => ids,
        }
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.identities().is_empty()
    }

    /// JSON rendering for the form-binding boundary.
    pub fn to_json(&self) -> Value {
        match self {
            Selection::Single(id) => id.clone().unwrap_or(Value::Null),
            Selection::Multi(ids) => Value::Array(ids.clone()),
        }
    }
}

/// Whether the dropdown is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dropdown {
    /// Hidden.
    #[default]
    Closed,
    /// Shown.
    Open,
}

/// Which element inside the control holds keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// Focus is elsewhere.
    #[default]
    Outside,
    /// The text field.
    Input,
    /// The n-th dropdown item.
    MenuItem(usize),
}

/// Phase of a keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPhase {
    /// Key pressed or auto-repeated.
    Down,
    /// Key released.
    Up,
}

/// Clipboard paste message carrying raw text.
#[derive(Debug, Clone)]
pub struct PasteMsg(pub String);

/// Clipboard paste error message.
#[derive(Debug, Clone)]
pub struct PasteErrMsg(pub String);

/// Pointer activation inside the control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerMsg {
    /// A dropdown item was clicked.
    Item(usize),
    /// The text field was clicked.
    Input,
    /// The dropdown toggle was clicked.
    Toggle,
    /// The remove mark of the n-th tag was clicked.
    RemoveTag(usize),
}

/// Focus entering or leaving the control as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusMsg {
    /// Focus moved into the control.
    Gained,
    /// Focus left the control entirely.
    Lost,
}

/// Debounce timer expiry, routed back by the runtime.
#[derive(Debug, Clone)]
pub struct DebounceMsg {
    pub(crate) id: usize,
    pub(crate) tag: usize,
}

/// An emission from a streaming candidate source.
#[derive(Debug, Clone)]
pub struct SourceMsg {
    pub(crate) id: usize,
    pub(crate) event: SourceEvent,
}

/// What a streaming source produced.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceEvent {
    /// One more candidate, in arrival order.
    Item(Candidate),
    /// The producer reported a failure; no more items follow.
    Failed(String),
    /// The producer finished.
    Completed,
}

macro_rules! impl_into_msg {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Msg {
                fn from(msg: $t) -> Self {
                    Box::new(msg) as Msg
                }
            }
        )*
    };
}

impl_into_msg!(PasteMsg, PasteErrMsg, PointerMsg, FocusMsg, DebounceMsg, SourceMsg);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_fields() {
        let c = Candidate::record(1, "Apple");
        let f = FieldNames::default();
        assert_eq!(c.display_name(&f), "Apple");
        assert_eq!(c.identity(&f), json!(1));
    }

    #[test]
    fn test_custom_field_names() {
        let c: Candidate = serde_json::from_value(json!({"code": "FR", "label": "France"})).unwrap();
        let f = FieldNames {
            name: "label".into(),
            id: "code".into(),
        };
        assert_eq!(c.display_name(&f), "France");
        assert_eq!(c.identity(&f), json!("FR"));
        assert_eq!(c.display_name(&FieldNames::default()), "");
    }

    #[test]
    fn test_untagged_deserialize() {
        let c: Candidate = serde_json::from_value(json!("kiwi")).unwrap();
        assert_eq!(c, Candidate::Text("kiwi".into()));
    }

    #[test]
    fn test_same_identity() {
        assert!(same_identity(&json!("Café"), &json!("cafe")));
        assert!(same_identity(&json!(2), &json!(2)));
        assert!(!same_identity(&json!(2), &json!("2")));
    }

    #[test]
    fn test_selection_json() {
        assert_eq!(Selection::Single(None).to_json(), Value::Null);
        assert_eq!(Selection::Multi(vec![json!("a")]).to_json(), json!(["a"]));
        assert!(Selection::empty(true).is_empty());
    }
}
