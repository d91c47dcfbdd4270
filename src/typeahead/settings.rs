//! Configuration surface for the typeahead.

use super::types::FieldNames;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables merged over defaults.
///
/// Deserializing a partial object keeps defaults for missing keys:
///
/// ```rust
/// use bubbletea_typeahead::typeahead::TypeaheadSettings;
///
/// let s: TypeaheadSettings = serde_json::from_str(r#"{"typeDelay": 200}"#).unwrap();
/// assert_eq!(s.type_delay, 200);
/// assert_eq!(s.suggestions_limit, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TypeaheadSettings {
    /// Maximum number of matches shown. 0 means unbounded.
    pub suggestions_limit: usize,
    /// Debounce interval in milliseconds.
    pub type_delay: u64,
    /// Text of the disabled row shown when nothing matches and free text is off.
    pub no_matches_text: String,
}

impl Default for TypeaheadSettings {
    fn default() -> Self {
        Self {
            suggestions_limit: 10,
            type_delay: 50,
            no_matches_text: "No matches found".to_string(),
        }
    }
}

impl TypeaheadSettings {
    /// The debounce interval as a `Duration`.
    pub fn type_delay(&self) -> Duration {
        Duration::from_millis(self.type_delay)
    }

    /// The match bound, `None` when unbounded.
    pub fn limit(&self) -> Option<usize> {
        (self.suggestions_limit > 0).then_some(self.suggestions_limit)
    }

    /// Merges `overrides` over the current values.
    pub fn apply(&mut self, overrides: SettingsOverrides) {
        if let Some(limit) = overrides.suggestions_limit {
            self.suggestions_limit = limit;
        }
        if let Some(delay) = overrides.type_delay {
            self.type_delay = delay;
        }
        if let Some(text) = overrides.no_matches_text {
            self.no_matches_text = text;
        }
    }
}

/// A partial settings object; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SettingsOverrides {
    /// See [`TypeaheadSettings::suggestions_limit`].
    pub suggestions_limit: Option<usize>,
    /// See [`TypeaheadSettings::type_delay`].
    pub type_delay: Option<u64>,
    /// See [`TypeaheadSettings::no_matches_text`].
    pub no_matches_text: Option<String>,
}

/// Mode flags and field names fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TypeaheadConfig {
    /// Field read as display name on complex items.
    pub name_field: String,
    /// Field read as identity on complex items.
    pub id_field: String,
    /// Accept values with no candidate match.
    pub custom: bool,
    /// Hold an ordered list of values instead of one.
    pub multi: bool,
    /// Candidates are records rather than plain strings.
    pub complex: bool,
    /// Hint shown while the field is empty.
    pub placeholder: String,
    /// Minimum field width in cells; the field is padded up to it. 0 means no
    /// padding.
    pub width: usize,
    /// Tunables.
    pub settings: TypeaheadSettings,
}

impl Default for TypeaheadConfig {
    fn default() -> Self {
        let fields = FieldNames::default();
        Self {
            name_field: fields.name,
            id_field: fields.id,
            custom: true,
            multi: false,
            complex: false,
            placeholder: String::new(),
            width: 0,
            settings: TypeaheadSettings::default(),
        }
    }
}

impl TypeaheadConfig {
    /// Default configuration: single, simple, custom.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets multi mode.
    pub fn with_multi(mut self, multi: bool) -> Self {
        self.multi = multi;
        self
    }

    /// Sets complex (record) mode.
    pub fn with_complex(mut self, complex: bool) -> Self {
        self.complex = complex;
        self
    }

    /// Sets whether free text is accepted.
    pub fn with_custom(mut self, custom: bool) -> Self {
        self.custom = custom;
        self
    }

    /// Sets the placeholder hint.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Sets the minimum field width.
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Sets the name and id field names.
    pub fn with_fields(mut self, name_field: impl Into<String>, id_field: impl Into<String>) -> Self {
        self.name_field = name_field.into();
        self.id_field = id_field.into();
        self
    }

    /// Merges settings overrides.
    pub fn with_settings(mut self, overrides: SettingsOverrides) -> Self {
        self.settings.apply(overrides);
        self
    }

    /// The field names as a pair.
    pub fn fields(&self) -> FieldNames {
        FieldNames {
            name: self.name_field.clone(),
            id: self.id_field.clone(),
        }
    }

    /// Blur cleanup and commit gating apply when free text is off or items
    /// are records.
    pub fn constrained(&self) -> bool {
        !self.custom || self.complex
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = TypeaheadConfig::default();
        assert!(c.custom);
        assert!(!c.multi);
        assert!(!c.complex);
        assert_eq!(c.name_field, "name");
        assert_eq!(c.id_field, "id");
        assert_eq!(c.settings.suggestions_limit, 10);
        assert_eq!(c.settings.type_delay(), Duration::from_millis(50));
        assert_eq!(c.settings.no_matches_text, "No matches found");
    }

    #[test]
    fn test_apply_overrides() {
        let mut s = TypeaheadSettings::default();
        s.apply(SettingsOverrides {
            suggestions_limit: Some(0),
            ..Default::default()
        });
        assert_eq!(s.limit(), None);
        assert_eq!(s.type_delay, 50);
    }

    #[test]
    fn test_partial_config_json() {
        let c: TypeaheadConfig =
            serde_json::from_str(r#"{"multi": true, "settings": {"suggestionsLimit": 3}}"#).unwrap();
        assert!(c.multi);
        assert!(c.custom);
        assert_eq!(c.settings.limit(), Some(3));
        assert_eq!(c.settings.type_delay, 50);
    }

    #[test]
    fn test_constrained() {
        assert!(!TypeaheadConfig::new().constrained());
        assert!(TypeaheadConfig::new().with_custom(false).constrained());
        assert!(TypeaheadConfig::new().with_complex(true).constrained());
    }
}
