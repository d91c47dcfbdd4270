//! The authoritative value of the control.
//!
//! [`SelectionModel`] holds one identity (single mode) or an ordered,
//! duplicate-free list of identities (multi mode). Names typed by the user are
//! turned into identities by a [`Resolver`] reading the all-matches snapshot.

use super::types::{same_identity, Candidate, FieldNames, Identity, Selection};
use crate::error::{Result, TypeaheadError};
use crate::normalize::eq_normalized;
use serde_json::Value;

/// Outcome of a value-changing operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    /// The value changed.
    Changed,
    /// The operation was valid but left the value as it was.
    Unchanged,
    /// The candidate snapshot is not ready; the operation was queued.
    Deferred,
}

/// What a name resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// A usable identity.
    Identity(Identity),
    /// Resolution has to wait for the snapshot.
    Pending,
}

/// Resolves names and identities against the candidate snapshot.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    /// The full candidate set, `None` until the source is ready.
    pub snapshot: Option<&'a [Candidate]>,
    /// Field names for reading records.
    pub fields: &'a FieldNames,
    /// Records mode.
    pub complex: bool,
    /// Free text accepted.
    pub custom: bool,
}

impl<'a> Resolver<'a> {
    /// Whether identities can be checked against real data.
    pub fn is_ready(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Turns typed text into an identity.
    ///
    /// Simple mode uses the text itself. Complex mode looks up a candidate whose
    /// normalized name equals the normalized text, falling back to the raw text
    /// when free text is accepted.
    ///
    /// # Errors
    ///
    /// [`TypeaheadError::UnresolvableIdentity`] in complex mode when the
    /// snapshot is ready, nothing matches and free text is not accepted.
    pub fn resolve_name(&self, text: &str) -> Result<Resolution> {
        if !self.complex {
            return Ok(Resolution::Identity(Value::String(text.to_string())));
        }
        let Some(snapshot) = self.snapshot else {
            return Ok(Resolution::Pending);
        };
        if let Some(found) = snapshot
            .iter()
            .find(|c| eq_normalized(&c.display_name(self.fields), text))
        {
            return Ok(Resolution::Identity(found.identity(self.fields)));
        }
        if self.custom {
            Ok(Resolution::Identity(Value::String(text.to_string())))
        } else {
            Err(TypeaheadError::UnresolvableIdentity(text.to_string()))
        }
    }

    /// The candidate carrying `id`, if the snapshot has one.
    pub fn lookup(&self, id: &Identity) -> Option<&'a Candidate> {
        self.snapshot?
            .iter()
            .find(|c| same_identity(&c.identity(self.fields), id))
    }

    /// The display name for `id`.
    ///
    /// Complex mode reads the name field of the matching candidate and returns
    /// an empty string when there is none. Simple mode shows the identity itself.
    pub fn resolve_display_name(&self, id: &Identity) -> String {
        if self.complex {
            return self
                .lookup(id)
                .map(|c| c.display_name(self.fields))
                .unwrap_or_default();
        }
        match id {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

/// Single value or ordered tag list, deduplicated by identity.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionModel {
    value: Selection,
}

impl SelectionModel {
    /// An empty selection for the given mode.
    pub fn new(multi: bool) -> Self {
        Self {
            value: Selection::empty(multi),
        }
    }

    /// The current value.
    pub fn value(&self) -> &Selection {
        &self.value
    }

    /// Whether this holds a list.
    pub fn is_multi(&self) -> bool {
        matches!(self.value, Selection::Multi(_))
    }

    /// Whether `id` is selected.
    pub fn contains(&self, id: &Identity) -> bool {
        self.value.identities().iter().any(|v| same_identity(v, id))
    }

    /// Identities to keep out of the suggestions.
    ///
    /// Only tags are excluded; a single value stays suggestible so the field
    /// text keeps matching it.
    pub fn excluded(&self) -> &[Identity] {
        match &self.value {
            Selection::Multi(ids) => ids,
            Selection::Single(_) => &[],
        }
    }

    /// Replaces the whole value. Duplicates in a list are dropped, first wins.
    ///
    /// Returns true if the value changed.
    pub fn replace(&mut self, value: Selection) -> bool {
        let value = match value {
            Selection::Multi(ids) => {
                let mut unique: Vec<Identity> = Vec::with_capacity(ids.len());
                for id in ids {
                    if !unique.iter().any(|u| same_identity(u, &id)) {
                        unique.push(id);
                    }
                }
                Selection::Multi(unique)
            }
            single => single,
        };
        if value == self.value {
            return false;
        }
        self.value = value;
        true
    }

    /// Appends `id` unless already present. Multi mode only.
    pub fn add_value(&mut self, id: Identity) -> bool {
        if self.contains(&id) {
            return false;
        }
        match &mut self.value {
            Selection::Multi(ids) => {
                ids.push(id);
                true
            }
            Selection::Single(_) => false,
        }
    }

    /// Removes `id`, keeping the order of the rest. Multi mode only.
    pub fn remove_value(&mut self, id: &Identity) -> bool {
        match &mut self.value {
            Selection::Multi(ids) => match ids.iter().position(|v| same_identity(v, id)) {
                Some(index) => {
                    ids.remove(index);
                    true
                }
                None => false,
            },
            Selection::Single(_) => false,
        }
    }

    /// Removes and returns the last tag.
    pub fn remove_last(&mut self) -> Option<Identity> {
        match &mut self.value {
            Selection::Multi(ids) => ids.pop(),
            Selection::Single(_) => None,
        }
    }

    /// Commits an already-known identity: appended in multi mode, replacing
    /// in single mode.
    pub fn commit_identity(&mut self, id: Identity) -> Commit {
        let changed = if self.is_multi() {
            self.add_value(id)
        } else {
            self.replace(Selection::Single(Some(id)))
        };
        if changed {
            Commit::Changed
        } else {
            Commit::Unchanged
        }
    }

    /// Commits typed text, resolving it to an identity first.
    ///
    /// # Errors
    ///
    /// See [`Resolver::resolve_name`]. The value is left unchanged on error.
    pub fn set_value(&mut self, text: &str, resolver: &Resolver<'_>) -> Result<Commit> {
        match resolver.resolve_name(text)? {
            Resolution::Identity(id) => Ok(self.commit_identity(id)),
            Resolution::Pending => Ok(Commit::Deferred),
        }
    }

    /// Clears the value.
    pub fn clear(&mut self) -> bool {
        let empty = Selection::empty(self.is_multi());
        self.replace(empty)
    }
}
