//! Form-binding boundary.
//!
//! A host form layer talks to a control through [`ValueAccessor`]: it writes
//! values in, registers callbacks for changes and touches, and propagates the
//! disabled state. Values cross the boundary as `serde_json::Value` so plain
//! strings, ids of any scalar type and lists all fit.

use crate::error::Result;
use serde_json::Value;

/// Called with the new value after every committed change.
pub type ChangeCallback = Box<dyn FnMut(&Value) + Send>;

/// Called when focus leaves the control.
pub type TouchedCallback = Box<dyn FnMut() + Send>;

/// The value-accessor contract a form layer drives.
pub trait ValueAccessor {
    /// Sets the value from outside. Resolution rules still apply.
    ///
    /// # Errors
    ///
    /// Implementations reject values that do not fit their mode or cannot be
    /// resolved.
    fn write_value(&mut self, value: Value) -> Result<()>;

    /// Replaces the change callback.
    fn register_on_change(&mut self, callback: ChangeCallback);

    /// Replaces the touched callback.
    fn register_on_touched(&mut self, callback: TouchedCallback);

    /// Enables or disables user interaction.
    fn set_disabled_state(&mut self, disabled: bool);
}

/// Subscribers to the `valueChange` side channel.
#[derive(Default)]
pub(crate) struct ChangeListeners {
    on_change: Option<ChangeCallback>,
    subscribers: Vec<ChangeCallback>,
}

impl std::fmt::Debug for ChangeListeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeListeners")
            .field("on_change", &self.on_change.is_some())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl ChangeListeners {
    pub(crate) fn set_on_change(&mut self, callback: ChangeCallback) {
        self.on_change = Some(callback);
    }

    pub(crate) fn subscribe(&mut self, callback: ChangeCallback) {
        self.subscribers.push(callback);
    }

    /// Notifies the form callback, then every subscriber in registration order.
    pub(crate) fn emit(&mut self, value: &Value) {
        if let Some(cb) = self.on_change.as_mut() {
            cb(value);
        }
        for cb in &mut self.subscribers {
            cb(value);
        }
    }

    pub(crate) fn clear(&mut self) {
        self.on_change = None;
        self.subscribers.clear();
    }
}
