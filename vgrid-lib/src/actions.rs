//! Row context menu: named actions invoked with the selected record.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

use crate::model::Record;

/// Callback run for a row action.
pub type ActionCallback = Arc<dyn Fn(&Record) + Send + Sync>;

/// One entry of the row context menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowAction {
    /// Button label.
    pub label: String,
    /// Style class for the button.
    #[serde(default)]
    pub style_class: String,
    /// Name of the registered callback to run.
    pub action_name: String,
}

impl RowAction {
    /// Create an action entry.
    pub fn new(label: impl Into<String>, action_name: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            style_class: String::new(),
            action_name: action_name.into(),
        }
    }

    /// Set the style class.
    pub fn with_style_class(mut self, class: impl Into<String>) -> Self {
        self.style_class = class.into();
        self
    }
}

/// Named action callbacks.
#[derive(Clone, Default)]
pub struct ActionRegistry {
    callbacks: HashMap<String, ActionCallback>,
}

impl ActionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback (builder pattern).
    pub fn with<F>(mut self, name: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&Record) + Send + Sync + 'static,
    {
        self.register(name, callback);
        self
    }

    /// Register or replace a callback.
    pub fn register<F>(&mut self, name: impl Into<String>, callback: F)
    where
        F: Fn(&Record) + Send + Sync + 'static,
    {
        self.callbacks.insert(name.into(), Arc::new(callback));
    }

    /// Returns `true` if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.callbacks.contains_key(name)
    }

    /// Run `name` with `record`. Unknown names are logged and ignored.
    pub fn invoke(&self, name: &str, record: &Record) -> bool {
        match self.callbacks.get(name) {
            Some(callback) => {
                callback(record);
                true
            }
            None => {
                log::warn!("no row action registered as '{}'", name);
                false
            }
        }
    }
}

impl fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.callbacks.keys().collect();
        names.sort();
        f.debug_struct("ActionRegistry").field("actions", &names).finish()
    }
}

/// An open row context menu.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextMenu {
    /// Menu title.
    pub title: String,
    /// Identifier of the selected row.
    pub row_id: String,
    /// Anchor, relative to the grid's top-left corner.
    pub x: i32,
    /// Anchor, relative to the grid's top-left corner.
    pub y: i32,
    /// Buttons, in configured order.
    pub actions: Vec<RowAction>,
}
