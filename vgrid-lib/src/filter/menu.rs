//! Filter menu: checkbox list of a column's distinct values.

use super::AllowSet;
use crate::model::Value;

/// Label shown for null and empty values.
pub const EMPTY_LABEL: &str = "(Empty)";

/// One checkbox in the filter menu.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOption {
    /// The distinct value this option stands for.
    pub value: Value,
    /// Display text.
    pub label: String,
    /// Checkbox state.
    pub checked: bool,
}

/// State of an open filter menu.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterMenu {
    key: String,
    options: Vec<FilterOption>,
    search: String,
}

impl FilterMenu {
    /// Open a menu for `key`.
    ///
    /// Every option starts checked unless the column already has an
    /// allow-set, in which case only its members are.
    pub fn open(key: impl Into<String>, unique_values: Vec<Value>, current: Option<&AllowSet>) -> Self {
        let options = unique_values
            .into_iter()
            .map(|value| {
                let label = if value.is_blank() {
                    EMPTY_LABEL.to_string()
                } else {
                    value.to_string()
                };
                let checked = current.is_none_or(|allowed| allowed.contains(&value));
                FilterOption {
                    value,
                    label,
                    checked,
                }
            })
            .collect();
        Self {
            key: key.into(),
            options,
            search: String::new(),
        }
    }

    /// Column the menu filters.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// All options, in menu order.
    pub fn options(&self) -> &[FilterOption] {
        &self.options
    }

    /// Current search text.
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Narrow the visible options to labels containing `term`
    /// (case-insensitive).
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    /// Options whose label matches the search text.
    pub fn visible(&self) -> impl Iterator<Item = &FilterOption> {
        let term = self.search.to_lowercase();
        self.options
            .iter()
            .filter(move |option| option.label.to_lowercase().contains(&term))
    }

    /// Check every option, hidden ones included.
    pub fn select_all(&mut self) {
        for option in &mut self.options {
            option.checked = true;
        }
    }

    /// Uncheck every option, hidden ones included.
    pub fn clear_all(&mut self) {
        for option in &mut self.options {
            option.checked = false;
        }
    }

    /// Set the checkbox for `value`. Returns `false` if the value is not
    /// in the menu.
    pub fn set_checked(&mut self, value: &Value, checked: bool) -> bool {
        match self.options.iter_mut().find(|o| &o.value == value) {
            Some(option) => {
                option.checked = checked;
                true
            }
            None => false,
        }
    }

    /// Flip the checkbox at `index`.
    pub fn toggle(&mut self, index: usize) {
        if let Some(option) = self.options.get_mut(index) {
            option.checked = !option.checked;
        }
    }

    /// Number of distinct values listed.
    pub fn total(&self) -> usize {
        self.options.len()
    }

    /// The checked values as an allow-set.
    pub fn selection(&self) -> AllowSet {
        self.options
            .iter()
            .filter(|o| o.checked)
            .map(|o| o.value.clone())
            .collect()
    }
}
