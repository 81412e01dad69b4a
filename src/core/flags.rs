//! Named boolean flags read by flag-guarded transitions.
//!
//! The table is owned by the machine and handed to every guard, so code
//! that flips a flag does it through the machine rather than a hidden global.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Flags {
    values: BTreeMap<String, bool>,
}

impl Flags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of a flag. Absent flags read as `false`.
    pub fn is_set(&self, name: &str) -> bool {
        self.values.get(name).copied().unwrap_or(false)
    }

    /// Whether the flag has ever been assigned, regardless of its value.
    pub fn is_defined(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Assign a flag, defining it if needed.
    pub fn set(&mut self, name: impl Into<String>, value: bool) -> &mut Self {
        self.values.insert(name.into(), value);
        self
    }

    /// Forget a flag entirely. Returns its previous value, if any.
    pub fn remove(&mut self, name: &str) -> Option<bool> {
        self.values.remove(name)
    }

    /// All defined flags, ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.values.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

impl<K: Into<String>> FromIterator<(K, bool)> for Flags {
    fn from_iter<I: IntoIterator<Item = (K, bool)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
