//! Key-value settings with change notification.
//!
//! The store consults a policy flag per store kind (may the user edit this
//! store?) and the grid reads tunables such as the item limit. Any key-value
//! store with change notification can sit behind [`SettingsSource`];
//! [`MemorySettings`] is the implementation the crate ships, seeded from
//! [`LaunchConfig`](crate::config::LaunchConfig).

use crate::signal::{Signal, Subscription};
use std::cell::RefCell;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl SettingValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            SettingValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SettingValue::Str(v) => Some(v),
            _ => None,
        }
    }
}

pub trait SettingsSource {
    fn get(&self, key: &str) -> Option<SettingValue>;

    fn set(&self, key: &str, value: SettingValue);

    /// Call `callback` with the new value every time `key` changes.
    fn subscribe(&self, key: &str, callback: Box<dyn Fn(&SettingValue)>) -> Subscription;

    fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get(key)
            .and_then(|v| v.as_bool())
            .unwrap_or(default)
    }

    fn get_int(&self, key: &str, default: i64) -> i64 {
        self.get(key).and_then(|v| v.as_int()).unwrap_or(default)
    }
}

#[derive(Debug, Default)]
pub struct MemorySettings {
    values: RefCell<HashMap<String, SettingValue>>,
    changed: Signal<(String, SettingValue)>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, key: &str, value: SettingValue) -> Self {
        self.values.borrow_mut().insert(key.to_string(), value);
        self
    }
}

impl SettingsSource for MemorySettings {
    fn get(&self, key: &str) -> Option<SettingValue> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: SettingValue) {
        let previous = self
            .values
            .borrow_mut()
            .insert(key.to_string(), value.clone());
        if previous.as_ref() != Some(&value) {
            tracing::debug!(key, ?value, "setting changed");
            self.changed.emit(&(key.to_string(), value));
        }
    }

    fn subscribe(&self, key: &str, callback: Box<dyn Fn(&SettingValue)>) -> Subscription {
        let key = key.to_string();
        self.changed.connect(move |(changed, value)| {
            if *changed == key {
                callback(value);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn typed_getters_fall_back_to_default() {
        let settings = MemorySettings::new()
            .with("flag", SettingValue::Bool(false))
            .with("limit", SettingValue::Int(6));

        assert!(!settings.get_bool("flag", true));
        assert!(settings.get_bool("missing", true));
        assert_eq!(settings.get_int("limit", -1), 6);
        // wrong type reads as missing
        assert_eq!(settings.get_int("flag", -1), -1);
    }

    #[test]
    fn subscribers_only_see_their_key() {
        let settings = MemorySettings::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let _sub = settings.subscribe(
            "a",
            Box::new(move |v| s.borrow_mut().push(v.clone())),
        );

        settings.set("b", SettingValue::Int(1));
        settings.set("a", SettingValue::Str("x".into()));
        settings.set("a", SettingValue::Str("x".into()));

        assert_eq!(*seen.borrow(), vec![SettingValue::Str("x".into())]);
    }
}
