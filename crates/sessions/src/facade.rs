use {
    serde::{Serialize, de::DeserializeOwned},
    serde_json::{Map, Value},
    tracing::debug,
};

use crate::{
    key::{self, is_reserved},
    messages::Messages,
    store::{SessionStatus, SessionStore},
};

/// Request-scoped access to a visitor's session.
///
/// Wraps a [`SessionStore`] and layers login state, read-once flash messages
/// and a generic data area on top of its value map. Invalid input (reserved
/// keys, non-message values) is ignored rather than reported; only failures of
/// the underlying store surface as errors.
///
/// ```ignore
/// let mut store = MemoryStore::new();
/// let mut session = Session::new(&mut store);
/// session.start()?;
/// session.login(17);
/// session.add_success("Welcome");
/// assert_eq!(session.take_success(), vec!["Welcome"]);
/// ```
pub struct Session<S> {
    store: S,
}

impl<S: SessionStore> Session<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Start the session unless one is already running. Idempotent.
    pub fn start(&mut self) -> anyhow::Result<()> {
        if self.store.status() == SessionStatus::None {
            self.store.start()?;
        }
        Ok(())
    }

    /// Destroy an active session and clear its values. No-op when inactive.
    pub fn destroy(&mut self) -> anyhow::Result<()> {
        if self.store.status() == SessionStatus::Active {
            self.store.destroy()?;
            self.store.values_mut().clear();
        }
        Ok(())
    }

    pub fn is_logged_in(&self) -> bool {
        let values = self.store.values();
        values.get(key::LOGIN_SUCCESS) == Some(&Value::Bool(true))
            && values.get(key::USER_ID).is_some_and(|v| !is_empty(v))
    }

    /// Logged-in user id, if the stored value is numeric.
    pub fn user_id(&self) -> Option<i64> {
        if !self.is_logged_in() {
            return None;
        }
        self.store.values().get(key::USER_ID).and_then(numeric_id)
    }

    /// Record `user_id` as logged in, replacing any previous login.
    pub fn login(&mut self, user_id: i64) {
        let values = self.store.values_mut();
        values.insert(key::USER_ID.into(), Value::from(user_id));
        values.insert(key::LOGIN_SUCCESS.into(), Value::Bool(true));
        debug!(user_id, "session login");
    }

    pub fn logout(&mut self) {
        let values = self.store.values_mut();
        values.remove(key::USER_ID);
        values.insert(key::LOGIN_SUCCESS.into(), Value::Bool(false));
        debug!("session logout");
    }

    /// Return pending error messages and clear them.
    pub fn take_errors(&mut self) -> Vec<String> {
        self.take_messages(key::ERRORS)
    }

    /// Return pending success messages and clear them.
    pub fn take_success(&mut self) -> Vec<String> {
        self.take_messages(key::SUCCESS)
    }

    pub fn has_errors(&self) -> bool {
        self.store.values().contains_key(key::ERRORS)
    }

    pub fn has_success(&self) -> bool {
        self.store.values().contains_key(key::SUCCESS)
    }

    pub fn add_errors(&mut self, messages: impl Into<Messages>) {
        self.push_messages(key::ERRORS, messages.into());
    }

    pub fn add_success(&mut self, messages: impl Into<Messages>) {
        self.push_messages(key::SUCCESS, messages.into());
    }

    /// Like [`Session::add_errors`] for untyped input. Values that are
    /// neither a string nor an array are ignored.
    pub fn add_errors_value(&mut self, value: Value) {
        match Messages::from_value(value) {
            Some(m) => self.push_messages(key::ERRORS, m),
            None => debug!("ignoring non-message error input"),
        }
    }

    pub fn add_success_value(&mut self, value: Value) {
        match Messages::from_value(value) {
            Some(m) => self.push_messages(key::SUCCESS, m),
            None => debug!("ignoring non-message success input"),
        }
    }

    /// Value stored under `key`. Reserved keys always read as absent.
    pub fn data(&self, key: &str) -> Option<&Value> {
        if is_reserved(key) {
            return None;
        }
        self.store.values().get(key)
    }

    /// Typed read of [`Session::data`]. Absent or mismatched values yield `None`.
    pub fn data_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.data(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// All session values except the reserved keys.
    pub fn data_view(&self) -> Map<String, Value> {
        self.store
            .values()
            .iter()
            .filter(|(k, _)| !is_reserved(k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Single entry point mirroring an optional-key lookup: with a key, the
    /// value under it; without, the whole data view as an object.
    pub fn get_data(&self, key: Option<&str>) -> Option<Value> {
        match key {
            Some(k) => self.data(k).cloned(),
            None => Some(Value::Object(self.data_view())),
        }
    }

    /// Store `value` under `key`. Writes to reserved keys are dropped.
    pub fn set_data(&mut self, key: &str, value: impl Into<Value>) {
        if is_reserved(key) {
            debug!(key, "ignoring write to reserved session key");
            return;
        }
        self.store.values_mut().insert(key.to_string(), value.into());
    }

    pub fn set_data_as<T: Serialize>(&mut self, key: &str, value: &T) -> anyhow::Result<()> {
        if is_reserved(key) {
            debug!(key, "ignoring write to reserved session key");
            return Ok(());
        }
        let value = serde_json::to_value(value)?;
        self.store.values_mut().insert(key.to_string(), value);
        Ok(())
    }

    fn take_messages(&mut self, key: &str) -> Vec<String> {
        match self.store.values_mut().remove(key) {
            Some(Value::Array(items)) => items
                .into_iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    fn push_messages(&mut self, key: &str, messages: Messages) {
        let messages = messages.into_vec();
        if messages.is_empty() {
            return;
        }
        let slot = self
            .store
            .values_mut()
            .entry(key)
            .or_insert_with(|| Value::Array(Vec::new()));
        if !slot.is_array() {
            *slot = Value::Array(Vec::new());
        }
        if let Value::Array(items) = slot {
            items.extend(messages.into_iter().map(Value::String));
        }
    }
}

/// Loose emptiness: null, false, zero, "", "0" and empty collections.
fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// Integer value of a number or numeric string, truncated toward zero.
fn numeric_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim_matches(|c| matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c'));
            if s.is_empty()
                || !s
                    .chars()
                    .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
            {
                return None;
            }
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
        },
        _ => None,
    }
}
