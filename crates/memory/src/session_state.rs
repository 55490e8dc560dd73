//! Per-session tool state.
//!
//! Maps `session_id -> tool_id -> value`. Entries live until they are reset
//! or the process exits; there is no expiry.

use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;

#[derive(Default)]
pub struct SessionStateStore {
    sessions: RwLock<HashMap<String, HashMap<String, Value>>>,
}

impl SessionStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, session_id: &str, tool_id: &str) -> Option<Value> {
        self.sessions
            .read()
            .get(session_id)
            .and_then(|tools| tools.get(tool_id))
            .cloned()
    }

    /// Inserts or replaces the state a tool keeps under a session,
    /// returning the previous value.
    pub fn set(&self, session_id: &str, tool_id: &str, value: Value) -> Option<Value> {
        self.sessions
            .write()
            .entry(session_id.to_string())
            .or_default()
            .insert(tool_id.to_string(), value)
    }

    pub fn remove(&self, session_id: &str, tool_id: &str) -> Option<Value> {
        let mut sessions = self.sessions.write();
        let tools = sessions.get_mut(session_id)?;
        let removed = tools.remove(tool_id);
        if tools.is_empty() {
            sessions.remove(session_id);
        }
        removed
    }

    /// Clears one session, or every session when `session_id` is `None`.
    /// Returns how many sessions were dropped; resetting an unknown session
    /// is not an error.
    pub fn reset(&self, session_id: Option<&str>) -> usize {
        let mut sessions = self.sessions.write();
        match session_id {
            Some(id) => usize::from(sessions.remove(id).is_some()),
            None => {
                let dropped = sessions.len();
                sessions.clear();
                dropped
            }
        }
    }

    pub fn contains_session(&self, session_id: &str) -> bool {
        self.sessions.read().contains_key(session_id)
    }

    pub fn session_count(&self) -> usize {
        self.sessions.read().len()
    }
}
