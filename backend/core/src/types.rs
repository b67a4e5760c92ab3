use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Normalize a raw login input into the identity that is sent over the wire
/// and compared at classification time.
///
/// Both sites go through this one function so they can never trim
/// differently.
pub fn login_identity(input: &str) -> &str {
    input.trim()
}

/// The single authoritative identity record held by the client.
///
/// Either the lifecycle holds `Some(SessionState)` with every field defined,
/// or it holds nothing at all.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionState {
    /// Remote-issued session handle.
    pub session_token: Option<String>,
    /// Identity as echoed back by the service. Informational only.
    pub reported_username: String,
    /// What the human typed into the login field, verbatim.
    pub original_input: String,
    /// Privilege flag as echoed back by the service. Informational only.
    pub is_admin_flag: bool,
    pub user_id: i64,
}

impl SessionState {
    /// Build a state from a successful login, pinning the original input.
    pub fn from_login(original_input: impl Into<String>, outcome: &crate::LoginOutcome) -> Self {
        Self {
            session_token: outcome.session_token.clone(),
            reported_username: outcome.reported_username.clone().unwrap_or_default(),
            original_input: original_input.into(),
            is_admin_flag: outcome.is_admin_flag.unwrap_or(false),
            user_id: outcome.user_id.unwrap_or(0),
        }
    }

    /// Overwrite every server-owned field with a confirmed probe answer.
    /// `original_input` is left untouched.
    pub fn refresh_from(&mut self, report: &crate::ProbeReport) {
        self.session_token = report.session_token.clone();
        self.reported_username = report.reported_username.clone().unwrap_or_default();
        self.is_admin_flag = report.is_admin_flag.unwrap_or(false);
        self.user_id = report.user_id.unwrap_or(0);
    }

    /// Adopt a probe answer when no prior state exists.
    pub fn from_probe(report: &crate::ProbeReport) -> Self {
        let mut state = Self {
            session_token: None,
            reported_username: String::new(),
            original_input: report.original_input.clone().unwrap_or_default(),
            is_admin_flag: false,
            user_id: 0,
        };
        state.refresh_from(report);
        state
    }

    /// Name shown to a user without privileges: what they typed, falling back
    /// to what the service calls them.
    pub fn display_identity(&self) -> &str {
        [self.original_input.as_str(), self.reported_username.as_str()]
            .into_iter()
            .find(|s| !s.is_empty())
            .unwrap_or("Unknown")
    }
}

impl fmt::Debug for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionState")
            .field("session_token", &self.session_token.as_ref().map(|_| "***"))
            .field("reported_username", &self.reported_username)
            .field("original_input", &self.original_input)
            .field("is_admin_flag", &self.is_admin_flag)
            .field("user_id", &self.user_id)
            .finish()
    }
}

/// On-disk layout of a cached session, one record per storage slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedSession {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub original_username: Option<String>,
    #[serde(default)]
    pub is_admin: Option<bool>,
    #[serde(default)]
    pub user_id: Option<i64>,
}

impl PersistedSession {
    /// Parse a raw slot. Anything other than a JSON object with well-typed
    /// fields is rejected.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let value: Value = serde_json::from_str(raw).map_err(|e| e.to_string())?;
        if !value.is_object() {
            return Err(format!("expected a JSON object, found {}", json_kind(&value)));
        }
        serde_json::from_value(value).map_err(|e| e.to_string())
    }
}

impl From<&SessionState> for PersistedSession {
    fn from(state: &SessionState) -> Self {
        Self {
            session_id: state.session_token.clone(),
            username: Some(state.reported_username.clone()),
            original_username: Some(state.original_input.clone()),
            is_admin: Some(state.is_admin_flag),
            user_id: Some(state.user_id),
        }
    }
}

impl From<PersistedSession> for SessionState {
    fn from(p: PersistedSession) -> Self {
        Self {
            session_token: p.session_id,
            reported_username: p.username.unwrap_or_default(),
            original_input: p.original_username.unwrap_or_default(),
            is_admin_flag: p.is_admin.unwrap_or(false),
            user_id: p.user_id.unwrap_or(0),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// One untrusted result row: named fields in the order the service sent them.
///
/// Rows that arrive as arrays are keyed by position; bare scalars become a
/// single `value` field. Nothing about a row can make deserialization fail.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultRecord(Map<String, Value>);

impl ResultRecord {
    /// Field by name.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Field by position in the row's own key order.
    pub fn nth(&self, index: usize) -> Option<&Value> {
        self.0.values().nth(index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Value> for ResultRecord {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            Value::Array(items) => Self(
                items
                    .into_iter()
                    .enumerate()
                    .map(|(i, v)| (i.to_string(), v))
                    .collect(),
            ),
            Value::Null => Self::default(),
            scalar => {
                let mut map = Map::new();
                map.insert("value".to_string(), scalar);
                Self(map)
            }
        }
    }
}

impl<'de> Deserialize<'de> for ResultRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from)
    }
}

/// The only row shape the rendering boundary accepts. Every field is
/// populated and already HTML-escaped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayTuple {
    pub name: String,
    pub address: String,
    pub id: String,
}
