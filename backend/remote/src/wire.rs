//! JSON bodies exchanged with the inventory service and their mapping onto
//! the core's collaborator types.
//!
//! Identity and session fields come from rows the service looked up in its
//! own storage, so they are decoded leniently: a wrong-typed id, name, flag
//! or session id degrades to "absent" (or its text form) instead of failing
//! the whole response.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use hostwatch_core::{LoginOutcome, ProbeReport, QueryResponse, ResultRecord};

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub session_id: Option<Value>,
    #[serde(default)]
    pub user: Option<WireUser>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WireUser {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub username: Option<Value>,
    #[serde(default)]
    pub is_admin_user: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SessionResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub session: Option<WireSession>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WireSession {
    #[serde(default)]
    pub session_id: Option<Value>,
    #[serde(default)]
    pub username: Option<Value>,
    #[serde(default)]
    pub original_username: Option<Value>,
    #[serde(default)]
    pub is_admin: Option<Value>,
    #[serde(default)]
    pub user_id: Option<Value>,
}

/// Listing and search share one body shape; listings put rows under
/// `computers`, searches under `results`.
#[derive(Debug, Default, Deserialize)]
pub struct InventoryResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub computers: Option<Vec<ResultRecord>>,
    #[serde(default)]
    pub results: Option<Vec<ResultRecord>>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error_details: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthStatus {
    pub status: String,
}

impl From<LoginResponse> for LoginOutcome {
    fn from(body: LoginResponse) -> Self {
        if !body.success {
            return LoginOutcome {
                success: false,
                failure_message: body.message,
                ..Default::default()
            };
        }
        let user = body.user.unwrap_or_default();
        LoginOutcome {
            success: true,
            session_token: body.session_id.as_ref().and_then(lenient_string),
            reported_username: user.username.as_ref().and_then(lenient_string),
            is_admin_flag: user.is_admin_user.as_ref().and_then(lenient_bool),
            user_id: user.id.as_ref().and_then(lenient_i64),
            failure_message: None,
        }
    }
}

impl From<SessionResponse> for ProbeReport {
    fn from(body: SessionResponse) -> Self {
        match (body.success, body.session) {
            (true, Some(s)) => ProbeReport {
                active: true,
                session_token: s.session_id.as_ref().and_then(lenient_string),
                reported_username: s.username.as_ref().and_then(lenient_string),
                original_input: s.original_username.as_ref().and_then(lenient_string),
                is_admin_flag: s.is_admin.as_ref().and_then(lenient_bool),
                user_id: s.user_id.as_ref().and_then(lenient_i64),
            },
            _ => ProbeReport::inactive(),
        }
    }
}

impl From<InventoryResponse> for QueryResponse {
    fn from(body: InventoryResponse) -> Self {
        QueryResponse {
            success: body.success,
            results: body.results.or(body.computers).unwrap_or_default(),
            message: body.message,
            error_details: body.error_details,
        }
    }
}

fn lenient_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn lenient_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|n| n != 0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn lenient_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode<T: serde::de::DeserializeOwned>(value: Value) -> T {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn successful_login_maps_user_fields() {
        let body: LoginResponse = decode(json!({
            "success": true,
            "message": "Login successful",
            "session_id": "0b7c",
            "user": {
                "id": 1,
                "username": "admin",
                "original_username": "admin' --",
                "role": "admin",
                "is_admin_user": false
            }
        }));
        let outcome = LoginOutcome::from(body);
        assert!(outcome.success);
        assert_eq!(outcome.session_token.as_deref(), Some("0b7c"));
        assert_eq!(outcome.reported_username.as_deref(), Some("admin"));
        assert_eq!(outcome.is_admin_flag, Some(false));
        assert_eq!(outcome.user_id, Some(1));
    }

    #[test]
    fn rejected_login_carries_message() {
        let body: LoginResponse = decode(json!({"success": false, "message": "Invalid credentials"}));
        let outcome = LoginOutcome::from(body);
        assert!(!outcome.success);
        assert_eq!(outcome.failure_message.as_deref(), Some("Invalid credentials"));
    }

    #[test]
    fn injected_user_row_with_odd_types_still_decodes() {
        let body: LoginResponse = decode(json!({
            "success": true,
            "session_id": "s",
            "user": {"id": "12", "username": 99, "role": null}
        }));
        let outcome = LoginOutcome::from(body);
        assert_eq!(outcome.user_id, Some(12));
        assert_eq!(outcome.reported_username.as_deref(), Some("99"));
        assert_eq!(outcome.is_admin_flag, None);
    }

    #[test]
    fn session_body_maps_to_active_probe() {
        let body: SessionResponse = decode(json!({
            "success": true,
            "session": {
                "session_id": "abc",
                "username": "bob",
                "original_username": "admin",
                "is_admin": true,
                "user_id": 2
            }
        }));
        let report = ProbeReport::from(body);
        assert!(report.active);
        assert_eq!(report.original_input.as_deref(), Some("admin"));
        assert_eq!(report.user_id, Some(2));
    }

    #[test]
    fn missing_session_is_inactive() {
        let body: SessionResponse = decode(json!({"success": false, "message": "No active session"}));
        assert_eq!(ProbeReport::from(body), ProbeReport::inactive());
        let body: SessionResponse = decode(json!({"success": true}));
        assert!(!ProbeReport::from(body).active);
    }

    #[test]
    fn inventory_rows_come_from_either_key() {
        let listing: InventoryResponse = decode(json!({
            "success": true,
            "computers": [{"id": 1, "computer_name": "a", "ip_address": "10.0.0.1"}]
        }));
        assert_eq!(QueryResponse::from(listing).results.len(), 1);

        let search: InventoryResponse = decode(json!({
            "success": false,
            "message": "Error: syntax error",
            "error_details": "syntax error"
        }));
        let response = QueryResponse::from(search);
        assert!(response.results.is_empty());
        assert_eq!(response.error_details.as_deref(), Some("syntax error"));
    }

    #[test]
    fn wrong_typed_flags_and_session_ids_do_not_fail_decoding() {
        let body: LoginResponse = decode(json!({
            "success": true,
            "session_id": 4711,
            "user": {"id": 3, "username": "carol", "is_admin_user": "yes please"}
        }));
        let outcome = LoginOutcome::from(body);
        assert!(outcome.success);
        assert_eq!(outcome.session_token.as_deref(), Some("4711"));
        assert_eq!(outcome.is_admin_flag, None);

        let body: SessionResponse = decode(json!({
            "success": true,
            "session": {
                "session_id": "abc",
                "username": "carol",
                "original_username": ["carol"],
                "is_admin": 1,
                "user_id": 3
            }
        }));
        let report = ProbeReport::from(body);
        assert!(report.active);
        assert_eq!(report.is_admin_flag, Some(true));
        assert_eq!(report.original_input.as_deref(), Some(r#"["carol"]"#));
    }
}
