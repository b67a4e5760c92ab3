//! Shape-tolerant conversion of untrusted result rows into display tuples.
//!
//! The upstream result set can carry arbitrary column sets (renamed, extra or
//! missing columns, rows describing the schema itself). Each target field is
//! taken from its canonical column, else from the row's column at a fixed
//! position, else from a placeholder. Escaping is applied to every value no
//! matter where it came from.

use serde_json::Value;

use crate::types::{DisplayTuple, ResultRecord};

/// Where each display field comes from, in lookup order.
struct FieldRule {
    canonical: &'static str,
    position: usize,
    placeholder: &'static str,
}

const NAME: FieldRule = FieldRule { canonical: "computer_name", position: 0, placeholder: "Unknown" };
const ADDRESS: FieldRule = FieldRule { canonical: "ip_address", position: 1, placeholder: "N/A" };
const ID: FieldRule = FieldRule { canonical: "id", position: 2, placeholder: "" };

/// Normalize every record, one tuple per record, order preserved.
pub fn normalize(records: &[ResultRecord]) -> Vec<DisplayTuple> {
    records.iter().map(normalize_record).collect()
}

pub fn normalize_record(record: &ResultRecord) -> DisplayTuple {
    DisplayTuple {
        name: resolve(record, &NAME),
        address: resolve(record, &ADDRESS),
        id: resolve(record, &ID),
    }
}

fn resolve(record: &ResultRecord, rule: &FieldRule) -> String {
    let text = record
        .get(rule.canonical)
        .filter(|v| is_present(v))
        .or_else(|| record.nth(rule.position).filter(|v| is_present(v)))
        .map(to_text)
        .unwrap_or_else(|| rule.placeholder.to_string());
    html_escape(&text)
}

/// Null, false, zero and the empty string count as missing and fall through
/// to the next lookup step.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Escape text for safe inclusion in markup, attribute values included.
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(value: Value) -> Vec<ResultRecord> {
        serde_json::from_value(value).unwrap()
    }

    fn tuple(name: &str, address: &str, id: &str) -> DisplayTuple {
        DisplayTuple {
            name: name.to_string(),
            address: address.to_string(),
            id: id.to_string(),
        }
    }

    #[test]
    fn canonical_columns_are_used_in_any_order() {
        let rows = records(json!([
            {"ip_address": "10.0.0.5", "id": 3, "computer_name": "db-01"}
        ]));
        assert_eq!(normalize(&rows), vec![tuple("db-01", "10.0.0.5", "3")]);
    }

    #[test]
    fn unknown_columns_fall_back_by_position() {
        let rows = records(json!([{"x": "router1", "y": "10.0.0.1"}]));
        assert_eq!(normalize(&rows), vec![tuple("router1", "10.0.0.1", "")]);
    }

    #[test]
    fn empty_record_gets_placeholders() {
        let rows = records(json!([{}]));
        assert_eq!(normalize(&rows), vec![tuple("Unknown", "N/A", "")]);
    }

    #[test]
    fn schema_leak_rows_are_rendered_positionally() {
        let rows = records(json!([
            {"table_name": "users", "column_name": "password", "data_type": "text"}
        ]));
        assert_eq!(normalize(&rows), vec![tuple("users", "password", "text")]);
    }

    #[test]
    fn mixed_rows_keep_order_and_count() {
        let rows = records(json!([
            {"computer_name": "a", "ip_address": "1.1.1.1", "id": 1},
            {},
            {"only": "b"}
        ]));
        let out = normalize(&rows);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0], tuple("a", "1.1.1.1", "1"));
        assert_eq!(out[1], tuple("Unknown", "N/A", ""));
        assert_eq!(out[2], tuple("b", "N/A", ""));
    }

    #[test]
    fn falsy_canonical_values_fall_through() {
        let rows = records(json!([
            {"computer_name": "", "ip_address": null, "id": 0}
        ]));
        // Positions 0..2 hold the same falsy values, so placeholders win.
        assert_eq!(normalize(&rows), vec![tuple("Unknown", "N/A", "")]);

        let rows = records(json!([{"label": "edge", "computer_name": ""}]));
        assert_eq!(normalize(&rows)[0].name, "edge");
    }

    #[test]
    fn non_string_values_are_coerced() {
        let rows = records(json!([
            {"computer_name": true, "ip_address": ["10.0.0.1", "10.0.0.2"], "id": 12.5}
        ]));
        assert_eq!(
            normalize(&rows),
            vec![tuple("true", "[&quot;10.0.0.1&quot;,&quot;10.0.0.2&quot;]", "12.5")]
        );
    }

    #[test]
    fn every_source_is_escaped() {
        let rows = records(json!([
            {"computer_name": "<script>alert(1)</script>", "b": "a&b", "c": "it's \"x\""}
        ]));
        let out = normalize(&rows);
        assert_eq!(out[0].name, "&lt;script&gt;alert(1)&lt;/script&gt;");
        assert_eq!(out[0].address, "a&amp;b");
        assert_eq!(out[0].id, "it&#39;s &quot;x&quot;");
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(normalize(&[]).is_empty());
    }
}
