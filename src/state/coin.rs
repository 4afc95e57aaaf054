/// The canonical coin record and its normalizer
///
/// Everything that enters the collection passes through `normalize`:
/// fresh AI identification payloads as well as records read back from
/// disk, including records written by older versions with fewer fields.

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Candidate field names for the front image, in priority order.
/// Older records stored a single photo under `imageUrl` or `image`.
const FRONT_IMAGE_FIELDS: &[&str] = &["frontImageUrl", "imageUrl", "image"];

/// Candidate field names for the back image. When none match, the
/// front image chain is reused so every record renders two faces.
const BACK_IMAGE_FIELDS: &[&str] = &["backImageUrl"];

/// Candidate field names for the appraised value.
const VALUE_FIELDS: &[&str] = &["value", "estimatedValue"];

/// Candidate field names for the condition.
const CONDITION_FIELDS: &[&str] = &["condition", "conditionEstimate"];

/// A single coin in the collection
///
/// Field names serialize in camelCase so the store file stays
/// compatible with records written by earlier exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coin {
    /// Unique identifier, assigned once at creation
    pub id: String,
    pub name: String,
    pub country: String,
    /// Mint year; None means the year is unknown
    pub year: Option<i32>,
    pub denomination: String,
    /// Appraised value, always finite and non-negative
    pub value: f64,
    pub composition: String,
    pub description: String,
    pub condition: String,
    pub is_rare: bool,
    pub rarity_details: String,
    /// Unix seconds, set once when the record is created
    pub date_added: i64,
    pub front_image_url: String,
    pub back_image_url: String,
    /// Provenance URIs reported by the identification service
    pub sources: Vec<String>,
}

impl Coin {
    /// Generate a fresh record id
    pub fn new_id() -> String {
        Uuid::new_v4().to_string()
    }
}

/// Build a canonical record from a loosely shaped JSON value.
///
/// This is a total function: any field may be absent, null, or the
/// wrong type, and still produces a usable record. It never fails.
pub fn normalize(raw: &Value) -> Coin {
    let front_image_url = first_string(raw, FRONT_IMAGE_FIELDS).unwrap_or_default();
    let back_image_url =
        first_string(raw, BACK_IMAGE_FIELDS).unwrap_or_else(|| front_image_url.clone());

    Coin {
        id: first_string(raw, &["id"]).unwrap_or_else(Coin::new_id),
        name: string_field(raw, "name"),
        country: string_field(raw, "country"),
        year: parse_year(raw.get("year")),
        denomination: string_field(raw, "denomination"),
        value: parse_value(first_present(raw, VALUE_FIELDS)),
        composition: string_field(raw, "composition"),
        description: string_field(raw, "description"),
        condition: first_string(raw, CONDITION_FIELDS).unwrap_or_default(),
        is_rare: raw.get("isRare").and_then(Value::as_bool).unwrap_or(false),
        rarity_details: string_field(raw, "rarityDetails"),
        date_added: parse_date_added(raw.get("dateAdded")),
        front_image_url,
        back_image_url,
        sources: parse_sources(raw.get("sources")),
    }
}

/// Coerce an appraised value into a finite non-negative number.
///
/// Strings may carry currency formatting ("US$ 1,234.50"); everything
/// that is not a digit or a decimal point is stripped before parsing.
/// Anything unparsable yields 0.
pub fn parse_value(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => {
            let n = n.as_f64().unwrap_or(0.0);
            if n.is_finite() && n >= 0.0 {
                n
            } else {
                0.0
            }
        }
        Some(Value::String(s)) => parse_value_text(s),
        _ => 0.0,
    }
}

/// Parse a hand-typed or currency-formatted amount
pub fn parse_value_text(text: &str) -> f64 {
    let digits: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite() && *n >= 0.0)
        .unwrap_or(0.0)
}

/// Coerce a year into a known value, or None when the year is unknown.
/// A missing or non-numeric year is never stored as 0.
pub fn parse_year(value: Option<&Value>) -> Option<i32> {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|y| y.fract() == 0.0).map(|y| y as i64))
            .and_then(|y| i32::try_from(y).ok()),
        Some(Value::String(s)) => parse_year_text(s),
        _ => None,
    }
}

/// Parse a hand-typed year
pub fn parse_year_text(text: &str) -> Option<i32> {
    text.trim().parse::<i32>().ok()
}

fn parse_date_added(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n.as_i64().unwrap_or(0),
        // Older exports stored RFC 3339 strings
        Some(Value::String(s)) => DateTime::parse_from_rfc3339(s)
            .map(|t| t.timestamp())
            .unwrap_or(0),
        _ => 0,
    }
}

fn parse_sources(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(field_as_string).collect(),
        Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}

/// Read a field as text, coercing numbers to their string form
/// (older records stored numeric ids)
fn field_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// First candidate field that holds non-empty text.
/// Empty strings are skipped so fallback chains behave like the
/// legacy records they migrate.
fn first_string(raw: &Value, candidates: &[&str]) -> Option<String> {
    candidates
        .iter()
        .filter_map(|name| raw.get(*name))
        .filter_map(field_as_string)
        .find(|s| !s.is_empty())
}

/// First candidate field that is present and not null
fn first_present<'a>(raw: &'a Value, candidates: &[&str]) -> Option<&'a Value> {
    candidates
        .iter()
        .filter_map(|name| raw.get(*name))
        .find(|v| !v.is_null())
}

fn string_field(raw: &Value, name: &str) -> String {
    raw.get(name).and_then(field_as_string).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_is_idempotent() {
        let raw = json!({
            "id": "abc-123",
            "name": "Morgan Dollar",
            "country": "United States",
            "year": 1921,
            "denomination": "1 Dollar",
            "value": 42.5,
            "composition": "Silver / Copper",
            "description": "A classic silver dollar",
            "condition": "Very Fine",
            "isRare": true,
            "rarityDetails": "Low mintage year",
            "dateAdded": 1700000000,
            "frontImageUrl": "data:image/jpeg;base64,AAAA",
            "backImageUrl": "data:image/jpeg;base64,BBBB",
            "sources": ["https://example.com/morgan"]
        });

        let once = normalize(&raw);
        let twice = normalize(&serde_json::to_value(&once).unwrap());

        assert_eq!(once, twice);
    }

    #[test]
    fn test_legacy_single_image_fills_both_faces() {
        let raw = json!({
            "name": "Old Penny",
            "imageUrl": "data:image/jpeg;base64,LEGACY"
        });

        let coin = normalize(&raw);

        assert_eq!(coin.front_image_url, "data:image/jpeg;base64,LEGACY");
        assert_eq!(coin.back_image_url, "data:image/jpeg;base64,LEGACY");
    }

    #[test]
    fn test_back_image_falls_back_to_front() {
        let raw = json!({
            "frontImageUrl": "front-ref",
            "backImageUrl": ""
        });

        let coin = normalize(&raw);

        assert_eq!(coin.front_image_url, "front-ref");
        assert_eq!(coin.back_image_url, "front-ref");
    }

    #[test]
    fn test_value_coercion() {
        assert_eq!(parse_value_text("US$ 1,234.50"), 1234.5);
        assert_eq!(parse_value_text("12.50"), 12.5);
        assert_eq!(parse_value_text("junk"), 0.0);
        assert_eq!(parse_value_text(""), 0.0);

        // Negative and non-finite numbers clamp to zero
        assert_eq!(parse_value(Some(&json!(-5.0))), 0.0);
        assert_eq!(parse_value(Some(&json!(17.25))), 17.25);
        assert_eq!(parse_value(None), 0.0);
    }

    #[test]
    fn test_estimated_value_fallback() {
        let raw = json!({ "estimatedValue": "$99" });
        assert_eq!(normalize(&raw).value, 99.0);
    }

    #[test]
    fn test_year_coercion() {
        assert_eq!(parse_year(Some(&json!(1921))), Some(1921));
        assert_eq!(parse_year(Some(&json!("1990"))), Some(1990));
        assert_eq!(parse_year(Some(&json!("unknown"))), None);
        assert_eq!(parse_year(Some(&json!(null))), None);
        assert_eq!(parse_year(None), None);
    }

    #[test]
    fn test_missing_fields_get_defaults() {
        let coin = normalize(&json!({}));

        assert!(!coin.id.is_empty());
        assert_eq!(coin.name, "");
        assert_eq!(coin.year, None);
        assert_eq!(coin.value, 0.0);
        assert!(!coin.is_rare);
        assert_eq!(coin.rarity_details, "");
        assert_eq!(coin.date_added, 0);
        assert!(coin.sources.is_empty());
    }

    #[test]
    fn test_numeric_id_is_coerced_to_text() {
        let coin = normalize(&json!({ "id": 1700000000123i64 }));
        assert_eq!(coin.id, "1700000000123");
    }

    #[test]
    fn test_condition_estimate_fallback() {
        let raw = json!({ "conditionEstimate": "Fine" });
        assert_eq!(normalize(&raw).condition, "Fine");
    }

    #[test]
    fn test_date_added_accepts_rfc3339() {
        let raw = json!({ "dateAdded": "2023-11-14T22:13:20Z" });
        assert_eq!(normalize(&raw).date_added, 1700000000);
    }

    #[test]
    fn test_bare_string_source_becomes_single_entry() {
        let raw = json!({ "sources": "https://example.com/one" });
        assert_eq!(normalize(&raw).sources, vec!["https://example.com/one"]);
    }
}
