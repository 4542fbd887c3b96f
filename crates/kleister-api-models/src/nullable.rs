//! Decoding helpers for nullable reference ids.
//!
//! Older servers emit nullable ids as `{"Int64": n, "Valid": bool}` objects,
//! newer ones as a plain integer or `null`. Both decode into `Option<i64>`;
//! encoding always produces the plain form.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum WireId {
    Plain(i64),
    Legacy {
        #[serde(rename = "Int64")]
        value: i64,
        #[serde(rename = "Valid")]
        valid: bool,
    },
}

/// Deserialize a nullable id from either wire representation.
///
/// # Errors
///
/// Returns the deserializer error when the value is neither an integer,
/// `null`, nor a legacy nullable object.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<WireId>::deserialize(deserializer)? {
        None => None,
        Some(WireId::Plain(value)) => Some(value),
        Some(WireId::Legacy { value, valid }) => valid.then_some(value),
    })
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "super::deserialize")]
        id: Option<i64>,
    }

    fn decode(text: &str) -> Option<i64> {
        serde_json::from_str::<Holder>(text).expect("decode").id
    }

    #[test]
    fn accepts_plain_and_null() {
        assert_eq!(decode(r#"{"id": 12}"#), Some(12));
        assert_eq!(decode(r#"{"id": null}"#), None);
        assert_eq!(decode("{}"), None);
    }

    #[test]
    fn zero_is_not_null() {
        assert_eq!(decode(r#"{"id": 0}"#), Some(0));
        assert_eq!(decode(r#"{"id": {"Int64": 0, "Valid": true}}"#), Some(0));
    }

    #[test]
    fn legacy_object_honours_valid_flag() {
        assert_eq!(decode(r#"{"id": {"Int64": 4, "Valid": true}}"#), Some(4));
        assert_eq!(decode(r#"{"id": {"Int64": 4, "Valid": false}}"#), None);
    }

    #[test]
    fn rejects_strings() {
        assert!(serde_json::from_str::<Holder>(r#"{"id": "4"}"#).is_err());
    }
}
