//! Best-effort decoding of engine values.
//!
//! The engine writes values as schemaless MessagePack maps. They are decoded
//! into a MessagePack-native value tree, so binary fields and non-string map
//! keys survive decoding, and fields are read by name path. A missing field
//! is an expected outcome, not an error: families evolve independently of
//! this monitor.

use rmpv::Value;
use tracing::debug;

use crate::error::DecodeError;

/// A decoded value: a generic MessagePack tree.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredRecord(Value);

impl StructuredRecord {
    /// Follow `path` through nested maps, matching string keys only.
    pub fn get_path(&self, path: &[&str]) -> Option<&Value> {
        path.iter().try_fold(&self.0, |node, segment| {
            node.as_map()?
                .iter()
                .find(|(key, _)| key.as_str() == Some(*segment))
                .map(|(_, value)| value)
        })
    }
}

/// Deserialize a raw MessagePack value.
///
/// Fails on truncated input, unassigned markers and bytes left over after
/// the first value.
pub fn decode_record(value: &[u8]) -> Result<StructuredRecord, DecodeError> {
    let mut input = value;
    let document = rmpv::decode::read_value(&mut input)?;
    if !input.is_empty() {
        return Err(DecodeError::TrailingBytes(input.len()));
    }
    Ok(StructuredRecord(document))
}

/// Read a string field at `path`.
///
/// Returns `None` if any segment is missing, an intermediate node is not a
/// map, or the leaf is not a valid UTF-8 string.
pub fn extract_field(record: &StructuredRecord, path: &[&str]) -> Option<String> {
    record.get_path(path)?.as_str().map(str::to_string)
}

/// Decode `value` and read the string at `path`, treating malformed bytes
/// the same as an absent field.
pub fn extract_message(value: &[u8], path: &[&str]) -> Option<String> {
    match decode_record(value) {
        Ok(record) => extract_field(&record, path),
        Err(e) => {
            debug!(error = %e, "Skipping undecodable record");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const MESSAGE_PATH: &[&str] = &["incidentRecord", "errorMessage"];

    fn pack(value: &serde_json::Value) -> Vec<u8> {
        rmp_serde::to_vec(value).unwrap()
    }

    fn write(value: &Value) -> Vec<u8> {
        let mut bytes = Vec::new();
        rmpv::encode::write_value(&mut bytes, value).unwrap();
        bytes
    }

    #[test]
    fn test_extract_nested_field() {
        let bytes = pack(&json!({
            "incidentRecord": {
                "errorType": "JOB_NO_RETRIES",
                "errorMessage": "No more retries left."
            }
        }));
        let record = decode_record(&bytes).unwrap();
        assert_eq!(
            extract_field(&record, MESSAGE_PATH),
            Some("No more retries left.".to_string())
        );
    }

    #[test]
    fn test_binary_and_integer_keyed_siblings_are_tolerated() {
        let incident = Value::Map(vec![
            (Value::from(1), Value::from("ordinal")),
            (Value::from("errorMessage"), Value::from("boom")),
            (Value::from("variables"), Value::Binary(vec![0xde, 0xad])),
        ]);
        let bytes = write(&Value::Map(vec![
            (Value::from("incidentRecord"), incident),
            (Value::from("payload"), Value::Binary(vec![1, 2])),
            (Value::from(7), Value::Nil),
        ]));

        let record = decode_record(&bytes).unwrap();
        assert_eq!(extract_field(&record, MESSAGE_PATH), Some("boom".to_string()));
        assert_eq!(extract_message(&bytes, MESSAGE_PATH), Some("boom".to_string()));
    }

    #[test]
    fn test_integer_key_does_not_match_path_segment() {
        let bytes = write(&Value::Map(vec![(Value::from(1), Value::from("one"))]));
        let record = decode_record(&bytes).unwrap();
        assert_eq!(extract_field(&record, &["1"]), None);
    }

    #[test]
    fn test_missing_segment_is_none() {
        let record = decode_record(&pack(&json!({ "incidentRecord": {} }))).unwrap();
        assert_eq!(extract_field(&record, MESSAGE_PATH), None);
        assert_eq!(extract_field(&record, &["jobRecord", "errorMessage"]), None);
    }

    #[test]
    fn test_non_map_intermediate_is_none() {
        let record = decode_record(&pack(&json!({ "incidentRecord": "flat" }))).unwrap();
        assert_eq!(extract_field(&record, MESSAGE_PATH), None);
    }

    #[test]
    fn test_non_string_leaf_is_none() {
        let record =
            decode_record(&pack(&json!({ "incidentRecord": { "errorMessage": 42 } }))).unwrap();
        assert_eq!(extract_field(&record, MESSAGE_PATH), None);

        let binary_leaf = write(&Value::Map(vec![(
            Value::from("incidentRecord"),
            Value::Map(vec![(Value::from("errorMessage"), Value::Binary(b"boom".to_vec()))]),
        )]));
        assert_eq!(extract_message(&binary_leaf, MESSAGE_PATH), None);
    }

    #[test]
    fn test_malformed_bytes_fail_decode() {
        // map header announcing one entry, then nothing
        assert!(decode_record(&[0x81]).is_err());
        // str8 announcing 5 bytes, only 2 present
        assert!(decode_record(&[0xd9, 0x05, b'a', b'b']).is_err());
        // a complete value followed by garbage
        assert!(matches!(
            decode_record(&[0xc0, 0x00, 0x01]),
            Err(DecodeError::TrailingBytes(2))
        ));
    }

    #[test]
    fn test_extract_message_swallows_decode_errors() {
        assert_eq!(extract_message(&[0x81], MESSAGE_PATH), None);
    }

    #[test]
    fn test_empty_path_returns_root_string() {
        let record = decode_record(&pack(&json!("bare"))).unwrap();
        assert_eq!(extract_field(&record, &[]), Some("bare".to_string()));
    }
}
