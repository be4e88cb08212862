//! Pure helpers for converting store documents to domain types.
//!
//! Records cross the store seam as `serde_json::Value` documents; these
//! functions recover typed values and identify records, mapping serde
//! failures to `StoreError::InvalidData`.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{Result, StoreError};

/// Returns the `id` field of a record, if present.
pub fn record_id(record: &Value) -> Option<&str> {
    record.get("id").and_then(Value::as_str)
}

/// Decodes a record into a domain type.
pub fn decode<T: DeserializeOwned>(record: Value) -> Result<T> {
    serde_json::from_value(record).map_err(|e| StoreError::InvalidData(e.to_string()))
}

/// Decodes a batch of records into domain types.
pub fn decode_many<T: DeserializeOwned>(records: Vec<Value>) -> Result<Vec<T>> {
    records.into_iter().map(decode).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Probe {
        id: String,
        count: u32,
    }

    #[test]
    fn test_record_id() {
        let record = json!({"id": "rec-1", "count": 3});
        assert_eq!(record_id(&record), Some("rec-1"));
        assert_eq!(record_id(&json!({"count": 3})), None);
        assert_eq!(record_id(&json!(42)), None);
    }

    #[test]
    fn test_decode() {
        let record = json!({"id": "rec-1", "count": 3});
        let probe: Probe = decode(record).unwrap();
        assert_eq!(
            probe,
            Probe {
                id: "rec-1".to_string(),
                count: 3
            }
        );
    }

    #[test]
    fn test_decode_invalid_data() {
        let result: Result<Probe> = decode(json!({"id": 17}));
        assert!(matches!(result, Err(StoreError::InvalidData(_))));
    }

    #[test]
    fn test_decode_many() {
        let records = vec![
            json!({"id": "a", "count": 1}),
            json!({"id": "b", "count": 2}),
        ];
        let probes: Vec<Probe> = decode_many(records).unwrap();
        assert_eq!(probes.len(), 2);
        assert_eq!(probes[1].id, "b");
    }
}
