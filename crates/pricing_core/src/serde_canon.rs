//! Canonical JSON serialization for artifact files
//!
//! Every artifact is written with recursively sorted object keys and no
//! whitespace, so equal values always produce equal bytes and the model
//! digest is stable across runs and platforms.

use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CanonicalError {
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Serialize a value to canonical JSON (sorted keys, no whitespace)
pub fn to_canonical_json<T: Serialize>(value: &T) -> Result<String, CanonicalError> {
    let json_value = serde_json::to_value(value)
        .map_err(|e| CanonicalError::SerializationError(e.to_string()))?;

    let canonical = canonicalize_value(json_value);
    serde_json::to_string(&canonical).map_err(|e| CanonicalError::SerializationError(e.to_string()))
}

fn canonicalize_value(value: serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => {
            let sorted: BTreeMap<String, serde_json::Value> = map
                .into_iter()
                .map(|(k, v)| (k, canonicalize_value(v)))
                .collect();
            serde_json::Value::Object(sorted.into_iter().collect())
        }
        serde_json::Value::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(canonicalize_value).collect())
        }
        other => other,
    }
}

/// BLAKE3 digest of raw canonical bytes, hex encoded
pub fn digest_hex(canonical: &str) -> String {
    hex::encode(blake3::hash(canonical.as_bytes()).as_bytes())
}

/// Compute the BLAKE3 digest of a value's canonical JSON as a hex string
pub fn hash_canonical_hex<T: Serialize>(value: &T) -> Result<String, CanonicalError> {
    Ok(digest_hex(&to_canonical_json(value)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use std::collections::HashMap;

    #[derive(Serialize)]
    struct Unordered {
        zeta: f64,
        alpha: Vec<String>,
        mid: HashMap<String, u32>,
    }

    #[test]
    fn test_keys_are_sorted_recursively() {
        let mut mid = HashMap::new();
        mid.insert("b".to_string(), 2);
        mid.insert("a".to_string(), 1);

        let value = Unordered {
            zeta: 1.5,
            alpha: vec!["y".into(), "x".into()],
            mid,
        };

        let json = to_canonical_json(&value).unwrap();
        assert_eq!(json, r#"{"alpha":["y","x"],"mid":{"a":1,"b":2},"zeta":1.5}"#);
    }

    #[test]
    fn test_hash_is_stable() {
        let value = vec![1.0_f64, 2.5, -3.25];
        let h1 = hash_canonical_hex(&value).unwrap();
        let h2 = hash_canonical_hex(&value).unwrap();
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 64);
    }

    #[test]
    fn test_hash_changes_with_content() {
        let h1 = hash_canonical_hex(&vec![1.0_f64]).unwrap();
        let h2 = hash_canonical_hex(&vec![1.5_f64]).unwrap();
        assert_ne!(h1, h2);
    }
}
