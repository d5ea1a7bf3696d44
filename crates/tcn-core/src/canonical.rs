//! # Canonical Record Bytes
//!
//! `CanonicalBytes` is the only byte form in which credential records are
//! written to the ledger.
//!
//! ## Invariant
//!
//! The inner buffer is private and the sole constructor is
//! [`CanonicalBytes::new`], which serializes through RFC 8785 (JSON
//! Canonicalization Scheme) via `serde_jcs`: object keys sorted, compact
//! separators, UTF-8 output. Encoding the same record twice therefore
//! produces identical bytes, regardless of struct field order or which
//! variant type wrote it.
//!
//! Floats are rejected outright. Credential records are all strings today,
//! and JCS number formatting is the one place two correct encoders can
//! disagree.

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by JCS canonicalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Canonicalize any serializable value.
    ///
    /// # Errors
    ///
    /// `FloatRejected` if the value tree holds a non-integer number,
    /// `SerializationFailed` if serde fails.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        reject_floats(&value)?;
        let s = serde_jcs::to_string(&value)?;
        Ok(Self(s.into_bytes()))
    }

    /// Borrow the canonical bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume into the owned buffer handed to the ledger.
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<CanonicalBytes> for Vec<u8> {
    fn from(bytes: CanonicalBytes) -> Self {
        bytes.0
    }
}

fn reject_floats(value: &Value) -> Result<(), CanonicalizationError> {
    match value {
        Value::Number(n) if n.is_f64() => Err(CanonicalizationError::FloatRejected(
            n.as_f64().unwrap_or(f64::NAN),
        )),
        Value::Array(items) => items.iter().try_for_each(reject_floats),
        Value::Object(map) => map.values().try_for_each(reject_floats),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Unordered {
        #[serde(rename = "Zeta")]
        zeta: String,
        #[serde(rename = "Alpha")]
        alpha: String,
    }

    #[test]
    fn struct_fields_are_emitted_in_sorted_order() {
        let rec = Unordered {
            zeta: "z".into(),
            alpha: "a".into(),
        };
        let cb = CanonicalBytes::new(&rec).unwrap();
        assert_eq!(cb.as_bytes(), br#"{"Alpha":"a","Zeta":"z"}"#);
    }

    #[test]
    fn nested_objects_are_sorted_too() {
        let data = serde_json::json!({"b": {"y": "1", "x": "2"}, "a": []});
        let cb = CanonicalBytes::new(&data).unwrap();
        assert_eq!(
            std::str::from_utf8(cb.as_bytes()).unwrap(),
            r#"{"a":[],"b":{"x":"2","y":"1"}}"#
        );
    }

    #[test]
    fn float_is_rejected() {
        let data = serde_json::json!({"Skills": ["Go"], "score": 0.5});
        match CanonicalBytes::new(&data) {
            Err(CanonicalizationError::FloatRejected(f)) => assert_eq!(f, 0.5),
            other => panic!("expected FloatRejected, got {other:?}"),
        }
    }

    #[test]
    fn integers_and_unicode_pass_through() {
        let data = serde_json::json!({"n": 7, "Institution": "Polytechnique Montr\u{e9}al"});
        let cb = CanonicalBytes::new(&data).unwrap();
        let s = std::str::from_utf8(cb.as_bytes()).unwrap();
        assert!(s.contains("\"n\":7"));
        assert!(s.contains('\u{e9}'));
    }

    #[test]
    fn into_vec_matches_as_bytes() {
        let cb = CanonicalBytes::new(&"x").unwrap();
        let copy = cb.as_bytes().to_vec();
        assert_eq!(cb.len(), copy.len());
        assert!(!cb.is_empty());
        assert_eq!(cb.into_vec(), copy);
    }
}
