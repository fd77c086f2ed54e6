//! Deterministic identifiers for failure records and localized categories.
//!
//! A witness id depends only on the law that failed and the semantic
//! content of the failure, never on discovery order:
//!
//! 1. key = `{"context": .., "failureClass": .., "lawRef": .., "schema": 1, "subject": ..}`
//! 2. bytes = compact JSON with object keys in sorted order
//! 3. id = `"w1_"` ++ base32hex_lower(SHA-256(bytes))

use crate::error::Law;
use serde_json::{Map, Value, json};
use sha2::{Digest, Sha256};

/// Witness id for a failure of `law` about `subject`.
pub fn compute_witness_id(law: Law, subject: &str, context: &Value) -> String {
    let mut key = Map::new();
    key.insert("schema".into(), json!(1));
    key.insert("failureClass".into(), json!(law.failure_class()));
    key.insert("lawRef".into(), json!(law.law_ref()));
    key.insert("subject".into(), json!(subject));
    key.insert("context".into(), context.clone());
    let digest = Sha256::digest(canonical_bytes(&Value::Object(key)));
    format!("w1_{}", base32hex_lower(&digest))
}

/// `sha256:<hex>` over the sorted, newline-joined `lines`.
pub fn fingerprint<I>(lines: I) -> String
where
    I: IntoIterator<Item = String>,
{
    let mut lines: Vec<String> = lines.into_iter().collect();
    lines.sort();
    let mut hasher = Sha256::new();
    for line in &lines {
        hasher.update(line.as_bytes());
        hasher.update(b"\n");
    }
    let hex: String = hasher
        .finalize()
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect();
    format!("sha256:{hex}")
}

/// Compact JSON with object keys sorted at every level.
fn canonical_bytes(value: &Value) -> Vec<u8> {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out.into_bytes()
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(&map[key], out);
            }
            out.push('}');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

/// RFC 4648 base32hex, lowercase, unpadded.
fn base32hex_lower(bytes: &[u8]) -> String {
    const ALPHABET: &[u8; 32] = b"0123456789abcdefghijklmnopqrstuv";
    let mut out = String::with_capacity(bytes.len().div_ceil(5) * 8);
    let mut buffer: u64 = 0;
    let mut bits = 0u32;
    for &byte in bytes {
        buffer = (buffer << 8) | u64::from(byte);
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            out.push(ALPHABET[((buffer >> bits) & 31) as usize] as char);
        }
    }
    if bits > 0 {
        out.push(ALPHABET[((buffer << (5 - bits)) & 31) as usize] as char);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn witness_id_is_stable_and_prefixed() {
        let context = json!({"left": "f", "right": "g"});
        let a = compute_witness_id(Law::OreCondition, "g ∘ f", &context);
        let b = compute_witness_id(Law::OreCondition, "g ∘ f", &context);
        assert_eq!(a, b);
        assert!(a.starts_with("w1_"));
        // 32 bytes -> 52 base32 characters
        assert_eq!(a.len(), 3 + 52);
    }

    #[test]
    fn witness_id_ignores_context_key_order() {
        let mut forward = Map::new();
        forward.insert("a".into(), json!(1));
        forward.insert("b".into(), json!(2));
        let mut backward = Map::new();
        backward.insert("b".into(), json!(2));
        backward.insert("a".into(), json!(1));
        assert_eq!(
            compute_witness_id(Law::Factorization, "x", &Value::Object(forward)),
            compute_witness_id(Law::Factorization, "x", &Value::Object(backward)),
        );
    }

    #[test]
    fn witness_id_separates_laws() {
        let context = Value::Null;
        assert_ne!(
            compute_witness_id(Law::IdentityClosure, "A", &context),
            compute_witness_id(Law::CompositionClosure, "A", &context),
        );
    }

    #[test]
    fn base32hex_known_vectors() {
        assert_eq!(base32hex_lower(b""), "");
        assert_eq!(base32hex_lower(b"f"), "co");
        assert_eq!(base32hex_lower(b"fo"), "cpng");
        assert_eq!(base32hex_lower(b"foobar"), "cpnmuoj1e8");
    }

    #[test]
    fn fingerprint_is_order_independent() {
        let a = fingerprint(vec!["x".to_string(), "y".to_string()]);
        let b = fingerprint(vec!["y".to_string(), "x".to_string()]);
        assert_eq!(a, b);
        assert!(a.starts_with("sha256:"));
        assert_eq!(a.len(), 7 + 64);
        assert_ne!(a, fingerprint(vec!["x".to_string()]));
    }
}
