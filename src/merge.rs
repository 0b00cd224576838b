//! # Configuration Document Merge
//!
//! Pure functions over the stored configuration document.
//!
//! The document is arbitrary nested JSON owned by the dependent services;
//! exactly one path is significant here: `auth.cognito`, which holds the
//! credential record. Everything else must survive a reconciliation cycle
//! byte-for-byte.

use serde_json::{json, Map, Value};

use crate::cognito::CredentialRecord;
use crate::constants::{AUTH_KEY, COGNITO_KEY};

/// Return a copy of `existing` with `record` embedded at `auth.cognito`.
///
/// Preserves every other top-level key, and every sibling key under `auth`
/// if `auth` already exists. An empty document is simply a document with no
/// `auth` key. A non-object `auth` value (degenerate input) is replaced by
/// an object.
pub fn merge_credentials(existing: &Value, record: &CredentialRecord) -> Value {
    let mut doc = match existing {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };

    let mut auth = match doc.get(AUTH_KEY) {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    };
    auth.insert(COGNITO_KEY.to_string(), json!(record));
    doc.insert(AUTH_KEY.to_string(), Value::Object(auth));

    Value::Object(doc)
}

/// Extract the credential record currently embedded at `auth.cognito`, if
/// the path exists and holds a record-shaped value.
pub fn credentials_at(doc: &Value) -> Option<CredentialRecord> {
    let embedded = doc.get(AUTH_KEY)?.get(COGNITO_KEY)?;
    serde_json::from_value(embedded.clone()).ok()
}

/// Serialize the document as tab-indented JSON, the stable human-diffable
/// encoding the stored parameter uses.
pub fn to_tab_json(doc: &Value) -> Result<String, serde_json::Error> {
    use serde::Serialize;

    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    doc.serialize(&mut serializer)?;
    // PrettyFormatter output is valid UTF-8
    Ok(String::from_utf8(buf).expect("serde_json emits UTF-8"))
}
