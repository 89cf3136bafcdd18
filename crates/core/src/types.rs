/// All record identities are positive integers assigned by the backend.
pub type DbId = i64;

/// A flat key/value record, either in wire or display shape.
pub type Record = serde_json::Map<String, serde_json::Value>;
