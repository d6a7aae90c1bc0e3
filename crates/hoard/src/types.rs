//! Common types shared by the store and its backends.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Single-use opaque token identifying an in-flight authentication
/// transaction.
///
/// Nuts are minted by the protocol layer upstream; the store treats them
/// purely as map keys and enforces no internal structure. The newtype exists
/// so a nut cannot be confused with any other string at a call site.
///
/// # Examples
///
/// ```
/// use hoard::Nut;
///
/// let nut = Nut::from("dDSDGHaSg3J7dbbQ");
/// assert_eq!(nut.as_str(), "dDSDGHaSg3J7dbbQ");
/// assert_eq!(nut.to_string(), "dDSDGHaSg3J7dbbQ");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Nut(String);

impl Nut {
    /// Returns the token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the token is the empty string.
    ///
    /// Empty nuts are rejected by [`Hoard::save`](crate::Hoard::save).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the nut, returning the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<String> for Nut {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Nut {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl std::fmt::Display for Nut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// In-flight authentication state stored per nut.
///
/// The store serializes the whole record to JSON and never interprets its
/// contents. Beyond the opaque [`state`](Self::state) field, protocol-specific
/// fields live in [`extra`](Self::extra), an open string-keyed payload
/// captured via `#[serde(flatten)]`. Unknown fields encountered on read land
/// there instead of failing the decode, so records written by a newer protocol
/// version round-trip through an older store unchanged.
///
/// A [`BTreeMap`] (not `HashMap`) keeps the serialized byte output
/// deterministic across encode calls.
///
/// # Examples
///
/// ```
/// use hoard::HoardCache;
///
/// let record = HoardCache::new("boom!");
/// assert_eq!(record.state, "boom!");
/// assert!(record.extra.is_empty());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HoardCache {
    /// Opaque protocol state for this transaction.
    pub state: String,

    /// Protocol-specific fields the store does not interpret.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl HoardCache {
    /// Creates a record with the given state and no extra fields.
    #[must_use]
    pub fn new(state: impl Into<String>) -> Self {
        Self { state: state.into(), extra: BTreeMap::new() }
    }

    /// Adds a protocol-specific field, returning the record for chaining.
    ///
    /// # Examples
    ///
    /// ```
    /// use hoard::HoardCache;
    ///
    /// let record = HoardCache::new("issued")
    ///     .with_field("remote_ip", serde_json::json!("192.0.2.7"));
    /// assert_eq!(record.extra["remote_ip"], "192.0.2.7");
    /// ```
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nut_display_matches_inner() {
        let nut = Nut::from("abc");
        assert_eq!(format!("{nut}"), "abc");
        assert_eq!(nut.clone().into_inner(), "abc");
    }

    #[test]
    fn unknown_fields_flow_into_extra() {
        let json = r#"{"state":"boom!","remote_ip":"192.0.2.7","attempt":3}"#;
        let record: HoardCache = serde_json::from_str(json).expect("decode");
        assert_eq!(record.state, "boom!");
        assert_eq!(record.extra["remote_ip"], "192.0.2.7");
        assert_eq!(record.extra["attempt"], 3);
    }

    #[test]
    fn extra_fields_serialize_at_top_level() {
        let record = HoardCache::new("s").with_field("k", serde_json::json!("v"));
        let json = serde_json::to_value(&record).expect("encode");
        assert_eq!(json["state"], "s");
        assert_eq!(json["k"], "v");
    }
}
