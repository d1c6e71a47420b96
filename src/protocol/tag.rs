// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::ProtocolError;
use crate::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Discriminator identifying a message's kind.
///
/// On the wire a tag is its upper-case name (`CONFIG`, `RECORD`, `KEEPALIVE`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tag {
    /// Global and per-instance configuration handed to a child.
    Config,
    /// One data record.
    Record,
    /// Liveness probe; never carries payload.
    Keepalive,
}

impl Tag {
    pub const ALL: [Tag; 3] = [Tag::Config, Tag::Record, Tag::Keepalive];

    /// Wire name of the tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Config => "CONFIG",
            Tag::Record => "RECORD",
            Tag::Keepalive => "KEEPALIVE",
        }
    }

    /// Classify a raw value, typically the first element of a flattened message.
    ///
    /// ```
    /// use modcore::protocol::Tag;
    /// use serde_json::json;
    ///
    /// assert_eq!(Tag::from_value(&json!("RECORD")), Some(Tag::Record));
    /// assert_eq!(Tag::from_value(&json!("record")), None);
    /// assert_eq!(Tag::from_value(&json!(7)), None);
    /// ```
    pub fn from_value(value: &Value) -> Option<Tag> {
        value.as_str().and_then(|s| s.parse().ok())
    }

    /// Whether this tag is allowed to carry payload fields.
    pub fn carries_payload(&self) -> bool {
        !matches!(self, Tag::Keepalive)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tag {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| ProtocolError::UnknownTag(s.to_string()))
    }
}

impl From<Tag> for Value {
    fn from(tag: Tag) -> Self {
        Value::String(tag.as_str().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_names_round_trip_through_from_str() {
        for tag in Tag::ALL {
            assert_eq!(tag.as_str().parse::<Tag>().unwrap(), tag);
            assert_eq!(tag.to_string(), tag.as_str());
        }
    }

    #[test]
    fn test_unknown_tag_is_rejected() {
        let err = "HEARTBEAT".parse::<Tag>().unwrap_err();
        assert_eq!(err, ProtocolError::UnknownTag("HEARTBEAT".to_string()));
    }

    #[test]
    fn test_serde_uses_wire_names() {
        assert_eq!(serde_json::to_value(Tag::Keepalive).unwrap(), json!("KEEPALIVE"));
        let tag: Tag = serde_json::from_value(json!("CONFIG")).unwrap();
        assert_eq!(tag, Tag::Config);
    }

    #[test]
    fn test_only_keepalive_is_payload_free() {
        assert!(Tag::Config.carries_payload());
        assert!(Tag::Record.carries_payload());
        assert!(!Tag::Keepalive.carries_payload());
    }
}
