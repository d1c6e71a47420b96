// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::ProtocolError;
use crate::protocol::Tag;
use crate::Value;
use serde::{Deserialize, Serialize};

/// A tagged sequence `(Tag, payload...)` exchanged between the main process
/// and a module's child process.
///
/// A message with no payload is the *bare tag*. Bare tags double as type
/// sentinels for the `is_*` predicates in [`crate::protocol`].
///
/// The serialized unit form is the tag string for a bare message and the
/// array `[TAG, payload...]` otherwise:
///
/// ```
/// use modcore::protocol::{Message, Tag};
/// use serde_json::json;
///
/// let record = Message::new(Tag::Record, vec![json!("host-1"), json!(42)]);
/// assert_eq!(serde_json::to_value(&record).unwrap(), json!(["RECORD", "host-1", 42]));
///
/// let keepalive = Message::bare(Tag::Keepalive);
/// assert_eq!(serde_json::to_value(&keepalive).unwrap(), json!("KEEPALIVE"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "Value", try_from = "Value")]
pub struct Message {
    tag: Tag,
    payload: Vec<Value>,
}

impl Message {
    /// Message with the given tag and fields.
    ///
    /// Payload passed with a `KEEPALIVE` tag is dropped; that tag never carries any.
    pub fn new(tag: Tag, payload: Vec<Value>) -> Self {
        let payload = if tag.carries_payload() {
            payload
        } else {
            Vec::new()
        };
        Self { tag, payload }
    }

    /// The bare tag sentinel.
    pub fn bare(tag: Tag) -> Self {
        Self {
            tag,
            payload: Vec::new(),
        }
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn payload(&self) -> &[Value] {
        &self.payload
    }

    pub fn into_payload(self) -> Vec<Value> {
        self.payload
    }

    /// True when the message is just its tag.
    pub fn is_bare(&self) -> bool {
        self.payload.is_empty()
    }

    /// Spread form: the tag followed by every payload field.
    pub fn flatten(&self) -> Vec<Value> {
        let mut flat = Vec::with_capacity(self.payload.len() + 1);
        flat.push(Value::from(self.tag));
        flat.extend(self.payload.iter().cloned());
        flat
    }

    /// Unit form as a single value, ready for a transport to serialize.
    pub fn to_unit(&self) -> Value {
        if self.is_bare() {
            Value::from(self.tag)
        } else {
            Value::Array(self.flatten())
        }
    }

    /// Decode an inbound unit, the inverse of [`Message::to_unit`].
    pub fn from_unit(unit: Value) -> Result<Self, ProtocolError> {
        match unit {
            Value::String(name) => Ok(Message::bare(name.parse()?)),
            Value::Array(fields) => Message::from_flat(fields),
            other => Err(ProtocolError::NonStringTag(other.to_string())),
        }
    }

    /// Decode a spread sequence `[TAG, payload...]`.
    pub fn from_flat(fields: Vec<Value>) -> Result<Self, ProtocolError> {
        let mut fields = fields.into_iter();
        let tag: Tag = match fields.next() {
            None => return Err(ProtocolError::Empty),
            Some(Value::String(name)) => name.parse()?,
            Some(other) => return Err(ProtocolError::NonStringTag(other.to_string())),
        };
        let payload: Vec<Value> = fields.collect();
        if !tag.carries_payload() && !payload.is_empty() {
            return Err(ProtocolError::UnexpectedPayload {
                tag: tag.to_string(),
                len: payload.len(),
            });
        }
        Ok(Self { tag, payload })
    }
}

impl From<Message> for Value {
    fn from(message: Message) -> Self {
        message.to_unit()
    }
}

impl TryFrom<Value> for Message {
    type Error = ProtocolError;

    fn try_from(unit: Value) -> Result<Self, Self::Error> {
        Message::from_unit(unit)
    }
}
