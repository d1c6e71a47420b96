// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Tagged message protocol shared by the main process and every module child.
//!
//! Three message kinds exist: `CONFIG`, `RECORD` and `KEEPALIVE`. A message is
//! built in unit form ([`Message`]) and can be spread with [`flatten`] when the
//! caller needs the tag and fields separately. Transport is someone else's job.
//!
//! # Payload shape
//!
//! [`build_config`] and [`build_record`] take their payload either as
//! individual values or as one already-built sequence. Which one is meant is
//! decided purely by the shape of the first argument: if it is an array, its
//! elements are the payload and anything after it is ignored.
//!
//! ```
//! use modcore::protocol::{build_record, Tag};
//! use serde_json::json;
//!
//! let positional = build_record(&[json!("a"), json!(1)]);
//! let prebuilt = build_record(&[json!(["a", 1])]);
//! assert_eq!(positional, prebuilt);
//! assert_eq!(positional.tag(), Tag::Record);
//! ```
//!
//! # Classification
//!
//! The `is_*` predicates only recognise the *bare* tag. A full message is
//! classified by its first element or by [`Message::tag`].

mod message;
mod tag;

pub use message::Message;
pub use tag::Tag;

use crate::Value;

/// Build a unit message from a tag and its payload.
pub fn build_message(tag: Tag, payload: Vec<Value>) -> Message {
    Message::new(tag, payload)
}

/// Spread a message into `[TAG, payload...]`.
pub fn flatten(message: &Message) -> Vec<Value> {
    message.flatten()
}

fn payload_from_args(args: &[Value]) -> Vec<Value> {
    match args.first() {
        Some(Value::Array(prebuilt)) => prebuilt.clone(),
        _ => args.to_vec(),
    }
}

/// `CONFIG` message; normally the pair `(global, instance)`, or empty for the bare tag.
pub fn build_config(args: &[Value]) -> Message {
    build_message(Tag::Config, payload_from_args(args))
}

/// `RECORD` message carrying one data record, or the bare tag when empty.
pub fn build_record(args: &[Value]) -> Message {
    build_message(Tag::Record, payload_from_args(args))
}

/// Always the bare `KEEPALIVE`.
pub fn build_keepalive() -> Message {
    Message::bare(Tag::Keepalive)
}

/// Anything that may stand for a bare tag.
pub trait TagProbe {
    /// The tag this value is equal to, if it is a bare tag at all.
    fn bare_tag(&self) -> Option<Tag>;
}

impl TagProbe for Tag {
    fn bare_tag(&self) -> Option<Tag> {
        Some(*self)
    }
}

impl TagProbe for Message {
    fn bare_tag(&self) -> Option<Tag> {
        self.is_bare().then(|| self.tag())
    }
}

impl TagProbe for Value {
    fn bare_tag(&self) -> Option<Tag> {
        Tag::from_value(self)
    }
}

impl<T: TagProbe> TagProbe for Option<T> {
    fn bare_tag(&self) -> Option<Tag> {
        self.as_ref().and_then(TagProbe::bare_tag)
    }
}

impl<T: TagProbe + ?Sized> TagProbe for &T {
    fn bare_tag(&self) -> Option<Tag> {
        (**self).bare_tag()
    }
}

pub fn is_config<P: TagProbe + ?Sized>(probe: &P) -> bool {
    probe.bare_tag() == Some(Tag::Config)
}

pub fn is_record<P: TagProbe + ?Sized>(probe: &P) -> bool {
    probe.bare_tag() == Some(Tag::Record)
}

pub fn is_keepalive<P: TagProbe + ?Sized>(probe: &P) -> bool {
    probe.bare_tag() == Some(Tag::Keepalive)
}
