// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::attributes::{normalize_name, AttributeValue, Attributes};
use crate::errors::AttributeError;
use crate::observability::messages::attribute::AccessorMisuse;
use crate::observability::messages::StructuredLog;
use crate::traits::{ApiBridge, LogLevel};
use crate::Value;
use std::fmt;
use std::panic::Location;

/// Verb of an `<op>_<name>` accessor call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessorOp {
    Get,
    Set,
    Put,
    Push,
    Pop,
    Unshift,
    Shift,
}

impl AccessorOp {
    pub const ALL: [AccessorOp; 7] = [
        AccessorOp::Get,
        AccessorOp::Set,
        AccessorOp::Put,
        AccessorOp::Push,
        AccessorOp::Pop,
        AccessorOp::Unshift,
        AccessorOp::Shift,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccessorOp::Get => "get",
            AccessorOp::Set => "set",
            AccessorOp::Put => "put",
            AccessorOp::Push => "push",
            AccessorOp::Pop => "pop",
            AccessorOp::Unshift => "unshift",
            AccessorOp::Shift => "shift",
        }
    }

    pub fn from_verb(verb: &str) -> Option<Self> {
        let verb = verb.to_ascii_lowercase();
        AccessorOp::ALL.into_iter().find(|op| op.as_str() == verb)
    }

    fn check_arity(&self, call: &str, got: usize) -> Result<(), AttributeError> {
        let (ok, expected) = match self {
            AccessorOp::Get | AccessorOp::Pop | AccessorOp::Shift => (got == 0, "0"),
            AccessorOp::Set | AccessorOp::Push | AccessorOp::Unshift => (got == 1, "1"),
            AccessorOp::Put => (true, "any number of"),
        };
        if ok {
            Ok(())
        } else {
            Err(AttributeError::Arity {
                call: call.to_string(),
                expected,
                got,
            })
        }
    }
}

impl fmt::Display for AccessorOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed `<op>_<name>` call, e.g. `push_targets`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessorCall {
    pub op: AccessorOp,
    /// Normalized slot name.
    pub name: String,
    raw: String,
}

impl AccessorCall {
    /// Split a call name at its first underscore.
    ///
    /// ```
    /// use modcore::attributes::{AccessorCall, AccessorOp};
    ///
    /// let call = AccessorCall::parse("Get_Process_Timeout").unwrap();
    /// assert_eq!(call.op, AccessorOp::Get);
    /// assert_eq!(call.name, "process_timeout");
    ///
    /// assert!(AccessorCall::parse("frobnicate_x").is_err());
    /// assert!(AccessorCall::parse("getx").is_err());
    /// ```
    pub fn parse(call: &str) -> Result<Self, AttributeError> {
        let malformed = || AttributeError::MalformedCall {
            call: call.to_string(),
        };
        let (verb, name) = call.split_once('_').ok_or_else(malformed)?;
        if verb.is_empty() || name.trim().is_empty() {
            return Err(malformed());
        }
        let op = AccessorOp::from_verb(verb).ok_or_else(|| AttributeError::UnknownOperation {
            call: call.to_string(),
            op: verb.to_string(),
        })?;
        Ok(Self {
            op,
            name: normalize_name(name),
            raw: call.to_string(),
        })
    }

    /// The call exactly as it was written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl Attributes {
    /// Service a parsed accessor call against this class's slots.
    ///
    /// `get` yields the slot, `pop`/`shift` yield the removed value (if any),
    /// and the writing operations yield `None`.
    pub fn apply(
        &self,
        call: &AccessorCall,
        args: Vec<Value>,
    ) -> Result<Option<AttributeValue>, AttributeError> {
        call.op.check_arity(call.as_str(), args.len())?;
        let mut args = args.into_iter();
        let name = call.name.as_str();
        match call.op {
            AccessorOp::Get => self.get(name),
            AccessorOp::Set => self.set(name, args.next().unwrap_or_default()).map(|_| None),
            AccessorOp::Put => self.put(name, args).map(|_| None),
            AccessorOp::Push => self.push(name, args.next().unwrap_or_default()).map(|_| None),
            AccessorOp::Unshift => self
                .unshift(name, args.next().unwrap_or_default())
                .map(|_| None),
            AccessorOp::Pop => Ok(self.pop(name)?.map(AttributeValue::Scalar)),
            AccessorOp::Shift => Ok(self.shift(name)?.map(AttributeValue::Scalar)),
        }
    }
}

/// Fail-soft accessor entry point.
///
/// Any failure, from an unparsable call to an undeclared slot, is reported
/// through the bridge's logging facility at `Error` level together with the
/// caller's location, and the call yields `None`. Without a bridge the report
/// goes to `tracing` instead.
pub fn dispatch(
    attributes: &Attributes,
    api: Option<&dyn ApiBridge>,
    call: &str,
    args: Vec<Value>,
    caller: &'static Location<'static>,
) -> Option<AttributeValue> {
    let result = AccessorCall::parse(call).and_then(|parsed| attributes.apply(&parsed, args));
    match result {
        Ok(value) => value,
        Err(error) => {
            let misuse = AccessorMisuse {
                class: attributes.class().as_str(),
                call,
                caller,
                error: &error,
            };
            match api {
                Some(api) => api.logging(LogLevel::Error, format_args!("{}", misuse)),
                None => misuse.log(),
            }
            None
        }
    }
}
