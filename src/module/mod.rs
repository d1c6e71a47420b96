// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod instance;


pub use instance::{InstanceStorage, ModuleInstance};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of the module class an instance was created from.
///
/// It names the attribute namespace the instance reads and writes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleClass(String);

impl ModuleClass {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModuleClass {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ModuleClass {
    fn from(name: String) -> Self {
        Self(name)
    }
}
