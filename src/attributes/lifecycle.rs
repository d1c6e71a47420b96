// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::{
    DEFAULT_ABORT_TIMEOUT_SECS, DEFAULT_CLEANUP_TIMEOUT_SECS, DEFAULT_HOST_TIMEOUT_SECS,
    DEFAULT_INITIALIZE_TIMEOUT_SECS, DEFAULT_PHASE_ATTEMPTS, DEFAULT_PROCESS_TIMEOUT_SECS,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Lifecycle phases driven by the supervising controller.
///
/// Each phase owns a `<phase>_timeout` and `<phase>_attempts` slot in the
/// attribute store. The core only stores them; enforcing them is the
/// controller's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecyclePhase {
    Initialize,
    Reinitialize,
    Process,
    Abort,
    Cleanup,
    Host,
}

impl LifecyclePhase {
    pub const ALL: [LifecyclePhase; 6] = [
        LifecyclePhase::Initialize,
        LifecyclePhase::Reinitialize,
        LifecyclePhase::Process,
        LifecyclePhase::Abort,
        LifecyclePhase::Cleanup,
        LifecyclePhase::Host,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LifecyclePhase::Initialize => "initialize",
            LifecyclePhase::Reinitialize => "reinitialize",
            LifecyclePhase::Process => "process",
            LifecyclePhase::Abort => "abort",
            LifecyclePhase::Cleanup => "cleanup",
            LifecyclePhase::Host => "host",
        }
    }

    pub fn timeout_attribute(&self) -> String {
        format!("{}_timeout", self.as_str())
    }

    pub fn attempts_attribute(&self) -> String {
        format!("{}_attempts", self.as_str())
    }

    /// Built-in policy used when neither the module nor the daemon configures one.
    pub fn default_policy(&self) -> LifecyclePolicy {
        let seconds = match self {
            LifecyclePhase::Initialize | LifecyclePhase::Reinitialize => {
                DEFAULT_INITIALIZE_TIMEOUT_SECS
            }
            LifecyclePhase::Process => DEFAULT_PROCESS_TIMEOUT_SECS,
            LifecyclePhase::Abort => DEFAULT_ABORT_TIMEOUT_SECS,
            LifecyclePhase::Cleanup => DEFAULT_CLEANUP_TIMEOUT_SECS,
            LifecyclePhase::Host => DEFAULT_HOST_TIMEOUT_SECS,
        };
        LifecyclePolicy {
            timeout: Duration::from_secs(seconds),
            attempts: DEFAULT_PHASE_ATTEMPTS,
        }
    }
}

impl fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Duration and retry count for one lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecyclePolicy {
    pub timeout: Duration,
    pub attempts: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_names_follow_phase() {
        assert_eq!(LifecyclePhase::Host.timeout_attribute(), "host_timeout");
        assert_eq!(
            LifecyclePhase::Reinitialize.attempts_attribute(),
            "reinitialize_attempts"
        );
    }

    #[test]
    fn test_default_policies_are_usable() {
        for phase in LifecyclePhase::ALL {
            let policy = phase.default_policy();
            assert!(policy.timeout > Duration::ZERO, "{} timeout", phase);
            assert!(policy.attempts >= 1, "{} attempts", phase);
        }
    }

    #[test]
    fn test_phase_deserializes_from_snake_case() {
        let phase: LifecyclePhase = serde_yaml::from_str("host").unwrap();
        assert_eq!(phase, LifecyclePhase::Host);
    }
}
