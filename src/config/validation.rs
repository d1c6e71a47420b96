// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Daemon configuration validation.
//!
//! Validation collects every problem it finds instead of stopping at the
//! first one, so a single run reports all of them.
//!
//! # Rules
//!
//! * Every module entry names a non-empty class
//! * No class appears twice
//! * Every configured phase allows at least one attempt
//! * Every configured timeout is a finite number of seconds greater than zero
//!   that fits in a `Duration`
//!
//! The same phase rules apply to the daemon-wide `lifecycle` defaults and to
//! each module's overrides.
//!
//! # Example
//!
//! ```rust
//! use modcore::config::{validate_config, DaemonConfig, ModuleConfig};
//!
//! let config = DaemonConfig {
//!     modules: vec![
//!         ModuleConfig { class: "echo".to_string(), ..Default::default() },
//!         ModuleConfig { class: "echo".to_string(), ..Default::default() },
//!     ],
//!     ..Default::default()
//! };
//!
//! let errors = validate_config(&config).unwrap_err();
//! assert_eq!(errors.len(), 1);
//! ```

use crate::attributes::LifecyclePhase;
use crate::config::{DaemonConfig, PhaseConfig};
use crate::errors::ValidationError;
use std::collections::{HashMap, HashSet};
use std::time::Duration;

/// Check a daemon configuration, returning every rule violation found.
pub fn validate_config(config: &DaemonConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_phases(&config.lifecycle, None, &mut errors);

    let mut seen = HashSet::new();
    for (index, module) in config.modules.iter().enumerate() {
        if module.class.trim().is_empty() {
            errors.push(ValidationError::EmptyModuleClass { index });
            continue;
        }
        if !seen.insert(module.class.as_str()) {
            errors.push(ValidationError::DuplicateModuleClass {
                class: module.class.clone(),
            });
        }
        check_phases(&module.lifecycle, Some(&module.class), &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_phases(
    phases: &HashMap<LifecyclePhase, PhaseConfig>,
    class: Option<&String>,
    errors: &mut Vec<ValidationError>,
) {
    // Sorted so the report is stable across runs.
    let mut entries: Vec<_> = phases.iter().collect();
    entries.sort_by_key(|(phase, _)| **phase);

    for (&phase, settings) in entries {
        if settings.attempts == Some(0) {
            errors.push(ValidationError::ZeroAttempts {
                class: class.cloned(),
                phase,
            });
        }
        if let Some(seconds) = settings.timeout_seconds {
            if !seconds.is_finite() || seconds <= 0.0 {
                errors.push(ValidationError::InvalidTimeout {
                    class: class.cloned(),
                    phase,
                    seconds,
                });
            } else if Duration::try_from_secs_f64(seconds).is_err() {
                errors.push(ValidationError::TimeoutOutOfRange {
                    class: class.cloned(),
                    phase,
                    seconds,
                });
            }
        }
    }
}
