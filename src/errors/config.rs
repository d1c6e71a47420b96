// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::attributes::LifecyclePhase;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during daemon configuration validation
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Two module entries share the same class
    DuplicateModuleClass {
        /// The repeated class name
        class: String,
    },
    /// A module entry has an empty class name
    EmptyModuleClass {
        /// Position of the entry in the `modules` list
        index: usize,
    },
    /// A lifecycle phase is configured with zero attempts
    ZeroAttempts {
        /// Module class, or `None` for the daemon-wide defaults
        class: Option<String>,
        phase: LifecyclePhase,
    },
    /// A lifecycle timeout is zero, negative, or not a finite number
    InvalidTimeout {
        /// Module class, or `None` for the daemon-wide defaults
        class: Option<String>,
        phase: LifecyclePhase,
        seconds: f64,
    },
    /// A lifecycle timeout is too large to be represented as a `Duration`
    TimeoutOutOfRange {
        /// Module class, or `None` for the daemon-wide defaults
        class: Option<String>,
        phase: LifecyclePhase,
        seconds: f64,
    },
}

fn scope(class: &Option<String>) -> String {
    match class {
        Some(class) => format!("module '{}'", class),
        None => "daemon defaults".to_string(),
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::DuplicateModuleClass { class } => {
                write!(f, "Duplicate module class: '{}'", class)
            }
            ValidationError::EmptyModuleClass { index } => {
                write!(f, "Module entry #{} has an empty class name", index)
            }
            ValidationError::ZeroAttempts { class, phase } => {
                write!(
                    f,
                    "{}: '{}' phase must allow at least one attempt",
                    scope(class),
                    phase
                )
            }
            ValidationError::InvalidTimeout {
                class,
                phase,
                seconds,
            } => {
                write!(
                    f,
                    "{}: '{}' timeout must be a positive number of seconds, got {}",
                    scope(class),
                    phase,
                    seconds
                )
            }
            ValidationError::TimeoutOutOfRange {
                class,
                phase,
                seconds,
            } => {
                write!(
                    f,
                    "{}: '{}' timeout of {} seconds is out of range",
                    scope(class),
                    phase,
                    seconds
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors raised while loading a daemon configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration validation failed:\n{}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
