// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Process-global API handle.
//!
//! Each process installs its [`ApiBridge`] once, typically right after the
//! fork decides which side it is on. Lookups never fail loudly: a process
//! without a handle simply gets `None`.

use crate::errors::ApiError;
use crate::traits::ApiBridge;
use std::sync::{Arc, OnceLock};

static PROCESS_API: OnceLock<Arc<dyn ApiBridge>> = OnceLock::new();

/// Install the handle for this process. Only the first call succeeds.
pub fn install(api: Arc<dyn ApiBridge>) -> Result<(), ApiError> {
    PROCESS_API.set(api).map_err(|_| ApiError::AlreadyInstalled)
}

/// The installed handle, if any.
pub fn current() -> Option<Arc<dyn ApiBridge>> {
    PROCESS_API.get().cloned()
}

pub fn is_installed() -> bool {
    PROCESS_API.get().is_some()
}
