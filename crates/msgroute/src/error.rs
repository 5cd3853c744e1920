// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Registry errors.

use thiserror::Error;

/// Errors raised by identifier-indexed lookups.
///
/// An out-of-range id means a message type outside the registered family
/// reached the caller. It is a programming error; the operation that
/// triggered it should be aborted, not retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Id {id} is out of range [{min}, {max}]")]
    IdOutOfRange { id: usize, min: usize, max: usize },
}

/// Convenient alias for registry results.
pub type Result<T> = std::result::Result<T, RegistryError>;
