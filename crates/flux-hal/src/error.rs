// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Fluxnode Inc.

//! HAL error types

use core::fmt;
use flux_common::Error;

/// Result type alias for HAL operations
pub type HalResult<T> = core::result::Result<T, HalError>;

/// HAL error type
///
/// Returned by the fallible capability calls (internal flash erase/program,
/// configuration store access). The media access layer converts these into
/// the unified [`Error`] taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HalError {
    /// Program-erase controller is locked
    FlashLocked,
    /// Erase operation failed
    EraseFailed,
    /// Program operation failed
    ProgramFailed,
    /// Address outside the device window
    OutOfBounds,
    /// Storage read failed
    ReadFailed,
    /// Storage write failed
    WriteFailed,
}

impl HalError {
    /// Get a short static description
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FlashLocked => "flash controller locked",
            Self::EraseFailed => "erase failed",
            Self::ProgramFailed => "program failed",
            Self::OutOfBounds => "address out of bounds",
            Self::ReadFailed => "read failed",
            Self::WriteFailed => "write failed",
        }
    }
}

impl fmt::Display for HalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HalError> for Error {
    fn from(e: HalError) -> Self {
        match e {
            HalError::EraseFailed => Error::EraseFailed,
            HalError::FlashLocked | HalError::ProgramFailed => Error::ProgramFailed,
            HalError::OutOfBounds => Error::RangeInvalid,
            HalError::ReadFailed => Error::StorageReadFailed,
            HalError::WriteFailed => Error::StorageWriteFailed,
        }
    }
}
