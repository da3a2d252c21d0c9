// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Fluxnode Inc.

//! Error types for the Fluxnode firmware
//!
//! This module defines the unified error type used throughout the
//! firmware-update subsystem. All errors are no_std compatible and carry no
//! heap-allocated context.

use core::fmt;

/// Result type alias for Fluxnode operations
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for the firmware-update subsystem
///
/// Every public flash/journal operation resolves to a definite success or
/// one of these failures. A failed erase, program or copy leaves the
/// destination range in an unspecified state; no rollback is performed at
/// this layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum Error {
    // =========================================================================
    // Address Range Errors (0x01xx)
    // =========================================================================
    /// Address range is outside the device window or overlaps a reserved
    /// region
    RangeInvalid,
    /// Operation requested against a device not present in this build
    DeviceUnsupported,

    // =========================================================================
    // Flash Hardware Errors (0x02xx)
    // =========================================================================
    /// Hardware reported an erase failure on a specific erase unit
    EraseFailed,
    /// Hardware reported a program failure on a specific word
    ProgramFailed,

    // =========================================================================
    // Module Verification Errors (0x03xx)
    // =========================================================================
    /// A requested verification sub-check (length, destination, function,
    /// CRC or platform) failed
    VerifyFailed,

    // =========================================================================
    // Update Journal / Configuration Store Errors (0x04xx)
    // =========================================================================
    /// No free general slot is available in the pending-install table
    JournalFull,
    /// Configuration store read failed
    StorageReadFailed,
    /// Configuration store write failed
    StorageWriteFailed,
}

impl Error {
    /// Get the numeric error code
    ///
    /// Codes are grouped by subsystem: 0x01xx address ranges, 0x02xx flash
    /// hardware, 0x03xx verification, 0x04xx journal/storage.
    #[must_use]
    pub const fn code(&self) -> u16 {
        match self {
            Self::RangeInvalid => 0x0101,
            Self::DeviceUnsupported => 0x0102,
            Self::EraseFailed => 0x0201,
            Self::ProgramFailed => 0x0202,
            Self::VerifyFailed => 0x0301,
            Self::JournalFull => 0x0401,
            Self::StorageReadFailed => 0x0402,
            Self::StorageWriteFailed => 0x0403,
        }
    }

    /// Get a short static description
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RangeInvalid => "address range invalid",
            Self::DeviceUnsupported => "flash device not supported",
            Self::EraseFailed => "flash erase failed",
            Self::ProgramFailed => "flash program failed",
            Self::VerifyFailed => "module verification failed",
            Self::JournalFull => "no free pending-install slot",
            Self::StorageReadFailed => "configuration store read failed",
            Self::StorageWriteFailed => "configuration store write failed",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:04X})", self.as_str(), self.code())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
