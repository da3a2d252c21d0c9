// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Fluxnode Inc.

//! Verification gate
//!
//! Decides pass/fail for a requested copy before any destructive operation
//! starts. Each sub-check is enabled by a flag bit; the platform check is
//! unconditional once a header is read. Verification has no side effects on
//! storage.

use bitflags::bitflags;
use flux_common::Error;
use flux_hal::geometry::FlashDevice;
use flux_hal::{Board, Crc32, InternalFlash};

use crate::module_info::{module_info, module_length, ModuleFunction, PLATFORM_ID};

bitflags! {
    /// Checks that must pass before a copy may proceed
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct VerifyFlags: u8 {
        /// Recompute CRC32 over the module extent and match the trailer
        const CRC = 1 << 1;
        /// Destination must equal the header's declared start address
        const DESTINATION_IS_START_ADDRESS = 1 << 2;
        /// Header's declared function must match the requested one
        const FUNCTION = 1 << 3;
        /// Supplied length must cover the declared module plus its trailer
        const LENGTH = 1 << 4;
    }
}

/// The sub-check a verification failed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VerifyError {
    /// Supplied length is smaller than the declared module plus CRC trailer
    Length,
    /// Module was built for a different platform
    Platform,
    /// Destination differs from the module's declared start address
    Destination,
    /// Module declares a different function than requested
    Function,
    /// CRC trailer does not match the recomputed checksum
    Crc,
}

impl From<VerifyError> for Error {
    fn from(_: VerifyError) -> Self {
        Error::VerifyFailed
    }
}

/// Verify the module at `source_address` against the requested copy
///
/// Checks run in a fixed order and short-circuit on the first failure:
/// length cover (when `LENGTH` or `CRC` is set), platform identity
/// (always, unless the module is a resource), destination address,
/// function, CRC trailer. Only meaningful for internal-flash sources;
/// serial images are trusted blobs at this layer.
pub fn verify_module<B: Board>(
    board: &mut B,
    source_address: u32,
    destination_address: u32,
    length: u32,
    function: ModuleFunction,
    flags: VerifyFlags,
) -> Result<(), VerifyError> {
    let declared_length = module_length(board, FlashDevice::Internal, source_address);

    if flags.intersects(VerifyFlags::LENGTH | VerifyFlags::CRC)
        && length < declared_length.saturating_add(4)
    {
        return Err(VerifyError::Length);
    }

    let Some(info) = module_info(board, FlashDevice::Internal, source_address) else {
        return Err(VerifyError::Platform);
    };

    if info.module_function != ModuleFunction::Resource && info.platform_id != PLATFORM_ID {
        return Err(VerifyError::Platform);
    }

    if flags.contains(VerifyFlags::DESTINATION_IS_START_ADDRESS)
        && info.module_start_address != destination_address
    {
        return Err(VerifyError::Destination);
    }

    if flags.contains(VerifyFlags::FUNCTION) && info.module_function != function {
        return Err(VerifyError::Function);
    }

    if flags.contains(VerifyFlags::CRC)
        && !verify_module_crc32(board, FlashDevice::Internal, source_address, declared_length)
    {
        return Err(VerifyError::Crc);
    }

    Ok(())
}

/// Check the CRC trailer of `length` bytes starting at `address`
///
/// The expected checksum is the big-endian word immediately following the
/// region. Only defined for internal flash and non-empty regions.
#[must_use]
pub fn verify_module_crc32<B: Board>(
    board: &mut B,
    device: FlashDevice,
    address: u32,
    length: u32,
) -> bool {
    if device != FlashDevice::Internal || length == 0 {
        return false;
    }

    let expected = board.internal_flash().read_word(address + length).swap_bytes();

    board.crc32().reset();
    let mut cursor = address;
    let mut remaining = length;
    while remaining > 0 {
        let bytes = board.internal_flash().read_word(cursor).to_le_bytes();
        let take = remaining.min(4) as usize;
        board.crc32().update(&bytes[..take]);
        cursor += 4;
        remaining -= take as u32;
    }

    board.crc32().finalize() == expected
}
