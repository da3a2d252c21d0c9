// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Fluxnode Inc.

//! Copy and compare engines
//!
//! Streams a byte range between any pair of devices in 4-byte units,
//! erasing the destination first and gating internal-flash sources behind
//! the verification gate. The compare engine is the read-only twin with the
//! same range validation and streaming shape.
//!
//! The streaming loop is address-based: a `length` that is not a multiple
//! of 4 leaves the final sub-word unit uncopied. Callers supply 4-byte
//! aligned lengths.

use flux_common::{Error, Result};
use flux_hal::geometry::FlashDevice;
use flux_hal::{Board, InternalFlash};

#[cfg(feature = "serial-flash")]
use flux_hal::SerialFlash;

use crate::erase::erase_memory;
use crate::module_info::ModuleFunction;
use crate::range::is_valid_range;
use crate::verify::{verify_module, VerifyFlags};

/// Copy `length` bytes from a source range to a destination range
///
/// Validates both ranges, runs the verification gate for internal-flash
/// sources when any flag is set, erases the destination, then streams
/// 4-byte units until the inclusive end is reached. Aborts on the first
/// program failure the hardware reports; bytes already written stay
/// written.
pub fn copy_memory<B: Board>(
    board: &mut B,
    source_device: FlashDevice,
    source_address: u32,
    destination_device: FlashDevice,
    destination_address: u32,
    length: u32,
    function: ModuleFunction,
    flags: VerifyFlags,
) -> Result<()> {
    if !is_valid_range(source_device, source_address, length) {
        return Err(Error::RangeInvalid);
    }
    if !is_valid_range(destination_device, destination_address, length) {
        return Err(Error::RangeInvalid);
    }

    if source_device == FlashDevice::Internal && !flags.is_empty() {
        verify_module(
            board,
            source_address,
            destination_address,
            length,
            function,
            flags,
        )?;
    }

    erase_memory(board, destination_device, destination_address, length)?;

    #[cfg(feature = "serial-flash")]
    if source_device == FlashDevice::Serial {
        board.serial_flash().init();
    }

    if destination_device == FlashDevice::Internal {
        board.internal_flash().unlock();
    }

    let end_address = source_address + length - 1;
    let mut source = source_address;
    let mut destination = destination_address;

    while source < end_address {
        let word = read_unit(board, source_device, source);

        match destination_device {
            FlashDevice::Internal => {
                if board.internal_flash().program_word(destination, word).is_err() {
                    return Err(Error::ProgramFailed);
                }
            }
            #[cfg(feature = "serial-flash")]
            FlashDevice::Serial => {
                board.serial_flash().write(destination, &word.to_le_bytes());
            }
        }

        source += 4;
        destination += 4;
    }

    if destination_device == FlashDevice::Internal {
        board.internal_flash().lock();
    }

    Ok(())
}

/// Compare two ranges byte for byte
///
/// Same range validation and streaming shape as the copy engine, but only
/// reads. Returns `false` on the first differing 4-byte unit or on any
/// invalid range; `true` only when every unit matches.
#[must_use]
pub fn compare_memory<B: Board>(
    board: &mut B,
    source_device: FlashDevice,
    source_address: u32,
    destination_device: FlashDevice,
    destination_address: u32,
    length: u32,
) -> bool {
    if !is_valid_range(source_device, source_address, length) {
        return false;
    }
    if !is_valid_range(destination_device, destination_address, length) {
        return false;
    }

    #[cfg(feature = "serial-flash")]
    if source_device == FlashDevice::Serial || destination_device == FlashDevice::Serial {
        board.serial_flash().init();
    }

    let end_address = source_address + length - 1;
    let mut source = source_address;
    let mut destination = destination_address;

    while source < end_address {
        let source_word = read_unit(board, source_device, source);
        let destination_word = read_unit(board, destination_device, destination);

        if source_word != destination_word {
            return false;
        }

        source += 4;
        destination += 4;
    }

    true
}

fn read_unit<B: Board>(board: &mut B, device: FlashDevice, address: u32) -> u32 {
    match device {
        FlashDevice::Internal => board.internal_flash().read_word(address),
        #[cfg(feature = "serial-flash")]
        FlashDevice::Serial => {
            let mut bytes = [0u8; 4];
            board.serial_flash().read(address, &mut bytes);
            u32::from_le_bytes(bytes)
        }
    }
}
