// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Fluxnode Inc.

//! Erase engine
//!
//! Converts a byte range into the minimal run of hardware erase units and
//! executes them through the device capability. Internal erase aborts on the
//! first unit the hardware reports failed; serial erase is best-effort and
//! always runs to the end.

use flux_common::{Error, Result};
use flux_hal::geometry::{FlashDevice, INTERNAL_ERASE_UNIT, SECTOR_LIMITS};
use flux_hal::{Board, InternalFlash, VoltageRange};

#[cfg(feature = "serial-flash")]
use flux_hal::geometry::SERIAL_FLASH_PAGE_SIZE;
#[cfg(feature = "serial-flash")]
use flux_hal::SerialFlash;

use crate::range::is_valid_range;

/// Map an internal-flash address to its sector identifier
///
/// Ordered threshold lookup, first match wins. Addresses at or beyond the
/// window end, and any non-internal device, yield `None`.
#[must_use]
pub fn sector_for_address(device: FlashDevice, address: u32) -> Option<u8> {
    if device != FlashDevice::Internal {
        return None;
    }

    SECTOR_LIMITS
        .iter()
        .position(|&limit| address < limit)
        .map(|sector| sector as u8)
}

/// Erase every unit covered by `length` bytes starting at `start`
///
/// The unit count is `length` divided by the device's erase granularity,
/// rounded up. A failed internal sector erase aborts immediately with
/// [`Error::EraseFailed`]; the units already erased stay erased.
pub fn erase_memory<B: Board>(
    board: &mut B,
    device: FlashDevice,
    start: u32,
    length: u32,
) -> Result<()> {
    if !is_valid_range(device, start, length) {
        return Err(Error::RangeInvalid);
    }

    match device {
        FlashDevice::Internal => {
            let Some(first_sector) = sector_for_address(device, start) else {
                return Err(Error::RangeInvalid);
            };

            let units = length.div_ceil(INTERNAL_ERASE_UNIT);
            let flash = board.internal_flash();
            flash.unlock();
            flash.clear_status_flags();

            for unit in 0..units {
                let sector = first_sector + unit as u8;
                if flash.erase_sector(sector, VoltageRange::Range3).is_err() {
                    return Err(Error::EraseFailed);
                }
            }

            flash.lock();
            Ok(())
        }
        #[cfg(feature = "serial-flash")]
        FlashDevice::Serial => {
            let serial = board.serial_flash();
            serial.init();

            let pages = length.div_ceil(SERIAL_FLASH_PAGE_SIZE);
            for page in 0..pages {
                serial.erase_page(start + page * SERIAL_FLASH_PAGE_SIZE);
            }
            Ok(())
        }
    }
}
