// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Fluxnode Inc.

//! Address-range validation
//!
//! Every destructive operation (erase, program, copy) and every read-side
//! engine validates its range here first; no caller is trusted to have
//! pre-validated.

use flux_hal::geometry::{
    FlashDevice, INTERNAL_FLASH_BASE, INTERNAL_FLASH_END, INTERNAL_INSTALL_BASE,
    INTERNAL_RESERVED_END,
};

#[cfg(feature = "serial-flash")]
use flux_hal::geometry::{SERIAL_FLASH_CAPACITY, SERIAL_RESERVED_END};

/// Check a `(device, start, length)` triple against the device's window and
/// reserved regions
///
/// Ranges are length-based with an inclusive end of `start + length - 1`.
/// Zero-length ranges and ranges whose end would overflow the address space
/// are invalid. For the internal device the reserved bootloader sector must
/// never be covered and the range must lie inside the installable window;
/// for the serial device the reserved low region and the device capacity
/// bound the range.
#[must_use]
pub fn is_valid_range(device: FlashDevice, start: u32, length: u32) -> bool {
    if length == 0 {
        return false;
    }
    let Some(end) = start.checked_add(length - 1) else {
        return false;
    };

    match device {
        FlashDevice::Internal => {
            if start == INTERNAL_FLASH_BASE && end >= INTERNAL_RESERVED_END {
                return false;
            }
            if start < INTERNAL_INSTALL_BASE || end >= INTERNAL_FLASH_END {
                return false;
            }
            true
        }
        #[cfg(feature = "serial-flash")]
        FlashDevice::Serial => {
            if start < SERIAL_RESERVED_END || end >= SERIAL_FLASH_CAPACITY {
                return false;
            }
            true
        }
    }
}
