// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Fluxnode Inc.

//! Factory-reset recovery
//!
//! Restores a known-good image from the reserved journal slot, or from the
//! compiled-in default when the slot was never populated (devices whose
//! bootloader predates the reserved-slot mechanism). Independent of the
//! general journal; no general slot is consumed.

use flux_common::Result;
use flux_hal::geometry::{
    FlashDevice, FACTORY_IMAGE_ADDRESS, FIRMWARE_IMAGE_SIZE, USER_FIRMWARE_ADDRESS,
};
use flux_hal::Board;

use crate::copy::copy_memory;
use crate::journal::{read_pending_table, SlotEntry, FACTORY_RESET_SLOT};
use crate::module_info::ModuleFunction;
use crate::verify::VerifyFlags;

/// Module function of the built-in factory image
pub const FACTORY_RESET_FUNCTION: ModuleFunction = ModuleFunction::MonoFirmware;

/// Verification required for the default factory restore
pub const FACTORY_RESET_VERIFY: VerifyFlags = VerifyFlags::CRC
    .union(VerifyFlags::DESTINATION_IS_START_ADDRESS)
    .union(VerifyFlags::FUNCTION);

/// Restore the factory firmware image
///
/// Uses the reserved slot's stored parameters when it holds a factory-reset
/// record; otherwise falls back to the compiled-in default source and
/// destination with destination, function and CRC verification. The copy's
/// outcome is the restore's outcome.
pub fn restore_factory_firmware<B: Board>(board: &mut B) -> Result<()> {
    let table = read_pending_table(board)?;

    if let SlotEntry::FactoryReset(install) = table.entry(FACTORY_RESET_SLOT) {
        copy_memory(
            board,
            install.source_device,
            install.source_address,
            install.destination_device,
            install.destination_address,
            install.length,
            install.module_function,
            install.flags,
        )
    } else {
        copy_memory(
            board,
            FlashDevice::Internal,
            FACTORY_IMAGE_ADDRESS,
            FlashDevice::Internal,
            USER_FIRMWARE_ADDRESS,
            FIRMWARE_IMAGE_SIZE,
            FACTORY_RESET_FUNCTION,
            FACTORY_RESET_VERIFY,
        )
    }
}
