// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Fluxnode Inc.

//! Module metadata reader
//!
//! Parses the fixed-layout header embedded in an installable firmware image.
//! The header is read-only evidence living inside the image itself; this
//! module never validates its contents - that is the verification gate's
//! job.
//!
//! Some image layouts carry a vector-table prologue (initial stack pointer
//! first): when the first word at the image base matches the SRAM pattern,
//! the header is taken to begin `0x184` bytes later.

use flux_hal::geometry::FlashDevice;
use flux_hal::{Board, InternalFlash};

/// Platform identity compiled into this firmware
pub const PLATFORM_ID: u16 = 14;

/// Mask isolating the vector-table stack-pointer pattern
const APP_START_MASK: u32 = 0x2FF1_0000;

/// Masked value indicating a vector-table entry (SRAM address)
const APP_START_PATTERN: u32 = 0x2000_0000;

/// Byte offset from the vector table to the module header
const VECTOR_TABLE_HEADER_OFFSET: u32 = 0x184;

/// Size of the on-flash module header in bytes
pub const MODULE_HEADER_SIZE: u32 = 16;

// =============================================================================
// Module Function
// =============================================================================

/// Role of an installable module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ModuleFunction {
    /// No declared function
    None = 0,
    /// Platform-neutral resource blob
    Resource = 1,
    /// Bootloader image
    Bootloader = 2,
    /// Monolithic firmware image
    MonoFirmware = 3,
    /// System part of a split firmware
    SystemPart = 4,
    /// User part of a split firmware
    UserPart = 5,
    /// Settings module
    Settings = 6,
}

impl From<u8> for ModuleFunction {
    fn from(value: u8) -> Self {
        match value {
            1 => Self::Resource,
            2 => Self::Bootloader,
            3 => Self::MonoFirmware,
            4 => Self::SystemPart,
            5 => Self::UserPart,
            6 => Self::Settings,
            _ => Self::None,
        }
    }
}

// =============================================================================
// Module Header
// =============================================================================

/// Fixed-layout module metadata header
///
/// Identity, extent and compatibility facts an image declares about itself.
/// Valid only while the image's memory is intact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleInfo {
    /// Address the module is linked to start at
    pub module_start_address: u32,
    /// Address one past the module's last byte (CRC trailer follows here)
    pub module_end_address: u32,
    /// Reserved byte from the header layout
    pub reserved: u8,
    /// Header flags
    pub flags: u8,
    /// Module version counter
    pub module_version: u16,
    /// Platform the module was built for
    pub platform_id: u16,
    /// Declared role of the module
    pub module_function: ModuleFunction,
    /// Index among modules of the same function
    pub module_index: u8,
}

impl ModuleInfo {
    /// Module length declared by the header
    #[must_use]
    pub const fn length(&self) -> u32 {
        self.module_end_address.wrapping_sub(self.module_start_address)
    }
}

/// Read the module header at `address`, internal flash only
///
/// Applies the vector-table prologue adjustment. Serial flash holds no
/// directly addressable structured header; reading it yields `None`. The
/// header contents are returned as-is, valid or not.
#[must_use]
pub fn module_info<B: Board>(
    board: &mut B,
    device: FlashDevice,
    address: u32,
) -> Option<ModuleInfo> {
    if device != FlashDevice::Internal {
        return None;
    }
    Some(read_header(board, address))
}

/// Linked start address declared by the module at `address`, 0 if no header
#[must_use]
pub fn module_address<B: Board>(board: &mut B, device: FlashDevice, address: u32) -> u32 {
    module_info(board, device, address).map_or(0, |info| info.module_start_address)
}

/// Declared module length at `address`, 0 if no header
#[must_use]
pub fn module_length<B: Board>(board: &mut B, device: FlashDevice, address: u32) -> u32 {
    module_info(board, device, address).map_or(0, |info| info.length())
}

/// Check the module at `address` declares the expected start address and
/// this firmware's platform identity
#[must_use]
pub fn is_module_info_valid<B: Board>(
    board: &mut B,
    device: FlashDevice,
    address: u32,
    expected_address: u32,
) -> bool {
    module_info(board, device, address).is_some_and(|info| {
        info.module_start_address == expected_address && info.platform_id == PLATFORM_ID
    })
}

fn read_header<B: Board>(board: &mut B, mut address: u32) -> ModuleInfo {
    let flash = board.internal_flash();

    if flash.read_word(address) & APP_START_MASK == APP_START_PATTERN {
        address += VECTOR_TABLE_HEADER_OFFSET;
    }

    let start = flash.read_word(address);
    let end = flash.read_word(address + 4);
    let meta = flash.read_word(address + 8);
    let identity = flash.read_word(address + 12);

    ModuleInfo {
        module_start_address: start,
        module_end_address: end,
        reserved: meta as u8,
        flags: (meta >> 8) as u8,
        module_version: (meta >> 16) as u16,
        platform_id: identity as u16,
        module_function: ModuleFunction::from((identity >> 16) as u8),
        module_index: (identity >> 24) as u8,
    }
}
