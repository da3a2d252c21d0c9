// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Fluxnode Inc.

//! Flash device identity and geometry
//!
//! Address windows, sector/page tables and the firmware layout constants for
//! the two non-volatile storage devices of the Fluxnode platform. Pure
//! lookup tables - no state, no hardware access.
//!
//! # Internal Flash Characteristics
//!
//! - Total: 1 MiB at `0x0800_0000`
//! - Sectors: 4 x 16 KiB, 1 x 64 KiB, 7 x 128 KiB (non-uniform)
//! - Sector 0 holds the bootloader and is never a valid install target
//! - Installable region: `0x0802_0000..0x0810_0000` (uniform 128 KiB sectors)
//!
//! # Serial Flash Characteristics (`serial-flash` feature)
//!
//! - Total: 1 MiB, byte addresses from 0
//! - Uniform 4 KiB erase pages
//! - Addresses below `0x4000` are reserved

// =============================================================================
// Device Identity
// =============================================================================

/// Non-volatile storage device identity
///
/// A closed set: builds without the external serial flash simply have no
/// `Serial` variant, so code paths for the absent device do not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum FlashDevice {
    /// Internal byte-addressable flash with fixed erase sectors
    Internal = 0,
    /// External serial (SPI) flash with uniform page geometry
    #[cfg(feature = "serial-flash")]
    Serial = 1,
}

impl FlashDevice {
    /// Decode a persisted device identifier
    ///
    /// Returns `None` for identifiers that do not name a device in this
    /// build.
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Internal),
            #[cfg(feature = "serial-flash")]
            1 => Some(Self::Serial),
            _ => None,
        }
    }
}

// =============================================================================
// Internal Flash Memory Map
// =============================================================================

/// Internal flash base address
pub const INTERNAL_FLASH_BASE: u32 = 0x0800_0000;

/// Internal flash end address (exclusive)
pub const INTERNAL_FLASH_END: u32 = 0x0810_0000;

/// End (exclusive) of the reserved base sector holding the bootloader
pub const INTERNAL_RESERVED_END: u32 = 0x0800_4000;

/// Lowest address an image may be installed at
pub const INTERNAL_INSTALL_BASE: u32 = 0x0802_0000;

/// Erase granularity of the installable region (uniform 128 KiB sectors)
pub const INTERNAL_ERASE_UNIT: u32 = 0x0002_0000;

/// Number of internal flash sectors
pub const INTERNAL_SECTOR_COUNT: usize = 12;

/// Ordered exclusive upper bounds of the internal sectors
///
/// First match wins: an address belongs to the first sector whose bound is
/// above it. Sector sizes grow with the address (16 KiB x 4, 64 KiB, then
/// 128 KiB x 7).
pub const SECTOR_LIMITS: [u32; INTERNAL_SECTOR_COUNT] = [
    0x0800_4000,
    0x0800_8000,
    0x0800_C000,
    0x0801_0000,
    0x0802_0000,
    0x0804_0000,
    0x0806_0000,
    0x0808_0000,
    0x080A_0000,
    0x080C_0000,
    0x080E_0000,
    0x0810_0000,
];

/// Base address of an internal sector
#[must_use]
pub fn sector_base(sector: u8) -> Option<u32> {
    let sector = sector as usize;
    if sector >= INTERNAL_SECTOR_COUNT {
        return None;
    }
    if sector == 0 {
        Some(INTERNAL_FLASH_BASE)
    } else {
        Some(SECTOR_LIMITS[sector - 1])
    }
}

/// Size in bytes of an internal sector
#[must_use]
pub fn sector_size(sector: u8) -> Option<u32> {
    let base = sector_base(sector)?;
    Some(SECTOR_LIMITS[sector as usize] - base)
}

// =============================================================================
// Serial Flash Memory Map
// =============================================================================

/// End (exclusive) of the reserved low region of the serial flash
#[cfg(feature = "serial-flash")]
pub const SERIAL_RESERVED_END: u32 = 0x4000;

/// Serial flash capacity in bytes
#[cfg(feature = "serial-flash")]
pub const SERIAL_FLASH_CAPACITY: u32 = 0x0010_0000;

/// Serial flash erase page size
#[cfg(feature = "serial-flash")]
pub const SERIAL_FLASH_PAGE_SIZE: u32 = 0x1000;

// =============================================================================
// Firmware Layout
// =============================================================================

/// Address of the resident core firmware image
pub const CORE_FIRMWARE_ADDRESS: u32 = 0x0802_0000;

/// Install address of the user firmware image
pub const USER_FIRMWARE_ADDRESS: u32 = 0x080A_0000;

/// Address of the built-in factory image
pub const FACTORY_IMAGE_ADDRESS: u32 = 0x080E_0000;

/// Size of a firmware image slot
pub const FIRMWARE_IMAGE_SIZE: u32 = 0x0002_0000;
