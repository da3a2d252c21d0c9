// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Fluxnode Inc.

//! Capability trait definitions
//!
//! The media access layer never touches hardware registers directly; it is
//! generic over these traits, which the platform drivers implement. The
//! `sim` module provides a RAM-backed implementation for host tests.

use crate::error::HalResult;

/// Program/erase parallelism profile, selected by supply voltage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VoltageRange {
    /// 1.8 V - 2.1 V, byte parallelism
    Range1,
    /// 2.1 V - 2.7 V, half-word parallelism
    Range2,
    /// 2.7 V - 3.6 V, word parallelism
    Range3,
}

/// Internal flash program-erase controller
///
/// Word-granular programming, sector-granular erase. Erase and program
/// report a per-call status; a failed call leaves the affected unit in an
/// unspecified state.
pub trait InternalFlash {
    /// Unlock the program-erase controller
    fn unlock(&mut self);

    /// Lock the program-erase controller
    fn lock(&mut self);

    /// Clear all pending status flags
    fn clear_status_flags(&mut self);

    /// Erase one hardware sector
    fn erase_sector(&mut self, sector: u8, range: VoltageRange) -> HalResult<()>;

    /// Program one native word
    ///
    /// Programming can only clear bits; writing zeros over already-programmed
    /// data is always legal without an erase.
    fn program_word(&mut self, address: u32, word: u32) -> HalResult<()>;

    /// Read one native word
    fn read_word(&self, address: u32) -> u32;
}

/// External serial (SPI) flash
///
/// Calls are treated as always succeeding; the driver retries internally and
/// has no per-call status to report.
#[cfg(feature = "serial-flash")]
pub trait SerialFlash {
    /// Initialize the device
    fn init(&mut self);

    /// Erase the page containing `address`
    fn erase_page(&mut self, address: u32);

    /// Read `buffer.len()` bytes starting at `address`
    fn read(&self, address: u32, buffer: &mut [u8]);

    /// Write `data` starting at `address`
    fn write(&mut self, address: u32, data: &[u8]);
}

/// Persistent configuration store
///
/// Backs the pending-install table. The store lives in internal flash and is
/// memory mapped; [`ConfigStore::app_data_address`] exposes the mapped
/// address so records can be zeroed in place word by word.
pub trait ConfigStore {
    /// Read application data at a logical offset
    fn read_app_data(&self, offset: u32, buffer: &mut [u8]) -> HalResult<()>;

    /// Overwrite application data at a logical offset
    fn write_app_data(&mut self, offset: u32, data: &[u8]) -> HalResult<()>;

    /// Mapped internal-flash address of a logical offset
    fn app_data_address(&self, offset: u32) -> u32;
}

/// CRC32 engine
///
/// Incremental interface matching both a hardware CRC peripheral and a
/// software implementation. `finalize` consumes the running state; call
/// `reset` before the next computation.
pub trait Crc32 {
    /// Reset the running state
    fn reset(&mut self);

    /// Feed bytes into the running computation
    fn update(&mut self, data: &[u8]);

    /// Finish and return the checksum
    fn finalize(&mut self) -> u32;
}

/// System-level control operations
///
/// Consumed only by the "finish update then reset" convenience flow, not by
/// the core update state machine.
pub trait SystemControl {
    /// Persist the firmware-update status system flag
    fn save_update_status(&mut self, status: u16);

    /// Write the reset-surviving backup status register
    fn write_backup_status(&mut self, status: u16);

    /// Enable or disable the USB cable indication
    fn usb_cable_config(&mut self, enabled: bool);

    /// Request a cold system restart
    fn system_reset(&mut self);
}

/// Aggregated board capabilities
///
/// The media access layer is generic over one `Board` implementation that
/// hands out mutable access to each capability.
pub trait Board {
    /// Internal flash capability
    type Internal: InternalFlash;

    /// Serial flash capability
    #[cfg(feature = "serial-flash")]
    type Serial: SerialFlash;

    /// Configuration store capability
    type Store: ConfigStore;

    /// CRC32 engine capability
    type Crc: Crc32;

    /// Access the internal flash
    fn internal_flash(&mut self) -> &mut Self::Internal;

    /// Access the serial flash
    #[cfg(feature = "serial-flash")]
    fn serial_flash(&mut self) -> &mut Self::Serial;

    /// Access the configuration store
    fn config_store(&mut self) -> &mut Self::Store;

    /// Access the CRC32 engine
    fn crc32(&mut self) -> &mut Self::Crc;
}
