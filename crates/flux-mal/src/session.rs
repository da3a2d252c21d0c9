// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Fluxnode Inc.

//! Streaming OTA update session
//!
//! Receives a firmware image in chunks and programs it into a staging
//! region. The session object owns the write cursor and chunk counter, so
//! concurrent test harnesses never alias shared progress state. One session
//! per download; the transport layer owns chunk ordering and retries.

use flux_common::Result;
use flux_hal::geometry::{FlashDevice, CORE_FIRMWARE_ADDRESS, FIRMWARE_IMAGE_SIZE};
use flux_hal::{Board, InternalFlash, SystemControl};

#[cfg(feature = "serial-flash")]
use flux_hal::SerialFlash;

use crate::erase::erase_memory;

#[cfg(feature = "serial-flash")]
use crate::copy::copy_memory;
#[cfg(feature = "serial-flash")]
use crate::module_info::ModuleFunction;
#[cfg(feature = "serial-flash")]
use crate::verify::VerifyFlags;

/// Status flag value recorded when an image download completes
pub const UPDATE_COMPLETE_STATUS: u16 = 0x0005;

/// An in-progress image download into a staging region
#[derive(Debug)]
pub struct UpdateSession {
    device: FlashDevice,
    start_address: u32,
    address: u32,
    chunk_index: u16,
}

impl UpdateSession {
    /// Start a download: clear the persisted update status and erase the
    /// staging region
    pub fn begin<B: Board, S: SystemControl>(
        board: &mut B,
        system: &mut S,
        device: FlashDevice,
        address: u32,
        image_size: u32,
    ) -> Result<Self> {
        system.save_update_status(0x0000);
        erase_memory(board, device, address, image_size)?;

        Ok(Self {
            device,
            start_address: address,
            address,
            chunk_index: 0,
        })
    }

    /// Program one received chunk at the write cursor
    ///
    /// Internal flash is programmed word by word; a final partial word is
    /// padded with `0xFF` (the erased pattern) up to the word boundary, and
    /// the cursor advances to that boundary. Serial flash takes the chunk
    /// as-is. Returns the 1-based index of the chunk just written.
    pub fn write_chunk<B: Board>(&mut self, board: &mut B, data: &[u8]) -> u16 {
        match self.device {
            FlashDevice::Internal => {
                let flash = board.internal_flash();
                flash.unlock();
                flash.clear_status_flags();

                let mut chunks = data.chunks_exact(4);
                for chunk in &mut chunks {
                    let word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
                    let _ = flash.program_word(self.address, word);
                    self.address += 4;
                }

                let remainder = chunks.remainder();
                if !remainder.is_empty() {
                    let mut padded = [0xFFu8; 4];
                    padded[..remainder.len()].copy_from_slice(remainder);
                    let _ = flash.program_word(self.address, u32::from_le_bytes(padded));
                    self.address += 4;
                }

                flash.lock();
            }
            #[cfg(feature = "serial-flash")]
            FlashDevice::Serial => {
                board.serial_flash().write(self.address, data);
                self.address += data.len() as u32;
            }
        }

        self.chunk_index += 1;
        self.chunk_index
    }

    /// Mark the download complete and restart the device
    ///
    /// Records [`UPDATE_COMPLETE_STATUS`] in the persisted status flag and
    /// the reset-surviving backup register, drops the USB cable indication
    /// and requests a cold restart. Consumes the session.
    pub fn finish<S: SystemControl>(self, system: &mut S) {
        system.save_update_status(UPDATE_COMPLETE_STATUS);
        system.write_backup_status(UPDATE_COMPLETE_STATUS);
        system.usb_cable_config(false);
        system.system_reset();
    }

    /// Address the download started at
    #[must_use]
    pub const fn start_address(&self) -> u32 {
        self.start_address
    }

    /// Current write cursor
    #[must_use]
    pub const fn address(&self) -> u32 {
        self.address
    }

    /// Number of chunks written so far
    #[must_use]
    pub const fn chunk_index(&self) -> u16 {
        self.chunk_index
    }
}

// =============================================================================
// Maintenance
// =============================================================================

/// Erase the resident core firmware image region
pub fn erase_core_firmware<B: Board>(board: &mut B) -> Result<()> {
    erase_memory(
        board,
        FlashDevice::Internal,
        CORE_FIRMWARE_ADDRESS,
        FIRMWARE_IMAGE_SIZE,
    )
}

/// Stage a backup of the core firmware image into serial flash
#[cfg(feature = "serial-flash")]
pub fn backup_firmware<B: Board>(board: &mut B, backup_address: u32) -> Result<()> {
    copy_memory(
        board,
        FlashDevice::Internal,
        CORE_FIRMWARE_ADDRESS,
        FlashDevice::Serial,
        backup_address,
        FIRMWARE_IMAGE_SIZE,
        ModuleFunction::None,
        VerifyFlags::empty(),
    )
}

/// Restore the core firmware image from a serial-flash backup
///
/// Verification is disabled: the backup is this device's own image.
#[cfg(feature = "serial-flash")]
pub fn restore_firmware<B: Board>(board: &mut B, backup_address: u32) -> Result<()> {
    copy_memory(
        board,
        FlashDevice::Serial,
        backup_address,
        FlashDevice::Internal,
        CORE_FIRMWARE_ADDRESS,
        FIRMWARE_IMAGE_SIZE,
        ModuleFunction::None,
        VerifyFlags::empty(),
    )
}
