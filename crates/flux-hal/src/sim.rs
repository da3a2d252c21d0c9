// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Fluxnode Inc.

//! Host-side simulation backend
//!
//! RAM-backed implementations of every capability trait, with NOR flash
//! semantics: erase fills a unit with `0xFF`, programming can only clear
//! bits, and the program-erase controller lock is enforced. Erase and
//! program failures can be injected for error-path tests.
//!
//! Only available with the `sim` feature; host builds only.

use std::vec;
use std::vec::Vec;

use crate::error::{HalError, HalResult};
use crate::geometry::{sector_base, sector_size, INTERNAL_FLASH_BASE, INTERNAL_FLASH_END};
use crate::traits::{Board, ConfigStore, Crc32, InternalFlash, SystemControl, VoltageRange};

#[cfg(feature = "serial-flash")]
use crate::geometry::{SERIAL_FLASH_CAPACITY, SERIAL_FLASH_PAGE_SIZE};
#[cfg(feature = "serial-flash")]
use crate::traits::SerialFlash;

/// Mapped base address of the configuration store's application data
///
/// The store occupies the first 16 KiB sector above the bootloader, well
/// outside the installable region.
pub const SIM_APP_DATA_BASE: u32 = 0x0800_4000;

const APP_DATA_SIZE: u32 = 0x4000;
const INTERNAL_SIZE: usize = (INTERNAL_FLASH_END - INTERNAL_FLASH_BASE) as usize;

// =============================================================================
// CRC32 Engine
// =============================================================================

static CRC32_ALG: crc::Crc<u32> = crc::Crc::<u32>::new(&crc::CRC_32_ISO_HDLC);

/// One-shot CRC32 over a byte slice (IEEE 802.3 polynomial)
#[must_use]
pub fn crc32(data: &[u8]) -> u32 {
    CRC32_ALG.checksum(data)
}

/// Software CRC32 engine over the `crc` crate
#[derive(Default)]
pub struct SoftCrc32 {
    digest: Option<crc::Digest<'static, u32>>,
}

impl Crc32 for SoftCrc32 {
    fn reset(&mut self) {
        self.digest = Some(CRC32_ALG.digest());
    }

    fn update(&mut self, data: &[u8]) {
        if let Some(digest) = self.digest.as_mut() {
            digest.update(data);
        }
    }

    fn finalize(&mut self) -> u32 {
        self.digest.take().map_or(0, |d| d.finalize())
    }
}

// =============================================================================
// Simulated Board
// =============================================================================

/// RAM-backed board implementing every capability trait
///
/// The configuration store is mapped into the internal flash image at
/// [`SIM_APP_DATA_BASE`], so in-place word programming of store records is
/// coherent with store reads, as on the real part.
pub struct SimBoard {
    internal: Vec<u8>,
    internal_locked: bool,
    erased_sectors: Vec<u8>,
    fail_erase_sector: Option<u8>,
    fail_program_address: Option<u32>,
    #[cfg(feature = "serial-flash")]
    serial: Vec<u8>,
    #[cfg(feature = "serial-flash")]
    serial_initialized: bool,
    crc: SoftCrc32,
}

impl SimBoard {
    /// Create a board with both devices fully erased and the controller
    /// locked
    #[must_use]
    pub fn new() -> Self {
        Self {
            internal: vec![0xFF; INTERNAL_SIZE],
            internal_locked: true,
            erased_sectors: Vec::new(),
            fail_erase_sector: None,
            fail_program_address: None,
            #[cfg(feature = "serial-flash")]
            serial: vec![0xFF; SERIAL_FLASH_CAPACITY as usize],
            #[cfg(feature = "serial-flash")]
            serial_initialized: false,
            crc: SoftCrc32::default(),
        }
    }

    /// Inject an erase failure for one internal sector
    pub fn fail_erase_of_sector(&mut self, sector: u8) {
        self.fail_erase_sector = Some(sector);
    }

    /// Inject a program failure at one internal word address
    pub fn fail_program_at(&mut self, address: u32) {
        self.fail_program_address = Some(address);
    }

    /// Sectors erased so far, in call order
    #[must_use]
    pub fn erased_sectors(&self) -> &[u8] {
        &self.erased_sectors
    }

    /// Whether the program-erase controller is currently locked
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.internal_locked
    }

    /// Test backdoor: place bytes into internal flash, bypassing the
    /// controller
    pub fn load_internal(&mut self, address: u32, data: &[u8]) {
        let start = (address - INTERNAL_FLASH_BASE) as usize;
        self.internal[start..start + data.len()].copy_from_slice(data);
    }

    /// Test backdoor: read bytes from internal flash
    pub fn read_internal(&self, address: u32, buffer: &mut [u8]) {
        let start = (address - INTERNAL_FLASH_BASE) as usize;
        buffer.copy_from_slice(&self.internal[start..start + buffer.len()]);
    }

    /// Test backdoor: place bytes into serial flash
    #[cfg(feature = "serial-flash")]
    pub fn load_serial(&mut self, address: u32, data: &[u8]) {
        let start = address as usize;
        self.serial[start..start + data.len()].copy_from_slice(data);
    }

    /// Test backdoor: read bytes from serial flash
    #[cfg(feature = "serial-flash")]
    pub fn read_serial(&self, address: u32, buffer: &mut [u8]) {
        let start = address as usize;
        buffer.copy_from_slice(&self.serial[start..start + buffer.len()]);
    }

    fn internal_index(&self, address: u32, len: usize) -> Option<usize> {
        if address < INTERNAL_FLASH_BASE {
            return None;
        }
        let start = (address - INTERNAL_FLASH_BASE) as usize;
        if start + len > self.internal.len() {
            return None;
        }
        Some(start)
    }
}

impl Default for SimBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl InternalFlash for SimBoard {
    fn unlock(&mut self) {
        self.internal_locked = false;
    }

    fn lock(&mut self) {
        self.internal_locked = true;
    }

    fn clear_status_flags(&mut self) {}

    fn erase_sector(&mut self, sector: u8, _range: VoltageRange) -> HalResult<()> {
        if self.internal_locked {
            return Err(HalError::FlashLocked);
        }
        if self.fail_erase_sector == Some(sector) {
            return Err(HalError::EraseFailed);
        }
        let (Some(base), Some(size)) = (sector_base(sector), sector_size(sector)) else {
            return Err(HalError::OutOfBounds);
        };
        let start = (base - INTERNAL_FLASH_BASE) as usize;
        self.internal[start..start + size as usize].fill(0xFF);
        self.erased_sectors.push(sector);
        Ok(())
    }

    fn program_word(&mut self, address: u32, word: u32) -> HalResult<()> {
        if self.internal_locked {
            return Err(HalError::FlashLocked);
        }
        if self.fail_program_address == Some(address) {
            return Err(HalError::ProgramFailed);
        }
        let Some(start) = self.internal_index(address, 4) else {
            return Err(HalError::OutOfBounds);
        };
        // NOR semantics: programming can only clear bits
        for (slot, byte) in self.internal[start..start + 4]
            .iter_mut()
            .zip(word.to_le_bytes())
        {
            *slot &= byte;
        }
        Ok(())
    }

    fn read_word(&self, address: u32) -> u32 {
        match self.internal_index(address, 4) {
            Some(start) => {
                let mut bytes = [0u8; 4];
                bytes.copy_from_slice(&self.internal[start..start + 4]);
                u32::from_le_bytes(bytes)
            }
            None => 0xFFFF_FFFF,
        }
    }
}

#[cfg(feature = "serial-flash")]
impl SerialFlash for SimBoard {
    fn init(&mut self) {
        self.serial_initialized = true;
    }

    fn erase_page(&mut self, address: u32) {
        let base = (address / SERIAL_FLASH_PAGE_SIZE * SERIAL_FLASH_PAGE_SIZE) as usize;
        if base < self.serial.len() {
            let end = (base + SERIAL_FLASH_PAGE_SIZE as usize).min(self.serial.len());
            self.serial[base..end].fill(0xFF);
        }
    }

    fn read(&self, address: u32, buffer: &mut [u8]) {
        let start = address as usize;
        buffer.copy_from_slice(&self.serial[start..start + buffer.len()]);
    }

    fn write(&mut self, address: u32, data: &[u8]) {
        let start = address as usize;
        self.serial[start..start + data.len()].copy_from_slice(data);
    }
}

impl ConfigStore for SimBoard {
    fn read_app_data(&self, offset: u32, buffer: &mut [u8]) -> HalResult<()> {
        if offset + buffer.len() as u32 > APP_DATA_SIZE {
            return Err(HalError::ReadFailed);
        }
        let start = (SIM_APP_DATA_BASE - INTERNAL_FLASH_BASE + offset) as usize;
        buffer.copy_from_slice(&self.internal[start..start + buffer.len()]);
        Ok(())
    }

    fn write_app_data(&mut self, offset: u32, data: &[u8]) -> HalResult<()> {
        if offset + data.len() as u32 > APP_DATA_SIZE {
            return Err(HalError::WriteFailed);
        }
        // The real store layers its own erase/update cycle; a plain
        // overwrite models its externally visible behavior.
        let start = (SIM_APP_DATA_BASE - INTERNAL_FLASH_BASE + offset) as usize;
        self.internal[start..start + data.len()].copy_from_slice(data);
        Ok(())
    }

    fn app_data_address(&self, offset: u32) -> u32 {
        SIM_APP_DATA_BASE + offset
    }
}

impl Board for SimBoard {
    type Internal = Self;
    #[cfg(feature = "serial-flash")]
    type Serial = Self;
    type Store = Self;
    type Crc = SoftCrc32;

    fn internal_flash(&mut self) -> &mut Self {
        self
    }

    #[cfg(feature = "serial-flash")]
    fn serial_flash(&mut self) -> &mut Self {
        self
    }

    fn config_store(&mut self) -> &mut Self {
        self
    }

    fn crc32(&mut self) -> &mut SoftCrc32 {
        &mut self.crc
    }
}

// =============================================================================
// System Control
// =============================================================================

/// Recording implementation of [`SystemControl`]
#[derive(Debug, Default)]
pub struct SimSystemControl {
    /// Last persisted update status flag
    pub update_status: Option<u16>,
    /// Last written backup status register value
    pub backup_status: Option<u16>,
    /// Last USB cable indication state
    pub usb_enabled: Option<bool>,
    /// Number of reset requests
    pub reset_count: u32,
}

impl SystemControl for SimSystemControl {
    fn save_update_status(&mut self, status: u16) {
        self.update_status = Some(status);
    }

    fn write_backup_status(&mut self, status: u16) {
        self.backup_status = Some(status);
    }

    fn usb_cable_config(&mut self, enabled: bool) {
        self.usb_enabled = Some(enabled);
    }

    fn system_reset(&mut self) {
        self.reset_count += 1;
    }
}
