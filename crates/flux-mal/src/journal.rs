// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Fluxnode Inc.

//! Update journal
//!
//! A fixed-size table of pending-install records persisted in the
//! configuration store. Slot 0 is reserved for the factory-reset record and
//! is never treated as a general slot; slots 1..N-1 hold general pending
//! installs. The table is read as a whole and written back one record at a
//! time through the store's update primitive; consumed records are zeroed
//! in place word by word, which needs no erase on NOR flash.

use flux_common::{Error, Result};
use flux_hal::geometry::FlashDevice;
use flux_hal::{Board, ConfigStore, InternalFlash};

use crate::module_info::ModuleFunction;
use crate::verify::VerifyFlags;

/// Total number of journal slots, reserved slot included
pub const MAX_MODULE_SLOTS: usize = 4;

/// Index of the reserved factory-reset slot
pub const FACTORY_RESET_SLOT: usize = 0;

/// First general pending-install slot
pub const GENERAL_SLOT_START: usize = 1;

/// Magic marking a general slot as occupied
pub const PENDING_MAGIC: u16 = 0xABCD;

/// Magic marking the reserved slot as holding a factory-reset record
pub const FACTORY_MAGIC: u16 = 0x0FAC;

/// Size of one persisted record in bytes (word-aligned)
pub const SLOT_RECORD_SIZE: usize = 20;

/// Logical offset of the table inside the configuration store's application
/// data, fixed by the store schema
pub const PENDING_TABLE_OFFSET: u32 = 0x0800;

// =============================================================================
// Records
// =============================================================================

/// A decoded pending-install record
///
/// Describes one not-yet-applied copy from a source range to a destination
/// range, with the verification the copy must pass first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingInstall {
    /// Device holding the staged image
    pub source_device: FlashDevice,
    /// Address of the staged image
    pub source_address: u32,
    /// Device to install into
    pub destination_device: FlashDevice,
    /// Address to install at
    pub destination_address: u32,
    /// Number of bytes to copy
    pub length: u32,
    /// Declared module function of the image
    pub module_function: ModuleFunction,
    /// Verification checks gating the copy
    pub flags: VerifyFlags,
}

/// Raw on-store representation of one slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSlot {
    /// Occupancy sentinel
    pub magic: u16,
    /// Persisted source device identifier
    pub source_device: u8,
    /// Persisted destination device identifier
    pub destination_device: u8,
    /// Source address
    pub source_address: u32,
    /// Destination address
    pub destination_address: u32,
    /// Copy length
    pub length: u32,
    /// Persisted module function
    pub module_function: u8,
    /// Persisted verification flags
    pub flags: u8,
    /// Layout padding, kept zero
    pub reserved: u16,
}

impl RawSlot {
    /// An all-zero record (the cleared state)
    #[must_use]
    pub const fn zeroed() -> Self {
        Self {
            magic: 0,
            source_device: 0,
            destination_device: 0,
            source_address: 0,
            destination_address: 0,
            length: 0,
            module_function: 0,
            flags: 0,
            reserved: 0,
        }
    }

    /// Decode a record from its persisted little-endian layout
    #[must_use]
    pub fn from_bytes(bytes: &[u8; SLOT_RECORD_SIZE]) -> Self {
        Self {
            magic: u16::from_le_bytes([bytes[0], bytes[1]]),
            source_device: bytes[2],
            destination_device: bytes[3],
            source_address: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
            destination_address: u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
            length: u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]),
            module_function: bytes[16],
            flags: bytes[17],
            reserved: u16::from_le_bytes([bytes[18], bytes[19]]),
        }
    }

    /// Encode the record into its persisted little-endian layout
    #[must_use]
    pub fn to_bytes(&self) -> [u8; SLOT_RECORD_SIZE] {
        let mut bytes = [0u8; SLOT_RECORD_SIZE];
        bytes[0..2].copy_from_slice(&self.magic.to_le_bytes());
        bytes[2] = self.source_device;
        bytes[3] = self.destination_device;
        bytes[4..8].copy_from_slice(&self.source_address.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.destination_address.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.length.to_le_bytes());
        bytes[16] = self.module_function;
        bytes[17] = self.flags;
        bytes[18..20].copy_from_slice(&self.reserved.to_le_bytes());
        bytes
    }

    /// Build an occupied record from a decoded install
    #[must_use]
    pub fn from_install(install: &PendingInstall, magic: u16) -> Self {
        Self {
            magic,
            source_device: install.source_device as u8,
            destination_device: install.destination_device as u8,
            source_address: install.source_address,
            destination_address: install.destination_address,
            length: install.length,
            module_function: install.module_function as u8,
            flags: install.flags.bits(),
            reserved: 0,
        }
    }

    /// Decode the stored parameters
    ///
    /// `None` when either device identifier does not name a device in this
    /// build; such a record cannot be applied.
    #[must_use]
    pub fn to_install(&self) -> Option<PendingInstall> {
        Some(PendingInstall {
            source_device: FlashDevice::from_u8(self.source_device)?,
            source_address: self.source_address,
            destination_device: FlashDevice::from_u8(self.destination_device)?,
            destination_address: self.destination_address,
            length: self.length,
            module_function: ModuleFunction::from(self.module_function),
            flags: VerifyFlags::from_bits_truncate(self.flags),
        })
    }
}

// =============================================================================
// Table
// =============================================================================

/// Typed view of one journal slot
///
/// The reserved index can only ever decode to `Empty` or `FactoryReset`,
/// general indices only to `Empty` or `General`; the two sentinels cannot
/// be confused across slot kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotEntry {
    /// Slot is unoccupied
    Empty,
    /// Slot holds a general pending install
    General(PendingInstall),
    /// Slot holds the factory-reset record
    FactoryReset(PendingInstall),
}

/// In-memory copy of the whole persisted table
#[derive(Debug, Clone, Copy)]
pub struct PendingTable {
    slots: [RawSlot; MAX_MODULE_SLOTS],
}

impl PendingTable {
    /// Raw record at `index`
    #[must_use]
    pub fn raw(&self, index: usize) -> &RawSlot {
        &self.slots[index]
    }

    /// Decoded view of the slot at `index`
    #[must_use]
    pub fn entry(&self, index: usize) -> SlotEntry {
        let raw = &self.slots[index];
        match (index, raw.magic) {
            (FACTORY_RESET_SLOT, FACTORY_MAGIC) => {
                raw.to_install().map_or(SlotEntry::Empty, SlotEntry::FactoryReset)
            }
            (FACTORY_RESET_SLOT, _) => SlotEntry::Empty,
            (_, PENDING_MAGIC) => raw.to_install().map_or(SlotEntry::Empty, SlotEntry::General),
            _ => SlotEntry::Empty,
        }
    }
}

fn slot_offset(index: usize) -> u32 {
    PENDING_TABLE_OFFSET + (index * SLOT_RECORD_SIZE) as u32
}

/// Read the whole pending-install table from the configuration store
pub fn read_pending_table<B: Board>(board: &mut B) -> Result<PendingTable> {
    let mut bytes = [0u8; SLOT_RECORD_SIZE * MAX_MODULE_SLOTS];
    board
        .config_store()
        .read_app_data(PENDING_TABLE_OFFSET, &mut bytes)
        .map_err(|_| Error::StorageReadFailed)?;

    let mut slots = [RawSlot::zeroed(); MAX_MODULE_SLOTS];
    for (index, slot) in slots.iter_mut().enumerate() {
        let mut record = [0u8; SLOT_RECORD_SIZE];
        record.copy_from_slice(
            &bytes[index * SLOT_RECORD_SIZE..(index + 1) * SLOT_RECORD_SIZE],
        );
        *slot = RawSlot::from_bytes(&record);
    }

    Ok(PendingTable { slots })
}

fn write_slot<B: Board>(board: &mut B, index: usize, raw: &RawSlot) -> Result<()> {
    board
        .config_store()
        .write_app_data(slot_offset(index), &raw.to_bytes())
        .map_err(|_| Error::StorageWriteFailed)
}

/// Record a pending install in the first free general slot
///
/// Scans general slots in ascending order for one whose magic is not the
/// occupied sentinel, fills it and persists it. [`Error::JournalFull`] when
/// every general slot is occupied; the table is left untouched in that
/// case.
pub fn add_pending_install<B: Board>(board: &mut B, install: PendingInstall) -> Result<()> {
    let table = read_pending_table(board)?;

    for index in GENERAL_SLOT_START..MAX_MODULE_SLOTS {
        if table.raw(index).magic == PENDING_MAGIC {
            continue;
        }
        let raw = RawSlot::from_install(&install, PENDING_MAGIC);
        return write_slot(board, index, &raw);
    }

    Err(Error::JournalFull)
}

/// Designate the factory-reset image source
///
/// Unconditionally overwrites the reserved slot's fields. The store write is
/// skipped when the resulting record is byte-for-byte identical to what is
/// already persisted.
pub fn set_factory_reset_slot<B: Board>(board: &mut B, install: PendingInstall) -> Result<()> {
    let mut current = [0u8; SLOT_RECORD_SIZE];
    board
        .config_store()
        .read_app_data(slot_offset(FACTORY_RESET_SLOT), &mut current)
        .map_err(|_| Error::StorageReadFailed)?;

    let raw = RawSlot::from_install(&install, FACTORY_MAGIC);
    if raw.to_bytes() != current {
        write_slot(board, FACTORY_RESET_SLOT, &raw)?;
    }

    Ok(())
}

/// Clear the reserved factory-reset slot in place
pub fn clear_factory_reset_slot<B: Board>(board: &mut B) {
    zero_slot_storage(board, FACTORY_RESET_SLOT);
}

/// Zero a record's persisted storage word by word, without erasing the
/// containing erase unit
///
/// Programming zero bits over already-programmed bits is always legal on
/// this flash, so the record bytes go to zero regardless of their previous
/// contents.
pub(crate) fn zero_slot_storage<B: Board>(board: &mut B, index: usize) {
    let mut address = board.config_store().app_data_address(slot_offset(index));

    let flash = board.internal_flash();
    flash.unlock();
    for _ in 0..SLOT_RECORD_SIZE / 4 {
        let _ = flash.program_word(address, 0);
        address += 4;
    }
    flash.lock();
}
