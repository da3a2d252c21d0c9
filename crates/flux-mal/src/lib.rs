// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Fluxnode Inc.

//! Flash Media Access Layer for the Fluxnode firmware
//!
//! Abstracts the platform's two non-volatile storage devices behind one
//! addressable memory model and drives firmware-image installation on top
//! of it:
//!
//! - **Range validation**: device windows and reserved regions
//! - **Erase/copy/compare engines**: sector- and page-granular erase, 4-byte
//!   streaming copy between any device pair
//! - **Module metadata**: header parsing and the pre-copy verification gate
//! - **Update journal**: persistent pending-install slots with a reserved
//!   factory-reset slot, drained by the bootloader-time applier
//! - **OTA session**: streaming image download into a staging region
//!
//! Everything is generic over the [`flux_hal::Board`] capability traits;
//! nothing here touches hardware registers. Single-threaded by construction:
//! one logical actor (the bootloader or the firmware task) owns the board.
//!
//! # Features
//!
//! - `serial-flash`: compile in the external serial flash device
//! - `defmt`: derive `defmt::Format` on public enums

#![no_std]
#![warn(missing_docs)]

pub mod applier;
pub mod copy;
pub mod erase;
pub mod journal;
pub mod module_info;
pub mod range;
pub mod recovery;
pub mod session;
pub mod verify;

pub use flux_hal::geometry::FlashDevice;

pub use applier::{apply_pending_modules, ApplierState, UpdateApplier};
pub use copy::{compare_memory, copy_memory};
pub use erase::{erase_memory, sector_for_address};
pub use journal::{PendingInstall, PendingTable, SlotEntry};
pub use module_info::{ModuleFunction, ModuleInfo, PLATFORM_ID};
pub use range::is_valid_range;
pub use recovery::restore_factory_firmware;
pub use session::UpdateSession;
pub use verify::{VerifyError, VerifyFlags};
