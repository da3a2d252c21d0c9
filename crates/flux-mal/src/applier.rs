// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Fluxnode Inc.

//! Update applier
//!
//! The bootloader-time state machine that drains the update journal: for
//! each occupied general slot, in ascending order, run the copy engine with
//! the stored parameters, then zero the slot. A failed copy still clears
//! its slot - a bad entry must never stall boot, at the cost of dropping
//! that install.
//!
//! The optional progress callback is notified once with `true` before the
//! first apply and once with `false` after the last clear.

use flux_common::Result;
use flux_hal::Board;

use crate::copy::copy_memory;
use crate::journal::{
    read_pending_table, zero_slot_storage, GENERAL_SLOT_START, MAX_MODULE_SLOTS, PENDING_MAGIC,
};

/// Applier progress through the journal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ApplierState {
    /// Not running, or finished draining every slot
    Idle,
    /// Inspecting the slot at this index
    Scanning(usize),
    /// Copying the image recorded in the slot at this index
    Applying(usize),
    /// Zeroing the consumed slot at this index
    Clearing(usize),
}

/// Journal-draining state machine
#[derive(Debug)]
pub struct UpdateApplier {
    state: ApplierState,
}

impl UpdateApplier {
    /// Create an idle applier
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: ApplierState::Idle,
        }
    }

    /// Current state, for observation while a pass runs
    #[must_use]
    pub const fn state(&self) -> ApplierState {
        self.state
    }

    /// Scan the journal once, applying and clearing every occupied general
    /// slot
    ///
    /// The reserved factory-reset slot is never touched. Per-slot copy
    /// outcome is not surfaced; each scanned slot is cleared and the pass
    /// proceeds to the next index regardless. Records whose device
    /// identifiers do not decode in this build skip the copy but are still
    /// cleared.
    pub fn run<B: Board>(
        &mut self,
        board: &mut B,
        mut progress: Option<&mut dyn FnMut(bool)>,
    ) -> Result<()> {
        let table = read_pending_table(board)?;
        let mut updating = false;

        for index in GENERAL_SLOT_START..MAX_MODULE_SLOTS {
            self.state = ApplierState::Scanning(index);

            let raw = table.raw(index);
            if raw.magic != PENDING_MAGIC {
                continue;
            }

            if !updating {
                updating = true;
                if let Some(callback) = progress.as_mut() {
                    callback(true);
                }
            }

            self.state = ApplierState::Applying(index);
            if let Some(install) = raw.to_install() {
                let _ = copy_memory(
                    board,
                    install.source_device,
                    install.source_address,
                    install.destination_device,
                    install.destination_address,
                    install.length,
                    install.module_function,
                    install.flags,
                );
            }

            self.state = ApplierState::Clearing(index);
            zero_slot_storage(board, index);
        }

        if updating {
            if let Some(callback) = progress.as_mut() {
                callback(false);
            }
        }

        self.state = ApplierState::Idle;
        Ok(())
    }
}

impl Default for UpdateApplier {
    fn default() -> Self {
        Self::new()
    }
}

/// Drain the journal once
///
/// Convenience entry point for the bootloader; see [`UpdateApplier::run`].
pub fn apply_pending_modules<B: Board>(
    board: &mut B,
    progress: Option<&mut dyn FnMut(bool)>,
) -> Result<()> {
    UpdateApplier::new().run(board, progress)
}
