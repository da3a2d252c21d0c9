// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Fluxnode Inc.

//! Hardware Abstraction Layer for the Fluxnode firmware-update subsystem
//!
//! This crate defines the capability interfaces the media access layer is
//! built against, and the per-device geometry tables:
//!
//! 1. **Traits**: register-level flash, configuration-store, CRC and system
//!    control capabilities (`traits` module) - implemented by the platform
//!    drivers, not by this crate
//! 2. **Geometry**: device identity, address windows and sector/page tables
//!    (`geometry` module)
//! 3. **Simulation**: a RAM-backed implementation of every capability for
//!    host-side testing (`sim` module, `sim` feature)
//!
//! # Features
//!
//! - `serial-flash`: compile in the external serial flash device; without it
//!   the device identity simply has no such variant
//! - `sim`: host-side simulation backend (implies `std`)
//! - `defmt`: derive `defmt::Format` on public enums

#![no_std]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

#[cfg(feature = "std")]
extern crate std;

pub mod error;
pub mod geometry;
pub mod traits;

#[cfg(feature = "sim")]
pub mod sim;

pub use error::{HalError, HalResult};
pub use geometry::FlashDevice;
pub use traits::*;
