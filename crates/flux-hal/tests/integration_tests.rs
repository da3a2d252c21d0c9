// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Fluxnode Inc.

//! Integration tests for flux-hal
//!
//! Tests for the geometry tables and the simulation backend. The simulation
//! is what the media access layer's own tests run against, so its NOR
//! semantics are pinned down here.

#![cfg(feature = "sim")]

mod geometry_tests {
    use flux_hal::geometry::{
        sector_base, sector_size, FlashDevice, INTERNAL_FLASH_BASE, INTERNAL_FLASH_END,
        INTERNAL_SECTOR_COUNT, SECTOR_LIMITS,
    };

    #[test]
    fn test_sector_table_covers_the_window() {
        assert_eq!(sector_base(0), Some(INTERNAL_FLASH_BASE));
        assert_eq!(
            SECTOR_LIMITS[INTERNAL_SECTOR_COUNT - 1],
            INTERNAL_FLASH_END
        );
    }

    #[test]
    fn test_sector_sizes_are_non_decreasing() {
        let mut previous = 0;
        for sector in 0..INTERNAL_SECTOR_COUNT as u8 {
            let size = sector_size(sector).expect("sector in range");
            assert!(size >= previous, "sector {sector} shrank");
            previous = size;
        }
    }

    #[test]
    fn test_sector_layout_matches_the_part() {
        // 4 x 16 KiB, 1 x 64 KiB, 7 x 128 KiB
        for sector in 0..4 {
            assert_eq!(sector_size(sector), Some(0x4000));
        }
        assert_eq!(sector_size(4), Some(0x1_0000));
        for sector in 5..12 {
            assert_eq!(sector_size(sector), Some(0x2_0000));
        }
        assert_eq!(sector_size(12), None);
        assert_eq!(sector_base(12), None);
    }

    #[test]
    fn test_device_identifier_decoding() {
        assert_eq!(FlashDevice::from_u8(0), Some(FlashDevice::Internal));
        assert_eq!(FlashDevice::from_u8(1), Some(FlashDevice::Serial));
        assert_eq!(FlashDevice::from_u8(2), None);
        assert_eq!(FlashDevice::from_u8(0xFF), None);
    }
}

mod sim_flash_tests {
    use flux_hal::sim::SimBoard;
    use flux_hal::{HalError, InternalFlash, VoltageRange};

    #[test]
    fn test_fresh_flash_reads_erased() {
        let board = SimBoard::new();
        assert_eq!(board.read_word(0x0802_0000), 0xFFFF_FFFF);
    }

    #[test]
    fn test_lock_is_enforced() {
        let mut board = SimBoard::new();
        assert!(board.is_locked());
        assert_eq!(
            board.program_word(0x0802_0000, 0),
            Err(HalError::FlashLocked)
        );
        assert_eq!(
            board.erase_sector(5, VoltageRange::Range3),
            Err(HalError::FlashLocked)
        );

        board.unlock();
        assert!(board.program_word(0x0802_0000, 0x1234_5678).is_ok());
        board.lock();
        assert!(board.is_locked());
    }

    #[test]
    fn test_program_only_clears_bits() {
        let mut board = SimBoard::new();
        board.unlock();
        board
            .program_word(0x0802_0000, 0xF0F0_A5A5)
            .expect("program over erased flash");
        assert_eq!(board.read_word(0x0802_0000), 0xF0F0_A5A5);

        // Zeroing already-programmed data needs no erase
        board.program_word(0x0802_0000, 0).expect("zero in place");
        assert_eq!(board.read_word(0x0802_0000), 0);

        // Bits cannot be set back without an erase
        board
            .program_word(0x0802_0000, 0xFFFF_FFFF)
            .expect("call succeeds");
        assert_eq!(board.read_word(0x0802_0000), 0);
    }

    #[test]
    fn test_erase_restores_erased_pattern() {
        let mut board = SimBoard::new();
        board.unlock();
        board.program_word(0x0802_0000, 0).expect("program");
        board
            .erase_sector(5, VoltageRange::Range3)
            .expect("erase sector 5");
        assert_eq!(board.read_word(0x0802_0000), 0xFFFF_FFFF);
        assert_eq!(board.erased_sectors(), &[5]);
    }

    #[test]
    fn test_injected_failures_surface() {
        let mut board = SimBoard::new();
        board.unlock();
        board.fail_erase_of_sector(6);
        assert_eq!(
            board.erase_sector(6, VoltageRange::Range3),
            Err(HalError::EraseFailed)
        );

        board.fail_program_at(0x0802_1000);
        assert_eq!(
            board.program_word(0x0802_1000, 0),
            Err(HalError::ProgramFailed)
        );
    }

    #[test]
    fn test_out_of_window_sector_rejected() {
        let mut board = SimBoard::new();
        board.unlock();
        assert_eq!(
            board.erase_sector(12, VoltageRange::Range3),
            Err(HalError::OutOfBounds)
        );
    }
}

mod sim_store_tests {
    use flux_hal::sim::{SimBoard, SIM_APP_DATA_BASE};
    use flux_hal::{ConfigStore, InternalFlash};

    #[test]
    fn test_store_roundtrip() {
        let mut board = SimBoard::new();
        board
            .write_app_data(0x40, &[1, 2, 3, 4])
            .expect("store write");

        let mut read = [0u8; 4];
        board.read_app_data(0x40, &mut read).expect("store read");
        assert_eq!(read, [1, 2, 3, 4]);
    }

    #[test]
    fn test_store_is_mapped_into_internal_flash() {
        let mut board = SimBoard::new();
        board
            .write_app_data(0x40, &[0xAA, 0xBB, 0xCC, 0xDD])
            .expect("store write");

        let mapped = board.app_data_address(0x40);
        assert_eq!(mapped, SIM_APP_DATA_BASE + 0x40);

        // Word-programming zero at the mapped address is visible to reads
        board.unlock();
        board.program_word(mapped, 0).expect("zero record word");
        board.lock();

        let mut read = [0u8; 4];
        board.read_app_data(0x40, &mut read).expect("store read");
        assert_eq!(read, [0, 0, 0, 0]);
    }

    #[test]
    fn test_store_bounds_are_checked() {
        let mut board = SimBoard::new();
        let mut buffer = [0u8; 8];
        assert!(board.read_app_data(0x3FFC, &mut buffer).is_err());
        assert!(board.write_app_data(0x3FFC, &buffer).is_err());
    }
}

mod crc_tests {
    use flux_hal::sim::{crc32, SoftCrc32};
    use flux_hal::Crc32;

    #[test]
    fn test_crc32_known_value() {
        // Test vector: "123456789" should produce CRC32 = 0xCBF43926
        assert_eq!(crc32(b"123456789"), 0xCBF4_3926);
    }

    #[test]
    fn test_incremental_matches_one_shot() {
        let mut engine = SoftCrc32::default();
        engine.reset();
        engine.update(b"1234");
        engine.update(b"56789");
        assert_eq!(engine.finalize(), crc32(b"123456789"));
    }

    #[test]
    fn test_engine_is_reusable_after_reset() {
        let mut engine = SoftCrc32::default();
        engine.reset();
        engine.update(b"abc");
        let first = engine.finalize();

        engine.reset();
        engine.update(b"abc");
        assert_eq!(engine.finalize(), first);
    }
}
