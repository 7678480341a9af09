//! Calibration region in the on-chip SPI flash

use embedded_storage::nor_flash::{NorFlash, ReadNorFlash};
use esp_storage::{FlashStorage, FlashStorageError};
use forcegraph_core::storage::{FLASH_PAGE_SIZE, FLASH_SECTOR_SIZE, NvRegion};

/// Start of the calibration sector: the first sector of the default `nvs`
/// partition, which this firmware does not otherwise use
pub const CALIBRATION_REGION_OFFSET: u32 = 0x9000;

/// One flash sector at [`CALIBRATION_REGION_OFFSET`]
pub struct EspFlashRegion<'d> {
    flash: FlashStorage<'d>,
    base: u32,
}

impl<'d> EspFlashRegion<'d> {
    pub fn new(flash: FlashStorage<'d>) -> Self {
        Self::with_base(flash, CALIBRATION_REGION_OFFSET)
    }

    /// `base` must be sector aligned
    pub fn with_base(flash: FlashStorage<'d>, base: u32) -> Self {
        Self { flash, base }
    }
}

impl NvRegion for EspFlashRegion<'_> {
    type Error = FlashStorageError;

    const PAGE_SIZE: usize = FLASH_PAGE_SIZE;
    const REGION_SIZE: usize = FLASH_SECTOR_SIZE;

    fn read(&mut self, offset: u32, buf: &mut [u8]) -> Result<(), Self::Error> {
        ReadNorFlash::read(&mut self.flash, self.base + offset, buf)
    }

    fn program(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        NorFlash::write(&mut self.flash, self.base + offset, bytes)
    }

    fn erase(&mut self, offset: u32, length: u32) -> Result<(), Self::Error> {
        let from = self.base + offset;
        NorFlash::erase(&mut self.flash, from, from + length)
    }
}
