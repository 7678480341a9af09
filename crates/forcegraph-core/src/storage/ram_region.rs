//! RAM-backed region with NOR flash semantics
//!
//! Used by the desktop simulator and the tests. Programming ANDs the new bytes
//! into the cell contents (bits can only go from 1 to 0) and erasing resets
//! the range to `0xFF`, just like the real part.

use core::convert::Infallible;

use super::{FLASH_PAGE_SIZE, FLASH_SECTOR_SIZE, NvRegion};

/// In-memory flash region of `SIZE` bytes with `PAGE`-byte pages
pub struct RamRegion<const SIZE: usize = FLASH_SECTOR_SIZE, const PAGE: usize = FLASH_PAGE_SIZE> {
    cells: [u8; SIZE],
    erase_count: u32,
    program_count: u32,
}

impl<const SIZE: usize, const PAGE: usize> RamRegion<SIZE, PAGE> {
    /// Create a fully erased region
    pub const fn new() -> Self {
        Self {
            cells: [0xFF; SIZE],
            erase_count: 0,
            program_count: 0,
        }
    }

    /// Region holding a previously saved image; missing bytes read as erased
    pub fn from_bytes(image: &[u8]) -> Self {
        let mut region = Self::new();
        let len = image.len().min(SIZE);
        region.cells[..len].copy_from_slice(&image[..len]);
        region
    }

    /// Number of erase operations performed so far
    pub fn erase_count(&self) -> u32 {
        self.erase_count
    }

    /// Number of program operations performed so far
    pub fn program_count(&self) -> u32 {
        self.program_count
    }

    /// Raw view of the region contents
    pub fn as_bytes(&self) -> &[u8] {
        &self.cells
    }

    /// Word stored at the start of `page`, bypassing the store
    pub fn page_word(&self, page: usize) -> u32 {
        let start = page * PAGE;
        let mut word = [0u8; 4];
        word.copy_from_slice(&self.cells[start..start + 4]);
        u32::from_le_bytes(word)
    }

    fn span(offset: u32, len: usize) -> core::ops::Range<usize> {
        let start = (offset as usize).min(SIZE);
        start..(start + len).min(SIZE)
    }
}

impl<const SIZE: usize, const PAGE: usize> Default for RamRegion<SIZE, PAGE> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const SIZE: usize, const PAGE: usize> NvRegion for RamRegion<SIZE, PAGE> {
    type Error = Infallible;

    const PAGE_SIZE: usize = PAGE;
    const REGION_SIZE: usize = SIZE;

    fn read(&mut self, offset: u32, buf: &mut [u8]) -> Result<(), Self::Error> {
        let span = Self::span(offset, buf.len());
        let len = span.len();
        buf[..len].copy_from_slice(&self.cells[span]);
        buf[len..].fill(0xFF);
        Ok(())
    }

    fn program(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        let span = Self::span(offset, bytes.len());
        for (cell, byte) in self.cells[span].iter_mut().zip(bytes) {
            *cell &= *byte;
        }
        self.program_count += 1;
        Ok(())
    }

    fn erase(&mut self, offset: u32, length: u32) -> Result<(), Self::Error> {
        let span = Self::span(offset, length as usize);
        self.cells[span].fill(0xFF);
        self.erase_count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_region_is_erased() {
        let region: RamRegion<1024, 256> = RamRegion::new();
        assert!(region.as_bytes().iter().all(|b| *b == 0xFF));
        assert_eq!(region.page_word(3), 0xFFFF_FFFF);
    }

    #[test]
    fn test_program_only_clears_bits() {
        let mut region: RamRegion<1024, 256> = RamRegion::new();
        region.program(0, &[0b1010_1010]).unwrap();
        region.program(0, &[0b0110_0110]).unwrap();
        assert_eq!(region.as_bytes()[0], 0b0010_0010);
        assert_eq!(region.program_count(), 2);
    }

    #[test]
    fn test_image_round_trips() {
        let mut region: RamRegion<1024, 256> = RamRegion::new();
        region.program(256, &57i32.to_le_bytes()).unwrap();

        let restored: RamRegion<1024, 256> = RamRegion::from_bytes(&region.as_bytes()[..300]);
        assert_eq!(restored.page_word(1), 57);
        assert_eq!(restored.page_word(2), 0xFFFF_FFFF);
    }

    #[test]
    fn test_erase_resets_range() {
        let mut region: RamRegion<1024, 256> = RamRegion::new();
        region.program(256, &[0, 0, 0, 0]).unwrap();
        region.erase(0, 1024).unwrap();
        assert_eq!(region.page_word(1), 0xFFFF_FFFF);
        assert_eq!(region.erase_count(), 1);
    }
}
