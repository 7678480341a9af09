//! Append-only, wear-leveled storage of the calibration constant
//!
//! ## Layout
//!
//! The region is split into `P = REGION_SIZE / PAGE_SIZE` pages. The first
//! four bytes of a written page hold the calibration value (little-endian
//! `i32`); an erased page reads as `0xFFFF_FFFF`. Written pages always form a
//! contiguous prefix of the region:
//!
//! ```text
//! page:   0    1    2    3   ...  P-1
//!       [ 42 | 57 | FF | FF | ... | FF ]
//!                   ^ frontier (next write target)
//! ```
//!
//! The newest value is the page just before the frontier. When the frontier
//! reaches `P` the region is bulk-erased and writing restarts at page 0.
//!
//! A write interrupted by power loss can leave the frontier page in neither
//! state. The scan does not detect this.

use log::{debug, info};

use super::{ERASED_WORD, NvRegion, RECORD_SIZE, StorageError, StorageResult};

/// Calibration store over a flash region
pub struct CalibrationStore<R: NvRegion> {
    region: R,
    default_value: i32,
}

impl<R: NvRegion> CalibrationStore<R> {
    /// Number of pages in the region
    pub const PAGES: usize = R::REGION_SIZE / R::PAGE_SIZE;

    /// Create a store returning `default_value` while the region is empty
    pub fn new(region: R, default_value: i32) -> Self {
        Self {
            region,
            default_value,
        }
    }

    /// Number of pages in the region
    pub const fn page_count(&self) -> usize {
        Self::PAGES
    }

    /// Value returned when no record exists
    pub fn default_value(&self) -> i32 {
        self.default_value
    }

    /// Borrow the underlying region
    pub fn region(&self) -> &R {
        &self.region
    }

    /// Read the record word stored at `page`
    pub fn read_page(&mut self, page: usize) -> StorageResult<u32, R::Error> {
        let offset = Self::page_offset(page)?;
        let mut word = [0u8; RECORD_SIZE];
        self.region
            .read(offset, &mut word)
            .map_err(StorageError::Region)?;
        Ok(u32::from_le_bytes(word))
    }

    /// Index of the first erased page, or `P` if every page is written
    pub fn frontier(&mut self) -> StorageResult<usize, R::Error> {
        for page in 0..Self::PAGES {
            let word = self.read_page(page)?;
            debug!("Calibration page {} holds {:#010x}", page, word);
            if word == ERASED_WORD {
                return Ok(page);
            }
        }
        Ok(Self::PAGES)
    }

    /// Read the most recently written calibration value
    ///
    /// Returns the default when no page has been written yet.
    pub fn read_latest(&mut self) -> StorageResult<i32, R::Error> {
        match self.frontier()? {
            0 => {
                info!(
                    "No calibration found, using default of {}",
                    self.default_value
                );
                Ok(self.default_value)
            }
            frontier => {
                let page = frontier - 1;
                let value = self.read_page(page)? as i32;
                info!("Read calibration {} from page {}", value, page);
                Ok(value)
            }
        }
    }

    /// Append a new calibration value, erasing the region first if it is full
    ///
    /// Returns the page the value was written to. Program and erase run inside
    /// a critical section so nothing else touches the flash mid-operation.
    pub fn write(&mut self, value: i32) -> StorageResult<usize, R::Error> {
        if value as u32 == ERASED_WORD {
            return Err(StorageError::ErasedSentinel(value));
        }

        let mut frontier = self.frontier()?;
        if frontier == Self::PAGES {
            info!("Calibration region full, erasing {} pages", Self::PAGES);
            let region = &mut self.region;
            critical_section::with(|_| region.erase(0, R::REGION_SIZE as u32))
                .map_err(StorageError::Region)?;
            frontier = 0;
        }

        let offset = Self::page_offset(frontier)?;
        let bytes = value.to_le_bytes();
        let region = &mut self.region;
        critical_section::with(|_| region.program(offset, &bytes))
            .map_err(StorageError::Region)?;

        info!("Wrote calibration {} to page {}", value, frontier);
        Ok(frontier)
    }

    fn page_offset(page: usize) -> StorageResult<u32, R::Error> {
        if page >= Self::PAGES {
            return Err(StorageError::PageOutOfRange {
                page,
                pages: Self::PAGES,
            });
        }
        Ok((page * R::PAGE_SIZE) as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::RamRegion;

    type Region = RamRegion<4096, 256>;
    type Store = CalibrationStore<Region>;

    fn store_with_pages(values: &[i32]) -> Store {
        let mut region = Region::new();
        for (page, value) in values.iter().enumerate() {
            region
                .program((page * 256) as u32, &value.to_le_bytes())
                .unwrap();
        }
        CalibrationStore::new(region, 100)
    }

    #[test]
    fn test_page_count_from_geometry() {
        assert_eq!(Store::PAGES, 16);
    }

    #[test]
    fn test_empty_region_returns_default() {
        let mut store = store_with_pages(&[]);
        assert_eq!(store.frontier().unwrap(), 0);
        assert_eq!(store.read_latest().unwrap(), 100);
    }

    #[test]
    fn test_latest_is_page_before_first_erased() {
        let mut store = store_with_pages(&[42, 57]);
        assert_eq!(store.read_latest().unwrap(), 57);
    }

    #[test]
    fn test_write_appends_without_touching_earlier_pages() {
        let mut store = store_with_pages(&[42, 57]);

        let page = store.write(99).unwrap();

        assert_eq!(page, 2);
        assert_eq!(store.region().page_word(0), 42);
        assert_eq!(store.region().page_word(1), 57);
        assert_eq!(store.region().page_word(2), 99);
        assert_eq!(store.read_latest().unwrap(), 99);
    }

    #[test]
    fn test_write_then_read_round_trips() {
        let mut store = store_with_pages(&[]);
        for value in [0, 1, -2, i32::MAX, i32::MIN, 4321] {
            store.write(value).unwrap();
            assert_eq!(store.read_latest().unwrap(), value);
        }
    }

    #[test]
    fn test_full_region_returns_last_page() {
        let values: [i32; 16] = core::array::from_fn(|i| i as i32 * 10);
        let mut store = store_with_pages(&values);
        assert_eq!(store.frontier().unwrap(), 16);
        assert_eq!(store.read_latest().unwrap(), 150);
    }

    #[test]
    fn test_rotation_erases_once_and_restarts_at_page_zero() {
        let mut store = store_with_pages(&[]);

        for value in 1..=16 {
            store.write(value).unwrap();
        }
        assert_eq!(store.region().erase_count(), 0);

        let page = store.write(17).unwrap();

        assert_eq!(page, 0);
        assert_eq!(store.region().erase_count(), 1);
        assert_eq!(store.region().page_word(0), 17);
        assert_eq!(store.frontier().unwrap(), 1);
        assert_eq!(store.read_latest().unwrap(), 17);
    }

    #[test]
    fn test_erased_pattern_is_rejected() {
        let mut store = store_with_pages(&[5]);
        assert!(matches!(
            store.write(-1),
            Err(StorageError::ErasedSentinel(-1))
        ));
        assert_eq!(store.read_latest().unwrap(), 5);
    }

    #[test]
    fn test_page_index_is_bounds_checked() {
        let mut store = store_with_pages(&[]);
        assert!(matches!(
            store.read_page(16),
            Err(StorageError::PageOutOfRange { page: 16, pages: 16 })
        ));
    }
}
