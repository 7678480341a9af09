//! Non-volatile storage for the calibration constant
//!
//! The calibration value lives in a small block-erasable flash region that is
//! split into equal pages. Records are appended page by page and the whole
//! region is erased only when the last page has been used, so every erase
//! cycle is spread over `P` writes.

use thiserror_no_std::Error;

pub mod calibration_store;
pub mod ram_region;

pub use calibration_store::CalibrationStore;
pub use ram_region::RamRegion;

/// Word read from a page that has never been programmed since the last erase
pub const ERASED_WORD: u32 = 0xFFFF_FFFF;

/// Size of the stored record (one little-endian `i32`)
pub const RECORD_SIZE: usize = core::mem::size_of::<i32>();

/// Default flash page size in bytes (smallest programmable unit)
pub const FLASH_PAGE_SIZE: usize = 256;

/// Default flash sector size in bytes (smallest erasable unit)
pub const FLASH_SECTOR_SIZE: usize = 4096;

/// A fixed, block-erasable non-volatile region
///
/// Offsets are relative to the start of the region. Reads are byte-granular,
/// programming may only clear bits, and erasing resets the whole range to
/// all ones.
pub trait NvRegion {
    /// Error reported by the underlying device
    type Error: core::fmt::Debug;

    /// Smallest independently programmable unit
    const PAGE_SIZE: usize;

    /// Total size of the region (a whole number of erase sectors)
    const REGION_SIZE: usize;

    /// Read `buf.len()` bytes starting at `offset`
    fn read(&mut self, offset: u32, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Program `bytes` starting at `offset`
    fn program(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Erase `length` bytes starting at `offset`
    fn erase(&mut self, offset: u32, length: u32) -> Result<(), Self::Error>;
}

/// Error types for calibration storage
#[derive(Debug, Error)]
pub enum StorageError<E: core::fmt::Debug> {
    /// The underlying region failed
    #[error("Region access failed: {0:?}")]
    Region(E),

    /// A page index beyond the end of the region
    #[error("Page {page} outside region of {pages} pages")]
    PageOutOfRange {
        /// Requested page
        page: usize,
        /// Pages in the region
        pages: usize,
    },

    /// The value encodes to the erased pattern and would read back as empty
    #[error("Value {0} collides with the erased-page pattern")]
    ErasedSentinel(i32),
}

/// Result type for storage operations
pub type StorageResult<T, E> = Result<T, StorageError<E>>;
