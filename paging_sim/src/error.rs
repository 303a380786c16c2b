//! Error types of the paging simulator.

use thiserror::Error;

use crate::{page::PageId, process::ProcessId, tier::Occupancy};

/// Result type alias for operations on the memory hierarchy
pub type Result<T> = core::result::Result<T, PagingError>;

/// Rejected configuration. Nothing is simulated if one of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A size bound was zero or negative
    #[error("{name} has to be positive (got {value})")]
    NonPositiveSize { name: &'static str, value: i64 },

    /// A size bound does not fit into `usize` on this target
    #[error("{name} of {value} is too large for this platform")]
    SizeOutOfRange { name: &'static str, value: i64 },

    /// A single page would never fit into one of the tiers
    #[error("page size {page_size} is larger than the {tier} bound of {bound}")]
    PageLargerThanTier {
        page_size: usize,
        tier: &'static str,
        bound: usize,
    },

    /// Policy tag is neither FIFO nor LRU
    #[error("unrecognized eviction policy \"{0}\" (expected fifo/1 or lru/2)")]
    UnknownPolicy(String),

    /// A process record with a size that can not be partitioned into pages
    #[error("process {id} has a size of {size}, which can not be partitioned into pages")]
    InvalidProcessSize { id: ProcessId, size: i64 },

    /// Two processes share the same identifier
    #[error("process {0} is defined more than once")]
    DuplicateProcess(ProcessId),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PagingError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Admitting the page would overflow the tier.
    /// The simulator recovers from this on `Memory` by evicting first.
    #[error("admitting page {page} ({size} units) would exceed the capacity ({occupancy})")]
    CapacityExceeded {
        page: PageId,
        size: usize,
        occupancy: Occupancy,
    },

    /// Virtual memory can not absorb an evicted page. There is no further tier, so this is fatal.
    #[error("virtual memory can not absorb page {page} ({size} units, at {virtual_memory})")]
    BackingStoreExhausted {
        page: PageId,
        size: usize,
        virtual_memory: Occupancy,
    },

    /// The page is not held by the tier it was removed from.
    /// Only happens if an internal invariant is broken (e.g. double eviction).
    #[error("page {0} is not resident in this tier")]
    NotResident(PageId),

    #[error("reference index {index} is outside of the page set ({page_count} pages)")]
    InvalidReference { index: usize, page_count: usize },
}

impl PagingError {
    /// Errors after which the simulation can not continue
    pub fn is_fatal(&self) -> bool {
        !matches!(self, PagingError::InvalidReference { .. })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = PagingError::from(ConfigurationError::UnknownPolicy("clock".into()));
        assert!(err.to_string().contains("\"clock\""));
        assert!(err.is_fatal());

        let err = PagingError::BackingStoreExhausted {
            page: PageId(3),
            size: 2,
            virtual_memory: Occupancy {
                current_size: 4,
                max_size: 4,
            },
        };
        assert!(err.to_string().contains("4/4"), "{}", err);

        let err = PagingError::InvalidReference {
            index: 9,
            page_count: 5,
        };
        assert!(!err.is_fatal());
    }
}
