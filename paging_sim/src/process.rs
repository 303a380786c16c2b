use core::fmt::{self, Display};
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{
    error::ConfigurationError,
    page::{Page, PageId},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessId(pub u32);

impl Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// A process definition as handed in by an external loader (`"<id> <size>"` per line).
///
/// The size is kept signed so that invalid input can be rejected
/// with a proper error instead of wrapping around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRecord {
    pub id: u32,
    pub size: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Process {
    id: ProcessId,
    name: String,
    size: usize,
}

impl Process {
    pub fn new(
        id: ProcessId,
        name: impl Into<String>,
        size: usize,
    ) -> Result<Self, ConfigurationError> {
        if size == 0 {
            return Err(ConfigurationError::InvalidProcessSize { id, size: 0 });
        }

        Ok(Self {
            id,
            name: name.into(),
            size,
        })
    }

    pub fn from_record(record: &ProcessRecord) -> Result<Self, ConfigurationError> {
        let id = ProcessId(record.id);
        let invalid = || ConfigurationError::InvalidProcessSize {
            id,
            size: record.size,
        };

        if record.size <= 0 {
            return Err(invalid());
        }
        let size = usize::try_from(record.size).map_err(|_| invalid())?;

        Self::new(id, format!("Process {}", record.id), size)
    }

    #[inline]
    pub fn id(&self) -> ProcessId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of pages this process is partitioned into (the last one might be smaller)
    pub fn page_count(&self, page_size: usize) -> usize {
        self.size.div_ceil(page_size)
    }

    /// Partitions this process into pages of `page_size` units.
    ///
    /// If the size is not a multiple of `page_size`, the remainder becomes
    /// a final page which is smaller than `page_size`.
    pub fn generate_pages(&self, page_size: usize, ids: &mut PageIdAllocator) -> Vec<Page> {
        debug_assert!(page_size > 0);

        let mut remaining = self.size;
        let mut pages = Vec::with_capacity(self.page_count(page_size));

        while remaining > 0 {
            let size = remaining.min(page_size);
            pages.push(Page::new(ids.next_id(), size, self.id, pages.len()));
            remaining -= size;
        }

        pages
    }
}

/// Hands out page identifiers that are unique for one simulation
#[derive(Debug, Default)]
pub struct PageIdAllocator {
    next: usize,
}

impl PageIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> PageId {
        let id = PageId(self.next);
        self.next += 1;
        id
    }
}

/// All pages of all processes of one simulation run.
///
/// Index `i` holds the page with identifier `PageId(i)`.
#[derive(Debug, Clone)]
pub struct PageSet {
    pages: Vec<Page>,
}

impl PageSet {
    pub fn from_processes(
        processes: &[Process],
        page_size: usize,
    ) -> Result<Self, ConfigurationError> {
        let mut seen = HashSet::with_capacity(processes.len());
        let mut ids = PageIdAllocator::new();
        let mut pages = vec![];

        for process in processes {
            if !seen.insert(process.id()) {
                return Err(ConfigurationError::DuplicateProcess(process.id()));
            }

            pages.extend(process.generate_pages(page_size, &mut ids));
        }

        Ok(Self { pages })
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Page> {
        self.pages.iter()
    }

    /// Sum of all page sizes
    pub fn total_size(&self) -> usize {
        self.pages.iter().map(|page| page.size()).sum()
    }
}
