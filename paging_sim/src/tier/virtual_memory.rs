use log::trace;

use crate::{
    error::{PagingError, Result},
    page::{Page, PageId},
};

use super::{page_list::PageList, Occupancy, ResidentPage};

/// Backing store for pages that were evicted from `Memory`.
///
/// Has to be big enough to absorb every page that is not resident,
/// there is no further tier to fall back to.
#[derive(Debug)]
pub struct VirtualMemory {
    pages: PageList,
}

impl VirtualMemory {
    pub fn new(max_size: usize) -> Self {
        Self {
            pages: PageList::new(max_size),
        }
    }

    pub fn admit(&mut self, page: Page, tick: u64) -> Result<()> {
        if !self.pages.fits(page.size()) {
            return Err(PagingError::BackingStoreExhausted {
                page: page.id(),
                size: page.size(),
                virtual_memory: self.occupancy(),
            });
        }

        trace!("Swap out {} to virtual memory (tick={})", page, tick);
        self.pages.push_back(ResidentPage::new(page, tick));
        Ok(())
    }

    pub fn remove(&mut self, id: PageId) -> Result<ResidentPage> {
        self.pages.remove(id).ok_or(PagingError::NotResident(id))
    }

    #[inline]
    pub fn contains(&self, id: PageId) -> bool {
        self.pages.contains(id)
    }

    #[inline]
    pub fn can_admit(&self, size: usize) -> bool {
        self.pages.fits(size)
    }

    /// Swapped out pages in the order they were written back
    pub fn pages(&self) -> impl Iterator<Item = &ResidentPage> + '_ {
        self.pages.iter()
    }

    #[inline]
    pub fn occupancy(&self) -> Occupancy {
        self.pages.occupancy()
    }

    #[inline]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

#[cfg(test)]
mod test {
    use crate::process::ProcessId;

    use super::*;

    #[test]
    fn test_create_virtual_memory() {
        let virtual_memory = VirtualMemory::new(25);
        assert_eq!(virtual_memory.occupancy().max_size, 25);
        assert_eq!(virtual_memory.page_count(), 0);
    }

    #[test]
    fn test_backing_store_exhausted() {
        let mut virtual_memory = VirtualMemory::new(4);
        virtual_memory
            .admit(Page::new(PageId(0), 3, ProcessId(1), 0), 0)
            .unwrap();

        let err = virtual_memory
            .admit(Page::new(PageId(1), 2, ProcessId(1), 1), 1)
            .unwrap_err();
        assert_eq!(
            err,
            PagingError::BackingStoreExhausted {
                page: PageId(1),
                size: 2,
                virtual_memory: Occupancy {
                    current_size: 3,
                    max_size: 4
                }
            }
        );

        virtual_memory.remove(PageId(0)).unwrap();
        assert!(virtual_memory.can_admit(4));
        assert!(!virtual_memory.contains(PageId(0)));
    }
}
