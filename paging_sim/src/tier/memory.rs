use log::trace;

use crate::{
    error::{PagingError, Result},
    page::{Page, PageId},
};

use super::{page_list::PageList, Occupancy, ResidentPage};

/// Physical memory: the bounded tier that holds resident pages.
///
/// Memory never evicts on its own. If `admit` fails, the caller has to make room first.
#[derive(Debug, Clone)]
pub struct Memory {
    pages: PageList,
}

impl Memory {
    pub fn new(max_size: usize) -> Self {
        Self {
            pages: PageList::new(max_size),
        }
    }

    /// Appends `page` to the resident list and stamps it with `tick`.
    ///
    /// Fails with `CapacityExceeded` if the page does not fit into the remaining space.
    pub fn admit(&mut self, page: Page, tick: u64) -> Result<()> {
        if !self.pages.fits(page.size()) {
            return Err(PagingError::CapacityExceeded {
                page: page.id(),
                size: page.size(),
                occupancy: self.occupancy(),
            });
        }

        trace!("Admit {} into memory (tick={})", page, tick);
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

    /// Records a reference to a resident page at `tick`
    pub fn touch(&mut self, id: PageId, tick: u64) -> Result<()> {
        if self.pages.touch(id, tick) {
            Ok(())
        } else {
            Err(PagingError::NotResident(id))
        }
    }

    pub fn get(&self, id: PageId) -> Option<&ResidentPage> {
        self.pages.get(id)
    }

    /// Resident pages from the oldest to the newest admission
    pub fn resident(&self) -> impl Iterator<Item = &ResidentPage> + '_ {
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

    #[inline]
    pub fn free_size(&self) -> usize {
        self.occupancy().free_size()
    }

    /// Memory is fragmented if the resident volume is not a multiple of the page size,
    /// meaning some slack smaller than one full page is in use.
    pub fn is_fragmented(&self, page_size: usize) -> bool {
        self.occupancy().current_size % page_size != 0
    }

    /// Number of full pages that still fit
    pub fn free_page_slots(&self, page_size: usize) -> usize {
        self.free_size() / page_size
    }
}
