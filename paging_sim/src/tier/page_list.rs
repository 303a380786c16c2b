/*
 *  Copyright (C) 2025  Markus Elias Gerber
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  You should have received a copy of the GNU General Public License
 *  along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

use std::collections::{HashSet, VecDeque};

use serde::Serialize;

use crate::page::{Page, PageId};

use super::Occupancy;

/// A page held by a tier together with its bookkeeping ticks
#[derive(Debug, Clone, Serialize)]
pub struct ResidentPage {
    page: Page,

    /// tick at which the page entered this tier
    admitted_at: u64,

    /// tick of the most recent reference (equals `admitted_at` until referenced again)
    last_used: u64,
}

impl ResidentPage {
    pub(crate) fn new(page: Page, tick: u64) -> Self {
        Self {
            page,
            admitted_at: tick,
            last_used: tick,
        }
    }

    #[inline]
    pub fn page(&self) -> &Page {
        &self.page
    }

    #[inline]
    pub fn id(&self) -> PageId {
        self.page.id()
    }

    #[inline]
    pub fn admitted_at(&self) -> u64 {
        self.admitted_at
    }

    #[inline]
    pub fn last_used(&self) -> u64 {
        self.last_used
    }

    pub(crate) fn into_page(self) -> Page {
        self.page
    }
}

/// Bounded container of pages in insertion order that can remove any page by identity.
///
/// Keeps `current_size == sum(page sizes) <= max_size` at all times.
/// The hash index makes membership tests O(1), removal is O(n).
#[derive(Debug, Clone)]
pub(crate) struct PageList {
    entries: VecDeque<ResidentPage>,
    index: HashSet<PageId>,
    current_size: usize,
    max_size: usize,
}

impl PageList {
    pub(crate) fn new(max_size: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            index: HashSet::new(),
            current_size: 0,
            max_size,
        }
    }

    #[inline]
    pub(crate) fn fits(&self, size: usize) -> bool {
        self.current_size + size <= self.max_size
    }

    #[inline]
    pub(crate) fn contains(&self, id: PageId) -> bool {
        self.index.contains(&id)
    }

    /// Appends `entry` to the back.
    ///
    /// The caller has to make sure that the page fits and is not already present.
    pub(crate) fn push_back(&mut self, entry: ResidentPage) {
        debug_assert!(self.fits(entry.page().size()), "capacity check has to happen first");

        let inserted = self.index.insert(entry.id());
        debug_assert!(inserted, "page {} is already part of this list", entry.id());

        self.current_size += entry.page().size();
        self.entries.push_back(entry);
    }

    pub(crate) fn remove(&mut self, id: PageId) -> Option<ResidentPage> {
        if !self.index.remove(&id) {
            return None;
        }

        let pos = self.entries.iter().position(|entry| entry.id() == id)?;
        let entry = self.entries.remove(pos)?;
        self.current_size -= entry.page().size();

        Some(entry)
    }

    pub(crate) fn get(&self, id: PageId) -> Option<&ResidentPage> {
        if !self.contains(id) {
            return None;
        }

        self.entries.iter().find(|entry| entry.id() == id)
    }

    pub(crate) fn get_mut(&mut self, id: PageId) -> Option<&mut ResidentPage> {
        if !self.contains(id) {
            return None;
        }

        self.entries.iter_mut().find(|entry| entry.id() == id)
    }

    /// Marks the page as referenced at `tick`. Returns `false` if the page is not in this list.
    pub(crate) fn touch(&mut self, id: PageId, tick: u64) -> bool {
        match self.get_mut(id) {
            Some(entry) => {
                entry.last_used = tick;
                true
            }
            None => false,
        }
    }

    #[inline]
    pub(crate) fn iter(&self) -> std::collections::vec_deque::Iter<'_, ResidentPage> {
        self.entries.iter()
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub(crate) fn occupancy(&self) -> Occupancy {
        Occupancy {
            current_size: self.current_size,
            max_size: self.max_size,
        }
    }
}

#[cfg(test)]
mod test {
    use crate::process::ProcessId;

    use super::*;

    fn page(id: usize, size: usize) -> ResidentPage {
        ResidentPage::new(Page::new(PageId(id), size, ProcessId(0), id), id as u64)
    }

    #[test]
    fn test_remove_from_the_middle() {
        let mut list = PageList::new(10);
        for i in 0..4 {
            list.push_back(page(i, 2));
        }
        assert_eq!(list.occupancy().current_size, 8);

        let removed = list.remove(PageId(2)).unwrap();
        assert_eq!(removed.id(), PageId(2));
        assert!(!list.contains(PageId(2)));
        assert!(list.remove(PageId(2)).is_none());

        let order: Vec<PageId> = list.iter().map(|entry| entry.id()).collect();
        assert_eq!(order, [PageId(0), PageId(1), PageId(3)]);
        assert_eq!(list.occupancy().current_size, 6);
    }

    #[test]
    fn test_touch() {
        let mut list = PageList::new(4);
        list.push_back(page(0, 2));

        assert!(list.touch(PageId(0), 17));
        assert_eq!(list.get(PageId(0)).unwrap().last_used(), 17);
        assert_eq!(list.get(PageId(0)).unwrap().admitted_at(), 0);
        assert!(!list.touch(PageId(1), 17));
    }

    #[test]
    fn test_fits() {
        let mut list = PageList::new(5);
        list.push_back(page(0, 3));
        assert!(list.fits(2));
        assert!(!list.fits(3));
        assert_eq!(list.occupancy().free_size(), 2);
    }
}
