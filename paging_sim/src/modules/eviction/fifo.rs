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

use crate::{page::PageId, tier::Memory};

use super::EvictionPolicyModule;

/// Evicts the page that has been resident the longest.
///
/// Completely stateless: memory keeps its pages in admission order,
/// a page that comes back after an eviction is appended again.
#[derive(Debug, Clone, Copy, Default)]
pub struct FifoEvictionModule;

impl EvictionPolicyModule for FifoEvictionModule {
    fn name(&self) -> &'static str {
        "FIFO"
    }

    fn select_victim(&mut self, memory: &Memory) -> Option<PageId> {
        memory.resident().next().map(|entry| entry.id())
    }
}
