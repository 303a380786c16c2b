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

/// Evicts the page whose last reference lies furthest back.
///
/// Recency ticks live on the resident entries, so this module itself is stateless.
/// Equal ticks are resolved by admission order.
#[derive(Debug, Clone, Copy, Default)]
pub struct LruEvictionModule;

impl EvictionPolicyModule for LruEvictionModule {
    fn name(&self) -> &'static str {
        "LRU"
    }

    fn select_victim(&mut self, memory: &Memory) -> Option<PageId> {
        memory
            .resident()
            .min_by_key(|entry| (entry.last_used(), entry.admitted_at()))
            .map(|entry| entry.id())
    }
}
