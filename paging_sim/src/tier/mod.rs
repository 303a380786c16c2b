mod memory;
mod page_list;
mod virtual_memory;

use core::fmt::{self, Display};

use serde::Serialize;

pub use memory::Memory;
pub use page_list::ResidentPage;
pub use virtual_memory::VirtualMemory;

/// Fill level of a tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Occupancy {
    pub current_size: usize,
    pub max_size: usize,
}

impl Occupancy {
    #[inline]
    pub fn free_size(&self) -> usize {
        self.max_size - self.current_size
    }
}

impl Display for Occupancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.current_size, self.max_size)
    }
}
