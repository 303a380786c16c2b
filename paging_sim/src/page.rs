use core::{
    fmt::{self, Display},
    hash::{Hash, Hasher},
};

use serde::Serialize;

use crate::process::ProcessId;

/// Unique identifier of a page.
///
/// Page identifiers are assigned sequentially over all processes of a simulation,
/// so a page identifier doubles as the index into the page set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PageId(pub usize);

impl Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A page of a process, the unit of residency and eviction.
///
/// Two pages are the same page if their identifiers match,
/// size and owner are never compared.
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    id: PageId,
    size: usize,

    /// back reference to the process this page was generated from
    owner: ProcessId,

    /// index of this page inside of its owning process
    number: usize,
}

impl Page {
    pub fn new(id: PageId, size: usize, owner: ProcessId, number: usize) -> Self {
        debug_assert!(size > 0, "pages can not be empty");
        Self {
            id,
            size,
            owner,
            number,
        }
    }

    #[inline]
    pub fn id(&self) -> PageId {
        self.id
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn owner(&self) -> ProcessId {
        self.owner
    }

    #[inline]
    pub fn number(&self) -> usize {
        self.number
    }
}

impl PartialEq for Page {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Page {}

impl Hash for Page {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "page {} ({}:{}, {} units)",
            self.id, self.owner, self.number, self.size
        )
    }
}
