mod comparison;
mod error;
mod page;
mod paging_config;
mod process;
mod reference;
mod simulator;
mod tier;

#[cfg(test)]
mod test;

pub mod modules;

pub use comparison::{compare_policies, PolicyComparison};
pub use error::{ConfigurationError, PagingError, Result};
pub use page::{Page, PageId};
pub use paging_config::{PagingConfig, PolicyKind};
pub use process::{PageIdAllocator, PageSet, Process, ProcessId, ProcessRecord};
pub use reference::ReferenceSequence;
pub use simulator::{PageReferenceSimulator, SimulationSummary, StepClassification, StepReport};
pub use tier::{Memory, Occupancy, ResidentPage, VirtualMemory};
