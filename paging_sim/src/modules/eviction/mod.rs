mod fifo;
mod lru;

pub use fifo::*;
pub use lru::*;

use crate::{page::PageId, paging_config::PolicyKind, tier::Memory};

/// Decides which resident page has to leave memory if a new page does not fit.
pub trait EvictionPolicyModule {
    /// Short name used in logs and reports
    fn name(&self) -> &'static str;

    /// Selects the page that should be moved to virtual memory.
    ///
    /// Returns `None` only if `memory` holds no pages at all.
    /// The returned page has to be resident.
    /// Recency is stamped on `ResidentPage::last_used` by memory.
    fn select_victim(&mut self, memory: &Memory) -> Option<PageId>;
}

/// Eviction policy that is chosen at runtime (e.g. from a config file)
#[derive(Debug, Clone, Copy)]
pub enum DynamicEvictionModule {
    Fifo(FifoEvictionModule),
    Lru(LruEvictionModule),
}

impl From<PolicyKind> for DynamicEvictionModule {
    fn from(kind: PolicyKind) -> Self {
        match kind {
            PolicyKind::Fifo => DynamicEvictionModule::Fifo(FifoEvictionModule),
            PolicyKind::Lru => DynamicEvictionModule::Lru(LruEvictionModule),
        }
    }
}

impl EvictionPolicyModule for DynamicEvictionModule {
    fn name(&self) -> &'static str {
        match self {
            DynamicEvictionModule::Fifo(module) => module.name(),
            DynamicEvictionModule::Lru(module) => module.name(),
        }
    }

    fn select_victim(&mut self, memory: &Memory) -> Option<PageId> {
        match self {
            DynamicEvictionModule::Fifo(module) => module.select_victim(memory),
            DynamicEvictionModule::Lru(module) => module.select_victim(memory),
        }
    }
}
