use serde::Serialize;

use crate::{
    error::Result,
    modules::eviction::{FifoEvictionModule, LruEvictionModule},
    paging_config::PagingConfig,
    process::Process,
    reference::ReferenceSequence,
    simulator::{PageReferenceSimulator, SimulationSummary},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicyComparison {
    pub fifo: SimulationSummary,
    pub lru: SimulationSummary,
}

/// Replays the same sequence with FIFO and with LRU.
///
/// Both runs get their own simulator, the policy tag in `config` is ignored.
pub fn compare_policies(
    config: &PagingConfig,
    processes: &[Process],
    sequence: &ReferenceSequence,
) -> Result<PolicyComparison> {
    let mut fifo = PageReferenceSimulator::new(config.clone(), processes, FifoEvictionModule)?;
    let mut lru = PageReferenceSimulator::new(config.clone(), processes, LruEvictionModule)?;

    Ok(PolicyComparison {
        fifo: fifo.run(sequence)?,
        lru: lru.run(sequence)?,
    })
}
