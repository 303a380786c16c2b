use std::collections::HashSet;

use crate::{
    modules::eviction::EvictionPolicyModule, PageReferenceSimulator, PagingConfig, PolicyKind,
    Process, ProcessId,
};


pub(crate) fn init_test_logger() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Trace)
        .try_init();
}

/// `count` processes with a single page each, named `A`, `B`, ...
pub(crate) fn lettered_processes(count: u32, page_size: usize) -> Vec<Process> {
    (0..count)
        .map(|i| {
            let name = char::from(b'A' + i as u8).to_string();
            Process::new(ProcessId(i), name, page_size).unwrap()
        })
        .collect()
}

pub(crate) fn test_config(
    memory: usize,
    virtual_memory: usize,
    page_size: usize,
    policy: PolicyKind,
) -> PagingConfig {
    PagingConfig {
        max_memory_size: memory,
        max_virtual_memory_size: virtual_memory,
        page_size,
        policy,
        ..Default::default()
    }
}

/// Checks the capacity and residency invariants of both tiers
pub(crate) fn assert_invariants<P: EvictionPolicyModule>(sim: &PageReferenceSimulator<P>) {
    let memory = sim.memory();
    let virtual_memory = sim.virtual_memory();

    let resident_size: usize = memory.resident().map(|entry| entry.page().size()).sum();
    assert_eq!(memory.occupancy().current_size, resident_size);
    assert!(resident_size <= memory.occupancy().max_size);

    let backing_size: usize = virtual_memory.pages().map(|entry| entry.page().size()).sum();
    assert_eq!(virtual_memory.occupancy().current_size, backing_size);
    assert!(backing_size <= virtual_memory.occupancy().max_size);

    let mut seen = HashSet::new();
    for entry in memory.resident().chain(virtual_memory.pages()) {
        assert!(
            seen.insert(entry.id()),
            "page {} is held by more than one tier (or twice by one)",
            entry.id()
        );
        assert!(entry.id().0 < sim.pages().len());
    }
}
