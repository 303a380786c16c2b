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

use log::{debug, error, info, trace, warn};
use serde::Serialize;

use crate::{
    error::{ConfigurationError, PagingError, Result},
    modules::eviction::{DynamicEvictionModule, EvictionPolicyModule},
    page::{Page, PageId},
    paging_config::PagingConfig,
    process::{PageSet, Process},
    reference::ReferenceSequence,
    tier::{Memory, Occupancy, VirtualMemory},
};

/// Outcome of a single reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepClassification {
    /// page was resident already
    Hit,
    /// page fault, memory had enough free space
    MissNoEviction,
    /// page fault, at least one resident page had to be moved to virtual memory
    MissWithEviction,
    /// reference pointed outside of the page set and was skipped
    InvalidReference,
}

impl StepClassification {
    #[inline]
    pub fn is_fault(&self) -> bool {
        matches!(
            self,
            StepClassification::MissNoEviction | StepClassification::MissWithEviction
        )
    }
}

/// State of the hierarchy right after one reference was processed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub tick: u64,

    /// index into the page set as it appeared in the reference sequence
    pub reference: usize,

    /// `None` for invalid references
    pub page: Option<PageId>,

    pub classification: StepClassification,

    /// pages that were moved to virtual memory during this step (oldest decision first)
    pub evicted: Vec<PageId>,

    /// whether the referenced page was fetched back from virtual memory
    pub swapped_in: bool,

    pub memory: Occupancy,
    pub virtual_memory: Occupancy,
    pub resident_page_count: usize,
    pub backing_page_count: usize,
    pub cumulative_fault_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationSummary {
    pub policy: &'static str,

    /// number of processed references, including invalid ones
    pub references: usize,
    pub hits: usize,
    pub fault_count: usize,
    pub evictions: usize,

    /// sequence entries that were skipped
    pub invalid_references: Vec<usize>,

    pub memory: Occupancy,
    pub virtual_memory: Occupancy,
    pub resident_page_count: usize,
    pub backing_page_count: usize,
    pub memory_fragmented: bool,
    pub free_page_slots: usize,
}

impl SimulationSummary {
    /// Share of valid references that hit a resident page
    pub fn hit_ratio(&self) -> f64 {
        let valid = self.references - self.invalid_references.len();
        if valid == 0 {
            0.0
        } else {
            self.hits as f64 / valid as f64
        }
    }
}

/// Replays page references against memory and virtual memory.
///
/// One instance owns its tiers exclusively, so independent runs never share eviction state.
/// Every reference is processed completely (including evictions) before the next one.
pub struct PageReferenceSimulator<P: EvictionPolicyModule> {
    config: PagingConfig,
    pages: PageSet,
    memory: Memory,
    virtual_memory: VirtualMemory,
    policy: P,

    /// current tick, one tick per processed reference
    tick: u64,
    fault_count: usize,
    hits: usize,
    evictions: usize,
    invalid_references: Vec<usize>,
    trace: Vec<StepClassification>,
}

impl PageReferenceSimulator<DynamicEvictionModule> {
    /// Creates a simulator with the policy selected in `config`
    pub fn from_config(
        config: PagingConfig,
        processes: &[Process],
    ) -> core::result::Result<Self, ConfigurationError> {
        let policy = DynamicEvictionModule::from(config.policy);
        Self::new(config, processes, policy)
    }
}

impl<P: EvictionPolicyModule> PageReferenceSimulator<P> {
    pub fn new(
        config: PagingConfig,
        processes: &[Process],
        policy: P,
    ) -> core::result::Result<Self, ConfigurationError> {
        config.validate()?;
        let pages = PageSet::from_processes(processes, config.page_size)?;

        let total_size = pages.total_size();
        if total_size > config.max_memory_size + config.max_virtual_memory_size {
            warn!(
                "Pages need {} units but both tiers only hold {}, virtual memory might run out",
                total_size,
                config.max_memory_size + config.max_virtual_memory_size
            );
        }

        info!(
            "Created {} simulator: {} pages of {} processes (memory={}, vm={}, page size={})",
            policy.name(),
            pages.len(),
            processes.len(),
            config.max_memory_size,
            config.max_virtual_memory_size,
            config.page_size
        );

        Ok(Self {
            memory: Memory::new(config.max_memory_size),
            virtual_memory: VirtualMemory::new(config.max_virtual_memory_size),
            config,
            pages,
            policy,
            tick: 0,
            fault_count: 0,
            hits: 0,
            evictions: 0,
            invalid_references: vec![],
            trace: vec![],
        })
    }

    /// Generates `config.reference_count` references over all pages, seeded with `config.seed`
    pub fn generate_references(&self) -> ReferenceSequence {
        ReferenceSequence::seeded(self.config.seed, self.pages.len(), self.config.reference_count)
    }

    /// Processes a single reference to the page with index `index`.
    ///
    /// Out of range indices are skipped and recorded, they do not abort the run.
    /// Returned errors are fatal and leave both tiers and all counters unchanged.
    pub fn step(&mut self, index: usize) -> Result<StepReport> {
        let tick = self.tick;

        let page = match self.pages.get(index) {
            Some(page) => page.clone(),
            None => {
                let err = PagingError::InvalidReference {
                    index,
                    page_count: self.pages.len(),
                };
                warn!("Skip reference at tick {}: {}", tick, err);
                self.invalid_references.push(index);

                return Ok(self.finish_step(
                    index,
                    None,
                    StepClassification::InvalidReference,
                    vec![],
                    false,
                ));
            }
        };

        let id = page.id();
        match self.reference_page(page, tick) {
            Ok((classification, evicted, swapped_in)) => {
                Ok(self.finish_step(index, Some(id), classification, evicted, swapped_in))
            }
            Err(err) => {
                error!(
                    "Halted at tick {} while referencing {}: {} (memory={}, vm={})",
                    tick,
                    id,
                    err,
                    self.memory.occupancy(),
                    self.virtual_memory.occupancy()
                );
                Err(err)
            }
        }
    }

    /// Runs the whole sequence and returns the final summary
    pub fn run(&mut self, sequence: &ReferenceSequence) -> Result<SimulationSummary> {
        self.run_with(sequence, |_| {})
    }

    /// Same as `run`, but hands every step report to `on_step`
    pub fn run_with<F: FnMut(&StepReport)>(
        &mut self,
        sequence: &ReferenceSequence,
        mut on_step: F,
    ) -> Result<SimulationSummary> {
        info!(
            "Run {} references with {} policy",
            sequence.len(),
            self.policy.name()
        );

        for index in sequence.iter() {
            let report = self.step(index)?;
            on_step(&report);
        }

        let summary = self.summary();
        info!(
            "Finished {} run: {} faults, {} hits, {} evictions, {} invalid references",
            summary.policy,
            summary.fault_count,
            summary.hits,
            summary.evictions,
            summary.invalid_references.len()
        );

        Ok(summary)
    }

    /// Runs the reference sequence generated from the config
    pub fn run_generated(&mut self) -> Result<SimulationSummary> {
        let sequence = self.generate_references();
        self.run(&sequence)
    }

    pub fn summary(&self) -> SimulationSummary {
        SimulationSummary {
            policy: self.policy.name(),
            references: self.trace.len(),
            hits: self.hits,
            fault_count: self.fault_count,
            evictions: self.evictions,
            invalid_references: self.invalid_references.clone(),
            memory: self.memory.occupancy(),
            virtual_memory: self.virtual_memory.occupancy(),
            resident_page_count: self.memory.page_count(),
            backing_page_count: self.virtual_memory.page_count(),
            memory_fragmented: self.memory.is_fragmented(self.config.page_size),
            free_page_slots: self.memory.free_page_slots(self.config.page_size),
        }
    }

    fn reference_page(
        &mut self,
        page: Page,
        tick: u64,
    ) -> Result<(StepClassification, Vec<PageId>, bool)> {
        let id = page.id();

        if self.memory.contains(id) {
            self.memory.touch(id, tick)?;

            self.hits += 1;
            return Ok((StepClassification::Hit, vec![], false));
        }

        let swapped_in = self.virtual_memory.contains(id);
        let (page, evicted) = self.make_room(page, tick)?;
        self.memory.admit(page, tick)?;

        self.fault_count += 1;
        self.evictions += evicted.len();

        let classification = if evicted.is_empty() {
            StepClassification::MissNoEviction
        } else {
            StepClassification::MissWithEviction
        };

        Ok((classification, evicted, swapped_in))
    }

    /// Moves victims to virtual memory until `page` fits into memory.
    ///
    /// If `page` currently sits in virtual memory it is taken out of there, so the
    /// returned page is the one that has to be admitted. Nothing is moved before the
    /// whole eviction plan is known to fit.
    fn make_room(&mut self, page: Page, tick: u64) -> Result<(Page, Vec<PageId>)> {
        let victims = self.plan_evictions(&page)?;

        let incoming = if self.virtual_memory.contains(page.id()) {
            self.swap_in(page.id(), tick)?
        } else {
            page
        };

        for &victim in &victims {
            let entry = self.memory.remove(victim)?;
            debug!(
                "Evict {} (policy={}, admitted at {}, last used at {}, tick={})",
                entry.page(),
                self.policy.name(),
                entry.admitted_at(),
                entry.last_used(),
                tick
            );
            self.virtual_memory.admit(entry.into_page(), tick)?;
        }

        Ok((incoming, victims))
    }

    /// Selects every victim needed to fit `page`, working on a copy of memory.
    ///
    /// Fails if virtual memory can not absorb all victims. Space that `page` releases
    /// in virtual memory when it gets swapped in counts as free.
    fn plan_evictions(&mut self, page: &Page) -> Result<Vec<PageId>> {
        if self.memory.can_admit(page.size()) {
            return Ok(vec![]);
        }

        let mut planned = self.memory.clone();
        let mut backing_free = self.virtual_memory.occupancy().free_size();
        if self.virtual_memory.contains(page.id()) {
            backing_free += page.size();
        }

        let mut victims = vec![];
        while !planned.can_admit(page.size()) {
            // only empty with pages bigger than memory, which config validation forbids
            let victim = self.policy.select_victim(&planned).ok_or_else(|| {
                PagingError::CapacityExceeded {
                    page: page.id(),
                    size: page.size(),
                    occupancy: self.memory.occupancy(),
                }
            })?;

            let size = planned.remove(victim)?.page().size();
            if size > backing_free {
                return Err(PagingError::BackingStoreExhausted {
                    page: victim,
                    size,
                    virtual_memory: self.virtual_memory.occupancy(),
                });
            }

            backing_free -= size;
            victims.push(victim);
        }

        Ok(victims)
    }

    fn swap_in(&mut self, id: PageId, tick: u64) -> Result<Page> {
        let entry = self.virtual_memory.remove(id)?;
        debug!(
            "Swap in {} from virtual memory (swapped out at {}, tick={})",
            entry.page(),
            entry.admitted_at(),
            tick
        );
        Ok(entry.into_page())
    }

    fn finish_step(
        &mut self,
        reference: usize,
        page: Option<PageId>,
        classification: StepClassification,
        evicted: Vec<PageId>,
        swapped_in: bool,
    ) -> StepReport {
        let report = StepReport {
            tick: self.tick,
            reference,
            page,
            classification,
            evicted,
            swapped_in,
            memory: self.memory.occupancy(),
            virtual_memory: self.virtual_memory.occupancy(),
            resident_page_count: self.memory.page_count(),
            backing_page_count: self.virtual_memory.page_count(),
            cumulative_fault_count: self.fault_count,
        };

        trace!(
            "tick={} ref={} -> {:?} (memory={} [{}], vm={} [{}], faults={})",
            report.tick,
            report.reference,
            report.classification,
            report.memory,
            report.resident_page_count,
            report.virtual_memory,
            report.backing_page_count,
            report.cumulative_fault_count
        );

        self.trace.push(classification);
        self.tick += 1;

        report
    }

    #[inline]
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    #[inline]
    pub fn virtual_memory(&self) -> &VirtualMemory {
        &self.virtual_memory
    }

    #[inline]
    pub fn pages(&self) -> &PageSet {
        &self.pages
    }

    #[inline]
    pub fn config(&self) -> &PagingConfig {
        &self.config
    }

    #[inline]
    pub fn policy(&self) -> &P {
        &self.policy
    }

    #[inline]
    pub fn fault_count(&self) -> usize {
        self.fault_count
    }

    #[inline]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Classification of every processed reference in order
    #[inline]
    pub fn trace(&self) -> &[StepClassification] {
        &self.trace
    }
}

#[cfg(test)]
mod test {
    use crate::{modules::eviction::FifoEvictionModule, process::ProcessId, PolicyKind};

    use super::*;

    fn config(memory: usize, virtual_memory: usize, page_size: usize) -> PagingConfig {
        PagingConfig {
            max_memory_size: memory,
            max_virtual_memory_size: virtual_memory,
            page_size,
            ..Default::default()
        }
    }

    /// `count` processes with one page of `page_size` each
    fn single_page_processes(count: u32, page_size: usize) -> Vec<Process> {
        (0..count)
            .map(|i| Process::new(ProcessId(i), format!("Process {}", i), page_size).unwrap())
            .collect()
    }

    #[test]
    fn test_idempotent_hit() {
        let processes = single_page_processes(3, 2);
        let mut sim =
            PageReferenceSimulator::new(config(4, 8, 2), &processes, FifoEvictionModule).unwrap();

        sim.step(1).unwrap();
        let first = sim.step(1).unwrap();
        let second = sim.step(1).unwrap();

        assert_eq!(first.classification, StepClassification::Hit);
        assert_eq!(second.classification, StepClassification::Hit);
        assert_eq!(first.memory, second.memory);
        assert_eq!(first.virtual_memory, second.virtual_memory);
        assert_eq!(second.cumulative_fault_count, 1);
    }

    #[test]
    fn test_invalid_reference_is_skipped() {
        let processes = single_page_processes(2, 2);
        let mut sim =
            PageReferenceSimulator::new(config(4, 8, 2), &processes, FifoEvictionModule).unwrap();

        let summary = sim
            .run(&ReferenceSequence::from_indices(vec![0, 7, 1, 0]))
            .unwrap();

        assert_eq!(summary.references, 4);
        assert_eq!(summary.invalid_references, [7]);
        assert_eq!(summary.fault_count, 2);
        assert_eq!(summary.hits, 1);
        assert_eq!(sim.trace()[1], StepClassification::InvalidReference);
        assert_eq!(summary.hit_ratio(), 1.0 / 3.0);
    }

    #[test]
    fn test_swapped_out_page_comes_back() {
        let processes = single_page_processes(3, 2);
        let mut sim =
            PageReferenceSimulator::new(config(4, 8, 2), &processes, FifoEvictionModule).unwrap();

        for i in [0, 1, 2] {
            sim.step(i).unwrap();
        }
        assert!(sim.virtual_memory().contains(PageId(0)));

        let report = sim.step(0).unwrap();
        assert_eq!(report.classification, StepClassification::MissWithEviction);
        assert!(report.swapped_in);
        assert_eq!(report.evicted, [PageId(1)]);
        assert!(sim.memory().contains(PageId(0)));
        assert!(!sim.virtual_memory().contains(PageId(0)));
        assert_eq!(report.backing_page_count, 1);
    }

    #[test]
    fn test_backing_store_exhausted_keeps_state() {
        // virtual memory can only hold one page
        let processes = single_page_processes(4, 2);
        let mut sim =
            PageReferenceSimulator::new(config(4, 2, 2), &processes, FifoEvictionModule).unwrap();

        for i in [0, 1, 2] {
            sim.step(i).unwrap();
        }

        let before = sim.summary();
        let err = sim.step(3).unwrap_err();
        assert_eq!(
            err,
            PagingError::BackingStoreExhausted {
                page: PageId(1),
                size: 2,
                virtual_memory: Occupancy {
                    current_size: 2,
                    max_size: 2
                }
            }
        );
        assert_eq!(sim.summary(), before);
        assert!(sim.memory().contains(PageId(1)));
        assert!(sim.memory().contains(PageId(2)));
    }

    #[test]
    fn test_backing_store_exhausted_during_multi_eviction() {
        // pages #0(4) #1(1) of process 0 and #2(4) #3(1) of process 1
        let processes = vec![
            Process::new(ProcessId(0), "a", 5).unwrap(),
            Process::new(ProcessId(1), "b", 5).unwrap(),
        ];
        let mut sim =
            PageReferenceSimulator::new(config(6, 5, 4), &processes, FifoEvictionModule).unwrap();

        for i in [0, 1, 3, 2] {
            sim.step(i).unwrap();
        }

        // #0 would release 4 units, but #1, #3 and #2 need 6
        let before = sim.summary();
        let err = sim.step(0).unwrap_err();
        assert_eq!(
            err,
            PagingError::BackingStoreExhausted {
                page: PageId(2),
                size: 4,
                virtual_memory: Occupancy {
                    current_size: 4,
                    max_size: 5
                }
            }
        );

        assert_eq!(sim.summary(), before);
        let resident: Vec<PageId> = sim.memory().resident().map(|entry| entry.id()).collect();
        assert_eq!(resident, [PageId(1), PageId(3), PageId(2)]);
        let swapped: Vec<PageId> = sim.virtual_memory().pages().map(|entry| entry.id()).collect();
        assert_eq!(swapped, [PageId(0)]);
    }

    #[test]
    fn test_swap_in_releases_backing_space() {
        // virtual memory holds one page, swapping in #0 frees its slot for the victim
        let processes = single_page_processes(3, 2);
        let mut sim =
            PageReferenceSimulator::new(config(4, 2, 2), &processes, FifoEvictionModule).unwrap();

        for i in [0, 1, 2] {
            sim.step(i).unwrap();
        }

        let report = sim.step(0).unwrap();
        assert_eq!(report.evicted, [PageId(1)]);
        assert!(report.swapped_in);
        assert!(sim.virtual_memory().contains(PageId(1)));
        assert_eq!(report.virtual_memory.current_size, 2);
    }

    #[test]
    fn test_full_page_evicts_multiple_small_pages() {
        // process 0: pages of 4 and 1 units, process 1: one page of 4 units
        let processes = vec![
            Process::new(ProcessId(0), "a", 5).unwrap(),
            Process::new(ProcessId(1), "b", 4).unwrap(),
        ];
        let mut sim =
            PageReferenceSimulator::new(config(5, 16, 4), &processes, FifoEvictionModule).unwrap();

        sim.step(1).unwrap();
        sim.step(0).unwrap();
        assert_eq!(sim.memory().occupancy().current_size, 5);

        let report = sim.step(2).unwrap();
        assert_eq!(report.classification, StepClassification::MissWithEviction);
        assert_eq!(report.evicted, [PageId(1), PageId(0)]);
        assert_eq!(report.resident_page_count, 1);
        assert_eq!(sim.summary().evictions, 2);
    }

    #[test]
    fn test_lru_from_config() {
        let processes = single_page_processes(3, 1);
        let mut config = config(2, 4, 1);
        config.policy = PolicyKind::Lru;

        let mut sim = PageReferenceSimulator::from_config(config, &processes).unwrap();
        let summary = sim
            .run(&ReferenceSequence::from_indices(vec![0, 1, 0, 2]))
            .unwrap();

        assert_eq!(summary.policy, "LRU");
        assert!(sim.memory().contains(PageId(0)));
        assert!(sim.virtual_memory().contains(PageId(1)));
    }

    #[test]
    fn test_generated_references_are_reproducible() {
        let processes = single_page_processes(6, 2);
        let config = PagingConfig {
            reference_count: 40,
            seed: 99,
            ..config(6, 12, 2)
        };

        let mut a = PageReferenceSimulator::from_config(config.clone(), &processes).unwrap();
        let mut b = PageReferenceSimulator::from_config(config, &processes).unwrap();

        assert_eq!(a.generate_references().len(), 40);
        assert_eq!(a.run_generated().unwrap(), b.run_generated().unwrap());
        assert_eq!(a.trace(), b.trace());
    }

    #[test]
    fn test_rejects_invalid_setup() {
        let processes = single_page_processes(2, 2);
        assert!(matches!(
            PageReferenceSimulator::new(config(2, 8, 4), &processes, FifoEvictionModule),
            Err(ConfigurationError::PageLargerThanTier { .. })
        ));

        let duplicated = vec![processes[0].clone(), processes[0].clone()];
        assert!(matches!(
            PageReferenceSimulator::new(config(4, 8, 2), &duplicated, FifoEvictionModule),
            Err(ConfigurationError::DuplicateProcess(ProcessId(0)))
        ));
    }
}
