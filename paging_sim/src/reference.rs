use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::Serialize;

use crate::page::PageId;

/// Ordered list of page references, each one an index into the page set
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct ReferenceSequence {
    indices: Vec<usize>,
}

impl ReferenceSequence {
    /// Indices are taken as they are; out of range indices are reported by the simulator
    pub fn from_indices(indices: Vec<usize>) -> Self {
        Self { indices }
    }

    pub fn from_page_ids(ids: &[PageId]) -> Self {
        Self {
            indices: ids.iter().map(|id| id.0).collect(),
        }
    }

    /// Draws `length` references uniformly from `0..page_count`.
    ///
    /// Returns an empty sequence if there are no pages to reference.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, page_count: usize, length: usize) -> Self {
        if page_count == 0 {
            return Self::default();
        }

        Self {
            indices: (0..length).map(|_| rng.gen_range(0..page_count)).collect(),
        }
    }

    /// Same as [`ReferenceSequence::random`] with a xoshiro generator seeded from `seed`,
    /// so the same seed always yields the same sequence
    pub fn seeded(seed: u64, page_count: usize, length: usize) -> Self {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        Self::random(&mut rng, page_count, length)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }
}
