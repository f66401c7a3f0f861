use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use cinnabar_common::Weight;

/// The type of errors that can be yielded by a sampler.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The weights handed to [`WeightedWithoutReplacement::initialize`] sum
    /// past the capacity of the weight type.
    #[error("total weight overflows u64")]
    WeightOverflow,

    /// More samples were requested than there are selectable entries.
    #[error("cannot sample {requested} of {available} selectable entries")]
    NotEnoughEntries {
        /// The number of samples requested.
        requested: usize,
        /// The number of entries with non-zero weight.
        available: usize,
    },
}

/// Draws distinct indices into a weight array, each selected with
/// probability proportional to its weight at the time of selection.
///
/// For identical `(weights, seed, count)` inputs the output sequence must
/// be identical across calls, instances, and processes. Every node of the
/// network derives its proposer schedule from these draws, so two
/// conforming implementations disagreeing on a sequence is a protocol
/// violation.
pub trait WeightedWithoutReplacement {
    /// Set the weight array that subsequent calls to [`sample`] draw from.
    ///
    /// Fails if the weights sum past the capacity of the weight type.
    ///
    /// [`sample`]: WeightedWithoutReplacement::sample
    fn initialize(&mut self, weights: &[Weight]) -> Result<(), Error>;

    /// Reset the generator to a known state.
    ///
    /// Sampling consumes the generator's stream, so a draw that must be
    /// reproducible has to be preceded by its own call to `seed`.
    fn seed(&mut self, seed: i64);

    /// Draw `count` distinct indices into the initialized weight array.
    ///
    /// Entries with zero weight are never selected. Fails if `count`
    /// exceeds the number of entries with non-zero weight.
    fn sample(&mut self, count: usize) -> Result<Vec<usize>, Error>;
}

/// The default [`WeightedWithoutReplacement`] implementation, backed by a
/// seeded pseudo-random generator.
#[derive(Clone, Debug)]
pub struct Deterministic {
    weights: Vec<Weight>,
    rng: StdRng,
}

impl Deterministic {
    pub fn new() -> Self {
        Self {
            weights: Vec::new(),
            rng: StdRng::seed_from_u64(0),
        }
    }
}

impl Default for Deterministic {
    fn default() -> Self {
        Self::new()
    }
}

impl WeightedWithoutReplacement for Deterministic {
    fn initialize(&mut self, weights: &[Weight]) -> Result<(), Error> {
        let mut total: Weight = 0;
        for &weight in weights {
            total = total.checked_add(weight).ok_or(Error::WeightOverflow)?;
        }

        self.weights = weights.to_vec();

        Ok(())
    }

    fn seed(&mut self, seed: i64) {
        self.rng = StdRng::seed_from_u64(seed as u64);
    }

    fn sample(&mut self, count: usize) -> Result<Vec<usize>, Error> {
        let mut remaining: Vec<(usize, Weight)> = self
            .weights
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, weight)| *weight > 0)
            .collect();

        if count > remaining.len() {
            return Err(Error::NotEnoughEntries {
                requested: count,
                available: remaining.len(),
            });
        }

        // Cannot overflow, the full array was checked at initialization.
        let mut total: Weight = remaining.iter().map(|(_, weight)| weight).sum();

        let mut indices = Vec::with_capacity(count);

        for _ in 0..count {
            let drawn = self.rng.gen_range(0..total);

            let mut cumulative: Weight = 0;
            let mut position = remaining.len() - 1;
            for (pos, (_, weight)) in remaining.iter().enumerate() {
                cumulative += weight;
                if drawn < cumulative {
                    position = pos;
                    break;
                }
            }

            let (index, weight) = remaining.remove(position);
            indices.push(index);
            total -= weight;
        }

        Ok(indices)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn sample_with_seed(weights: &[Weight], seed: i64, count: usize) -> Vec<usize> {
        let mut sampler = Deterministic::new();
        sampler.initialize(weights).unwrap();
        sampler.seed(seed);
        sampler.sample(count).unwrap()
    }

    #[test]
    fn identical_inputs_identical_outputs() {
        let weights = [10, 20, 5, 1, 64];

        for seed in [0, 1, -1, 42, i64::MAX, i64::MIN] {
            let a = sample_with_seed(&weights, seed, weights.len());
            let b = sample_with_seed(&weights, seed, weights.len());
            assert_eq!(a, b);
        }
    }

    #[test]
    fn reseeding_resets_the_stream() {
        let mut sampler = Deterministic::new();
        sampler.initialize(&[3, 7, 11]).unwrap();

        sampler.seed(99);
        let first = sampler.sample(3).unwrap();

        sampler.seed(99);
        let second = sampler.sample(3).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn indices_are_distinct_and_in_range() {
        let weights = [1, 2, 3, 4, 5, 6, 7, 8];
        let indices = sample_with_seed(&weights, 7, weights.len());

        let mut seen = indices.clone();
        seen.sort_unstable();
        seen.dedup();

        assert_eq!(seen.len(), indices.len());
        assert!(indices.iter().all(|&index| index < weights.len()));
    }

    #[test]
    fn zero_weight_entries_are_never_selected() {
        let weights = [0, 5, 0, 7, 0];

        for seed in 0..16 {
            let indices = sample_with_seed(&weights, seed, 2);
            assert!(indices.iter().all(|&index| weights[index] > 0));
        }
    }

    #[test]
    fn sampling_all_entries_is_a_permutation() {
        let weights = [4, 0, 9, 2];
        let mut indices = sample_with_seed(&weights, 13, 3);
        indices.sort_unstable();

        assert_eq!(indices, vec![0, 2, 3]);
    }

    #[test]
    fn sampling_nothing_yields_nothing() {
        let mut sampler = Deterministic::new();
        sampler.initialize(&[1, 2, 3]).unwrap();
        sampler.seed(0);

        assert_eq!(sampler.sample(0).unwrap(), Vec::<usize>::new());
    }

    #[test]
    fn oversampling_is_rejected() {
        let mut sampler = Deterministic::new();
        sampler.initialize(&[0, 1, 1]).unwrap();
        sampler.seed(0);

        assert_eq!(
            sampler.sample(3),
            Err(Error::NotEnoughEntries {
                requested: 3,
                available: 2,
            })
        );
    }

    #[test]
    fn initialize_rejects_overflowing_weights() {
        let mut sampler = Deterministic::new();

        assert_eq!(
            sampler.initialize(&[Weight::MAX, 1]),
            Err(Error::WeightOverflow)
        );
    }
}
