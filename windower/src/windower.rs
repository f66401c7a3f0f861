use std::sync::Arc;
use std::time::Duration;

use cinnabar_common::{Id, NodeId, Weight};
use cinnabar_sampler::{Deterministic, WeightedWithoutReplacement};
use cinnabar_validators::Manager;

/// Number of proposer slots drawn for each height.
pub const MAX_WINDOWS: u64 = 6;

/// Length of each proposer slot.
pub const WINDOW_DURATION: Duration = Duration::from_secs(5);

/// The delay assigned to nodes outside the drawn proposer list.
pub const MAX_DELAY: Duration = Duration::from_secs(MAX_WINDOWS * WINDOW_DURATION.as_secs());

/// The type of errors that can be yielded when computing a proposal delay.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The validator set for the parent block could not be resolved.
    #[error("could not get validators (block: {block_id}): {source}")]
    Lookup {
        /// The block whose validator set was requested.
        block_id: Id,
        /// The underlying lookup failure.
        source: cinnabar_validators::Error,
    },

    /// The aggregate validator weight overflowed. The set contents are
    /// corrupt; the computation cannot proceed.
    #[error("validator weights overflow u64")]
    WeightOverflow,

    /// The sampler rejected its inputs.
    #[error(transparent)]
    Sampler(#[from] cinnabar_sampler::Error),
}

/// Computes the delay a node must wait before submitting a block proposal
/// for a given height.
pub trait Windower: Send + Sync {
    /// The delay before a proposal by `validator_id` for the block at
    /// `chain_height`, on top of `parent_id`, becomes acceptable.
    fn delay(
        &self,
        chain_height: u64,
        validator_id: NodeId,
        parent_id: Id,
    ) -> Result<Duration, Error>;
}

/// The canonical [`Windower`] implementation.
///
/// Holds no mutable state: every [`delay`](Windower::delay) call is a pure
/// function of its inputs and of the validator-set snapshot it reads, so
/// concurrent calls against the same manager are safe and independent.
pub struct ProposerWindower {
    validators: Arc<dyn Manager>,
    subnet_id: Id,
    chain_source: u64,
}

impl ProposerWindower {
    /// Create a windower for the chain with the given identifier.
    ///
    /// The chain identifier's 8-byte prefix seeds every draw alongside the
    /// height, so chains sharing a validator set still get uncorrelated
    /// proposer schedules.
    pub fn new(validators: Arc<dyn Manager>, subnet_id: Id, chain_id: Id) -> Self {
        Self {
            validators,
            subnet_id,
            chain_source: chain_id.prefix_u64(),
        }
    }

    /// The subnet this windower schedules proposals for.
    pub fn subnet_id(&self) -> Id {
        self.subnet_id
    }

    /// The per-chain seed component derived from the chain identifier.
    pub fn chain_source(&self) -> u64 {
        self.chain_source
    }
}

impl Windower for ProposerWindower {
    fn delay(
        &self,
        chain_height: u64,
        validator_id: NodeId,
        parent_id: Id,
    ) -> Result<Duration, Error> {
        // Non-validating nodes always wait out the full fallback period.
        if validator_id == NodeId::EMPTY {
            return Ok(MAX_DELAY);
        }

        let validator_set = self
            .validators
            .get_validators_by_block(parent_id)
            .map_err(|source| Error::Lookup {
                block_id: parent_id,
                source,
            })?;

        // Canonical order, ascending by node id. This is the index space
        // the sampler draws from.
        let validators = validator_set.validators();

        let mut total_weight: Weight = 0;
        for validator in &validators {
            total_weight = total_weight
                .checked_add(validator.weight)
                .ok_or(Error::WeightOverflow)?;
        }

        let weights: Vec<Weight> = validators.iter().map(|v| v.weight).collect();

        let mut sampler = Deterministic::new();
        sampler.initialize(&weights)?;

        let seed = chain_height ^ self.chain_source;
        sampler.seed(seed as i64);

        // Sampling more slots than there are units of weight is meaningless
        // without replacement, and the sampler cannot yield more distinct
        // indices than there are selectable entries.
        let selectable = weights.iter().filter(|&&weight| weight > 0).count();
        let num_to_sample = usize::min(MAX_WINDOWS.min(total_weight) as usize, selectable);

        let indices = sampler.sample(num_to_sample)?;

        let mut delay = Duration::ZERO;
        for index in indices {
            if validators[index].node_id == validator_id {
                return Ok(delay);
            }
            delay += WINDOW_DURATION;
        }

        Ok(delay)
    }
}
