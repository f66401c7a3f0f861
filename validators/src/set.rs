use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use cinnabar_common::{NodeId, Weight};

use crate::{Error, Validator};

/// The validators of a single chain, keyed by node identifier.
///
/// Enumeration order is ascending by identifier bytes. This order is the
/// index space the proposer sampler operates on and must be identical on
/// every node for a given set contents; sorting by weight would not be
/// canonical.
///
/// Masking hides a validator from enumeration and from the aggregate
/// weight without discarding its weight record, so a later reveal restores
/// the exact prior weight without the update source having to resend it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorSet {
    active: BTreeMap<NodeId, Weight>,
    masked: BTreeMap<NodeId, Weight>,
    pending_mask: BTreeSet<NodeId>,
    total_weight: Weight,
}

impl ValidatorSet {
    /// Create a new, empty validator set.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of unmasked validators in the set.
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Whether the set holds no unmasked validators.
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// The aggregate weight of all unmasked validators.
    pub fn total_weight(&self) -> Weight {
        self.total_weight
    }

    /// Whether a validator with the given identifier is in the set and not
    /// masked.
    pub fn contains(&self, node_id: NodeId) -> bool {
        self.active.contains_key(&node_id)
    }

    /// The weight held by the given unmasked validator.
    pub fn weight(&self, node_id: NodeId) -> Option<Weight> {
        self.active.get(&node_id).copied()
    }

    /// Add weight to a validator, inserting it if absent.
    ///
    /// Weight added to a masked validator accrues to its hidden record and
    /// does not count towards the aggregate until it is revealed.
    pub fn add_weight(&mut self, node_id: NodeId, weight: Weight) -> Result<(), Error> {
        if let Some(hidden) = self.masked.get_mut(&node_id) {
            *hidden = hidden.checked_add(weight).ok_or(Error::WeightOverflow)?;
            return Ok(());
        }

        if self.pending_mask.remove(&node_id) {
            self.masked.insert(node_id, weight);
            return Ok(());
        }

        let total = self
            .total_weight
            .checked_add(weight)
            .ok_or(Error::WeightOverflow)?;

        *self.active.entry(node_id).or_insert(0) += weight;
        self.total_weight = total;

        Ok(())
    }

    /// Remove weight from a validator, dropping its record when the weight
    /// reaches zero.
    pub fn remove_weight(&mut self, node_id: NodeId, weight: Weight) -> Result<(), Error> {
        if let Some(hidden) = self.masked.get_mut(&node_id) {
            let remaining = hidden
                .checked_sub(weight)
                .ok_or(Error::InsufficientWeight {
                    id: node_id,
                    requested: weight,
                    actual: *hidden,
                })?;

            if remaining == 0 {
                self.masked.remove(&node_id);
            } else {
                *hidden = remaining;
            }

            return Ok(());
        }

        let Some(held) = self.active.get_mut(&node_id) else {
            return Err(Error::UnknownValidator { id: node_id });
        };

        let remaining = held.checked_sub(weight).ok_or(Error::InsufficientWeight {
            id: node_id,
            requested: weight,
            actual: *held,
        })?;

        self.total_weight -= weight;

        if remaining == 0 {
            self.active.remove(&node_id);
        } else {
            *held = remaining;
        }

        Ok(())
    }

    /// Replace the entire membership of the set.
    ///
    /// Masking intent carries over: incoming validators that are currently
    /// masked stay masked with their new weight. On error the set is left
    /// unchanged.
    pub fn set(&mut self, validators: impl IntoIterator<Item = Validator>) -> Result<(), Error> {
        let mut intent: BTreeSet<NodeId> = self.masked.keys().copied().collect();
        intent.extend(self.pending_mask.iter().copied());

        let mut active = BTreeMap::new();
        let mut masked = BTreeMap::new();
        let mut total: Weight = 0;

        for validator in validators {
            if intent.contains(&validator.node_id) {
                masked.insert(validator.node_id, validator.weight);
                continue;
            }

            if let Some(previous) = active.insert(validator.node_id, validator.weight) {
                total -= previous;
            }

            total = total
                .checked_add(validator.weight)
                .ok_or(Error::WeightOverflow)?;
        }

        for node_id in masked.keys() {
            intent.remove(node_id);
        }

        self.active = active;
        self.masked = masked;
        self.pending_mask = intent;
        self.total_weight = total;

        Ok(())
    }

    /// Hide the named validator from enumeration and from the aggregate
    /// weight. Masking an already-masked validator has no further effect;
    /// masking an identifier not yet in the set takes effect when it joins.
    pub fn mask(&mut self, node_id: NodeId) {
        if let Some(weight) = self.active.remove(&node_id) {
            self.total_weight -= weight;
            self.masked.insert(node_id, weight);
        } else if !self.masked.contains_key(&node_id) {
            self.pending_mask.insert(node_id);
        }
    }

    /// Restore the named validator's enumeration and weight. Revealing a
    /// validator that is not masked has no effect.
    pub fn reveal(&mut self, node_id: NodeId) -> Result<(), Error> {
        self.pending_mask.remove(&node_id);

        let Some(weight) = self.masked.get(&node_id).copied() else {
            return Ok(());
        };

        let total = self
            .total_weight
            .checked_add(weight)
            .ok_or(Error::WeightOverflow)?;

        self.masked.remove(&node_id);
        self.active.insert(node_id, weight);
        self.total_weight = total;

        Ok(())
    }

    /// Iterate over the unmasked validators in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = Validator> + '_ {
        self.active
            .iter()
            .map(|(&node_id, &weight)| Validator::new(node_id, weight))
    }

    /// The unmasked validators in canonical order.
    pub fn validators(&self) -> Vec<Validator> {
        self.iter().collect()
    }
}

/// Build a set from raw entries, later entries overriding earlier ones.
///
/// The cached aggregate saturates if the weights are not representable in
/// the weight type; consumers performing checked summation will reject
/// such a set.
impl FromIterator<Validator> for ValidatorSet {
    fn from_iter<I: IntoIterator<Item = Validator>>(validators: I) -> Self {
        let mut active = BTreeMap::new();
        for validator in validators {
            active.insert(validator.node_id, validator.weight);
        }

        let total_weight = active
            .values()
            .fold(0_u64, |total, &weight| total.saturating_add(weight));

        Self {
            active,
            masked: BTreeMap::new(),
            pending_mask: BTreeSet::new(),
            total_weight,
        }
    }
}

impl fmt::Display for ValidatorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Validator Set: (Size = {}, Weight = {})",
            self.len(),
            self.total_weight
        )?;

        for (index, validator) in self.iter().enumerate() {
            write!(
                f,
                "\n    Validator[{index}]: {}, {}",
                validator.node_id, validator.weight
            )?;
        }

        Ok(())
    }
}
