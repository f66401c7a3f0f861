use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use cinnabar_common::{Id, NodeId, Weight};

use crate::{Error, NetworkId, Source, Validator, ValidatorSet};

/// Holds the validator set of a single chain and serializes all access to
/// it.
///
/// Every operation is atomic with respect to every other operation on the
/// same manager: callers always observe a fully-applied mutation or none
/// at all.
pub trait Manager: Send + Sync {
    /// Replace the source of validator updates for this manager.
    fn set_source(&self, source: Arc<dyn Source>);

    /// Returns a snapshot of the latest validator set.
    ///
    /// Fails with [`Error::NoValidators`] while the set is empty, for
    /// example before the source has delivered any membership data.
    fn get_validators(&self) -> Result<ValidatorSet, Error>;

    /// Returns a snapshot of the validator set as of the given block.
    ///
    /// Historical snapshots are not tracked: the live set is returned for
    /// any block identifier. This is accurate only while membership and
    /// weights are static, or while callers query with the current chain
    /// tip.
    fn get_validators_by_block(&self, block_id: Id) -> Result<ValidatorSet, Error>;

    /// Hide the named validator from future samplings.
    fn mask_validator(&self, node_id: NodeId) -> Result<(), Error>;

    /// Ensure the named validator is not hidden from future samplings.
    fn reveal_validator(&self, node_id: NodeId) -> Result<(), Error>;

    /// Whether a validator with the given identifier is currently in the
    /// set and not masked.
    fn contains(&self, node_id: NodeId) -> bool;
}

struct Inner {
    validators: ValidatorSet,
    source: Option<Arc<dyn Source>>,
}

/// The canonical [`Manager`] implementation: one validator set, one update
/// source, one lock.
pub struct ValidatorManager {
    network: NetworkId,
    inner: Mutex<Inner>,
}

impl ValidatorManager {
    /// Create a manager seeded with the genesis validator set of the given
    /// network.
    pub fn new(network: NetworkId) -> Self {
        Self::with_validators(network, [])
    }

    /// Create a manager seeded with the network's genesis validator set
    /// plus the given extra validators.
    pub fn with_validators(
        network: NetworkId,
        extra: impl IntoIterator<Item = Validator>,
    ) -> Self {
        let mut validators = network.genesis().validator_set();
        for validator in extra {
            let _ = validators.add_weight(validator.node_id, validator.weight);
        }

        debug!(
            network = %network,
            validators = validators.len(),
            "loaded genesis validator set"
        );

        Self {
            network,
            inner: Mutex::new(Inner {
                validators,
                source: None,
            }),
        }
    }

    /// The network this manager belongs to.
    pub fn network(&self) -> NetworkId {
        self.network
    }

    /// Add weight to a validator, inserting it if absent. Intended to be
    /// driven by the manager's update source.
    pub fn add_weight(&self, node_id: NodeId, weight: Weight) -> Result<(), Error> {
        let mut inner = self.lock();
        inner.validators.add_weight(node_id, weight)
    }

    /// Remove weight from a validator, dropping it at zero. Intended to be
    /// driven by the manager's update source.
    pub fn remove_weight(&self, node_id: NodeId, weight: Weight) -> Result<(), Error> {
        let mut inner = self.lock();
        inner.validators.remove_weight(node_id, weight)
    }

    /// Replace the entire validator membership. Intended to be driven by
    /// the manager's update source.
    pub fn set_validators(
        &self,
        validators: impl IntoIterator<Item = Validator>,
    ) -> Result<(), Error> {
        let mut inner = self.lock();
        inner.validators.set(validators)?;

        debug!(
            network = %self.network,
            validators = inner.validators.len(),
            "replaced validator membership"
        );

        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Manager for ValidatorManager {
    fn set_source(&self, source: Arc<dyn Source>) {
        let mut inner = self.lock();

        debug!(source = source.name(), "replaced validator update source");
        inner.source = Some(source);
    }

    fn get_validators(&self) -> Result<ValidatorSet, Error> {
        let inner = self.lock();

        if inner.validators.is_empty() {
            return Err(Error::NoValidators);
        }

        Ok(inner.validators.clone())
    }

    fn get_validators_by_block(&self, _block_id: Id) -> Result<ValidatorSet, Error> {
        let inner = self.lock();

        if inner.validators.is_empty() {
            return Err(Error::NoValidators);
        }

        Ok(inner.validators.clone())
    }

    fn mask_validator(&self, node_id: NodeId) -> Result<(), Error> {
        let mut inner = self.lock();

        inner.validators.mask(node_id);
        debug!(validator = %node_id, "masked validator");

        Ok(())
    }

    fn reveal_validator(&self, node_id: NodeId) -> Result<(), Error> {
        let mut inner = self.lock();

        inner.validators.reveal(node_id)?;
        debug!(validator = %node_id, "revealed validator");

        Ok(())
    }

    fn contains(&self, node_id: NodeId) -> bool {
        let inner = self.lock();
        inner.validators.contains(node_id)
    }
}

impl fmt::Display for ValidatorManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock();
        write!(f, "Network[{}]: {}", self.network, inner.validators)
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use pretty_assertions::assert_eq;

    use super::*;

    fn node_id(byte: u8) -> NodeId {
        NodeId::new([byte; NodeId::LENGTH])
    }

    #[test]
    fn empty_manager_has_no_validators() {
        let manager = ValidatorManager::new(NetworkId::Local);

        assert_eq!(manager.get_validators(), Err(Error::NoValidators));
        assert_eq!(
            manager.get_validators_by_block(Id::EMPTY),
            Err(Error::NoValidators)
        );
    }

    #[test]
    fn known_networks_are_pre_seeded() {
        let mainnet = ValidatorManager::new(NetworkId::Mainnet);
        let testnet = ValidatorManager::new(NetworkId::Testnet);

        assert!(!mainnet.get_validators().unwrap().is_empty());
        assert!(!testnet.get_validators().unwrap().is_empty());
    }

    #[test]
    fn extra_validators_join_the_genesis_set() {
        let manager =
            ValidatorManager::with_validators(NetworkId::Local, [Validator::new(node_id(1), 10)]);

        let validators = manager.get_validators().unwrap();
        assert_eq!(validators.weight(node_id(1)), Some(10));
    }

    #[test]
    fn by_block_lookup_returns_the_live_set() {
        let manager =
            ValidatorManager::with_validators(NetworkId::Local, [Validator::new(node_id(1), 10)]);

        let by_height = manager.get_validators_by_block(Id::new([9; Id::LENGTH]));
        assert_eq!(by_height, manager.get_validators());
    }

    #[test]
    fn snapshots_are_detached_from_later_mutations() {
        let manager =
            ValidatorManager::with_validators(NetworkId::Local, [Validator::new(node_id(1), 10)]);

        let snapshot = manager.get_validators().unwrap();
        manager.add_weight(node_id(2), 5).unwrap();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(manager.get_validators().unwrap().len(), 2);
    }

    #[test]
    fn masked_validators_are_not_contained() {
        let manager =
            ValidatorManager::with_validators(NetworkId::Local, [Validator::new(node_id(1), 10)]);

        assert!(manager.contains(node_id(1)));

        manager.mask_validator(node_id(1)).unwrap();
        assert!(!manager.contains(node_id(1)));

        manager.reveal_validator(node_id(1)).unwrap();
        assert!(manager.contains(node_id(1)));
    }

    #[test]
    fn masking_the_whole_set_reads_as_empty() {
        let manager =
            ValidatorManager::with_validators(NetworkId::Local, [Validator::new(node_id(1), 10)]);

        manager.mask_validator(node_id(1)).unwrap();
        assert_eq!(manager.get_validators(), Err(Error::NoValidators));
    }

    #[test]
    fn source_can_be_replaced() {
        struct Chain;

        impl Source for Chain {
            fn name(&self) -> &'static str {
                "chain"
            }
        }

        let manager = ValidatorManager::new(NetworkId::Local);
        manager.set_source(Arc::new(Chain));
        manager.set_source(Arc::new(Chain));
    }

    #[test]
    fn concurrent_mask_reveal_preserves_the_weight_invariant() {
        let manager = Arc::new(ValidatorManager::with_validators(
            NetworkId::Local,
            (1..=8).map(|byte| Validator::new(node_id(byte), byte as Weight * 10)),
        ));

        let handles: Vec<_> = (1..=8)
            .map(|byte| {
                let manager = Arc::clone(&manager);
                thread::spawn(move || {
                    for _ in 0..100 {
                        manager.mask_validator(node_id(byte)).unwrap();
                        manager.reveal_validator(node_id(byte)).unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let validators = manager.get_validators().unwrap();
        let enumerated: Weight = validators.iter().map(|v| v.weight).sum();
        assert_eq!(validators.total_weight(), enumerated);
        assert_eq!(validators.total_weight(), (1..=8).map(|w| w * 10).sum::<Weight>());
    }
}
