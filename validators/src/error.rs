use cinnabar_common::{NodeId, Weight};

/// The type of errors that can be yielded by the validator set and manager.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The validator set holds no validators.
    #[error("validator set is empty")]
    NoValidators,

    /// The aggregate weight of the set would overflow.
    #[error("aggregate weight overflows u64")]
    WeightOverflow,

    /// Asked to remove more weight than a validator holds.
    #[error("validator {id} holds weight {actual}, cannot remove {requested}")]
    InsufficientWeight {
        /// The validator whose weight was to be removed.
        id: NodeId,
        /// The weight requested for removal.
        requested: Weight,
        /// The weight the validator actually holds.
        actual: Weight,
    },

    /// The named validator is not in the set.
    #[error("validator {id} is not in the set")]
    UnknownValidator {
        /// The missing validator.
        id: NodeId,
    },
}
