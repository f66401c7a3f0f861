//! Common identifier types for the Cinnabar validator node.

#![forbid(unsafe_code)]
#![deny(trivial_casts, trivial_numeric_casts)]
#![warn(
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links,
    variant_size_differences
)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::panic))]

mod id;
mod node_id;

pub use id::Id;
pub use node_id::NodeId;

/// Stake weight held by a validator.
pub type Weight = u64;
