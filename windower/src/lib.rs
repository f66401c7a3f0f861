//! Proposer window scheduling for the Cinnabar validator node.
//!
//! For every block height the windower derives a deterministic,
//! stake-weighted ordering of the validators eligible to propose the next
//! block, and from it the delay each node must wait before its proposal
//! becomes acceptable. Every honest node computes the identical schedule,
//! so higher-stake validators get statistically earlier turns while the
//! network retains a deterministic fallback order when the primary
//! proposer is offline.

#![forbid(unsafe_code)]
#![deny(trivial_casts, trivial_numeric_casts)]
#![warn(
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links,
    variant_size_differences
)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::panic))]

mod windower;

pub use windower::{Error, ProposerWindower, Windower, MAX_DELAY, MAX_WINDOWS, WINDOW_DURATION};
