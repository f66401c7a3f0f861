//! Validator membership, masking, and stake accounting for a single chain.

#![forbid(unsafe_code)]
#![deny(trivial_casts, trivial_numeric_casts)]
#![warn(
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links,
    variant_size_differences
)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::panic))]

mod error;
mod genesis;
mod manager;
mod set;
mod source;
mod validator;

pub use error::Error;
pub use genesis::{Genesis, NetworkId};
pub use manager::{Manager, ValidatorManager};
pub use set::ValidatorSet;
pub use source::Source;
pub use validator::Validator;
