use std::fmt;

use serde::{Deserialize, Serialize};

use cinnabar_common::NodeId;

use crate::{Validator, ValidatorSet};

/// The networks a node can join.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetworkId {
    Mainnet,
    Testnet,
    /// A standalone network with no built-in validators, for development
    /// and testing. Membership is expected to arrive from the update
    /// source or from explicit pre-seeding.
    Local,
}

impl NetworkId {
    /// The initial validator membership of this network.
    pub fn genesis(&self) -> Genesis {
        match self {
            NetworkId::Mainnet => Genesis {
                validators: mainnet_validators(),
            },
            NetworkId::Testnet => Genesis {
                validators: testnet_validators(),
            },
            NetworkId::Local => Genesis {
                validators: Vec::new(),
            },
        }
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkId::Mainnet => write!(f, "mainnet"),
            NetworkId::Testnet => write!(f, "testnet"),
            NetworkId::Local => write!(f, "local"),
        }
    }
}

/// The initial validator membership of a network.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genesis {
    pub validators: Vec<Validator>,
}

impl Genesis {
    /// Build the validator set this genesis describes.
    pub fn validator_set(&self) -> ValidatorSet {
        self.validators.iter().copied().collect()
    }
}

fn mainnet_validators() -> Vec<Validator> {
    vec![
        Validator::new(
            NodeId::new([
                0x1c, 0xee, 0x60, 0x02, 0x9d, 0x4f, 0x3a, 0x17, 0x92, 0x85, 0x41, 0xbb, 0xd2,
                0x4b, 0x73, 0x08, 0xfa, 0x10, 0xc2, 0x9e,
            ]),
            2_000_000,
        ),
        Validator::new(
            NodeId::new([
                0x3d, 0x0a, 0xd1, 0x2b, 0x8e, 0xe8, 0x92, 0x8e, 0xdf, 0x24, 0x8c, 0xa9, 0x1c,
                0xa5, 0x56, 0x00, 0xfb, 0x38, 0x3f, 0x07,
            ]),
            2_000_000,
        ),
        Validator::new(
            NodeId::new([
                0x68, 0x58, 0xd0, 0xbb, 0x5c, 0xf9, 0x2e, 0x7b, 0x0f, 0x8f, 0x62, 0xd4, 0x5d,
                0x2c, 0x49, 0xa1, 0x90, 0x4e, 0x41, 0x73,
            ]),
            1_500_000,
        ),
        Validator::new(
            NodeId::new([
                0x92, 0x15, 0x5f, 0x10, 0x7d, 0x49, 0x26, 0x66, 0x8a, 0x7c, 0x18, 0x83, 0x31,
                0xdc, 0xd2, 0xf7, 0x44, 0xb9, 0x6a, 0xd2,
            ]),
            1_500_000,
        ),
        Validator::new(
            NodeId::new([
                0xe9, 0x08, 0x9b, 0x66, 0xf5, 0x32, 0x1a, 0xc4, 0xe0, 0x43, 0xa9, 0xcd, 0x0e,
                0xd5, 0x9e, 0xb2, 0x2b, 0x8f, 0x17, 0x5c,
            ]),
            1_000_000,
        ),
    ]
}

fn testnet_validators() -> Vec<Validator> {
    vec![
        Validator::new(
            NodeId::new([
                0x25, 0xc1, 0x13, 0xf9, 0x4e, 0x82, 0x7a, 0x05, 0x63, 0x29, 0x88, 0x2f, 0x5a,
                0xf3, 0x9c, 0xd1, 0x1e, 0x60, 0x74, 0x4a,
            ]),
            100_000,
        ),
        Validator::new(
            NodeId::new([
                0x7b, 0x34, 0x2a, 0x50, 0xc6, 0x11, 0x9f, 0xe3, 0xb1, 0x7d, 0xce, 0x46, 0x02,
                0x9b, 0x3e, 0x58, 0x8d, 0xa2, 0xf0, 0x61,
            ]),
            100_000,
        ),
        Validator::new(
            NodeId::new([
                0xc4, 0x86, 0xe1, 0x0d, 0x37, 0x55, 0x4c, 0x9a, 0x2e, 0x06, 0x70, 0x1f, 0xbd,
                0x61, 0x27, 0x33, 0x5a, 0x0c, 0x89, 0xee,
            ]),
            50_000,
        ),
    ]
}
