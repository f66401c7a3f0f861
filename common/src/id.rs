use core::fmt;

use serde::{Deserialize, Serialize};

/// A 32-byte identifier for a block, chain, or subnet.
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(
    #[serde(
        serialize_with = "hex::serde::serialize_upper",
        deserialize_with = "hex::serde::deserialize"
    )]
    [u8; Self::LENGTH],
);

impl Id {
    /// The length of an identifier, in bytes.
    pub const LENGTH: usize = 32;

    /// The all-zeroes identifier.
    pub const EMPTY: Self = Self([0; Self::LENGTH]);

    pub const fn new(value: [u8; Self::LENGTH]) -> Self {
        Self(value)
    }

    pub const fn as_bytes(&self) -> &[u8; Self::LENGTH] {
        &self.0
    }

    pub fn into_inner(self) -> [u8; Self::LENGTH] {
        self.0
    }

    /// The first 8 bytes of the identifier, read as a big-endian `u64`.
    ///
    /// Used to derive a per-chain constant that decorrelates proposer
    /// schedules across chains which share a validator set.
    pub fn prefix_u64(&self) -> u64 {
        let mut bytes = [0; 8];
        bytes.copy_from_slice(&self.0[..8]);
        u64::from_be_bytes(bytes)
    }
}

impl From<[u8; Id::LENGTH]> for Id {
    fn from(value: [u8; Id::LENGTH]) -> Self {
        Self(value)
    }
}

impl TryFrom<&[u8]> for Id {
    type Error = core::array::TryFromSliceError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Ok(Self(bytes.try_into()?))
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0.iter() {
            write!(f, "{byte:02X}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({self})")
    }
}
