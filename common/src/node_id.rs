use core::fmt;

use serde::{Deserialize, Serialize};

/// A 20-byte identifier for a node participating in consensus.
///
/// Node identifiers order by their byte content. This ordering is the
/// canonical enumeration order of a validator set and must be identical
/// on every node of the network.
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(
    #[serde(
        serialize_with = "hex::serde::serialize_upper",
        deserialize_with = "hex::serde::deserialize"
    )]
    [u8; Self::LENGTH],
);

impl NodeId {
    /// The length of a node identifier, in bytes.
    pub const LENGTH: usize = 20;

    /// The all-zeroes identifier, denoting a non-validating node.
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
}

impl From<[u8; NodeId::LENGTH]> for NodeId {
    fn from(value: [u8; NodeId::LENGTH]) -> Self {
        Self(value)
    }
}

impl TryFrom<&[u8]> for NodeId {
    type Error = core::array::TryFromSliceError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Ok(Self(bytes.try_into()?))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0.iter() {
            write!(f, "{byte:02X}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_by_bytes() {
        let a = NodeId::new([1; NodeId::LENGTH]);
        let b = NodeId::new([2; NodeId::LENGTH]);

        assert!(a < b);
        assert!(NodeId::EMPTY < a);
    }

    #[test]
    fn try_from_rejects_wrong_length() {
        assert!(NodeId::try_from([0_u8; 19].as_slice()).is_err());
        assert!(NodeId::try_from([0_u8; 21].as_slice()).is_err());
        assert!(NodeId::try_from([7_u8; 20].as_slice()).is_ok());
    }

    #[test]
    fn display_is_upper_hex() {
        let id = NodeId::new([0xAB; NodeId::LENGTH]);
        assert_eq!(id.to_string(), "AB".repeat(NodeId::LENGTH));
    }
}
