// registry-types/src/address.rs

use crate::{TypesError, TypesResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Address size in bytes
pub const ADDRESS_SIZE: usize = 20;

/// A 20-byte account address.
///
/// Identifies external callers as well as the registry's internal accounts
/// (vault, treasury). Serializes as a `0x`-prefixed hex string so addresses
/// can key JSON maps in snapshots and the audit log.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address([u8; ADDRESS_SIZE]);

impl Address {
    /// Create an address from raw bytes
    pub fn new(bytes: [u8; ADDRESS_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_SIZE] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    pub fn from_hex(s: &str) -> TypesResult<Self> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| TypesError::InvalidAddress(e.to_string()))?;
        if bytes.len() != ADDRESS_SIZE {
            return Err(TypesError::InvalidAddress("Invalid address length".into()));
        }
        let mut arr = [0u8; ADDRESS_SIZE];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    pub fn zero() -> Self {
        Self([0u8; ADDRESS_SIZE])
    }
}

impl FromStr for Address {
    type Err = TypesError;

    fn from_str(s: &str) -> TypesResult<Self> {
        Self::from_hex(s)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_roundtrip() {
        let mut bytes = [0u8; ADDRESS_SIZE];
        bytes[0] = 0xab;
        bytes[19] = 0x01;
        let address = Address::new(bytes);

        let hex = address.to_hex();
        assert!(hex.starts_with("0x"));
        assert_eq!(Address::from_hex(&hex).unwrap(), address);
    }

    #[test]
    fn test_from_hex_without_prefix() {
        let address = Address::from_hex("00000000000000000000000000000000000000ff").unwrap();
        assert_eq!(address.as_bytes()[19], 0xff);
    }

    #[test]
    fn test_invalid_length() {
        assert!(Address::from_hex("0xdeadbeef").is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let address = Address::zero();
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, "\"0x0000000000000000000000000000000000000000\"");

        let parsed: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, address);
    }
}
