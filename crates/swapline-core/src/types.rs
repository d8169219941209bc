//! Core type definitions for Swapline

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::errors::Error;

/// Address length in bytes
pub const ADDRESS_LEN: usize = 20;

/// Account, token or pool address (20 bytes).
///
/// Equality and ordering are defined on the raw bytes, so any textual
/// spelling (mixed case, with or without `0x`) of the same address compares
/// equal once parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// The all-zero address
    pub const ZERO: Self = Self([0u8; ADDRESS_LEN]);

    /// Address with every byte set to `byte` (handy for fixtures)
    pub const fn repeat_byte(byte: u8) -> Self {
        Self([byte; ADDRESS_LEN])
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ADDRESS_LEN]
    }

    /// Short form for logs, e.g. `0x1234…abcd`
    pub fn short(&self) -> String {
        let full = self.to_string();
        format!("{}…{}", &full[..6], &full[full.len() - 4..])
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if digits.len() != ADDRESS_LEN * 2 {
            return Err(Error::InvalidAddress {
                address: s.to_string(),
                reason: format!("expected {} hex digits, got {}", ADDRESS_LEN * 2, digits.len()),
            });
        }

        let mut bytes = [0u8; ADDRESS_LEN];
        hex::decode_to_slice(digits, &mut bytes).map_err(|e| Error::InvalidAddress {
            address: s.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Pools are identified by their contract address
pub type PoolId = Address;

/// Raw token amount in the token's smallest unit
pub type Amount = u128;

/// Serde helper: `Amount` as a decimal string.
///
/// Numbers are still accepted on input when they fit in a `u64`.
pub mod amount_str {
    use super::Amount;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAmount {
        Text(String),
        Number(u64),
    }

    fn parse<E: serde::de::Error>(raw: RawAmount) -> Result<Amount, E> {
        match raw {
            RawAmount::Text(s) => s
                .trim()
                .parse::<Amount>()
                .map_err(|e| E::custom(format!("invalid amount '{}': {}", s, e))),
            RawAmount::Number(n) => Ok(Amount::from(n)),
        }
    }

    pub fn serialize<S: Serializer>(value: &Amount, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Amount, D::Error> {
        parse(RawAmount::deserialize(deserializer)?)
    }

    /// Same encoding for `Option<Amount>`
    pub mod option {
        use super::{parse, Amount, RawAmount};
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<Amount>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(v) => serializer.collect_str(v),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Amount>, D::Error> {
            Option::<RawAmount>::deserialize(deserializer)?
                .map(parse)
                .transpose()
        }
    }
}

/// Constants
pub mod constants {
    /// Basis points in 100%
    pub const BPS_DENOMINATOR: u32 = 10_000;

    /// Default hop bound for route search
    pub const DEFAULT_MAX_HOPS: usize = 3;

    /// Largest accepted hop bound; path count grows exponentially with it
    pub const MAX_HOPS_LIMIT: usize = 6;

    /// Default slippage tolerance (0.5%)
    pub const DEFAULT_TOLERANCE_BPS: u32 = 50;
}
