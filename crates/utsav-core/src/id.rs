//! Opaque catalog identifiers.
//!
//! An [`ItemId`] is twelve random bytes, always rendered as 24 lowercase hex
//! characters. It is assigned once when a catalog record is created and never
//! changes afterwards.

use std::{fmt, str::FromStr};

use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId([u8; 12]);

impl ItemId {
  /// Draw a fresh identifier from the OS RNG.
  pub fn generate() -> Self {
    let mut bytes = [0u8; 12];
    OsRng.fill_bytes(&mut bytes);
    Self(bytes)
  }

  pub fn from_bytes(bytes: [u8; 12]) -> Self { Self(bytes) }
}

impl fmt::Display for ItemId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&hex::encode(self.0))
  }
}

impl FromStr for ItemId {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let s = s.trim();
    if s.len() != 24 {
      return Err(Error::invalid(format!("item id must be 24 hex characters: {s:?}")));
    }
    let mut bytes = [0u8; 12];
    hex::decode_to_slice(s, &mut bytes)
      .map_err(|_| Error::invalid(format!("item id is not hex: {s:?}")))?;
    Ok(Self(bytes))
  }
}

impl Serialize for ItemId {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

impl<'de> Deserialize<'de> for ItemId {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let s = String::deserialize(deserializer)?;
    s.parse().map_err(serde::de::Error::custom)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn display_is_24_lowercase_hex() {
    let id = ItemId::from_bytes([0xab; 12]);
    let s = id.to_string();
    assert_eq!(s.len(), 24);
    assert_eq!(s, "abababababababababababab");
  }

  #[test]
  fn parse_accepts_mixed_case() {
    let id: ItemId = "65F0C0FFEE00112233445566".parse().unwrap();
    assert_eq!(id.to_string(), "65f0c0ffee00112233445566");
  }

  #[test]
  fn parse_rejects_wrong_length_and_non_hex() {
    assert!(matches!("abc".parse::<ItemId>(), Err(Error::InvalidInput(_))));
    assert!(matches!(
      "zzzzzzzzzzzzzzzzzzzzzzzz".parse::<ItemId>(),
      Err(Error::InvalidInput(_))
    ));
  }

  #[test]
  fn generated_ids_differ() {
    assert_ne!(ItemId::generate(), ItemId::generate());
  }

  #[test]
  fn serde_uses_hex_string() {
    let id = ItemId::from_bytes([1; 12]);
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, "\"010101010101010101010101\"");
    let back: ItemId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, id);
  }
}
