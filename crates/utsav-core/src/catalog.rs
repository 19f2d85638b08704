//! Catalog types: the typed collections a cart line can point at.
//!
//! Shop items and the four admin-maintained provider kinds all live in one
//! logical catalog, partitioned by [`ItemType`]. Each record carries a name
//! and an optional price-like figure; everything else is kept as a JSON
//! attribute map.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, id::ItemId};

// ─── ItemType ────────────────────────────────────────────────────────────────

/// Discriminates the typed collections of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemType {
  Shop,
  Decorators,
  Halls,
  Priests,
  Caterers,
}

impl ItemType {
  pub const ALL: [ItemType; 5] = [
    Self::Shop,
    Self::Decorators,
    Self::Halls,
    Self::Priests,
    Self::Caterers,
  ];

  /// Name of the backing collection, as clients send it in `itemType`.
  pub fn collection_name(self) -> &'static str {
    match self {
      Self::Shop => "Shop",
      Self::Decorators => "Decorators",
      Self::Halls => "Halls",
      Self::Priests => "Priests",
      Self::Caterers => "Caterers",
    }
  }

  /// Lowercase tag used in URLs (`/admin/halls`).
  pub fn tag(self) -> &'static str {
    match self {
      Self::Shop => "shop",
      Self::Decorators => "decorators",
      Self::Halls => "halls",
      Self::Priests => "priests",
      Self::Caterers => "caterers",
    }
  }
}

impl fmt::Display for ItemType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.collection_name())
  }
}

impl FromStr for ItemType {
  type Err = Error;

  /// Accepts either the collection name or the tag, ignoring case.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let s = s.trim();
    Self::ALL
      .into_iter()
      .find(|t| {
        t.collection_name().eq_ignore_ascii_case(s) || t.tag().eq_ignore_ascii_case(s)
      })
      .ok_or_else(|| Error::invalid(format!("unknown item type: {s:?}")))
  }
}

impl Serialize for ItemType {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(self.collection_name())
  }
}

impl<'de> Deserialize<'de> for ItemType {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let s = String::deserialize(deserializer)?;
    s.parse().map_err(serde::de::Error::custom)
  }
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// A persisted catalog record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItem {
  pub item_id:    ItemId,
  pub item_type:  ItemType,
  pub name:       String,
  /// The type's price-like field (`price`, `avg_pricing` or `pricing`).
  pub price:      Option<f64>,
  /// Every other normalized field.
  pub attributes: serde_json::Map<String, serde_json::Value>,
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::store::MarketStore::insert_catalog_item`] and
/// [`crate::store::MarketStore::replace_catalog_item`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewCatalogItem {
  pub item_type:  ItemType,
  pub name:       String,
  pub price:      Option<f64>,
  pub attributes: serde_json::Map<String, serde_json::Value>,
}

impl NewCatalogItem {
  /// A shop item with only a name and a price.
  pub fn shop(name: impl Into<String>, price: f64) -> Self {
    Self {
      item_type:  ItemType::Shop,
      name:       name.into(),
      price:      Some(price),
      attributes: serde_json::Map::new(),
    }
  }

  pub fn with_attribute(
    mut self,
    key: impl Into<String>,
    value: impl Into<serde_json::Value>,
  ) -> Self {
    self.attributes.insert(key.into(), value.into());
    self
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_collection_names_and_tags() {
    assert_eq!("Halls".parse::<ItemType>().unwrap(), ItemType::Halls);
    assert_eq!("halls".parse::<ItemType>().unwrap(), ItemType::Halls);
    assert_eq!("SHOP".parse::<ItemType>().unwrap(), ItemType::Shop);
    assert!("Venues".parse::<ItemType>().is_err());
  }

  #[test]
  fn serializes_as_collection_name() {
    let json = serde_json::to_string(&ItemType::Caterers).unwrap();
    assert_eq!(json, "\"Caterers\"");
  }
}
