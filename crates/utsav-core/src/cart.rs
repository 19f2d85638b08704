//! Cart lines, cart views, and the cart aggregator.
//!
//! A cart belongs to exactly one user and holds at most one line per
//! `(item_id, item_type)` pair. Lines snapshot the catalog name and price at
//! the moment they are first added; later catalog edits never reach them.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  catalog::{CatalogItem, ItemType},
  id::ItemId,
  store::MarketStore,
};

/// Upper bound on a line's quantity when added through [`CartAggregator::add_item`].
pub const MAX_LINE_QUANTITY: i64 = 10;

/// Largest quantity [`CartAggregator::update_quantity`] accepts. Keeps a
/// cart's summed item count far from `i64` overflow.
pub const MAX_SET_QUANTITY: i64 = i32::MAX as i64;

/// Clamp a requested add quantity into `[1, MAX_LINE_QUANTITY]`.
/// A missing request counts as 1.
pub fn clamp_quantity(requested: Option<i64>) -> i64 {
  requested.unwrap_or(1).clamp(1, MAX_LINE_QUANTITY)
}

// ─── Lines ───────────────────────────────────────────────────────────────────

/// Identity of a cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineKey {
  pub item_id:   ItemId,
  pub item_type: ItemType,
}

/// Name and price copied onto a line when it is created.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineSnapshot {
  pub name:       Option<String>,
  pub unit_price: Option<f64>,
}

impl From<&CatalogItem> for LineSnapshot {
  fn from(item: &CatalogItem) -> Self {
    Self { name: Some(item.name.clone()), unit_price: item.price }
  }
}

/// Input to the store's cart writes.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartLine {
  pub key:      LineKey,
  pub snapshot: LineSnapshot,
  pub quantity: i64,
}

/// A persisted cart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
  pub item_id:    ItemId,
  pub item_type:  ItemType,
  pub name:       Option<String>,
  pub unit_price: Option<f64>,
  pub quantity:   i64,
}

impl CartLine {
  pub fn key(&self) -> LineKey {
    LineKey { item_id: self.item_id, item_type: self.item_type }
  }

  /// `unit_price × quantity`, with a missing price counting as 0.
  pub fn subtotal(&self) -> f64 { self.unit_price.unwrap_or(0.0) * self.quantity as f64 }
}

/// Sum of quantities across lines.
pub fn item_count(lines: &[CartLine]) -> i64 { lines.iter().map(|l| l.quantity).sum() }

// ─── View ────────────────────────────────────────────────────────────────────

/// The computed read model of a cart. Never stored, always derived.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
  pub lines:       Vec<CartLine>,
  pub item_count:  i64,
  pub total_price: f64,
}

impl CartView {
  pub fn from_lines(lines: Vec<CartLine>) -> Self {
    let item_count  = item_count(&lines);
    let total_price = lines.iter().map(CartLine::subtotal).sum();
    Self { lines, item_count, total_price }
  }

  pub fn empty() -> Self { Self::from_lines(Vec::new()) }
}

// ─── Aggregator ──────────────────────────────────────────────────────────────

/// Applies cart mutations for authenticated users on top of a [`MarketStore`].
pub struct CartAggregator<S> {
  store: Arc<S>,
}

impl<S> Clone for CartAggregator<S> {
  fn clone(&self) -> Self { Self { store: Arc::clone(&self.store) } }
}

impl<S: MarketStore> CartAggregator<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// Add `requested` units of a catalog item, merging with any existing line.
  ///
  /// Fails with [`Error::ItemNotFound`] before touching the cart if the item
  /// does not exist. Returns the cart's item count after the write.
  pub async fn add_item(
    &self,
    user_id: Uuid,
    item_type: ItemType,
    item_id: ItemId,
    requested: Option<i64>,
  ) -> Result<i64> {
    let item = self
      .store
      .get_catalog_item(item_type, item_id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::ItemNotFound)?;

    let line = NewCartLine {
      key:      LineKey { item_id, item_type },
      snapshot: LineSnapshot::from(&item),
      quantity: clamp_quantity(requested),
    };

    self
      .store
      .add_cart_line(user_id, line, MAX_LINE_QUANTITY)
      .await
      .map_err(Error::store)
  }

  /// Set a line's quantity as given, appending the line if it is absent.
  ///
  /// The quantity is not capped at [`MAX_LINE_QUANTITY`]; values below 1 or
  /// above [`MAX_SET_QUANTITY`] are rejected. `snapshot` only applies when
  /// a new line is appended. Fails with [`Error::CartNotFound`] if the user
  /// has never added anything.
  pub async fn update_quantity(
    &self,
    user_id: Uuid,
    key: LineKey,
    quantity: i64,
    snapshot: LineSnapshot,
  ) -> Result<i64> {
    if !(1..=MAX_SET_QUANTITY).contains(&quantity) {
      return Err(Error::invalid(format!(
        "quantity must be between 1 and {MAX_SET_QUANTITY}, got {quantity}"
      )));
    }

    self
      .store
      .set_cart_line_quantity(user_id, NewCartLine { key, snapshot, quantity })
      .await
      .map_err(Error::store)?
      .ok_or(Error::CartNotFound)
  }

  /// Remove a line. Absent lines and absent carts are not errors.
  pub async fn remove_item(&self, user_id: Uuid, key: LineKey) -> Result<i64> {
    self.store.remove_cart_line(user_id, key).await.map_err(Error::store)
  }

  /// Lines plus derived totals; an empty view when the user has no cart.
  pub async fn cart_view(&self, user_id: Uuid) -> Result<CartView> {
    let lines = self.store.get_cart(user_id).await.map_err(Error::store)?;
    Ok(lines.map(CartView::from_lines).unwrap_or_else(CartView::empty))
  }

  pub async fn item_count(&self, user_id: Uuid) -> Result<i64> {
    Ok(self.cart_view(user_id).await?.item_count)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn line(price: Option<f64>, quantity: i64) -> CartLine {
    CartLine {
      item_id: ItemId::generate(),
      item_type: ItemType::Shop,
      name: Some("Wedding Cake".into()),
      unit_price: price,
      quantity,
    }
  }

  #[test]
  fn clamp_defaults_and_bounds() {
    assert_eq!(clamp_quantity(None), 1);
    assert_eq!(clamp_quantity(Some(0)), 1);
    assert_eq!(clamp_quantity(Some(-4)), 1);
    assert_eq!(clamp_quantity(Some(7)), 7);
    assert_eq!(clamp_quantity(Some(42)), MAX_LINE_QUANTITY);
  }

  #[test]
  fn view_totals_treat_missing_price_as_zero() {
    let view = CartView::from_lines(vec![
      line(Some(1499.0), 2),
      line(None, 3),
      line(Some(400.0), 1),
    ]);
    assert_eq!(view.item_count, 6);
    assert_eq!(view.total_price, 1499.0 * 2.0 + 400.0);
  }

  #[test]
  fn empty_view_is_zeroed() {
    let view = CartView::empty();
    assert!(view.lines.is_empty());
    assert_eq!(view.item_count, 0);
    assert_eq!(view.total_price, 0.0);
  }

  #[test]
  fn line_serializes_in_camel_case() {
    let json = serde_json::to_value(line(Some(1.0), 1)).unwrap();
    assert!(json.get("itemId").is_some());
    assert!(json.get("unitPrice").is_some());
    assert_eq!(json["itemType"], "Shop");
  }
}
