//! The `MarketStore` trait.
//!
//! Implemented by storage backends (e.g. `utsav-store-sqlite`). The cart
//! aggregator, the admin dispatcher and the HTTP layer depend on this
//! abstraction, never on a concrete backend. A store handle is opened once at
//! startup and shared behind an `Arc`.

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  account::{NewRating, NewUser, Rating, User},
  admin::EntityKey,
  cart::{CartLine, LineKey, NewCartLine},
  catalog::{CatalogItem, ItemType, NewCatalogItem},
  id::ItemId,
};

/// Abstraction over the marketplace's backing store.
///
/// Every cart mutation must be atomic with respect to other mutations of the
/// same cart: implementations perform the merge inside the store instead of
/// reading lines out, editing them, and writing the whole set back.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait MarketStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Persist a new user. Returns `None` if the email is already registered.
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn find_user_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  fn get_user(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  // ── Sessions ──────────────────────────────────────────────────────────

  /// Record a session under the hash of its token.
  fn create_session(
    &self,
    token_hash: String,
    user_id: Uuid,
    expires_at: DateTime<Utc>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Resolve a session to its user, ignoring sessions expired at `now`.
  fn session_user(
    &self,
    token_hash: String,
    now: DateTime<Utc>,
  ) -> impl Future<Output = Result<Option<Uuid>, Self::Error>> + Send + '_;

  fn delete_session(
    &self,
    token_hash: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Catalog ───────────────────────────────────────────────────────────

  /// Insert a record under a freshly generated [`ItemId`]. Names are not
  /// checked for uniqueness.
  fn insert_catalog_item(
    &self,
    input: NewCatalogItem,
  ) -> impl Future<Output = Result<CatalogItem, Self::Error>> + Send + '_;

  fn get_catalog_item(
    &self,
    item_type: ItemType,
    item_id: ItemId,
  ) -> impl Future<Output = Result<Option<CatalogItem>, Self::Error>> + Send + '_;

  /// All records of one type, oldest first.
  fn list_catalog(
    &self,
    item_type: ItemType,
  ) -> impl Future<Output = Result<Vec<CatalogItem>, Self::Error>> + Send + '_;

  /// Replace name, price and attributes of the single record matched by
  /// `key`. When matching by name, the oldest record of that name wins.
  /// Returns the number of records changed (0 or 1).
  fn replace_catalog_item<'a>(
    &'a self,
    key: &'a EntityKey,
    input: NewCatalogItem,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + 'a;

  /// Delete the single record of `item_type` matched by `key`. Returns the
  /// number of records removed (0 or 1).
  fn delete_catalog_item<'a>(
    &'a self,
    item_type: ItemType,
    key: &'a EntityKey,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + 'a;

  // ── Carts ─────────────────────────────────────────────────────────────

  /// Merge-add a line, creating the cart if needed.
  ///
  /// A new line is stored as given. An existing line with the same
  /// [`LineKey`] keeps its snapshot and its quantity becomes
  /// `min(existing + line.quantity, max_quantity)`. Returns the cart's item
  /// count after the write.
  fn add_cart_line(
    &self,
    user_id: Uuid,
    line: NewCartLine,
    max_quantity: i64,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  /// Overwrite the quantity of an existing line, or append `line` if absent.
  /// Returns `None` (and writes nothing) when the user has no cart.
  fn set_cart_line_quantity(
    &self,
    user_id: Uuid,
    line: NewCartLine,
  ) -> impl Future<Output = Result<Option<i64>, Self::Error>> + Send + '_;

  /// Remove a line if present. Returns the item count afterwards (0 when the
  /// user has no cart).
  fn remove_cart_line(
    &self,
    user_id: Uuid,
    key: LineKey,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  /// The user's lines in insertion order, or `None` if no cart exists yet.
  fn get_cart(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<Vec<CartLine>>, Self::Error>> + Send + '_;

  // ── Ratings ───────────────────────────────────────────────────────────

  fn record_rating(
    &self,
    input: NewRating,
  ) -> impl Future<Output = Result<Rating, Self::Error>> + Send + '_;
}
