//! Admin entities and the generic add/update/delete dispatcher.
//!
//! Four provider kinds (decorators, halls, priests, caterers) arrive as flat
//! form payloads keyed by a type tag. [`AdminKind::resolve`] picks the kind,
//! [`AdminEntity::normalize`] coerces the payload into the kind's shape, and
//! [`AdminDispatcher::apply`] performs exactly one catalog write.

use std::{collections::BTreeMap, sync::Arc};

use serde::Serialize;

use crate::{
  Error, Result,
  catalog::{CatalogItem, ItemType, NewCatalogItem},
  id::ItemId,
  store::MarketStore,
};

/// A raw form payload: field name → submitted text.
pub type RawFields = BTreeMap<String, String>;

// ─── Field coercion ──────────────────────────────────────────────────────────

/// A trimmed, non-empty text field. Empty submissions count as absent.
fn text(fields: &RawFields, key: &str) -> Option<String> {
  fields
    .get(key)
    .map(|v| v.trim())
    .filter(|v| !v.is_empty())
    .map(str::to_owned)
}

/// A numeric field. Absent → `None`; present but not a finite number → error.
fn number(fields: &RawFields, key: &str) -> Result<Option<f64>> {
  let Some(raw) = text(fields, key) else { return Ok(None) };
  match raw.parse::<f64>() {
    Ok(n) if n.is_finite() => Ok(Some(n)),
    _ => Err(Error::invalid(format!("{key} must be a number, got {raw:?}"))),
  }
}

/// A comma-separated list. Entries are trimmed and empty entries dropped.
fn list(fields: &RawFields, key: &str) -> Option<Vec<String>> {
  text(fields, key).map(|raw| {
    raw
      .split(',')
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .map(str::to_owned)
      .collect()
  })
}

fn required_name(fields: &RawFields) -> Result<String> {
  text(fields, "name").ok_or_else(|| Error::invalid("name is required"))
}

/// The record id carried by update/delete forms, if any.
fn explicit_id(fields: &RawFields) -> Result<Option<ItemId>> {
  text(fields, "id").map(|id| id.parse()).transpose()
}

// ─── Kinds ───────────────────────────────────────────────────────────────────

/// The admin-maintained entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminKind {
  Decorators,
  Halls,
  Priests,
  Caterers,
}

impl AdminKind {
  pub const ALL: [AdminKind; 4] =
    [Self::Decorators, Self::Halls, Self::Priests, Self::Caterers];

  /// Map a type tag to its kind. Only the exact lowercase tags are accepted.
  pub fn resolve(tag: &str) -> Result<Self> {
    Self::ALL
      .into_iter()
      .find(|k| k.tag() == tag)
      .ok_or_else(|| Error::UnknownEntityType(tag.to_owned()))
  }

  pub fn item_type(self) -> ItemType {
    match self {
      Self::Decorators => ItemType::Decorators,
      Self::Halls => ItemType::Halls,
      Self::Priests => ItemType::Priests,
      Self::Caterers => ItemType::Caterers,
    }
  }

  pub fn tag(self) -> &'static str { self.item_type().tag() }

  pub fn collection_name(self) -> &'static str { self.item_type().collection_name() }
}

// ─── Lookup key ──────────────────────────────────────────────────────────────

/// How update/delete address a single record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityKey {
  /// The immutable id assigned at creation.
  Id(ItemId),
  /// Display name; matches the oldest record of that name.
  Name(String),
}

/// Build the delete key without normalizing the rest of the payload. Uses the
/// same rule as [`AdminRecord::match_key`]: the `id` if present, else the name.
pub fn build_filter(fields: &RawFields) -> Result<EntityKey> {
  match explicit_id(fields)? {
    Some(id) => Ok(EntityKey::Id(id)),
    None => Ok(EntityKey::Name(required_name(fields)?)),
  }
}

// ─── Entity shapes ───────────────────────────────────────────────────────────

/// Behaviour shared by every admin entity shape.
pub trait AdminRecord: Serialize + Sized {
  /// Coerce a raw payload into this shape.
  fn normalize(fields: &RawFields) -> Result<Self>;

  fn name(&self) -> &str;

  /// The stored record this payload addresses, when the form names one.
  fn id(&self) -> Option<ItemId>;

  /// The price-like figure copied onto cart lines.
  fn price(&self) -> Option<f64>;

  /// Key addressing the stored record: the explicit id, else the name.
  fn match_key(&self) -> EntityKey {
    self
      .id()
      .map(EntityKey::Id)
      .unwrap_or_else(|| EntityKey::Name(self.name().to_owned()))
  }

  /// Every field except `name`, absent ones omitted.
  fn attributes(&self) -> Result<serde_json::Map<String, serde_json::Value>> {
    let value = serde_json::to_value(self)
      .map_err(|e| Error::invalid(format!("unserializable record: {e}")))?;
    let mut map = match value {
      serde_json::Value::Object(map) => map,
      _ => serde_json::Map::new(),
    };
    map.remove("name");
    Ok(map)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decorator {
  #[serde(skip)]
  pub id:                Option<ItemId>,
  pub name:              String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub avg_pricing:       Option<f64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub location:          Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub mob:               Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub services_involved: Option<Vec<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub mail:              Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub avg_rating:        Option<f64>,
}

impl AdminRecord for Decorator {
  fn normalize(fields: &RawFields) -> Result<Self> {
    Ok(Self {
      id:                explicit_id(fields)?,
      name:              required_name(fields)?,
      avg_pricing:       number(fields, "avg_pricing")?,
      location:          text(fields, "location"),
      mob:               text(fields, "mob"),
      services_involved: list(fields, "services_involved"),
      mail:              text(fields, "mail"),
      avg_rating:        number(fields, "avg_rating")?,
    })
  }

  fn name(&self) -> &str { &self.name }

  fn id(&self) -> Option<ItemId> { self.id }

  fn price(&self) -> Option<f64> { self.avg_pricing }
}

/// The shape shared by halls, priests and caterers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Provider {
  #[serde(skip)]
  pub id:         Option<ItemId>,
  pub name:       String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub location:   Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub mobno:      Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub pricing:    Option<f64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub avg_rating: Option<f64>,
}

impl AdminRecord for Provider {
  fn normalize(fields: &RawFields) -> Result<Self> {
    Ok(Self {
      id:         explicit_id(fields)?,
      name:       required_name(fields)?,
      location:   text(fields, "location"),
      mobno:      text(fields, "mobno"),
      pricing:    number(fields, "pricing")?,
      avg_rating: number(fields, "avg_rating")?,
    })
  }

  fn name(&self) -> &str { &self.name }

  fn id(&self) -> Option<ItemId> { self.id }

  fn price(&self) -> Option<f64> { self.pricing }
}

/// One normalized admin record, tagged by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum AdminEntity {
  Decorator(Decorator),
  Hall(Provider),
  Priest(Provider),
  Caterer(Provider),
}

impl AdminEntity {
  pub fn normalize(kind: AdminKind, fields: &RawFields) -> Result<Self> {
    Ok(match kind {
      AdminKind::Decorators => Self::Decorator(Decorator::normalize(fields)?),
      AdminKind::Halls => Self::Hall(Provider::normalize(fields)?),
      AdminKind::Priests => Self::Priest(Provider::normalize(fields)?),
      AdminKind::Caterers => Self::Caterer(Provider::normalize(fields)?),
    })
  }

  pub fn kind(&self) -> AdminKind {
    match self {
      Self::Decorator(_) => AdminKind::Decorators,
      Self::Hall(_) => AdminKind::Halls,
      Self::Priest(_) => AdminKind::Priests,
      Self::Caterer(_) => AdminKind::Caterers,
    }
  }

  pub fn match_key(&self) -> EntityKey {
    match self {
      Self::Decorator(d) => d.match_key(),
      Self::Hall(p) | Self::Priest(p) | Self::Caterer(p) => p.match_key(),
    }
  }

  /// Flatten into the catalog record the store persists.
  pub fn into_catalog_item(self) -> Result<NewCatalogItem> {
    let item_type = self.kind().item_type();
    let (name, price, attributes) = match &self {
      Self::Decorator(d) => (d.name.clone(), d.price(), d.attributes()?),
      Self::Hall(p) | Self::Priest(p) | Self::Caterer(p) => {
        (p.name.clone(), p.price(), p.attributes()?)
      }
    };
    Ok(NewCatalogItem { item_type, name, price, attributes })
  }
}

// ─── Dispatcher ──────────────────────────────────────────────────────────────

/// The verbs the admin form can submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
  Add,
  Update,
  Delete,
}

impl AdminAction {
  /// `None` for anything other than `add`, `update` or `delete`.
  pub fn parse(s: &str) -> Option<Self> {
    match s.trim() {
      "add" => Some(Self::Add),
      "update" => Some(Self::Update),
      "delete" => Some(Self::Delete),
      _ => None,
    }
  }
}

/// What a dispatched admin request did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "value", rename_all = "snake_case")]
pub enum AdminOutcome {
  Added(ItemId),
  /// Number of records replaced; 0 when nothing matched.
  Updated(u64),
  /// Number of records removed; 0 when nothing matched.
  Deleted(u64),
  /// The action was not recognised; nothing was written.
  Ignored,
}

/// All four admin collections, for the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct AdminOverview {
  pub decorators: Vec<CatalogItem>,
  pub halls:      Vec<CatalogItem>,
  pub priests:    Vec<CatalogItem>,
  pub caterers:   Vec<CatalogItem>,
}

/// Routes add/update/delete for any [`AdminKind`] through one code path.
pub struct AdminDispatcher<S> {
  store: Arc<S>,
}

impl<S> Clone for AdminDispatcher<S> {
  fn clone(&self) -> Self { Self { store: Arc::clone(&self.store) } }
}

impl<S: MarketStore> AdminDispatcher<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// Apply `action` to the collection named by `tag`.
  ///
  /// Unknown tags fail before anything else happens. Unknown actions are a
  /// silent no-op. Updates and deletes that match nothing succeed with a
  /// zero count.
  pub async fn apply(
    &self,
    action: &str,
    tag: &str,
    fields: &RawFields,
  ) -> Result<AdminOutcome> {
    let kind = AdminKind::resolve(tag)?;
    let Some(action) = AdminAction::parse(action) else {
      return Ok(AdminOutcome::Ignored);
    };

    match action {
      AdminAction::Add => {
        let record = AdminEntity::normalize(kind, fields)?.into_catalog_item()?;
        let item = self
          .store
          .insert_catalog_item(record)
          .await
          .map_err(Error::store)?;
        Ok(AdminOutcome::Added(item.item_id))
      }
      AdminAction::Update => {
        let entity = AdminEntity::normalize(kind, fields)?;
        let key = entity.match_key();
        let record = entity.into_catalog_item()?;
        let changed = self
          .store
          .replace_catalog_item(&key, record)
          .await
          .map_err(Error::store)?;
        Ok(AdminOutcome::Updated(changed))
      }
      AdminAction::Delete => {
        let key = build_filter(fields)?;
        let removed = self
          .store
          .delete_catalog_item(kind.item_type(), &key)
          .await
          .map_err(Error::store)?;
        Ok(AdminOutcome::Deleted(removed))
      }
    }
  }

  pub async fn overview(&self) -> Result<AdminOverview> {
    Ok(AdminOverview {
      decorators: self.list(AdminKind::Decorators).await?,
      halls:      self.list(AdminKind::Halls).await?,
      priests:    self.list(AdminKind::Priests).await?,
      caterers:   self.list(AdminKind::Caterers).await?,
    })
  }

  async fn list(&self, kind: AdminKind) -> Result<Vec<CatalogItem>> {
    self.store.list_catalog(kind.item_type()).await.map_err(Error::store)
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Mutex;

  use chrono::{DateTime, Utc};
  use uuid::Uuid;

  use super::*;
  use crate::{
    account::{NewRating, NewUser, Rating, User},
    cart::{CartLine, LineKey, NewCartLine},
  };

  fn fields(pairs: &[(&str, &str)]) -> RawFields {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
  }

  fn grand_hall() -> RawFields {
    fields(&[
      ("name", "Grand Hall"),
      ("location", "City"),
      ("mobno", "123"),
      ("pricing", "5000"),
      ("avg_rating", "4.5"),
    ])
  }

  // An in-memory catalog that counts every store call. Non-catalog methods
  // are never reached by the dispatcher.
  #[derive(Default)]
  struct CatalogOnly {
    items: Mutex<Vec<CatalogItem>>,
    calls: Mutex<u32>,
  }

  impl CatalogOnly {
    fn touch(&self) { *self.calls.lock().unwrap() += 1; }

    fn calls(&self) -> u32 { *self.calls.lock().unwrap() }

    fn position(items: &[CatalogItem], item_type: ItemType, key: &EntityKey) -> Option<usize> {
      items.iter().position(|i| {
        i.item_type == item_type
          && match key {
            EntityKey::Id(id) => i.item_id == *id,
            EntityKey::Name(name) => i.name == *name,
          }
      })
    }
  }

  impl MarketStore for CatalogOnly {
    type Error = std::convert::Infallible;

    async fn create_user(&self, _: NewUser) -> Result<Option<User>, Self::Error> { unimplemented!() }
    async fn find_user_by_email(&self, _: &str) -> Result<Option<User>, Self::Error> { unimplemented!() }
    async fn get_user(&self, _: Uuid) -> Result<Option<User>, Self::Error> { unimplemented!() }
    async fn create_session(&self, _: String, _: Uuid, _: DateTime<Utc>) -> Result<(), Self::Error> { unimplemented!() }
    async fn session_user(&self, _: String, _: DateTime<Utc>) -> Result<Option<Uuid>, Self::Error> { unimplemented!() }
    async fn delete_session(&self, _: String) -> Result<(), Self::Error> { unimplemented!() }

    async fn insert_catalog_item(&self, input: NewCatalogItem) -> Result<CatalogItem, Self::Error> {
      self.touch();
      let item = CatalogItem {
        item_id:    ItemId::generate(),
        item_type:  input.item_type,
        name:       input.name,
        price:      input.price,
        attributes: input.attributes,
        created_at: Utc::now(),
      };
      self.items.lock().unwrap().push(item.clone());
      Ok(item)
    }

    async fn get_catalog_item(&self, _: ItemType, _: ItemId) -> Result<Option<CatalogItem>, Self::Error> { unimplemented!() }

    async fn list_catalog(&self, item_type: ItemType) -> Result<Vec<CatalogItem>, Self::Error> {
      self.touch();
      Ok(self.items.lock().unwrap().iter().filter(|i| i.item_type == item_type).cloned().collect())
    }

    async fn replace_catalog_item(&self, key: &EntityKey, input: NewCatalogItem) -> Result<u64, Self::Error> {
      self.touch();
      let mut items = self.items.lock().unwrap();
      let Some(pos) = Self::position(&items, input.item_type, key) else { return Ok(0) };
      items[pos].name = input.name;
      items[pos].price = input.price;
      items[pos].attributes = input.attributes;
      Ok(1)
    }

    async fn delete_catalog_item(&self, item_type: ItemType, key: &EntityKey) -> Result<u64, Self::Error> {
      self.touch();
      let mut items = self.items.lock().unwrap();
      let Some(pos) = Self::position(&items, item_type, key) else { return Ok(0) };
      items.remove(pos);
      Ok(1)
    }

    async fn add_cart_line(&self, _: Uuid, _: NewCartLine, _: i64) -> Result<i64, Self::Error> { unimplemented!() }
    async fn set_cart_line_quantity(&self, _: Uuid, _: NewCartLine) -> Result<Option<i64>, Self::Error> { unimplemented!() }
    async fn remove_cart_line(&self, _: Uuid, _: LineKey) -> Result<i64, Self::Error> { unimplemented!() }
    async fn get_cart(&self, _: Uuid) -> Result<Option<Vec<CartLine>>, Self::Error> { unimplemented!() }
    async fn record_rating(&self, _: NewRating) -> Result<Rating, Self::Error> { unimplemented!() }
  }

  fn dispatcher() -> (Arc<CatalogOnly>, AdminDispatcher<CatalogOnly>) {
    let store = Arc::new(CatalogOnly::default());
    (store.clone(), AdminDispatcher::new(store))
  }

  // ── Normalization ─────────────────────────────────────────────────────────

  #[test]
  fn hall_pricing_becomes_a_number() {
    let entity = AdminEntity::normalize(AdminKind::Halls, &grand_hall()).unwrap();
    let record = entity.into_catalog_item().unwrap();
    assert_eq!(record.item_type, ItemType::Halls);
    assert_eq!(record.name, "Grand Hall");
    assert_eq!(record.price, Some(5000.0));
    assert_eq!(record.attributes["pricing"].as_f64(), Some(5000.0));
    assert!(record.attributes["pricing"].is_number());
    assert_eq!(record.attributes["avg_rating"].as_f64(), Some(4.5));
    assert_eq!(record.attributes["mobno"], "123");
    assert!(record.attributes.get("name").is_none());
  }

  #[test]
  fn decorator_services_are_split() {
    let f = fields(&[
      ("name", "Bloom Decor"),
      ("avg_pricing", "12000"),
      ("services_involved", "flowers, lighting,,stage "),
    ]);
    let AdminEntity::Decorator(d) = AdminEntity::normalize(AdminKind::Decorators, &f).unwrap()
    else {
      panic!("expected a decorator");
    };
    assert_eq!(
      d.services_involved,
      Some(vec!["flowers".to_string(), "lighting".to_string(), "stage".to_string()])
    );
    assert_eq!(d.price(), Some(12000.0));
  }

  #[test]
  fn absent_fields_stay_absent() {
    let f = fields(&[("name", "Pandit Ji"), ("pricing", "")]);
    let record = AdminEntity::normalize(AdminKind::Priests, &f)
      .unwrap()
      .into_catalog_item()
      .unwrap();
    assert_eq!(record.price, None);
    assert!(record.attributes.is_empty());
  }

  #[test]
  fn non_numeric_pricing_is_rejected() {
    let f = fields(&[("name", "Feast Co"), ("pricing", "cheap")]);
    assert!(matches!(
      AdminEntity::normalize(AdminKind::Caterers, &f),
      Err(Error::InvalidInput(_))
    ));
  }

  #[test]
  fn resolve_rejects_unknown_tags() {
    assert_eq!(AdminKind::resolve("halls").unwrap(), AdminKind::Halls);
    assert_eq!(AdminKind::Halls.collection_name(), "Halls");
    assert!(matches!(AdminKind::resolve("Shop"), Err(Error::UnknownEntityType(_))));
    assert!(matches!(AdminKind::resolve("venues"), Err(Error::UnknownEntityType(_))));
  }

  #[test]
  fn filter_prefers_id_over_name() {
    let id = ItemId::generate();
    let f = fields(&[("name", "Grand Hall"), ("id", &id.to_string())]);
    assert_eq!(build_filter(&f).unwrap(), EntityKey::Id(id));
    let f = fields(&[("name", "Grand Hall")]);
    assert_eq!(build_filter(&f).unwrap(), EntityKey::Name("Grand Hall".into()));
    assert!(build_filter(&fields(&[])).is_err());
  }

  #[test]
  fn match_key_prefers_explicit_id() {
    let id = ItemId::generate();
    let mut f = grand_hall();
    let named = AdminEntity::normalize(AdminKind::Halls, &f).unwrap();
    assert_eq!(named.match_key(), EntityKey::Name("Grand Hall".into()));

    f.insert("id".into(), id.to_string());
    let by_id = AdminEntity::normalize(AdminKind::Halls, &f).unwrap();
    assert_eq!(by_id.match_key(), EntityKey::Id(id));
    assert!(by_id.into_catalog_item().unwrap().attributes.get("id").is_none());
  }

  #[test]
  fn malformed_id_is_rejected() {
    let mut f = grand_hall();
    f.insert("id".into(), "not-an-id".into());
    assert!(matches!(
      AdminEntity::normalize(AdminKind::Halls, &f),
      Err(Error::InvalidInput(_))
    ));
  }

  // ── Dispatch ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn add_inserts_normalized_record() {
    let (store, d) = dispatcher();
    let outcome = d.apply("add", "halls", &grand_hall()).await.unwrap();
    let AdminOutcome::Added(id) = outcome else { panic!("expected Added, got {outcome:?}") };

    let halls = store.list_catalog(ItemType::Halls).await.unwrap();
    assert_eq!(halls.len(), 1);
    assert_eq!(halls[0].item_id, id);
    assert_eq!(halls[0].attributes["pricing"].as_f64(), Some(5000.0));
  }

  #[tokio::test]
  async fn add_allows_duplicate_names() {
    let (store, d) = dispatcher();
    d.apply("add", "halls", &grand_hall()).await.unwrap();
    d.apply("add", "halls", &grand_hall()).await.unwrap();
    assert_eq!(store.list_catalog(ItemType::Halls).await.unwrap().len(), 2);
  }

  #[tokio::test]
  async fn update_without_match_is_a_noop() {
    let (store, d) = dispatcher();
    let outcome = d.apply("update", "halls", &grand_hall()).await.unwrap();
    assert_eq!(outcome, AdminOutcome::Updated(0));
    assert!(store.list_catalog(ItemType::Halls).await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn update_replaces_all_fields() {
    let (store, d) = dispatcher();
    d.apply("add", "halls", &grand_hall()).await.unwrap();
    let f = fields(&[("name", "Grand Hall"), ("pricing", "6500")]);
    assert_eq!(d.apply("update", "halls", &f).await.unwrap(), AdminOutcome::Updated(1));

    let halls = store.list_catalog(ItemType::Halls).await.unwrap();
    assert_eq!(halls[0].price, Some(6500.0));
    assert!(halls[0].attributes.get("location").is_none());
  }

  #[tokio::test]
  async fn update_by_id_can_rename() {
    let (store, d) = dispatcher();
    let AdminOutcome::Added(id) = d.apply("add", "caterers", &fields(&[("name", "Old")])).await.unwrap()
    else {
      panic!("expected Added");
    };
    let f = fields(&[("id", &id.to_string()), ("name", "New")]);
    assert_eq!(d.apply("update", "caterers", &f).await.unwrap(), AdminOutcome::Updated(1));
    let caterers = store.list_catalog(ItemType::Caterers).await.unwrap();
    assert_eq!(caterers[0].name, "New");
  }

  #[tokio::test]
  async fn delete_removes_one_record() {
    let (store, d) = dispatcher();
    d.apply("add", "priests", &fields(&[("name", "Pandit Ji")])).await.unwrap();
    let outcome = d.apply("delete", "priests", &fields(&[("name", "Pandit Ji")])).await.unwrap();
    assert_eq!(outcome, AdminOutcome::Deleted(1));
    let again = d.apply("delete", "priests", &fields(&[("name", "Pandit Ji")])).await.unwrap();
    assert_eq!(again, AdminOutcome::Deleted(0));
    assert!(store.list_catalog(ItemType::Priests).await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn unknown_tag_fails_before_store_access() {
    let (store, d) = dispatcher();
    let err = d.apply("delete", "venues", &grand_hall()).await.unwrap_err();
    assert!(matches!(err, Error::UnknownEntityType(t) if t == "venues"));
    assert_eq!(store.calls(), 0);
  }

  #[tokio::test]
  async fn unknown_action_is_ignored() {
    let (store, d) = dispatcher();
    let outcome = d.apply("archive", "halls", &grand_hall()).await.unwrap();
    assert_eq!(outcome, AdminOutcome::Ignored);
    assert_eq!(store.calls(), 0);
  }

  #[tokio::test]
  async fn invalid_input_fails_before_store_access() {
    let (store, d) = dispatcher();
    let f = fields(&[("name", "Grand Hall"), ("pricing", "lots")]);
    assert!(matches!(d.apply("add", "halls", &f).await, Err(Error::InvalidInput(_))));
    assert_eq!(store.calls(), 0);
  }

  #[tokio::test]
  async fn overview_lists_each_kind() {
    let (_, d) = dispatcher();
    d.apply("add", "halls", &grand_hall()).await.unwrap();
    d.apply("add", "decorators", &fields(&[("name", "Bloom")])).await.unwrap();
    let overview = d.overview().await.unwrap();
    assert_eq!(overview.halls.len(), 1);
    assert_eq!(overview.decorators.len(), 1);
    assert!(overview.priests.is_empty());
    assert!(overview.caterers.is_empty());
  }
}
