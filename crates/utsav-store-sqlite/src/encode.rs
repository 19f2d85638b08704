//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, except session expiry which is stored as
//! unix seconds so it can be compared in SQL. UUIDs are hyphenated lowercase
//! strings; item ids are 24 hex characters; attribute maps are compact JSON.

use chrono::{DateTime, NaiveDate, Utc};
use utsav_core::{
  account::User,
  cart::CartLine,
  catalog::{CatalogItem, ItemType},
  id::ItemId,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── Dates ────────────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Catalog keys ─────────────────────────────────────────────────────────────

pub fn encode_item_id(id: ItemId) -> String { id.to_string() }

pub fn decode_item_id(s: &str) -> Result<ItemId> { Ok(s.parse()?) }

pub fn encode_item_type(t: ItemType) -> &'static str { t.collection_name() }

pub fn decode_item_type(s: &str) -> Result<ItemType> { Ok(s.parse()?) }

// ─── Attributes ───────────────────────────────────────────────────────────────

pub fn encode_attributes(
  attrs: &serde_json::Map<String, serde_json::Value>,
) -> Result<String> {
  Ok(serde_json::to_string(attrs)?)
}

pub fn decode_attributes(s: &str) -> Result<serde_json::Map<String, serde_json::Value>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Raw row types ────────────────────────────────────────────────────────────

/// Untyped row read from `users`.
pub struct RawUser {
  pub user_id:       String,
  pub username:      String,
  pub email:         String,
  pub password_hash: String,
  pub purpose:       String,
  pub gender:        String,
  pub dob:           String,
  pub religion:      String,
  pub country:       String,
  pub mobile:        String,
  pub created_at:    String,
}

impl RawUser {
  pub const COLUMNS: &'static str = "user_id, username, email, password_hash, purpose, \
                                     gender, dob, religion, country, mobile, created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:       row.get(0)?,
      username:      row.get(1)?,
      email:         row.get(2)?,
      password_hash: row.get(3)?,
      purpose:       row.get(4)?,
      gender:        row.get(5)?,
      dob:           row.get(6)?,
      religion:      row.get(7)?,
      country:       row.get(8)?,
      mobile:        row.get(9)?,
      created_at:    row.get(10)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:       decode_uuid(&self.user_id)?,
      username:      self.username,
      email:         self.email,
      password_hash: self.password_hash,
      purpose:       self.purpose,
      gender:        self.gender,
      dob:           decode_date(&self.dob)?,
      religion:      self.religion,
      country:       self.country,
      mobile:        self.mobile,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

/// Untyped row read from `catalog_items`.
pub struct RawCatalogItem {
  pub item_type:  String,
  pub item_id:    String,
  pub name:       String,
  pub price:      Option<f64>,
  pub attributes: String,
  pub created_at: String,
}

impl RawCatalogItem {
  pub const COLUMNS: &'static str = "item_type, item_id, name, price, attributes, created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      item_type:  row.get(0)?,
      item_id:    row.get(1)?,
      name:       row.get(2)?,
      price:      row.get(3)?,
      attributes: row.get(4)?,
      created_at: row.get(5)?,
    })
  }

  pub fn into_item(self) -> Result<CatalogItem> {
    Ok(CatalogItem {
      item_id:    decode_item_id(&self.item_id)?,
      item_type:  decode_item_type(&self.item_type)?,
      name:       self.name,
      price:      self.price,
      attributes: decode_attributes(&self.attributes)?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Untyped row read from `cart_lines`.
pub struct RawCartLine {
  pub item_type:  String,
  pub item_id:    String,
  pub name:       Option<String>,
  pub unit_price: Option<f64>,
  pub quantity:   i64,
}

impl RawCartLine {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      item_type:  row.get(0)?,
      item_id:    row.get(1)?,
      name:       row.get(2)?,
      unit_price: row.get(3)?,
      quantity:   row.get(4)?,
    })
  }

  pub fn into_line(self) -> Result<CartLine> {
    Ok(CartLine {
      item_id:    decode_item_id(&self.item_id)?,
      item_type:  decode_item_type(&self.item_type)?,
      name:       self.name,
      unit_price: self.unit_price,
      quantity:   self.quantity,
    })
  }
}
