//! [`SqliteStore`], the SQLite implementation of [`MarketStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use utsav_core::{
  account::{NewRating, NewUser, Rating, User},
  admin::EntityKey,
  cart::{CartLine, LineKey, NewCartLine},
  catalog::{CatalogItem, ItemType, NewCatalogItem},
  id::ItemId,
  store::MarketStore,
};

use crate::{
  Result,
  encode::{
    RawCartLine, RawCatalogItem, RawUser, encode_attributes, encode_date, encode_dt,
    decode_uuid, encode_item_id, encode_item_type, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A marketplace store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

/// Σ quantity over a user's lines; 0 for an empty or missing cart.
fn item_count_in(conn: &rusqlite::Connection, user_id: &str) -> rusqlite::Result<i64> {
  conn.query_row(
    "SELECT COALESCE(SUM(quantity), 0) FROM cart_lines WHERE user_id = ?1",
    rusqlite::params![user_id],
    |row| row.get(0),
  )
}

fn cart_exists(conn: &rusqlite::Connection, user_id: &str) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row(
        "SELECT 1 FROM carts WHERE user_id = ?1",
        rusqlite::params![user_id],
        |_| Ok(true),
      )
      .optional()?
      .unwrap_or(false),
  )
}

/// The WHERE clause selecting the single catalog record addressed by a key.
/// Binds `?1` = item type and `?2` = id or name.
fn key_clause(key: &EntityKey) -> (&'static str, String) {
  match key {
    EntityKey::Id(id) => ("item_type = ?1 AND item_id = ?2", encode_item_id(*id)),
    EntityKey::Name(name) => (
      "rowid = (SELECT rowid FROM catalog_items
                WHERE item_type = ?1 AND name = ?2
                ORDER BY rowid LIMIT 1)",
      name.clone(),
    ),
  }
}

// ─── MarketStore impl ────────────────────────────────────────────────────────

impl MarketStore for SqliteStore {
  type Error = crate::Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn create_user(&self, input: NewUser) -> Result<Option<User>> {
    let user = User {
      user_id:       Uuid::new_v4(),
      username:      input.username,
      email:         input.email,
      password_hash: input.password_hash,
      purpose:       input.purpose,
      gender:        input.gender,
      dob:           input.dob,
      religion:      input.religion,
      country:       input.country,
      mobile:        input.mobile,
      created_at:    Utc::now(),
    };

    let row = user.clone();

    let inserted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "INSERT INTO users (
             user_id, username, email, password_hash, purpose,
             gender, dob, religion, country, mobile, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
           ON CONFLICT(email) DO NOTHING",
          rusqlite::params![
            encode_uuid(row.user_id),
            row.username,
            row.email,
            row.password_hash,
            row.purpose,
            row.gender,
            encode_date(row.dob),
            row.religion,
            row.country,
            row.mobile,
            encode_dt(row.created_at),
          ],
        )?)
      })
      .await?;

    Ok((inserted == 1).then_some(user))
  }

  async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
    let email = email.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {} FROM users WHERE email = ?1", RawUser::COLUMNS),
              rusqlite::params![email],
              RawUser::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
    let id_str = encode_uuid(user_id);

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {} FROM users WHERE user_id = ?1", RawUser::COLUMNS),
              rusqlite::params![id_str],
              RawUser::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  // ── Sessions ──────────────────────────────────────────────────────────────

  async fn create_session(
    &self,
    token_hash: String,
    user_id:    Uuid,
    expires_at: DateTime<Utc>,
  ) -> Result<()> {
    let now      = Utc::now();
    let user_str = encode_uuid(user_id);
    let at_str   = encode_dt(now);
    let now_secs = now.timestamp();
    let expires  = expires_at.timestamp();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        // Expired rows are never read again; drop them as new ones arrive.
        tx.execute(
          "DELETE FROM sessions WHERE expires_at <= ?1",
          rusqlite::params![now_secs],
        )?;
        tx.execute(
          "INSERT INTO sessions (token_hash, user_id, created_at, expires_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![token_hash, user_str, at_str, expires],
        )?;
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn session_user(&self, token_hash: String, now: DateTime<Utc>) -> Result<Option<Uuid>> {
    let now_secs = now.timestamp();

    let user_str: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT user_id FROM sessions WHERE token_hash = ?1 AND expires_at > ?2",
              rusqlite::params![token_hash, now_secs],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    user_str.as_deref().map(decode_uuid).transpose()
  }

  async fn delete_session(&self, token_hash: String) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM sessions WHERE token_hash = ?1",
          rusqlite::params![token_hash],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Catalog ───────────────────────────────────────────────────────────────

  async fn insert_catalog_item(&self, input: NewCatalogItem) -> Result<CatalogItem> {
    let item = CatalogItem {
      item_id:    ItemId::generate(),
      item_type:  input.item_type,
      name:       input.name,
      price:      input.price,
      attributes: input.attributes,
      created_at: Utc::now(),
    };

    let type_str  = encode_item_type(item.item_type);
    let id_str    = encode_item_id(item.item_id);
    let name      = item.name.clone();
    let price     = item.price;
    let attrs_str = encode_attributes(&item.attributes)?;
    let at_str    = encode_dt(item.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO catalog_items (item_type, item_id, name, price, attributes, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![type_str, id_str, name, price, attrs_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(item)
  }

  async fn get_catalog_item(
    &self,
    item_type: ItemType,
    item_id:   ItemId,
  ) -> Result<Option<CatalogItem>> {
    let type_str = encode_item_type(item_type);
    let id_str   = encode_item_id(item_id);

    let raw: Option<RawCatalogItem> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {} FROM catalog_items WHERE item_type = ?1 AND item_id = ?2",
                RawCatalogItem::COLUMNS
              ),
              rusqlite::params![type_str, id_str],
              RawCatalogItem::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCatalogItem::into_item).transpose()
  }

  async fn list_catalog(&self, item_type: ItemType) -> Result<Vec<CatalogItem>> {
    let type_str = encode_item_type(item_type);

    let raws: Vec<RawCatalogItem> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM catalog_items WHERE item_type = ?1 ORDER BY rowid",
          RawCatalogItem::COLUMNS
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![type_str], RawCatalogItem::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCatalogItem::into_item).collect()
  }

  async fn replace_catalog_item(&self, key: &EntityKey, input: NewCatalogItem) -> Result<u64> {
    let (clause, key_str) = key_clause(key);
    let sql = format!(
      "UPDATE catalog_items SET name = ?3, price = ?4, attributes = ?5 WHERE {clause}"
    );
    let type_str  = encode_item_type(input.item_type);
    let attrs_str = encode_attributes(&input.attributes)?;
    let name      = input.name;
    let price     = input.price;

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          &sql,
          rusqlite::params![type_str, key_str, name, price, attrs_str],
        )?)
      })
      .await?;

    Ok(changed as u64)
  }

  async fn delete_catalog_item(&self, item_type: ItemType, key: &EntityKey) -> Result<u64> {
    let (clause, key_str) = key_clause(key);
    let sql = format!("DELETE FROM catalog_items WHERE {clause}");
    let type_str = encode_item_type(item_type);

    let removed = self
      .conn
      .call(move |conn| Ok(conn.execute(&sql, rusqlite::params![type_str, key_str])?))
      .await?;

    Ok(removed as u64)
  }

  // ── Carts ─────────────────────────────────────────────────────────────────

  async fn add_cart_line(
    &self,
    user_id:      Uuid,
    line:         NewCartLine,
    max_quantity: i64,
  ) -> Result<i64> {
    let user_str = encode_uuid(user_id);
    let type_str = encode_item_type(line.key.item_type);
    let id_str   = encode_item_id(line.key.item_id);
    let name     = line.snapshot.name;
    let price    = line.snapshot.unit_price;
    let qty      = line.quantity;
    let at_str   = encode_dt(Utc::now());

    let count = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO carts (user_id, created_at) VALUES (?1, ?2)
           ON CONFLICT(user_id) DO NOTHING",
          rusqlite::params![user_str, at_str],
        )?;
        // Existing lines keep their snapshot; only the quantity merges.
        tx.execute(
          "INSERT INTO cart_lines
             (user_id, item_type, item_id, name, unit_price, quantity, added_at)
           VALUES (?1, ?2, ?3, ?4, ?5, MIN(?6, ?7), ?8)
           ON CONFLICT(user_id, item_type, item_id)
           DO UPDATE SET quantity = MIN(cart_lines.quantity + excluded.quantity, ?7)",
          rusqlite::params![user_str, type_str, id_str, name, price, qty, max_quantity, at_str],
        )?;
        let count = item_count_in(&tx, &user_str)?;
        tx.commit()?;
        Ok(count)
      })
      .await?;

    Ok(count)
  }

  async fn set_cart_line_quantity(&self, user_id: Uuid, line: NewCartLine) -> Result<Option<i64>> {
    let user_str = encode_uuid(user_id);
    let type_str = encode_item_type(line.key.item_type);
    let id_str   = encode_item_id(line.key.item_id);
    let name     = line.snapshot.name;
    let price    = line.snapshot.unit_price;
    let qty      = line.quantity;
    let at_str   = encode_dt(Utc::now());

    let count = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if !cart_exists(&tx, &user_str)? {
          return Ok(None);
        }
        tx.execute(
          "INSERT INTO cart_lines
             (user_id, item_type, item_id, name, unit_price, quantity, added_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
           ON CONFLICT(user_id, item_type, item_id)
           DO UPDATE SET quantity = excluded.quantity",
          rusqlite::params![user_str, type_str, id_str, name, price, qty, at_str],
        )?;
        let count = item_count_in(&tx, &user_str)?;
        tx.commit()?;
        Ok(Some(count))
      })
      .await?;

    Ok(count)
  }

  async fn remove_cart_line(&self, user_id: Uuid, key: LineKey) -> Result<i64> {
    let user_str = encode_uuid(user_id);
    let type_str = encode_item_type(key.item_type);
    let id_str   = encode_item_id(key.item_id);

    let count = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "DELETE FROM cart_lines WHERE user_id = ?1 AND item_type = ?2 AND item_id = ?3",
          rusqlite::params![user_str, type_str, id_str],
        )?;
        let count = item_count_in(&tx, &user_str)?;
        tx.commit()?;
        Ok(count)
      })
      .await?;

    Ok(count)
  }

  async fn get_cart(&self, user_id: Uuid) -> Result<Option<Vec<CartLine>>> {
    let user_str = encode_uuid(user_id);

    let raws: Option<Vec<RawCartLine>> = self
      .conn
      .call(move |conn| {
        if !cart_exists(conn, &user_str)? {
          return Ok(None);
        }
        let mut stmt = conn.prepare(
          "SELECT item_type, item_id, name, unit_price, quantity
           FROM cart_lines
           WHERE user_id = ?1
           ORDER BY rowid",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user_str], RawCartLine::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(Some(rows))
      })
      .await?;

    raws
      .map(|rows| rows.into_iter().map(RawCartLine::into_line).collect())
      .transpose()
  }

  // ── Ratings ───────────────────────────────────────────────────────────────

  async fn record_rating(&self, input: NewRating) -> Result<Rating> {
    let rating = Rating {
      rating_id:   Uuid::new_v4(),
      name:        input.name,
      review:      input.review,
      score:       input.score,
      recorded_at: Utc::now(),
    };

    let id_str = encode_uuid(rating.rating_id);
    let name   = rating.name.clone();
    let review = rating.review.clone();
    let score  = rating.score;
    let at_str = encode_dt(rating.recorded_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO ratings (rating_id, name, review, score, recorded_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, name, review, score, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(rating)
  }
}
