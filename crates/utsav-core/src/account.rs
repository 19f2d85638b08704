//! Users, sessions and ratings.
//!
//! Credential hashing and session token issuance happen in the server; this
//! module only describes what gets persisted.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered user. Unique on `email`; never mutated after registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub user_id:       Uuid,
  pub username:      String,
  pub email:         String,
  /// PHC string produced by argon2.
  #[serde(skip_serializing)]
  pub password_hash: String,
  pub purpose:       String,
  pub gender:        String,
  pub dob:           NaiveDate,
  pub religion:      String,
  pub country:       String,
  pub mobile:        String,
  pub created_at:    DateTime<Utc>,
}

/// Input to [`crate::store::MarketStore::create_user`].
#[derive(Debug, Clone)]
pub struct NewUser {
  pub username:      String,
  pub email:         String,
  pub password_hash: String,
  pub purpose:       String,
  pub gender:        String,
  pub dob:           NaiveDate,
  pub religion:      String,
  pub country:       String,
  pub mobile:        String,
}

/// An append-only review. Not linked to any user or catalog record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rating {
  pub rating_id:   Uuid,
  pub name:        String,
  pub review:      String,
  pub score:       f64,
  pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewRating {
  pub name:   String,
  pub review: String,
  pub score:  f64,
}
