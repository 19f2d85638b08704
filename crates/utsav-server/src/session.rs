//! Cookie sessions backed by the store's `sessions` table.
//!
//! The client holds a random token in the `sid` cookie; the store only ever
//! sees its SHA-256. Two extractors resolve the cookie to a user id:
//! [`CurrentUser`] for JSON endpoints (401 when missing) and [`PageUser`] for
//! page-style endpoints (redirect to `/`).

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
  response::{IntoResponse, Redirect, Response},
};
use chrono::{Duration, Utc};
use rand_core::{OsRng, RngCore};
use sha2::{Digest, Sha256};
use utsav_core::store::MarketStore;
use uuid::Uuid;

use crate::{AppState, error::Error};

pub const SESSION_COOKIE: &str = "sid";

// ─── Tokens ──────────────────────────────────────────────────────────────────

/// 32 random bytes, hex-encoded.
pub fn new_token() -> String {
  let mut bytes = [0u8; 32];
  OsRng.fill_bytes(&mut bytes);
  hex::encode(bytes)
}

pub fn hash_token(token: &str) -> String { hex::encode(Sha256::digest(token.as_bytes())) }

// ─── Cookies ─────────────────────────────────────────────────────────────────

pub fn session_cookie(token: &str, ttl_secs: u64, secure: bool) -> String {
  let mut cookie = format!(
    "{SESSION_COOKIE}={token}; HttpOnly; SameSite=Lax; Path=/; Max-Age={ttl_secs}"
  );
  if secure {
    cookie.push_str("; Secure");
  }
  cookie
}

pub fn clear_cookie(secure: bool) -> String { session_cookie("", 0, secure) }

/// The session token from the `Cookie` header(s), if any.
pub fn token_from_headers(headers: &HeaderMap) -> Option<&str> {
  headers
    .get_all(header::COOKIE)
    .iter()
    .filter_map(|v| v.to_str().ok())
    .flat_map(|v| v.split(';'))
    .filter_map(|pair| pair.trim().split_once('='))
    .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
    .map(|(_, value)| value)
}

// ─── Lifecycle ───────────────────────────────────────────────────────────────

/// Persist a new session for `user_id` and return its `Set-Cookie` value.
pub async fn start<S: MarketStore>(state: &AppState<S>, user_id: Uuid) -> Result<String, Error> {
  let token   = new_token();
  let ttl     = state.config.session_ttl_secs;
  let expires = Utc::now() + Duration::seconds(ttl as i64);

  state
    .store
    .create_session(hash_token(&token), user_id, expires)
    .await
    .map_err(Error::internal)?;

  Ok(session_cookie(&token, ttl, state.config.secure_cookies))
}

/// Drop the session named by the request's cookie, if there is one.
pub async fn end<S: MarketStore>(state: &AppState<S>, headers: &HeaderMap) -> Result<(), Error> {
  if let Some(token) = token_from_headers(headers) {
    state
      .store
      .delete_session(hash_token(token))
      .await
      .map_err(Error::internal)?;
  }
  Ok(())
}

/// Resolve the request's cookie to a live session's user.
pub async fn resolve<S: MarketStore>(
  state: &AppState<S>,
  headers: &HeaderMap,
) -> Result<Option<Uuid>, Error> {
  let Some(token) = token_from_headers(headers) else {
    return Ok(None);
  };
  state
    .store
    .session_user(hash_token(token), Utc::now())
    .await
    .map_err(Error::internal)
}

// ─── Extractors ──────────────────────────────────────────────────────────────

/// The signed-in user of a JSON endpoint.
pub struct CurrentUser(pub Uuid);

impl<S> FromRequestParts<AppState<S>> for CurrentUser
where
  S: MarketStore + Clone + 'static,
{
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    resolve(state, &parts.headers)
      .await?
      .map(CurrentUser)
      .ok_or(Error::Unauthenticated)
  }
}

/// The signed-in user of a page endpoint; anonymous visitors are sent home.
pub struct PageUser(pub Uuid);

impl<S> FromRequestParts<AppState<S>> for PageUser
where
  S: MarketStore + Clone + 'static,
{
  type Rejection = Response;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    match resolve(state, &parts.headers).await {
      Ok(Some(user_id)) => Ok(PageUser(user_id)),
      Ok(None) => Err(Redirect::to("/").into_response()),
      Err(e) => Err(e.into_response()),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::http::HeaderValue;

  #[test]
  fn tokens_are_random_hex() {
    let a = new_token();
    assert_eq!(a.len(), 64);
    assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    assert_ne!(a, new_token());
  }

  #[test]
  fn hash_is_stable_and_distinct_from_token() {
    assert_eq!(hash_token("abc"), hash_token("abc"));
    assert_ne!(hash_token("abc"), "abc");
    assert_eq!(hash_token("abc").len(), 64);
  }

  #[test]
  fn cookie_attributes() {
    let c = session_cookie("tok", 3600, false);
    assert_eq!(c, "sid=tok; HttpOnly; SameSite=Lax; Path=/; Max-Age=3600");
    assert!(session_cookie("tok", 3600, true).ends_with("; Secure"));
    assert!(clear_cookie(false).starts_with("sid=;"));
  }

  #[test]
  fn token_is_found_among_other_cookies() {
    let mut h = HeaderMap::new();
    h.insert(header::COOKIE, HeaderValue::from_static("theme=dark; sid=abc123; lang=en"));
    assert_eq!(token_from_headers(&h), Some("abc123"));

    let mut empty = HeaderMap::new();
    empty.insert(header::COOKIE, HeaderValue::from_static("sid="));
    assert_eq!(token_from_headers(&empty), None);
    assert_eq!(token_from_headers(&HeaderMap::new()), None);
  }
}
