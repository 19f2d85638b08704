//! HTTP layer for the Utsav marketplace.
//!
//! Exposes an axum [`Router`] serving accounts, the shop, the cart, ratings
//! and the admin dashboard, backed by any [`MarketStore`].

pub mod auth;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod session;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use utsav_core::{admin::AdminDispatcher, cart::CartAggregator, store::MarketStore};

use auth::AdminAuth;
use handlers::{account, admin, cart, catalog, rating};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `UTSAV_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                String,
  #[serde(default = "default_port")]
  pub port:                u16,
  #[serde(default = "default_store_path")]
  pub store_path:          PathBuf,
  #[serde(default = "default_session_ttl")]
  pub session_ttl_secs:    u64,
  /// Mark the session cookie `Secure`; enable behind TLS.
  #[serde(default)]
  pub secure_cookies:      bool,
  #[serde(default = "default_admin_username")]
  pub admin_username:      String,
  /// argon2 PHC string; generate with `server --hash-password`.
  pub admin_password_hash: String,
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 3000 }
fn default_store_path() -> PathBuf { PathBuf::from("utsav.db") }
fn default_session_ttl() -> u64 { 3600 }
fn default_admin_username() -> String { "admin".to_string() }

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: MarketStore> {
  pub store:      Arc<S>,
  pub carts:      CartAggregator<S>,
  pub admin:      AdminDispatcher<S>,
  pub config:     Arc<ServerConfig>,
  pub admin_auth: Arc<AdminAuth>,
}

impl<S: MarketStore> AppState<S> {
  /// Wire the cart aggregator and admin dispatcher to one shared store.
  pub fn new(store: Arc<S>, config: ServerConfig) -> Self {
    let admin_auth = AdminAuth {
      username:      config.admin_username.clone(),
      password_hash: config.admin_password_hash.clone(),
    };
    Self {
      carts: CartAggregator::new(Arc::clone(&store)),
      admin: AdminDispatcher::new(Arc::clone(&store)),
      store,
      config: Arc::new(config),
      admin_auth: Arc::new(admin_auth),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the marketplace.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: MarketStore + Clone + 'static,
{
  Router::new()
    .route("/health",                 get(|| async { "ok" }))
    .route("/join",                   post(account::join::<S>))
    .route("/login",                  post(account::login::<S>))
    .route("/logout",                 get(account::logout::<S>))
    .route("/dashboard",              get(account::dashboard::<S>))
    .route("/shop",                   get(catalog::shop::<S>))
    .route("/add-to-cart",            post(cart::add::<S>))
    .route("/update-cart",            post(cart::update::<S>))
    .route("/api/remove-from-cart",   post(cart::remove_api::<S>))
    .route("/remove-from-cart",       post(cart::remove_form::<S>))
    .route("/cart",                   get(cart::view::<S>))
    .route("/rate",                   post(rating::rate::<S>))
    .route("/admin",                  get(admin::overview::<S>))
    .route("/admin/{tag}",            post(admin::mutate::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
