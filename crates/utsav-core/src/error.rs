//! Error types for `utsav-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("item not found")]
  ItemNotFound,

  #[error("cart not found")]
  CartNotFound,

  #[error("invalid input: {0}")]
  InvalidInput(String),

  #[error("unknown entity type: {0:?}")]
  UnknownEntityType(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Box a backend error into [`Error::Store`].
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }

  pub fn invalid(msg: impl Into<String>) -> Self { Self::InvalidInput(msg.into()) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
