//! Error types and axum `IntoResponse` implementation.

use axum::{
  Json,
  extract::rejection::{FormRejection, JsonRejection},
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// No valid session cookie.
  #[error("not logged in")]
  Unauthenticated,
  /// Admin Basic credentials missing or wrong.
  #[error("unauthorized")]
  Unauthorized,
  /// Login attempt with the wrong password.
  #[error("incorrect password")]
  IncorrectPassword,
  #[error("{0}")]
  BadRequest(String),
  #[error("{0}")]
  NotFound(String),
  #[error("internal error: {0}")]
  Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn bad_request(msg: impl Into<String>) -> Self { Self::BadRequest(msg.into()) }

  /// Box a backend error into [`Error::Internal`].
  pub fn internal<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Internal(Box::new(e))
  }
}

impl From<utsav_core::Error> for Error {
  fn from(e: utsav_core::Error) -> Self {
    use utsav_core::Error as Core;
    match e {
      Core::ItemNotFound => Error::NotFound("Item not found".to_string()),
      Core::CartNotFound => Error::BadRequest("Cart not found".to_string()),
      Core::InvalidInput(msg) => Error::BadRequest(msg),
      e @ Core::UnknownEntityType(_) => Error::BadRequest(e.to_string()),
      Core::Store(e) => Error::Internal(e),
    }
  }
}

impl From<JsonRejection> for Error {
  fn from(rejection: JsonRejection) -> Self { Error::BadRequest(rejection.body_text()) }
}

impl From<FormRejection> for Error {
  fn from(rejection: FormRejection) -> Self { Error::BadRequest(rejection.body_text()) }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      Error::Unauthenticated => (StatusCode::UNAUTHORIZED, "Not logged in".to_string()),
      Error::Unauthorized => {
        let mut res = (
          StatusCode::UNAUTHORIZED,
          Json(json!({ "error": "Unauthorized" })),
        )
          .into_response();
        res.headers_mut().insert(
          header::WWW_AUTHENTICATE,
          HeaderValue::from_static("Basic realm=\"utsav-admin\""),
        );
        return res;
      }
      Error::IncorrectPassword => {
        (StatusCode::UNAUTHORIZED, "Incorrect password.".to_string())
      }
      Error::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      Error::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      Error::Internal(e) => {
        tracing::error!(error = %e, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn core_errors_map_to_statuses() {
    let cases = [
      (utsav_core::Error::ItemNotFound, StatusCode::NOT_FOUND),
      (utsav_core::Error::CartNotFound, StatusCode::BAD_REQUEST),
      (utsav_core::Error::invalid("bad"), StatusCode::BAD_REQUEST),
      (utsav_core::Error::UnknownEntityType("x".into()), StatusCode::BAD_REQUEST),
      (
        utsav_core::Error::store(std::io::Error::other("disk gone")),
        StatusCode::INTERNAL_SERVER_ERROR,
      ),
    ];
    for (core, status) in cases {
      assert_eq!(Error::from(core).into_response().status(), status);
    }
  }

  #[test]
  fn unauthorized_carries_challenge() {
    let res = Error::Unauthorized.into_response();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.headers().contains_key(header::WWW_AUTHENTICATE));
  }
}
