//! Body extractors whose rejections render as the API's `{"error": …}` 400.
//!
//! axum's own `Json` and `Form` reject with plain-text 415/422 responses.
//! These wrappers deserialize the same way but route failures through
//! [`Error::BadRequest`].

use axum::extract::FromRequest;

use crate::error::Error;

/// A JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct JsonBody<T>(pub T);

/// A URL-encoded form body (or query string, on `GET`).
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Form), rejection(Error))]
pub struct FormBody<T>(pub T);
