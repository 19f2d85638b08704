use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::json;
use utsav_core::{account::NewRating, store::MarketStore};

use crate::{
  AppState,
  error::Error,
  extract::JsonBody,
  handlers::{Lenient, opt_f64},
};

#[derive(Debug, Deserialize)]
pub struct RateRequest {
  #[serde(default)]
  pub name:   String,
  #[serde(default)]
  pub review: String,
  #[serde(default)]
  pub rating: Option<Lenient>,
}

pub async fn rate<S>(
  State(state): State<AppState<S>>,
  JsonBody(req): JsonBody<RateRequest>,
) -> Result<Json<serde_json::Value>, Error>
where
  S: MarketStore + Clone + 'static,
{
  if req.name.trim().is_empty() || req.review.trim().is_empty() {
    return Err(Error::bad_request("All fields are required"));
  }
  let score = opt_f64(&req.rating, "rating")?
    .ok_or_else(|| Error::bad_request("All fields are required"))?;

  state
    .store
    .record_rating(NewRating {
      name: req.name.trim().to_string(),
      review: req.review,
      score,
    })
    .await
    .map_err(Error::internal)?;

  Ok(Json(json!({ "message": "Rating submitted" })))
}
