//! Admin dashboard and the typed mutation endpoint shared by all four
//! entity collections.

use axum::{
  Json,
  extract::{Path, State},
  response::{IntoResponse, Redirect, Response},
};
use utsav_core::{
  admin::{AdminOverview, RawFields},
  store::MarketStore,
};

use crate::{AppState, auth::Admin, error::Error, extract::FormBody};

pub async fn overview<S>(
  State(state): State<AppState<S>>,
  _admin: Admin,
) -> Result<Json<AdminOverview>, Error>
where
  S: MarketStore + Clone + 'static,
{
  Ok(Json(state.admin.overview().await?))
}

/// `POST /admin/{tag}` with a form carrying `action` and the entity fields.
pub async fn mutate<S>(
  State(state): State<AppState<S>>,
  _admin: Admin,
  Path(tag): Path<String>,
  FormBody(mut fields): FormBody<RawFields>,
) -> Result<Response, Error>
where
  S: MarketStore + Clone + 'static,
{
  let action = fields.remove("action").unwrap_or_default();
  let outcome = state.admin.apply(action.trim(), &tag, &fields).await?;
  tracing::info!(%tag, %action, ?outcome, "admin mutation");
  Ok(Redirect::to("/admin").into_response())
}
