//! Cart endpoints. All of them act on the signed-in user's cart only.

use axum::{
  Json,
  extract::State,
  response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utsav_core::{
  cart::{CartLine, LineKey, LineSnapshot},
  catalog::ItemType,
  id::ItemId,
  store::MarketStore,
};

use crate::{
  AppState,
  error::Error,
  extract::{FormBody, JsonBody},
  handlers::{Lenient, opt_f64, opt_i64},
  session::{CurrentUser, PageUser},
};

// ─── Request bodies ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineRef {
  pub item_id:   String,
  pub item_type: String,
}

impl LineRef {
  fn key(&self) -> Result<LineKey, Error> {
    Ok(LineKey {
      item_id:   self.item_id.trim().parse::<ItemId>()?,
      item_type: self.item_type.trim().parse::<ItemType>()?,
    })
  }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCart {
  #[serde(flatten)]
  pub line:     LineRef,
  #[serde(default)]
  pub quantity: Option<Lenient>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCart {
  #[serde(flatten)]
  pub line:       LineRef,
  #[serde(default)]
  pub quantity:   Option<Lenient>,
  #[serde(default)]
  pub name:       Option<String>,
  #[serde(default)]
  pub unit_price: Option<Lenient>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartPage {
  pub items:      Vec<CartLine>,
  pub total:      f64,
  pub cart_count: i64,
}

// ─── Handlers ────────────────────────────────────────────────────────────────

pub async fn add<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user_id): CurrentUser,
  JsonBody(req): JsonBody<AddToCart>,
) -> Result<Json<serde_json::Value>, Error>
where
  S: MarketStore + Clone + 'static,
{
  let key      = req.line.key()?;
  let quantity = opt_i64(&req.quantity, "quantity")?;

  let cart_count = state
    .carts
    .add_item(user_id, key.item_type, key.item_id, quantity)
    .await?;

  tracing::debug!(%user_id, item_id = %key.item_id, item_type = %key.item_type, cart_count, "added to cart");
  Ok(Json(json!({ "cartCount": cart_count })))
}

pub async fn update<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user_id): CurrentUser,
  JsonBody(req): JsonBody<UpdateCart>,
) -> Result<Json<serde_json::Value>, Error>
where
  S: MarketStore + Clone + 'static,
{
  let key = req.line.key()?;
  let quantity = opt_i64(&req.quantity, "quantity")?
    .ok_or_else(|| Error::bad_request("quantity is required"))?;
  let snapshot = LineSnapshot {
    name:       req.name.filter(|n| !n.trim().is_empty()),
    unit_price: opt_f64(&req.unit_price, "unitPrice")?,
  };

  let cart_count = state
    .carts
    .update_quantity(user_id, key, quantity, snapshot)
    .await?;

  Ok(Json(json!({ "message": "Cart updated", "cartCount": cart_count })))
}

pub async fn remove_api<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user_id): CurrentUser,
  JsonBody(req): JsonBody<LineRef>,
) -> Result<Json<serde_json::Value>, Error>
where
  S: MarketStore + Clone + 'static,
{
  let cart_count = state.carts.remove_item(user_id, req.key()?).await?;
  Ok(Json(json!({ "message": "Item removed", "cartCount": cart_count })))
}

pub async fn remove_form<S>(
  State(state): State<AppState<S>>,
  PageUser(user_id): PageUser,
  FormBody(req): FormBody<LineRef>,
) -> Result<Response, Error>
where
  S: MarketStore + Clone + 'static,
{
  state.carts.remove_item(user_id, req.key()?).await?;
  Ok(Redirect::to("/cart").into_response())
}

pub async fn view<S>(
  State(state): State<AppState<S>>,
  PageUser(user_id): PageUser,
) -> Result<Json<CartPage>, Error>
where
  S: MarketStore + Clone + 'static,
{
  let view = state.carts.cart_view(user_id).await?;
  Ok(Json(CartPage {
    items:      view.lines,
    total:      view.total_price,
    cart_count: view.item_count,
  }))
}
