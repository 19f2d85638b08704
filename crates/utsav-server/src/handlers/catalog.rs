//! Shop listing and the standard shop catalog.

use axum::{Json, extract::State};
use serde_json::json;
use utsav_core::{
  catalog::{ItemType, NewCatalogItem},
  store::MarketStore,
};

use crate::{AppState, error::Error, session::PageUser};

/// `(name, price, original price, discount, image)` of the standard shop.
const SHOP_ITEMS: [(&str, f64, f64, &str, &str); 8] = [
  ("Imitation Wedding Ring", 4000.0, 4999.0, "20%", "s1.jpg"),
  ("Bridal MakeUp Kit", 1999.0, 2499.0, "20%", "s2.jpg"),
  ("Wedding Cake", 1499.0, 1875.0, "20%", "s3.jpg"),
  ("Decoration Flowers", 1750.0, 2187.0, "20%", "s4.jpg"),
  ("Birthday Balloons", 400.0, 499.0, "20%", "s5.jpg"),
  ("Soft Teddy", 325.0, 499.0, "35%", "s6.jpg"),
  ("Car Decoration", 4000.0, 4999.0, "20%", "s7.jpg"),
  ("Mehendi", 400.0, 499.0, "20%", "s8.jpg"),
];

/// Insert the standard shop items unless the shop already has stock.
/// Returns how many items were inserted.
pub async fn seed_shop<S: MarketStore>(store: &S) -> Result<usize, S::Error> {
  if !store.list_catalog(ItemType::Shop).await?.is_empty() {
    return Ok(0);
  }
  for (name, price, original, discount, image) in SHOP_ITEMS {
    store
      .insert_catalog_item(
        NewCatalogItem::shop(name, price)
          .with_attribute("original", original)
          .with_attribute("discount", discount)
          .with_attribute("image", image),
      )
      .await?;
  }
  Ok(SHOP_ITEMS.len())
}

pub async fn shop<S>(
  State(state): State<AppState<S>>,
  PageUser(user_id): PageUser,
) -> Result<Json<serde_json::Value>, Error>
where
  S: MarketStore + Clone + 'static,
{
  let products = state
    .store
    .list_catalog(ItemType::Shop)
    .await
    .map_err(Error::internal)?;
  let cart_count = state.carts.item_count(user_id).await?;
  Ok(Json(json!({ "products": products, "cartCount": cart_count })))
}
