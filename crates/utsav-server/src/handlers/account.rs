//! Registration, login, logout and the dashboard.

use axum::{
  Json,
  extract::State,
  http::{HeaderMap, StatusCode, header},
  response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use utsav_core::{account::NewUser, store::MarketStore};

use crate::{
  AppState,
  auth::{hash_password, verify_password},
  error::Error,
  extract::{FormBody, JsonBody},
  session::{self, PageUser},
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JoinRequest {
  pub purpose:               String,
  pub username:              String,
  pub gender:                String,
  pub dob:                   String,
  pub religion:              String,
  pub country:               String,
  pub join_email:            String,
  pub mobile:                String,
  pub join_password:         String,
  pub join_confirm_password: String,
}

impl JoinRequest {
  fn is_complete(&self) -> bool {
    [
      &self.purpose,
      &self.username,
      &self.gender,
      &self.dob,
      &self.religion,
      &self.country,
      &self.join_email,
      &self.mobile,
      &self.join_password,
      &self.join_confirm_password,
    ]
    .iter()
    .all(|f| !f.trim().is_empty())
  }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginForm {
  pub login_email:    String,
  pub login_password: String,
}

pub async fn join<S>(
  State(state): State<AppState<S>>,
  JsonBody(req): JsonBody<JoinRequest>,
) -> Result<Response, Error>
where
  S: MarketStore + Clone + 'static,
{
  if !req.is_complete() {
    return Err(Error::bad_request("All fields are required"));
  }
  if req.join_password != req.join_confirm_password {
    return Err(Error::bad_request("Passwords do not match"));
  }
  let dob = NaiveDate::parse_from_str(req.dob.trim(), "%Y-%m-%d")
    .map_err(|_| Error::bad_request("dob must be a YYYY-MM-DD date"))?;

  let email = req.join_email.trim().to_string();
  let existing = state
    .store
    .find_user_by_email(&email)
    .await
    .map_err(Error::internal)?;
  if existing.is_some() {
    return Err(Error::bad_request("Email already registered"));
  }

  let password_hash = hash_password(&req.join_password)
    .map_err(|e| Error::Internal(format!("argon2 error: {e}").into()))?;

  let created = state
    .store
    .create_user(NewUser {
      username: req.username,
      email,
      password_hash,
      purpose: req.purpose,
      gender: req.gender,
      dob,
      religion: req.religion,
      country: req.country,
      mobile: req.mobile,
    })
    .await
    .map_err(Error::internal)?
    // Lost a race with a concurrent registration for the same email.
    .ok_or_else(|| Error::bad_request("Email already registered"))?;

  tracing::info!(user_id = %created.user_id, "user registered");
  Ok(
    (
      StatusCode::CREATED,
      Json(json!({ "message": "User registered successfully!" })),
    )
      .into_response(),
  )
}

pub async fn login<S>(
  State(state): State<AppState<S>>,
  FormBody(form): FormBody<LoginForm>,
) -> Result<Response, Error>
where
  S: MarketStore + Clone + 'static,
{
  let user = state
    .store
    .find_user_by_email(form.login_email.trim())
    .await
    .map_err(Error::internal)?
    .ok_or_else(|| Error::bad_request("User not found."))?;

  if !verify_password(&form.login_password, &user.password_hash) {
    return Err(Error::IncorrectPassword);
  }

  let cookie = session::start(&state, user.user_id).await?;
  tracing::debug!(user_id = %user.user_id, "session started");
  Ok(
    (
      AppendHeaders([(header::SET_COOKIE, cookie)]),
      Redirect::to("/dashboard"),
    )
      .into_response(),
  )
}

pub async fn logout<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
) -> Result<Response, Error>
where
  S: MarketStore + Clone + 'static,
{
  session::end(&state, &headers).await?;
  let cookie = session::clear_cookie(state.config.secure_cookies);
  Ok((AppendHeaders([(header::SET_COOKIE, cookie)]), Redirect::to("/")).into_response())
}

pub async fn dashboard<S>(
  State(state): State<AppState<S>>,
  PageUser(user_id): PageUser,
) -> Result<Response, Error>
where
  S: MarketStore + Clone + 'static,
{
  let user = state.store.get_user(user_id).await.map_err(Error::internal)?;
  Ok(match user {
    Some(user) => Json(user).into_response(),
    None => Redirect::to("/").into_response(),
  })
}
