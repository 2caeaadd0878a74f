use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use serde_json::json;

use crate::engine::{hub::Hub, store::Store};

#[derive(Debug, Serialize, Clone, PartialEq)]
pub enum AppError {
  BadRequest(String),
  InternalError(String),
}

impl std::fmt::Display for AppError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
      Self::InternalError(msg) => write!(f, "Internal error: {}", msg),
    }
  }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
  fn into_response(self) -> axum::response::Response {
    let (status, message) = match self {
      Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
      Self::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
    };

    let body = Json(json!({"error": message}));

    (status, body).into_response()
  }
}

// Shared by every route handler
#[derive(Clone)]
pub struct AppState {
  pub store: Store,
  pub hub: Hub
}

impl AppState {
  pub fn new(store: Store, hub: Hub) -> Self {
    Self { store, hub }
  }
}
