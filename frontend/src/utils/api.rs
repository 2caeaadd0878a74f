use serde::de::DeserializeOwned;

use super::server::{AppError, ErrorResponse, NewOrder, Order, PriceQuote};

const PRICES_FALLBACK: &str = "Failed to fetch prices";
const ORDERS_FALLBACK: &str = "Failed to fetch orders";
const CREATE_FALLBACK: &str = "Failed to create order";

// REST client for the trading backend
#[derive(Clone)]
pub struct ApiClient {
  client: reqwest::Client,
  base_url: String
}

impl ApiClient {
  pub fn new(client: reqwest::Client, base_url: &str) -> Self {
    Self {
      client,
      base_url: base_url.trim_end_matches('/').to_string()
    }
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.base_url, path)
  }

  pub async fn fetch_prices(&self) -> Result<Vec<PriceQuote>, AppError> {
    let req = self.client.get(self.url("/prices"));
    Self::dispatch(req, PRICES_FALLBACK).await
  }

  pub async fn fetch_orders(&self) -> Result<Vec<Order>, AppError> {
    let req = self.client.get(self.url("/orders"));
    Self::dispatch(req, ORDERS_FALLBACK).await
  }

  pub async fn create_order(&self, order: &NewOrder) -> Result<Order, AppError> {
    let req = self.client.post(self.url("/orders")).json(order);
    Self::dispatch(req, CREATE_FALLBACK).await
  }

  async fn dispatch<T: DeserializeOwned>(req: reqwest::RequestBuilder, fallback: &str) -> Result<T, AppError> {
    let resp = req.send().await.map_err(|e| AppError::ReqwestError(e.to_string()))?;
    let status = resp.status();
    let body = resp.bytes().await.map_err(|e| AppError::ReqwestError(e.to_string()))?;

    if !status.is_success() {
      return Err(error_from_body(&body, fallback));
    }
    serde_json::from_slice::<T>(&body).map_err(|e| AppError::DeserializeError(e.to_string()))
  }
}

/// Builds the error for a non-success response, preferring the server's `error` text.
pub fn error_from_body(body: &[u8], fallback: &str) -> AppError {
  let server_msg = serde_json::from_slice::<ErrorResponse>(body)
    .ok()
    .and_then(|resp| resp.error)
    .filter(|msg| !msg.is_empty());

  AppError::ServerError(server_msg.unwrap_or_else(|| fallback.to_string()))
}
