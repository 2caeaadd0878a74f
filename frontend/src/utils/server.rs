use std::{fmt, str::FromStr};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/* Server Requests */
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewOrder {
  pub symbol: String,
  pub side: Side,
  pub quantity: u32,
  #[serde(with = "rust_decimal::serde::float")]
  pub price: Decimal
}

/* Server Responses */
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PriceQuote {
  pub symbol: String,
  #[serde(with = "rust_decimal::serde::float")]
  pub price: Decimal,
  #[serde(with = "rust_decimal::serde::float")]
  pub last_change: Decimal
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Order {
  pub id: String,
  pub symbol: String,
  pub side: Side,
  pub quantity: u32,
  #[serde(with = "rust_decimal::serde::float")]
  pub price: Decimal,
  pub timestamp: DateTime<Utc>,
  // the server fills every order on arrival
  #[serde(default)]
  pub status: OrderStatus
}

#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
  pub error: Option<String>
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
  #[default]
  Buy,
  Sell
}

impl fmt::Display for Side {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Buy => write!(f, "buy"),
      Self::Sell => write!(f, "sell"),
    }
  }
}

impl FromStr for Side {
  type Err = AppError;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "buy" => Ok(Side::Buy),
      "sell" => Ok(Side::Sell),
      _ => Err(AppError::InvalidInput(format!("Unknown order side: {}", s)))
    }
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  #[default]
  Filled
}

impl fmt::Display for OrderStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Filled => write!(f, "Filled"),
    }
  }
}

// App Errors
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
  WsConnectionError(String),
  ReqwestError(String),
  ServerError(String),
  DeserializeError(String),
  InvalidInput(String),
}

impl std::error::Error for AppError {}

impl fmt::Display for AppError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      AppError::WsConnectionError(msg) => write!(f, "Websocket connection error: {}", msg),
      AppError::ReqwestError(msg) => write!(f, "Network error: {}", msg),
      // shown to the user as the server wrote it
      AppError::ServerError(msg) => write!(f, "{}", msg),
      AppError::DeserializeError(msg) => write!(f, "Deserialize error: {}", msg),
      AppError::InvalidInput(msg) => write!(f, "{}", msg),
    }
  }
}
