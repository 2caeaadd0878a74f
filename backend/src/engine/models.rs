use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
  pub symbol: String,
  #[serde(with = "rust_decimal::serde::float")]
  pub price: Decimal,
  // percentage change against the previous price
  #[serde(with = "rust_decimal::serde::float")]
  pub last_change: Decimal
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
  Buy,
  Sell
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  Filled
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewOrder {
  pub symbol: String,
  pub side: Side,
  pub quantity: i64,
  #[serde(with = "rust_decimal::serde::float")]
  pub price: Decimal
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
  pub id: String,
  pub symbol: String,
  pub side: Side,
  pub quantity: u32,
  #[serde(with = "rust_decimal::serde::float")]
  pub price: Decimal,
  pub timestamp: DateTime<Utc>,
  pub status: OrderStatus
}

impl NewOrder {
  /// Checks the request and stamps it into a filled order.
  pub fn fill(self) -> Option<Order> {
    let quantity = u32::try_from(self.quantity).ok().filter(|q| *q > 0)?;
    if self.symbol.is_empty() || self.price <= Decimal::ZERO {
      return None;
    }

    Some(Order {
      id: Uuid::new_v4().to_string(),
      symbol: self.symbol,
      side: self.side,
      quantity,
      price: self.price,
      timestamp: Utc::now(),
      status: OrderStatus::Filled
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal_macros::dec;

  fn request(symbol: &str, quantity: i64, price: Decimal) -> NewOrder {
    NewOrder { symbol: symbol.to_string(), side: Side::Buy, quantity, price }
  }

  #[test]
  fn valid_request_is_filled() {
    let order = request("AAPL", 10, dec!(150)).fill().unwrap();
    assert_eq!(order.quantity, 10);
    assert_eq!(order.status, OrderStatus::Filled);
    assert!(Uuid::parse_str(&order.id).is_ok());
  }

  #[test]
  fn invalid_requests_are_rejected() {
    assert!(request("", 10, dec!(150)).fill().is_none());
    assert!(request("AAPL", 0, dec!(150)).fill().is_none());
    assert!(request("AAPL", -3, dec!(150)).fill().is_none());
    assert!(request("AAPL", 10, dec!(0)).fill().is_none());
    assert!(request("AAPL", 10, dec!(-1.5)).fill().is_none());
  }
}
