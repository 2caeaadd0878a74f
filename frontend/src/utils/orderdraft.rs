use std::str::FromStr;
use dioxus::{html::geometry::PixelsRect, logger::tracing::warn};
use rust_decimal::{Decimal, RoundingStrategy};

use super::server::{AppError, NewOrder, Order, PriceQuote, Side};

// Unsaved order form input, kept as typed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderDraft {
  pub symbol: String,
  pub side: Side,
  pub quantity: String,
  pub price: String
}

impl OrderDraft {
  pub fn set_field(&mut self, name: &str, value: &str) {
    match name {
      "symbol" => self.symbol = value.to_string(),
      "side" => match Side::from_str(value) {
        Ok(side) => self.side = side,
        Err(e) => warn!("ignoring side update: {}", e)
      },
      "quantity" => self.quantity = value.to_string(),
      "price" => self.price = value.to_string(),
      _ => warn!("unknown order form field: {}", name)
    }
  }

  /// Fills symbol and price from an autocomplete candidate.
  pub fn select(&mut self, quote: &PriceQuote) {
    self.symbol = quote.symbol.clone();
    self.price = two_dp(quote.price);
  }

  pub fn to_request(&self) -> Result<NewOrder, AppError> {
    let quantity = parse_quantity(&self.quantity)
      .ok_or_else(|| AppError::InvalidInput("Quantity must be a whole number of shares".to_string()))?;
    let price = Decimal::from_str(self.price.trim())
      .map_err(|_| AppError::InvalidInput("Price must be a number".to_string()))?;

    Ok(NewOrder {
      symbol: self.symbol.clone(),
      side: self.side,
      quantity,
      price
    })
  }

  /// Applies a submit outcome. Success clears the form; failure keeps the
  /// draft as typed and returns the message to show.
  pub fn settle(&mut self, result: Result<Order, AppError>) -> Option<String> {
    match result {
      Ok(_) => {
        *self = Self::default();
        None
      },
      Err(e) => Some(e.to_string())
    }
  }
}

/// Two-decimal display, rounding half away from zero.
pub fn two_dp(value: Decimal) -> String {
  format!("{:.2}", value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

// leading integer part, "12.7" -> 12
fn parse_quantity(raw: &str) -> Option<u32> {
  let digits: String = raw.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
  digits.parse::<u32>().ok()
}

/// Quotes whose symbol starts with `typed`, ignoring case. Empty input suggests nothing.
pub fn suggest(prices: &[PriceQuote], typed: &str) -> Vec<PriceQuote> {
  if typed.is_empty() {
    return vec![];
  }
  let prefix = typed.to_lowercase();
  prices.iter()
    .filter(|quote| quote.symbol.to_lowercase().starts_with(&prefix))
    .cloned()
    .collect()
}

// Bounding box of the symbol field in client coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
  pub left: f64,
  pub top: f64,
  pub width: f64,
  pub height: f64
}

impl Region {
  pub fn contains(&self, x: f64, y: f64) -> bool {
    x >= self.left && x <= self.left + self.width && y >= self.top && y <= self.top + self.height
  }
}

impl From<PixelsRect> for Region {
  fn from(rect: PixelsRect) -> Self {
    Self {
      left: rect.origin.x,
      top: rect.origin.y,
      width: rect.size.width,
      height: rect.size.height
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal_macros::dec;
  use serde_json::json;

  fn quote(symbol: &str, price: Decimal) -> PriceQuote {
    PriceQuote { symbol: symbol.to_string(), price, last_change: dec!(0) }
  }

  fn board() -> Vec<PriceQuote> {
    vec![quote("AAPL", dec!(150)), quote("AMZN", dec!(3400)), quote("aal", dec!(14.2)), quote("TSLA", dec!(700))]
  }

  #[test]
  fn suggests_case_insensitive_prefix_matches() {
    let symbols: Vec<String> = suggest(&board(), "aA").into_iter().map(|q| q.symbol).collect();
    assert_eq!(symbols, vec!["AAPL", "aal"]);

    let symbols: Vec<String> = suggest(&board(), "a").into_iter().map(|q| q.symbol).collect();
    assert_eq!(symbols, vec!["AAPL", "AMZN", "aal"]);
  }

  #[test]
  fn empty_input_suggests_nothing() {
    assert!(suggest(&board(), "").is_empty());
    assert!(suggest(&board(), "ZZ").is_empty());
  }

  #[test]
  fn valid_draft_becomes_request_body() {
    let mut draft = OrderDraft::default();
    draft.set_field("symbol", "AAPL");
    draft.set_field("side", "buy");
    draft.set_field("quantity", "10");
    draft.set_field("price", "150.00");

    let body = serde_json::to_value(draft.to_request().unwrap()).unwrap();
    assert_eq!(body, json!({"symbol": "AAPL", "side": "buy", "quantity": 10, "price": 150.0}));
  }

  #[test]
  fn default_draft_is_blank_buy() {
    let draft = OrderDraft::default();
    assert_eq!(draft, OrderDraft { symbol: "".into(), side: Side::Buy, quantity: "".into(), price: "".into() });
  }

  #[test]
  fn quantity_keeps_leading_integer() {
    assert_eq!(parse_quantity("12.7"), Some(12));
    assert_eq!(parse_quantity(" 5 "), Some(5));
    assert_eq!(parse_quantity("abc"), None);
    assert_eq!(parse_quantity(""), None);
  }

  #[test]
  fn bad_price_is_reported_inline() {
    let draft = OrderDraft { symbol: "AAPL".into(), side: Side::Sell, quantity: "1".into(), price: "".into() };
    assert_eq!(draft.to_request(), Err(AppError::InvalidInput("Price must be a number".to_string())));
  }

  #[test]
  fn selecting_candidate_fills_two_decimal_price() {
    let mut draft = OrderDraft::default();
    draft.select(&quote("MSFT", dec!(151.23)));
    assert_eq!(draft.symbol, "MSFT");
    assert_eq!(draft.price, "151.23");

    draft.select(&quote("GOOGL", dec!(2800)));
    assert_eq!(draft.price, "2800.00");
  }

  #[test]
  fn selected_price_is_rounded_not_cut() {
    let mut draft = OrderDraft::default();
    draft.select(&quote("MSFT", dec!(151.2399)));
    assert_eq!(draft.price, "151.24");

    assert_eq!(two_dp(dec!(151.225)), "151.23");
    assert_eq!(two_dp(dec!(151.2249)), "151.22");
    assert_eq!(two_dp(dec!(-0.125)), "-0.13");
  }

  fn filled_draft() -> OrderDraft {
    OrderDraft { symbol: "AAPL".into(), side: Side::Sell, quantity: "10".into(), price: "150.00".into() }
  }

  #[test]
  fn failed_submit_keeps_draft_and_shows_server_text() {
    let mut draft = filled_draft();
    let err = crate::utils::api::error_from_body(br#"{"error":"insufficient funds"}"#, "Failed to create order");

    assert_eq!(draft.settle(Err(err)), Some("insufficient funds".to_string()));
    assert_eq!(draft, filled_draft());
  }

  #[test]
  fn successful_submit_resets_to_blank_buy() {
    let mut draft = filled_draft();
    let order: Order = serde_json::from_value(json!({
      "id": "o-1", "symbol": "AAPL", "side": "sell", "quantity": 10, "price": 150.0,
      "timestamp": "2024-03-01T08:00:00Z", "status": "filled"
    })).unwrap();

    assert_eq!(draft.settle(Ok(order)), None);
    assert_eq!(draft, OrderDraft::default());
  }

  #[test]
  fn region_detects_outside_presses() {
    let region = Region { left: 10.0, top: 20.0, width: 100.0, height: 30.0 };
    assert!(region.contains(10.0, 20.0));
    assert!(region.contains(60.0, 35.0));
    assert!(!region.contains(111.0, 35.0));
    assert!(!region.contains(60.0, 51.0));
  }
}
