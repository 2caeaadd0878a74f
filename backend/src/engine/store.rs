use std::{collections::BTreeMap, sync::Arc};
use futures::lock::Mutex;
use rust_decimal::Decimal;

use super::models::{Order, Stock};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

#[derive(Default)]
struct StoreData {
  stocks: BTreeMap<String, Stock>,
  orders: Vec<Order>
}

// In-memory quotes and order log, shared by handlers and price sources
#[derive(Clone, Default)]
pub struct Store {
  data: Arc<Mutex<StoreData>>
}

impl Store {
  pub fn new() -> Self {
    Self::default()
  }

  /// Quotes in symbol order.
  pub async fn quotes(&self) -> Vec<Stock> {
    let data = self.data.lock().await;
    data.stocks.values().cloned().collect()
  }

  pub async fn is_empty(&self) -> bool {
    self.data.lock().await.stocks.is_empty()
  }

  /// Sets a new price and derives `last_change`. Unknown symbols are added unchanged.
  pub async fn update_price(&self, symbol: &str, new_price: Decimal) {
    let mut data = self.data.lock().await;

    match data.stocks.get_mut(symbol) {
      Some(stock) => {
        if !stock.price.is_zero() {
          stock.last_change = ((new_price - stock.price) / stock.price * HUNDRED).round_dp(4);
        }
        stock.price = new_price;
      },
      None => {
        data.stocks.insert(symbol.to_string(), Stock {
          symbol: symbol.to_string(),
          price: new_price,
          last_change: Decimal::ZERO
        });
      }
    }
  }

  pub async fn add_order(&self, order: Order) {
    self.data.lock().await.orders.push(order);
  }

  pub async fn orders(&self) -> Vec<Order> {
    self.data.lock().await.orders.clone()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal_macros::dec;

  #[tokio::test]
  async fn new_symbol_starts_without_change() {
    let store = Store::new();
    store.update_price("TSLA", dec!(700)).await;
    store.update_price("AAPL", dec!(150)).await;

    let quotes = store.quotes().await;
    assert_eq!(quotes.len(), 2);
    // listed in symbol order
    assert_eq!(quotes[0].symbol, "AAPL");
    assert_eq!(quotes[1].last_change, dec!(0));
  }

  #[tokio::test]
  async fn change_is_percentage_of_previous_price() {
    let store = Store::new();
    store.update_price("AAPL", dec!(150)).await;
    store.update_price("AAPL", dec!(153)).await;

    let quote = &store.quotes().await[0];
    assert_eq!(quote.price, dec!(153));
    assert_eq!(quote.last_change, dec!(2));

    store.update_price("AAPL", dec!(149.94)).await;
    assert_eq!(store.quotes().await[0].last_change, dec!(-2));
  }

  #[tokio::test]
  async fn zero_price_skips_change() {
    let store = Store::new();
    store.update_price("ZERO", dec!(0)).await;
    store.update_price("ZERO", dec!(5)).await;
    assert_eq!(store.quotes().await[0].last_change, dec!(0));
  }
}
