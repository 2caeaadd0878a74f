use std::time::Duration;
use futures_util::{SinkExt, StreamExt};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

use crate::{config::FinnhubConfig, engine::{hub::Hub, store::Store}, midwares::app_state::AppError};

const FINNHUB_WS_URL: &str = "wss://ws.finnhub.io?token=";
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
struct Trade {
  #[serde(rename = "s")]
  symbol: String,
  #[serde(rename = "p", with = "rust_decimal::serde::float")]
  price: Decimal,
  #[serde(rename = "t", default)]
  _time: i64,
  #[serde(rename = "v", default)]
  _volume: f64
}

#[derive(Debug, Deserialize)]
struct FinnhubMessage {
  #[serde(rename = "type")]
  kind: String,
  #[serde(default)]
  data: Vec<Trade>
}

/// Mirrors live trade prices from Finnhub into the store.
pub struct FinnhubClient {
  store: Store,
  hub: Hub,
  config: FinnhubConfig
}

impl FinnhubClient {
  pub fn new(store: Store, hub: Hub, config: FinnhubConfig) -> Self {
    Self { store, hub, config }
  }

  /// Applies one upstream message. Returns how many trades it carried.
  pub async fn apply_message(&self, raw: &str) -> Result<usize, AppError> {
    let msg = serde_json::from_str::<FinnhubMessage>(raw).map_err(|e| AppError::InternalError(e.to_string()))?;

    // pings and subscription acks
    if msg.kind != "trade" {
      debug!("ignoring finnhub message of type {}", msg.kind);
      return Ok(0);
    }

    for trade in &msg.data {
      self.store.update_price(&trade.symbol, trade.price).await;
    }

    let quotes = self.store.quotes().await;
    if !quotes.is_empty() {
      self.hub.publish(&quotes).await?;
    }
    Ok(msg.data.len())
  }

  async fn stream_trades(&self) -> Result<(), AppError> {
    let url = format!("{}{}", FINNHUB_WS_URL, self.config.api_key);
    let (ws, _) = connect_async(url.as_str()).await.map_err(|e| AppError::InternalError(e.to_string()))?;
    let (mut sender, mut receiver) = ws.split();

    for symbol in &self.config.symbols {
      let subscribe = json!({"type": "subscribe", "symbol": symbol}).to_string();
      if let Err(e) = sender.send(Message::text(subscribe)).await {
        error!("subscribing to {} failed: {}", symbol, e);
      }
    }
    info!("connected to finnhub for {} symbols", self.config.symbols.len());

    while let Some(msg) = receiver.next().await {
      match msg.map_err(|e| AppError::InternalError(e.to_string()))? {
        Message::Text(t) => {
          if let Err(e) = self.apply_message(t.as_str()).await {
            error!("bad finnhub message: {}", e);
          }
        },
        Message::Close(_) => break,
        _ => {}
      }
    }
    Err(AppError::InternalError("finnhub closed the connection".to_string()))
  }

  pub async fn run(self) {
    loop {
      if let Err(e) = self.stream_trades().await {
        warn!("{}, reconnecting in {:?}", e, RECONNECT_DELAY);
      }
      tokio::time::sleep(RECONNECT_DELAY).await;
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal_macros::dec;

  fn client() -> FinnhubClient {
    let config = FinnhubConfig { api_key: "test".to_string(), symbols: vec!["AAPL".to_string()] };
    FinnhubClient::new(Store::new(), Hub::new(8), config)
  }

  #[tokio::test]
  async fn trades_update_store_and_publish() {
    let client = client();
    let (_, mut rx) = client.hub.subscribe().await;

    let applied = client.apply_message(r#"{"type":"trade","data":[
      {"s":"AAPL","p":150.5,"t":1700000000000,"v":10},
      {"s":"BINANCE:BTCUSDT","p":43000.12,"t":1700000000001,"v":0.01}
    ]}"#).await.unwrap();

    assert_eq!(applied, 2);
    let quotes = client.store.quotes().await;
    assert_eq!(quotes[0].symbol, "AAPL");
    assert_eq!(quotes[0].price, dec!(150.5));
    assert_eq!(quotes[1].price, dec!(43000.12));
    assert!(rx.recv().await.unwrap().as_str().contains("BINANCE:BTCUSDT"));
  }

  #[tokio::test]
  async fn repeated_trades_track_change() {
    let client = client();
    client.apply_message(r#"{"type":"trade","data":[{"s":"AAPL","p":100,"t":1,"v":1}]}"#).await.unwrap();
    client.apply_message(r#"{"type":"trade","data":[{"s":"AAPL","p":101,"t":2,"v":1}]}"#).await.unwrap();
    assert_eq!(client.store.quotes().await[0].last_change, dec!(1));
  }

  #[tokio::test]
  async fn non_trade_messages_are_ignored() {
    let client = client();
    assert_eq!(client.apply_message(r#"{"type":"ping"}"#).await.unwrap(), 0);
    assert!(client.store.is_empty().await);
    let (latest, _) = client.hub.subscribe().await;
    assert!(latest.is_none());
  }

  #[tokio::test]
  async fn malformed_messages_error() {
    let client = client();
    let err = client.apply_message("not json").await.unwrap_err();
    assert!(matches!(err, AppError::InternalError(_)));
  }
}
