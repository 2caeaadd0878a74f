use std::sync::Arc;
use axum::extract::ws::Utf8Bytes;
use futures::lock::Mutex;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::debug;

use crate::midwares::app_state::AppError;
use super::models::Stock;

/// Fans price snapshots out to every connected feed socket. Each snapshot is
/// serialized once and remembered so late subscribers start from it.
#[derive(Clone)]
pub struct Hub {
  tx: broadcast::Sender<Utf8Bytes>,
  latest: Arc<Mutex<Option<Utf8Bytes>>>
}

impl Hub {
  pub fn new(capacity: usize) -> Self {
    let (tx, _) = broadcast::channel(capacity);
    Self { tx, latest: Arc::new(Mutex::new(None)) }
  }

  pub async fn publish(&self, stocks: &[Stock]) -> Result<usize, AppError> {
    let json_data = serde_json::to_string(stocks).map_err(|e| AppError::InternalError(e.to_string()))?;
    let snapshot = Utf8Bytes::from(json_data);

    *self.latest.lock().await = Some(snapshot.clone());
    // no receivers just means nobody is watching yet
    let delivered = self.tx.send(snapshot).unwrap_or(0);
    debug!("published {} quotes to {} sockets", stocks.len(), delivered);
    Ok(delivered)
  }

  pub async fn subscribe(&self) -> (Option<Utf8Bytes>, broadcast::Receiver<Utf8Bytes>) {
    // hold the lock so no snapshot slips between the two
    let latest = self.latest.lock().await;
    (latest.clone(), self.tx.subscribe())
  }
}

/// Drains whatever is buffered and returns only the last snapshot.
pub fn skip_to_newest(rx: &mut broadcast::Receiver<Utf8Bytes>) -> Option<Utf8Bytes> {
  let mut newest = None;
  loop {
    match rx.try_recv() {
      Ok(snapshot) => newest = Some(snapshot),
      Err(TryRecvError::Lagged(_)) => continue,
      Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return newest
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal_macros::dec;

  fn stock(symbol: &str) -> Stock {
    Stock { symbol: symbol.to_string(), price: dec!(10.5), last_change: dec!(-0.25) }
  }

  #[tokio::test]
  async fn late_subscriber_gets_latest_snapshot() {
    let hub = Hub::new(8);
    let (latest, _) = hub.subscribe().await;
    assert!(latest.is_none());

    hub.publish(&[stock("AAPL")]).await.unwrap();
    hub.publish(&[stock("MSFT")]).await.unwrap();

    let (latest, _) = hub.subscribe().await;
    assert_eq!(latest.unwrap().as_str(), r#"[{"symbol":"MSFT","price":10.5,"last_change":-0.25}]"#);
  }

  #[tokio::test]
  async fn subscribers_receive_each_publish() {
    let hub = Hub::new(8);
    let (_, mut rx) = hub.subscribe().await;

    assert_eq!(hub.publish(&[stock("AAPL")]).await.unwrap(), 1);
    let msg = rx.recv().await.unwrap();
    assert!(msg.as_str().contains("AAPL"));
  }

  #[tokio::test]
  async fn lagging_subscriber_jumps_to_newest() {
    let hub = Hub::new(2);
    let (_, mut rx) = hub.subscribe().await;

    for symbol in ["AAPL", "AMZN", "TSLA", "MSFT"] {
      hub.publish(&[stock(symbol)]).await.unwrap();
    }
    assert!(matches!(rx.recv().await, Err(broadcast::error::RecvError::Lagged(2))));

    let newest = skip_to_newest(&mut rx).unwrap();
    assert!(newest.as_str().contains("MSFT"));
    assert!(skip_to_newest(&mut rx).is_none());
  }
}
