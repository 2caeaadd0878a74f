use std::{cell::RefCell, fmt::Display};
use dioxus::{logger::tracing::{error, info, warn}, prelude::*};
use futures_util::{Stream, StreamExt};
use gloo_net::websocket::{futures::WebSocket, Message};
use tokio::sync::oneshot;

use crate::utils::server::{AppError, PriceQuote};

const NORMAL_CLOSURE: u16 = 1000;

#[derive(Debug, PartialEq)]
pub enum FeedExit {
  // owner released the subscription
  Released,
  // server closed the socket or the stream errored
  Disconnected
}

/// Parses one feed message as a full snapshot of the price list.
pub fn parse_snapshot(payload: &[u8]) -> Result<Vec<PriceQuote>, AppError> {
  serde_json::from_slice::<Vec<PriceQuote>>(payload).map_err(|e| AppError::DeserializeError(e.to_string()))
}

/// Drives the feed until it ends or `cancel` fires. Every well-formed message replaces
/// the previous snapshot through `on_snapshot`; malformed ones are logged and dropped.
pub async fn consume_feed<S, E, F>(feed: &mut S, mut cancel: oneshot::Receiver<()>, mut on_snapshot: F) -> FeedExit
where
  S: Stream<Item = Result<Message, E>> + Unpin,
  E: Display,
  F: FnMut(Vec<PriceQuote>)
{
  loop {
    tokio::select! {
      // a dropped sender counts as a release too
      _ = &mut cancel => return FeedExit::Released,
      msg = feed.next() => {
        let payload = match msg {
          Some(Ok(Message::Text(s))) => s.into_bytes(),
          Some(Ok(Message::Bytes(b))) => b,
          Some(Err(e)) => {
            error!("price feed error: {}", e);
            return FeedExit::Disconnected;
          },
          None => return FeedExit::Disconnected
        };

        match parse_snapshot(&payload) {
          Ok(snapshot) => on_snapshot(snapshot),
          Err(e) => error!("dropping malformed price snapshot: {}", e)
        }
      }
    }
  }
}

async fn stream_prices(url: &str, cancel: oneshot::Receiver<()>, mut prices: Signal<Vec<PriceQuote>>) -> Result<(), AppError> {
  let mut ws = WebSocket::open(url).map_err(|e| AppError::WsConnectionError(e.to_string()))?;
  info!("price feed connected to {}", url);

  let exit = consume_feed(&mut ws, cancel, |snapshot| {
    // the owning view may already be gone
    if let Ok(mut held) = prices.try_write() {
      *held = snapshot;
    }
  }).await;

  match exit {
    FeedExit::Released => {
      ws.close(Some(NORMAL_CLOSURE), Some("feed released")).map_err(|e| AppError::WsConnectionError(e.to_string()))?;
      info!("price feed released");
    },
    FeedExit::Disconnected => warn!("price feed disconnected, no further price updates")
  }
  Ok(())
}

// Owner side of the live price subscription
pub struct PriceFeed {
  cancel: RefCell<Option<oneshot::Sender<()>>>
}

impl PriceFeed {
  /// Opens the connection in a detached task that writes snapshots into `prices`.
  pub fn acquire(url: &str, prices: Signal<Vec<PriceQuote>>) -> Self {
    let (cancel_tx, cancel_rx) = oneshot::channel();
    let url = url.to_string();

    spawn_forever(async move {
      if let Err(e) = stream_prices(&url, cancel_rx, prices).await {
        error!("price feed failed: {}", e);
      }
    });

    Self { cancel: RefCell::new(Some(cancel_tx)) }
  }

  pub fn release(&self) {
    if let Some(tx) = self.cancel.borrow_mut().take() {
      // the task may have exited on its own already
      let _ = tx.send(());
    }
  }
}

impl Drop for PriceFeed {
  fn drop(&mut self) {
    self.release();
  }
}

/// Subscribes for the lifetime of the calling component and returns the latest snapshot.
pub fn use_price_feed(url: &'static str) -> Signal<Vec<PriceQuote>> {
  let prices = use_signal(Vec::<PriceQuote>::new);
  use_hook(|| std::rc::Rc::new(PriceFeed::acquire(url, prices)));
  prices
}
