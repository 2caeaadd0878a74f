use axum::{
  extract::{ws::{self, CloseFrame, Message, Utf8Bytes, WebSocket}, State, WebSocketUpgrade},
  response::IntoResponse
};
use futures::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{engine::hub::skip_to_newest, midwares::app_state::AppState};

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
  let who = Uuid::new_v4();
  ws.on_upgrade(move |socket| handle_socket(socket, state, who))
}

async fn handle_socket(socket: WebSocket, state: AppState, who: Uuid) {
  let (mut sender, mut receiver) = socket.split();
  let (latest, mut updates) = state.hub.subscribe().await;
  info!("price socket {} connected", who);

  if let Some(snapshot) = latest {
    if sender.send(Message::Text(snapshot)).await.is_err() {
      return;
    }
  }

  loop {
    tokio::select! {
      msg = receiver.next() => {
        match msg {
          Some(Ok(Message::Close(_))) | None => {
            debug!("{} closed the socket", who);
            break;
          },
          Some(Err(e)) => {
            warn!("price socket {} errored: {}", who, e);
            break;
          },
          // the feed is one way; anything else from the client is ignored
          Some(Ok(_)) => {}
        }
      }

      update = updates.recv() => {
        match update {
          Ok(snapshot) => {
            if sender.send(Message::Text(snapshot)).await.is_err() {
              break;
            }
          },
          Err(RecvError::Lagged(skipped)) => {
            debug!("{} lagged by {} snapshots", who, skipped);
            if let Some(snapshot) = skip_to_newest(&mut updates) {
              if sender.send(Message::Text(snapshot)).await.is_err() {
                break;
              }
            }
          },
          Err(RecvError::Closed) => {
            graceful_ws_closure(sender, ws::close_code::AWAY, "price feed stopped").await;
            break;
          }
        }
      }
    }
  }

  info!("price socket {} disconnected", who);
}

async fn graceful_ws_closure(mut sender: SplitSink<WebSocket, Message>, code: u16, reason: &'static str) {
  if let Err(e) = sender.send(Message::Close(Some(CloseFrame {
    code,
    reason: Utf8Bytes::from_static(reason)
  }))).await {
    warn!("error sending close frame: {}", e);
  }
  if let Err(e) = sender.flush().await {
    warn!("error flushing sender: {}", e);
  }
}
