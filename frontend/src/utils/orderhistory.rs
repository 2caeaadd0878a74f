use dioxus::{logger::tracing::{error, info}, prelude::*};
use futures_util::StreamExt;

use super::{api::ApiClient, server::Order};

// Messages for the coroutine that owns the order history
#[derive(Debug)]
pub enum HistoryEvent {
  Refresh,
  OrderPlaced(Order)
}

pub fn sort_newest_first(orders: &mut [Order]) {
  orders.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

async fn refresh(client: &ApiClient, orders: &mut Signal<Vec<Order>>) {
  match client.fetch_orders().await {
    Ok(mut fetched) => {
      sort_newest_first(&mut fetched);
      orders.set(fetched);
    },
    // keep showing the last good list
    Err(e) => error!("Error fetching orders: {}", e)
  }
}

/// Owns the order list. Loads it once, then refetches on every `HistoryEvent`.
/// Events are handled one at a time, so refreshes never overlap.
pub fn use_order_history(client: ApiClient) -> Signal<Vec<Order>> {
  let mut orders = use_signal(Vec::<Order>::new);

  use_coroutine(move |mut rx: UnboundedReceiver<HistoryEvent>| {
    let client = client.clone();
    async move {
      refresh(&client, &mut orders).await;

      while let Some(event) = rx.next().await {
        match event {
          HistoryEvent::Refresh => {},
          HistoryEvent::OrderPlaced(order) => info!("order {} placed: {} {} {}", order.id, order.side, order.quantity, order.symbol)
        }
        refresh(&client, &mut orders).await;
      }
    }
  });

  orders
}
