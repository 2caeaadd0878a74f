use dioxus::{logger::tracing::{error, info}, prelude::*};

use crate::{
  components::{history::OrderHistory, orderform::OrderForm, prices::LivePrices},
  utils::{api::ApiClient, orderhistory::use_order_history, ws_handler::use_price_feed}
};

pub const API_URL: &str = match option_env!("API_URL") {
  Some(url) => url,
  None => "http://localhost:8080"
};
pub const WSS_URL: &str = match option_env!("WSS_URL") {
  Some(url) => url,
  None => "ws://localhost:8080/ws"
};

// Last pointer press anywhere on the page, in client coordinates
#[derive(Clone, Copy)]
pub struct PointerDown(pub Signal<Option<(f64, f64)>>);

#[component]
pub fn Dashboard() -> Element {

  let client = use_context_provider(|| ApiClient::new(reqwest::Client::new(), API_URL));
  let mut pointer = use_context_provider(|| PointerDown(Signal::new(None)));

  let mut prices = use_price_feed(WSS_URL);
  let orders = use_order_history(client.clone());

  // seed the board until the first feed snapshot lands
  use_future(move || {
    let client = client.clone();
    async move {
      match client.fetch_prices().await {
        Ok(seed) => if prices.peek().is_empty() {
          info!("seeded {} quotes before first feed snapshot", seed.len());
          prices.set(seed);
        },
        Err(e) => error!("Error fetching prices: {}", e)
      }
    }
  });

  static CSS: Asset = asset!("/assets/dashboard.css");

  rsx! {
    document::Link { rel: "stylesheet", href: CSS },
    div {
      class: "app-container",
      onmousedown: move |evt: MouseEvent| {
        let point = evt.client_coordinates();
        pointer.0.set(Some((point.x, point.y)));
      },
      header {
        class: "app-header",
        h1 { class: "brand", "Trading Dashboard" },
        span { class: "market-status", span { class: "status-dot" }, "Market Open" }
      },
      main {
        class: "dashboard-grid",
        section {
          class: "column-narrow",
          LivePrices { prices }
        },
        section {
          class: "column-wide",
          OrderForm { prices },
          OrderHistory { orders }
        }
      },
      footer { class: "app-footer", "Simulated market data. Orders are not real." }
    }
  }
}
