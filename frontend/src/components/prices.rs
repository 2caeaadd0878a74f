#![allow(non_snake_case)]

use dioxus::prelude::*;
use rust_decimal::Decimal;
use crate::utils::{orderdraft::two_dp, server::PriceQuote};

#[component]
pub fn LivePrices(prices: Signal<Vec<PriceQuote>>) -> Element {

  rsx! {
    div {
      class: "card",
      h2 { class: "card-title", "Live Market Data" },
      table {
        class: "prices-table",
        thead {
          tr {
            th { scope: "col", "Symbol" },
            th { scope: "col", class: "num", "Price" },
            th { scope: "col", class: "num", "Change" },
          }
        }
        tbody {
          for quote in prices.read().iter() {
            tr {
              key: "{quote.symbol}",
              td { class: "symbol", "{quote.symbol}" },
              td { class: "num", {format!("${}", two_dp(quote.price))} },
              td {
                class: "num",
                ChangeBadge { change: quote.last_change }
              }
            }
          }
          if prices.read().is_empty() {
            tr {
              td {
                colspan: "3",
                class: "loading-row",
                span { class: "spinner" },
                span { "Connecting to live feed..." }
              }
            }
          }
        }
      }
    }
  }
}

#[component]
fn ChangeBadge(change: Decimal) -> Element {
  let rising = change >= Decimal::ZERO;

  rsx! {
    span {
      class: if rising { "badge badge-up" } else { "badge badge-down" },
      if rising { "▲ " } else { "▼ " },
      {format!("{}%", two_dp(change.abs()))}
    }
  }
}
