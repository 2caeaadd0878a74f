#![allow(non_snake_case)]

use chrono::Local;
use dioxus::prelude::*;
use crate::utils::{orderdraft::two_dp, orderhistory::HistoryEvent, server::{Order, Side}};

#[component]
pub fn OrderHistory(orders: Signal<Vec<Order>>) -> Element {
  let history = use_coroutine_handle::<HistoryEvent>();

  rsx! {
    div {
      class: "card",
      div {
        class: "card-header",
        h2 { class: "card-title", "Order History" },
        button {
          class: "button button-ghost",
          onclick: move |_evt| history.send(HistoryEvent::Refresh),
          "Refresh"
        }
      },
      table {
        class: "orders-table",
        thead {
          tr {
            th { scope: "col", "Time" },
            th { scope: "col", "Symbol" },
            th { scope: "col", "Side" },
            th { scope: "col", class: "num", "Qty" },
            th { scope: "col", class: "num", "Price" },
            th { scope: "col", "Status" },
          }
        }
        tbody {
          for order in orders.read().iter() {
            tr {
              key: "{order.id}",
              td { {order.timestamp.with_timezone(&Local).format("%H:%M:%S").to_string()} },
              td { class: "symbol", "{order.symbol}" },
              td {
                span {
                  class: if order.side == Side::Buy { "badge badge-up" } else { "badge badge-down" },
                  "{order.side}"
                }
              },
              td { class: "num", "{order.quantity}" },
              td { class: "num", {format!("${}", two_dp(order.price))} },
              td { span { class: "badge badge-filled", "{order.status}" } }
            }
          }
          if orders.read().is_empty() {
            tr {
              td { colspan: "6", class: "empty-row", "No orders placed yet. Start trading!" }
            }
          }
        }
      }
    }
  }
}
