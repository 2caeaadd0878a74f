#![allow(non_snake_case)]

use std::rc::Rc;
use dioxus::{logger::tracing::warn, prelude::*};

use crate::{
  pages::dashboard::PointerDown,
  utils::{
    api::ApiClient,
    orderdraft::{suggest, two_dp, OrderDraft, Region},
    orderhistory::HistoryEvent,
    server::{PriceQuote, Side}
  }
};

#[component]
pub fn OrderForm(prices: Signal<Vec<PriceQuote>>) -> Element {

  let client = use_context::<ApiClient>();
  let history = use_coroutine_handle::<HistoryEvent>();
  let pointer = use_context::<PointerDown>();

  let mut draft: Signal<OrderDraft> = use_signal(OrderDraft::default);
  let mut loading: Signal<bool> = use_signal(||false);
  let mut error: Signal<Option<String>> = use_signal(||None);
  let mut suggestions: Signal<Vec<PriceQuote>> = use_signal(||vec![]);
  let mut show_suggestions: Signal<bool> = use_signal(||false);
  let mut symbol_box: Signal<Option<Rc<MountedData>>> = use_signal(||None);

  // dismiss the dropdown on presses outside the symbol box
  use_effect(move || {
    let Some((x, y)) = (pointer.0)() else { return };
    let Some(mounted) = symbol_box.peek().as_ref().cloned() else { return };
    spawn(async move {
      match mounted.get_client_rect().await {
        Ok(rect) => if !Region::from(rect).contains(x, y) {
          show_suggestions.set(false);
        },
        Err(e) => warn!("could not measure symbol field: {:?}", e)
      }
    });
  });

  let mut handle_change = move |name: &'static str, value: String| {
    draft.write().set_field(name, &value);

    if name == "symbol" {
      suggestions.set(suggest(&prices.read(), &value));
      show_suggestions.set(!value.is_empty());
    }
  };

  let submit_order = move |evt: FormEvent| {
    evt.prevent_default();
    let client = client.clone();
    async move {
      loading.set(true);
      error.set(None);

      let request = draft.read().to_request();
      let result = match request {
        Ok(new_order) => client.create_order(&new_order).await,
        Err(e) => Err(e)
      };

      let placed = result.as_ref().ok().cloned();
      let failure = draft.write().settle(result);

      match placed {
        Some(order) => {
          suggestions.set(vec![]);
          show_suggestions.set(false);
          history.send(HistoryEvent::OrderPlaced(order));
        },
        None => warn!("order submission failed: {:?}", failure)
      }
      error.set(failure);
      loading.set(false);
    }
  };

  let current = draft();
  let button_label = if loading() {
    "Processing...".to_string()
  } else {
    let symbol = if current.symbol.is_empty() { "Stock" } else { current.symbol.as_str() };
    format!("{} {}", current.side, symbol)
  };

  rsx! {
    div {
      class: "card",
      h2 { class: "card-title", "Place Order" },
      form {
        class: "order-form",
        onsubmit: submit_order,
        if let Some(msg) = error() {
          div { class: "form-error", role: "alert", "{msg}" }
        }
        div {
          class: "form-group autocomplete",
          onmounted: move |evt: MountedEvent| symbol_box.set(Some(evt.data())),
          label { class: "form-label", "Symbol" },
          input {
            class: "form-input",
            r#type: "text",
            name: "symbol",
            value: "{current.symbol}",
            placeholder: "AAPL",
            autocomplete: "off",
            required: true,
            oninput: move |evt: FormEvent| handle_change("symbol", evt.value())
          },
          if show_suggestions() && !suggestions.read().is_empty() {
            div {
              class: "suggestions",
              for quote in suggestions() {
                div {
                  key: "{quote.symbol}",
                  class: "suggestion",
                  // mousedown runs before the outside-press check sees the event
                  onmousedown: move |evt: MouseEvent| {
                    evt.stop_propagation();
                    draft.write().select(&quote);
                    suggestions.set(vec![]);
                    show_suggestions.set(false);
                  },
                  span { class: "symbol", "{quote.symbol}" },
                  span { class: "num", {format!("${}", two_dp(quote.price))} }
                }
              }
            }
          }
        },
        div {
          class: "form-group",
          label { class: "form-label", "Side" },
          select {
            class: "form-input",
            name: "side",
            value: "{current.side}",
            onchange: move |evt: FormEvent| handle_change("side", evt.value()),
            option { value: "buy", "Buy" },
            option { value: "sell", "Sell" }
          }
        },
        div {
          class: "form-row",
          div {
            class: "form-group",
            label { class: "form-label", "Quantity" },
            input {
              class: "form-input",
              r#type: "number",
              name: "quantity",
              value: "{current.quantity}",
              placeholder: "0",
              min: "1",
              required: true,
              oninput: move |evt: FormEvent| handle_change("quantity", evt.value())
            }
          },
          div {
            class: "form-group",
            label { class: "form-label", "Price" },
            input {
              class: "form-input",
              r#type: "number",
              name: "price",
              value: "{current.price}",
              placeholder: "0.00",
              step: "0.01",
              min: "0.01",
              required: true,
              oninput: move |evt: FormEvent| handle_change("price", evt.value())
            }
          }
        },
        button {
          r#type: "submit",
          class: if current.side == Side::Buy { "button button-buy" } else { "button button-sell" },
          disabled: loading(),
          "{button_label}"
        }
      }
    }
  }
}
