use axum::{extract::{rejection::JsonRejection, State}, http::StatusCode, Json};
use tracing::info;

use crate::{
  engine::models::{NewOrder, Order, Stock},
  midwares::app_state::{AppError, AppState}
};

pub async fn get_prices(State(state): State<AppState>) -> Json<Vec<Stock>> {
  Json(state.store.quotes().await)
}

pub async fn get_orders(State(state): State<AppState>) -> Json<Vec<Order>> {
  Json(state.store.orders().await)
}

pub async fn create_order(
  State(state): State<AppState>,
  payload: Result<Json<NewOrder>, JsonRejection>
) -> Result<(StatusCode, Json<Order>), AppError> {

  let Json(new_order) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
  let order = new_order.fill().ok_or_else(|| AppError::BadRequest("Invalid order details".to_string()))?;

  info!("filled order {}: {:?} {} {} @ {}", order.id, order.side, order.quantity, order.symbol, order.price);
  state.store.add_order(order.clone()).await;

  Ok((StatusCode::CREATED, Json(order)))
}

#[cfg(test)]
mod tests {
  use axum::{body::Body, http::{Request, StatusCode}, Router};
  use rust_decimal_macros::dec;
  use serde_json::Value;
  use tower::ServiceExt;

  use crate::{engine::{hub::Hub, store::Store}, midwares::app_state::AppState, route_handlers::router};

  fn app() -> (Router, Store) {
    let store = Store::new();
    (router(AppState::new(store.clone(), Hub::new(8))), store)
  }

  fn post_order(body: &str) -> Request<Body> {
    Request::builder()
      .method("POST")
      .uri("/orders")
      .header("content-type", "application/json")
      .body(Body::from(body.to_string()))
      .unwrap()
  }

  async fn json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
  }

  #[tokio::test]
  async fn create_order_returns_created_order() {
    let (app, store) = app();

    let response = app
      .oneshot(post_order(r#"{"symbol":"AAPL","side":"buy","quantity":10,"price":150.0}"#))
      .await
      .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["symbol"], "AAPL");
    assert_eq!(body["side"], "buy");
    assert_eq!(body["quantity"], 10);
    assert_eq!(body["price"], 150.0);
    assert_eq!(body["status"], "filled");
    assert!(body["id"].as_str().is_some_and(|id| !id.is_empty()));
    assert!(body["timestamp"].is_string());

    assert_eq!(store.orders().await.len(), 1);
  }

  #[tokio::test]
  async fn invalid_order_details_are_rejected() {
    for body in [
      r#"{"symbol":"","side":"buy","quantity":10,"price":150.0}"#,
      r#"{"symbol":"AAPL","side":"sell","quantity":0,"price":150.0}"#,
      r#"{"symbol":"AAPL","side":"sell","quantity":5,"price":-1}"#,
    ] {
      let (app, store) = app();
      let response = app.oneshot(post_order(body)).await.unwrap();

      assert_eq!(response.status(), StatusCode::BAD_REQUEST);
      assert_eq!(json_body(response).await["error"], "Invalid order details");
      assert!(store.orders().await.is_empty());
    }
  }

  #[tokio::test]
  async fn malformed_body_reports_parser_error() {
    let (app, _) = app();
    let response = app
      .oneshot(post_order(r#"{"symbol":"AAPL","side":"hold","quantity":1,"price":1}"#))
      .await
      .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));
  }

  #[tokio::test]
  async fn lists_prices_and_orders() {
    let (app, store) = app();
    store.update_price("MSFT", dec!(300)).await;
    store.update_price("AAPL", dec!(150)).await;

    let response = app.clone()
      .oneshot(Request::builder().uri("/prices").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let prices = json_body(response).await;
    assert_eq!(prices[0]["symbol"], "AAPL");
    assert_eq!(prices[1]["price"], 300.0);

    app.clone()
      .oneshot(post_order(r#"{"symbol":"MSFT","side":"sell","quantity":3,"price":301.5}"#))
      .await
      .unwrap();

    let response = app
      .oneshot(Request::builder().uri("/orders").body(Body::empty()).unwrap())
      .await
      .unwrap();
    let orders = json_body(response).await;
    assert_eq!(orders.as_array().map(|o| o.len()), Some(1));
    assert_eq!(orders[0]["side"], "sell");
  }
}
