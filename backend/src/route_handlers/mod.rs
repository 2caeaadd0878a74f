pub mod orders;
pub mod sockets;

use axum::{routing::{any, get}, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::midwares::app_state::AppState;

pub fn router(state: AppState) -> Router {
  Router::new()
    .route("/prices", get(orders::get_prices))
    .route("/orders", get(orders::get_orders).post(orders::create_order))
    .route("/ws", any(sockets::ws_handler))
    .layer(TraceLayer::new_for_http())
    // the dashboard is served from another origin
    .layer(CorsLayer::permissive())
    .with_state(state)
}
