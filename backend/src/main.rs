mod config;
mod engine;
mod midwares;
mod price_source;
mod route_handlers;

use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use engine::{hub::Hub, store::Store};
use midwares::app_state::AppState;
use price_source::{finnhub::FinnhubClient, gen::PriceGenerator};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  dotenv().ok();

  tracing_subscriber::registry()
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
    .with(tracing_subscriber::fmt::layer())
    .init();

  let config = match Config::from_env() {
    Ok(config) => config,
    Err(e) => {
      error!("{}", e);
      std::process::exit(1);
    }
  };

  let store = Store::new();
  let hub = Hub::new(config.feed_capacity);

  match config.finnhub.clone() {
    Some(finnhub) => {
      info!("streaming live trades from finnhub");
      tokio::spawn(FinnhubClient::new(store.clone(), hub.clone(), finnhub).run());
    },
    None => {
      let generator = PriceGenerator::new(store.clone(), hub.clone(), config.price_tick)?;
      tokio::spawn(generator.run());
    }
  }

  let app = route_handlers::router(AppState::new(store, hub));

  let listener = TcpListener::bind(&config.bind_addr).await?;
  info!("listening on {}", listener.local_addr()?);

  axum::serve(listener, app).await?;
  Ok(())
}
