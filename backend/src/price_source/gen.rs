use std::time::Duration;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::{Distribution, Uniform};
use rust_decimal::{prelude::FromPrimitive, Decimal};
use tokio::time;
use tracing::{error, info};

use crate::{engine::{hub::Hub, store::Store}, midwares::app_state::AppError};

const SEED_PRICES: [(&str, i64); 5] = [
  ("AAPL", 150),
  ("GOOGL", 2800),
  ("AMZN", 3400),
  ("TSLA", 700),
  ("MSFT", 300),
];
// percent moved per tick
const MAX_MOVE_PCT: f64 = 2.0;
const PRICE_DP: u32 = 4;

fn price_floor() -> Decimal {
  Decimal::new(1, 2)
}

/// Random walk over the stored quotes, publishing a snapshot each tick.
pub struct PriceGenerator {
  store: Store,
  hub: Hub,
  interval: Duration,
  move_dist: Uniform<f64>
}

impl PriceGenerator {
  pub fn new(store: Store, hub: Hub, interval: Duration) -> Result<Self, AppError> {
    let move_dist = Uniform::new(-MAX_MOVE_PCT, MAX_MOVE_PCT).map_err(|e| AppError::InternalError(e.to_string()))?;
    Ok(Self { store, hub, interval, move_dist })
  }

  /// Loads the default symbols unless something already populated the store.
  pub async fn seed(&self) {
    if !self.store.is_empty().await {
      return;
    }
    for (symbol, price) in SEED_PRICES {
      self.store.update_price(symbol, Decimal::from(price)).await;
    }
    info!("seeded {} symbols", SEED_PRICES.len());
  }

  pub async fn tick<R: Rng>(&self, rng: &mut R) -> Result<usize, AppError> {
    for stock in self.store.quotes().await {
      let pct = self.move_dist.sample(rng);
      let factor = Decimal::from_f64(1.0 + pct / 100.0).ok_or_else(|| AppError::InternalError(format!("bad price move {}", pct)))?;
      let moved = (stock.price * factor).round_dp(PRICE_DP).max(price_floor());
      self.store.update_price(&stock.symbol, moved).await;
    }

    self.hub.publish(&self.store.quotes().await).await
  }

  pub async fn run(self) {
    self.seed().await;

    let mut rng = StdRng::from_os_rng();
    let mut interval = time::interval(self.interval);
    // the first tick completes immediately
    interval.tick().await;

    info!("price generator ticking every {:?}", self.interval);
    loop {
      interval.tick().await;
      if let Err(e) = self.tick(&mut rng).await {
        error!("price tick failed: {}", e);
      }
    }
  }
}
