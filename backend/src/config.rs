use std::{fmt, time::Duration};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_TICK_MS: u64 = 2_000;
const DEFAULT_FEED_CAPACITY: usize = 64;
const DEFAULT_FINNHUB_SYMBOLS: &str = "AAPL,AMZN,TSLA,MSFT,GOOGL,BINANCE:BTCUSDT";

#[derive(Debug, PartialEq)]
pub struct ConfigError {
  var: &'static str,
  reason: String
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "invalid {}: {}", self.var, self.reason)
  }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq)]
pub struct FinnhubConfig {
  pub api_key: String,
  pub symbols: Vec<String>
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
  pub bind_addr: String,
  pub price_tick: Duration,
  pub feed_capacity: usize,
  // live trades replace the simulator when set
  pub finnhub: Option<FinnhubConfig>
}

impl Config {
  pub fn from_env() -> Result<Self, ConfigError> {
    Self::from_lookup(|name| std::env::var(name).ok())
  }

  pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
  where
    F: Fn(&str) -> Option<String>
  {
    let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
    let tick_ms = parse_positive(&lookup, "PRICE_TICK_MS", DEFAULT_TICK_MS as usize)?;
    let feed_capacity = parse_positive(&lookup, "FEED_CAPACITY", DEFAULT_FEED_CAPACITY)?;

    let finnhub = lookup("FINNHUB_API_KEY")
      .filter(|key| !key.trim().is_empty())
      .map(|api_key| {
        let raw = lookup("FINNHUB_SYMBOLS").unwrap_or_else(|| DEFAULT_FINNHUB_SYMBOLS.to_string());
        let symbols = raw.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect::<Vec<_>>();
        FinnhubConfig { api_key, symbols }
      });

    if let Some(cfg) = &finnhub {
      if cfg.symbols.is_empty() {
        return Err(ConfigError { var: "FINNHUB_SYMBOLS", reason: "no symbols listed".to_string() });
      }
    }

    Ok(Self {
      bind_addr,
      price_tick: Duration::from_millis(tick_ms as u64),
      feed_capacity,
      finnhub
    })
  }
}

fn parse_positive<F>(lookup: &F, var: &'static str, default: usize) -> Result<usize, ConfigError>
where
  F: Fn(&str) -> Option<String>
{
  match lookup(var) {
    None => Ok(default),
    Some(raw) => match raw.trim().parse::<usize>() {
      Ok(0) => Err(ConfigError { var, reason: "must be greater than zero".to_string() }),
      Ok(v) => Ok(v),
      Err(e) => Err(ConfigError { var, reason: format!("{} ({:?})", e, raw) })
    }
  }
}
