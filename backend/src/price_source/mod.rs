pub mod finnhub;
pub mod gen;
