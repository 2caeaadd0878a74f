pub mod hub;
pub mod models;
pub mod store;
