pub mod api;
pub mod orderdraft;
pub mod orderhistory;
pub mod server;
pub mod ws_handler;
