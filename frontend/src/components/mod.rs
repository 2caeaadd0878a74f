pub mod history;
pub mod orderform;
pub mod prices;
