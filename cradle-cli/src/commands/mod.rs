pub mod check;
pub mod config;
pub mod configure_endpoint;
pub mod estimate_cost;
pub mod resolve;
pub mod select;
pub mod set_default;
pub mod status;
