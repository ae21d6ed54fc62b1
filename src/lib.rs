//! Personal food-logging core: a locally persisted meal ledger with daily
//! nutrition aggregation, plus a thin proxy that estimates a meal's nutrition
//! from a photo via a vision-capable model.

pub mod app;
pub mod config;
pub mod estimate;
pub mod ledger;
pub mod state;
