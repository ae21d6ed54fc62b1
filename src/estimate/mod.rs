pub mod client;
mod dto;
pub mod handlers;
mod normalize;
mod services;

use axum::Router;

use crate::state::AppState;

pub use client::{EstimationClient, EstimationFailed};
pub use dto::Estimate;
pub use services::{interpret_model_reply, EstimateError, OpenAiVision, VisionModel};

pub fn router() -> Router<AppState> {
    handlers::routes()
}
