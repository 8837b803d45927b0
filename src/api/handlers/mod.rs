// src/api/handlers/mod.rs
mod health;
mod predict;

pub use health::health_check;
pub use predict::{json_error_handler, predict, PredictResponse};
