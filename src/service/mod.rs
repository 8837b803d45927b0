// src/service/mod.rs

use crate::errors::Result;
use crate::models::{ApplicantInput, PredictionResult};

pub mod http;

pub use http::HttpPredictionService;

/// Anything that can turn one applicant into one prediction.
///
/// `HttpPredictionService` talks to the remote endpoint; tests plug in
/// in-process stand-ins. Implementations report transport problems as `Err`
/// and leave the mapping to a user-facing message to the caller.
pub trait PredictionService: Send + Sync {
    /// Sends `input` and returns whatever result the service produced.
    fn predict(&self, input: &ApplicantInput) -> impl std::future::Future<Output = Result<PredictionResult>> + Send;
}
