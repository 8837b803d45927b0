// src/api/state.rs
use crate::config::AppConfig;
use crate::service::HttpPredictionService;
use reqwest::Client;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub service: Arc<HttpPredictionService>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let service = HttpPredictionService::new(Client::new(), config.endpoint.clone());
        Self {
            config: Arc::new(config),
            service: Arc::new(service),
        }
    }
}
