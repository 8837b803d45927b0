// src/api/handlers/predict.rs
use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::{web, HttpRequest, HttpResponse, Result};
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::api::AppState;
use crate::display::{DisplayOutcome, RenderedOutcome};
use crate::errors::PredictError;
use crate::form::{FormClient, FormOptions};
use crate::models::{FieldValue, PredictionResult};

#[derive(Serialize)]
pub struct PredictResponse {
    pub id: String,
    pub submitted_at: DateTime<Utc>,
    pub result: PredictionResult,
    pub display: RenderedOutcome,
}

/// Runs one form session: applies every posted field, submits, and returns
/// the prediction with its rendered outcome.
pub async fn predict(
    state: web::Data<AppState>,
    req: web::Json<BTreeMap<String, FieldValue>>,
) -> Result<HttpResponse> {
    let id = Uuid::new_v4().to_string();
    let client = FormClient::new(state.service.clone(), FormOptions::from(state.config.as_ref()));

    for (name, value) in req.into_inner() {
        if let Err(e) = client.update_field(&name, value) {
            return Ok(refusal(&id, e));
        }
    }

    match client.submit().await {
        Ok(result) => {
            let display =
                DisplayOutcome::from_result(&result, state.config.strict_verdicts).render();

            info!("✅ Submission {} rendered as {}", id, display.kind);

            Ok(HttpResponse::Ok().json(PredictResponse {
                id,
                submitted_at: Utc::now(),
                result,
                display,
            }))
        }
        Err(e) => Ok(refusal(&id, e)),
    }
}

fn refusal(id: &str, e: PredictError) -> HttpResponse {
    warn!("⚠️  Submission {} refused: {}", id, e);

    let body = json!({ "id": id, "error": e.to_string() });
    match &e {
        PredictError::SubmitInFlight => HttpResponse::Conflict().json(body),
        e if e.is_input_error() => HttpResponse::BadRequest().json(body),
        _ => HttpResponse::InternalServerError().json(body),
    }
}

/// Answers bodies the JSON extractor rejects (numbers, nulls, non-objects)
/// with the same `{id, error}` shape as any other refusal.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let id = Uuid::new_v4().to_string();
    warn!("⚠️  Submission {} rejected before reaching the form: {}", id, err);

    let response = HttpResponse::BadRequest().json(json!({ "id": id, "error": err.to_string() }));
    InternalError::from_response(err, response).into()
}
