// src/form.rs
use log::{error, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use crate::config::AppConfig;
use crate::display::DisplayOutcome;
use crate::errors::{PredictError, Result};
use crate::models::{
    parse_number, ApplicantInput, EducationLevel, FamilySize, FieldName, FieldValue,
    PredictionResult,
};
use crate::service::PredictionService;

/// Shown whenever the endpoint cannot be reached or answers with something
/// that is not JSON.
pub const CONNECTION_FAILURE_MESSAGE: &str = "❌ Could not connect to the prediction server.";

/// Raw form state for one session. Numerics are kept exactly as typed until
/// submit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormState {
    pub age: String,
    pub income: String,
    pub family: FamilySize,
    pub cc_avg: String,
    pub education: EducationLevel,
    pub mortgage: String,
    pub securities_account: bool,
    pub cd_account: bool,
    pub online: bool,
    pub credit_card: bool,
}

impl FormState {
    pub fn set(&mut self, field: FieldName, value: FieldValue) -> Result<()> {
        match (field, value) {
            (FieldName::Family, FieldValue::Text(choice)) => {
                self.family = FamilySize::from_choice(&choice)?;
            }
            (FieldName::Education, FieldValue::Text(choice)) => {
                self.education = EducationLevel::from_choice(&choice)?;
            }
            (field, FieldValue::Flag(flag)) if field.is_flag() => {
                if let Some(slot) = self.flag_mut(field) {
                    *slot = flag;
                }
            }
            (field, FieldValue::Text(text)) if !field.is_flag() => {
                if let Some(slot) = self.text_mut(field) {
                    *slot = text;
                }
            }
            (field, _) => {
                return Err(PredictError::FieldTypeMismatch {
                    field: field.as_str(),
                    expected: if field.is_flag() { "boolean" } else { "text" },
                });
            }
        }
        Ok(())
    }

    /// Validates the entered text and produces the request body.
    pub fn to_input(&self) -> Result<ApplicantInput> {
        Ok(ApplicantInput {
            age: parse_number(FieldName::Age, &self.age)?,
            income: parse_number(FieldName::Income, &self.income)?,
            family: self.family,
            cc_avg: parse_number(FieldName::CcAvg, &self.cc_avg)?,
            education: self.education,
            mortgage: parse_number(FieldName::Mortgage, &self.mortgage)?,
            securities_account: self.securities_account,
            cd_account: self.cd_account,
            online: self.online,
            credit_card: self.credit_card,
        })
    }

    fn text_mut(&mut self, field: FieldName) -> Option<&mut String> {
        match field {
            FieldName::Age => Some(&mut self.age),
            FieldName::Income => Some(&mut self.income),
            FieldName::CcAvg => Some(&mut self.cc_avg),
            FieldName::Mortgage => Some(&mut self.mortgage),
            _ => None,
        }
    }

    fn flag_mut(&mut self, field: FieldName) -> Option<&mut bool> {
        match field {
            FieldName::SecuritiesAccount => Some(&mut self.securities_account),
            FieldName::CdAccount => Some(&mut self.cd_account),
            FieldName::Online => Some(&mut self.online),
            FieldName::CreditCard => Some(&mut self.credit_card),
            _ => None,
        }
    }
}

/// Display phase: `Idle -> Submitting -> { Success | Failure } -> Idle`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormPhase {
    #[default]
    Idle,
    Submitting,
    Success(DisplayOutcome),
    Failure(String),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FormOptions {
    pub strict_verdicts: bool,
}

impl From<&AppConfig> for FormOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            strict_verdicts: config.strict_verdicts,
        }
    }
}

#[derive(Debug, Default)]
struct Session {
    state: FormState,
    phase: FormPhase,
    last_result: Option<PredictionResult>,
}

/// One form session: field edits, a single in-flight submit, and the
/// resulting display phase.
pub struct FormClient<S> {
    service: Arc<S>,
    options: FormOptions,
    session: Mutex<Session>,
    loading: AtomicBool,
}

/// Holds the in-flight slot. Dropping it clears the loading flag on every
/// exit path, including a dropped future.
struct InFlight<'a> {
    loading: &'a AtomicBool,
    session: &'a Mutex<Session>,
}

impl<'a> InFlight<'a> {
    fn acquire(loading: &'a AtomicBool, session: &'a Mutex<Session>) -> Option<Self> {
        loading
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { loading, session })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        if session.phase == FormPhase::Submitting {
            session.phase = FormPhase::Idle;
        }
        drop(session);
        self.loading.store(false, Ordering::Release);
    }
}

impl<S: PredictionService> FormClient<S> {
    pub fn new(service: Arc<S>, options: FormOptions) -> Self {
        Self {
            service,
            options,
            session: Mutex::new(Session::default()),
            loading: AtomicBool::new(false),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sets a field by its wire name. Booleans replace; numerics are stored
    /// as entered text.
    pub fn update_field(&self, name: &str, value: impl Into<FieldValue>) -> Result<()> {
        let field: FieldName = name.parse()?;
        self.set_field(field, value)
    }

    pub fn set_field(&self, field: FieldName, value: impl Into<FieldValue>) -> Result<()> {
        self.lock().state.set(field, value.into())
    }

    /// Submits the current form state.
    ///
    /// Returns `Err` only when the submit is refused locally: another submit
    /// is in flight, or a required field is empty or not a number. Every
    /// transport outcome resolves to `Ok`, with connection failures mapped to
    /// `PredictionResult::Error`.
    pub async fn submit(&self) -> Result<PredictionResult> {
        let _in_flight = InFlight::acquire(&self.loading, &self.session).ok_or_else(|| {
            warn!("⚠️  Submit refused: a prediction request is already in flight");
            PredictError::SubmitInFlight
        })?;

        let input = {
            let mut session = self.lock();
            let input = session.state.to_input()?;
            session.phase = FormPhase::Submitting;
            session.last_result = None;
            input
        };

        info!("🎯 Submitting applicant for prediction");
        let start = Instant::now();

        let result = match self.service.predict(&input).await {
            Ok(result) => result,
            Err(e) => {
                error!("❌ Prediction request failed: {}", e);
                PredictionResult::error(CONNECTION_FAILURE_MESSAGE)
            }
        };

        let outcome = DisplayOutcome::from_result(&result, self.options.strict_verdicts);
        info!(
            "⏱️  Prediction resolved as {} in {}ms",
            outcome.kind(),
            start.elapsed().as_millis()
        );

        {
            let mut session = self.lock();
            session.phase = match outcome {
                DisplayOutcome::Failure(message) => FormPhase::Failure(message),
                outcome => FormPhase::Success(outcome),
            };
            session.last_result = Some(result.clone());
        }

        Ok(result)
    }

    /// Clears a shown result and returns to `Idle`. No effect while a submit
    /// is in flight.
    pub fn dismiss(&self) {
        let mut session = self.lock();
        if matches!(session.phase, FormPhase::Success(_) | FormPhase::Failure(_)) {
            session.phase = FormPhase::Idle;
            session.last_result = None;
        }
    }

    /// True while a submit is outstanding; the submit control is disabled.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    pub fn phase(&self) -> FormPhase {
        self.lock().phase.clone()
    }

    pub fn last_result(&self) -> Option<PredictionResult> {
        self.lock().last_result.clone()
    }

    pub fn display(&self) -> Option<DisplayOutcome> {
        self.lock()
            .last_result
            .as_ref()
            .map(|result| DisplayOutcome::from_result(result, self.options.strict_verdicts))
    }

    pub fn snapshot(&self) -> FormState {
        self.lock().state.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    /// Answers every request with a fixed body and counts calls.
    struct FixedService {
        answer: PredictionResult,
        calls: AtomicUsize,
    }

    impl PredictionService for FixedService {
        async fn predict(&self, _input: &ApplicantInput) -> Result<PredictionResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.answer.clone())
        }
    }

    /// Blocks until released, then answers "will not default".
    struct GatedService {
        release: Notify,
    }

    impl PredictionService for GatedService {
        async fn predict(&self, _input: &ApplicantInput) -> Result<PredictionResult> {
            self.release.notified().await;
            Ok(PredictionResult::Verdict { default: false })
        }
    }

    struct BrokenService;

    impl PredictionService for BrokenService {
        async fn predict(&self, _input: &ApplicantInput) -> Result<PredictionResult> {
            Err(serde_json::from_str::<serde_json::Value>("<html>").unwrap_err().into())
        }
    }

    fn fill<S: PredictionService>(client: &FormClient<S>) {
        client.update_field("Age", "35").unwrap();
        client.update_field("Income", "49").unwrap();
        client.update_field("CCAvg", "1.6").unwrap();
        client.update_field("Mortgage", "0").unwrap();
    }

    fn fixed(answer: PredictionResult) -> Arc<FixedService> {
        Arc::new(FixedService {
            answer,
            calls: AtomicUsize::new(0),
        })
    }

    #[test]
    fn test_defaults_on_session_start() {
        let client = FormClient::new(fixed(PredictionResult::error("unused")), FormOptions::default());
        let state = client.snapshot();
        assert_eq!(state.family, FamilySize::One);
        assert_eq!(state.education, EducationLevel::Undergraduate);
        assert!(!state.securities_account && !state.cd_account && !state.online && !state.credit_card);
        assert!(state.age.is_empty());
        assert_eq!(client.phase(), FormPhase::Idle);
        assert!(!client.is_loading());
    }

    #[test]
    fn test_update_field_rules() {
        let client = FormClient::new(fixed(PredictionResult::error("unused")), FormOptions::default());

        client.update_field("Age", " 0042 ").unwrap();
        client.update_field("Family", "4").unwrap();
        client.update_field("Online", true).unwrap();
        client.update_field("Online", false).unwrap();
        client.update_field("CreditCard", true).unwrap();

        let state = client.snapshot();
        assert_eq!(state.age, " 0042 ");
        assert_eq!(state.family, FamilySize::FourOrMore);
        assert!(!state.online);
        assert!(state.credit_card);

        assert!(matches!(
            client.update_field("age", "1"),
            Err(PredictError::UnknownField(_))
        ));
        assert!(matches!(
            client.update_field("Online", "yes"),
            Err(PredictError::FieldTypeMismatch { field: "Online", expected: "boolean" })
        ));
        assert!(matches!(
            client.update_field("Income", true),
            Err(PredictError::FieldTypeMismatch { field: "Income", expected: "text" })
        ));
        assert!(matches!(
            client.update_field("Education", "7"),
            Err(PredictError::InvalidChoice { field: "Education", .. })
        ));
    }

    #[tokio::test]
    async fn test_submit_success_sets_phase_and_clears_loading() {
        let client = FormClient::new(
            fixed(PredictionResult::Verdict { default: true }),
            FormOptions::default(),
        );
        fill(&client);

        let result = client.submit().await.unwrap();
        assert_eq!(result, PredictionResult::Verdict { default: true });
        assert_eq!(client.phase(), FormPhase::Success(DisplayOutcome::WillDefault));
        assert_eq!(client.last_result(), Some(result));
        assert!(!client.is_loading());

        client.dismiss();
        assert_eq!(client.phase(), FormPhase::Idle);
        assert_eq!(client.last_result(), None);
    }

    #[tokio::test]
    async fn test_missing_field_refuses_without_calling_service() {
        let service = fixed(PredictionResult::Verdict { default: false });
        let client = FormClient::new(service.clone(), FormOptions::default());
        client.update_field("Age", "35").unwrap();

        let err = client.submit().await.unwrap_err();
        assert!(matches!(err, PredictError::MissingField("Income")));
        assert_eq!(service.calls.load(Ordering::SeqCst), 0);
        assert_eq!(client.phase(), FormPhase::Idle);
        assert!(!client.is_loading());
    }

    #[tokio::test]
    async fn test_transport_error_becomes_connection_message() {
        let client = FormClient::new(Arc::new(BrokenService), FormOptions::default());
        fill(&client);

        let result = client.submit().await.unwrap();
        assert_eq!(result, PredictionResult::error(CONNECTION_FAILURE_MESSAGE));
        assert_eq!(
            client.phase(),
            FormPhase::Failure(CONNECTION_FAILURE_MESSAGE.to_string())
        );
        assert!(!client.is_loading());
    }

    #[tokio::test]
    async fn test_second_submit_is_refused_while_in_flight() {
        let service = Arc::new(GatedService { release: Notify::new() });
        let client = FormClient::new(service.clone(), FormOptions::default());
        fill(&client);

        let first = client.submit();
        let second = async {
            // Let the first submit reach the service before trying again.
            tokio::task::yield_now().await;
            assert!(client.is_loading());
            assert_eq!(client.phase(), FormPhase::Submitting);
            let refused = client.submit().await;
            service.release.notify_one();
            refused
        };

        let (first, second) = tokio::join!(first, second);
        assert_eq!(first.unwrap(), PredictionResult::Verdict { default: false });
        assert!(matches!(second, Err(PredictError::SubmitInFlight)));
        assert!(!client.is_loading());
    }

    #[tokio::test]
    async fn test_dropped_submit_clears_loading() {
        let service = Arc::new(GatedService { release: Notify::new() });
        let client = FormClient::new(service, FormOptions::default());
        fill(&client);

        let timed_out =
            tokio::time::timeout(std::time::Duration::from_millis(20), client.submit()).await;
        assert!(timed_out.is_err());
        assert!(!client.is_loading());
        assert_eq!(client.phase(), FormPhase::Idle);
    }

    #[tokio::test]
    async fn test_strict_mode_renders_malformed_as_inconclusive() {
        let body = PredictionResult::Malformed(json!({"score": 0.4}));
        let lenient = FormClient::new(fixed(body.clone()), FormOptions::default());
        let strict = FormClient::new(fixed(body), FormOptions { strict_verdicts: true });
        fill(&lenient);
        fill(&strict);

        lenient.submit().await.unwrap();
        strict.submit().await.unwrap();

        assert_eq!(lenient.display(), Some(DisplayOutcome::WillNotDefault));
        assert_eq!(strict.display(), Some(DisplayOutcome::Inconclusive));
    }
}
