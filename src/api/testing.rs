//! Scripted [`ShelfLifeApi`] double shared by the unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::oneshot;

use super::{
    ApiError, AudioClip, ChatReply, Explanation, FoodType, HealthStatus, PredictionExplanation,
    PredictionInput, PredictionResult, ShelfLifeApi, StorageConditions, StorageType,
};

/// One canned response, optionally held back until `gate` fires.
pub struct Scripted<T> {
    pub gate: Option<oneshot::Receiver<()>>,
    pub value: Result<T, ApiError>,
}

impl<T> Scripted<T> {
    pub fn now(value: Result<T, ApiError>) -> Self {
        Self { gate: None, value }
    }

    /// Respond only after the returned sender is fired (or dropped).
    pub fn gated(value: Result<T, ApiError>) -> (Self, oneshot::Sender<()>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                gate: Some(rx),
                value,
            },
            tx,
        )
    }

    async fn resolve(self) -> Result<T, ApiError> {
        if let Some(gate) = self.gate {
            let _ = gate.await;
        }
        self.value
    }
}

#[derive(Default)]
pub struct FakeApi {
    pub predictions: Mutex<VecDeque<Scripted<PredictionResult>>>,
    pub voice_clips: Mutex<VecDeque<Scripted<AudioClip>>>,
    pub chat_replies: Mutex<VecDeque<Result<ChatReply, ApiError>>>,
    pub explanations: Mutex<VecDeque<Result<PredictionExplanation, ApiError>>>,
    pub advice: Mutex<VecDeque<Result<ChatReply, ApiError>>>,

    pub predict_calls: AtomicUsize,
    pub voice_calls: AtomicUsize,
    pub chat_calls: AtomicUsize,
    pub last_chat: Mutex<Option<(String, String)>>,
    pub last_advice: Mutex<Option<(FoodType, Option<StorageConditions>)>>,
}

impl FakeApi {
    pub fn push_prediction(&self, scripted: Scripted<PredictionResult>) {
        self.predictions.lock().unwrap().push_back(scripted);
    }

    pub fn push_voice(&self, scripted: Scripted<AudioClip>) {
        self.voice_clips.lock().unwrap().push_back(scripted);
    }

    pub fn push_chat(&self, reply: Result<ChatReply, ApiError>) {
        self.chat_replies.lock().unwrap().push_back(reply);
    }

    pub fn calls(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

fn not_scripted() -> ApiError {
    ApiError::Request("not scripted".into())
}

#[async_trait]
impl ShelfLifeApi for FakeApi {
    async fn health_check(&self) -> Result<HealthStatus, ApiError> {
        Ok(HealthStatus {
            status: "healthy".into(),
            pipeline_loaded: true,
        })
    }

    async fn predict(&self, _input: &PredictionInput) -> Result<PredictionResult, ApiError> {
        self.predict_calls.fetch_add(1, Ordering::SeqCst);
        let next = self.predictions.lock().unwrap().pop_front();
        match next {
            Some(scripted) => scripted.resolve().await,
            None => Err(not_scripted()),
        }
    }

    async fn explain(&self, _input: &PredictionInput) -> Result<Explanation, ApiError> {
        Err(not_scripted())
    }

    async fn voice_explanation(&self, _input: &PredictionInput) -> Result<AudioClip, ApiError> {
        self.voice_calls.fetch_add(1, Ordering::SeqCst);
        let next = self.voice_clips.lock().unwrap().pop_front();
        match next {
            Some(scripted) => scripted.resolve().await,
            None => Err(not_scripted()),
        }
    }

    async fn chat(&self, message: &str, context: &str) -> Result<ChatReply, ApiError> {
        self.chat_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_chat.lock().unwrap() = Some((message.to_string(), context.to_string()));
        let next = self.chat_replies.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(not_scripted()))
    }

    async fn prediction_explanation(
        &self,
        _input: &PredictionInput,
    ) -> Result<PredictionExplanation, ApiError> {
        let next = self.explanations.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(not_scripted()))
    }

    async fn storage_advice(
        &self,
        food_type: FoodType,
        conditions: Option<&StorageConditions>,
    ) -> Result<ChatReply, ApiError> {
        *self.last_advice.lock().unwrap() = Some((food_type, conditions.cloned()));
        let next = self.advice.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(not_scripted()))
    }

    async fn batch_predict(
        &self,
        _items: &[PredictionInput],
    ) -> Result<Vec<PredictionResult>, ApiError> {
        Err(not_scripted())
    }
}

pub fn dairy_input() -> PredictionInput {
    PredictionInput {
        food_type: FoodType::Dairy,
        temperature: 4.0,
        humidity: 65.0,
        storage_type: StorageType::Refrigerator,
        days_stored: 2.0,
    }
}

/// A result echoing `input`, classified "Consume Soon" with 3 days left.
pub fn consume_soon(input: &PredictionInput) -> PredictionResult {
    PredictionResult {
        food_type: input.food_type.as_str().into(),
        storage_type: input.storage_type.as_str().into(),
        temperature: input.temperature,
        humidity: input.humidity,
        days_stored: input.days_stored,
        predicted_remaining_days: 3.0,
        raw_prediction: 3.4,
        safety_classification: "Consume Soon".into(),
        issues: vec!["Borderline humidity".into()],
        severity: "medium".into(),
        recommendations: vec!["Consume within 1 day".into()],
        feature_importance: [("temperature".to_string(), 0.41), ("days_stored".to_string(), 0.33)]
            .into_iter()
            .collect(),
    }
}
