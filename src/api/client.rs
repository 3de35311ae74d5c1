//! `ShelfLifeApi` trait and its reqwest-backed implementation.
//!
//! Every operation is a single request/response round trip: no retry, no
//! caching, no deduplication.  All connection details come from
//! [`ApiConfig`].

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ApiConfig;

use super::error::{extract_error_message, ApiError};
use super::types::{
    AudioClip, BatchRequest, BatchResponse, ChatReply, ChatRequest, Explanation, FoodType,
    HealthStatus, PredictionExplanation, PredictionInput, PredictionResult, StorageAdviceRequest,
    StorageConditions,
};

// ---------------------------------------------------------------------------
// ShelfLifeApi trait
// ---------------------------------------------------------------------------

/// The backend contract.
///
/// Implementors must be `Send + Sync` so they can be shared across tasks as
/// `Arc<dyn ShelfLifeApi>`.
#[async_trait]
pub trait ShelfLifeApi: Send + Sync {
    /// `GET /health`
    async fn health_check(&self) -> Result<HealthStatus, ApiError>;

    /// `POST /predict`
    async fn predict(&self, input: &PredictionInput) -> Result<PredictionResult, ApiError>;

    /// `POST /explain`
    async fn explain(&self, input: &PredictionInput) -> Result<Explanation, ApiError>;

    /// `POST /voice/explain` — synthesised speech describing the prediction.
    async fn voice_explanation(&self, input: &PredictionInput) -> Result<AudioClip, ApiError>;

    /// `POST /chat`
    async fn chat(&self, message: &str, context: &str) -> Result<ChatReply, ApiError>;

    /// `POST /chat/prediction_explanation`
    async fn prediction_explanation(
        &self,
        input: &PredictionInput,
    ) -> Result<PredictionExplanation, ApiError>;

    /// `POST /chat/storage_advice`
    async fn storage_advice(
        &self,
        food_type: FoodType,
        conditions: Option<&StorageConditions>,
    ) -> Result<ChatReply, ApiError>;

    /// `POST /batch_predict`
    async fn batch_predict(
        &self,
        items: &[PredictionInput],
    ) -> Result<Vec<PredictionResult>, ApiError>;
}

// ---------------------------------------------------------------------------
// ApiClient
// ---------------------------------------------------------------------------

/// HTTP client for the prediction backend.
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Build an `ApiClient` from application config.
    ///
    /// The HTTP client is pre-configured with the per-request timeout from
    /// `config.timeout_secs`; a default client is used if the builder fails.
    pub fn from_config(config: &ApiConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send `req`, turning non-2xx statuses into [`ApiError::Status`].
    async fn send(
        &self,
        path: &str,
        req: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, ApiError> {
        log::debug!("api: {path}");

        let response = req.send().await.map_err(|e| {
            log::warn!("api: {path} failed: {e}");
            ApiError::from(e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = extract_error_message(&body);
        log::warn!(
            "api: {path} returned {status}: {}",
            message.as_deref().unwrap_or("<no message>")
        );
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned + Send,
    {
        let req = self.client.post(self.url(path)).json(body);
        let response = self.send(path, req).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl ShelfLifeApi for ApiClient {
    async fn health_check(&self) -> Result<HealthStatus, ApiError> {
        let req = self.client.get(self.url("/health"));
        let response = self.send("/health", req).await?;
        Ok(response.json().await?)
    }

    /// Non-finite numbers in `input` are sent as `0`.
    async fn predict(&self, input: &PredictionInput) -> Result<PredictionResult, ApiError> {
        self.post_json("/predict", &input.sanitized()).await
    }

    async fn explain(&self, input: &PredictionInput) -> Result<Explanation, ApiError> {
        self.post_json("/explain", &input.sanitized()).await
    }

    async fn voice_explanation(&self, input: &PredictionInput) -> Result<AudioClip, ApiError> {
        let req = self
            .client
            .post(self.url("/voice/explain"))
            .json(&input.sanitized());
        let response = self.send("/voice/explain", req).await?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?.to_vec();

        log::debug!("api: received {} bytes of audio", bytes.len());
        Ok(AudioClip {
            bytes,
            content_type,
        })
    }

    async fn chat(&self, message: &str, context: &str) -> Result<ChatReply, ApiError> {
        self.post_json("/chat", &ChatRequest { message, context })
            .await
    }

    async fn prediction_explanation(
        &self,
        input: &PredictionInput,
    ) -> Result<PredictionExplanation, ApiError> {
        self.post_json("/chat/prediction_explanation", &input.sanitized())
            .await
    }

    async fn storage_advice(
        &self,
        food_type: FoodType,
        conditions: Option<&StorageConditions>,
    ) -> Result<ChatReply, ApiError> {
        let body = StorageAdviceRequest {
            food_type,
            storage_conditions: conditions,
        };
        self.post_json("/chat/storage_advice", &body).await
    }

    async fn batch_predict(
        &self,
        items: &[PredictionInput],
    ) -> Result<Vec<PredictionResult>, ApiError> {
        let items: Vec<PredictionInput> = items.iter().map(|i| i.sanitized()).collect();
        let response: BatchResponse = self
            .post_json("/batch_predict", &BatchRequest { items: &items })
            .await?;
        Ok(response.results)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::StorageType;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// What the stub server saw.
    struct Captured {
        request_line: String,
        body: String,
    }

    impl Captured {
        fn json(&self) -> serde_json::Value {
            serde_json::from_str(&self.body).expect("request body is JSON")
        }
    }

    /// Serve exactly one HTTP request with a canned response.
    ///
    /// Returns the base URL (with an `/api` prefix) and a handle resolving to
    /// the captured request.
    async fn serve_once(
        status: u16,
        content_type: &'static str,
        body: impl Into<Vec<u8>>,
    ) -> (String, tokio::task::JoinHandle<Captured>) {
        let body = body.into();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];

            let header_end = loop {
                let n = sock.read(&mut chunk).await.unwrap();
                assert!(n > 0, "client closed before sending headers");
                buf.extend_from_slice(&chunk[..n]);
                if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
            };

            let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
            let content_length = head
                .lines()
                .filter_map(|l| l.split_once(':'))
                .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, v)| v.trim().parse::<usize>().ok())
                .unwrap_or(0);

            while buf.len() < header_end + content_length {
                let n = sock.read(&mut chunk).await.unwrap();
                assert!(n > 0, "client closed mid-body");
                buf.extend_from_slice(&chunk[..n]);
            }

            let request_body =
                String::from_utf8_lossy(&buf[header_end..header_end + content_length]).to_string();

            let reason = if status < 300 { "OK" } else { "Error" };
            let mut response = format!(
                "HTTP/1.1 {status} {reason}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            )
            .into_bytes();
            response.extend_from_slice(&body);
            sock.write_all(&response).await.unwrap();
            let _ = sock.shutdown().await;

            Captured {
                request_line: head.lines().next().unwrap_or_default().to_string(),
                body: request_body,
            }
        });

        (format!("http://{addr}/api"), handle)
    }

    fn client_for(base_url: &str) -> ApiClient {
        ApiClient::from_config(&ApiConfig {
            base_url: base_url.to_string(),
            timeout_secs: 5,
        })
    }

    fn dairy() -> PredictionInput {
        PredictionInput {
            food_type: FoodType::Dairy,
            temperature: 4.0,
            humidity: 65.0,
            storage_type: StorageType::Refrigerator,
            days_stored: 2.0,
        }
    }

    const DAIRY_RESULT: &str = r#"{
        "food_type": "dairy", "storage_type": "refrigerator",
        "temperature": 4.0, "humidity": 65.0, "days_stored": 2.0,
        "predicted_remaining_days": 3, "raw_prediction": 3.4,
        "safety_classification": "Consume Soon",
        "issues": ["Borderline humidity"], "severity": "medium",
        "recommendations": ["Consume within 1 day"],
        "feature_importance": {"temperature": 0.41, "days_stored": 0.33}
    }"#;

    #[test]
    fn from_config_trims_trailing_slash() {
        let client = client_for("http://localhost:5001/");
        assert_eq!(client.base_url(), "http://localhost:5001");
    }

    /// `ApiClient` must be usable as `dyn ShelfLifeApi`.
    #[test]
    fn client_is_object_safe() {
        let client: Box<dyn ShelfLifeApi> = Box::new(client_for("http://localhost:5001"));
        drop(client);
    }

    #[tokio::test]
    async fn predict_posts_input_and_echoes_fields() {
        let (base, server) = serve_once(200, "application/json", DAIRY_RESULT).await;
        let client = client_for(&base);

        let input = dairy();
        let result = client.predict(&input).await.unwrap();
        let captured = server.await.unwrap();

        assert_eq!(captured.request_line, "POST /api/predict HTTP/1.1");
        assert_eq!(captured.json(), serde_json::to_value(input).unwrap());

        assert_eq!(result.food_type, input.food_type.as_str());
        assert_eq!(result.storage_type, input.storage_type.as_str());
        assert_eq!(result.temperature, input.temperature);
        assert_eq!(result.humidity, input.humidity);
        assert_eq!(result.days_stored, input.days_stored);
        assert_eq!(result.predicted_remaining_days, 3.0);
        assert_eq!(result.safety_classification, "Consume Soon");
        assert_eq!(result.issues, vec!["Borderline humidity".to_string()]);
        assert_eq!(result.feature_importance.len(), 2);
    }

    #[tokio::test]
    async fn predict_never_sends_nan() {
        let (base, server) = serve_once(200, "application/json", DAIRY_RESULT).await;
        let client = client_for(&base);

        let input = PredictionInput {
            temperature: f64::NAN,
            humidity: f64::NAN,
            ..dairy()
        };
        client.predict(&input).await.unwrap();

        let sent = server.await.unwrap().json();
        assert_eq!(sent["temperature"], serde_json::json!(0.0));
        assert_eq!(sent["humidity"], serde_json::json!(0.0));
    }

    #[tokio::test]
    async fn non_success_status_carries_backend_message() {
        let (base, server) =
            serve_once(500, "application/json", r#"{"error": "Model not loaded"}"#).await;
        let client = client_for(&base);

        let err = client.predict(&dairy()).await.unwrap_err();
        server.await.unwrap();

        match err {
            ApiError::Status { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message.as_deref(), Some("Model not loaded"));
            }
            other => panic!("expected Status, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_success_body_is_decode_error() {
        let (base, server) = serve_once(200, "application/json", "not json").await;
        let client = client_for(&base);

        let err = client.predict(&dairy()).await.unwrap_err();
        server.await.unwrap();
        assert!(matches!(err, ApiError::Decode(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn unreachable_backend_is_request_error() {
        // Grab a free port, then close it again.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(&format!("http://{addr}/api"));
        let err = client.health_check().await.unwrap_err();
        assert!(matches!(err, ApiError::Request(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn health_check_is_a_get() {
        let (base, server) = serve_once(
            200,
            "application/json",
            r#"{"status": "healthy", "pipeline_loaded": true}"#,
        )
        .await;
        let client = client_for(&base);

        let health = client.health_check().await.unwrap();
        let captured = server.await.unwrap();

        assert_eq!(captured.request_line, "GET /api/health HTTP/1.1");
        assert_eq!(health.status, "healthy");
        assert!(health.pipeline_loaded);
    }

    #[tokio::test]
    async fn voice_explanation_returns_raw_bytes() {
        let audio = vec![0xFF_u8, 0xFB, 0x90, 0x64, 0x00, 0x01];
        let (base, server) = serve_once(200, "audio/mpeg", audio.clone()).await;
        let client = client_for(&base);

        let clip = client.voice_explanation(&dairy()).await.unwrap();
        let captured = server.await.unwrap();

        assert_eq!(captured.request_line, "POST /api/voice/explain HTTP/1.1");
        assert_eq!(clip.bytes, audio);
        assert_eq!(clip.content_type.as_deref(), Some("audio/mpeg"));
    }

    #[tokio::test]
    async fn chat_sends_message_and_context() {
        let (base, server) = serve_once(
            200,
            "application/json",
            r#"{"success": true, "response": "Keep it below 4 degrees."}"#,
        )
        .await;
        let client = client_for(&base);

        let reply = client.chat("How long does milk last?", "").await.unwrap();
        let captured = server.await.unwrap();

        assert_eq!(captured.request_line, "POST /api/chat HTTP/1.1");
        assert_eq!(
            captured.json(),
            serde_json::json!({ "message": "How long does milk last?", "context": "" })
        );
        assert_eq!(reply.into_text().as_deref(), Some("Keep it below 4 degrees."));
    }

    #[tokio::test]
    async fn explain_returns_explanation_and_result() {
        let body = format!(r#"{{"explanation": "Humidity is borderline.", "result": {DAIRY_RESULT}}}"#);
        let (base, server) = serve_once(200, "application/json", body).await;
        let client = client_for(&base);

        let explanation = client.explain(&dairy()).await.unwrap();
        let captured = server.await.unwrap();

        assert_eq!(captured.request_line, "POST /api/explain HTTP/1.1");
        assert_eq!(explanation.explanation, serde_json::json!("Humidity is borderline."));
        assert_eq!(
            explanation.result.map(|r| r.safety_classification).as_deref(),
            Some("Consume Soon")
        );
    }

    #[tokio::test]
    async fn prediction_explanation_parses_qa_pairs() {
        let (base, server) = serve_once(
            200,
            "application/json",
            r#"{"explanation": [{"question": "What should I do?", "answer": "Eat it today."}]}"#,
        )
        .await;
        let client = client_for(&base);

        let explanation = client.prediction_explanation(&dairy()).await.unwrap();
        let captured = server.await.unwrap();

        assert_eq!(
            captured.request_line,
            "POST /api/chat/prediction_explanation HTTP/1.1"
        );
        assert_eq!(explanation.explanation.len(), 1);
        assert_eq!(explanation.explanation[0].answer, "Eat it today.");
    }

    #[tokio::test]
    async fn storage_advice_sends_food_type_and_conditions() {
        let (base, server) =
            serve_once(200, "application/json", r#"{"response": "Wrap it tightly."}"#).await;
        let client = client_for(&base);

        let conditions = StorageConditions::from(&dairy());
        let reply = client
            .storage_advice(FoodType::Dairy, Some(&conditions))
            .await
            .unwrap();
        let captured = server.await.unwrap();

        assert_eq!(captured.request_line, "POST /api/chat/storage_advice HTTP/1.1");
        assert_eq!(
            captured.json(),
            serde_json::json!({
                "food_type": "dairy",
                "storage_conditions": {
                    "storage_type": "refrigerator",
                    "temperature": 4.0,
                    "humidity": 65.0
                }
            })
        );
        assert_eq!(reply.into_text().as_deref(), Some("Wrap it tightly."));
    }

    #[tokio::test]
    async fn batch_predict_wraps_items() {
        let body = format!(r#"{{"results": [{DAIRY_RESULT}, {DAIRY_RESULT}]}}"#);
        let (base, server) = serve_once(200, "application/json", body).await;
        let client = client_for(&base);

        let results = client.batch_predict(&[dairy(), dairy()]).await.unwrap();
        let captured = server.await.unwrap();

        assert_eq!(captured.request_line, "POST /api/batch_predict HTTP/1.1");
        assert_eq!(captured.json()["items"].as_array().map(Vec::len), Some(2));
        assert_eq!(results.len(), 2);
    }
}
