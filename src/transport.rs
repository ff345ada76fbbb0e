use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::error::{AdvisorError, GatewayError, Result};
use crate::models::{GeminiRequest, GeminiResponse};

pub const GEMINI_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn generate(
        &self,
        req: &GeminiRequest,
    ) -> std::result::Result<GeminiResponse, GatewayError>;
}

/// Single-attempt Gemini client. The API key travels as the `key` query parameter.
pub struct GeminiTransport {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl GeminiTransport {
    /// `timeout` of `None` leaves requests unbounded.
    pub fn new(api_key: String, endpoint: String, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AdvisorError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }
}

/// Maps a raw Gemini reply onto the gateway's failure taxonomy.
pub fn parse_response(
    status: u16,
    body: &str,
) -> std::result::Result<GeminiResponse, GatewayError> {
    if !(200..300).contains(&status) {
        tracing::error!("Gemini API Error: {} {}", status, body);
        return Err(GatewayError::HttpStatus {
            status,
            body: body.to_string(),
        });
    }
    Ok(serde_json::from_str(body)?)
}

#[async_trait]
impl Transport for GeminiTransport {
    async fn generate(
        &self,
        req: &GeminiRequest,
    ) -> std::result::Result<GeminiResponse, GatewayError> {
        tracing::info!("Calling Gemini with {} messages", req.contents.len());

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(req)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        parse_response(status, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::build_request;
    use crate::models::GeminiContent;
    use serde_json::{Value, json};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn transport_for(server: &MockServer) -> GeminiTransport {
        GeminiTransport::new(
            "test-key".to_string(),
            format!("{}/v1beta/models/gemini-1.5-flash:generateContent", server.uri()),
            Some(Duration::from_secs(5)),
        )
        .expect("client should build")
    }

    #[test]
    fn test_parse_response_success() {
        let resp = parse_response(
            200,
            r#"{"candidates":[{"content":{"parts":[{"text":"Welcome to Canada"}]}}]}"#,
        )
        .expect("valid body should parse");
        assert_eq!(resp.first_text(), Some("Welcome to Canada"));
    }

    #[test]
    fn test_parse_response_non_success_keeps_status_and_body() {
        let err = parse_response(429, "quota exceeded").unwrap_err();
        match err {
            GatewayError::HttpStatus { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "quota exceeded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_response_malformed_json_is_transport() {
        let err = parse_response(200, "<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, GatewayError::Transport(_)));
    }

    #[test]
    fn test_parse_response_empty_object_has_no_candidates() {
        let resp = parse_response(200, "{}").expect("empty object is valid");
        assert!(resp.candidates.is_empty());
    }

    #[test]
    fn test_transport_builds_with_and_without_timeout() {
        assert!(
            GeminiTransport::new("k".to_string(), GEMINI_API_URL.to_string(), None).is_ok()
        );
        assert!(
            GeminiTransport::new(
                "k".to_string(),
                GEMINI_API_URL.to_string(),
                Some(Duration::from_secs(5))
            )
            .is_ok()
        );
    }

    #[tokio::test]
    async fn test_generate_posts_camel_case_body_with_key_param() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"parts": [{"text": "Hello from Gemini"}]}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let req = build_request(vec![
            GeminiContent::user("persona"),
            GeminiContent::model("ack"),
            GeminiContent::user("Moving to Canada?"),
        ]);
        let resp = transport_for(&server)
            .generate(&req)
            .await
            .expect("mocked call should succeed");
        assert_eq!(resp.first_text(), Some("Hello from Gemini"));

        let received = server.received_requests().await.expect("recording enabled");
        let body: Value = serde_json::from_slice(&received[0].body).expect("json body");
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][1]["role"], "model");
        assert_eq!(body["contents"][2]["parts"][0]["text"], "Moving to Canada?");
        assert_eq!(body["generationConfig"]["topK"], 40);
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 2000);
        assert_eq!(body["safetySettings"].as_array().map(Vec::len), Some(4));
        assert_eq!(
            body["safetySettings"][0]["threshold"],
            "BLOCK_MEDIUM_AND_ABOVE"
        );
    }

    #[tokio::test]
    async fn test_generate_maps_server_error_to_http_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
            .mount(&server)
            .await;

        let req = build_request(vec![GeminiContent::user("hi")]);
        let err = transport_for(&server).generate(&req).await.unwrap_err();
        match err {
            GatewayError::HttpStatus { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "internal");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_generate_unreachable_host_is_transport_error() {
        let transport = GeminiTransport::new(
            "k".to_string(),
            "http://127.0.0.1:9/generate".to_string(),
            Some(Duration::from_secs(2)),
        )
        .unwrap();
        let req = build_request(vec![GeminiContent::user("hi")]);
        let err = transport.generate(&req).await.unwrap_err();
        assert!(matches!(err, GatewayError::Transport(_)));
    }
}
