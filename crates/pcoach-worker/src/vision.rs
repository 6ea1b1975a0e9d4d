//! Vision-language model client.
//!
//! Speaks the OpenAI-compatible chat completions API: one system message,
//! one user message carrying the prompt text and the frame as a data URL.
//! Requests are never retried; every failure is classified into a
//! [`ProviderError`] and handed back to the caller.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::VisionClientConfig;
use crate::error::{ProviderError, WorkerError, WorkerResult};

/// One enrichment request.
#[derive(Debug, Clone)]
pub struct FeedbackRequest {
    pub system_instruction: String,
    pub prompt: String,
    /// JPEG preview of the frame, base64 encoded
    pub image_base64: String,
}

/// A model that turns a frame and prompt into free-form feedback text.
#[async_trait]
pub trait FeedbackModel: Send + Sync {
    async fn complete(&self, request: &FeedbackRequest) -> Result<String, ProviderError>;

    /// Model name for logs and metrics.
    fn model_name(&self) -> &str;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: MessageContent<'a>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum MessageContent<'a> {
    Text(&'a str),
    Parts(Vec<ContentPart<'a>>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat completions client.
pub struct VisionClient {
    http: Client,
    config: VisionClientConfig,
}

impl VisionClient {
    pub fn new(config: VisionClientConfig) -> WorkerResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| WorkerError::config_error(format!("HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    pub fn from_env() -> WorkerResult<Self> {
        Self::new(VisionClientConfig::from_env()?)
    }

    fn build_request<'a>(&'a self, request: &'a FeedbackRequest) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: MessageContent::Text(&request.system_instruction),
                },
                ChatMessage {
                    role: "user",
                    content: MessageContent::Parts(vec![
                        ContentPart::Text {
                            text: &request.prompt,
                        },
                        ContentPart::ImageUrl {
                            image_url: ImageUrl {
                                url: format!("data:image/jpeg;base64,{}", request.image_base64),
                            },
                        },
                    ]),
                },
            ],
            max_tokens: self.config.max_tokens,
        }
    }
}

#[async_trait]
impl FeedbackModel for VisionClient {
    async fn complete(&self, request: &FeedbackRequest) -> Result<String, ProviderError> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&self.build_request(request))
            .send()
            .await
            .map_err(|e| ProviderError::from_transport(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_http_status(status.as_u16(), body));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::from_transport(&e))?;
        let chat: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::Server(format!("malformed completion: {e}")))?;

        let text = chat
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::Server("completion has no choices".to_string()))?
            .message
            .content
            .unwrap_or_default();

        debug!(model = %self.config.model, "Received {} characters of feedback", text.len());
        Ok(text)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{bearer_token, body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> VisionClient {
        VisionClient::new(VisionClientConfig {
            base_url: server.uri(),
            timeout: Duration::from_secs(5),
            ..VisionClientConfig::new("sk-test")
        })
        .unwrap()
    }

    fn request() -> FeedbackRequest {
        FeedbackRequest {
            system_instruction: "be a coach".to_string(),
            prompt: "review this".to_string(),
            image_base64: "AAAA".to_string(),
        }
    }

    async fn mock_status(server: &MockServer, status: u16) {
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(status).set_body_string("provider says no"))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_complete_returns_message_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(bearer_token("sk-test"))
            .and(body_partial_json(json!({
                "model": "gpt-4o-mini",
                "max_tokens": 800
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "{\"problem\": \"none\"}"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let text = client_for(&server).complete(&request()).await.unwrap();
        assert_eq!(text, "{\"problem\": \"none\"}");
    }

    #[test]
    fn test_request_carries_image_data_url() {
        let client = VisionClient::new(VisionClientConfig::new("sk-test")).unwrap();
        let req = request();
        let body = serde_json::to_value(client.build_request(&req)).unwrap();

        assert_eq!(body["messages"][1]["content"][0]["type"], "text");
        assert_eq!(body["messages"][1]["content"][1]["type"], "image_url");
        assert_eq!(
            body["messages"][1]["content"][1]["image_url"]["url"],
            "data:image/jpeg;base64,AAAA"
        );
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let cases = [
            (401, 401),
            (403, 403),
            (429, 429),
            (400, 400),
            (409, 409),
            (404, 404),
            (422, 422),
            (500, 502),
        ];
        for (provider_status, caller_status) in cases {
            let server = MockServer::start().await;
            mock_status(&server, provider_status).await;

            let err = client_for(&server).complete(&request()).await.unwrap_err();
            assert_eq!(err.status_code(), caller_status, "provider status {provider_status}");
        }
    }

    #[tokio::test]
    async fn test_connection_failure() {
        // nothing listens on port 1
        let client = VisionClient::new(VisionClientConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            timeout: Duration::from_secs(2),
            ..VisionClientConfig::new("sk-test")
        })
        .unwrap();

        let err = client.complete(&request()).await.unwrap_err();
        assert!(matches!(
            err,
            ProviderError::Connection(_) | ProviderError::Timeout(_)
        ));
    }

    #[tokio::test]
    async fn test_slow_provider_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_secs(3))
                    .set_body_json(json!({"choices": []})),
            )
            .mount(&server)
            .await;

        let client = VisionClient::new(VisionClientConfig {
            base_url: server.uri(),
            timeout: Duration::from_millis(200),
            ..VisionClientConfig::new("sk-test")
        })
        .unwrap();

        let err = client.complete(&request()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_empty_choices_is_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let err = client_for(&server).complete(&request()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Server(_)));
    }

    #[tokio::test]
    async fn test_malformed_body_is_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).complete(&request()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Server(ref msg) if msg.starts_with("malformed")));
    }

    #[tokio::test]
    async fn test_stalled_body_times_out() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    return;
                }
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request).to_lowercase();
                if let Some(end) = text.find("\r\n\r\n") {
                    let length = text
                        .lines()
                        .find_map(|l| l.strip_prefix("content-length:"))
                        .and_then(|v| v.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if request.len() >= end + 4 + length {
                        break;
                    }
                }
            }
            // headers promise more body than is ever sent
            socket
                .write_all(b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 64\r\n\r\n{\"choi")
                .await
                .unwrap();
            tokio::time::sleep(Duration::from_secs(3)).await;
        });

        let client = VisionClient::new(VisionClientConfig {
            base_url: format!("http://{addr}"),
            timeout: Duration::from_millis(500),
            ..VisionClientConfig::new("sk-test")
        })
        .unwrap();

        let err = client.complete(&request()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Timeout(_)));
    }
}
