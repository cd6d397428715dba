//! HTTP client for the streaming chat completions endpoint.

use std::collections::VecDeque;
use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, BoxStream, Stream, StreamExt};
use reqwest::Client as HttpClient;
use reqwest::header::ACCEPT;
use tracing::{debug, warn};

use crate::error::GroqError;
use crate::sse::{SseDecoder, SseEvent};
use crate::types::{ChatCompletionChunk, ChatCompletionRequest, ErrorResponse};
use crate::GroqConfig;

/// Text fragments in arrival order. Dropping it closes the response body.
pub type FragmentStream = BoxStream<'static, Result<String, GroqError>>;

/// A remote service that streams a chat completion as text fragments.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn stream_chat(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<FragmentStream, GroqError>;
}

/// Client for Groq's OpenAI-compatible API.
pub struct GroqClient {
    api_key: String,
    api_base_url: String,
    http_client: HttpClient,
}

impl GroqClient {
    /// Create a client, resolving the API key up front.
    pub fn new(config: GroqConfig) -> Result<Self, GroqError> {
        let api_key = config.resolve_api_key()?;

        let mut builder = HttpClient::builder();
        if let Some(secs) = config.connect_timeout_secs {
            builder = builder.connect_timeout(Duration::from_secs(secs));
        }
        let http_client = builder.build()?;

        Ok(Self {
            api_key,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }
}

#[async_trait]
impl CompletionService for GroqClient {
    async fn stream_chat(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<FragmentStream, GroqError> {
        debug!(
            "Sending streaming request to {} (model {})",
            self.api_base_url, request.model
        );

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.api_base_url))
            .bearer_auth(&self.api_key)
            .header(ACCEPT, "text/event-stream")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let message = serde_json::from_str::<ErrorResponse>(&error_text)
                .map(|body| body.error.describe())
                .unwrap_or(error_text);
            warn!("Completion request rejected with status {}", status);
            return Err(GroqError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        Ok(decode_fragments(response.bytes_stream()))
    }
}

struct DecodeState<S> {
    bytes: Pin<Box<S>>,
    decoder: SseDecoder,
    pending: VecDeque<Result<String, GroqError>>,
    finished: bool,
}

impl<S> DecodeState<S> {
    fn enqueue(&mut self, events: Vec<SseEvent>) {
        for event in events {
            if self.finished {
                break;
            }
            match event {
                SseEvent::Done => self.finished = true,
                SseEvent::Data(data) => match parse_fragment(&data) {
                    Ok(Some(fragment)) => self.pending.push_back(Ok(fragment)),
                    Ok(None) => {}
                    Err(e) => {
                        self.pending.push_back(Err(e));
                        self.finished = true;
                    }
                },
            }
        }
    }
}

/// Turn a raw SSE byte stream into text fragments.
///
/// Ends at `[DONE]`, at the end of the byte stream, or right after the
/// first error.
pub fn decode_fragments<S, B, E>(bytes: S) -> FragmentStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Into<GroqError> + Send + 'static,
{
    let state = DecodeState {
        bytes: Box::pin(bytes),
        decoder: SseDecoder::new(),
        pending: VecDeque::new(),
        finished: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(item) = state.pending.pop_front() {
                return Some((item, state));
            }
            if state.finished {
                return None;
            }
            match state.bytes.next().await {
                Some(Ok(chunk)) => {
                    let events = state.decoder.push(chunk.as_ref());
                    state.enqueue(events);
                }
                Some(Err(e)) => {
                    state.pending.push_back(Err(e.into()));
                    state.finished = true;
                }
                None => {
                    let events = state.decoder.finish();
                    state.enqueue(events);
                    state.finished = true;
                }
            }
        }
    })
    .boxed()
}

/// `Ok(None)` for chunks that carry no choices.
fn parse_fragment(data: &str) -> Result<Option<String>, GroqError> {
    if let Ok(body) = serde_json::from_str::<ErrorResponse>(data) {
        return Err(GroqError::ApiError {
            status: 200,
            message: body.error.describe(),
        });
    }

    let chunk: ChatCompletionChunk = serde_json::from_str(data).map_err(|e| {
        GroqError::ParseError(format!(
            "{} - Data: {}",
            e,
            data.chars().take(200).collect::<String>()
        ))
    })?;
    Ok(chunk.fragment().map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GenerationParams;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn sse_body(fragments: &[&str]) -> String {
        let mut body = String::new();
        for fragment in fragments {
            let chunk = json!({
                "id": "chatcmpl-1",
                "choices": [{ "index": 0, "delta": { "content": fragment }, "finish_reason": null }]
            });
            body.push_str(&format!("data: {}\n\n", chunk));
        }
        body.push_str("data: [DONE]\n\n");
        body
    }

    fn chunks(parts: Vec<&'static str>) -> FragmentStream {
        decode_fragments(stream::iter(
            parts.into_iter().map(|p| Ok::<_, GroqError>(p.as_bytes().to_vec())),
        ))
    }

    fn client_for(server: &Server) -> GroqClient {
        GroqClient::new(
            GroqConfig::new()
                .with_api_key("gsk_test")
                .with_api_base_url(server.url()),
        )
        .unwrap()
    }

    #[test]
    fn test_decode_fragments_in_order() {
        let body = sse_body(&["Hel", "lo", "!"]);
        let stream = decode_fragments(stream::iter(vec![Ok::<_, GroqError>(body.into_bytes())]));
        let fragments: Vec<String> = tokio_test::block_on(stream.map(|r| r.unwrap()).collect());
        assert_eq!(fragments, vec!["Hel", "lo", "!"]);
    }

    #[tokio::test]
    async fn test_missing_content_is_empty_fragment() {
        let stream = chunks(vec![
            "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"x\"}}]}\n\n",
            "data: [DONE]\n\n",
        ]);
        let fragments: Vec<String> = stream.map(|r| r.unwrap()).collect().await;
        assert_eq!(fragments, vec!["", "x"]);
    }

    #[tokio::test]
    async fn test_chunk_without_choices_skipped() {
        let stream = chunks(vec![
            "data: {\"choices\":[{\"delta\":{\"content\":\"a\"}}]}\n\n",
            "data: {\"choices\":[],\"x_groq\":{\"usage\":{}}}\n\n",
        ]);
        let fragments: Vec<String> = stream.map(|r| r.unwrap()).collect().await;
        assert_eq!(fragments, vec!["a"]);
    }

    #[tokio::test]
    async fn test_closed_without_done_is_normal_end() {
        let stream = chunks(vec!["data: {\"choices\":[{\"delta\":{\"content\":\"a\"}}]}"]);
        let items: Vec<_> = stream.collect().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].as_ref().unwrap(), "a");
    }

    #[tokio::test]
    async fn test_nothing_after_done() {
        let stream = chunks(vec![
            "data: [DONE]\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"late\"}}]}\n\n",
        ]);
        let items: Vec<_> = stream.collect().await;
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_chunk_ends_stream() {
        let stream = chunks(vec![
            "data: {\"choices\":[{\"delta\":{\"content\":\"a\"}}]}\n\n",
            "data: {not json\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"b\"}}]}\n\n",
        ]);
        let items: Vec<_> = stream.collect().await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_ref().unwrap(), "a");
        assert!(matches!(items[1], Err(GroqError::ParseError(_))));
    }

    #[tokio::test]
    async fn test_in_stream_error_object() {
        let stream = chunks(vec![
            "data: {\"choices\":[{\"delta\":{\"content\":\"a\"}}]}\n\n",
            "data: {\"error\":{\"message\":\"overloaded\",\"type\":\"server_error\"}}\n\n",
        ]);
        let items: Vec<_> = stream.collect().await;
        assert_eq!(items.len(), 2);
        match &items[1] {
            Err(GroqError::ApiError { message, .. }) => {
                assert_eq!(message, "overloaded (server_error)")
            }
            other => panic!("unexpected item: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_transport_error_after_fragment() {
        let parts: Vec<Result<Vec<u8>, GroqError>> = vec![
            Ok(b"data: {\"choices\":[{\"delta\":{\"content\":\"A\"}}]}\n\n".to_vec()),
            Err(GroqError::ParseError("connection reset".to_string())),
        ];
        let items: Vec<_> = decode_fragments(stream::iter(parts)).collect().await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_ref().unwrap(), "A");
        assert!(items[1].is_err());
    }

    #[tokio::test]
    async fn test_stream_chat_posts_streaming_request() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer gsk_test")
            .match_body(Matcher::PartialJson(json!({
                "model": "llama-3.1-70b-versatile",
                "messages": [{ "role": "user", "content": "hello" }],
                "stream": true,
                "stop": null
            })))
            .with_status(200)
            .with_header("content-type", "text/event-stream")
            .with_body(sse_body(&["A", "B", "C"]))
            .create_async()
            .await;

        let client = client_for(&server);
        let request = ChatCompletionRequest::streaming(&GenerationParams::default(), "hello");
        let stream = client.stream_chat(&request).await.unwrap();
        let fragments: Vec<String> = stream.map(|r| r.unwrap()).collect().await;

        assert_eq!(fragments, vec!["A", "B", "C"]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_stream_chat_non_success_status() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_body(r#"{"error":{"message":"Rate limit reached","type":"tokens"}}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let request = ChatCompletionRequest::streaming(&GenerationParams::default(), "hello");
        let err = match client.stream_chat(&request).await {
            Err(e) => e,
            Ok(_) => panic!("expected an error"),
        };
        match err {
            GroqError::ApiError { status, message } => {
                assert_eq!(status, 429);
                assert_eq!(message, "Rate limit reached (tokens)");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = GroqClient::new(
            GroqConfig::new()
                .with_api_key("gsk_test")
                .with_api_base_url("http://localhost:1234/v1/"),
        )
        .unwrap();
        assert_eq!(client.api_base_url(), "http://localhost:1234/v1");
    }
}
