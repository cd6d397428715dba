//! Submits a prompt and turns the fragment stream into cumulative snapshots.
//!
//! Each snapshot is the full text received so far, so every emission extends
//! the previous one. The stream ends when the service closes it or right
//! after the first error.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::future;
use futures::stream::{BoxStream, Stream, StreamExt};
use physio_audit::{AuditError, AuditLogWriter};
use physio_core::IntakeRecord;
use physio_groq::{
    ChatCompletionRequest, CompletionService, FragmentStream, GenerationParams, GroqError,
};
use physio_prompt::PromptBuilder;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum AssessmentError {
    #[error("Audit log write failed: {0}")]
    Audit(#[from] AuditError),

    #[error("Completion service error: {0}")]
    Service(#[from] GroqError),
}

/// Streams assessments for built prompts.
pub struct AssessmentStreamer {
    service: Arc<dyn CompletionService>,
    audit: AuditLogWriter,
    params: GenerationParams,
    audit_required: bool,
}

impl AssessmentStreamer {
    pub fn new(
        service: Arc<dyn CompletionService>,
        audit: AuditLogWriter,
        params: GenerationParams,
    ) -> Self {
        Self {
            service,
            audit,
            params,
            audit_required: true,
        }
    }

    /// When false, a failed audit write is logged and the submission goes on.
    pub fn with_audit_required(mut self, required: bool) -> Self {
        self.audit_required = required;
        self
    }

    /// Persist `prompt`, submit it, and return the snapshot stream.
    pub async fn stream(&self, prompt: &str) -> Result<AssessmentStream, AssessmentError> {
        match self.audit.write(prompt) {
            Ok(path) => info!("Prompt recorded at {}", path.display()),
            Err(e) if self.audit_required => return Err(e.into()),
            Err(e) => warn!("Continuing without audit record: {}", e),
        }

        let request = ChatCompletionRequest::streaming(&self.params, prompt);
        debug!(
            "Submitting prompt ({} chars) to model {}",
            prompt.chars().count(),
            self.params.model
        );
        let fragments = self.service.stream_chat(&request).await?;
        Ok(AssessmentStream::new(fragments))
    }
}

/// Build the prompt for `intake` and stream its assessment.
pub async fn generate_assessment(
    streamer: &AssessmentStreamer,
    builder: &PromptBuilder,
    intake: &IntakeRecord,
) -> Result<AssessmentStream, AssessmentError> {
    let prompt = builder.build_assessment_prompt(intake);
    streamer.stream(&prompt).await
}

/// Lazy, non-restartable sequence of cumulative assessment texts.
pub struct AssessmentStream {
    inner: BoxStream<'static, Result<String, AssessmentError>>,
}

impl AssessmentStream {
    pub fn new(fragments: FragmentStream) -> Self {
        let inner = fragments
            .scan((String::new(), false), |state, item| {
                let (buffer, failed) = state;
                if *failed {
                    return future::ready(None);
                }
                let snapshot = match item {
                    Ok(fragment) => {
                        buffer.push_str(&fragment);
                        Ok(buffer.clone())
                    }
                    Err(e) => {
                        *failed = true;
                        Err(AssessmentError::from(e))
                    }
                };
                future::ready(Some(snapshot))
            })
            .boxed();
        Self { inner }
    }

    /// Drain the stream and return the last snapshot, empty if none arrived.
    pub async fn final_text(mut self) -> Result<String, AssessmentError> {
        let mut text = String::new();
        while let Some(snapshot) = self.next().await {
            text = snapshot?;
        }
        Ok(text)
    }
}

impl Stream for AssessmentStream {
    type Item = Result<String, AssessmentError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.poll_next_unpin(cx)
    }
}

impl std::fmt::Debug for AssessmentStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssessmentStream").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use futures::stream;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Replays fixed fragments, optionally failing after them.
    struct FakeService {
        fragments: Vec<&'static str>,
        fail_after: bool,
        requests: Mutex<Vec<ChatCompletionRequest>>,
        audit_dir: Option<PathBuf>,
        audit_files_at_call: Mutex<Option<usize>>,
    }

    impl FakeService {
        fn new(fragments: Vec<&'static str>) -> Self {
            Self {
                fragments,
                fail_after: false,
                requests: Mutex::new(Vec::new()),
                audit_dir: None,
                audit_files_at_call: Mutex::new(None),
            }
        }

        fn failing_after(mut self) -> Self {
            self.fail_after = true;
            self
        }

        fn watching(mut self, dir: PathBuf) -> Self {
            self.audit_dir = Some(dir);
            self
        }

        fn call_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CompletionService for FakeService {
        async fn stream_chat(
            &self,
            request: &ChatCompletionRequest,
        ) -> Result<FragmentStream, GroqError> {
            self.requests.lock().unwrap().push(request.clone());
            if let Some(ref dir) = self.audit_dir {
                let count = std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0);
                *self.audit_files_at_call.lock().unwrap() = Some(count);
            }

            let mut items: Vec<Result<String, GroqError>> =
                self.fragments.iter().map(|f| Ok(f.to_string())).collect();
            if self.fail_after {
                items.push(Err(GroqError::ApiError {
                    status: 500,
                    message: "connection reset".to_string(),
                }));
            }
            Ok(stream::iter(items).boxed())
        }
    }

    fn streamer_with(service: Arc<FakeService>, dir: &TempDir) -> AssessmentStreamer {
        AssessmentStreamer::new(
            service,
            AuditLogWriter::new(dir.path()),
            GenerationParams::default(),
        )
    }

    #[tokio::test]
    async fn test_snapshots_are_cumulative() {
        let dir = TempDir::new().unwrap();
        let service = Arc::new(FakeService::new(vec!["A", "B", "C"]));
        let streamer = streamer_with(service, &dir);

        let snapshots: Vec<String> = streamer
            .stream("prompt")
            .await
            .unwrap()
            .map(|s| s.unwrap())
            .collect()
            .await;
        assert_eq!(snapshots, vec!["A", "AB", "ABC"]);
    }

    #[tokio::test]
    async fn test_each_snapshot_extends_previous() {
        let dir = TempDir::new().unwrap();
        let service = Arc::new(FakeService::new(vec!["疼", "", "痛", " ok"]));
        let streamer = streamer_with(service, &dir);

        let snapshots: Vec<String> = streamer
            .stream("prompt")
            .await
            .unwrap()
            .map(|s| s.unwrap())
            .collect()
            .await;
        for pair in snapshots.windows(2) {
            assert!(pair[1].starts_with(&pair[0]));
        }
        assert_eq!(snapshots.last().unwrap(), "疼痛 ok");
    }

    #[tokio::test]
    async fn test_zero_fragments_is_empty_not_error() {
        let dir = TempDir::new().unwrap();
        let service = Arc::new(FakeService::new(vec![]));
        let streamer = streamer_with(service, &dir);

        let stream = streamer.stream("prompt").await.unwrap();
        assert_eq!(stream.final_text().await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_error_after_prefix_is_delivered_last() {
        let dir = TempDir::new().unwrap();
        let service = Arc::new(FakeService::new(vec!["A"]).failing_after());
        let streamer = streamer_with(service, &dir);

        let items: Vec<_> = streamer.stream("prompt").await.unwrap().collect().await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_ref().unwrap(), "A");
        assert!(matches!(items[1], Err(AssessmentError::Service(_))));
    }

    #[tokio::test]
    async fn test_final_text_reports_error() {
        let dir = TempDir::new().unwrap();
        let service = Arc::new(FakeService::new(vec!["A"]).failing_after());
        let streamer = streamer_with(service, &dir);

        let stream = streamer.stream("prompt").await.unwrap();
        assert!(stream.final_text().await.is_err());
    }

    #[tokio::test]
    async fn test_audit_written_before_submission() {
        let dir = TempDir::new().unwrap();
        let service = Arc::new(FakeService::new(vec!["x"]).watching(dir.path().to_path_buf()));
        let streamer = streamer_with(service.clone(), &dir);

        streamer.stream("prompt").await.unwrap();
        assert_eq!(*service.audit_files_at_call.lock().unwrap(), Some(1));
    }

    #[tokio::test]
    async fn test_request_carries_prompt_and_params() {
        let dir = TempDir::new().unwrap();
        let service = Arc::new(FakeService::new(vec![]));
        let streamer = streamer_with(service.clone(), &dir);

        streamer.stream("hello").await.unwrap();
        let requests = service.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].messages.len(), 1);
        assert_eq!(requests[0].messages[0].content, "hello");
        assert!(requests[0].stream);
        assert!(requests[0].stop.is_none());
        assert_eq!(requests[0].temperature, 0.7);
    }

    #[tokio::test]
    async fn test_required_audit_failure_blocks_submission() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "x").unwrap();

        let service = Arc::new(FakeService::new(vec!["A"]));
        let streamer = AssessmentStreamer::new(
            service.clone(),
            AuditLogWriter::new(&blocker),
            GenerationParams::default(),
        );

        let err = streamer.stream("prompt").await.unwrap_err();
        assert!(matches!(err, AssessmentError::Audit(_)));
        assert_eq!(service.call_count(), 0);
    }

    #[tokio::test]
    async fn test_best_effort_audit_continues() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "x").unwrap();

        let service = Arc::new(FakeService::new(vec!["A"]));
        let streamer = AssessmentStreamer::new(
            service.clone(),
            AuditLogWriter::new(&blocker),
            GenerationParams::default(),
        )
        .with_audit_required(false);

        let text = streamer.stream("prompt").await.unwrap().final_text().await.unwrap();
        assert_eq!(text, "A");
        assert_eq!(service.call_count(), 1);
    }

    #[test]
    fn test_generate_assessment_uses_builder() {
        let dir = TempDir::new().unwrap();
        let service = Arc::new(FakeService::new(vec!["done"]));
        let streamer = streamer_with(service.clone(), &dir);
        let builder = PromptBuilder::new().with_language("en");
        let intake = IntakeRecord {
            pain_location: "left shoulder".to_string(),
            ..Default::default()
        };

        let text = tokio_test::block_on(async {
            generate_assessment(&streamer, &builder, &intake)
                .await
                .unwrap()
                .final_text()
                .await
                .unwrap()
        });
        assert_eq!(text, "done");

        let requests = service.requests.lock().unwrap();
        assert!(requests[0].messages[0].content.contains("left shoulder"));
    }
}
