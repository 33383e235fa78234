//! Fakes and helpers shared by the router tests.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use axum::Router;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use crate::common::download::Downloader;
use crate::config::settings::{AppConfig, FaceFusionConfig, SpeechConfig, StageTimeouts, StorageConfig};
use crate::infrastructure::processor::facefusion::{
    FrameProcessor, FrameProcessorKind, ProcessError, ProcessOutcome, ProcessRequest,
};
use crate::infrastructure::speech::replicate::{SpeechError, SpeechSynthesizer};
use crate::infrastructure::storage::s3::{MediaStore, ResourceKind, StorageError, StoredArtifact};
use crate::state::AppState;

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Client for talking to [`spawn_server`] instances, bypassing any proxy settings.
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

pub fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// URL on a local port nothing listens on.
pub async fn unreachable_url(path: &str) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}{}", addr, path)
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn read_json<T: DeserializeOwned>(response: Response) -> T {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[derive(Debug, Clone)]
pub struct RecordedRun {
    pub processor: FrameProcessorKind,
    pub target_bytes: Vec<u8>,
    pub source_bytes: Vec<u8>,
    pub source_name: String,
}

pub struct FakeProcessor {
    exit_code: i32,
    stderr: String,
    /// Behave like a missing executable instead of running at all.
    unlaunchable: bool,
    runs: Mutex<Vec<RecordedRun>>,
}

impl FakeProcessor {
    fn new(exit_code: i32, stderr: &str, unlaunchable: bool) -> Self {
        Self {
            exit_code,
            stderr: stderr.to_string(),
            unlaunchable,
            runs: Mutex::new(Vec::new()),
        }
    }

    pub fn runs(&self) -> Vec<RecordedRun> {
        self.runs.lock().unwrap().clone()
    }
}

#[async_trait]
impl FrameProcessor for FakeProcessor {
    async fn run(&self, request: &ProcessRequest) -> Result<ProcessOutcome, ProcessError> {
        let io = |source: std::io::Error| ProcessError::Launch {
            program: "fake".to_string(),
            source,
        };
        if self.unlaunchable {
            return Err(io(std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory")));
        }

        let run = RecordedRun {
            processor: request.processor,
            target_bytes: std::fs::read(&request.target).map_err(io)?,
            source_bytes: std::fs::read(&request.source).map_err(io)?,
            source_name: file_name(&request.source),
        };
        self.runs.lock().unwrap().push(run);

        if self.exit_code == 0 {
            std::fs::write(&request.output, b"generated").map_err(io)?;
        }

        Ok(ProcessOutcome {
            exit_code: Some(self.exit_code),
            stdout: String::new(),
            stderr: self.stderr.clone(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct RecordedUpload {
    pub public_id: String,
    pub file_name: String,
    pub secure_url: String,
}

#[derive(Default)]
pub struct FakeStore {
    broken: bool,
    uploads: Mutex<Vec<RecordedUpload>>,
}

impl FakeStore {
    pub fn uploads(&self) -> Vec<RecordedUpload> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaStore for FakeStore {
    async fn upload(
        &self,
        path: &Path,
        kind: ResourceKind,
        public_id: &str,
    ) -> Result<StoredArtifact, StorageError> {
        let key = format!("image-upload/{}", public_id);
        if self.broken {
            return Err(StorageError::Upload {
                key,
                reason: "connection reset".to_string(),
            });
        }

        std::fs::metadata(path).map_err(|e| StorageError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let secure_url = format!("https://media.test/{}/{}", kind.label(), file_name(path));
        self.uploads.lock().unwrap().push(RecordedUpload {
            public_id: public_id.to_string(),
            file_name: file_name(path),
            secure_url: secure_url.clone(),
        });

        Ok(StoredArtifact { key, secure_url })
    }
}

pub struct FakeSpeech {
    response: Mutex<Value>,
    failing: AtomicBool,
    calls: Mutex<Vec<(String, String)>>,
}

impl FakeSpeech {
    pub fn respond_with(&self, value: Value) {
        *self.response.lock().unwrap() = value;
    }

    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    fn outcome(&self) -> Result<Value, SpeechError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(SpeechError::PredictionFailed {
                id: "p0".to_string(),
                status: "failed".to_string(),
                reason: "model crashed".to_string(),
            });
        }
        Ok(self.response.lock().unwrap().clone())
    }
}

#[async_trait]
impl SpeechSynthesizer for FakeSpeech {
    async fn synthesize(&self, text: &str, voice_url: &str) -> Result<Value, SpeechError> {
        self.calls
            .lock()
            .unwrap()
            .push((text.to_string(), voice_url.to_string()));
        self.outcome()
    }

    async fn prediction(&self, _id: &str) -> Result<Value, SpeechError> {
        self.outcome()
    }
}

/// Application state wired to fakes, with its own scratch download root.
pub struct TestHarness {
    pub processor: Arc<FakeProcessor>,
    pub storage: Arc<FakeStore>,
    pub speech: Arc<FakeSpeech>,
    state: AppState,
    _root: TempDir,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::build(FakeProcessor::new(0, "", false), false)
    }

    pub fn failing(exit_code: i32, stderr: &str) -> Self {
        Self::build(FakeProcessor::new(exit_code, stderr, false), false)
    }

    pub fn unlaunchable() -> Self {
        Self::build(FakeProcessor::new(0, "", true), false)
    }

    pub fn with_broken_storage() -> Self {
        Self::build(FakeProcessor::new(0, "", false), true)
    }

    fn build(processor: FakeProcessor, broken_storage: bool) -> Self {
        let root = tempfile::tempdir().unwrap();

        let processor = Arc::new(processor);
        let storage = Arc::new(FakeStore {
            broken: broken_storage,
            ..FakeStore::default()
        });
        let speech = Arc::new(FakeSpeech {
            response: Mutex::new(Value::Null),
            failing: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
        });

        let state = AppState::new(
            test_config(root.path().join("download")),
            Downloader::new(http_client()),
            processor.clone(),
            storage.clone(),
            speech.clone(),
            CancellationToken::new(),
        );

        Self {
            processor,
            storage,
            speech,
            state,
            _root: root,
        }
    }

    pub fn router(&self) -> Router {
        crate::app::create_app(self.state.clone())
    }

    /// Same application, but speaking to `speech` instead of the fake.
    pub fn router_with_speech(&self, speech: Arc<dyn SpeechSynthesizer>) -> Router {
        let mut state = self.state.clone();
        state.speech = speech;
        crate::app::create_app(state)
    }

    /// Cancels the shared shutdown token, as a ctrl-c would.
    pub fn shut_down(&self) {
        self.state.shutdown.cancel();
    }

    pub fn speech_config(&self) -> SpeechConfig {
        self.state.config.speech.clone()
    }

    pub fn download_dir(&self) -> &Path {
        &self.state.config.download_dir
    }

    pub fn default_voice_url(&self) -> String {
        self.state.config.speech.default_voice_url.clone()
    }
}

fn test_config(download_dir: PathBuf) -> AppConfig {
    AppConfig {
        server_port: 0,
        download_dir,
        facefusion: FaceFusionConfig {
            working_dir: PathBuf::from("facefusion"),
            program: "python3".to_string(),
            script: "run.py".to_string(),
            execution_provider: "cpu".to_string(),
        },
        storage: StorageConfig {
            endpoint: "http://127.0.0.1:9000".to_string(),
            bucket: "media".to_string(),
            access_key: "test".to_string(),
            secret_key: "test".to_string(),
            region: "us-east-1".to_string(),
            public_url: None,
            folder: "image-upload".to_string(),
        },
        speech: SpeechConfig {
            api_token: Some("r8_test".to_string()),
            base_url: "http://127.0.0.1:9".to_string(),
            model: "suminhthanh/vixtts:5222abc".to_string(),
            default_voice_url: "https://voices.test/default.wav".to_string(),
            poll_interval: Duration::from_millis(5),
        },
        timeouts: StageTimeouts::default(),
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
