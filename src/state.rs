use crate::common::download::Downloader;
use crate::config::settings::AppConfig;
use crate::infrastructure::processor::facefusion::FrameProcessor;
use crate::infrastructure::speech::replicate::SpeechSynthesizer;
use crate::infrastructure::storage::s3::MediaStore;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub downloader: Downloader,
    pub processor: Arc<dyn FrameProcessor>,
    pub storage: Arc<dyn MediaStore>,
    pub speech: Arc<dyn SpeechSynthesizer>,
    /// Cancelled on shutdown; every job derives its own child token from it.
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        downloader: Downloader,
        processor: Arc<dyn FrameProcessor>,
        storage: Arc<dyn MediaStore>,
        speech: Arc<dyn SpeechSynthesizer>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            config,
            downloader,
            processor,
            storage,
            speech,
            shutdown,
        }
    }
}
