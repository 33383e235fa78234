use crate::config::env::{self, EnvKey};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SPEECH_MODEL: &str =
    "suminhthanh/vixtts:5222190b47dfb128cd588f07dadb78107aa489bdcd0af45814d7841d47f608c6";

pub const DEFAULT_VOICE_URL: &str =
    "https://replicate.delivery/pbxt/KibHoI1aA7kYweYgeSV2fFOY67QwEuZNe5l1tFX7Z6FkaEoi/samples_nu-luu-loat.wav";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server_port: u16,
    pub download_dir: PathBuf,
    pub facefusion: FaceFusionConfig,
    pub storage: StorageConfig,
    pub speech: SpeechConfig,
    pub timeouts: StageTimeouts,
}

#[derive(Clone, Debug)]
pub struct FaceFusionConfig {
    pub working_dir: PathBuf,
    pub program: String,
    pub script: String,
    pub execution_provider: String,
}

#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
    /// Base of the URLs handed back to clients. Defaults to `<endpoint>/<bucket>`.
    pub public_url: Option<String>,
    pub folder: String,
}

#[derive(Clone, Debug)]
pub struct SpeechConfig {
    pub api_token: Option<String>,
    pub base_url: String,
    pub model: String,
    pub default_voice_url: String,
    /// Delay between status checks while a prediction is running.
    pub poll_interval: Duration,
}

#[derive(Clone, Copy, Debug)]
pub struct StageTimeouts {
    pub download: Duration,
    pub process: Duration,
    pub upload: Duration,
    pub speech: Duration,
}

impl Default for StageTimeouts {
    fn default() -> Self {
        Self {
            download: Duration::from_secs(300),
            process: Duration::from_secs(1800),
            upload: Duration::from_secs(300),
            speech: Duration::from_secs(300),
        }
    }
}

impl AppConfig {
    pub fn new() -> Result<Self, std::env::VarError> {
        let defaults = StageTimeouts::default();

        Ok(Self {
            server_port: env::get_parsed(EnvKey::ServerPort, 3000),
            download_dir: PathBuf::from(env::get_or(EnvKey::DownloadDir, "download")),
            facefusion: FaceFusionConfig {
                working_dir: PathBuf::from(env::get_or(EnvKey::FaceFusionDir, "facefusion")),
                program: env::get_or(EnvKey::FaceFusionProgram, "python3"),
                script: env::get_or(EnvKey::FaceFusionScript, "run.py"),
                execution_provider: env::get_or(EnvKey::ExecutionProvider, "coreml"),
            },
            storage: StorageConfig {
                endpoint: env::get(EnvKey::StorageEndpoint)?,
                bucket: env::get(EnvKey::StorageBucket)?,
                access_key: env::get(EnvKey::StorageAccessKey)?,
                secret_key: env::get(EnvKey::StorageSecretKey)?,
                region: env::get_or(EnvKey::StorageRegion, "us-east-1"),
                public_url: env::get_optional(EnvKey::StoragePublicUrl),
                folder: env::get_or(EnvKey::StorageFolder, "image-upload"),
            },
            speech: SpeechConfig {
                api_token: env::get_optional(EnvKey::ReplicateApiToken),
                base_url: env::get_or(EnvKey::ReplicateBaseUrl, "https://api.replicate.com"),
                model: env::get_or(EnvKey::SpeechModel, DEFAULT_SPEECH_MODEL),
                default_voice_url: env::get_or(EnvKey::DefaultVoiceUrl, DEFAULT_VOICE_URL),
                poll_interval: Duration::from_millis(env::get_parsed(EnvKey::SpeechPollIntervalMs, 1000)),
            },
            timeouts: StageTimeouts {
                download: secs(EnvKey::DownloadTimeoutSecs, defaults.download),
                process: secs(EnvKey::ProcessTimeoutSecs, defaults.process),
                upload: secs(EnvKey::UploadTimeoutSecs, defaults.upload),
                speech: secs(EnvKey::SpeechTimeoutSecs, defaults.speech),
            },
        })
    }
}

fn secs(key: EnvKey, default: Duration) -> Duration {
    Duration::from_secs(env::get_parsed(key, default.as_secs()))
}
