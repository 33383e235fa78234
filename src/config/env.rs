use std::env;
use std::str::FromStr;

pub enum EnvKey {
    ServerPort,
    DownloadDir,
    FaceFusionDir,
    FaceFusionProgram,
    FaceFusionScript,
    ExecutionProvider,
    StorageEndpoint,
    StorageBucket,
    StorageAccessKey,
    StorageSecretKey,
    StorageRegion,
    StoragePublicUrl,
    StorageFolder,
    ReplicateApiToken,
    ReplicateBaseUrl,
    SpeechModel,
    DefaultVoiceUrl,
    SpeechPollIntervalMs,
    DownloadTimeoutSecs,
    ProcessTimeoutSecs,
    UploadTimeoutSecs,
    SpeechTimeoutSecs,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::ServerPort => "APP_PORT",
            EnvKey::DownloadDir => "DOWNLOAD_DIR",
            EnvKey::FaceFusionDir => "FACEFUSION_DIR",
            EnvKey::FaceFusionProgram => "FACEFUSION_PROGRAM",
            EnvKey::FaceFusionScript => "FACEFUSION_SCRIPT",
            EnvKey::ExecutionProvider => "FACEFUSION_EXECUTION_PROVIDER",
            EnvKey::StorageEndpoint => "STORAGE_ENDPOINT",
            EnvKey::StorageBucket => "STORAGE_BUCKET",
            EnvKey::StorageAccessKey => "AWS_ACCESS_KEY_ID",
            EnvKey::StorageSecretKey => "AWS_SECRET_ACCESS_KEY",
            EnvKey::StorageRegion => "STORAGE_REGION",
            EnvKey::StoragePublicUrl => "STORAGE_PUBLIC_URL",
            EnvKey::StorageFolder => "STORAGE_FOLDER",
            EnvKey::ReplicateApiToken => "REPLICATE_API_TOKEN",
            EnvKey::ReplicateBaseUrl => "REPLICATE_BASE_URL",
            EnvKey::SpeechModel => "SPEECH_MODEL",
            EnvKey::DefaultVoiceUrl => "DEFAULT_VOICE_URL",
            EnvKey::SpeechPollIntervalMs => "SPEECH_POLL_INTERVAL_MS",
            EnvKey::DownloadTimeoutSecs => "DOWNLOAD_TIMEOUT_SECS",
            EnvKey::ProcessTimeoutSecs => "PROCESS_TIMEOUT_SECS",
            EnvKey::UploadTimeoutSecs => "UPLOAD_TIMEOUT_SECS",
            EnvKey::SpeechTimeoutSecs => "SPEECH_TIMEOUT_SECS",
        }
    }
}

pub fn get(key: EnvKey) -> Result<String, env::VarError> {
    env::var(key.as_str())
}

pub fn get_or(key: EnvKey, default: &str) -> String {
    env::var(key.as_str()).unwrap_or_else(|_| default.to_string())
}

/// Like [`get`], but treats an empty value the same as an unset one.
pub fn get_optional(key: EnvKey) -> Option<String> {
    env::var(key.as_str()).ok().filter(|v| !v.trim().is_empty())
}

pub fn get_parsed<T: FromStr>(key: EnvKey, default: T) -> T {
    match get(key) {
        Ok(val) => val.parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}
