use async_trait::async_trait;
use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::config::settings::FaceFusionConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameProcessorKind {
    LipSyncer,
    FaceSwapper,
}

impl FrameProcessorKind {
    pub fn as_arg(&self) -> &'static str {
        match self {
            FrameProcessorKind::LipSyncer => "lip_syncer",
            FrameProcessorKind::FaceSwapper => "face_swapper",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProcessRequest {
    pub target: PathBuf,
    pub source: PathBuf,
    pub output: PathBuf,
    pub processor: FrameProcessorKind,
}

#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// Runs a frame processor over local media.
///
/// A tool that starts and then reports a failure is not an error here: the
/// outcome carries the exit code and the caller decides what to do with it.
#[async_trait]
pub trait FrameProcessor: Send + Sync {
    async fn run(&self, request: &ProcessRequest) -> Result<ProcessOutcome, ProcessError>;
}

/// FaceFusion driven through its command-line entry point.
pub struct FaceFusionCli {
    program: String,
    script_args: Vec<String>,
    working_dir: PathBuf,
    execution_provider: String,
}

impl FaceFusionCli {
    pub fn new(
        program: impl Into<String>,
        script_args: Vec<String>,
        working_dir: impl Into<PathBuf>,
        execution_provider: impl Into<String>,
    ) -> Self {
        Self {
            program: program.into(),
            script_args,
            working_dir: working_dir.into(),
            execution_provider: execution_provider.into(),
        }
    }

    pub fn from_config(config: &FaceFusionConfig) -> Self {
        let working_dir = config
            .working_dir
            .canonicalize()
            .unwrap_or_else(|_| config.working_dir.clone());

        Self::new(
            config.program.clone(),
            vec![config.script.clone()],
            working_dir,
            config.execution_provider.clone(),
        )
    }

    pub fn command_args(&self, request: &ProcessRequest) -> Vec<OsString> {
        let mut args: Vec<OsString> = self.script_args.iter().map(OsString::from).collect();
        let flags: [OsString; 12] = [
            "-t".into(),
            request.target.clone().into_os_string(),
            "-s".into(),
            request.source.clone().into_os_string(),
            "-o".into(),
            request.output.clone().into_os_string(),
            "--frame-processors".into(),
            request.processor.as_arg().into(),
            "--headless".into(),
            "--execution-providers".into(),
            self.execution_provider.clone().into(),
            "--skip-download".into(),
        ];
        args.extend(flags);
        args
    }
}

#[async_trait]
impl FrameProcessor for FaceFusionCli {
    async fn run(&self, request: &ProcessRequest) -> Result<ProcessOutcome, ProcessError> {
        info!(
            "🎥 Running {} ({}) in {}",
            self.program,
            request.processor.as_arg(),
            self.working_dir.display()
        );

        let output = Command::new(&self.program)
            .args(self.command_args(request))
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ProcessError::Launch {
                program: self.program.clone(),
                source,
            })?;

        let outcome = ProcessOutcome {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        debug!("{} stdout: {}", self.program, outcome.stdout.trim_end());
        if !outcome.success() {
            warn!("{} exited with {:?}", self.program, outcome.exit_code);
        }

        Ok(outcome)
    }
}
