use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use time::macros::format_description;
use time::OffsetDateTime;
use uuid::Uuid;

/// Per-request identifier: a second-resolution timestamp for readability plus
/// a random suffix so two requests in the same second never share names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobId(String);

impl JobId {
    pub fn generate() -> Self {
        let format = format_description!("[year][month][day]_[hour][minute][second]");
        let stamp = OffsetDateTime::now_utc()
            .format(&format)
            .unwrap_or_else(|_| OffsetDateTime::now_utc().unix_timestamp().to_string());
        let suffix = Uuid::new_v4().as_simple().to_string();

        Self(format!("{}_{}", stamp, &suffix[..8]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Scratch directory owned by a single request.
///
/// Inputs and the tool's output are written here. The directory and
/// everything in it is removed when the workspace is dropped, which happens
/// on every exit path of the handler, including a dropped future when the
/// client disconnects.
pub struct JobWorkspace {
    id: JobId,
    /// Canonical form of `_guard`'s path.
    path: PathBuf,
    _guard: TempDir,
}

impl JobWorkspace {
    pub async fn create(root: &Path) -> io::Result<Self> {
        tokio::fs::create_dir_all(root).await?;

        let id = JobId::generate();
        let prefix = format!("job_{}_", id);
        let root = root.to_path_buf();
        let (guard, path) = tokio::task::spawn_blocking(move || -> io::Result<(TempDir, PathBuf)> {
            let guard = tempfile::Builder::new().prefix(&prefix).tempdir_in(&root)?;
            let path = guard.path().canonicalize()?;
            Ok((guard, path))
        })
        .await
        .map_err(io::Error::other)??;

        Ok(Self {
            id,
            path,
            _guard: guard,
        })
    }

    pub fn id(&self) -> &JobId {
        &self.id
    }

    pub fn dir(&self) -> &Path {
        &self.path
    }

    /// Absolute path of `file_name` inside the workspace. The external tool
    /// runs in its own working directory, so relative paths are not usable.
    pub fn file(&self, file_name: &str) -> PathBuf {
        self.path.join(file_name)
    }
}
