//! External downloader and transcoder invocation.
//!
//! Both tools run as plain argument vectors; nothing goes through a shell.

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::Stdio,
};

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;

use crate::clip::{format_hhmmss, ClipSpan};

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },
}

/// The process-invocation boundary of the clip pipeline.
#[async_trait]
pub trait MediaTools: Send + Sync {
    /// Fetch the video behind `url` into `output`.
    async fn download(&self, url: &str, output: &Path) -> Result<(), ToolError>;

    /// Cut `span` out of `input` into `output` without re-encoding.
    async fn trim(&self, input: &Path, output: &Path, span: ClipSpan) -> Result<(), ToolError>;
}

/// yt-dlp + ffmpeg on the host.
#[derive(Debug, Clone)]
pub struct ProcessTools {
    yt_dlp: PathBuf,
    ffmpeg: PathBuf,
}

impl ProcessTools {
    pub fn new(yt_dlp: impl Into<PathBuf>, ffmpeg: impl Into<PathBuf>) -> Self {
        Self {
            yt_dlp: yt_dlp.into(),
            ffmpeg: ffmpeg.into(),
        }
    }
}

#[async_trait]
impl MediaTools for ProcessTools {
    async fn download(&self, url: &str, output: &Path) -> Result<(), ToolError> {
        run(&self.yt_dlp, download_args(url, output)).await
    }

    async fn trim(&self, input: &Path, output: &Path, span: ClipSpan) -> Result<(), ToolError> {
        run(&self.ffmpeg, trim_args(input, output, span)).await
    }
}

pub fn download_args(url: &str, output: &Path) -> Vec<OsString> {
    vec!["-o".into(), output.into(), url.into()]
}

pub fn trim_args(input: &Path, output: &Path, span: ClipSpan) -> Vec<OsString> {
    vec![
        "-ss".into(),
        format_hhmmss(span.start).into(),
        "-i".into(),
        input.into(),
        "-to".into(),
        format_hhmmss(span.end).into(),
        "-c".into(),
        "copy".into(),
        output.into(),
    ]
}

/// Runs `program` to completion. No timeout: a hung tool hangs the caller.
async fn run(program: &Path, args: Vec<OsString>) -> Result<(), ToolError> {
    let name = program.display().to_string();
    tracing::info!(program = %name, args = ?args, "running external tool");

    let output = Command::new(program)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|source| ToolError::Spawn {
            program: name.clone(),
            source,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let stderr = if stderr.is_empty() {
            String::from_utf8_lossy(&output.stdout).trim().to_string()
        } else {
            stderr
        };
        return Err(ToolError::Failed {
            program: name,
            status: output.status.to_string(),
            stderr,
        });
    }

    Ok(())
}

/// True when `program` starts and exits cleanly with `version_flag`.
pub fn detect(program: &Path, version_flag: &str) -> bool {
    let output = std::process::Command::new(program)
        .arg(version_flag)
        .stdin(Stdio::null())
        .output();

    match output {
        Ok(out) => out.status.success(),
        Err(_) => false,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ToolAvailability {
    pub yt_dlp: bool,
    pub ffmpeg: bool,
}

impl ToolAvailability {
    pub fn probe(yt_dlp: &Path, ffmpeg: &Path) -> Self {
        Self {
            yt_dlp: detect(yt_dlp, "--version"),
            ffmpeg: detect(ffmpeg, "-version"),
        }
    }
}
