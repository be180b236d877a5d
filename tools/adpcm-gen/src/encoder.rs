//! External ADPCM encoder adapter
//!
//! The compression itself is done by a separate executable (`adpcm-xq` by
//! default) that reads a WAV file on stdin and writes the encoded file to
//! stdout. The adapter feeds stdin from an anonymous temp file, so the child
//! may write as much as it likes before it has consumed its input.

use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use crate::config::EncoderConfig;
use crate::error::Error;

/// Turns raw sample file bytes into an encoded payload
pub trait Encoder {
    fn encode(&self, input: &[u8]) -> Result<Vec<u8>, EncodeError>;
}

/// Failure of a single encoder invocation
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("failed to start encoder '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to stage encoder input: {0}")]
    Stage(#[source] std::io::Error),

    #[error("encoder '{program}' exited with {status}{}", stderr_suffix(.stderr))]
    Failed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("encoder '{program}' produced no output{}", stderr_suffix(.stderr))]
    EmptyOutput { program: String, stderr: String },
}

fn stderr_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {}", stderr)
    }
}

/// Encoder backed by an external executable
#[derive(Debug, Clone)]
pub struct ExternalEncoder {
    program: PathBuf,
    args: Vec<String>,
}

impl ExternalEncoder {
    /// Use `program` exactly as given
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Locate the configured encoder executable
    ///
    /// A program containing a path separator is taken as a path. A bare name
    /// is searched on PATH, then in the working directory, then next to the
    /// running executable.
    pub fn resolve(config: &EncoderConfig) -> Result<Self, Error> {
        let program = find_encoder(&config.program)
            .ok_or_else(|| Error::EncoderNotFound(config.program.clone()))?;
        tracing::debug!("Using encoder {}", program.display());
        Ok(Self::new(program, config.args.clone()))
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    fn program_label(&self) -> String {
        self.program.display().to_string()
    }
}

impl Encoder for ExternalEncoder {
    fn encode(&self, input: &[u8]) -> Result<Vec<u8>, EncodeError> {
        let mut staged = tempfile::tempfile().map_err(EncodeError::Stage)?;
        staged.write_all(input).map_err(EncodeError::Stage)?;
        staged
            .seek(SeekFrom::Start(0))
            .map_err(EncodeError::Stage)?;

        let output = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::from(staged))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| EncodeError::Spawn {
                program: self.program_label(),
                source,
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if !output.status.success() {
            return Err(EncodeError::Failed {
                program: self.program_label(),
                status: output.status,
                stderr,
            });
        }

        if output.stdout.is_empty() {
            return Err(EncodeError::EmptyOutput {
                program: self.program_label(),
                stderr,
            });
        }

        if !stderr.is_empty() {
            tracing::debug!("Encoder stderr: {}", stderr);
        }

        Ok(output.stdout)
    }
}

fn find_encoder(program: &str) -> Option<PathBuf> {
    let path = Path::new(program);

    // 1. Explicit path
    if path.components().count() > 1 || path.is_absolute() {
        return path.is_file().then(|| path.to_path_buf());
    }

    // 2. PATH
    if let Ok(found) = which::which(program) {
        return Some(found);
    }

    // 3. Working directory
    if let Ok(cwd) = std::env::current_dir() {
        let local = cwd.join(program);
        if local.is_file() {
            return Some(local);
        }
    }

    // 4. Sibling of this binary
    let exe = std::env::current_exe().ok()?;
    let sibling = exe.parent()?.join(program);
    sibling.is_file().then_some(sibling)
}
