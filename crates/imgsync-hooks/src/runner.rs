use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use console::style;
use imgsync_manifest::Hook;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::warn;

use crate::capture::{LineSplitter, MAX_OUTPUT_BYTES, OutputCapture};
use crate::{HookError, Result};

/// Prefix echoed before every line of hook output.
pub const OUTPUT_PREFIX: &str = "  │ ";

/// Environment variable pointing a hook at its private scratch directory.
pub const HOOK_CACHE_ENV: &str = "IMGSYNC_HOOK_CACHE";

/// Read size for hook output, also the longest line echoed in one piece.
const READ_CHUNK: usize = 64 * 1024;

#[derive(Debug)]
pub enum Completion {
    Exited(ExitStatus),
    TimedOut(Duration),
}

/// Outcome of one subprocess run, successful or not.
#[derive(Debug)]
pub struct HookRun {
    pub started_at: DateTime<Utc>,
    pub duration:   Duration,
    pub completion: Completion,
    /// Combined stdout and stderr, bounded to [`MAX_OUTPUT_BYTES`].
    pub output:     String,
}

impl HookRun {
    pub fn passed(&self) -> bool {
        matches!(&self.completion, Completion::Exited(status) if status.success())
    }

    /// Turn a non-passing run into the matching [`HookError`].
    pub fn into_result(self, name: &str) -> Result<Self> {
        let status = match &self.completion {
            Completion::Exited(status) if status.success() => return Ok(self),
            Completion::Exited(status) => status.to_string(),
            Completion::TimedOut(timeout) => {
                return Err(HookError::Timeout {
                    name:    name.to_string(),
                    timeout: *timeout,
                    output:  crate::truncate_output(&self.output, crate::ERROR_OUTPUT_BYTES),
                });
            }
        };
        Err(HookError::Failed {
            name: name.to_string(),
            status,
            output: crate::truncate_output(&self.output, crate::ERROR_OUTPUT_BYTES),
        })
    }
}

/// Spawns one hook process against an artifact file.
pub struct HookRunner<'a> {
    hook:    &'a Hook,
    scratch: Option<PathBuf>,
    echo:    bool,
}

impl<'a> HookRunner<'a> {
    pub fn new(hook: &'a Hook) -> Self {
        Self {
            hook,
            scratch: None,
            echo: true,
        }
    }

    /// Expose `dir` to the hook through [`HOOK_CACHE_ENV`].
    pub fn scratch_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.scratch = dir;
        self
    }

    /// Whether output lines are echoed to stdout.
    pub fn echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Run the hook with `artifact` as its first argument.
    ///
    /// Non-zero exits and timeouts are reported in the returned [`HookRun`];
    /// only failing to start or reap the process is an error here.
    pub async fn run(&self, artifact: &Path) -> Result<HookRun> {
        let name = &self.hook.name;
        let timeout = self.hook.timeout().map_err(|source| HookError::InvalidTimeout {
            name: name.clone(),
            source,
        })?;

        let mut command = Command::new(&self.hook.command);
        command
            .arg(artifact)
            .args(&self.hook.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.hook.work_dir {
            command.current_dir(dir);
        }
        if let Some(dir) = &self.scratch {
            command.env(HOOK_CACHE_ENV, dir);
        }

        let started_at = Utc::now();
        let start = Instant::now();
        let mut child = command.spawn().map_err(|source| HookError::Spawn {
            name: name.clone(),
            source,
        })?;

        let capture = Arc::new(Mutex::new(OutputCapture::new(MAX_OUTPUT_BYTES)));
        let mut stdout_task = tokio::spawn(drain(child.stdout.take(), capture.clone(), self.echo));
        let mut stderr_task = tokio::spawn(drain(child.stderr.take(), capture.clone(), self.echo));

        let waited = tokio::time::timeout(timeout, async {
            let _ = tokio::join!(&mut stdout_task, &mut stderr_task);
            child.wait().await
        })
        .await;

        let completion = match waited {
            Ok(Ok(status)) => Completion::Exited(status),
            Ok(Err(source)) => {
                return Err(HookError::Wait {
                    name: name.clone(),
                    source,
                });
            }
            Err(_) => {
                if let Err(e) = child.kill().await {
                    warn!(hook = %name, error = %e, "failed to kill timed out hook");
                }
                stdout_task.abort();
                stderr_task.abort();
                Completion::TimedOut(timeout)
            }
        };

        let output = capture
            .lock()
            .map(|c| c.finish())
            .unwrap_or_else(|poisoned| poisoned.into_inner().finish());

        Ok(HookRun {
            started_at,
            duration: start.elapsed(),
            completion,
            output,
        })
    }
}

async fn drain<R>(reader: Option<R>, capture: Arc<Mutex<OutputCapture>>, echo: bool)
where
    R: AsyncRead + Unpin,
{
    let Some(mut reader) = reader else { return };
    let mut splitter = LineSplitter::new(READ_CHUNK);
    let mut chunk = vec![0u8; READ_CHUNK];
    let mut full = false;
    let mut emit = |line: &[u8]| {
        if !echo && full {
            return;
        }
        let text = String::from_utf8_lossy(line);
        if echo {
            println!("{}{}", style(OUTPUT_PREFIX).dim(), text);
        }
        if !full {
            if let Ok(mut c) = capture.lock() {
                c.push_line(&text);
                full = c.is_full();
            }
        }
    };
    loop {
        match reader.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => splitter.feed(&chunk[..n], &mut emit),
        }
    }
    splitter.finish(&mut emit);
}
