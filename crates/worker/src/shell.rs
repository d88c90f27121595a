// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shell command: drives an external process and streams its output.

use crate::command::{Command, CommandCore, CommandError};
use crate::registry::find_executable;
use crate::reporter::{BufferedReporter, ReporterConfig};
use async_trait::async_trait;
use pw_adapters::UpdateSink;
use pw_core::{resolve_fake, resolve_real, Arg, StreamId, Update};
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Runs an external process, feeding stdout/stderr through the buffered
/// reporter and settling with the process's exit status.
///
/// Arguments are spawned with their real values; everything echoed or
/// logged uses the obfuscated projection.
pub struct ShellCommand {
    core: Arc<CommandCore>,
    reporter: BufferedReporter,
    argv: Vec<Arg>,
    workdir: PathBuf,
    env: HashMap<String, String>,
}

impl ShellCommand {
    pub fn new(sink: Arc<dyn UpdateSink>, argv: Vec<Arg>, workdir: impl Into<PathBuf>) -> Self {
        let core = Arc::new(CommandCore::new(Arc::clone(&sink)));
        let reporter = BufferedReporter::new(sink, ReporterConfig::default());
        Self {
            core,
            reporter,
            argv,
            workdir: workdir.into(),
            env: HashMap::new(),
        }
    }

    /// Extra environment variables for the child process.
    pub fn env(mut self, env: HashMap<String, String>) -> Self {
        self.env = env;
        self
    }

    /// Override the buffering policy (tests use small limits).
    pub fn reporter_config(mut self, config: ReporterConfig) -> Self {
        self.reporter = BufferedReporter::new(self.core.sink(), config);
        self
    }
}

#[async_trait]
impl Command for ShellCommand {
    async fn run(&self) -> Result<(), CommandError> {
        let echoed = resolve_fake(&self.argv).join(" ");
        self.core.send(Update::Header(format!("executing {echoed}")));

        let real = resolve_real(&self.argv);
        let Some((program, rest)) = real.split_first() else {
            self.core.finish(1, Some("no command specified".to_string()));
            return Ok(());
        };
        let executable = find_executable(program)?;

        tracing::info!(command = %echoed, workdir = %self.workdir.display(), "starting process");

        let mut child = tokio::process::Command::new(&executable);
        child
            .args(rest)
            .current_dir(&self.workdir)
            .envs(&self.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = match child.spawn() {
            Ok(child) => child,
            Err(e) => {
                self.core.finish(
                    1,
                    Some(format!("failed to spawn '{}': {}", executable.display(), e)),
                );
                return Ok(());
            }
        };

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let out_task = stdout.map(|pipe| {
            tokio::spawn(drain(pipe, StreamId::Stdout, self.reporter.clone()))
        });
        let err_task = stderr.map(|pipe| {
            tokio::spawn(drain(pipe, StreamId::Stderr, self.reporter.clone()))
        });

        let mut kill_requested = false;
        let status = loop {
            tokio::select! {
                status = child.wait() => break status,
                _ = self.core.cancelled(), if !kill_requested => {
                    kill_requested = true;
                    if let Err(e) = child.start_kill() {
                        tracing::warn!(error = %e, "failed to kill process");
                    }
                }
            }
        };

        if let Some(task) = out_task {
            let _ = task.await;
        }
        if let Some(task) = err_task {
            let _ = task.await;
        }
        self.reporter.flush();

        match status {
            Ok(status) => {
                let rc = exit_code(status);
                tracing::info!(rc, interrupted = self.core.is_interrupted(), "process exited");
                self.core.finish(rc, None);
            }
            Err(e) => {
                self.core.finish(1, Some(format!("wait for process failed: {e}")));
            }
        }
        Ok(())
    }

    fn interrupt(&self) {
        self.core.interrupt();
    }
}

/// Feed one process stream into the reporter until EOF.
///
/// Reads are raw byte chunks, so a multi-byte character can straddle a
/// read boundary. Trailing bytes that are still a valid character prefix
/// are held back and prepended to the next read instead of being decoded
/// into replacement characters.
async fn drain(mut pipe: impl AsyncRead + Unpin, stream: StreamId, reporter: BufferedReporter) {
    let mut buf = [0u8; 4096];
    let mut pending: Vec<u8> = Vec::new();
    loop {
        match pipe.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                pending.extend_from_slice(&buf[..n]);
                let ready = pending.len() - incomplete_utf8_suffix(&pending);
                if ready > 0 {
                    reporter.add(stream, &String::from_utf8_lossy(&pending[..ready]));
                    pending.drain(..ready);
                }
            }
        }
    }
    // EOF with a dangling partial character: emit it as replacement data
    // rather than dropping bytes.
    if !pending.is_empty() {
        reporter.add(stream, &String::from_utf8_lossy(&pending));
    }
}

/// Length of the trailing byte sequence that could still become a complete
/// UTF-8 character once more bytes arrive.
fn incomplete_utf8_suffix(bytes: &[u8]) -> usize {
    for back in 1..=bytes.len().min(3) {
        let byte = bytes[bytes.len() - back];
        if byte & 0xc0 == 0x80 {
            // Continuation byte; keep looking for the leading byte.
            continue;
        }
        let need = match byte {
            0xc0..=0xdf => 2,
            0xe0..=0xef => 3,
            0xf0..=0xf7 => 4,
            _ => return 0,
        };
        return if need > back { back } else { 0 };
    }
    0
}

#[cfg(unix)]
fn exit_code(status: std::process::ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    match status.code() {
        Some(code) => code,
        // Killed by a signal; report the conventional 128+N.
        None => status.signal().map(|sig| 128 + sig).unwrap_or(-1),
    }
}

#[cfg(not(unix))]
fn exit_code(status: std::process::ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}

#[cfg(test)]
#[path = "shell_tests.rs"]
mod tests;
