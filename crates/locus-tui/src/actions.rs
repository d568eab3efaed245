//! Side effects on the selected path and the visible results: open, copy,
//! open with a typed command, and pipe through a filter command.

use crate::state::PathEntry;
use crate::worker::parse_lines;
use anyhow::{anyhow, bail, Context, Result};
use locus_core::config::ActionsConfig;
use std::io::{Read, Write};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Acts on a selected path outside the session.
pub trait Launcher {
    /// Hand the path to the opener. Must not wait for the opened program.
    fn open(&mut self, path: &str) -> Result<()>;
    /// Put the path on the clipboard.
    fn copy(&mut self, path: &str) -> Result<()>;
    /// Run a whitespace-split command line with the path appended. Not
    /// awaited.
    fn open_with(&mut self, command: &str, path: &str) -> Result<()>;
    /// Feed `input` one path per line to a shell command and return the
    /// lines it prints.
    fn pipe(&mut self, command: &str, input: &[PathEntry]) -> Result<Vec<PathEntry>>;
}

/// Runs the configured opener and clipboard commands.
#[derive(Debug, Clone)]
pub struct CommandLauncher {
    open: Vec<String>,
    copy: Vec<String>,
    filter_timeout: Option<Duration>,
}

impl CommandLauncher {
    pub fn new(config: &ActionsConfig) -> Self {
        Self {
            open: config.open.clone(),
            copy: config.copy.clone(),
            filter_timeout: (config.filter_timeout_ms > 0)
                .then(|| Duration::from_millis(config.filter_timeout_ms)),
        }
    }
}

fn command(argv: &[String], what: &str) -> Result<Command> {
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| anyhow!("no {what} command configured"))?;
    let mut cmd = Command::new(program);
    cmd.args(args);
    Ok(cmd)
}

/// Start `argv` with `path` appended and reap it in the background, so the
/// opened program can outlive a slow GUI app.
fn spawn_detached(argv: &[String], path: &str, what: &str) -> Result<()> {
    let mut child = command(argv, what)?
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("failed to run {}", argv[0]))?;

    debug!(pid = child.id(), path, "{what} command started");
    std::thread::spawn(move || {
        if let Err(e) = child.wait() {
            warn!("opener wait failed: {e}");
        }
    });
    Ok(())
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> std::thread::JoinHandle<Vec<u8>> {
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    })
}

fn wait_with_deadline(
    child: &mut Child,
    timeout: Option<Duration>,
) -> Result<std::process::ExitStatus> {
    let deadline = timeout.map(|t| Instant::now() + t);
    loop {
        if let Some(status) = child.try_wait().context("filter command failed")? {
            return Ok(status);
        }
        if let (Some(deadline), Some(limit)) = (deadline, timeout) {
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                bail!("filter command timed out after {limit:?}");
            }
        }
        std::thread::sleep(Duration::from_millis(10));
    }
}

impl Launcher for CommandLauncher {
    fn open(&mut self, path: &str) -> Result<()> {
        spawn_detached(&self.open, path, "open")
    }

    fn open_with(&mut self, command: &str, path: &str) -> Result<()> {
        let argv: Vec<String> = command.split_whitespace().map(str::to_string).collect();
        spawn_detached(&argv, path, "open-with")
    }

    fn pipe(&mut self, command: &str, input: &[PathEntry]) -> Result<Vec<PathEntry>> {
        let mut child = Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .context("failed to run sh")?;

        let payload = input.join("\n");
        let stdin = child.stdin.take();
        // Written from a thread so a large result set can't deadlock against
        // a command that prints before it has read everything.
        let writer = std::thread::spawn(move || {
            if let Some(mut stdin) = stdin {
                let _ = stdin.write_all(payload.as_bytes());
            }
        });
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = wait_with_deadline(&mut child, self.filter_timeout)?;
        let _ = writer.join();
        let stdout = stdout
            .join()
            .map_err(|_| anyhow!("filter output reader panicked"))?;
        let stderr = stderr
            .join()
            .map_err(|_| anyhow!("filter error reader panicked"))?;

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr).trim().to_string();
            if stderr.is_empty() {
                bail!("'{command}' exited with {status}");
            }
            bail!("{stderr}");
        }

        debug!(command, kept = stdout.len(), "filter command finished");
        Ok(parse_lines(&stdout))
    }

    fn copy(&mut self, path: &str) -> Result<()> {
        let mut child = command(&self.copy, "copy")?
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("failed to run {}", self.copy[0]))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(path.as_bytes())
                .context("failed to write to clipboard command")?;
        }

        let status = child.wait().context("clipboard command failed")?;
        if !status.success() {
            bail!("{} exited with {status}", self.copy[0]);
        }
        Ok(())
    }
}
