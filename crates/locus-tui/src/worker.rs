//! Background query worker.
//!
//! The index query tool is a blocking subprocess, so it runs on its own
//! thread. Every submission gets a generation number; the worker reports
//! outcomes tagged with that generation and the session keeps only the one
//! matching the latest submission.

use crate::state::{PathEntry, ResultSet};
use locus_core::config::QueryConfig;
use std::process::Stdio;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};

/// Why a query produced no result set.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("'{0}' not found; is it installed?")]
    NotFound(String),

    #[error("failed to start query tool: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("query tool exited with {}: {stderr}", exit_label(.code))]
    Exit { code: Option<i32>, stderr: String },

    #[error("query tool timed out after {0:?}")]
    Timeout(Duration),

    #[error("failed to read query tool output: {0}")]
    Output(#[source] std::io::Error),

    #[error("query worker stopped")]
    WorkerGone,
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}

/// Something that turns a pattern into an ordered list of paths.
pub trait QueryTool: Send + 'static {
    fn run(&self, pattern: &str) -> Result<Vec<PathEntry>, QueryError>;
}

/// Runs an external locate-style program:
/// `<program> <args..> [<limit_flag> <limit>] <pattern>`.
pub struct CommandTool {
    program: String,
    args: Vec<String>,
    limit_flag: String,
    limit: usize,
    timeout: Option<Duration>,
    empty_exit_codes: Vec<i32>,
    runtime: tokio::runtime::Runtime,
}

impl CommandTool {
    pub fn new(config: &QueryConfig) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        Ok(Self {
            program: config.program.clone(),
            args: config.args.clone(),
            limit_flag: config.limit_flag.clone(),
            limit: config.limit,
            timeout: (config.timeout_ms > 0).then(|| Duration::from_millis(config.timeout_ms)),
            empty_exit_codes: config.empty_exit_codes.clone(),
            runtime,
        })
    }

    fn command(&self, pattern: &str) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(&self.args);
        if self.limit > 0 && !self.limit_flag.is_empty() {
            cmd.arg(&self.limit_flag).arg(self.limit.to_string());
        }
        if pattern.starts_with('-') {
            cmd.arg("--");
        }
        cmd.arg(pattern)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    fn collect(&self, output: std::process::Output) -> Result<Vec<PathEntry>, QueryError> {
        if output.status.success() {
            return Ok(parse_lines(&output.stdout));
        }

        let code = output.status.code();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        // locate reports "nothing found" through its exit status.
        let no_match = stderr.is_empty()
            && code.is_some_and(|c| self.empty_exit_codes.contains(&c));
        if no_match {
            return Ok(parse_lines(&output.stdout));
        }

        Err(QueryError::Exit { code, stderr })
    }
}

impl QueryTool for CommandTool {
    fn run(&self, pattern: &str) -> Result<Vec<PathEntry>, QueryError> {
        let mut command = self.command(pattern);

        self.runtime.block_on(async {
            let child = command.spawn().map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => QueryError::NotFound(self.program.clone()),
                _ => QueryError::Spawn(e),
            })?;

            // Dropping the child on timeout kills it.
            let output = match self.timeout {
                Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                    .await
                    .map_err(|_| QueryError::Timeout(limit))?,
                None => child.wait_with_output().await,
            }
            .map_err(QueryError::Output)?;

            self.collect(output)
        })
    }
}

/// Split tool output into entries, one per non-empty line.
pub fn parse_lines(stdout: &[u8]) -> Vec<PathEntry> {
    String::from_utf8_lossy(stdout)
        .lines()
        .filter(|line| !line.is_empty())
        .map(PathEntry::from)
        .collect()
}

/// Identity of one submitted query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingQuery {
    pub pattern: String,
    pub generation: u64,
}

enum WorkerCommand {
    Run(PendingQuery),
    Quit,
}

/// Result of one query, tagged with the generation it was submitted under.
#[derive(Debug)]
pub struct QueryOutcome {
    pub generation: u64,
    pub pattern: String,
    pub result: Result<ResultSet, QueryError>,
}

/// Session-side handle to the query worker.
pub struct QueryRunner {
    generation: u64,
    resolved: u64,
    cmd_tx: Sender<WorkerCommand>,
    evt_tx: Sender<QueryOutcome>,
    evt_rx: Receiver<QueryOutcome>,
}

impl QueryRunner {
    /// Start the worker thread. Patterns that arrive within `debounce` of
    /// each other are collapsed into the last one.
    pub fn spawn<T: QueryTool>(tool: T, debounce: Duration) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (evt_tx, evt_rx) = mpsc::channel();

        let worker_tx = evt_tx.clone();
        std::thread::spawn(move || worker_loop(tool, debounce, cmd_rx, worker_tx));

        Self {
            generation: 0,
            resolved: 0,
            cmd_tx,
            evt_tx,
            evt_rx,
        }
    }

    /// Submit a pattern, superseding anything submitted before. Returns the
    /// new generation.
    ///
    /// A blank pattern resolves to an empty result set without touching the
    /// query tool.
    pub fn submit(&mut self, pattern: &str) -> u64 {
        self.generation += 1;
        let generation = self.generation;

        if pattern.trim().is_empty() {
            debug!(generation, "blank pattern, skipping query tool");
            self.resolve_locally(generation, pattern, Ok(Arc::default()));
            return generation;
        }

        let pending = PendingQuery {
            pattern: pattern.to_string(),
            generation,
        };
        debug!(generation, pattern, "submitting query");
        if self.cmd_tx.send(WorkerCommand::Run(pending)).is_err() {
            warn!("query worker is gone");
            self.resolve_locally(generation, pattern, Err(QueryError::WorkerGone));
        }

        generation
    }

    /// Forget any outstanding query; its result will be dropped on arrival.
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.resolved = self.generation;
    }

    /// `true` while the latest submission has not produced an outcome.
    pub fn is_pending(&self) -> bool {
        self.resolved < self.generation
    }

    pub fn current_generation(&self) -> u64 {
        self.generation
    }

    /// Non-blocking: return the outcome of the latest submission if it has
    /// arrived. Stale outcomes are discarded.
    pub fn poll(&mut self) -> Option<QueryOutcome> {
        while let Ok(outcome) = self.evt_rx.try_recv() {
            if let Some(outcome) = self.accept(outcome) {
                return Some(outcome);
            }
        }
        None
    }

    /// Block up to `timeout` for the outcome of the latest submission.
    pub fn wait(&mut self, timeout: Duration) -> Option<QueryOutcome> {
        let deadline = Instant::now() + timeout;
        loop {
            let left = deadline.checked_duration_since(Instant::now())?;
            let outcome = self.evt_rx.recv_timeout(left).ok()?;
            if let Some(outcome) = self.accept(outcome) {
                return Some(outcome);
            }
        }
    }

    fn accept(&mut self, outcome: QueryOutcome) -> Option<QueryOutcome> {
        if outcome.generation != self.generation || self.resolved == self.generation {
            debug!(
                generation = outcome.generation,
                current = self.generation,
                pattern = %outcome.pattern,
                "dropping stale query outcome"
            );
            return None;
        }
        self.resolved = outcome.generation;
        Some(outcome)
    }

    fn resolve_locally(
        &self,
        generation: u64,
        pattern: &str,
        result: Result<ResultSet, QueryError>,
    ) {
        // The receiver lives in `self`, so this cannot fail.
        let _ = self.evt_tx.send(QueryOutcome {
            generation,
            pattern: pattern.to_string(),
            result,
        });
    }
}

impl Drop for QueryRunner {
    fn drop(&mut self) {
        // A query in flight finishes on its own; the thread exits afterwards.
        let _ = self.cmd_tx.send(WorkerCommand::Quit);
    }
}

enum Next {
    Run(PendingQuery),
    Idle,
    Quit,
}

fn next_command(cmd_rx: &Receiver<WorkerCommand>, deadline: Instant) -> Next {
    let wait = deadline.saturating_duration_since(Instant::now());
    let cmd = if wait.is_zero() {
        match cmd_rx.try_recv() {
            Ok(cmd) => cmd,
            Err(TryRecvError::Empty) => return Next::Idle,
            Err(TryRecvError::Disconnected) => return Next::Quit,
        }
    } else {
        match cmd_rx.recv_timeout(wait) {
            Ok(cmd) => cmd,
            Err(RecvTimeoutError::Timeout) => return Next::Idle,
            Err(RecvTimeoutError::Disconnected) => return Next::Quit,
        }
    };

    match cmd {
        WorkerCommand::Run(pending) => Next::Run(pending),
        WorkerCommand::Quit => Next::Quit,
    }
}

fn worker_loop<T: QueryTool>(
    tool: T,
    debounce: Duration,
    cmd_rx: Receiver<WorkerCommand>,
    evt_tx: Sender<QueryOutcome>,
) {
    while let Ok(cmd) = cmd_rx.recv() {
        let mut pending = match cmd {
            WorkerCommand::Run(pending) => pending,
            WorkerCommand::Quit => break,
        };

        // Coalesce bursts: keep only the latest pattern, and wait for a
        // quiet period of `debounce` before running it.
        let mut deadline = Instant::now() + debounce;
        loop {
            match next_command(&cmd_rx, deadline) {
                Next::Run(newer) => {
                    debug!(
                        superseded = pending.generation,
                        by = newer.generation,
                        "coalescing query"
                    );
                    pending = newer;
                    deadline = Instant::now() + debounce;
                }
                Next::Idle => break,
                Next::Quit => return,
            }
        }

        let started = Instant::now();
        let result = tool.run(&pending.pattern).map(Arc::new);
        match &result {
            Ok(entries) => debug!(
                generation = pending.generation,
                pattern = %pending.pattern,
                count = entries.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "query finished"
            ),
            Err(e) => warn!(
                generation = pending.generation,
                pattern = %pending.pattern,
                "query failed: {e}"
            ),
        }

        let outcome = QueryOutcome {
            generation: pending.generation,
            pattern: pending.pattern,
            result,
        };
        if evt_tx.send(outcome).is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn tool_config(program: &str, args: &[&str]) -> QueryConfig {
        QueryConfig {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            limit_flag: String::new(),
            limit: 0,
            timeout_ms: 5000,
            debounce_ms: 0,
            empty_exit_codes: Vec::new(),
        }
    }

    fn paths(entries: &[PathEntry]) -> Vec<&str> {
        entries.iter().map(|p| &**p).collect()
    }

    #[test]
    fn parse_lines_skips_blank_lines() {
        let entries = parse_lines(b"/a\n\n/b c\n/d\n");
        assert_eq!(paths(&entries), vec!["/a", "/b c", "/d"]);
    }

    #[test]
    fn command_tool_appends_pattern_last() {
        let tool = CommandTool::new(&tool_config("printf", &["%s\\n", "/a", "/b"])).unwrap();
        let entries = tool.run("/c").unwrap();
        assert_eq!(paths(&entries), vec!["/a", "/b", "/c"]);
    }

    #[test]
    fn command_tool_passes_limit_before_pattern() {
        let mut config = tool_config("printf", &["%s\\n"]);
        config.limit_flag = "-l".to_string();
        config.limit = 7;
        let tool = CommandTool::new(&config).unwrap();

        let entries = tool.run("needle").unwrap();
        assert_eq!(paths(&entries), vec!["-l", "7", "needle"]);
    }

    #[test]
    fn nonzero_exit_is_failure() {
        let tool = CommandTool::new(&tool_config("false", &[])).unwrap();
        match tool.run("x") {
            Err(QueryError::Exit { code, .. }) => assert_eq!(code, Some(1)),
            other => panic!("expected exit failure, got {other:?}"),
        }
    }

    #[test]
    fn configured_no_match_status_is_empty_result() {
        let mut config = tool_config("false", &[]);
        config.empty_exit_codes = vec![1];
        let tool = CommandTool::new(&config).unwrap();
        assert!(tool.run("x").unwrap().is_empty());
    }

    #[test]
    fn missing_program_is_not_found() {
        let tool = CommandTool::new(&tool_config("locus-no-such-query-tool", &[])).unwrap();
        assert!(matches!(tool.run("x"), Err(QueryError::NotFound(_))));
    }

    #[test]
    fn hung_tool_times_out() {
        let mut config = tool_config("sleep", &[]);
        config.timeout_ms = 150;
        let tool = CommandTool::new(&config).unwrap();

        let started = Instant::now();
        assert!(matches!(tool.run("5"), Err(QueryError::Timeout(_))));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    /// In-process tool with per-pattern delays that records every call.
    #[derive(Clone, Default)]
    struct ScriptedTool {
        calls: Arc<Mutex<Vec<String>>>,
        slow: Vec<(String, Duration)>,
    }

    impl QueryTool for ScriptedTool {
        fn run(&self, pattern: &str) -> Result<Vec<PathEntry>, QueryError> {
            self.calls.lock().unwrap().push(pattern.to_string());
            if let Some((_, delay)) = self.slow.iter().find(|(p, _)| p == pattern) {
                std::thread::sleep(*delay);
            }
            Ok(vec![PathEntry::from(format!("/{pattern}/hit").as_str())])
        }
    }

    #[test]
    fn blank_pattern_never_reaches_tool() {
        let tool = ScriptedTool::default();
        let calls = Arc::clone(&tool.calls);
        let mut runner = QueryRunner::spawn(tool, Duration::ZERO);

        let generation = runner.submit("");
        let outcome = runner.wait(Duration::from_secs(2)).unwrap();
        assert_eq!(outcome.generation, generation);
        assert!(outcome.result.unwrap().is_empty());

        runner.submit("   ");
        assert!(runner.wait(Duration::from_secs(2)).unwrap().result.unwrap().is_empty());
        assert!(calls.lock().unwrap().is_empty());
        assert!(!runner.is_pending());
    }

    #[test]
    fn only_latest_of_a_burst_is_reported() {
        let tool = ScriptedTool {
            slow: vec![
                ("a".to_string(), Duration::from_millis(200)),
                ("ab".to_string(), Duration::from_millis(100)),
            ],
            ..Default::default()
        };
        let mut runner = QueryRunner::spawn(tool, Duration::ZERO);

        runner.submit("a");
        runner.submit("ab");
        let latest = runner.submit("abc");
        assert!(runner.is_pending());

        let outcome = runner.wait(Duration::from_secs(5)).unwrap();
        assert_eq!(outcome.generation, latest);
        assert_eq!(outcome.pattern, "abc");
        assert_eq!(paths(&outcome.result.unwrap()), vec!["/abc/hit"]);
        assert!(!runner.is_pending());

        // Whatever else finishes later is stale.
        std::thread::sleep(Duration::from_millis(350));
        assert!(runner.poll().is_none());
    }

    #[test]
    fn debounce_collapses_typing_burst_into_one_call() {
        let tool = ScriptedTool::default();
        let calls = Arc::clone(&tool.calls);
        let mut runner = QueryRunner::spawn(tool, Duration::from_millis(150));

        for pattern in ["f", "fo", "foo"] {
            runner.submit(pattern);
        }
        let outcome = runner.wait(Duration::from_secs(5)).unwrap();
        assert_eq!(outcome.pattern, "foo");
        assert_eq!(*calls.lock().unwrap(), vec!["foo".to_string()]);
    }

    #[test]
    fn out_of_order_outcomes_never_win() {
        let mut runner = QueryRunner::spawn(ScriptedTool::default(), Duration::ZERO);
        runner.generation = 3;
        runner.resolved = 2;

        let fake = |generation: u64, pattern: &str| QueryOutcome {
            generation,
            pattern: pattern.to_string(),
            result: Ok(Arc::default()),
        };
        runner.evt_tx.send(fake(1, "a")).unwrap();
        runner.evt_tx.send(fake(3, "abc")).unwrap();
        runner.evt_tx.send(fake(2, "ab")).unwrap();

        assert_eq!(runner.poll().unwrap().pattern, "abc");
        assert!(runner.poll().is_none());
    }

    #[test]
    fn invalidate_drops_outstanding_outcome() {
        let tool = ScriptedTool {
            slow: vec![("x".to_string(), Duration::from_millis(100))],
            ..Default::default()
        };
        let mut runner = QueryRunner::spawn(tool, Duration::ZERO);

        runner.submit("x");
        runner.invalidate();
        assert!(!runner.is_pending());
        assert!(runner.wait(Duration::from_millis(400)).is_none());
    }
}
