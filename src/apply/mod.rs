//! Desktop picture application.
//!
//! Three ordered strategies drive the System Events scripting interface;
//! the first to succeed wins. Every attempt runs under a timeout so a hung
//! scripting host cannot stall the run, and stderr is scanned for an
//! embedded "error" because osascript can exit 0 while still reporting one.

mod script;

use async_trait::async_trait;
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tokio::time::{sleep, timeout};

const ATTEMPT_TIMEOUT: Duration = Duration::from_secs(5);

/// Some environments need a moment to flush the picture cache after the
/// script returns
const SETTLE_DELAY: Duration = Duration::from_millis(300);

/// One way of asking the OS to change the desktop picture.
pub trait ApplyStrategy {
    fn name(&self) -> &'static str;
    /// Whether this strategy has a meaningful form for the given target
    fn supports(&self, target: Option<usize>) -> bool;
    /// AppleScript source; the image path arrives as `item 1 of argv`
    fn script(&self, target: Option<usize>) -> String;
}

struct Direct;
struct Iterate;
struct Alias;

impl ApplyStrategy for Direct {
    fn name(&self) -> &'static str {
        "direct"
    }
    fn supports(&self, _target: Option<usize>) -> bool {
        true
    }
    fn script(&self, target: Option<usize>) -> String {
        script::direct(target)
    }
}

impl ApplyStrategy for Iterate {
    fn name(&self) -> &'static str {
        "iterate"
    }
    fn supports(&self, target: Option<usize>) -> bool {
        target.is_none()
    }
    fn script(&self, _target: Option<usize>) -> String {
        script::iterate()
    }
}

impl ApplyStrategy for Alias {
    fn name(&self) -> &'static str {
        "alias"
    }
    fn supports(&self, _target: Option<usize>) -> bool {
        true
    }
    fn script(&self, target: Option<usize>) -> String {
        script::alias(target)
    }
}

pub fn strategies() -> Vec<Box<dyn ApplyStrategy + Send + Sync>> {
    vec![Box::new(Direct), Box::new(Iterate), Box::new(Alias)]
}

#[derive(Debug, Error)]
pub enum AttemptError {
    #[error("osascript timed out after {0} seconds")]
    Timeout(u64),

    #[error("failed to spawn osascript: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("osascript exited with code {code:?}: {stderr}")]
    Failed { code: Option<i32>, stderr: String },

    #[error("osascript reported an error: {0}")]
    ErrorOutput(String),
}

#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("osascript is not available on this system")]
    InterpreterMissing,

    #[error("every strategy failed")]
    AllFailed(Vec<(&'static str, AttemptError)>),
}

/// Executes one strategy attempt. Abstracted so tests can count and fail
/// invocations without a scripting host.
#[async_trait]
pub trait ScriptRunner: Send + Sync {
    async fn run(&self, script: &str, path: &Path) -> Result<(), AttemptError>;
}

pub struct OsascriptRunner;

#[async_trait]
impl ScriptRunner for OsascriptRunner {
    async fn run(&self, script: &str, path: &Path) -> Result<(), AttemptError> {
        let output = match timeout(
            ATTEMPT_TIMEOUT,
            Command::new("osascript")
                .arg("-e")
                .arg(script)
                .arg(path)
                .output(),
        )
        .await
        {
            Err(_) => return Err(AttemptError::Timeout(ATTEMPT_TIMEOUT.as_secs())),
            Ok(result) => result?,
        };

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if !output.status.success() {
            return Err(AttemptError::Failed {
                code: output.status.code(),
                stderr,
            });
        }
        // The scripting host can exit 0 while reporting an embedded error
        if stderr.to_lowercase().contains("error") {
            return Err(AttemptError::ErrorOutput(stderr));
        }
        Ok(())
    }
}

/// Assign `path` as the desktop picture, addressing one desktop slot when
/// `target` is given and every desktop otherwise. Returns the name of the
/// winning strategy.
pub async fn apply(
    path: &Path,
    target: Option<usize>,
    debug: bool,
) -> Result<&'static str, ApplyError> {
    if which::which("osascript").is_err() {
        return Err(ApplyError::InterpreterMissing);
    }

    let absolute = absolute_path(path);
    apply_with(&strategies(), &OsascriptRunner, &absolute, target, debug).await
}

fn absolute_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

pub(crate) async fn apply_with(
    strategies: &[Box<dyn ApplyStrategy + Send + Sync>],
    runner: &dyn ScriptRunner,
    path: &Path,
    target: Option<usize>,
    debug: bool,
) -> Result<&'static str, ApplyError> {
    let mut failures = Vec::new();

    for strategy in strategies.iter().filter(|s| s.supports(target)) {
        if debug {
            eprintln!("Trying strategy '{}'", strategy.name());
        }
        match runner.run(&strategy.script(target), path).await {
            Ok(()) => {
                sleep(SETTLE_DELAY).await;
                return Ok(strategy.name());
            }
            Err(e) => {
                println!(
                    "{}",
                    format!("⚠ Strategy '{}' failed: {}", strategy.name(), e).yellow()
                );
                failures.push((strategy.name(), e));
            }
        }
    }

    Err(ApplyError::AllFailed(failures))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records every script it is handed; fails the first `failures` calls.
    struct MockRunner {
        calls: Mutex<Vec<String>>,
        failures: usize,
    }

    impl MockRunner {
        fn failing(failures: usize) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                failures,
            }
        }

        fn scripts(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ScriptRunner for MockRunner {
        async fn run(&self, script: &str, _path: &Path) -> Result<(), AttemptError> {
            let mut calls = self.calls.lock().unwrap();
            calls.push(script.to_string());
            if calls.len() <= self.failures {
                Err(AttemptError::ErrorOutput("execution error".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[tokio::test]
    async fn test_first_success_skips_remaining_strategies() {
        let runner = MockRunner::failing(0);
        let result = apply_with(
            &strategies(),
            &runner,
            Path::new("/tmp/wall.jpg"),
            None,
            false,
        )
        .await;

        assert_eq!(result.unwrap(), "direct");
        assert_eq!(runner.scripts().len(), 1);
    }

    #[tokio::test]
    async fn test_second_strategy_runs_after_first_failure() {
        let runner = MockRunner::failing(1);
        let result = apply_with(
            &strategies(),
            &runner,
            Path::new("/tmp/wall.jpg"),
            None,
            false,
        )
        .await;

        assert_eq!(result.unwrap(), "iterate");
        assert_eq!(runner.scripts().len(), 2);
    }

    #[tokio::test]
    async fn test_all_failures_are_collected_in_order() {
        let runner = MockRunner::failing(3);
        let result = apply_with(
            &strategies(),
            &runner,
            Path::new("/tmp/wall.jpg"),
            None,
            false,
        )
        .await;

        match result {
            Err(ApplyError::AllFailed(failures)) => {
                let names: Vec<_> = failures.iter().map(|(name, _)| *name).collect();
                assert_eq!(names, vec!["direct", "iterate", "alias"]);
            }
            other => panic!("expected AllFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_target_skips_iterate_strategy() {
        let runner = MockRunner::failing(2);
        let result = apply_with(
            &strategies(),
            &runner,
            Path::new("/tmp/wall.jpg"),
            Some(2),
            false,
        )
        .await;

        assert!(matches!(result, Err(ApplyError::AllFailed(_))));
        let scripts = runner.scripts();
        assert_eq!(scripts.len(), 2);
        for script in &scripts {
            assert!(script.contains("desktop 2"));
            assert!(!script.contains("repeat with"));
        }
    }
}
