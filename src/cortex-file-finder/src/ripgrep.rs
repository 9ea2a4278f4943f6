//! File listing through a ripgrep subprocess.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::{Child, ChildStdout, Command};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::args::build_args;
use crate::error::{FinderError, FinderResult};
use crate::options::RootOptions;
use crate::provider::{FileProvider, OnCandidate};

/// How the stdout stream ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamEnd {
    Closed,
    Cancelled,
}

/// Spawns `rg --files` with the root as working directory and streams its
/// output one line per candidate.
#[derive(Debug, Clone)]
pub struct RipgrepProvider {
    program: PathBuf,
}

impl RipgrepProvider {
    /// Creates a provider running the ripgrep binary at `program`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// The ripgrep binary this provider runs.
    pub fn program(&self) -> &Path {
        &self.program
    }

    fn spawn(&self, root: &Path, options: &RootOptions) -> FinderResult<Child> {
        let args = build_args(options);
        tracing::debug!(
            program = %self.program.display(),
            root = %root.display(),
            ?args,
            "Spawning file listing"
        );

        Command::new(&self.program)
            .args(&args)
            .current_dir(root)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| FinderError::spawn(self.program.display().to_string(), e))
    }
}

#[async_trait]
impl FileProvider for RipgrepProvider {
    fn name(&self) -> &str {
        "ripgrep"
    }

    async fn list_files(
        &self,
        root: &Path,
        options: &RootOptions,
        on_candidate: OnCandidate<'_>,
        cancel: &CancellationToken,
    ) -> FinderResult<()> {
        if !root.is_dir() {
            return Err(FinderError::root_not_found(root));
        }

        let mut child = self.spawn(root, options)?;
        let stderr_task = collect_stderr(&mut child);

        let outcome = match child.stdout.take() {
            Some(stdout) => stream_lines(stdout, on_candidate, cancel).await,
            None => Ok(StreamEnd::Closed),
        };

        match outcome {
            Ok(StreamEnd::Closed) => {
                let status = child.wait().await?;
                let stderr = stderr_task.await.unwrap_or_default();
                if !stderr.trim().is_empty() {
                    return Err(FinderError::tool_failed(
                        self.program.display().to_string(),
                        stderr.trim(),
                    ));
                }
                tracing::trace!(root = %root.display(), %status, "File listing finished");
                Ok(())
            }
            Ok(StreamEnd::Cancelled) => {
                tracing::trace!(root = %root.display(), "File listing cancelled");
                terminate(&mut child).await;
                stderr_task.abort();
                Ok(())
            }
            Err(e) => {
                terminate(&mut child).await;
                stderr_task.abort();
                Err(e)
            }
        }
    }
}

/// Delivers stdout lines until the stream closes or `cancel` fires.
///
/// File names are not required to be UTF-8, so lines are split on raw
/// bytes and decoded lossily.
async fn stream_lines(
    stdout: ChildStdout,
    on_candidate: OnCandidate<'_>,
    cancel: &CancellationToken,
) -> FinderResult<StreamEnd> {
    let mut lines = BufReader::new(stdout).split(b'\n');

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => return Ok(StreamEnd::Cancelled),

            line = lines.next_segment() => match line? {
                // A line that raced with cancellation is dropped.
                Some(_) if cancel.is_cancelled() => return Ok(StreamEnd::Cancelled),
                Some(line) => on_candidate(decode_line(&line)),
                None => return Ok(StreamEnd::Closed),
            },
        }
    }
}

fn decode_line(line: &[u8]) -> String {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line).into_owned()
}

/// Reads all of stderr in the background so a chatty child cannot block.
fn collect_stderr(child: &mut Child) -> JoinHandle<String> {
    let stderr = child.stderr.take();
    tokio::spawn(async move {
        let mut text = String::new();
        if let Some(mut stderr) = stderr
            && let Err(e) = stderr.read_to_string(&mut text).await
        {
            tracing::debug!("Failed to read listing stderr: {}", e);
        }
        text
    })
}

/// Kills and reaps the child; a child that already exited is left alone.
async fn terminate(child: &mut Child) {
    if let Err(e) = child.start_kill() {
        tracing::trace!("Listing process already exited: {}", e);
    }
    match child.wait().await {
        Ok(status) => tracing::trace!(%status, "Listing process reaped"),
        Err(e) => tracing::trace!("Failed to reap listing process: {}", e),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serial_test::serial;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::time::Duration;
    use tempfile::TempDir;

    /// Writes an executable shell script standing in for ripgrep.
    fn fake_tool(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("fake-rg");
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    async fn run(
        provider: &RipgrepProvider,
        root: &Path,
        cancel: &CancellationToken,
    ) -> (FinderResult<()>, Vec<String>) {
        let mut seen = Vec::new();
        let mut on_candidate = |line: String| seen.push(line);
        let result = provider
            .list_files(root, &RootOptions::default(), &mut on_candidate, cancel)
            .await;
        (result, seen)
    }

    #[tokio::test]
    #[serial]
    async fn test_streams_lines_in_order() {
        let tools = TempDir::new().unwrap();
        let root = TempDir::new().unwrap();
        let provider = RipgrepProvider::new(fake_tool(
            &tools,
            "printf 'src/a.ts\\nsrc/b.ts\\nREADME.md\\n'",
        ));

        let (result, seen) = run(&provider, root.path(), &CancellationToken::new()).await;

        assert!(result.is_ok());
        assert_eq!(seen, vec!["src/a.ts", "src/b.ts", "README.md"]);
    }

    #[tokio::test]
    #[serial]
    async fn test_non_utf8_name_does_not_end_listing() {
        let tools = TempDir::new().unwrap();
        let root = TempDir::new().unwrap();
        let provider = RipgrepProvider::new(fake_tool(
            &tools,
            "printf 'a.rs\\nbad\\377name.rs\\nb.rs\\r\\nc.rs\\n'",
        ));

        let (result, seen) = run(&provider, root.path(), &CancellationToken::new()).await;

        assert!(result.is_ok());
        assert_eq!(seen, vec!["a.rs", "bad\u{FFFD}name.rs", "b.rs", "c.rs"]);
    }

    #[test]
    fn test_decode_line() {
        assert_eq!(decode_line(b"src/main.rs"), "src/main.rs");
        assert_eq!(decode_line(b"src/main.rs\r"), "src/main.rs");
        assert_eq!(decode_line(b"caf\xe9.txt"), "caf\u{FFFD}.txt");
        assert_eq!(decode_line(b""), "");
    }

    #[tokio::test]
    #[serial]
    async fn test_runs_in_root_with_built_args() {
        let tools = TempDir::new().unwrap();
        let root = TempDir::new().unwrap();
        fs::write(root.path().join("marker.txt"), "").unwrap();
        let provider = RipgrepProvider::new(fake_tool(&tools, "ls; echo \"$@\""));

        let options = RootOptions::new().exclude("*.log").use_git_ignore(false);
        let mut seen = Vec::new();
        let mut on_candidate = |line: String| seen.push(line);
        provider
            .list_files(
                root.path(),
                &options,
                &mut on_candidate,
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(
            seen,
            vec![
                "marker.txt",
                "--files --case-sensitive --glob !*.log -uu",
            ]
        );
    }

    #[tokio::test]
    #[serial]
    async fn test_stderr_output_fails_root() {
        let tools = TempDir::new().unwrap();
        let root = TempDir::new().unwrap();
        let provider = RipgrepProvider::new(fake_tool(
            &tools,
            "echo found.rs; echo 'rg: ./secret: Permission denied' >&2; exit 2",
        ));

        let (result, seen) = run(&provider, root.path(), &CancellationToken::new()).await;

        assert_eq!(seen, vec!["found.rs"]);
        match result {
            Err(FinderError::ToolFailed { stderr, .. }) => {
                assert!(stderr.contains("Permission denied"));
            }
            other => panic!("expected ToolFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    #[serial]
    async fn test_no_files_exit_code_is_not_a_failure() {
        let tools = TempDir::new().unwrap();
        let root = TempDir::new().unwrap();
        let provider = RipgrepProvider::new(fake_tool(&tools, "exit 1"));

        let (result, seen) = run(&provider, root.path(), &CancellationToken::new()).await;

        assert!(result.is_ok());
        assert!(seen.is_empty());
    }

    #[tokio::test]
    #[serial]
    async fn test_cancellation_stops_delivery_and_kills_process() {
        let tools = TempDir::new().unwrap();
        let root = TempDir::new().unwrap();
        let provider = RipgrepProvider::new(fake_tool(
            &tools,
            "echo first; echo second; exec sleep 30",
        ));

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        let mut seen = Vec::new();
        let mut on_candidate = |line: String| {
            seen.push(line);
            trigger.cancel();
        };

        let result = tokio::time::timeout(
            Duration::from_secs(10),
            provider.list_files(
                root.path(),
                &RootOptions::default(),
                &mut on_candidate,
                &cancel,
            ),
        )
        .await
        .expect("cancelled listing must not wait for the process");

        assert!(result.is_ok());
        assert_eq!(seen, vec!["first"]);
    }

    #[tokio::test]
    #[serial]
    async fn test_pre_cancelled_token_delivers_nothing() {
        let tools = TempDir::new().unwrap();
        let root = TempDir::new().unwrap();
        let provider = RipgrepProvider::new(fake_tool(&tools, "echo a; echo b"));

        let cancel = CancellationToken::new();
        cancel.cancel();
        let (result, seen) = run(&provider, root.path(), &cancel).await;

        assert!(result.is_ok());
        assert!(seen.is_empty());
    }

    #[tokio::test]
    #[serial]
    async fn test_missing_program_is_spawn_error() {
        let root = TempDir::new().unwrap();
        let provider = RipgrepProvider::new("/nonexistent/bin/rg");

        let (result, _) = run(&provider, root.path(), &CancellationToken::new()).await;

        assert!(matches!(result, Err(FinderError::Spawn { .. })));
    }

    #[tokio::test]
    async fn test_missing_root_fails_before_spawn() {
        let provider = RipgrepProvider::new("rg");

        let (result, _) = run(
            &provider,
            Path::new("/nonexistent/root/dir"),
            &CancellationToken::new(),
        )
        .await;

        assert!(matches!(result, Err(FinderError::RootNotFound(_))));
    }
}
