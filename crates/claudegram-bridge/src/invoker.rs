//! Claude CLI invoker: runs one non-interactive turn of the assistant.
//!
//! Every call spawns `claude [--continue] --dangerously-skip-permissions -p
//! <prompt>` in the requested directory, waits up to five minutes and maps
//! the outcome to an [`InvocationResult`]. Nothing here touches session or
//! directory state.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Hard limit on a single invocation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Flag passed on every call so the CLI never blocks on a permission prompt.
const SKIP_PERMISSIONS_FLAG: &str = "--dangerously-skip-permissions";
/// Flag that resumes the most recent conversation in the working directory.
const CONTINUE_FLAG: &str = "--continue";

// ─────────────────────────────────────────────
// Request / result
// ─────────────────────────────────────────────

/// One prompt to run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvocationRequest {
    pub prompt: String,
    pub continue_conversation: bool,
    pub cwd: PathBuf,
}

/// Outcome of a single invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvocationResult {
    Success(String),
    EmptyOutput,
    TimedOut,
    ProcessNotFound,
    Failed(String),
}

impl InvocationResult {
    /// Reply text shown in chat.
    pub fn into_reply(self) -> String {
        match self {
            Self::Success(output) => output,
            Self::EmptyOutput => "Empty response from Claude.".to_string(),
            Self::TimedOut => "Timeout - Claude took too long (5 minute limit).".to_string(),
            Self::ProcessNotFound => {
                "Error: Claude CLI not found. Is it in PATH?\nCheck: claude --version".to_string()
            }
            Self::Failed(message) => format!("Error: {message}"),
        }
    }
}

/// Anything that can answer a prompt. The bridge only talks to this trait.
#[async_trait]
pub trait Invoker: Send + Sync {
    async fn invoke(&self, request: InvocationRequest) -> InvocationResult;
}

// ─────────────────────────────────────────────
// ClaudeCli
// ─────────────────────────────────────────────

/// Invoker backed by the `claude` executable.
#[derive(Clone, Debug)]
pub struct ClaudeCli {
    /// Resolved once at construction. `None` ⇒ every call is `ProcessNotFound`.
    binary: Option<PathBuf>,
    timeout: Duration,
}

impl ClaudeCli {
    /// Resolve `command` on `PATH` and build an invoker for it.
    ///
    /// Resolution failure is not an error here; it only logs.
    pub fn new(command: &str) -> Self {
        let binary = resolve_binary(command);
        match &binary {
            Some(path) => info!(binary = %path.display(), "claude CLI resolved"),
            None => warn!(command, "claude CLI not found in PATH"),
        }
        Self {
            binary,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Use an explicit binary, skipping the `PATH` search.
    pub fn with_binary(binary: Option<PathBuf>) -> Self {
        Self {
            binary,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The resolved executable, if any.
    pub fn binary(&self) -> Option<&Path> {
        self.binary.as_deref()
    }

    /// Arguments after the binary name, in order.
    pub fn build_args(request: &InvocationRequest) -> Vec<String> {
        let mut args = Vec::with_capacity(4);
        if request.continue_conversation {
            args.push(CONTINUE_FLAG.to_string());
        }
        args.push(SKIP_PERMISSIONS_FLAG.to_string());
        args.push("-p".to_string());
        args.push(request.prompt.clone());
        args
    }

    /// Map a finished process to a result.
    fn classify(success: bool, stdout: &[u8], stderr: &[u8]) -> InvocationResult {
        let stdout = String::from_utf8_lossy(stdout);
        let stderr = String::from_utf8_lossy(stderr);
        let output = stdout.trim();
        let error = stderr.trim();

        if !success && !error.is_empty() {
            warn!(stderr = %error, "claude CLI exited with an error");
            if output.is_empty() {
                return InvocationResult::Failed(error.to_string());
            }
        }

        if output.is_empty() {
            InvocationResult::EmptyOutput
        } else {
            InvocationResult::Success(output.to_string())
        }
    }
}

#[async_trait]
impl Invoker for ClaudeCli {
    async fn invoke(&self, request: InvocationRequest) -> InvocationResult {
        let Some(binary) = &self.binary else {
            return InvocationResult::ProcessNotFound;
        };

        if !request.cwd.is_dir() {
            return InvocationResult::Failed(format!(
                "Working directory not found: {}",
                request.cwd.display()
            ));
        }

        let args = Self::build_args(&request);
        debug!(
            binary = %binary.display(),
            cwd = %request.cwd.display(),
            continue_conversation = request.continue_conversation,
            "spawning claude CLI"
        );

        let mut command = Command::new(binary);
        command
            .args(&args)
            .current_dir(&request.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        #[cfg(unix)]
        command.process_group(0);

        let child = match command.spawn() {
            Ok(child) => child,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return InvocationResult::ProcessNotFound;
            }
            Err(e) => return InvocationResult::Failed(format!("Failed to start claude CLI: {e}")),
        };
        let pid = child.id();

        match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => Self::classify(output.status.success(), &output.stdout, &output.stderr),
            Ok(Err(e)) => InvocationResult::Failed(e.to_string()),
            Err(_) => {
                warn!(timeout_secs = self.timeout.as_secs(), "claude CLI timed out");
                kill_process_group(pid);
                InvocationResult::TimedOut
            }
        }
    }
}

/// SIGKILL the child's whole group. The leader itself is reaped on drop.
#[cfg(unix)]
fn kill_process_group(pid: Option<u32>) {
    let Some(pid) = pid.and_then(|p| libc::pid_t::try_from(p).ok()) else {
        return;
    };
    // SAFETY: killpg only sends a signal; the group was created for this child.
    let rc = unsafe { libc::killpg(pid, libc::SIGKILL) };
    if rc != 0 {
        debug!(pid, "process group already gone");
    }
}

#[cfg(not(unix))]
fn kill_process_group(_pid: Option<u32>) {}

// ─────────────────────────────────────────────
// Binary resolution
// ─────────────────────────────────────────────

/// Find `command` the way a shell would.
///
/// Names containing a path separator are taken as paths. Bare names are
/// searched in every `PATH` entry, trying the platform's extension variants.
pub fn resolve_binary(command: &str) -> Option<PathBuf> {
    let command = command.trim();
    if command.is_empty() {
        return None;
    }

    let as_path = Path::new(command);
    if as_path.components().count() > 1 {
        return as_path.is_file().then(|| as_path.to_path_buf());
    }

    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var).find_map(|dir| {
        candidate_names(command)
            .into_iter()
            .map(|name| dir.join(name))
            .find(|p| p.is_file())
    })
}

fn candidate_names(command: &str) -> Vec<String> {
    if cfg!(windows) {
        vec![format!("{command}.exe"), format!("{command}.cmd"), command.to_string()]
    } else {
        vec![command.to_string(), format!("{command}.cmd")]
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn request(prompt: &str, continue_conversation: bool, cwd: &Path) -> InvocationRequest {
        InvocationRequest {
            prompt: prompt.to_string(),
            continue_conversation,
            cwd: cwd.to_path_buf(),
        }
    }

    #[cfg(unix)]
    fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn test_build_args_with_continue() {
        let req = request("fix the bug", true, Path::new("/tmp"));
        assert_eq!(
            ClaudeCli::build_args(&req),
            vec!["--continue", "--dangerously-skip-permissions", "-p", "fix the bug"]
        );
    }

    #[test]
    fn test_build_args_fresh() {
        let req = request("hi", false, Path::new("/tmp"));
        assert_eq!(
            ClaudeCli::build_args(&req),
            vec!["--dangerously-skip-permissions", "-p", "hi"]
        );
    }

    #[test]
    fn test_prompt_is_a_single_argument() {
        let req = request("rm -rf / ; echo $HOME \"quoted\"", false, Path::new("/tmp"));
        let args = ClaudeCli::build_args(&req);
        assert_eq!(args.last().unwrap(), "rm -rf / ; echo $HOME \"quoted\"");
    }

    #[test]
    fn test_classify_success_trims() {
        assert_eq!(
            ClaudeCli::classify(true, b"  answer\n\n", b""),
            InvocationResult::Success("answer".into())
        );
    }

    #[test]
    fn test_classify_empty_output() {
        assert_eq!(ClaudeCli::classify(true, b" \n", b""), InvocationResult::EmptyOutput);
    }

    #[test]
    fn test_classify_failure_uses_stderr() {
        assert_eq!(
            ClaudeCli::classify(false, b"", b"auth expired\n"),
            InvocationResult::Failed("auth expired".into())
        );
    }

    #[test]
    fn test_classify_failure_with_stdout_prefers_stdout() {
        assert_eq!(
            ClaudeCli::classify(false, b"partial answer", b"warning"),
            InvocationResult::Success("partial answer".into())
        );
    }

    #[test]
    fn test_classify_failure_without_stderr_is_empty() {
        assert_eq!(ClaudeCli::classify(false, b"", b""), InvocationResult::EmptyOutput);
    }

    #[test]
    fn test_classify_invalid_utf8_is_replaced() {
        match ClaudeCli::classify(true, b"ok \xff", b"") {
            InvocationResult::Success(s) => assert_eq!(s, "ok \u{FFFD}"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_reply_texts() {
        assert_eq!(InvocationResult::Success("x".into()).into_reply(), "x");
        assert_eq!(
            InvocationResult::EmptyOutput.into_reply(),
            "Empty response from Claude."
        );
        assert_eq!(
            InvocationResult::TimedOut.into_reply(),
            "Timeout - Claude took too long (5 minute limit)."
        );
        assert_eq!(
            InvocationResult::ProcessNotFound.into_reply(),
            "Error: Claude CLI not found. Is it in PATH?\nCheck: claude --version"
        );
        assert_eq!(
            InvocationResult::Failed("boom".into()).into_reply(),
            "Error: boom"
        );
    }

    #[test]
    fn test_resolve_unknown_binary() {
        assert!(resolve_binary("definitely-not-a-real-binary-7f3a").is_none());
        assert!(resolve_binary("").is_none());
    }

    #[test]
    fn test_resolve_explicit_missing_path() {
        assert!(resolve_binary("/no/such/dir/claude").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_on_path() {
        assert_eq!(resolve_binary("sh").map(|p| p.is_file()), Some(true));
    }

    #[tokio::test]
    async fn test_unresolved_binary_returns_process_not_found() {
        let cli = ClaudeCli::new("definitely-not-a-real-binary-7f3a");
        assert!(cli.binary().is_none());

        let dir = tempfile::tempdir().unwrap();
        let result = cli.invoke(request("hello", true, dir.path())).await;
        assert_eq!(result, InvocationResult::ProcessNotFound);
    }

    #[tokio::test]
    async fn test_missing_cwd_fails_without_spawning() {
        let cli = ClaudeCli::with_binary(Some(PathBuf::from("/bin/echo")));
        let result = cli
            .invoke(request("hello", false, Path::new("/no/such/dir/anywhere")))
            .await;
        assert!(matches!(result, InvocationResult::Failed(m) if m.starts_with("Working directory not found")));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_invoke_passes_arguments() {
        let dir = tempfile::tempdir().unwrap();
        let bin = script(dir.path(), "fake-claude", r#"echo "$@""#);
        let cli = ClaudeCli::with_binary(Some(bin));

        let result = cli.invoke(request("hello world", true, dir.path())).await;
        assert_eq!(
            result,
            InvocationResult::Success(
                "--continue --dangerously-skip-permissions -p hello world".into()
            )
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_invoke_runs_in_cwd() {
        let dir = tempfile::tempdir().unwrap();
        let bin = script(dir.path(), "fake-claude", "pwd");
        let cli = ClaudeCli::with_binary(Some(bin));

        let result = cli.invoke(request("where", false, dir.path())).await;
        let expected = dir.path().canonicalize().unwrap();
        match result {
            InvocationResult::Success(out) => {
                assert_eq!(PathBuf::from(out).canonicalize().unwrap(), expected)
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_invoke_failure_reports_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let bin = script(dir.path(), "fake-claude", "echo 'not logged in' >&2\nexit 3");
        let cli = ClaudeCli::with_binary(Some(bin));

        let result = cli.invoke(request("hi", false, dir.path())).await;
        assert_eq!(result, InvocationResult::Failed("not logged in".into()));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_invoke_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let bin = script(dir.path(), "fake-claude", "sleep 30");
        let cli = ClaudeCli::with_binary(Some(bin)).with_timeout(Duration::from_millis(300));

        let started = std::time::Instant::now();
        let result = cli.invoke(request("slow", false, dir.path())).await;
        assert_eq!(result, InvocationResult::TimedOut);
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    /// Running and not a zombie, according to `/proc/<pid>/stat`.
    #[cfg(target_os = "linux")]
    fn process_running(pid: u32) -> bool {
        let Ok(stat) = std::fs::read_to_string(format!("/proc/{pid}/stat")) else {
            return false;
        };
        // The state field follows the parenthesised command name.
        let state = stat
            .rfind(')')
            .and_then(|i| stat[i + 1..].split_whitespace().next());
        !matches!(state, Some("Z") | Some("X") | None)
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_timeout_kills_background_children() {
        let dir = tempfile::tempdir().unwrap();
        let pidfile = dir.path().join("child.pid");
        let bin = script(
            dir.path(),
            "fake-claude",
            &format!("sleep 60 &\necho $! > '{}'\nwait", pidfile.display()),
        );
        let cli = ClaudeCli::with_binary(Some(bin)).with_timeout(Duration::from_millis(500));

        let result = cli.invoke(request("spawn", false, dir.path())).await;
        assert_eq!(result, InvocationResult::TimedOut);

        let pid: u32 = std::fs::read_to_string(&pidfile)
            .unwrap()
            .trim()
            .parse()
            .unwrap();

        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while process_running(pid) && std::time::Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert!(!process_running(pid), "background child {pid} survived the timeout");
    }
}
