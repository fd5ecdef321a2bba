//! Process Supervisor
//!
//! Runs the benchmarked program as a child process, drains its output pipes
//! and enforces a per-invocation timeout.
//!
//! The child is placed in its own process group so that signals also reach
//! anything it spawned (`go run` compiles and then execs a second process).

use std::io::Read;
use std::os::unix::process::CommandExt;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use sweepbench_core::{Invocation, InvocationError, InvocationOutput, Invoker};
use tracing::{debug, warn};

/// How often a running child is polled for exit
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Time between SIGTERM and SIGKILL on timeout
const TERMINATE_GRACE: Duration = Duration::from_secs(2);

/// Lines of stderr kept in a non-zero exit error
const STDERR_TAIL_LINES: usize = 20;

/// Send a signal to every process in the group led by `pid`.
fn signal_group(pid: u32, signal: libc::c_int) -> Result<(), std::io::Error> {
    let ret = unsafe { libc::kill(-(pid as libc::pid_t), signal) };
    if ret == -1 {
        Err(std::io::Error::last_os_error())
    } else {
        Ok(())
    }
}

/// Thread draining one output pipe
type PipeReader = JoinHandle<std::io::Result<String>>;

/// Read a pipe to EOF
fn drain<R: Read>(pipe: Option<R>) -> std::io::Result<String> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf)?;
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn stderr_tail(stderr: &str) -> String {
    let lines: Vec<&str> = stderr.trim_end().lines().collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}

/// Runs each invocation as a blocking child process.
#[derive(Debug, Clone)]
pub struct ProcessInvoker {
    timeout: Option<Duration>,
}

impl ProcessInvoker {
    /// Create an invoker; `None` waits indefinitely
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    fn spawn(&self, invocation: &Invocation) -> Result<Child, InvocationError> {
        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .process_group(0);

        if let Some(dir) = &invocation.working_dir {
            command.current_dir(dir);
        }

        debug!(
            command = %invocation.display(),
            cwd = ?invocation.working_dir,
            "spawning program"
        );

        command.spawn().map_err(|source| InvocationError::SpawnFailed {
            program: invocation.program.clone(),
            source,
        })
    }

    /// Wait for exit, returning `None` if the deadline passed first.
    fn wait(
        &self,
        child: &mut Child,
        deadline: Option<Instant>,
    ) -> Result<Option<ExitStatus>, InvocationError> {
        let Some(deadline) = deadline else {
            return Ok(Some(child.wait()?));
        };

        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(Some(status));
            }
            if Instant::now() >= deadline {
                return Ok(None);
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    /// Wait for both pipe readers to hit EOF, returning `false` if the
    /// deadline passed first.
    ///
    /// Anything the program started in the background holds the pipes open
    /// after the program itself has exited.
    fn drains_finished(readers: [&PipeReader; 2], deadline: Option<Instant>) -> bool {
        let Some(deadline) = deadline else {
            return true;
        };
        loop {
            if readers.iter().all(|r| r.is_finished()) {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    /// Signal what is left of the group after its leader was reaped.
    fn terminate_stragglers(pid: u32, readers: [&PipeReader; 2]) {
        if let Err(e) = signal_group(pid, libc::SIGTERM) {
            warn!("Failed to send SIGTERM to process group {}: {}", pid, e);
        }
        let grace_deadline = Instant::now() + TERMINATE_GRACE;
        while Instant::now() < grace_deadline && !readers.iter().all(|r| r.is_finished()) {
            thread::sleep(POLL_INTERVAL);
        }
        let _ = signal_group(pid, libc::SIGKILL);
    }

    /// SIGTERM the group, then SIGKILL whatever is left after the grace period.
    fn terminate(&self, child: &mut Child) {
        let pid = child.id();
        if let Err(e) = signal_group(pid, libc::SIGTERM) {
            warn!("Failed to send SIGTERM to process group {}: {}", pid, e);
        }

        let grace_deadline = Instant::now() + TERMINATE_GRACE;
        while Instant::now() < grace_deadline {
            if let Ok(Some(_)) = child.try_wait() {
                break;
            }
            thread::sleep(POLL_INTERVAL);
        }

        // Reap stragglers in the group even if the leader already exited
        let _ = signal_group(pid, libc::SIGKILL);
        let _ = child.kill();
        let _ = child.wait();
    }
}

impl Invoker for ProcessInvoker {
    fn invoke(&mut self, invocation: &Invocation) -> Result<InvocationOutput, InvocationError> {
        let start = Instant::now();
        let mut child = self.spawn(invocation)?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let stdout_reader = thread::spawn(move || drain(stdout));
        let stderr_reader = thread::spawn(move || drain(stderr));

        let deadline = self.timeout.map(|t| start + t);
        let waited = self.wait(&mut child, deadline);
        let mut timed_out = !matches!(waited, Ok(Some(_)));
        if timed_out {
            self.terminate(&mut child);
        } else if !Self::drains_finished([&stdout_reader, &stderr_reader], deadline) {
            warn!(
                "{} exited but its output pipes are still open; terminating process group",
                invocation.program
            );
            Self::terminate_stragglers(child.id(), [&stdout_reader, &stderr_reader]);
            timed_out = true;
        }

        let stdout = stdout_reader
            .join()
            .unwrap_or_else(|_| Ok(String::new()))?;
        let stderr = stderr_reader
            .join()
            .unwrap_or_else(|_| Ok(String::new()))?;
        let wall_time = start.elapsed();

        let status = match waited? {
            Some(status) if !timed_out => status,
            // a deadline is always set when either wait gives up
            _ => return Err(InvocationError::Timeout(self.timeout.unwrap_or_default())),
        };

        if !status.success() {
            return Err(InvocationError::NonZeroExit {
                status: status.to_string(),
                stderr: stderr_tail(&stderr),
            });
        }

        if !stderr.trim().is_empty() {
            debug!(stderr = %stderr.trim_end(), "program wrote to stderr");
        }

        Ok(InvocationOutput {
            stdout,
            stderr,
            wall_time,
        })
    }
}
