//! Running a stage executable on one fixture.
//!
//! The child's stdout and stderr are drained on helper threads that hand
//! their buffers back over a channel. One deadline covers both the child's
//! exit and the draining of its pipes, so a descendant that keeps a pipe open
//! cannot hold a worker past the timeout. On unix the child leads its own
//! process group, and the whole group is killed when the deadline passes.

use std::ffi::OsString;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use crate::stage::Stage;

/// How often a running child is polled for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Exit code reported for a child terminated by a signal.
pub const SIGNAL_EXIT_CODE: i32 = -1;

/// What happened when the executable ran.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Still running, or still holding its output open, at the deadline.
    Timeout,
    /// The executable could not be started or waited on.
    LaunchFailure(String),
    /// Exited unsuccessfully.
    NonZeroExit { code: i32, stderr: String },
    /// Exited successfully with this stdout.
    Success(Vec<u8>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stream {
    Stdout,
    Stderr,
}

/// Runs one stage executable under a timeout.
#[derive(Clone, Debug)]
pub struct ProcessRunner {
    executable: PathBuf,
    timeout: Duration,
}

impl ProcessRunner {
    pub fn new(executable: impl Into<PathBuf>, timeout: Duration) -> Self {
        ProcessRunner {
            executable: executable.into(),
            timeout,
        }
    }

    /// Run the executable on `source` with the argument layout of `stage`.
    ///
    /// `output` is where running stages place the compiled program.
    pub fn run(&self, stage: Stage, source: &Path, output: &Path) -> Outcome {
        self.exec(&stage.arguments(source, output))
    }

    /// Run the executable with explicit arguments.
    pub fn exec(&self, args: &[OsString]) -> Outcome {
        tracing::debug!(
            executable = %self.executable.display(),
            ?args,
            "spawning"
        );

        let mut command = Command::new(&self.executable);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        #[cfg(unix)]
        std::os::unix::process::CommandExt::process_group(&mut command, 0);

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                return Outcome::LaunchFailure(format!(
                    "cannot run {}: {e}",
                    self.executable.display()
                ));
            }
        };

        let start = Instant::now();
        let deadline = start + self.timeout;
        let (tx, rx) = mpsc::channel();
        let mut pending = 0;
        if let Some(pipe) = child.stdout.take() {
            spawn_reader(Stream::Stdout, pipe, tx.clone());
            pending += 1;
        }
        if let Some(pipe) = child.stderr.take() {
            spawn_reader(Stream::Stderr, pipe, tx.clone());
            pending += 1;
        }
        drop(tx);

        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if Instant::now() >= deadline => {
                    self.terminate(&mut child);
                    return Outcome::Timeout;
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    self.terminate(&mut child);
                    return Outcome::LaunchFailure(format!(
                        "cannot wait for {}: {e}",
                        self.executable.display()
                    ));
                }
            }
        };

        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        for _ in 0..pending {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match rx.recv_timeout(remaining) {
                Ok((Stream::Stdout, buf)) => stdout = buf,
                Ok((Stream::Stderr, buf)) => stderr = buf,
                Err(RecvTimeoutError::Timeout) => {
                    // The child is gone but a descendant still holds a pipe.
                    tracing::debug!(
                        executable = %self.executable.display(),
                        "output still open at deadline"
                    );
                    kill_group(&child);
                    return Outcome::Timeout;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        tracing::debug!(
            executable = %self.executable.display(),
            code = ?status.code(),
            elapsed = ?start.elapsed(),
            "exited"
        );

        if status.success() {
            Outcome::Success(stdout)
        } else {
            Outcome::NonZeroExit {
                code: status.code().unwrap_or(SIGNAL_EXIT_CODE),
                stderr: String::from_utf8_lossy(&stderr).into_owned(),
            }
        }
    }

    /// Kill a still-running child and everything it spawned, then reap it.
    fn terminate(&self, child: &mut Child) {
        kill_group(child);
        if let Err(e) = child.kill() {
            tracing::warn!("failed to kill {}: {e}", self.executable.display());
        }
        if let Err(e) = child.wait() {
            tracing::warn!("failed to reap {}: {e}", self.executable.display());
        }
    }
}

/// SIGKILL the process group led by `child`.
#[cfg(unix)]
#[allow(unsafe_code, reason = "signalling a process group needs libc")]
fn kill_group(child: &Child) {
    let Ok(pgid) = libc::pid_t::try_from(child.id()) else {
        return;
    };
    // SAFETY: kill takes plain integers and touches no memory. The negated id
    // addresses the group created for this child at spawn.
    if unsafe { libc::kill(-pgid, libc::SIGKILL) } != 0 {
        tracing::debug!(
            "process group {pgid} already gone: {}",
            std::io::Error::last_os_error()
        );
    }
}

#[cfg(not(unix))]
fn kill_group(_child: &Child) {}

fn spawn_reader(
    stream: Stream,
    mut pipe: impl Read + Send + 'static,
    tx: Sender<(Stream, Vec<u8>)>,
) {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Err(e) = pipe.read_to_end(&mut buf) {
            tracing::debug!("output pipe closed early: {e}");
        }
        // The receiver is gone once the run has timed out.
        let _ = tx.send((stream, buf));
    });
}
