//! External tool execution
//!
//! `packer` and `pcluster` run in the foreground with inherited stdio. A
//! Ctrl-C from the user is forwarded to the child as SIGINT so the tool can
//! clean up the cloud resources it created, and the child's status is still
//! collected.

use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::{VawsError, VawsResult};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Fail fast with a missing-prerequisite error if `command` is not installed.
pub fn ensure_command_exists(command: &str) -> VawsResult<PathBuf> {
    which::which(command).map_err(|_| VawsError::MissingCommand {
        command: command.to_string(),
    })
}

/// Cooperative interrupt flag shared with the Ctrl-C handler
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    flag: Arc<AtomicBool>,
}

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route Ctrl-C to this flag. Can be installed once per process.
    pub fn install_ctrlc(&self) -> VawsResult<()> {
        let flag = self.flag.clone();
        ctrlc::set_handler(move || {
            flag.store(true, Ordering::SeqCst);
        })
        .map_err(|e| VawsError::Io(std::io::Error::other(e.to_string())))
    }

    pub fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// How a child process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed(ExitStatus),
    /// The user interrupted the run; the child was signalled and reaped
    Interrupted(ExitStatus),
}

impl RunOutcome {
    pub fn status(&self) -> ExitStatus {
        match self {
            RunOutcome::Completed(s) | RunOutcome::Interrupted(s) => *s,
        }
    }

    pub fn was_interrupted(&self) -> bool {
        matches!(self, RunOutcome::Interrupted(_))
    }
}

/// Spawn `cmd` and wait for it, forwarding `interrupt` to the child.
pub fn run_interruptible(cmd: &mut Command, interrupt: &Interrupt) -> VawsResult<RunOutcome> {
    let program = cmd.get_program().to_string_lossy().into_owned();
    debug!(command = %program, args = ?cmd.get_args().collect::<Vec<_>>(), "spawning");

    let mut child = cmd.spawn()?;
    wait_interruptible(&mut child, &program, interrupt)
}

/// Wait for a spawned child, forwarding `interrupt` to it.
///
/// A child that exits after the flag is raised, or that dies of SIGINT while
/// the handler is still catching up, counts as interrupted.
pub fn wait_interruptible(
    child: &mut Child,
    program: &str,
    interrupt: &Interrupt,
) -> VawsResult<RunOutcome> {
    let mut signalled = false;

    loop {
        if let Some(status) = child.try_wait()? {
            // A terminal Ctrl-C reaches the child and us together, so the
            // child may exit before the handler has set the flag.
            if !signalled && !interrupt.is_set() && was_interrupted_by_signal(&status) {
                std::thread::sleep(POLL_INTERVAL);
            }
            return Ok(if signalled || interrupt.is_set() {
                info!(command = %program, %status, "interrupted process exited");
                RunOutcome::Interrupted(status)
            } else {
                RunOutcome::Completed(status)
            });
        }

        if interrupt.is_set() && !signalled {
            info!(command = %program, pid = child.id(), "interrupting the process");
            send_interrupt(child);
            signalled = true;
        }

        std::thread::sleep(POLL_INTERVAL);
    }
}

/// Ask the child to stop. On Unix this is SIGINT, matching a terminal Ctrl-C.
#[cfg(unix)]
fn send_interrupt(child: &mut Child) {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    if let Err(e) = kill(Pid::from_raw(child.id() as i32), Signal::SIGINT) {
        warn!(pid = child.id(), error = %e, "could not deliver SIGINT");
    }
}

#[cfg(not(unix))]
fn send_interrupt(child: &mut Child) {
    if let Err(e) = child.kill() {
        warn!(pid = child.id(), error = %e, "could not stop the process");
    }
}

#[cfg(unix)]
fn was_interrupted_by_signal(status: &ExitStatus) -> bool {
    use std::os::unix::process::ExitStatusExt;
    status.signal() == Some(nix::sys::signal::Signal::SIGINT as i32)
}

#[cfg(not(unix))]
fn was_interrupted_by_signal(_status: &ExitStatus) -> bool {
    false
}
