//! Builtin tools
//!
//! The closed set of capabilities the registry exposes: shell execution,
//! background process control, and packet capture.

mod capture;
mod daemon;
mod shell;

pub use capture::CaptureTool;
pub use daemon::DaemonTool;
pub use shell::ShellTool;

use tokio::process::Child;
use tracing::debug;

/// Ask a child process to terminate with SIGTERM
///
/// A delivery failure (typically ESRCH for an already-exited child) is not
/// an error; the caller collects the final status either way.
pub(crate) fn request_termination(child: &Child) {
    if let Some(pid) = child.id() {
        use nix::sys::signal::{Signal, kill};
        use nix::unistd::Pid;

        debug!(pid, "request_termination: sending SIGTERM");
        if let Err(e) = kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
            debug!(pid, error = %e, "request_termination: signal not delivered");
        }
    }
}
