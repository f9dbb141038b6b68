//! Process-wide asynchronous notifications: child termination and interrupt.
//!
//! [`install`] is called once at startup. Both handlers only raise a flag.
//! The read loop calls [`reap_finished`] between lines, which collects every
//! terminated child whichever expression spawned it, and consumes interrupts
//! with [`take_interrupt`]. Nothing is waited on from inside a handler, so a
//! wait in progress elsewhere never loses its child.

use std::sync::atomic::{AtomicBool, Ordering};

static INTERRUPTED: AtomicBool = AtomicBool::new(false);
static CHILD_EXITED: AtomicBool = AtomicBool::new(false);

/// Returns whether an interrupt arrived since the last call, clearing the flag.
pub fn take_interrupt() -> bool {
    INTERRUPTED.swap(false, Ordering::SeqCst)
}

#[cfg(unix)]
pub use unix::{install, reap_finished};

#[cfg(not(unix))]
pub fn install() -> anyhow::Result<()> {
    Ok(())
}

#[cfg(not(unix))]
pub fn reap_finished() -> usize {
    CHILD_EXITED.store(false, Ordering::SeqCst);
    0
}

#[cfg(unix)]
mod unix {
    use super::{CHILD_EXITED, INTERRUPTED};
    use anyhow::{Context, Result};
    use nix::libc::c_int;
    use nix::sys::signal::{SaFlags, SigAction, SigHandler, SigSet, Signal, sigaction};
    use nix::sys::wait::{WaitPidFlag, WaitStatus, waitpid};
    use nix::unistd::Pid;
    use std::sync::atomic::Ordering;

    /// Registers the SIGCHLD and SIGINT notifiers.
    pub fn install() -> Result<()> {
        let flags = SaFlags::SA_RESTART | SaFlags::SA_NOCLDSTOP;
        let on_child = SigAction::new(SigHandler::Handler(note_child), flags, SigSet::empty());
        let on_interrupt =
            SigAction::new(SigHandler::Handler(note_interrupt), SaFlags::SA_RESTART, SigSet::empty());

        // SAFETY: both handlers only store to an atomic.
        unsafe {
            sigaction(Signal::SIGCHLD, &on_child).context("installing SIGCHLD handler")?;
            sigaction(Signal::SIGINT, &on_interrupt).context("installing SIGINT handler")?;
        }
        log::debug!("signal handlers installed");
        Ok(())
    }

    /// Collects every terminated child if SIGCHLD arrived since the last call.
    ///
    /// Must only run while no foreground wait is in progress. Returns the
    /// number of children collected.
    pub fn reap_finished() -> usize {
        if !CHILD_EXITED.swap(false, Ordering::SeqCst) {
            return 0;
        }
        let mut reaped = 0;
        // Several children may have exited behind a single signal.
        loop {
            match waitpid(Pid::from_raw(-1), Some(WaitPidFlag::WNOHANG)) {
                Ok(WaitStatus::StillAlive) | Err(_) => break,
                Ok(status) => {
                    log::debug!("reaped {:?}", status);
                    reaped += 1;
                }
            }
        }
        reaped
    }

    extern "C" fn note_child(_: c_int) {
        CHILD_EXITED.store(true, Ordering::SeqCst);
    }

    extern "C" fn note_interrupt(_: c_int) {
        INTERRUPTED.store(true, Ordering::SeqCst);
    }

}
