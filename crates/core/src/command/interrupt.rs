//! Keep Ctrl-C from killing the launcher while a child owns the terminal.
//!
//! The child still receives the signal from the terminal and exits; the
//! launcher keeps running so its temp directory guard is dropped normally.

/// Ignores SIGINT and SIGQUIT until dropped, then restores the previous
/// handlers. A no-op off Unix.
pub struct InterruptShield {
    #[cfg(unix)]
    previous: Vec<(nix::sys::signal::Signal, nix::sys::signal::SigHandler)>,
}

#[cfg(unix)]
impl InterruptShield {
    pub fn install() -> Self {
        use nix::sys::signal::{SigHandler, Signal, signal};

        let mut previous = Vec::new();
        for sig in [Signal::SIGINT, Signal::SIGQUIT] {
            // SAFETY: SigIgn installs no Rust code as a handler.
            match unsafe { signal(sig, SigHandler::SigIgn) } {
                Ok(old) => previous.push((sig, old)),
                Err(e) => tracing::warn!("Failed to ignore {sig}: {e}"),
            }
        }
        Self { previous }
    }
}

#[cfg(unix)]
impl Drop for InterruptShield {
    fn drop(&mut self) {
        use nix::sys::signal::signal;

        for (sig, handler) in self.previous.drain(..) {
            // SAFETY: restores the handler that was installed before.
            if let Err(e) = unsafe { signal(sig, handler) } {
                tracing::warn!("Failed to restore {sig} handler: {e}");
            }
        }
    }
}

#[cfg(not(unix))]
impl InterruptShield {
    pub fn install() -> Self {
        Self {}
    }
}
