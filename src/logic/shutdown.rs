//! Cooperative shutdown: a shared flag set from a signal-listening task and
//! polled by the monitor loop between passes and between sleep slices.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct ShutdownFlag {
    requested: Arc<AtomicBool>,
}

impl ShutdownFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if this call was the one that flipped the flag.
    pub fn request(&self) -> bool {
        !self.requested.swap(true, Ordering::SeqCst)
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }
}

/// Route SIGHUP, SIGINT, SIGQUIT, SIGTERM and SIGXFSZ to `flag`.
///
/// Handlers are registered before this returns; the listening task lives
/// for the rest of the process so repeated signals are absorbed instead of
/// falling back to the default (terminating) disposition.
#[cfg(unix)]
pub fn install_signal_handlers(flag: ShutdownFlag) -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut hangup = signal(SignalKind::hangup())?;
    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut quit = signal(SignalKind::quit())?;
    let mut terminate = signal(SignalKind::terminate())?;
    let mut file_size = signal(SignalKind::from_raw(libc::SIGXFSZ))?;

    tokio::spawn(async move {
        loop {
            let name = tokio::select! {
                _ = hangup.recv() => "SIGHUP",
                _ = interrupt.recv() => "SIGINT",
                _ = quit.recv() => "SIGQUIT",
                _ = terminate.recv() => "SIGTERM",
                _ = file_size.recv() => "SIGXFSZ",
            };
            record(&flag, name);
        }
    });

    Ok(())
}

#[cfg(not(unix))]
pub fn install_signal_handlers(flag: ShutdownFlag) -> std::io::Result<()> {
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            record(&flag, "Ctrl-C");
        }
    });

    Ok(())
}

fn record(flag: &ShutdownFlag, signal: &str) {
    if flag.request() {
        tracing::info!(signal, "Shutdown requested, running final pass");
    } else {
        tracing::info!(signal, "Shutdown already in progress");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_is_shared_between_clones() {
        let flag = ShutdownFlag::new();
        let handle = flag.clone();
        assert!(!flag.is_requested());

        assert!(handle.request());
        assert!(flag.is_requested());
    }

    #[test]
    fn second_request_is_not_the_first() {
        let flag = ShutdownFlag::new();
        assert!(flag.request());
        assert!(!flag.request());
        assert!(flag.is_requested());
    }

    #[test]
    fn record_sets_flag() {
        let flag = ShutdownFlag::new();
        record(&flag, "SIGTERM");
        record(&flag, "SIGINT");
        assert!(flag.is_requested());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn handlers_install_inside_runtime() {
        let flag = ShutdownFlag::new();
        install_signal_handlers(flag.clone()).unwrap();
        assert!(!flag.is_requested());
    }
}
