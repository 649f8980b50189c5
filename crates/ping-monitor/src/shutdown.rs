//! Cooperative shutdown.
//!
//! A [`ShutdownToken`] flips from running to stopped exactly once. Signal
//! handlers only trigger it; the scheduler observes it before each cycle
//! and races it against probes and the inter-cycle sleep.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Write-once cancellation flag shared between signal handling and the loop.
#[derive(Debug, Clone)]
pub struct ShutdownToken {
    tx: Arc<watch::Sender<bool>>,
}

impl ShutdownToken {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Request shutdown. Returns `true` only for the first call.
    pub fn trigger(&self) -> bool {
        self.tx.send_if_modified(|stopped| {
            if *stopped {
                false
            } else {
                *stopped = true;
                true
            }
        })
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once shutdown has been requested (immediately if it already was).
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        let _ = rx.wait_for(|stopped| *stopped).await;
    }
}

impl Default for ShutdownToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Trigger `token` on SIGTERM, SIGHUP or SIGINT (Ctrl-C elsewhere).
///
/// Handlers are installed before this returns, so a signal delivered
/// before the listener task first runs is still caught. The listener keeps
/// running after the first signal so later signals are absorbed instead of
/// killing the process mid-write.
pub fn spawn_signal_listener(token: ShutdownToken) -> std::io::Result<JoinHandle<()>> {
    let mut signals = Signals::install()?;
    Ok(tokio::spawn(async move {
        loop {
            let Some(name) = signals.recv().await else {
                debug!("signal stream closed");
                return;
            };
            if token.trigger() {
                info!(signal = name, "shutdown signal received");
            } else {
                debug!(signal = name, "already shutting down");
            }
        }
    }))
}

#[cfg(unix)]
struct Signals {
    term: tokio::signal::unix::Signal,
    hup: tokio::signal::unix::Signal,
    int: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl Signals {
    fn install() -> std::io::Result<Self> {
        use tokio::signal::unix::{SignalKind, signal};

        Ok(Self {
            term: signal(SignalKind::terminate())?,
            hup: signal(SignalKind::hangup())?,
            int: signal(SignalKind::interrupt())?,
        })
    }

    async fn recv(&mut self) -> Option<&'static str> {
        tokio::select! {
            s = self.term.recv() => s.map(|_| "SIGTERM"),
            s = self.hup.recv() => s.map(|_| "SIGHUP"),
            s = self.int.recv() => s.map(|_| "SIGINT"),
        }
    }
}

#[cfg(windows)]
struct Signals {
    ctrl_c: tokio::signal::windows::CtrlC,
}

#[cfg(windows)]
impl Signals {
    fn install() -> std::io::Result<Self> {
        Ok(Self {
            ctrl_c: tokio::signal::windows::ctrl_c()?,
        })
    }

    async fn recv(&mut self) -> Option<&'static str> {
        self.ctrl_c.recv().await.map(|_| "ctrl-c")
    }
}
