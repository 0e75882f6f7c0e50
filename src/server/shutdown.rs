//! Cooperative shutdown for the accept loop.
//!
//! The flag only ever goes from "running" to "requested". The loop polls it
//! between connections, so a connection being handled always finishes.

use tokio::sync::watch;

/// Sets the shutdown flag. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ShutdownTrigger {
    tx: watch::Sender<bool>,
}

/// Observes the shutdown flag.
#[derive(Debug, Clone)]
pub struct Shutdown {
    rx: watch::Receiver<bool>,
}

impl Shutdown {
    pub fn new() -> (ShutdownTrigger, Shutdown) {
        let (tx, rx) = watch::channel(false);
        (ShutdownTrigger { tx }, Shutdown { rx })
    }

    pub fn is_requested(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once shutdown has been requested.
    ///
    /// Never resolves if every trigger is dropped without firing.
    pub async fn requested(&mut self) {
        if self.rx.wait_for(|requested| *requested).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

impl ShutdownTrigger {
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }
}

/// Fires `trigger` on the first Ctrl-C received by the process.
pub fn spawn_ctrl_c(trigger: ShutdownTrigger) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Server shutting down...");
                trigger.trigger();
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install Ctrl-C handler");
            }
        }
    })
}
