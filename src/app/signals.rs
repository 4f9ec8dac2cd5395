//! Signal handling for graceful shutdown
//!
//! CTRL-C and SIGTERM cancel a shared token. The fetch loop races the token
//! against every request and retry wait, so an interrupted boot unit stops
//! promptly without writing an output file.

use tokio::signal;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Cancels a token when the process is asked to stop
pub struct SignalHandler {
    token: CancellationToken,
}

impl SignalHandler {
    /// Create a signal handler driving the given token
    pub fn new(token: CancellationToken) -> Self {
        Self { token }
    }

    /// Token cancelled on CTRL-C or SIGTERM
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Spawn the background task that waits for a signal
    ///
    /// The task ends on its own once the token is cancelled by anyone else.
    pub fn setup(&self) -> JoinHandle<()> {
        let token = self.token.clone();

        tokio::spawn(async move {
            let ctrl_c = async {
                if let Err(e) = signal::ctrl_c().await {
                    error!("Failed to install Ctrl+C handler: {}", e);
                    std::future::pending::<()>().await;
                }
            };

            #[cfg(unix)]
            let terminate = async {
                match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                    Ok(mut stream) => {
                        stream.recv().await;
                    }
                    Err(e) => {
                        error!("Failed to install SIGTERM handler: {}", e);
                        std::future::pending::<()>().await;
                    }
                }
            };

            #[cfg(not(unix))]
            let terminate = std::future::pending::<()>();

            tokio::select! {
                _ = ctrl_c => {
                    info!("Received Ctrl+C, cancelling fetch");
                },
                _ = terminate => {
                    info!("Received terminate signal, cancelling fetch");
                },
                _ = token.cancelled() => {
                    return;
                },
            }

            token.cancel();
        })
    }
}
