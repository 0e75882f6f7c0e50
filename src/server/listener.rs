use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;
use tokio::net::{TcpListener, TcpSocket};
use tracing::{error, info, warn};

use crate::config::ServerSettings;
use crate::http::connection::{Connection, Outcome};
use crate::server::shutdown::Shutdown;

const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// Socket setup failures. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to create socket: {0}")]
    Create(#[source] std::io::Error),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to listen on {addr}: {source}")]
    Listen {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

/// Connection counts reported when the loop stops.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ServeStats {
    pub accepted: u64,
    pub responded: u64,
    pub failed: u64,
}

pub struct Server {
    listener: TcpListener,
    max_request_bytes: usize,
}

impl Server {
    /// Creates, binds and listens on the configured address.
    pub fn bind(settings: &ServerSettings) -> Result<Self, ServerError> {
        let addr = settings.addr;

        let socket = match addr {
            SocketAddr::V4(_) => TcpSocket::new_v4(),
            SocketAddr::V6(_) => TcpSocket::new_v6(),
        }
        .map_err(ServerError::Create)?;

        socket
            .bind(addr)
            .map_err(|source| ServerError::Bind { addr, source })?;

        let listener = socket
            .listen(settings.backlog)
            .map_err(|source| ServerError::Listen { addr, source })?;

        Ok(Self {
            listener,
            max_request_bytes: settings.max_request_bytes,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves connections one at a time until `shutdown` is requested.
    ///
    /// The flag is checked before each accept. A pending accept is abandoned
    /// when shutdown arrives, but a connection already accepted is always
    /// handled to the end. The listening socket closes when this returns.
    pub async fn run(self, mut shutdown: Shutdown) -> ServeStats {
        let mut stats = ServeStats::default();

        if let Ok(addr) = self.local_addr() {
            info!("Listening on {}", addr);
        }

        while !shutdown.is_requested() {
            let accepted = tokio::select! {
                res = self.listener.accept() => res,
                _ = shutdown.requested() => break,
            };

            let (socket, peer) = match accepted {
                Ok(pair) => pair,
                Err(e) => {
                    error!(error = %e, "accept failed");
                    // avoid spinning on persistent errors such as EMFILE
                    tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
                    continue;
                }
            };

            stats.accepted += 1;
            info!("Accepted connection from {}", peer);

            let conn = Connection::with_buffer_size(socket, self.max_request_bytes);
            match conn.run().await {
                Ok(Outcome::Responded(status)) => {
                    stats.responded += 1;
                    if status.is_success() {
                        info!(%peer, status = status.as_u16(), "response sent");
                    } else {
                        warn!(%peer, status = status.as_u16(), "request rejected");
                    }
                }
                Ok(Outcome::NoRequest) => {
                    info!(%peer, "connection closed before a request arrived");
                }
                Err(e) => {
                    stats.failed += 1;
                    error!("Connection error from {}: {}", peer, e);
                }
            }
        }

        info!(
            accepted = stats.accepted,
            responded = stats.responded,
            failed = stats.failed,
            "server stopped"
        );

        stats
    }
}
