use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::Config;
use crate::http::connection::Connection;
use crate::server::slots::ConnectionSlots;

/// Delay before retrying when every connection slot is taken.
const REFUSAL_BACKOFF: Duration = Duration::from_secs(1);

/// Bound listener plus admission state.
///
/// Split from the accept loop so tests can bind to an ephemeral port and
/// learn the actual address before serving.
pub struct Server {
    listener: TcpListener,
    cfg: Arc<Config>,
    slots: ConnectionSlots,
}

/// Binds and serves until the task is cancelled.
pub async fn run(cfg: Config) -> anyhow::Result<()> {
    Server::bind(cfg).await?.serve().await
}

impl Server {
    pub async fn bind(cfg: Config) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(&cfg.server.listen_addr)
            .await
            .with_context(|| format!("failed to bind {}", cfg.server.listen_addr))?;
        info!("Listening on {}", cfg.server.listen_addr);

        let slots = ConnectionSlots::new(cfg.server.max_connections);

        Ok(Self {
            listener,
            cfg: Arc::new(cfg),
            slots,
        })
    }

    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept loop: reserve a slot, accept, hand the connection to its own
    /// task. The acceptor never touches connection bytes after handoff.
    pub async fn serve(self) -> anyhow::Result<()> {
        loop {
            let Some(slot) = self.slots.try_reserve() else {
                tracing::warn!(
                    capacity = self.slots.capacity(),
                    "Too many connections; refusing new clients"
                );
                tokio::time::sleep(REFUSAL_BACKOFF).await;
                continue;
            };

            let (socket, peer) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to accept client connection");
                    continue;
                }
            };
            info!("Accepted connection from {}", peer);

            let cfg = Arc::clone(&self.cfg);
            tokio::spawn(async move {
                Connection::new(socket, cfg).run().await;
                // Slot is freed when the task finishes
                drop(slot);
            });
        }
    }
}
