//! Listener and accept loop

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use gotthard_engine::Database;
use tokio::net::TcpListener;
use tracing::{info, info_span, warn, Instrument};

use crate::config::ServerConfig;
use crate::connection::serve_connection;
use crate::error::Result;

/// A bound Gotthard server
pub struct Server {
    listener: TcpListener,
    db: Arc<Database>,
}

impl Server {
    /// Bind the configured listen address
    pub async fn bind(config: &ServerConfig, db: Arc<Database>) -> Result<Self> {
        let listener = TcpListener::bind(config.listen.as_str()).await?;
        info!(
            target: "gotthard::server",
            addr = %listener.local_addr()?,
            max_value_size = db.config().max_value_size,
            max_ops_per_txn = db.config().max_ops_per_txn,
            "Listening"
        );
        Ok(Server { listener, db })
    }

    /// Address actually bound (useful with port 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Database served by this server
    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }

    /// Accept connections forever
    pub async fn run(self) -> Result<()> {
        self.run_until(std::future::pending()).await
    }

    /// Accept connections until `shutdown` completes
    ///
    /// Connections already accepted keep being served by their own tasks.
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!(target: "gotthard::server", "Shutting down listener");
                    return Ok(());
                }
                accepted = self.listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(pair) => pair,
                        Err(e) => {
                            warn!(target: "gotthard::server", error = %e, "Accept failed");
                            continue;
                        }
                    };
                    if let Err(e) = stream.set_nodelay(true) {
                        warn!(target: "gotthard::server", %peer, error = %e, "Failed to set TCP_NODELAY");
                    }

                    let client_id = self.db.register_client();
                    let db = Arc::clone(&self.db);
                    let span = info_span!("connection", %peer, client_id = client_id.0);
                    tokio::spawn(
                        async move {
                            if let Err(e) = serve_connection(stream, client_id, db).await {
                                warn!(error = %e, "Connection closed with error");
                            }
                        }
                        .instrument(span),
                    );
                }
            }
        }
    }
}
