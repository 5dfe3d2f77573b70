//! TCP transport: request/reply client and a task-per-connection server.
//!
//! Both sides run `Framed` streams over [`PacketCodec`], so framing and
//! registry lookups happen in one place. The server hands every decoded
//! packet to a [`Dispatcher`] and writes the handler's reply back on the
//! same connection.

use std::sync::Arc;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, Mutex};
use tokio_util::codec::Framed;
use tracing::{debug, error, info, instrument, warn};

use crate::config::{ClientConfig, ServerConfig};
use crate::core::{Packet, PacketCodec, Registry};
use crate::error::{ProtocolError, Result};
use crate::protocol::Dispatcher;
use crate::utils::metrics::global_metrics;

/// How long the server waits for open connections to drain on shutdown.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Open a framed connection to a peer.
pub async fn connect(addr: &str, registry: Arc<Registry>) -> Result<Framed<TcpStream, PacketCodec>> {
    let stream = TcpStream::connect(addr).await?;
    Ok(Framed::new(stream, PacketCodec::new(registry)))
}

/// One-shot request/reply client.
///
/// Each [`Client::send`] opens a fresh connection, writes a single packet,
/// waits for one reply and closes — there is no connection pooling.
#[derive(Debug, Clone)]
pub struct Client {
    address: String,
    registry: Arc<Registry>,
    response_timeout: Duration,
}

impl Client {
    pub fn new(address: impl Into<String>, registry: Arc<Registry>) -> Self {
        Self {
            address: address.into(),
            registry,
            response_timeout: Duration::from_secs(5),
        }
    }

    pub fn from_config(config: &ClientConfig, registry: Arc<Registry>) -> Self {
        Self {
            address: config.address.clone(),
            registry,
            response_timeout: config.response_timeout,
        }
    }

    pub fn response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }

    /// Send one packet and wait for the peer's reply.
    ///
    /// `Ok(None)` means the peer answered with bytes this registry cannot
    /// decode; I/O failures, closed connections and timeouts are errors.
    #[instrument(skip(self, packet), fields(peer = %self.address))]
    pub async fn send(&self, packet: Packet) -> Result<Option<Packet>> {
        let mut framed = connect(&self.address, Arc::clone(&self.registry)).await?;

        framed.send(packet).await?;
        global_metrics().packet_sent();

        let reply = tokio::time::timeout(self.response_timeout, framed.next())
            .await
            .map_err(|_| ProtocolError::Timeout)?;

        match reply {
            Some(Ok(packet)) => {
                global_metrics().packet_received();
                Ok(Some(packet))
            }
            Some(Err(ProtocolError::DecodeFailed)) => {
                global_metrics().decode_failure();
                debug!("reply could not be decoded against the registry");
                Ok(None)
            }
            Some(Err(e)) => Err(e),
            None => Err(ProtocolError::ConnectionClosed),
        }
    }
}

/// Serve until ctrl-c.
#[instrument(skip(config, registry, dispatcher), fields(address = %config.address))]
pub async fn serve(
    config: &ServerConfig,
    registry: Arc<Registry>,
    dispatcher: Arc<Dispatcher>,
) -> Result<()> {
    let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);

    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            info!("Received CTRL+C signal, shutting down");
            let _ = shutdown_tx.send(()).await;
        }
    });

    serve_with_shutdown(config, registry, dispatcher, shutdown_rx).await
}

/// Serve with an external shutdown channel.
#[instrument(skip(config, registry, dispatcher, shutdown_rx), fields(address = %config.address))]
pub async fn serve_with_shutdown(
    config: &ServerConfig,
    registry: Arc<Registry>,
    dispatcher: Arc<Dispatcher>,
    shutdown_rx: mpsc::Receiver<()>,
) -> Result<()> {
    let listener = TcpListener::bind(&config.address).await?;
    serve_on(
        listener,
        registry,
        dispatcher,
        shutdown_rx,
        config.max_connections,
    )
    .await
}

/// Serve on an already-bound listener.
///
/// Useful when the caller needs the ephemeral port before the loop starts.
pub async fn serve_on(
    listener: TcpListener,
    registry: Arc<Registry>,
    dispatcher: Arc<Dispatcher>,
    mut shutdown_rx: mpsc::Receiver<()>,
    max_connections: usize,
) -> Result<()> {
    info!(address = %listener.local_addr()?, "Listening");

    // Track active connections so shutdown can drain them.
    let active_connections = Arc::new(Mutex::new(0u32));

    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => {
                info!("Shutting down server. Waiting for connections to close...");

                let timeout = tokio::time::sleep(SHUTDOWN_GRACE);
                tokio::pin!(timeout);

                loop {
                    tokio::select! {
                        _ = &mut timeout => {
                            warn!("Shutdown timeout reached, forcing exit");
                            break;
                        }
                        _ = tokio::time::sleep(Duration::from_millis(100)) => {
                            let connections = *active_connections.lock().await;
                            if connections == 0 {
                                info!("All connections closed, shutting down");
                                break;
                            }
                            debug!(connections, "Waiting for connections to close");
                        }
                    }
                }

                return Ok(());
            }

            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer)) => {
                        {
                            let mut count = active_connections.lock().await;
                            if *count as usize >= max_connections {
                                warn!(peer = %peer, max_connections, "Connection limit reached, refusing");
                                drop(stream);
                                continue;
                            }
                            *count += 1;
                        }

                        debug!(peer = %peer, "New connection established");
                        global_metrics().connection_established();

                        let registry = Arc::clone(&registry);
                        let dispatcher = Arc::clone(&dispatcher);
                        let active_connections = Arc::clone(&active_connections);

                        tokio::spawn(async move {
                            handle_connection(stream, registry, dispatcher).await;

                            let mut count = active_connections.lock().await;
                            *count -= 1;
                            global_metrics().connection_closed();
                            debug!(peer = %peer, "Connection closed");
                        });
                    }
                    Err(e) => {
                        global_metrics().connection_error();
                        error!(error = %e, "Error accepting connection");
                    }
                }
            }
        }
    }
}

async fn handle_connection(
    stream: TcpStream,
    registry: Arc<Registry>,
    dispatcher: Arc<Dispatcher>,
) {
    let mut framed = Framed::new(stream, PacketCodec::new(registry));

    while let Some(next) = framed.next().await {
        match next {
            Ok(packet) => {
                global_metrics().packet_received();
                let reply = match dispatcher.dispatch(&packet) {
                    Ok(reply) => reply,
                    Err(e) => {
                        warn!(error = %e, "Dispatch failed, closing connection");
                        break;
                    }
                };
                if let Err(e) = framed.send(reply).await {
                    warn!(error = %e, "Failed to write reply");
                    break;
                }
                global_metrics().packet_sent();
            }
            Err(ProtocolError::DecodeFailed) => {
                // one bad frame does not have to kill the connection
                global_metrics().decode_failure();
                warn!("Dropping undecodable packet");
            }
            Err(e) => {
                warn!(error = %e, "Connection error");
                break;
            }
        }
    }
}
