use std::future::Future;
use std::sync::Arc;

use hyper::body::Incoming;
use hyper::Request;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::time::Duration;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{GatewayError, Result};
use crate::proxy::connection::ConnectionManager;
use crate::proxy::context::ProxyContext;
use crate::proxy::handler::handle_request;

/// Bind the configured address and serve until SIGTERM or SIGINT
pub async fn run(config: Arc<Config>) -> Result<()> {
    let listener = TcpListener::bind(config.listen).await?;

    let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate()).map_err(|e| {
        GatewayError::Io(std::io::Error::other(format!("Failed to setup SIGTERM handler: {e}")))
    })?;
    let mut sigint = signal::unix::signal(signal::unix::SignalKind::interrupt()).map_err(|e| {
        GatewayError::Io(std::io::Error::other(format!("Failed to setup SIGINT handler: {e}")))
    })?;

    let shutdown = async move {
        tokio::select! {
            _ = sigterm.recv() => info!("Received SIGTERM, initiating graceful shutdown"),
            _ = sigint.recv() => info!("Received SIGINT, initiating graceful shutdown"),
        }
    };

    serve(listener, config, shutdown).await
}

/// Serve HTTP/1.1 and HTTP/2 on `listener` until `shutdown` resolves
///
/// After shutdown no new connections are accepted; active ones get up to
/// `timeout.shutdown_secs` to finish before the rate limiter sweeper is closed.
pub async fn serve<F>(listener: TcpListener, config: Arc<Config>, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send,
{
    let ctx = Arc::new(ProxyContext::new(config.clone())?);
    let sweeper = ctx.rate_limiter.as_ref().map(|limiter| limiter.spawn_sweeper());
    let connections = Arc::new(ConnectionManager::new(config.security.max_connections));
    let builder = ConnBuilder::new(TokioExecutor::new());

    let addr = listener.local_addr()?;
    info!(
        %addr,
        upstream = %ctx.upstream,
        environment = ?config.environment,
        "starting gateway (h1/h2)"
    );

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            result = listener.accept() => {
                let (stream, peer) = match result {
                    Ok((stream, peer)) => (stream, peer),
                    Err(e) => {
                        warn!(error = %e, "accept error");
                        continue;
                    }
                };

                let guard = match connections.try_accept(peer) {
                    Ok(guard) => guard,
                    Err(e) => {
                        debug!(?peer, error = %e, "Rejecting connection");
                        drop(stream);
                        continue;
                    }
                };

                let builder = builder.clone();
                let ctx = ctx.clone();

                tokio::spawn(async move {
                    // Ensure counter is decremented when connection finishes
                    let _guard = guard;

                    let svc = hyper::service::service_fn(move |req: Request<Incoming>| {
                        let ctx = ctx.clone();
                        async move { Ok::<_, hyper::Error>(handle_request(req, peer, &ctx).await) }
                    });

                    if let Err(e) = builder.serve_connection(TokioIo::new(stream), svc).await {
                        debug!(?peer, error = %e, "serve_connection error");
                    }
                });
            }
        }
    }

    connections.begin_shutdown();
    drop(listener);
    wait_for_connections(&connections, Duration::from_secs(config.timeout.shutdown_secs)).await;

    if let Some(limiter) = &ctx.rate_limiter {
        limiter.close();
    }
    if let Some(sweeper) = sweeper {
        sweeper.shutdown().await;
    }

    info!("Gateway stopped");
    Ok(())
}

async fn wait_for_connections(connections: &ConnectionManager, timeout: Duration) {
    let mut closed = connections.subscribe_closed();
    let active = connections.active();
    if active == 0 {
        info!("All connections closed, shutdown complete");
        return;
    }

    info!(
        active_connections = active,
        "Waiting for active connections to finish (timeout: {}s)",
        timeout.as_secs()
    );

    let drained = async {
        while connections.active() > 0 {
            if closed.changed().await.is_err() {
                break;
            }
        }
    };

    match tokio::time::timeout(timeout, drained).await {
        Ok(()) => info!("All connections closed, shutdown complete"),
        Err(_) => warn!(
            active_connections = connections.active(),
            "Shutdown timeout reached, connections still active"
        ),
    }
}
