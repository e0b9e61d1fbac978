use hyper::body::Incoming;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use std::sync::Arc;
use std::time::Duration;

use crate::config::TimeoutConfig;

pub type HttpClient = Client<HttpConnector, Incoming>;

/// Idle pooled connections are dropped after this long
const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

/// Shared HTTP client for upstream connections
///
/// One pooled HTTP/1.1 client reused by every request, so pass-through and
/// rewritten requests do not pay a TCP handshake each time.
#[derive(Clone)]
pub struct ClientPool {
    client: Arc<HttpClient>,
}

impl ClientPool {
    pub fn new(timeout: &TimeoutConfig) -> Self {
        let mut connector = HttpConnector::new();
        // TCP keep-alive for idle pooled connections
        if timeout.keep_alive_secs > 0 {
            connector.set_keepalive(Some(Duration::from_secs(timeout.keep_alive_secs)));
        } else {
            connector.set_keepalive(None);
        }
        connector.set_nodelay(true);

        let mut builder = Client::builder(TokioExecutor::new());
        builder.pool_idle_timeout(POOL_IDLE_TIMEOUT);

        Self { client: Arc::new(builder.build(connector)) }
    }

    pub fn client(&self) -> &HttpClient {
        &self.client
    }
}
