//! Shared helpers for end-to-end gateway tests

use bytes::Bytes;
use http::{HeaderValue, Request, Response};
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use subgate_lib::config::{parse, Config};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Upstream echoing the received path and query as the body
///
/// The received `Host` and `X-Forwarded-For` are returned as
/// `x-upstream-host` and `x-upstream-forwarded-for`.
pub async fn spawn_upstream() -> Result<SocketAddr, BoxError> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                let svc = service_fn(|req: Request<Incoming>| async move {
                    let pq = req
                        .uri()
                        .path_and_query()
                        .map(|pq| pq.as_str().to_string())
                        .unwrap_or_default();
                    let mut resp = Response::new(Full::new(Bytes::from(pq)));
                    for (from, to) in
                        [("host", "x-upstream-host"), ("x-forwarded-for", "x-upstream-forwarded-for")]
                    {
                        if let Some(v) = req.headers().get(from) {
                            resp.headers_mut().insert(to, v.clone());
                        }
                    }
                    resp.headers_mut()
                        .insert("x-frame-options", HeaderValue::from_static("ALLOWALL"));
                    Ok::<_, Infallible>(resp)
                });
                let _ = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), svc)
                    .await;
            });
        }
    });

    Ok(addr)
}

/// An address nothing listens on
pub async fn closed_port() -> Result<SocketAddr, BoxError> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(addr)
}

pub fn gateway_config(upstream: SocketAddr, extra: &str) -> Result<Config, BoxError> {
    Ok(parse(&format!(
        r#"
listen = "127.0.0.1:0"
upstream = "{upstream}"
{extra}
[gateway]
root_domain = "example.com"

[timeout]
upstream_ms = 2000
shutdown_secs = 1
"#
    ))?)
}

pub struct TestGateway {
    pub addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<subgate_lib::Result<()>>,
}

impl TestGateway {
    pub async fn start(config: Config) -> Result<Self, BoxError> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let (tx, rx) = oneshot::channel::<()>();

        let task = tokio::spawn(subgate_lib::serve(listener, Arc::new(config), async move {
            let _ = rx.await;
        }));

        Ok(Self { addr, shutdown: Some(tx), task })
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn stop(mut self) -> Result<(), BoxError> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.task.await??;
        Ok(())
    }
}

/// Client that reports redirects instead of following them
pub fn client() -> Result<reqwest::Client, BoxError> {
    Ok(reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()?)
}

pub const SECURITY_HEADERS: [&str; 7] = [
    "x-frame-options",
    "x-content-type-options",
    "x-xss-protection",
    "referrer-policy",
    "permissions-policy",
    "strict-transport-security",
    "content-security-policy",
];

pub fn assert_security_headers(resp: &reqwest::Response) {
    for name in SECURITY_HEADERS {
        assert!(resp.headers().contains_key(name), "missing {name} on {}", resp.status());
    }
}
