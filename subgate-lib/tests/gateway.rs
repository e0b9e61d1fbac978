//! End-to-end tests: reqwest client -> gateway -> in-process upstream

mod helpers;

use helpers::{
    assert_security_headers, client, closed_port, gateway_config, spawn_upstream, BoxError,
    TestGateway,
};

type TestResult = Result<(), BoxError>;

fn header<'a>(resp: &'a reqwest::Response, name: &str) -> Option<&'a str> {
    resp.headers().get(name).and_then(|v| v.to_str().ok())
}

#[tokio::test]
async fn test_root_request_passes_through_with_security_headers() -> TestResult {
    let upstream = spawn_upstream().await?;
    let gateway = TestGateway::start(gateway_config(upstream, "")?).await?;

    let resp = client()?
        .get(gateway.url("/pricing?plan=pro"))
        .header("host", "example.com")
        .send()
        .await?;

    assert_eq!(resp.status(), 200);
    assert_security_headers(&resp);
    // upstream value is overwritten
    assert_eq!(header(&resp, "x-frame-options"), Some("DENY"));
    assert_eq!(header(&resp, "x-upstream-host"), Some("example.com"));
    assert!(header(&resp, "x-gateway-subdomain").is_none());
    assert_eq!(resp.text().await?, "/pricing?plan=pro");

    gateway.stop().await
}

#[tokio::test]
async fn test_authenticated_subdomain_is_rewritten() -> TestResult {
    let upstream = spawn_upstream().await?;
    let gateway = TestGateway::start(gateway_config(upstream, "")?).await?;

    let resp = client()?
        .get(gateway.url("/dashboard?tab=usage"))
        .header("host", "provider.example.com")
        .header("cookie", "theme=dark; auth-token=abc")
        .send()
        .await?;

    assert_eq!(resp.status(), 200);
    assert_eq!(header(&resp, "x-upstream-host"), Some("provider.example.com"));
    assert_eq!(header(&resp, "x-upstream-forwarded-for"), Some("127.0.0.1"));
    assert_eq!(resp.text().await?, "/provider/dashboard?tab=usage");

    gateway.stop().await
}

#[tokio::test]
async fn test_anonymous_wallet_request_redirects_to_login() -> TestResult {
    let upstream = spawn_upstream().await?;
    let gateway = TestGateway::start(gateway_config(upstream, "")?).await?;

    let resp = client()?
        .get(gateway.url("/dashboard"))
        .header("host", "wallet.example.com")
        .send()
        .await?;

    assert_eq!(resp.status(), 307);
    assert_security_headers(&resp);
    let location = url::Url::parse(header(&resp, "location").unwrap_or_default())?;
    assert_eq!(location.host_str(), Some("auth.example.com"));
    assert_eq!(location.path(), "/login");
    let redirect = location
        .query_pairs()
        .find(|(k, _)| k == "redirect")
        .map(|(_, v)| v.into_owned());
    assert_eq!(redirect.as_deref(), Some("https://wallet.example.com/dashboard"));

    gateway.stop().await
}

#[tokio::test]
async fn test_signed_in_login_redirect_is_sent_normalized() -> TestResult {
    let upstream = spawn_upstream().await?;
    let gateway = TestGateway::start(gateway_config(upstream, "")?).await?;
    let client = client()?;

    let cases = [
        ("https%3A%2F%2Fmyaccount.example.com%2F%0Ax", "https://myaccount.example.com/x"),
        ("https%3A%2F%2Fmyaccount.example.com%2F%C3%A9", "https://myaccount.example.com/%C3%A9"),
    ];
    for (target, expected) in cases {
        let resp = client
            .get(gateway.url(&format!("/login?redirect={target}")))
            .header("host", "auth.example.com")
            .header("cookie", "auth-token=abc")
            .send()
            .await?;

        assert_eq!(resp.status(), 307);
        assert_eq!(header(&resp, "location"), Some(expected));
        assert_security_headers(&resp);
    }

    gateway.stop().await
}

#[tokio::test]
async fn test_www_redirects_permanently_to_root() -> TestResult {
    let upstream = spawn_upstream().await?;
    let gateway = TestGateway::start(gateway_config(upstream, "")?).await?;

    let resp = client()?
        .get(gateway.url("/blog/post?id=4"))
        .header("host", "www.example.com")
        .header("x-forwarded-proto", "http")
        .send()
        .await?;

    assert_eq!(resp.status(), 301);
    assert_eq!(header(&resp, "location"), Some("http://example.com/blog/post?id=4"));
    assert_security_headers(&resp);

    gateway.stop().await
}

#[tokio::test]
async fn test_rate_limit_blocks_with_retry_after() -> TestResult {
    let upstream = spawn_upstream().await?;
    let extra = r#"
[security.rate_limit]
max_requests = 3
window_seconds = 60
block_seconds = 300
"#;
    let gateway = TestGateway::start(gateway_config(upstream, extra)?).await?;
    let client = client()?;

    for expected_remaining in ["2", "1", "0"] {
        let resp = client
            .get(gateway.url("/"))
            .header("host", "example.com")
            .header("x-forwarded-for", "198.51.100.4")
            .send()
            .await?;
        assert_eq!(resp.status(), 200);
        assert_eq!(header(&resp, "x-ratelimit-limit"), Some("3"));
        assert_eq!(header(&resp, "x-ratelimit-remaining"), Some(expected_remaining));
    }

    let resp = client
        .get(gateway.url("/"))
        .header("host", "example.com")
        .header("x-forwarded-for", "198.51.100.4")
        .send()
        .await?;
    assert_eq!(resp.status(), 429);
    assert_eq!(header(&resp, "retry-after"), Some("300"));
    assert_security_headers(&resp);

    // other clients keep their own budget
    let resp = client
        .get(gateway.url("/"))
        .header("host", "example.com")
        .header("x-forwarded-for", "198.51.100.5")
        .send()
        .await?;
    assert_eq!(resp.status(), 200);

    // static assets skip the limiter
    let resp = client
        .get(gateway.url("/_next/app.js"))
        .header("host", "example.com")
        .header("x-forwarded-for", "198.51.100.4")
        .send()
        .await?;
    assert_eq!(resp.status(), 200);
    assert_security_headers(&resp);
    assert!(header(&resp, "x-ratelimit-limit").is_none());

    // crawlers are not counted
    let resp = client
        .get(gateway.url("/"))
        .header("host", "example.com")
        .header("x-forwarded-for", "198.51.100.4")
        .header("user-agent", "Mozilla/5.0 (compatible; Googlebot/2.1)")
        .send()
        .await?;
    assert_eq!(resp.status(), 200);

    gateway.stop().await
}

#[tokio::test]
async fn test_unreachable_upstream_returns_bad_gateway() -> TestResult {
    let upstream = closed_port().await?;
    let gateway = TestGateway::start(gateway_config(upstream, "")?).await?;

    let resp = client()?
        .get(gateway.url("/"))
        .header("host", "example.com")
        .send()
        .await?;

    assert_eq!(resp.status(), 502);
    assert_security_headers(&resp);

    gateway.stop().await
}

#[tokio::test]
async fn test_development_mode_adds_debug_headers() -> TestResult {
    let upstream = spawn_upstream().await?;
    let gateway =
        TestGateway::start(gateway_config(upstream, r#"environment = "development""#)?).await?;

    let resp = client()?
        .get(gateway.url("/settings"))
        .header("host", "myaccount.example.com")
        .header("cookie", "auth-token=abc")
        .header("x-forwarded-for", "203.0.113.9")
        .send()
        .await?;

    assert_eq!(resp.status(), 200);
    assert_eq!(header(&resp, "x-gateway-subdomain"), Some("myaccount"));
    assert_eq!(header(&resp, "x-gateway-path"), Some("/settings"));
    assert_eq!(header(&resp, "x-gateway-authenticated"), Some("true"));
    assert_eq!(header(&resp, "x-gateway-client-ip"), Some("203.0.113.9"));
    assert_eq!(header(&resp, "x-gateway-bot"), Some("false"));
    assert_eq!(resp.text().await?, "/myaccount/settings");

    gateway.stop().await
}

#[tokio::test]
async fn test_production_geo_block() -> TestResult {
    let upstream = spawn_upstream().await?;
    let extra = r#"
[security.geo]
blocked_countries = ["KP"]
"#;
    let gateway = TestGateway::start(gateway_config(upstream, extra)?).await?;
    let client = client()?;

    let resp = client
        .get(gateway.url("/"))
        .header("host", "example.com")
        .header("cf-ipcountry", "kp")
        .send()
        .await?;
    assert_eq!(resp.status(), 403);
    assert_security_headers(&resp);

    // unknown country fails open
    let resp = client
        .get(gateway.url("/"))
        .header("host", "example.com")
        .header("cf-ipcountry", "XX")
        .send()
        .await?;
    assert_eq!(resp.status(), 200);

    gateway.stop().await
}
