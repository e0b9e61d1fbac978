use http::Request;
use std::net::SocketAddr;
use std::sync::Arc;

use subgate_lib::config::{parse, Config};
use subgate_lib::security::{AllowAllGeo, NoopRateLimiter};
use subgate_lib::{GatewayOrchestrator, RoutingOutcome};

type TestResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

fn config() -> Result<Arc<Config>, Box<dyn std::error::Error + Send + Sync>> {
    let cfg = parse(
        r#"
listen = "127.0.0.1:0"
upstream = "127.0.0.1:3000"

[gateway]
root_domain = "example.com"
"#,
    )?;
    Ok(Arc::new(cfg))
}

fn gateway() -> Result<GatewayOrchestrator, Box<dyn std::error::Error + Send + Sync>> {
    Ok(GatewayOrchestrator::new(config()?, Arc::new(NoopRateLimiter), Arc::new(AllowAllGeo))?)
}

async fn route(
    host: &str,
    path: &str,
    cookie: Option<&str>,
) -> Result<RoutingOutcome, Box<dyn std::error::Error + Send + Sync>> {
    let mut builder = Request::builder().uri(path).header("host", host);
    if let Some(cookie) = cookie {
        builder = builder.header("cookie", cookie);
    }
    let req = builder.body(())?;
    let peer = SocketAddr::from(([192, 0, 2, 1], 50000));
    Ok(gateway()?.evaluate(&req, Some(peer)).await?.outcome)
}

#[tokio::test]
async fn test_anonymous_wallet_redirects_to_login_with_original_url() -> TestResult {
    let outcome = route("wallet.example.com", "/dashboard", None).await?;
    let RoutingOutcome::Redirect { target_url, permanent } = outcome else {
        return Err(format!("expected redirect, got {outcome:?}").into());
    };
    assert!(!permanent);

    let url = url::Url::parse(&target_url)?;
    assert_eq!(url.host_str(), Some("auth.example.com"));
    assert_eq!(url.path(), "/login");
    let redirect = url.query_pairs().find(|(k, _)| k == "redirect").map(|(_, v)| v.into_owned());
    assert_eq!(redirect.as_deref(), Some("https://wallet.example.com/dashboard"));
    Ok(())
}

#[tokio::test]
async fn test_signed_in_login_follows_validated_redirect() -> TestResult {
    let outcome = route(
        "auth.example.com",
        "/login?redirect=https://myaccount.example.com/",
        Some("theme=dark; auth-token=abc123"),
    )
    .await?;
    assert_eq!(outcome, RoutingOutcome::redirect("https://myaccount.example.com/"));

    let outcome =
        route("auth.example.com", "/login?redirect=https://evil.com", Some("auth-token=abc123"))
            .await?;
    assert_eq!(outcome, RoutingOutcome::redirect("https://example.com/"));
    Ok(())
}

#[tokio::test]
async fn test_lookalike_redirect_targets_fall_back_to_root() -> TestResult {
    for target in ["https://example.com.attacker.net/", "https://evilexample.com/"] {
        let path = format!("/login?redirect={target}");
        let outcome = route("auth.example.com", &path, Some("auth-token=abc123")).await?;
        assert_eq!(outcome, RoutingOutcome::redirect("https://example.com/"));
    }
    Ok(())
}

#[tokio::test]
async fn test_root_domain_page_passes_through() -> TestResult {
    assert_eq!(route("example.com", "/pricing", None).await?, RoutingOutcome::Next);
    assert_eq!(route("example.com:443", "/pricing", None).await?, RoutingOutcome::Next);
    Ok(())
}

#[tokio::test]
async fn test_unknown_and_foreign_hosts_degrade_to_root() -> TestResult {
    assert_eq!(route("blog.example.com", "/post/1", None).await?, RoutingOutcome::Next);
    assert_eq!(route("a.b.example.com", "/", None).await?, RoutingOutcome::Next);
    assert_eq!(route("wallet.attacker.net", "/dashboard", None).await?, RoutingOutcome::Next);
    Ok(())
}

#[tokio::test]
async fn test_empty_session_cookie_is_not_authenticated() -> TestResult {
    let outcome = route("provider.example.com", "/clients", Some("auth-token=")).await?;
    assert!(matches!(outcome, RoutingOutcome::Redirect { permanent: false, .. }));
    Ok(())
}

#[tokio::test]
async fn test_forwarded_proto_is_preserved_in_redirects() -> TestResult {
    let req = Request::builder()
        .uri("/")
        .header("host", "www.example.com")
        .header("x-forwarded-proto", "http")
        .body(())?;
    let verdict = gateway()?.evaluate(&req, None).await?;
    assert_eq!(verdict.outcome, RoutingOutcome::permanent_redirect("http://example.com/"));
    Ok(())
}
