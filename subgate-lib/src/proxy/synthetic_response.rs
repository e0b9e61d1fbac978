use bytes::Bytes;
use http::header::{CONTENT_TYPE, LOCATION, RETRY_AFTER};
use http::{HeaderValue, StatusCode};
use http_body_util::{combinators::BoxBody, BodyExt, Full};
use hyper::Response;
use serde_json::json;

use crate::proxy::http_result::{HttpError, HttpResult};

pub type RespBody = BoxBody<Bytes, hyper::Error>;

/// Build HTTP response with status code of 4xx and 5xx
///
/// The body is a small JSON document naming the status.
pub fn synthetic_error_response(status_code: StatusCode) -> Response<RespBody> {
    let reason = status_code.canonical_reason().unwrap_or("Error");
    json_response(status_code, json!({ "error": reason, "status": status_code.as_u16() }))
}

/// 301 for canonical host moves, 307 otherwise
pub fn redirect_response(location: &str, permanent: bool) -> HttpResult<Response<RespBody>> {
    let location = HeaderValue::from_str(location).map_err(|e| {
        HttpError::FailedToGenerateDownstreamResponse(format!("Invalid redirect location: {e}"))
    })?;
    let status =
        if permanent { StatusCode::MOVED_PERMANENTLY } else { StatusCode::TEMPORARY_REDIRECT };

    let mut resp = Response::new(empty_body());
    *resp.status_mut() = status;
    resp.headers_mut().insert(LOCATION, location);
    Ok(resp)
}

/// 403/429 policy block
pub fn blocked_response(status: StatusCode, retry_after_secs: Option<u64>) -> Response<RespBody> {
    let reason = status.canonical_reason().unwrap_or("Blocked");
    let mut resp = match retry_after_secs {
        Some(secs) => json_response(status, json!({ "error": reason, "retry_after": secs })),
        None => json_response(status, json!({ "error": reason })),
    };
    if let Some(secs) = retry_after_secs {
        resp.headers_mut().insert(RETRY_AFTER, HeaderValue::from(secs));
    }
    resp
}

fn json_response(status: StatusCode, body: serde_json::Value) -> Response<RespBody> {
    let mut resp = Response::new(full_body(body.to_string()));
    *resp.status_mut() = status;
    resp.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    resp
}

fn full_body(data: impl Into<Bytes>) -> RespBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed()
}

fn empty_body() -> RespBody {
    full_body(Bytes::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_statuses() -> HttpResult<()> {
        let temporary = redirect_response("https://auth.example.com/login", false)?;
        assert_eq!(temporary.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            temporary.headers().get(LOCATION).and_then(|v| v.to_str().ok()),
            Some("https://auth.example.com/login")
        );

        let permanent = redirect_response("https://example.com/", true)?;
        assert_eq!(permanent.status(), StatusCode::MOVED_PERMANENTLY);
        Ok(())
    }

    #[test]
    fn test_invalid_location_is_an_error() {
        assert!(redirect_response("https://example.com/\nSet-Cookie: x", false).is_err());
    }

    #[test]
    fn test_rate_limited_response() {
        let resp = blocked_response(StatusCode::TOO_MANY_REQUESTS, Some(300));
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(resp.headers().get(RETRY_AFTER).and_then(|v| v.to_str().ok()), Some("300"));

        let forbidden = blocked_response(StatusCode::FORBIDDEN, None);
        assert!(forbidden.headers().get(RETRY_AFTER).is_none());
    }
}
