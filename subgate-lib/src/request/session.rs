use http::header::COOKIE;
use http::HeaderMap;

/// Value of cookie `name` from every `Cookie` header of the request
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim().trim_matches('"'))
}

/// True when the session cookie is present and non-empty
///
/// Presence only: the token is never validated here, the application behind
/// the gateway re-validates it on every request.
pub fn is_authenticated(headers: &HeaderMap, session_cookie: &str) -> bool {
    cookie_value(headers, session_cookie).is_some_and(|value| !value.is_empty())
}
