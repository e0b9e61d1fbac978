use crate::config::SecurityHeaders;
use crate::error::{GatewayError, Result};
use http::{HeaderMap, HeaderName, HeaderValue};

/// Security headers parsed once at startup
///
/// Holds every configured header plus `Content-Security-Policy`, ready to be
/// written onto responses without re-validating names and values per request.
#[derive(Debug, Clone)]
pub struct CompiledSecurityHeaders {
    headers: Vec<(HeaderName, HeaderValue)>,
}

impl CompiledSecurityHeaders {
    pub fn compile(config: &SecurityHeaders) -> Result<Self> {
        let mut headers = Vec::with_capacity(config.custom.len().saturating_add(1));

        for header in &config.custom {
            let name = HeaderName::from_bytes(header.name.as_bytes()).map_err(|e| {
                GatewayError::Config(format!("Invalid security header '{}': {e}", header.name))
            })?;
            let value = HeaderValue::from_str(&header.value).map_err(|e| {
                GatewayError::Config(format!("Invalid value for header '{}': {e}", header.name))
            })?;
            headers.push((name, value));
        }

        let csp = HeaderValue::from_str(&config.csp)
            .map_err(|e| GatewayError::Config(format!("Invalid CSP policy: {e}")))?;
        headers.push((http::header::CONTENT_SECURITY_POLICY, csp));

        Ok(Self { headers })
    }

    /// Overwrite every security header on `target`
    pub fn apply(&self, target: &mut HeaderMap) {
        for (name, value) in &self.headers {
            target.insert(name.clone(), value.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }
}
