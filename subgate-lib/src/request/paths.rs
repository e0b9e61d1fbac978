use crate::config::GatewayConfig;

/// True when `path` is a static asset (or already-prefixed call) that bypasses the pipeline
pub fn is_static_path(path: &str, config: &GatewayConfig) -> bool {
    path.starts_with('/') && config.static_prefixes.iter().any(|prefix| path.starts_with(prefix))
}

/// Exact membership in the public-path set; nested paths are not exempt
pub fn is_public_path(path: &str, config: &GatewayConfig) -> bool {
    config.public_paths.iter().any(|p| p == path)
}

/// True when `path` is `prefix` itself or lives under `prefix/`
pub fn has_path_prefix(path: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        return path.starts_with('/');
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
