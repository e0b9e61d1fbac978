use url::form_urlencoded;

use super::outcome::{RoutingContext, RoutingOutcome};
use crate::config::GatewayConfig;
use crate::request::{
    build_auth_redirect_url, build_internal_path, build_root_url, has_path_prefix, is_public_path,
    Subdomain,
};
use crate::security::validate_redirect_target;

const LOGIN_PATH: &str = "/login";
const AUTH_PREFIX: &str = "/auth";
const REDIRECT_PARAM: &str = "redirect";

/// Turns a [`RoutingContext`] into a [`RoutingOutcome`]
///
/// Pure: the same context and configuration always produce the same outcome.
#[derive(Debug, Clone)]
pub struct RoutingEngine {
    config: GatewayConfig,
}

impl RoutingEngine {
    pub fn new(config: GatewayConfig) -> Self {
        Self { config }
    }

    pub fn dispatch(&self, ctx: &RoutingContext) -> RoutingOutcome {
        let public = is_public_path(&ctx.path, &self.config);

        match ctx.subdomain {
            Some(Subdomain::Auth) => self.auth_area(ctx, public),
            Some(Subdomain::Provider) => self.gated_area(ctx, "/provider", public),
            Some(Subdomain::Ump) => self.gated_area(ctx, "/ump", public),
            Some(Subdomain::Skills) => {
                if has_path_prefix(&ctx.path, &self.config.api_prefix) {
                    RoutingOutcome::Next
                } else {
                    self.gated_area(ctx, "/skills", public)
                }
            }
            Some(Subdomain::Api) => {
                if has_path_prefix(&ctx.path, &self.config.api_prefix) {
                    RoutingOutcome::Next
                } else {
                    self.rewrite(ctx, &self.config.api_prefix, &ctx.path)
                }
            }
            Some(Subdomain::MyAccount) => self.gated_area(ctx, "/myaccount", false),
            Some(Subdomain::Wallet) => self.gated_area(ctx, "/wallet", false),
            Some(Subdomain::Www) => {
                RoutingOutcome::permanent_redirect(self.root_url(ctx, &ctx.path_and_query()))
            }
            None => self.root_area(ctx, public),
        }
    }

    /// Login portal: signed-in users on a public page are sent onwards
    fn auth_area(&self, ctx: &RoutingContext, public: bool) -> RoutingOutcome {
        if ctx.is_authenticated && public {
            let target = ctx
                .query
                .as_deref()
                .and_then(redirect_param)
                .and_then(|target| validate_redirect_target(&target, &self.config.root_domain));

            return match target {
                Some(target) => RoutingOutcome::redirect(target.as_str()),
                None => RoutingOutcome::redirect(self.root_url(ctx, "/")),
            };
        }

        let path = if ctx.path == "/" { LOGIN_PATH } else { ctx.path.as_str() };
        self.rewrite(ctx, AUTH_PREFIX, path)
    }

    /// Area requiring a session unless the path is exempt
    fn gated_area(&self, ctx: &RoutingContext, prefix: &str, exempt: bool) -> RoutingOutcome {
        if !ctx.is_authenticated && !exempt {
            return RoutingOutcome::redirect(self.login_url(ctx));
        }
        self.rewrite(ctx, prefix, &ctx.path)
    }

    /// Bare root and unrecognised hosts
    fn root_area(&self, ctx: &RoutingContext, public: bool) -> RoutingOutcome {
        let auth_path = if public {
            Some(ctx.path.as_str())
        } else {
            ctx.path.strip_prefix(AUTH_PREFIX).filter(|rest| rest.starts_with('/'))
        };

        let Some(path) = auth_path else {
            return RoutingOutcome::Next;
        };

        let target = build_auth_redirect_url(&ctx.origin, &self.config.root_domain, path)
            .map(|mut url| {
                url.set_query(ctx.query.as_deref().filter(|q| !q.is_empty()));
                url.to_string()
            })
            .unwrap_or_else(|e| {
                tracing::warn!(host = %ctx.hostname, "Failed to build auth URL: {e}");
                self.root_url(ctx, "/")
            });
        RoutingOutcome::redirect(target)
    }

    fn rewrite(&self, ctx: &RoutingContext, prefix: &str, path: &str) -> RoutingOutcome {
        RoutingOutcome::Rewrite {
            target_path: build_internal_path(prefix, path, ctx.query.as_deref()),
        }
    }

    /// `auth.<root>/login?redirect=<original URL>`, or the bare root on failure
    fn login_url(&self, ctx: &RoutingContext) -> String {
        match build_auth_redirect_url(&ctx.origin, &self.config.root_domain, LOGIN_PATH) {
            Ok(mut url) => {
                url.query_pairs_mut().append_pair(REDIRECT_PARAM, &ctx.original_url());
                url.to_string()
            }
            Err(e) => {
                tracing::warn!(host = %ctx.hostname, "Failed to build login URL: {e}");
                self.root_url(ctx, "/")
            }
        }
    }

    /// Absolute URL on the bare root, or `/` if even that cannot be built
    pub fn root_url(&self, ctx: &RoutingContext, path_and_query: &str) -> String {
        build_root_url(&ctx.origin, &self.config.root_domain, path_and_query)
            .map(|url| url.to_string())
            .unwrap_or_else(|e| {
                tracing::warn!(host = %ctx.hostname, "Failed to build root URL: {e}");
                "/".to_string()
            })
    }
}

fn redirect_param(query: &str) -> Option<String> {
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == REDIRECT_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}
