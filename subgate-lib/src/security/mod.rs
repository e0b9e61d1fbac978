pub mod bot;
pub mod client_ip;
pub mod geo;
pub mod headers;
pub mod rate_limit;
pub mod redirect;

pub use bot::BotDetector;
pub use client_ip::client_ip;
pub use geo::{
    AllowAllGeo, BoxFuture, GeoBlockChecker, GeoBlocker, GeoLookup, GeoLookupError,
    HeaderGeoLookup,
};
pub use headers::CompiledSecurityHeaders;
pub use rate_limit::{NoopRateLimiter, RateLimitChecker, RateLimitStatus, RateLimiter};
pub use redirect::validate_redirect_target;
