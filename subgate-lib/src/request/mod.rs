//! Stateless request classification helpers.

pub mod paths;
pub mod session;
pub mod subdomain;
pub mod urls;

pub use paths::{has_path_prefix, is_public_path, is_static_path};
pub use session::{cookie_value, is_authenticated};
pub use subdomain::{strip_port, subdomain_of, Subdomain};
pub use urls::{build_auth_redirect_url, build_internal_path, build_root_url, RequestOrigin};
