pub mod headers;
pub mod request;

pub use request::handle_request;
