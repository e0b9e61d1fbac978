pub mod tracing;

pub use tracing::{init_from_config, init_tracing};
