pub mod logging;

pub use logging::{default_logs_dir, init_logging};
