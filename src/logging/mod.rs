//! Logging and observability
//!
//! Structured logging through `tracing`, with a console layer and an
//! optional rotating JSON file layer.
//!
//! # Example
//!
//! ```no_run
//! use hybridconn::logging::init_logging;
//! use hybridconn::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(app_service_name = "site1", "Reconciling hybrid connection");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of a lifecycle operation
///
/// # Example
///
/// ```no_run
/// use hybridconn::log_operation_start;
///
/// log_operation_start!("read", "/subscriptions/0000/resourceGroups/rg1");
/// ```
#[macro_export]
macro_rules! log_operation_start {
    ($operation:expr, $id:expr) => {
        tracing::info!(operation = $operation, id = %$id, "Starting operation");
    };
}

/// Log the completion of a lifecycle operation
///
/// # Example
///
/// ```no_run
/// use hybridconn::log_operation_complete;
/// use std::time::Duration;
///
/// log_operation_complete!("delete", "/subscriptions/0000", Duration::from_millis(120));
/// ```
#[macro_export]
macro_rules! log_operation_complete {
    ($operation:expr, $id:expr, $duration:expr) => {
        tracing::info!(
            operation = $operation,
            id = %$id,
            duration_ms = $duration.as_millis() as u64,
            "Operation completed"
        );
    };
}
