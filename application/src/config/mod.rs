//! Application-level configuration.
//!
//! - [`ExecutionParams`]: how capability calls are dispatched (visibility,
//!   speaking order, retries, timeouts)

pub mod execution_params;

pub use execution_params::ExecutionParams;
