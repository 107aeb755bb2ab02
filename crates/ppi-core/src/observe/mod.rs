//! # Observability
//!
//! Structured logging for the console via `tracing`. The core emits events
//! at fixed levels; the host decides where they go by installing a
//! subscriber with [`init_logging`].
//!
//! | Event                      | Level  |
//! |----------------------------|--------|
//! | sweep reversal at a bound  | debug  |
//! | target triggered           | debug  |
//! | speed clamped to slider    | warn   |
//! | startup / run summary      | info   |

pub mod logging;

pub use logging::{init_logging, LogConfig, LogFormat, LogLevel};
