//! # Radar Console Host
//!
//! Headless host for the `ppi-core` simulation: the per-frame console loop,
//! raw acquisition capture files and the date/time readout.
//!
//! ```rust
//! use ppi_core::config::ConsoleConfig;
//! use ppi_sim::Console;
//!
//! let mut console = Console::new(&ConsoleConfig::default()).unwrap();
//! for _ in 0..60 {
//!     console.frame(1.0 / 60.0).unwrap();
//! }
//! assert_eq!(console.frames(), 60);
//! ```

pub mod capture;
pub mod console;
pub mod readout;

pub use capture::{load_capture, CaptureData, CaptureError, CaptureWriter};
pub use console::{Console, FrameSnapshot};
pub use readout::DateTimeReadout;
