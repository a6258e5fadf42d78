//! Selection tracking for the preview.
//!
//! - `DebounceTimer` - deadline-based one-shot timer polled per tick
//! - `SelectionMonitor` - decides when to show, refresh or hide the preview

pub mod monitor;
pub mod timer;

pub use monitor::{MonitorAction, MonitorPhase, SelectionMonitor, SelectionSnapshot};
pub use timer::DebounceTimer;
