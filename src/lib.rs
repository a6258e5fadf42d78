//! Hover preview of project views.
//!
//! A [`session::PreviewSession`] polls the host's selection on every tick.
//! When a single view stays selected for the show delay, the view is exported
//! through an [`provider::ImageProvider`] and displayed in a floating
//! [`preview::PreviewWindow`] placed beside the host's navigation panel.
//! Losing the selection closes the preview after the close delay.
//!
//! The core is toolkit independent. The `gtk` feature adds a demo front end.

pub mod config;
pub mod error;
pub mod geometry;
pub mod host;
pub mod preview;
pub mod provider;
pub mod selection;
pub mod session;
pub mod viewport;

#[cfg(feature = "gtk")]
pub mod app;
#[cfg(feature = "gtk")]
pub mod ui;

pub use config::PreviewConfig;
pub use error::{ExportError, PreviewError};
pub use session::PreviewSession;
