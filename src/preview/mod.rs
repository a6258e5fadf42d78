//! The floating preview window: content model and chrome/interaction state.
//!
//! Nothing here touches a toolkit. Front ends translate their input events
//! into [`PreviewWindow`] calls and paint what it reports.

pub mod content;
pub mod window;

pub use content::{PreviewBody, PreviewContent};
pub use window::{HitRegion, PreviewWindow, ShowingKind, WindowState};
