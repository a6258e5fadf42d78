//! GTK demo front end.

mod host_window;
mod preview_widget;

pub use host_window::HostWindow;
pub use preview_widget::PreviewWidget;
