use std::path::{Path, PathBuf};

use anyhow::Context;
use gtk4::prelude::*;
use gtk4::Application;

use crate::config::PreviewConfig;
use crate::provider::ViewCatalog;
use crate::ui::HostWindow;

const APP_ID: &str = "com.vpreview.ViewPreview";

pub struct VpreviewApp {
    app: Application,
}

impl VpreviewApp {
    pub fn new() -> Self {
        let app = Application::builder()
            .application_id(APP_ID)
            .flags(gio::ApplicationFlags::HANDLES_OPEN)
            .build();

        app.connect_activate(Self::on_activate);
        app.connect_open(Self::on_open);

        Self { app }
    }

    pub fn run(&self) -> i32 {
        self.app.run().into()
    }

    fn on_activate(app: &Application) {
        let dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::open_dir(app, &dir);
    }

    fn on_open(app: &Application, files: &[gio::File], _hint: &str) {
        match files.first().and_then(|f| f.path()) {
            Some(dir) => Self::open_dir(app, &dir),
            None => Self::on_activate(app),
        }
    }

    fn open_dir(app: &Application, dir: &Path) {
        let catalog = match ViewCatalog::scan(dir)
            .with_context(|| format!("Cannot open view directory {}", dir.display()))
        {
            Ok(catalog) => catalog,
            Err(err) => {
                tracing::error!("{err:#}");
                app.quit();
                return;
            }
        };

        let window = HostWindow::new(app, dir, catalog, PreviewConfig::from_env());
        window.present();
        // Keep the window alive by storing it on the Application.
        unsafe {
            app.set_data("host-window", window);
        }
    }
}

impl Default for VpreviewApp {
    fn default() -> Self {
        Self::new()
    }
}
