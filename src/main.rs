use vpreview::app::VpreviewApp;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("vpreview=info".parse().unwrap()),
        )
        .init();

    let app = VpreviewApp::new();
    std::process::exit(app.run());
}
