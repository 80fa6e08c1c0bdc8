use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("memoria_sidebar=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() {
    memoria_sidebar::config::load_dotenv();
    init_tracing();
    dioxus::launch(memoria_sidebar::ui::App);
}
