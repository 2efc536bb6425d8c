//! authbridge CLI binary entry point.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use authbridge::cli::{auth, Cli};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("authbridge=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match auth::resolve_config(cli.service_url, cli.config.as_deref()) {
        Ok(config) => auth::handle_request(&config, cli.command.into_request()).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
