// Entrypoint for the CLI application.
// - Keeps `main` small: load config, build the API client and session
//   store, restore any saved session, then hand over to the UI loop.
// - Logs go to stderr so they don't interleave with the menu.

use anyhow::Context;
use sportcards_cli::{
    api::ApiClient, config::Config, session::FileSessionStore, shell::Shell, ui::main_menu,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<()> {
    init_logging();

    let config = Config::from_env().context("Failed to load configuration")?;
    let api = ApiClient::new(&config)?;
    let store = match &config.session_file {
        Some(path) => FileSessionStore::new(path),
        None => FileSessionStore::default_location()?,
    };
    tracing::debug!(path = %store.path().display(), "using session file");

    let mut shell = Shell::new(api, store, config.reveal_delay);
    shell.restore();

    // Blocks until the user exits.
    main_menu(&mut shell)?;
    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("sportcards_cli=info,warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
