//! repoinit binary entry point.

use clap::Parser;
use repoinit::bootstrap::{self, BootstrapOptions};
use repoinit::cli::{AuthCommands, Cli, Commands};
use repoinit::config::AppConfig;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    // `.env` may set RUST_LOG.
    let dotenv = dotenvy::dotenv();
    init_tracing(cli.verbose);
    AppConfig::log_dotenv(dotenv);

    let config = AppConfig::from_process_env();
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::debug!("interrupt received");
                cancel.cancel();
            }
        });
    }

    let result = match cli.command {
        Some(Commands::Auth(auth_args)) => match auth_args.command {
            AuthCommands::Token => repoinit::cli::auth::handle_token(&config, cancel).await,
            AuthCommands::Status => repoinit::cli::auth::handle_status(&config),
            AuthCommands::Logout => repoinit::cli::auth::handle_logout(&config),
        },
        None => {
            let options = BootstrapOptions::from(cli.init);
            bootstrap::run(&config, &options, cancel).await.map(|_| ())
        }
    };

    if let Err(e) = result {
        tracing::debug!(error = ?e, "repoinit failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("repoinit={default_level}"))),
        )
        .init();
}
