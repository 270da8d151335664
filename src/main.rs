use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};

use employee_console::session::FileStorage;
use employee_console::{ApiClient, ApiError, Config, SessionStore};

mod cli;
mod logging;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Cli::parse();

    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(url) = args.api_url {
        config.api_base_url = url;
    }
    if let Some(path) = args.session_file {
        config.session_file = path;
    }

    let _guard = logging::init(&config);
    info!(api = %config.api_base_url, "console starting");

    match start(args.command, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "command failed");
            eprintln!("Error: {e}");
            if e
                .downcast_ref::<ApiError>()
                .is_some_and(ApiError::requires_login)
            {
                eprintln!("Your session is no longer valid. Run `employee-console login`.");
            }
            ExitCode::FAILURE
        }
    }
}

async fn start(command: Command, config: Config) -> anyhow::Result<()> {
    let storage = Arc::new(FileStorage::new(&config.session_file));
    let session = SessionStore::load(storage)?;
    let api = ApiClient::new(&config, session.clone())?;

    let is_logout = matches!(command, Command::Logout);
    let mut watcher = session.subscribe();
    let result = cli::run(command, api).await;

    // a 401 anywhere in the command ends the session
    let ended = watcher.has_changed().unwrap_or(false)
        && !watcher.borrow_and_update().is_authenticated();
    if ended && !is_logout {
        info!("session ended during command");
        if result.is_ok() {
            eprintln!("Note: you have been logged out.");
        }
    }
    result
}
