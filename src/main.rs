use crate::auth::identity::AuthChange;
use crate::config::AppConfig;
use crate::db::connection::{init_db, Database};
use crate::responses::error_to_response;
use crate::router::{handle, AppState};
use astra::Server;
use tracing_subscriber::EnvFilter;

mod auth;
mod config;
mod db;
mod domain;
mod errors;
mod responses;
mod router;
mod spreadsheets;
mod templates;

#[cfg(test)]
mod tests;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let db = Database::new(config.db_path.clone());
    if let Err(e) = init_db(&db, &config.schema_path) {
        tracing::error!("database initialization failed: {e}");
        std::process::exit(1);
    }

    let state = AppState::new(db, config.clone());

    // Sign-in/sign-out audit trail.
    let changes = state.events.subscribe();
    std::thread::spawn(move || {
        for change in changes {
            match change {
                AuthChange::SignedIn { owner } => tracing::info!(owner = owner.0, "signed in"),
                AuthChange::SignedOut { owner } => tracing::info!(owner = owner.0, "signed out"),
            }
        }
    });

    tracing::info!(addr = %config.bind_addr, workers = config.max_workers, "starting server");

    let server = Server::bind(&config.bind_addr).max_workers(config.max_workers);
    let result = server.serve(move |req, _info| match handle(req, &state) {
        Ok(resp) => resp,
        Err(err) => error_to_response(err),
    });

    if let Err(e) = result {
        tracing::error!("server ended with error: {e}");
        std::process::exit(1);
    }

    tracing::info!("server shut down cleanly");
}
