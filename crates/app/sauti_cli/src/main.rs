// Import and re-export the `error` module
pub use self::error::{Error, Result};
mod error;

use std::sync::Arc;

use clap::Parser;
use cli::{Cli, Commands};
use url::Url;

use sauti_api_client::{ApiConfig, HttpApi};
use sauti_core::models::SubscriptionStatus;
use sauti_core::notify::TracingScheduler;
use sauti_core::storage::FileStorage;
use sauti_stores::Stores;

mod cli;
mod logging;

/// Backend root used unless `SAUTI_API_URL` overrides it.
const DEFAULT_API_URL: &str = "http://127.0.0.1:3000/api";

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = run().await {
        log::error!("{}", e);
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> Result<()> {
    logging::init()?;

    let args = Cli::parse();

    match &args.command {
        Commands::Version => {
            println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        }
        Commands::Whoami => whoami().await?,
    }

    Ok(())
}

/// Bootstrap the store registry against local storage and print the
/// hydrated session identity. No network round trip is made.
async fn whoami() -> Result<()> {
    let base_url = std::env::var("SAUTI_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
    let storage = Arc::new(FileStorage::new());
    let api = Arc::new(HttpApi::new(
        ApiConfig::new(Url::parse(&base_url)?),
        storage.clone(),
    )?);

    let stores = Stores::new(api, storage, Arc::new(TracingScheduler::new()));
    stores.bootstrap().await;

    match stores.session.user() {
        Some(user) => {
            let status = match user.subscription_status {
                SubscriptionStatus::Active => "ACTIVE",
                SubscriptionStatus::Inactive => "INACTIVE",
            };
            println!(
                "{} {} <{}> (subscription: {})",
                user.first_name, user.last_name, user.email, status
            );
        }
        None => println!("Not signed in."),
    }

    Ok(())
}
