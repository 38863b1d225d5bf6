//! Loading configuration and the station listing for a command

use crate::OutputFormat;
use anyhow::{Context as _, Result};
use fuelscope_api_client::{ClientConfig, FileListing, StationsClient};
use fuelscope_catalog::{RecordSource, StationSession};
use fuelscope_cli::progress;
use fuelscope_core::config::{Config, SearchSection};
use fuelscope_telemetry::Timer;
use std::env;
use std::path::Path;
use tracing::debug;

/// Everything a subcommand needs: loaded stations and search defaults.
pub struct Context {
    pub session: StationSession,
    pub search: SearchSection,
    pub format: OutputFormat,
}

impl Context {
    /// Loads configuration, then the listing from `input` or the network.
    pub async fn load(config_path: Option<&Path>, input: Option<&Path>, format: OutputFormat) -> Result<Self> {
        let config = Config::load(config_path)?;
        if let Some(path) = &config.path {
            debug!(path = %path.display(), "Using configuration file");
        }

        let client_config = ClientConfig::from_file(&config.schema)?.overlay(|key| env::var(key).ok());
        let mut session = StationSession::new();

        let timer = Timer::start("load_listing");
        match input {
            Some(path) => {
                let source = FileListing::new(path, client_config.schema);
                refresh(&mut session, &source)
                    .await
                    .with_context(|| format!("Failed to read {}", path.display()))?;
            }
            None => {
                let client = StationsClient::with_config(client_config)?;
                let spinner = (format == OutputFormat::Text).then(|| progress::spinner("Fetching station prices..."));
                let outcome = refresh(&mut session, &client).await;
                if let Some(pb) = &spinner {
                    match &outcome {
                        Ok(()) => pb.finish_and_clear(),
                        Err(_) => progress::finish_error(pb, "Fetch failed"),
                    }
                }
                outcome.context("Failed to fetch the station listing")?;
            }
        }
        timer.stop();

        Ok(Self {
            session,
            search: config.schema.search,
            format,
        })
    }
}

async fn refresh<S: RecordSource>(session: &mut StationSession, source: &S) -> Result<()> {
    session.refresh(source).await?;
    Ok(())
}
