use std::{sync::Arc, time::Duration};

use anyhow::Context;
use clap::{Parser, Subcommand};
use weatherboard_core::{
    OpenWeatherProvider, ProcessEnv, ServiceError, WeatherCache, WeatherService,
};

use crate::render::{render_dashboard, render_locations};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weatherboard",
    version,
    about = "Weather dashboard for the locations configured in the environment"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the locations resolved from LOCATIONS or LATITUDE/LONGITUDE.
    Locations,

    /// Fetch and print weather for every configured location.
    Show {
        /// Print the normalized records as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Re-render the dashboard periodically, reusing the cache between polls.
    Watch {
        /// Seconds between renders.
        #[arg(long, default_value_t = 60)]
        every: u64,

        /// Stop after this many renders; runs until interrupted if omitted.
        #[arg(long)]
        polls: Option<u64>,

        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let service = build_service()?;

        match self.command {
            Command::Locations => {
                let locations = service.locations();
                if locations.is_empty() {
                    return Err(ServiceError::NoLocations.into());
                }
                print!("{}", render_locations(&locations));
            }
            Command::Show { json } => {
                show(&service, json).await?;
            }
            Command::Watch { every, polls, json } => {
                let mut ticker = tokio::time::interval(Duration::from_secs(every.max(1)));
                let mut rendered = 0u64;

                while polls.is_none_or(|limit| rendered < limit) {
                    ticker.tick().await;
                    tracing::info!(poll = rendered + 1, cached = service.cache().len(), "rendering dashboard");
                    show(&service, json).await?;
                    rendered += 1;
                }
            }
        }

        Ok(())
    }
}

/// Composition root: one provider and one cache for the whole process.
fn build_service() -> anyhow::Result<WeatherService> {
    let provider = OpenWeatherProvider::new().context("Failed to build HTTP client")?;

    Ok(WeatherService::new(
        Arc::new(provider),
        Arc::new(WeatherCache::new()),
        Arc::new(ProcessEnv),
    ))
}

async fn show(service: &WeatherService, json: bool) -> anyhow::Result<()> {
    let dashboard = service.dashboard().await?;

    if json {
        let out = serde_json::to_string_pretty(&dashboard)
            .context("Failed to serialize dashboard to JSON")?;
        println!("{out}");
    } else {
        print!("{}", render_dashboard(&dashboard));
    }

    Ok(())
}
