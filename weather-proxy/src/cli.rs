use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use weather_proxy_core::{Config, LookupService, WeatherSnapshot};

use crate::http;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-proxy", version, about = "Place-name weather lookup proxy")]
pub struct Cli {
    /// Read configuration from this file instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the weather provider API key in the config file.
    Configure,

    /// Run the HTTP proxy.
    Serve {
        /// Listen address, e.g. "127.0.0.1:5000". Overrides the config file.
        #[arg(long)]
        bind: Option<String>,
    },

    /// Look up current weather for a place once and print it.
    Lookup {
        /// Place name, e.g. "London".
        place: String,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(self.config),
            Command::Serve { bind } => {
                let config = load_config(self.config.as_deref())?;
                let addr = bind.unwrap_or_else(|| config.server.bind.clone());
                let service = LookupService::from_config(&config.upstream)?;
                http::serve(service, &addr).await
            }
            Command::Lookup { place } => {
                let config = load_config(self.config.as_deref())?;
                let service = LookupService::from_config(&config.upstream)?;

                match service.resolve(&place).await {
                    Ok(snapshot) => {
                        print_snapshot(&place, &snapshot);
                        Ok(())
                    }
                    Err(err) => Err(anyhow::anyhow!(err.kind().public_message())
                        .context(format!("Lookup for '{}' failed", place.trim()))),
                }
            }
        }
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<Config> {
    match path {
        Some(path) => {
            let mut config = Config::load_from(path)?;
            config.apply_overrides(|name| std::env::var(name).ok());
            Ok(config)
        }
        None => Config::load(),
    }
}

fn configure(path: Option<PathBuf>) -> Result<()> {
    let path = match path {
        Some(path) => path,
        None => Config::config_file_path()?,
    };
    let mut config = Config::load_from(&path)?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    config.set_api_key(api_key.trim().to_string());
    config.upstream.api_key().context("API key must not be empty")?;
    config.save_to(&path)?;

    println!("Saved API key to {}", path.display());
    Ok(())
}

fn print_snapshot(place: &str, snapshot: &WeatherSnapshot) {
    println!("{}: {} ({})", place.trim(), snapshot.description, snapshot.icon);
    println!("  temperature: {:.1} °C", snapshot.temperature);
    println!("  humidity:    {:.0} %", snapshot.humidity);
    println!("  wind:        {:.1} m/s", snapshot.wind_speed);
    if let Some(precipitation) = snapshot.precipitation {
        println!("  precip:      {precipitation:.1} mm");
    }
}
