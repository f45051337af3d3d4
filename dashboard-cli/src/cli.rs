use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Confirm, CustomType, Select, Text};
use weather_dashboard_core::{
    Config, Coordinates, FixedGeolocator, HttpWeatherClient, Tab, Unit, ViewController,
    config::GeolocationConfig,
};

use crate::{interactive, terminal::TerminalView};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-dashboard", version, about = "Weather dashboard in the terminal")]
pub struct Cli {
    /// Backend base URL, overriding the config file.
    #[arg(long, global = true)]
    pub backend_url: Option<String>,

    /// Start in imperial units.
    #[arg(long, global = true)]
    pub imperial: bool,

    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Position given on the command line.
#[derive(Debug, Clone, Copy, clap::Args)]
pub struct PositionArgs {
    /// Latitude in decimal degrees.
    #[arg(long, allow_negative_numbers = true, requires = "lon")]
    pub lat: Option<f64>,

    /// Longitude in decimal degrees.
    #[arg(long, allow_negative_numbers = true, requires = "lat")]
    pub lon: Option<f64>,
}

impl PositionArgs {
    fn coordinates(&self) -> Option<Coordinates> {
        match (self.lat, self.lon) {
            (Some(latitude), Some(longitude)) => Some(Coordinates {
                latitude,
                longitude,
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the backend URL, default unit, quick cities and position.
    Configure,

    /// Show weather for a location once.
    Show {
        /// City name or "lat,lon".
        location: String,

        /// Also show the forecast.
        #[arg(long)]
        forecast: bool,
    },

    /// Show weather for the current position once.
    Locate {
        #[command(flatten)]
        position: PositionArgs,

        /// Also show the forecast.
        #[arg(long)]
        forecast: bool,
    },

    /// Start the interactive dashboard.
    Interactive {
        #[command(flatten)]
        position: PositionArgs,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match &self.command {
            Command::Configure => configure(config_or_default(Config::load()))?,
            Command::Show { location, forecast } => {
                let controller = build_controller(&self.config()?, None)?;
                if *forecast {
                    controller.switch_tab(Tab::Forecast).await;
                }
                controller.search(location).await;
            }
            Command::Locate { position, forecast } => {
                let controller = build_controller(&self.config()?, position.coordinates())?;
                if *forecast {
                    controller.switch_tab(Tab::Forecast).await;
                }
                controller.geolocate().await;
            }
            Command::Interactive { position } => {
                let controller = build_controller(&self.config()?, position.coordinates())?;
                interactive::run(&controller).await?;
            }
        }

        Ok(())
    }

    /// The saved config with command-line overrides applied.
    fn config(&self) -> anyhow::Result<Config> {
        let mut config = Config::load()?;
        if let Some(url) = &self.backend_url {
            config.set_backend_url(url)?;
        }
        if self.imperial {
            config.default_unit = Unit::Imperial;
        }
        Ok(config)
    }
}

/// `configure` must stay usable when the saved file is broken, since it is
/// how the file gets repaired.
fn config_or_default(loaded: anyhow::Result<Config>) -> Config {
    loaded.unwrap_or_else(|e| {
        tracing::warn!(error = ?e, "Ignoring unreadable config");
        Config::default()
    })
}

/// Command-line coordinates win over the configured position.
fn build_controller(
    config: &Config,
    position: Option<Coordinates>,
) -> anyhow::Result<ViewController<TerminalView<std::io::Stdout>>> {
    let client = HttpWeatherClient::from_config(config)
        .with_context(|| format!("Cannot use backend '{}'", config.backend_url))?;
    tracing::debug!(backend = %client.base_url(), "Using backend");
    let geolocator = FixedGeolocator::new(position.or_else(|| config.geolocation_position()));
    let view = TerminalView::stdout();
    let charts = view.charts();

    Ok(ViewController::new(
        Arc::new(client),
        Arc::new(geolocator),
        Arc::new(charts),
        view,
        config.default_unit,
    )
    .with_quick_cities(config.quick_cities.clone()))
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let url = Text::new("Backend URL:")
        .with_default(&config.backend_url)
        .prompt()?;
    config.set_backend_url(&url)?;

    let current = Unit::all()
        .iter()
        .position(|u| *u == config.default_unit)
        .unwrap_or(0);
    config.default_unit = Select::new("Default units:", Unit::all().to_vec())
        .with_starting_cursor(current)
        .prompt()?;

    let cities = Text::new("Quick cities (comma separated):")
        .with_default(&config.quick_cities.join(", "))
        .prompt()?;
    config.set_quick_cities(cities.split(','));

    if Confirm::new("Set a fixed position for `locate`?")
        .with_default(config.geolocation.is_some())
        .prompt()?
    {
        let latitude = CustomType::<f64>::new("Latitude:")
            .with_error_message("Please enter a decimal number")
            .prompt()?;
        let longitude = CustomType::<f64>::new("Longitude:")
            .with_error_message("Please enter a decimal number")
            .prompt()?;
        config.geolocation = Some(GeolocationConfig {
            latitude,
            longitude,
        });
    } else {
        config.geolocation = None;
    }

    config.save()?;
    println!("Saved {}", Config::config_file_path()?.display());
    Ok(())
}
