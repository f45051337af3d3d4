//! Core library for the weather dashboard.
//!
//! This crate defines:
//! - Metric/imperial conversion and display formatting
//! - Grouping of 3-hour forecast points into daily buckets
//! - A client for the dashboard backend (current weather, forecast, reverse geocoding)
//! - Presentation state and a view controller that drives any [`DashboardView`]
//!
//! It is used by the `weather-dashboard` terminal front end, but any surface
//! that implements the view and chart traits can host it.

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod forecast;
pub mod geolocation;
pub mod model;
pub mod render;
pub mod state;
pub mod units;
pub mod view;

pub use client::{HttpWeatherClient, WeatherApi};
pub use config::Config;
pub use controller::ViewController;
pub use error::{ClientError, DashboardError, GeolocationError};
pub use geolocation::{FixedGeolocator, Geolocator};
pub use model::{Coordinates, CurrentWeatherReading, ForecastPoint, Location, ReverseGeocode};
pub use render::{ChartSpec, CurrentPanel, ForecastCard};
pub use units::Unit;
pub use view::{Chart, ChartFactory, DashboardView, Tab};
