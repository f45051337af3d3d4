//! Display models built from canonical readings and the active unit.
//!
//! Views only ever receive these; they never hold a value that cannot be
//! rebuilt from the stored metric reading.

use std::fmt::Display;

use chrono::{DateTime, TimeZone};

use crate::{
    forecast::ForecastAggregate,
    model::CurrentWeatherReading,
    units::{self, DualValue, Unit},
};

pub const ICON_URL_TEMPLATE: &str = "https://openweathermap.org/img/wn/{icon}@2x.png";

/// CDN URL for a backend icon code; `None` for an empty code.
pub fn icon_url(code: &str) -> Option<String> {
    let code = code.trim();
    if code.is_empty() {
        None
    } else {
        Some(ICON_URL_TEMPLATE.replace("{icon}", code))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentPanel {
    pub location: String,
    /// Local time the panel was rendered.
    pub time: String,
    pub icon_url: Option<String>,
    pub icon_alt: String,
    pub description: String,
    pub unit: Unit,
    pub temperature: DualValue,
    pub temperature_text: String,
    pub feels_like: DualValue,
    pub feels_like_text: String,
    pub humidity: String,
    pub pressure: String,
    pub wind_speed: DualValue,
    pub wind_speed_text: String,
    pub wind_direction: Option<String>,
    pub clouds: Option<String>,
    pub visibility: Option<String>,
    /// Both are set, or neither.
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
}

impl CurrentPanel {
    pub fn build<Tz>(reading: &CurrentWeatherReading, rendered_at: &DateTime<Tz>, unit: Unit) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let temperature = DualValue::temperature(reading.temperature);
        let feels_like = DualValue::temperature(reading.feels_like);
        let wind_speed = DualValue::speed(reading.wind_speed);

        // A zero timestamp is the backend's placeholder for "unknown".
        let known = |t: Option<i64>| t.filter(|&t| t != 0);
        let (sunrise, sunset) = match (known(reading.sunrise), known(reading.sunset)) {
            (Some(rise), Some(set)) => {
                let tz = rendered_at.timezone();
                match (clock_time(rise, &tz), clock_time(set, &tz)) {
                    (Some(rise), Some(set)) => (Some(rise), Some(set)),
                    _ => (None, None),
                }
            }
            _ => (None, None),
        };

        Self {
            location: reading.location.clone(),
            time: rendered_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            icon_url: icon_url(&reading.icon),
            icon_alt: reading.description.clone(),
            description: reading.description.clone(),
            unit,
            temperature,
            temperature_text: temperature.display(unit),
            feels_like,
            feels_like_text: feels_like.display(unit),
            humidity: format!("{}%", units::format_rounded(reading.humidity)),
            pressure: format!("{} hPa", units::format_rounded(reading.pressure)),
            wind_speed,
            wind_speed_text: units::format_speed(reading.wind_speed, unit),
            wind_direction: reading
                .wind_direction
                .map(|deg| format!("{}°", units::format_rounded(deg))),
            clouds: reading
                .clouds
                .map(|pct| format!("{}%", units::format_rounded(pct))),
            visibility: reading
                .visibility
                .map(|meters| format!("{:.1} km", meters / 1000.0)),
            sunrise,
            sunset,
        }
    }

    pub fn temperature_symbol(&self) -> &'static str {
        self.unit.temperature_symbol()
    }
}

fn clock_time<Tz: TimeZone>(unix: i64, tz: &Tz) -> Option<String>
where
    Tz::Offset: Display,
{
    DateTime::from_timestamp(unix, 0).map(|utc| utc.with_timezone(tz).format("%H:%M").to_string())
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
}

/// Line chart description: one x label per forecast point and three series.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
    pub x_title: String,
    pub y_title: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastCard {
    pub date: String,
    pub icon_url: Option<String>,
    pub icon_alt: String,
    pub description: String,
    pub average_temperature: String,
    pub average_humidity: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastView {
    pub chart: ChartSpec,
    pub cards: Vec<ForecastCard>,
}

impl ForecastView {
    pub fn build(aggregate: &ForecastAggregate) -> Self {
        let symbol = aggregate.unit.temperature_symbol();
        let series = &aggregate.series;

        let chart = ChartSpec {
            labels: series.labels.clone(),
            datasets: vec![
                Dataset {
                    label: format!("Temperature ({symbol})"),
                    data: series.temperature.clone(),
                },
                Dataset {
                    label: format!("Min Temperature ({symbol})"),
                    data: series.temperature_min.clone(),
                },
                Dataset {
                    label: format!("Max Temperature ({symbol})"),
                    data: series.temperature_max.clone(),
                },
            ],
            x_title: "Time".to_string(),
            y_title: format!("Temperature ({symbol})"),
        };

        let cards = aggregate
            .days
            .iter()
            .map(|day| ForecastCard {
                date: day.date().format("%a, %b %-d").to_string(),
                icon_url: icon_url(day.icon()),
                icon_alt: day.description().to_string(),
                description: day.description().to_string(),
                average_temperature: format!("{:.1}{symbol}", day.avg_temperature()),
                average_humidity: format!(
                    "Humidity: {}%",
                    units::format_rounded(day.avg_humidity())
                ),
            })
            .collect();

        Self { chart, cards }
    }
}
