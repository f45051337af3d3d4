use serde::{Deserialize, Deserializer, Serialize};

/// A trimmed, non-empty free-text location (city name or "lat,lon").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location(String);

impl Location {
    /// Returns `None` when the input is empty after trimming.
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Payload of `GET /api/current-weather`.
///
/// Every field is optional on the wire. Missing or `null` numbers become 0 and
/// missing strings become empty; only wind direction, cloud cover, visibility
/// and the sun times keep their absence, because the panel hides them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrentWeatherReading {
    #[serde(deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(deserialize_with = "null_as_default")]
    pub icon: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    /// °C
    #[serde(deserialize_with = "null_as_default")]
    pub temperature: f64,
    /// °C
    #[serde(deserialize_with = "null_as_default")]
    pub feels_like: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub humidity: f64,
    /// hPa
    #[serde(deserialize_with = "null_as_default")]
    pub pressure: f64,
    /// m/s
    #[serde(deserialize_with = "null_as_default")]
    pub wind_speed: f64,
    /// Degrees.
    pub wind_direction: Option<f64>,
    pub clouds: Option<f64>,
    /// Meters.
    pub visibility: Option<f64>,
    /// Unix seconds.
    pub sunrise: Option<i64>,
    pub sunset: Option<i64>,
}

/// One entry of the `GET /api/forecast` array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastPoint {
    /// Unix seconds.
    #[serde(deserialize_with = "null_as_default")]
    pub dt: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub temp: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub temp_min: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub temp_max: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub humidity: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub icon: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
}

/// Payload of `GET /api/reverse-geocode`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReverseGeocode {
    #[serde(deserialize_with = "null_as_default")]
    pub city: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
