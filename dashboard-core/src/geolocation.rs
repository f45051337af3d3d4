use std::fmt::Debug;

use async_trait::async_trait;

use crate::{error::GeolocationError, model::Coordinates};

/// Source of the device position for the "use my location" action.
#[async_trait]
pub trait Geolocator: Send + Sync + Debug {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError>;
}

/// Reports a position fixed up front (config file or command line), or
/// `Unavailable` when none was given.
#[derive(Debug, Clone, Default)]
pub struct FixedGeolocator {
    position: Option<Coordinates>,
}

impl FixedGeolocator {
    pub fn new(position: Option<Coordinates>) -> Self {
        Self { position }
    }
}

#[async_trait]
impl Geolocator for FixedGeolocator {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        let position = self.position.ok_or(GeolocationError::Unavailable)?;
        if !(-90.0..=90.0).contains(&position.latitude)
            || !(-180.0..=180.0).contains(&position.longitude)
        {
            return Err(GeolocationError::Other(format!(
                "coordinates out of range: {}, {}",
                position.latitude, position.longitude
            )));
        }
        Ok(position)
    }
}
