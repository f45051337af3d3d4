//! The seams between the controller and whatever draws the dashboard.

use std::fmt;

use crate::{
    render::{ChartSpec, CurrentPanel, ForecastCard},
    units::Unit,
};

/// The two mutually exclusive panels. Each also owns an error slot and a
/// loading indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    #[default]
    Current,
    Forecast,
}

impl Tab {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::Current => "current",
            Tab::Forecast => "forecast",
        }
    }

    pub(crate) fn slot(&self) -> usize {
        match self {
            Tab::Current => 0,
            Tab::Forecast => 1,
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the controller can do to the screen.
///
/// Methods take `&self`: a view is a handle onto a display surface, the same
/// way DOM nodes are, and keeps whatever interior state it needs.
pub trait DashboardView: Send + Sync {
    fn set_location_input(&self, value: &str);
    fn set_active_tab(&self, tab: Tab);
    fn set_unit(&self, unit: Unit);
    fn set_loading(&self, tab: Tab, loading: bool);
    fn show_error(&self, tab: Tab, message: &str);
    fn hide_error(&self, tab: Tab);
    fn hide_current(&self);
    fn render_current(&self, panel: &CurrentPanel);
    fn clear_forecast_cards(&self);
    fn render_forecast_cards(&self, cards: &[ForecastCard]);
    /// Disables the geolocation control and shows a spinner while `busy`.
    fn set_geolocate_busy(&self, busy: bool);
}

/// A live chart instance.
pub trait Chart: Send {
    /// Releases the drawing surface. Called before a replacement is built.
    fn destroy(self: Box<Self>);
}

pub trait ChartFactory: Send + Sync {
    /// `None` when there is nowhere to draw.
    fn create(&self, spec: &ChartSpec) -> Option<Box<dyn Chart>>;
}
