//! Wires user actions to backend calls and to the view.
//!
//! Each action is an async method. Failures are caught where they happen and
//! turned into an error panel for the matching tab; nothing is returned to
//! the caller. Loading indicators and the geolocation control are reset by
//! drop guards, so they are restored on every exit path.

use std::sync::Arc;

use chrono::Local;
use parking_lot::Mutex;

use crate::{
    client::WeatherApi,
    error::DashboardError,
    forecast,
    geolocation::Geolocator,
    model::{ForecastPoint, Location},
    render::{CurrentPanel, ForecastView},
    state::{CurrentWeatherModel, DisplaySession, ForecastModel, RequestTicket},
    units::Unit,
    view::{ChartFactory, DashboardView, Tab},
};

pub struct ViewController<V> {
    client: Arc<dyn WeatherApi>,
    geolocator: Arc<dyn Geolocator>,
    charts: Arc<dyn ChartFactory>,
    view: V,
    session: Mutex<DisplaySession>,
    quick_cities: Vec<String>,
}

impl<V: DashboardView> ViewController<V> {
    pub fn new(
        client: Arc<dyn WeatherApi>,
        geolocator: Arc<dyn Geolocator>,
        charts: Arc<dyn ChartFactory>,
        view: V,
        unit: Unit,
    ) -> Self {
        view.set_unit(unit);
        view.set_active_tab(Tab::Current);
        Self {
            client,
            geolocator,
            charts,
            view,
            session: Mutex::new(DisplaySession::new(unit)),
            quick_cities: Vec::new(),
        }
    }

    pub fn with_quick_cities(mut self, cities: Vec<String>) -> Self {
        self.quick_cities = cities;
        self
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn quick_cities(&self) -> &[String] {
        &self.quick_cities
    }

    pub fn unit(&self) -> Unit {
        self.session.lock().unit()
    }

    pub fn active_tab(&self) -> Tab {
        self.session.lock().active_tab()
    }

    pub fn last_location(&self) -> Option<Location> {
        self.session.lock().last_location().cloned()
    }

    /// Search button or Enter in the location field.
    pub async fn search(&self, input: &str) {
        let Some(location) = Location::parse(input) else {
            tracing::debug!("Ignoring empty search");
            return;
        };
        self.load_location(location).await;
    }

    /// Fills the location field with the tag's city and searches for it.
    pub async fn select_quick_city(&self, city: &str) {
        self.view.set_location_input(city);
        self.search(city).await;
    }

    /// "Use my location": position, then reverse geocoding, then a search
    /// for the resolved city.
    pub async fn geolocate(&self) {
        let resolved = {
            let _busy = BusyGuard::engage(&self.view);
            self.resolve_city().await
        };

        match resolved {
            Ok(city) => {
                self.view.set_location_input(city.as_str());
                self.load_location(city).await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "Geolocation failed");
                self.view.show_error(Tab::Current, err.user_message());
            }
        }
    }

    pub async fn switch_tab(&self, tab: Tab) {
        let (location, needs_fetch) = {
            let mut session = self.session.lock();
            session.set_active_tab(tab);
            let needs_fetch = match tab {
                Tab::Current => session.current().is_none(),
                Tab::Forecast => !session.has_forecast_cards(),
            };
            (session.last_location().cloned(), needs_fetch)
        };
        self.view.set_active_tab(tab);

        let Some(location) = location else {
            return;
        };
        if needs_fetch {
            match tab {
                Tab::Current => self.load_current(&location).await,
                Tab::Forecast => self.load_forecast(&location).await,
            }
        }
    }

    /// Switches units. Whatever is already on screen is redrawn from memory;
    /// the forecast is fetched again only while its tab is active.
    pub async fn toggle_unit(&self, unit: Unit) {
        let refetch = {
            let mut session = self.session.lock();
            if !session.set_unit(unit) {
                return;
            }
            self.view.set_unit(unit);

            if let Some(model) = session.current() {
                let panel = CurrentPanel::build(&model.reading, &model.rendered_at, unit);
                self.view.render_current(&panel);
            }

            match session.last_location().cloned() {
                Some(location) if session.active_tab() == Tab::Forecast => Some(location),
                _ => {
                    if let Some(points) = session.forecast().map(|f| f.points.clone()) {
                        self.render_forecast(&mut session, points);
                    }
                    None
                }
            }
        };

        if let Some(location) = refetch {
            self.load_forecast(&location).await;
        }
    }

    async fn resolve_city(&self) -> Result<Location, DashboardError> {
        let position = self.geolocator.current_position().await?;
        tracing::debug!(lat = position.latitude, lon = position.longitude, "Got position");

        let place = self.client.reverse_geocode(position).await?;
        Location::parse(&place.city).ok_or(DashboardError::EmptyResult)
    }

    async fn load_location(&self, location: Location) {
        let forecast_active = {
            let mut session = self.session.lock();
            session.remember_location(location.clone());
            session.active_tab() == Tab::Forecast
        };

        let current = self.load_current(&location);
        let forecast = async {
            if forecast_active {
                self.load_forecast(&location).await;
            }
        };
        tokio::join!(current, forecast);
    }

    async fn load_current(&self, location: &Location) {
        let ticket = {
            let mut session = self.session.lock();
            session.set_current(None);
            session.begin_request(Tab::Current)
        };
        let _loading = LoadingGuard::engage(self, ticket);
        self.view.hide_current();
        self.view.hide_error(Tab::Current);

        let result = self.client.current_weather(location).await;

        let mut session = self.session.lock();
        if !session.is_latest(ticket) {
            tracing::debug!(%location, "Discarding stale current-weather response");
            return;
        }
        match result {
            Ok(reading) => {
                let model = CurrentWeatherModel {
                    reading,
                    rendered_at: Local::now(),
                };
                let panel =
                    CurrentPanel::build(&model.reading, &model.rendered_at, session.unit());
                session.set_current(Some(model));
                self.view.render_current(&panel);
                tracing::info!(%location, "Rendered current weather");
            }
            Err(err) => {
                let status = err.status().map(|s| s.as_u16());
                let err = DashboardError::from(err);
                tracing::warn!(
                    %location,
                    ?status,
                    error = %err,
                    "Current weather request failed"
                );
                self.view.show_error(Tab::Current, err.user_message());
            }
        }
    }

    async fn load_forecast(&self, location: &Location) {
        let ticket = {
            let mut session = self.session.lock();
            session.set_forecast(None);
            session.begin_request(Tab::Forecast)
        };
        let _loading = LoadingGuard::engage(self, ticket);
        self.view.hide_error(Tab::Forecast);
        self.view.clear_forecast_cards();

        let result = self.client.forecast(location).await;

        let mut session = self.session.lock();
        if !session.is_latest(ticket) {
            tracing::debug!(%location, "Discarding stale forecast response");
            return;
        }
        match result {
            Ok(points) => {
                self.render_forecast(&mut session, points);
                tracing::info!(%location, "Rendered forecast");
            }
            Err(err) => {
                let status = err.status().map(|s| s.as_u16());
                let err = DashboardError::from(err);
                tracing::warn!(%location, ?status, error = %err, "Forecast request failed");
                self.view.show_error(Tab::Forecast, err.user_message());
            }
        }
    }

    /// Rebuilds chart and cards from scratch in the session's unit.
    fn render_forecast(&self, session: &mut DisplaySession, points: Vec<ForecastPoint>) {
        let aggregate = forecast::aggregate(&points, session.unit(), &Local);
        let view = ForecastView::build(&aggregate);

        session.rebuild_chart(self.charts.as_ref(), &view.chart);
        self.view.clear_forecast_cards();
        self.view.render_forecast_cards(&view.cards);
        session.set_forecast(Some(ForecastModel {
            points,
            card_count: view.cards.len(),
        }));
    }
}

/// Shows the loading indicator for a tab and hides it on drop, unless a newer
/// request for the same tab has taken over the indicator.
struct LoadingGuard<'a, V: DashboardView> {
    controller: &'a ViewController<V>,
    ticket: RequestTicket,
}

impl<'a, V: DashboardView> LoadingGuard<'a, V> {
    fn engage(controller: &'a ViewController<V>, ticket: RequestTicket) -> Self {
        controller.view.set_loading(ticket.tab(), true);
        Self { controller, ticket }
    }
}

impl<V: DashboardView> Drop for LoadingGuard<'_, V> {
    fn drop(&mut self) {
        if self.controller.session.lock().is_latest(self.ticket) {
            self.controller.view.set_loading(self.ticket.tab(), false);
        }
    }
}

/// Disables the geolocation control until dropped.
struct BusyGuard<'a, V: DashboardView> {
    view: &'a V,
}

impl<'a, V: DashboardView> BusyGuard<'a, V> {
    fn engage(view: &'a V) -> Self {
        view.set_geolocate_busy(true);
        Self { view }
    }
}

impl<V: DashboardView> Drop for BusyGuard<'_, V> {
    fn drop(&mut self) {
        self.view.set_geolocate_busy(false);
    }
}
