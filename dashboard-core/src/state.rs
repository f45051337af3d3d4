//! Per-session presentation state: unit, tab, last location, what is on
//! screen, and the single live chart.

use chrono::{DateTime, Local};

use crate::{
    model::{CurrentWeatherReading, ForecastPoint, Location},
    render::ChartSpec,
    units::Unit,
    view::{Chart, ChartFactory, Tab},
};

/// The reading behind the current-weather panel, kept so the panel can be
/// redrawn in another unit without a request.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentWeatherModel {
    pub reading: CurrentWeatherReading,
    pub rendered_at: DateTime<Local>,
}

/// The points behind the rendered forecast.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastModel {
    pub points: Vec<ForecastPoint>,
    /// Number of day cards on screen.
    pub card_count: usize,
}

/// Opaque ticket for an in-flight request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    tab: Tab,
    generation: u64,
}

impl RequestTicket {
    pub fn tab(&self) -> Tab {
        self.tab
    }
}

#[derive(Default)]
pub struct DisplaySession {
    unit: Unit,
    active_tab: Tab,
    last_location: Option<Location>,
    current: Option<CurrentWeatherModel>,
    forecast: Option<ForecastModel>,
    chart: Option<Box<dyn Chart>>,
    generations: [u64; 2],
}

impl std::fmt::Debug for DisplaySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisplaySession")
            .field("unit", &self.unit)
            .field("active_tab", &self.active_tab)
            .field("last_location", &self.last_location)
            .field("current", &self.current.is_some())
            .field("forecast", &self.forecast.as_ref().map(|f| f.points.len()))
            .field("chart", &self.chart.is_some())
            .field("generations", &self.generations)
            .finish()
    }
}

impl DisplaySession {
    pub fn new(unit: Unit) -> Self {
        Self {
            unit,
            ..Self::default()
        }
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    /// Returns `false` when `unit` is already active.
    pub fn set_unit(&mut self, unit: Unit) -> bool {
        if self.unit == unit {
            return false;
        }
        self.unit = unit;
        true
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn set_active_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
    }

    pub fn last_location(&self) -> Option<&Location> {
        self.last_location.as_ref()
    }

    pub fn remember_location(&mut self, location: Location) {
        self.last_location = Some(location);
    }

    pub fn current(&self) -> Option<&CurrentWeatherModel> {
        self.current.as_ref()
    }

    pub fn set_current(&mut self, model: Option<CurrentWeatherModel>) {
        self.current = model;
    }

    pub fn forecast(&self) -> Option<&ForecastModel> {
        self.forecast.as_ref()
    }

    pub fn set_forecast(&mut self, model: Option<ForecastModel>) {
        self.forecast = model;
    }

    /// True when at least one forecast card is on screen.
    pub fn has_forecast_cards(&self) -> bool {
        self.forecast.as_ref().is_some_and(|f| f.card_count > 0)
    }

    #[cfg(test)]
    fn has_chart(&self) -> bool {
        self.chart.is_some()
    }

    /// Destroys the live chart, if any, and only then builds the replacement.
    pub fn rebuild_chart(&mut self, factory: &dyn ChartFactory, spec: &ChartSpec) {
        if let Some(old) = self.chart.take() {
            tracing::debug!("Destroying previous forecast chart");
            old.destroy();
        }
        self.chart = factory.create(spec);
    }

    /// Starts a new request for `tab`, superseding any earlier one.
    pub fn begin_request(&mut self, tab: Tab) -> RequestTicket {
        let slot = &mut self.generations[tab.slot()];
        *slot += 1;
        RequestTicket {
            tab,
            generation: *slot,
        }
    }

    /// False once a newer request for the same tab has been issued.
    pub fn is_latest(&self, ticket: RequestTicket) -> bool {
        self.generations[ticket.tab.slot()] == ticket.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Default)]
    struct Log(Mutex<Vec<String>>);

    struct LoggedChart {
        id: usize,
        log: Arc<Log>,
    }

    impl Chart for LoggedChart {
        fn destroy(self: Box<Self>) {
            self.log.0.lock().push(format!("destroy {}", self.id));
        }
    }

    struct LoggedFactory(Arc<Log>);

    impl ChartFactory for LoggedFactory {
        fn create(&self, _spec: &ChartSpec) -> Option<Box<dyn Chart>> {
            let mut log = self.0.0.lock();
            let id = log.iter().filter(|l| l.starts_with("create")).count() + 1;
            log.push(format!("create {id}"));
            Some(Box::new(LoggedChart {
                id,
                log: self.0.clone(),
            }))
        }
    }

    fn spec() -> ChartSpec {
        ChartSpec {
            labels: vec![],
            datasets: vec![],
            x_title: "Time".into(),
            y_title: "Temperature (°C)".into(),
        }
    }

    #[test]
    fn set_unit_reports_changes_only() {
        let mut session = DisplaySession::new(Unit::Metric);
        assert!(!session.set_unit(Unit::Metric));
        assert!(session.set_unit(Unit::Imperial));
        assert_eq!(session.unit(), Unit::Imperial);
    }

    #[test]
    fn old_chart_is_destroyed_before_new_one_is_created() {
        let log = Arc::new(Log::default());
        let factory = LoggedFactory(log.clone());
        let mut session = DisplaySession::default();

        session.rebuild_chart(&factory, &spec());
        session.rebuild_chart(&factory, &spec());
        session.rebuild_chart(&factory, &spec());

        assert_eq!(
            *log.0.lock(),
            vec!["create 1", "destroy 1", "create 2", "destroy 2", "create 3"]
        );
        assert!(session.has_chart());
    }

    #[test]
    fn newer_request_supersedes_older() {
        let mut session = DisplaySession::default();

        let first = session.begin_request(Tab::Current);
        let forecast = session.begin_request(Tab::Forecast);
        let second = session.begin_request(Tab::Current);

        assert!(!session.is_latest(first));
        assert!(session.is_latest(second));
        assert!(session.is_latest(forecast));
        assert_eq!(second.tab(), Tab::Current);
    }

    #[test]
    fn forecast_cards_require_a_non_empty_model() {
        let mut session = DisplaySession::default();
        assert!(!session.has_forecast_cards());

        session.set_forecast(Some(ForecastModel::default()));
        assert!(!session.has_forecast_cards());

        session.set_forecast(Some(ForecastModel {
            points: vec![ForecastPoint::default()],
            card_count: 1,
        }));
        assert!(session.has_forecast_cards());
    }
}
