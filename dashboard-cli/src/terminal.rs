//! Terminal implementations of the dashboard view and chart.

use std::{
    fmt::Write as _,
    io::{self, Write},
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use parking_lot::Mutex;
use weather_dashboard_core::{
    Chart, ChartFactory, ChartSpec, CurrentPanel, DashboardView, ForecastCard, Tab, Unit,
};

const SPARK: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Writes the dashboard as plain text blocks.
pub struct TerminalView<W: Write + Send> {
    out: Arc<Mutex<W>>,
}

impl TerminalView<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Arc::new(Mutex::new(out)),
        }
    }

    /// A chart factory drawing into the same output as this view.
    pub fn charts(&self) -> TerminalCharts<W> {
        TerminalCharts {
            out: Arc::clone(&self.out),
            created: AtomicUsize::new(0),
        }
    }

    #[cfg(test)]
    pub fn contents(&self) -> W
    where
        W: Clone,
    {
        self.out.lock().clone()
    }

    fn emit(&self, text: &str) {
        emit(&self.out, text);
    }
}

fn emit<W: Write>(out: &Mutex<W>, text: &str) {
    let mut out = out.lock();
    if let Err(e) = writeln!(out, "{text}").and_then(|_| out.flush()) {
        tracing::warn!(error = %e, "Failed to write to terminal");
    }
}

impl<W: Write + Send> DashboardView for TerminalView<W> {
    fn set_location_input(&self, value: &str) {
        self.emit(&format!("Location: {value}"));
    }

    fn set_active_tab(&self, tab: Tab) {
        self.emit(&format!("[{tab}]"));
    }

    fn set_unit(&self, unit: Unit) {
        self.emit(&format!("Units: {unit} ({})", unit.temperature_symbol()));
    }

    fn set_loading(&self, tab: Tab, loading: bool) {
        if loading {
            self.emit(&format!("Loading {tab} weather..."));
        }
    }

    fn show_error(&self, tab: Tab, message: &str) {
        self.emit(&format!("! {tab}: {message}"));
    }

    fn hide_error(&self, _tab: Tab) {}

    fn hide_current(&self) {}

    fn render_current(&self, panel: &CurrentPanel) {
        self.emit(&format_current(panel));
    }

    fn clear_forecast_cards(&self) {}

    fn render_forecast_cards(&self, cards: &[ForecastCard]) {
        if cards.is_empty() {
            self.emit("No forecast days.");
        } else {
            self.emit(&format_cards(cards));
        }
    }

    fn set_geolocate_busy(&self, busy: bool) {
        if busy {
            self.emit("Locating...");
        }
    }
}

pub fn format_current(panel: &CurrentPanel) -> String {
    let symbol = panel.temperature_symbol();
    let mut s = String::new();
    let _ = writeln!(s, "== {} ({}) ==", panel.location, panel.time);
    let _ = writeln!(
        s,
        "{}{}  {}",
        panel.temperature_text, symbol, panel.description
    );
    let _ = writeln!(s, "Feels like  {}{}", panel.feels_like_text, symbol);
    let _ = writeln!(s, "Humidity    {}", panel.humidity);
    let _ = writeln!(s, "Pressure    {}", panel.pressure);
    let wind = match &panel.wind_direction {
        Some(dir) => format!("{} from {dir}", panel.wind_speed_text),
        None => panel.wind_speed_text.clone(),
    };
    let _ = writeln!(s, "Wind        {wind}");
    if let Some(clouds) = &panel.clouds {
        let _ = writeln!(s, "Clouds      {clouds}");
    }
    if let Some(visibility) = &panel.visibility {
        let _ = writeln!(s, "Visibility  {visibility}");
    }
    if let (Some(rise), Some(set)) = (&panel.sunrise, &panel.sunset) {
        let _ = writeln!(s, "Sun         {rise} / {set}");
    }
    if let Some(url) = &panel.icon_url {
        let _ = write!(s, "Icon        {url}");
    }
    s.trim_end().to_string()
}

pub fn format_cards(cards: &[ForecastCard]) -> String {
    cards
        .iter()
        .map(|card| {
            format!(
                "{:<12} {:>8}  {:<14} {}",
                card.date, card.average_temperature, card.average_humidity, card.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One block character per value, scaled between the series min and max.
pub fn sparkline(values: &[f64]) -> String {
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let span = max - min;
    values
        .iter()
        .map(|&v| {
            if span <= f64::EPSILON {
                SPARK[SPARK.len() / 2]
            } else {
                let idx = ((v - min) / span * (SPARK.len() - 1) as f64).round() as usize;
                SPARK[idx.min(SPARK.len() - 1)]
            }
        })
        .collect()
}

pub fn format_chart(spec: &ChartSpec) -> String {
    let mut s = String::new();
    let _ = writeln!(s, "{} by {}", spec.y_title, spec.x_title);
    if let (Some(first), Some(last)) = (spec.labels.first(), spec.labels.last()) {
        let _ = writeln!(s, "{first} .. {last}");
    }
    for dataset in &spec.datasets {
        let _ = writeln!(s, "{:<28} {}", dataset.label, sparkline(&dataset.data));
    }
    s.trim_end().to_string()
}

/// Draws a chart when created; destroying it only releases the handle.
pub struct TerminalCharts<W: Write + Send> {
    out: Arc<Mutex<W>>,
    created: AtomicUsize,
}

struct TerminalChart {
    id: usize,
}

impl Chart for TerminalChart {
    fn destroy(self: Box<Self>) {
        tracing::debug!(chart = self.id, "Released terminal chart");
    }
}

impl<W: Write + Send> ChartFactory for TerminalCharts<W> {
    fn create(&self, spec: &ChartSpec) -> Option<Box<dyn Chart>> {
        if spec.labels.is_empty() {
            return None;
        }
        let id = self.created.fetch_add(1, Ordering::Relaxed) + 1;
        emit(&self.out, &format_chart(spec));
        Some(Box::new(TerminalChart { id }))
    }
}
