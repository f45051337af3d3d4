//! Groups 3-hour forecast points into per-day buckets and chart series.
//!
//! The aggregator does not sort: points are taken in the order the backend
//! delivered them, and daily buckets keep the order in which their date was
//! first seen.

use std::{collections::HashMap, fmt::Display};

use chrono::{DateTime, NaiveDate, TimeZone};

use crate::{
    model::ForecastPoint,
    units::{self, Unit},
};

/// Parallel per-point series for the line chart, already unit-converted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSeries {
    /// Local `HH:MM`.
    pub labels: Vec<String>,
    pub temperature: Vec<f64>,
    pub temperature_min: Vec<f64>,
    pub temperature_max: Vec<f64>,
}

impl ChartSeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// All forecast points that share one local calendar date.
///
/// A bucket is created from its first point, so it is never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyForecastBucket {
    date: NaiveDate,
    icon: String,
    description: String,
    temperatures: Vec<f64>,
    humidity: Vec<f64>,
}

impl DailyForecastBucket {
    fn new(date: NaiveDate, first: &ForecastPoint, temperature: f64) -> Self {
        Self {
            date,
            icon: first.icon.clone(),
            description: first.description.clone(),
            temperatures: vec![temperature],
            humidity: vec![first.humidity],
        }
    }

    fn push(&mut self, temperature: f64, humidity: f64) {
        self.temperatures.push(temperature);
        self.humidity.push(humidity);
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Temperatures in the unit the aggregation ran with.
    pub fn temperatures(&self) -> &[f64] {
        &self.temperatures
    }

    pub fn humidity(&self) -> &[f64] {
        &self.humidity
    }

    pub fn avg_temperature(&self) -> f64 {
        mean(&self.temperatures)
    }

    pub fn avg_humidity(&self) -> f64 {
        mean(&self.humidity)
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Insertion-ordered map from local date to bucket.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyBuckets {
    buckets: Vec<DailyForecastBucket>,
    index: HashMap<NaiveDate, usize>,
}

impl DailyBuckets {
    fn add(&mut self, date: NaiveDate, point: &ForecastPoint, temperature: f64) {
        match self.index.get(&date) {
            Some(&slot) => self.buckets[slot].push(temperature, point.humidity),
            None => {
                self.index.insert(date, self.buckets.len());
                self.buckets
                    .push(DailyForecastBucket::new(date, point, temperature));
            }
        }
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DailyForecastBucket> {
        self.index.get(&date).map(|&slot| &self.buckets[slot])
    }

    /// Buckets in first-seen order of their dates.
    pub fn iter(&self) -> impl Iterator<Item = &DailyForecastBucket> {
        self.buckets.iter()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastAggregate {
    pub unit: Unit,
    pub series: ChartSeries,
    pub days: DailyBuckets,
}

/// Single pass over `points` producing both the chart series and the daily
/// buckets, with times and dates taken in `tz`.
pub fn aggregate<Tz>(points: &[ForecastPoint], unit: Unit, tz: &Tz) -> ForecastAggregate
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut series = ChartSeries::default();
    let mut days = DailyBuckets::default();

    for point in points {
        let Some(utc) = DateTime::from_timestamp(point.dt, 0) else {
            tracing::warn!(dt = point.dt, "Skipping forecast point with out-of-range timestamp");
            continue;
        };
        let local = utc.with_timezone(tz);
        let temperature = units::temperature(point.temp, unit);

        series.labels.push(local.format("%H:%M").to_string());
        series.temperature.push(temperature);
        series
            .temperature_min
            .push(units::temperature(point.temp_min, unit));
        series
            .temperature_max
            .push(units::temperature(point.temp_max, unit));

        days.add(local.date_naive(), point, temperature);
    }

    ForecastAggregate { unit, series, days }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    // 2024-03-10 00:00:00 UTC
    const MAR_10: i64 = 1_710_028_800;
    const HOUR: i64 = 3_600;
    const DAY: i64 = 24 * HOUR;

    fn point(dt: i64, temp: f64, humidity: f64, icon: &str) -> ForecastPoint {
        ForecastPoint {
            dt,
            temp,
            temp_min: temp - 1.0,
            temp_max: temp + 1.0,
            humidity,
            icon: icon.to_string(),
            description: format!("desc {icon}"),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn two_dates_make_two_buckets() {
        let points = vec![
            point(MAR_10 + 9 * HOUR, 10.0, 40.0, "01d"),
            point(MAR_10 + 12 * HOUR, 20.0, 60.0, "02d"),
            point(MAR_10 + DAY + 9 * HOUR, 5.0, 90.0, "10d"),
        ];

        let agg = aggregate(&points, Unit::Metric, &Utc);

        assert_eq!(agg.days.len(), 2);
        let first = agg.days.get(date(2024, 3, 10)).unwrap();
        assert_eq!(first.temperatures(), &[10.0, 20.0]);
        assert_eq!(first.icon(), "01d");
        assert_eq!(first.description(), "desc 01d");
        let second = agg.days.get(date(2024, 3, 11)).unwrap();
        assert_eq!(second.temperatures(), &[5.0]);
    }

    #[test]
    fn bucket_order_follows_first_occurrence() {
        let points = vec![
            point(MAR_10 + DAY, 1.0, 50.0, "a"),
            point(MAR_10, 2.0, 50.0, "b"),
            point(MAR_10 + DAY + 3 * HOUR, 3.0, 50.0, "c"),
        ];

        let agg = aggregate(&points, Unit::Metric, &Utc);
        let order: Vec<_> = agg.days.iter().map(|b| b.date()).collect();

        assert_eq!(order, vec![date(2024, 3, 11), date(2024, 3, 10)]);
        assert_eq!(agg.days.iter().next().unwrap().temperatures(), &[1.0, 3.0]);
    }

    #[test]
    fn averages() {
        let points = vec![
            point(MAR_10, 10.0, 40.0, "x"),
            point(MAR_10 + 3 * HOUR, 20.0, 60.0, "x"),
            point(MAR_10 + 6 * HOUR, 30.0, 50.0, "x"),
        ];

        let agg = aggregate(&points, Unit::Metric, &Utc);
        let bucket = agg.days.iter().next().unwrap();

        assert_eq!(bucket.avg_temperature(), 20.0);
        assert_eq!(bucket.avg_humidity(), 50.0);
    }

    #[test]
    fn humidity_average_of_two() {
        let points = vec![
            point(MAR_10, 10.0, 40.0, "x"),
            point(MAR_10 + 3 * HOUR, 10.0, 60.0, "x"),
        ];
        let agg = aggregate(&points, Unit::Metric, &Utc);
        assert_eq!(agg.days.iter().next().unwrap().avg_humidity(), 50.0);
    }

    #[test]
    fn empty_input() {
        let agg = aggregate(&[], Unit::Imperial, &Utc);
        assert!(agg.days.is_empty());
        assert!(agg.series.is_empty());
        assert_eq!(agg.series.temperature_min.len(), 0);
    }

    #[test]
    fn series_is_converted_but_humidity_is_raw() {
        let points = vec![point(MAR_10 + 15 * HOUR, 0.0, 70.0, "x")];

        let agg = aggregate(&points, Unit::Imperial, &Utc);

        assert_eq!(agg.series.labels, vec!["15:00".to_string()]);
        assert_eq!(agg.series.temperature, vec![32.0]);
        assert!((agg.series.temperature_min[0] - 30.2).abs() < 1e-9);
        assert!((agg.series.temperature_max[0] - 33.8).abs() < 1e-9);
        let bucket = agg.days.iter().next().unwrap();
        assert_eq!(bucket.temperatures(), &[32.0]);
        assert_eq!(bucket.humidity(), &[70.0]);
    }

    #[test]
    fn dates_and_labels_use_the_given_timezone() {
        // 22:00 UTC on the 10th is already the 11th at UTC+3.
        let points = vec![
            point(MAR_10 + 20 * HOUR, 1.0, 50.0, "a"),
            point(MAR_10 + 22 * HOUR, 2.0, 50.0, "b"),
        ];
        let plus_three = FixedOffset::east_opt(3 * 3600).unwrap();

        let agg = aggregate(&points, Unit::Metric, &plus_three);

        assert_eq!(agg.series.labels, vec!["23:00", "01:00"]);
        let order: Vec<_> = agg.days.iter().map(|b| b.date()).collect();
        assert_eq!(order, vec![date(2024, 3, 10), date(2024, 3, 11)]);
    }
}
