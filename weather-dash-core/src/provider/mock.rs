use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use parking_lot::Mutex;
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::time::Duration;

use crate::{
    error::{FetchError, LocationError},
    model::{
        Conditions, FORECAST_ENTRIES, FORECAST_STEP_HOURS, ForecastEntry, ForecastTemp, Location,
        WeatherCondition, WeatherReport,
    },
    units::feels_like,
};

use super::WeatherDataSource;

/// Tuning for the mock generator.
#[derive(Debug, Clone, PartialEq)]
pub struct MockOptions {
    pub search_latency: Duration,
    pub location_latency: Duration,
    /// Probability in `0.0..=1.0` that a lookup fails.
    pub failure_rate: f64,
    /// Fixed seed for reproducible output.
    pub seed: Option<u64>,
}

impl Default for MockOptions {
    fn default() -> Self {
        Self {
            search_latency: Duration::from_millis(1000),
            location_latency: Duration::from_millis(1500),
            failure_rate: 0.0,
            seed: None,
        }
    }
}

impl MockOptions {
    /// No latency, no failures, fixed seed.
    pub fn instant() -> Self {
        Self {
            search_latency: Duration::ZERO,
            location_latency: Duration::ZERO,
            failure_rate: 0.0,
            seed: Some(0),
        }
    }
}

/// Generates plausible weather locally instead of calling a service.
#[derive(Debug)]
pub struct MockDataSource {
    options: MockOptions,
    rng: Mutex<StdRng>,
}

impl MockDataSource {
    pub fn new(options: MockOptions) -> Self {
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self { options, rng: Mutex::new(rng) }
    }

    fn forecast_from(rng: &mut StdRng, start: DateTime<Utc>) -> Vec<ForecastEntry> {
        let pool = WeatherCondition::forecast_pool();

        (0..FORECAST_ENTRIES)
            .map(|i| {
                let condition = pool[rng.random_range(0..pool.len())].clone();
                let rain_chance = if condition.is_wet() {
                    rng.random_range(0..100)
                } else {
                    rng.random_range(0..30)
                };

                ForecastEntry {
                    time: start + ChronoDuration::hours(i as i64 * FORECAST_STEP_HOURS),
                    temp: ForecastTemp::Range {
                        day: rng.random_range(20.0..30.0),
                        night: rng.random_range(10.0..15.0),
                        min: rng.random_range(10.0..15.0),
                        max: rng.random_range(25.0..30.0),
                    },
                    condition,
                    humidity: rng.random_range(40.0..80.0),
                    wind_speed: rng.random_range(5.0..25.0),
                    rain_chance,
                }
            })
            .collect()
    }

    fn lookup(&self, query: &str) -> Result<WeatherReport, FetchError> {
        if query.trim().is_empty() {
            return Err(FetchError::Rejected("query is empty".to_string()));
        }

        let mut rng = self.rng.lock();

        if self.options.failure_rate > 0.0 && rng.random_bool(self.options.failure_rate.min(1.0)) {
            return Err(FetchError::Unavailable);
        }

        let location = Location::from_query(query)
            .with_coordinates(rng.random_range(40.0..50.0), rng.random_range(-70.0..-60.0));

        let pool = WeatherCondition::current_pool();
        let now = Utc::now();

        let base = new_york_conditions(now);
        let temperature = rng.random_range(15.0..35.0);
        let conditions = Conditions {
            temperature,
            feels_like: feels_like(temperature, f64::from(base.humidity), base.wind_speed),
            condition: pool[rng.random_range(0..pool.len())].clone(),
            ..base
        };

        Ok(WeatherReport {
            location: Some(location),
            conditions,
            forecast: Self::forecast_from(&mut rng, now),
        })
    }
}

fn new_york() -> Location {
    Location::new("New York", "United States", 40.7128, -74.0060)
}

fn new_york_conditions(now: DateTime<Utc>) -> Conditions {
    Conditions {
        temperature: 22.0,
        feels_like: 24.0,
        condition: WeatherCondition::Sunny,
        humidity: 65,
        wind_speed: 12.0,
        wind_direction: 180,
        pressure: 1013.0,
        visibility: 10.0,
        sunrise: "06:30 AM".to_string(),
        sunset: "07:45 PM".to_string(),
        last_updated: now,
    }
}

#[async_trait]
impl WeatherDataSource for MockDataSource {
    fn initial_report(&self) -> WeatherReport {
        let now = Utc::now();
        let forecast = Self::forecast_from(&mut self.rng.lock(), now);

        WeatherReport { location: Some(new_york()), conditions: new_york_conditions(now), forecast }
    }

    async fn fetch(&self, query: &str) -> Result<WeatherReport, FetchError> {
        tokio::time::sleep(self.options.search_latency).await;
        self.lookup(query)
    }

    async fn resolve_device_location(&self) -> Result<Location, LocationError> {
        tokio::time::sleep(self.options.location_latency).await;
        Ok(Location::new("Current Location", "Based on your location", 40.7128, -74.0060))
    }
}
