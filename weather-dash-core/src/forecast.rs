use crate::model::{FORECAST_STEP_HOURS, ForecastEntry};

/// Slots shown on the hourly tab.
pub const HOURLY_SLOTS: usize = 12;

/// Days shown on the daily tab.
pub const DAILY_SLOTS: usize = 5;

const SLOTS_PER_DAY: usize = (24 / FORECAST_STEP_HOURS) as usize;

pub fn hourly(forecast: &[ForecastEntry]) -> &[ForecastEntry] {
    &forecast[..forecast.len().min(HOURLY_SLOTS)]
}

/// One slot per day: every eighth entry, at most five.
pub fn daily(forecast: &[ForecastEntry]) -> Vec<&ForecastEntry> {
    forecast.iter().step_by(SLOTS_PER_DAY).take(DAILY_SLOTS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ForecastTemp, WeatherCondition};
    use chrono::{Duration, Utc};

    fn forecast(len: usize) -> Vec<ForecastEntry> {
        let start = Utc::now();
        (0..len)
            .map(|i| ForecastEntry {
                time: start + Duration::hours(i as i64 * FORECAST_STEP_HOURS),
                temp: ForecastTemp::Single(i as f64),
                condition: WeatherCondition::Cloudy,
                humidity: 50.0,
                wind_speed: 10.0,
                rain_chance: 10,
            })
            .collect()
    }

    #[test]
    fn full_horizon_views() {
        let entries = forecast(40);
        assert_eq!(hourly(&entries).len(), 12);

        let days = daily(&entries);
        assert_eq!(days.len(), 5);
        let picked: Vec<f64> = days.iter().map(|e| e.temp.headline()).collect();
        assert_eq!(picked, vec![0.0, 8.0, 16.0, 24.0, 32.0]);
    }

    #[test]
    fn short_forecast_views() {
        let entries = forecast(9);
        assert_eq!(hourly(&entries).len(), 9);
        assert_eq!(daily(&entries).len(), 2);
        assert!(daily(&[]).is_empty());
    }
}
