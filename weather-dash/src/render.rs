//! Plain-text rendering of dashboard snapshots.

use std::fmt::Write;

use weather_dash_core::{
    ApplicationState, FavoriteEntry, ForecastEntry, RecentSearchEntry, TemperatureUnit,
    forecast::{daily, hourly},
    units::{format_temperature, weather_advice, wind_direction},
};

pub fn current(state: &ApplicationState) -> String {
    let current = &state.current;
    let c = &current.conditions;
    let unit = state.unit;
    let star = if current.is_favorite { " ★" } else { "" };

    let mut out = String::new();
    let _ = writeln!(out, "{}{star}", current.location);
    let _ = writeln!(
        out,
        "  {} {}  {}  (feels like {})",
        c.condition.icon(),
        c.condition,
        format_temperature(c.temperature, unit),
        format_temperature(c.feels_like, unit),
    );
    let _ = writeln!(
        out,
        "  Humidity {}%  Wind {} km/h {}  Pressure {} hPa  Visibility {} km",
        c.humidity,
        c.wind_speed.round(),
        wind_direction(f64::from(c.wind_direction)),
        c.pressure.round(),
        c.visibility,
    );
    let _ = writeln!(out, "  Sunrise {}  Sunset {}", c.sunrise, c.sunset);
    let _ = writeln!(out, "  {}", weather_advice(c));

    if let Some(error) = &state.error {
        let _ = writeln!(out, "  ! {error}");
    }

    out
}

pub fn hourly_forecast(forecast: &[ForecastEntry], unit: TemperatureUnit) -> String {
    let mut out = String::from("Next hours:\n");
    for entry in hourly(forecast) {
        let _ = writeln!(
            out,
            "  {}  {} {:<14} {:>6}  rain {:>2}%",
            entry.time.format("%a %H:%M"),
            entry.condition.icon(),
            entry.condition.to_string(),
            format_temperature(entry.temp.headline(), unit),
            entry.rain_chance,
        );
    }
    out
}

pub fn daily_forecast(forecast: &[ForecastEntry], unit: TemperatureUnit) -> String {
    let mut out = String::from("Next days:\n");
    for entry in daily(forecast) {
        let (min, max) = entry.temp.bounds();
        let _ = writeln!(
            out,
            "  {:<16} {} {:<14} {:>6} / {:<6} humidity {}%",
            entry.time.format("%A, %b %-d").to_string(),
            entry.condition.icon(),
            entry.condition.to_string(),
            format_temperature(max, unit),
            format_temperature(min, unit),
            entry.humidity.round(),
        );
    }
    out
}

pub fn favorites(favorites: &[FavoriteEntry]) -> String {
    if favorites.is_empty() {
        return "No favorite locations yet.\n".to_string();
    }

    let mut out = String::from("Favorites:\n");
    for fav in favorites {
        let _ = writeln!(
            out,
            "  ★ {}, {}  ({:.2}, {:.2})  added {}",
            fav.name,
            fav.country,
            fav.lat,
            fav.lon,
            fav.added_at.format("%Y-%m-%d"),
        );
    }
    out
}

pub fn recent(searches: &[RecentSearchEntry]) -> String {
    if searches.is_empty() {
        return "No recent searches.\n".to_string();
    }

    let mut out = String::from("Recent searches:\n");
    for search in searches {
        let _ = writeln!(out, "  {}  {}", search.timestamp.format("%Y-%m-%d %H:%M"), search.query);
    }
    out
}
