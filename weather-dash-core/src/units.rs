//! Unit conversion and derived metrics.
//!
//! Everything here is pure. The store keeps temperatures in Celsius and the
//! display layer converts through [`display_temperature`].

use crate::model::{Conditions, TemperatureUnit, WeatherCondition};

pub fn convert_temperature(value: f64, from: TemperatureUnit, to: TemperatureUnit) -> f64 {
    match (from, to) {
        (TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit) => value * 9.0 / 5.0 + 32.0,
        (TemperatureUnit::Fahrenheit, TemperatureUnit::Celsius) => (value - 32.0) * 5.0 / 9.0,
        _ => value,
    }
}

/// Convert a canonical Celsius reading for presentation in `unit`.
pub fn display_temperature(celsius: f64, unit: TemperatureUnit) -> f64 {
    convert_temperature(celsius, TemperatureUnit::Celsius, unit)
}

/// Rounded reading with its unit suffix, e.g. `"72°F"`.
pub fn format_temperature(celsius: f64, unit: TemperatureUnit) -> String {
    format!("{}°{}", display_temperature(celsius, unit).round(), unit.symbol())
}

/// Nearest of the eight compass points.
pub fn wind_direction(degrees: f64) -> &'static str {
    const POINTS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];
    let wrapped = degrees.rem_euclid(360.0);
    let index = (wrapped / 45.0).round() as usize % POINTS.len();
    POINTS[index]
}

/// Apparent temperature in Celsius: a simplified heat index above 27°C,
/// wind chill at or below 10°C with wind over 4.8, otherwise the reading.
pub fn feels_like(temp_c: f64, humidity: f64, wind_speed: f64) -> f64 {
    if temp_c >= 27.0 {
        let t = temp_c;
        let h = humidity;
        let heat_index = -8.784_694_755_56
            + 1.611_394_11 * t
            + 2.338_548_838_89 * h
            - 0.146_116_05 * t * h
            - 0.012_308_094 * t.powi(2)
            - 0.016_424_827_777_8 * h.powi(2)
            + 0.002_211_732 * t.powi(2) * h
            + 0.000_725_46 * t * h.powi(2)
            - 0.000_003_582 * t.powi(2) * h.powi(2);
        return heat_index.round();
    }

    if temp_c <= 10.0 && wind_speed > 4.8 {
        let v = wind_speed.powf(0.16);
        let wind_chill = 13.12 + 0.6215 * temp_c - 11.37 * v + 0.3965 * temp_c * v;
        return wind_chill.round();
    }

    temp_c
}

impl WeatherCondition {
    pub fn icon(&self) -> &'static str {
        let text = self.description().to_lowercase();
        if text.contains("sun") || text.contains("clear") {
            "☀️"
        } else if text.contains("cloud") {
            "☁️"
        } else if text.contains("rain") || text.contains("drizzle") {
            "🌧️"
        } else if text.contains("snow") {
            "❄️"
        } else if text.contains("storm") || text.contains("thunder") {
            "⛈️"
        } else if text.contains("fog") || text.contains("mist") {
            "🌫️"
        } else {
            "☀️"
        }
    }
}

/// One-line suggestion for the current conditions.
pub fn weather_advice(conditions: &Conditions) -> &'static str {
    let text = conditions.condition.description().to_lowercase();
    let temp = conditions.temperature;

    if text.contains("storm") || text.contains("thunder") {
        "⚡ Stay indoors and avoid electrical equipment"
    } else if text.contains("rain") {
        "☔ Don't forget your umbrella!"
    } else if text.contains("snow") {
        "🧤 Bundle up and drive carefully"
    } else if text.contains("fog") || text.contains("mist") {
        "🚗 Drive carefully, low visibility"
    } else if temp > 30.0 {
        "🥵 Stay hydrated and avoid sun exposure"
    } else if temp < 5.0 {
        "🥶 Dress warmly and watch for ice"
    } else {
        "😊 Perfect weather for outdoor activities!"
    }
}
