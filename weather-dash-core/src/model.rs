use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of forecast slots produced per lookup.
pub const FORECAST_ENTRIES: usize = 40;

/// Spacing between forecast slots.
pub const FORECAST_STEP_HOURS: i64 = 3;

/// Recent searches kept, newest first.
pub const MAX_RECENT_SEARCHES: usize = 10;

const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub fn new(name: impl Into<String>, country: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self { name: name.into(), country: country.into(), lat, lon }
    }

    /// Parse a `"City, Country"` query. Text before the first comma is the
    /// name, the rest is the country; blank parts become "Unknown".
    pub fn from_query(query: &str) -> Self {
        let (name, country) = match query.split_once(',') {
            Some((name, country)) => (name.trim(), country.trim()),
            None => (query.trim(), ""),
        };

        let or_unknown = |s: &str| if s.is_empty() { UNKNOWN.to_string() } else { s.to_string() };

        Self { name: or_unknown(name), country: or_unknown(country), lat: 0.0, lon: 0.0 }
    }

    pub fn with_coordinates(mut self, lat: f64, lon: f64) -> Self {
        self.lat = lat;
        self.lon = lon;
        self
    }

    /// Identity check: exact, case-sensitive match on name and country.
    pub fn same_place(&self, name: &str, country: &str) -> bool {
        self.name == name && self.country == country
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.name, self.country)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WeatherCondition {
    Sunny,
    Cloudy,
    Rainy,
    PartlyCloudy,
    Stormy,
    Snowy,
    Foggy,
    Other(String),
}

impl WeatherCondition {
    pub fn description(&self) -> &str {
        match self {
            Self::Sunny => "Sunny",
            Self::Cloudy => "Cloudy",
            Self::Rainy => "Rainy",
            Self::PartlyCloudy => "Partly Cloudy",
            Self::Stormy => "Stormy",
            Self::Snowy => "Snowy",
            Self::Foggy => "Foggy",
            Self::Other(text) => text,
        }
    }

    /// Conditions the mock generator draws forecast slots from.
    pub fn forecast_pool() -> [WeatherCondition; 5] {
        [Self::Sunny, Self::Cloudy, Self::Rainy, Self::PartlyCloudy, Self::Stormy]
    }

    /// Conditions the mock generator draws current conditions from.
    pub fn current_pool() -> [WeatherCondition; 4] {
        [Self::Sunny, Self::Cloudy, Self::Rainy, Self::PartlyCloudy]
    }

    pub fn is_wet(&self) -> bool {
        matches!(self, Self::Rainy | Self::Stormy)
    }
}

impl From<String> for WeatherCondition {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Sunny" => Self::Sunny,
            "Cloudy" => Self::Cloudy,
            "Rainy" => Self::Rainy,
            "Partly Cloudy" | "PartlyCloudy" => Self::PartlyCloudy,
            "Stormy" => Self::Stormy,
            "Snowy" => Self::Snowy,
            "Foggy" => Self::Foggy,
            _ => Self::Other(value),
        }
    }
}

impl From<WeatherCondition> for String {
    fn from(value: WeatherCondition) -> Self {
        match value {
            WeatherCondition::Other(text) => text,
            other => other.description().to_string(),
        }
    }
}

impl std::fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

/// Measured conditions at a location. Temperatures are always Celsius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conditions {
    pub temperature: f64,
    pub feels_like: f64,
    pub condition: WeatherCondition,
    pub humidity: u8,
    pub wind_speed: f64,
    pub wind_direction: u16,
    pub pressure: f64,
    pub visibility: f64,
    pub sunrise: String,
    pub sunset: String,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentConditions {
    pub location: Location,
    #[serde(flatten)]
    pub conditions: Conditions,
    pub is_favorite: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ForecastTemp {
    Single(f64),
    Range { day: f64, night: f64, min: f64, max: f64 },
}

impl ForecastTemp {
    /// The value shown for a slot: the reading itself, or the daytime value.
    pub fn headline(&self) -> f64 {
        match self {
            ForecastTemp::Single(t) => *t,
            ForecastTemp::Range { day, .. } => *day,
        }
    }

    /// `(min, max)` for daily views; a single reading is both.
    pub fn bounds(&self) -> (f64, f64) {
        match self {
            ForecastTemp::Single(t) => (*t, *t),
            ForecastTemp::Range { min, max, .. } => (*min, *max),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastEntry {
    pub time: DateTime<Utc>,
    pub temp: ForecastTemp,
    pub condition: WeatherCondition,
    pub humidity: f64,
    pub wind_speed: f64,
    pub rain_chance: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteEntry {
    pub name: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    pub added_at: DateTime<Utc>,
}

impl FavoriteEntry {
    pub fn from_location(location: &Location, added_at: DateTime<Utc>) -> Self {
        Self {
            name: location.name.clone(),
            country: location.country.clone(),
            lat: location.lat,
            lon: location.lon,
            added_at,
        }
    }

    pub fn matches(&self, location: &Location) -> bool {
        location.same_place(&self.name, &self.country)
    }

    pub fn location(&self) -> Location {
        Location::new(self.name.clone(), self.country.clone(), self.lat, self.lon)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentSearchEntry {
    pub query: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TemperatureUnit {
    #[default]
    #[serde(rename = "C", alias = "celsius")]
    Celsius,
    #[serde(rename = "F", alias = "fahrenheit")]
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn toggled(self) -> Self {
        match self {
            TemperatureUnit::Celsius => TemperatureUnit::Fahrenheit,
            TemperatureUnit::Fahrenheit => TemperatureUnit::Celsius,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "C",
            TemperatureUnit::Fahrenheit => "F",
        }
    }
}

impl TryFrom<&str> for TemperatureUnit {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "c" | "celsius" => Ok(TemperatureUnit::Celsius),
            "f" | "fahrenheit" => Ok(TemperatureUnit::Fahrenheit),
            _ => Err(anyhow::anyhow!("Unknown unit '{value}'. Supported units: C, F.")),
        }
    }
}

/// What a data source returns for a lookup. `location` is `None` when the
/// source cannot name the place; the store then derives it from the query.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub location: Option<Location>,
    pub conditions: Conditions,
    pub forecast: Vec<ForecastEntry>,
}

/// Everything the dashboard shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationState {
    pub current: CurrentConditions,
    pub forecast: Vec<ForecastEntry>,
    pub unit: TemperatureUnit,
    pub favorites: Vec<FavoriteEntry>,
    pub recent_searches: Vec<RecentSearchEntry>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl ApplicationState {
    pub fn is_favorite(&self, location: &Location) -> bool {
        self.favorites.iter().any(|fav| fav.matches(location))
    }
}
