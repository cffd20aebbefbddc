//! Core library for the weather dashboard.
//!
//! This crate defines:
//! - The dashboard state and the store that owns and mutates it
//! - Abstractions over the weather data source and key-value persistence
//! - A mock data source, unit conversion and derived weather metrics
//! - Configuration handling
//!
//! It is used by `weather-dash`, but any front end can drive a
//! [`WeatherStateStore`] the same way.

pub mod config;
pub mod error;
pub mod forecast;
pub mod model;
pub mod persistence;
pub mod provider;
pub mod store;
pub mod units;

pub use config::{Config, MockConfig};
pub use error::{FetchError, LocationError, PersistenceError};
pub use model::{
    ApplicationState, Conditions, CurrentConditions, FavoriteEntry, ForecastEntry, ForecastTemp,
    Location, RecentSearchEntry, TemperatureUnit, WeatherCondition, WeatherReport,
};
pub use persistence::{FileSystemPersistence, KeyValuePersistence, MemoryPersistence};
pub use provider::{WeatherDataSource, mock::MockDataSource, source_from_config};
pub use store::{StoreOptions, WeatherStateStore};
