use crate::{
    Config,
    error::{FetchError, LocationError},
    model::{Location, WeatherReport},
    provider::mock::MockDataSource,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod mock;

/// Where the dashboard gets its weather from.
#[async_trait]
pub trait WeatherDataSource: Send + Sync + Debug {
    /// Report shown before the first lookup completes.
    fn initial_report(&self) -> WeatherReport;

    /// Current conditions and forecast for a free-text query.
    async fn fetch(&self, query: &str) -> Result<WeatherReport, FetchError>;

    /// Physical location of this device.
    async fn resolve_device_location(&self) -> Result<Location, LocationError>;
}

/// Construct the data source described by the config.
pub fn source_from_config(config: &Config) -> Arc<dyn WeatherDataSource> {
    Arc::new(MockDataSource::new(config.mock_options()))
}
