//! Application state owner for the dashboard.
//!
//! [`WeatherStateStore`] holds the single [`ApplicationState`], applies every
//! mutation, and mirrors favorites and recent searches to persistence.
//! Consumers read snapshots or subscribe to changes; they never write state.
//!
//! Lookups may overlap. Each lookup takes a sequence number from a counter
//! for its kind, and only the most recently issued lookup of a kind is
//! allowed to change state when it completes.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use std::{collections::HashSet, sync::Arc, time::Duration};
use tokio::sync::watch;

use crate::{
    error::{FetchError, LocationError, PersistenceError},
    model::{
        ApplicationState, CurrentConditions, FavoriteEntry, Location, MAX_RECENT_SEARCHES,
        RecentSearchEntry, TemperatureUnit,
    },
    persistence::{
        FAVORITES_KEY, KeyValuePersistence, PersistenceHandle, PersistenceWriter,
        RECENT_SEARCHES_KEY, load_list,
    },
    provider::WeatherDataSource,
};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq)]
pub struct StoreOptions {
    pub initial_unit: TemperatureUnit,
    /// Upper bound on a single data-source call.
    pub request_timeout: Duration,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self { initial_unit: TemperatureUnit::Celsius, request_timeout: DEFAULT_REQUEST_TIMEOUT }
    }
}

/// Sequence numbers for one kind of lookup.
#[derive(Debug, Default)]
struct RequestTracker {
    issued: u64,
    pending: Option<u64>,
}

impl RequestTracker {
    fn begin(&mut self) -> u64 {
        self.issued += 1;
        self.pending = Some(self.issued);
        self.issued
    }

    /// True if `seq` is still the latest request; it is then no longer pending.
    fn finish(&mut self, seq: u64) -> bool {
        if self.pending == Some(seq) {
            self.pending = None;
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Default)]
struct Requests {
    search: RequestTracker,
    location: RequestTracker,
}

impl Requests {
    fn is_loading(&self) -> bool {
        self.search.pending.is_some() || self.location.pending.is_some()
    }
}

#[derive(Debug)]
struct Inner {
    source: Arc<dyn WeatherDataSource>,
    writer: PersistenceHandle,
    state: watch::Sender<ApplicationState>,
    requests: Mutex<Requests>,
    request_timeout: Duration,
}

/// Cheap to clone; all clones share one state.
#[derive(Debug, Clone)]
pub struct WeatherStateStore {
    inner: Arc<Inner>,
}

impl WeatherStateStore {
    /// Build the store, loading favorites and recent searches from
    /// `persistence`. Must be called inside a tokio runtime: it spawns the
    /// background persistence writer.
    pub async fn new(
        source: Arc<dyn WeatherDataSource>,
        persistence: Arc<dyn KeyValuePersistence>,
        options: StoreOptions,
    ) -> Self {
        let favorites = dedup_favorites(load_list(persistence.as_ref(), FAVORITES_KEY).await);
        let recent_searches =
            newest_first(load_list(persistence.as_ref(), RECENT_SEARCHES_KEY).await);

        let report = source.initial_report();
        let location = report.location.unwrap_or_else(|| Location::from_query(""));
        let is_favorite = favorites.iter().any(|fav| fav.matches(&location));

        let initial = ApplicationState {
            current: CurrentConditions { location, conditions: report.conditions, is_favorite },
            forecast: report.forecast,
            unit: options.initial_unit,
            favorites,
            recent_searches,
            is_loading: false,
            error: None,
        };

        tracing::info!(
            favorites = initial.favorites.len(),
            recent_searches = initial.recent_searches.len(),
            "weather state initialized"
        );

        let (state, _) = watch::channel(initial);

        Self {
            inner: Arc::new(Inner {
                source,
                writer: PersistenceWriter::spawn(persistence),
                state,
                requests: Mutex::new(Requests::default()),
                request_timeout: options.request_timeout,
            }),
        }
    }

    pub fn snapshot(&self) -> ApplicationState {
        self.inner.state.borrow().clone()
    }

    /// Receiver that observes every state change.
    pub fn subscribe(&self) -> watch::Receiver<ApplicationState> {
        self.inner.state.subscribe()
    }

    pub fn unit(&self) -> TemperatureUnit {
        self.inner.state.borrow().unit
    }

    /// Look up weather for `query`, usually `"City, Country"`.
    ///
    /// Failures are reported through `error` on the state; the previous
    /// conditions and forecast stay in place.
    pub async fn search(&self, query: &str) {
        let seq = self.begin_request(|requests| &mut requests.search);
        tracing::debug!(query, seq, "search started");

        let result =
            tokio::time::timeout(self.inner.request_timeout, self.inner.source.fetch(query))
                .await
                .unwrap_or_else(|_| Err(FetchError::Timeout));

        let mut requests = self.inner.requests.lock();
        if !requests.search.finish(seq) {
            tracing::debug!(query, seq, "discarding superseded search result");
            return;
        }
        let is_loading = requests.is_loading();

        let report = match result {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!(query, error = %e, "weather lookup failed");
                self.inner.state.send_modify(|state| {
                    state.is_loading = is_loading;
                    state.error = Some(e.user_message().to_string());
                });
                return;
            }
        };

        let writer = &self.inner.writer;
        self.inner.state.send_modify(|state| {
            let location = report.location.unwrap_or_else(|| Location::from_query(query));
            let is_favorite = state.is_favorite(&location);

            state.current =
                CurrentConditions { location, conditions: report.conditions, is_favorite };
            state.forecast = report.forecast;
            state.is_loading = is_loading;

            let timestamp = next_search_timestamp(&state.recent_searches);
            let entry = RecentSearchEntry { query: query.to_string(), timestamp };
            state.recent_searches.insert(0, entry);
            state.recent_searches.truncate(MAX_RECENT_SEARCHES);
            queue_write(writer, RECENT_SEARCHES_KEY, &state.recent_searches);
        });
        drop(requests);

        tracing::info!(query, "weather updated");
    }

    /// Move the current conditions to the device's physical location.
    /// Only `current.location` (and its favorite flag) changes.
    pub async fn use_current_location(&self) {
        let seq = self.begin_request(|requests| &mut requests.location);
        tracing::debug!(seq, "device location requested");

        let result = tokio::time::timeout(
            self.inner.request_timeout,
            self.inner.source.resolve_device_location(),
        )
        .await
        .unwrap_or_else(|_| Err(LocationError::Timeout));

        let mut requests = self.inner.requests.lock();
        if !requests.location.finish(seq) {
            tracing::debug!(seq, "discarding superseded location result");
            return;
        }
        let is_loading = requests.is_loading();

        self.inner.state.send_modify(|state| {
            state.is_loading = is_loading;
            match result {
                Ok(location) => {
                    state.current.is_favorite = state.is_favorite(&location);
                    state.current.location = location;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "device location unavailable");
                    state.error = Some(e.user_message().to_string());
                }
            }
        });
    }

    pub fn toggle_unit(&self) {
        self.inner.state.send_modify(|state| state.unit = state.unit.toggled());
    }

    /// Add `location` to favorites, or remove it if already there.
    pub fn toggle_favorite(&self, location: &Location) {
        let writer = &self.inner.writer;

        self.inner.state.send_modify(|state| {
            let now_favorite = match state.favorites.iter().position(|fav| fav.matches(location)) {
                Some(index) => {
                    state.favorites.remove(index);
                    false
                }
                None => {
                    state.favorites.push(FavoriteEntry::from_location(location, Utc::now()));
                    true
                }
            };

            if state.current.location.same_place(&location.name, &location.country) {
                state.current.is_favorite = now_favorite;
            }
            tracing::debug!(location = %location, now_favorite, "favorites changed");
            queue_write(writer, FAVORITES_KEY, &state.favorites);
        });
    }

    /// Wait for queued persistence writes to be attempted.
    pub async fn flush(&self) -> Result<(), PersistenceError> {
        self.inner.writer.flush().await
    }

    fn begin_request(&self, tracker: impl FnOnce(&mut Requests) -> &mut RequestTracker) -> u64 {
        let mut requests = self.inner.requests.lock();
        let seq = tracker(&mut *requests).begin();

        self.inner.state.send_modify(|state| {
            state.is_loading = true;
            state.error = None;
        });

        seq
    }
}

/// Encode and queue a write. Called while the state is locked, so writes
/// reach the writer in the same order as the changes they record.
fn queue_write<T: Serialize + ?Sized>(writer: &PersistenceHandle, key: &'static str, value: &T) {
    let encoded = match serde_json::to_string(value) {
        Ok(encoded) => encoded,
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to encode value for persistence");
            return;
        }
    };

    if let Err(e) = writer.write(key, encoded) {
        tracing::warn!(key, error = %e, "failed to queue persistence write");
    }
}

fn dedup_favorites(mut favorites: Vec<FavoriteEntry>) -> Vec<FavoriteEntry> {
    let mut seen = HashSet::new();
    favorites.retain(|fav| seen.insert((fav.name.clone(), fav.country.clone())));
    favorites
}

fn newest_first(mut recent: Vec<RecentSearchEntry>) -> Vec<RecentSearchEntry> {
    recent.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    recent.truncate(MAX_RECENT_SEARCHES);
    recent
}

/// Now, or just after the newest entry if the clock has not moved past it.
fn next_search_timestamp(recent: &[RecentSearchEntry]) -> DateTime<Utc> {
    let now = Utc::now();
    match recent.first() {
        Some(newest) if newest.timestamp >= now => {
            newest.timestamp + ChronoDuration::microseconds(1)
        }
        _ => now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::{Conditions, FORECAST_ENTRIES, WeatherCondition, WeatherReport},
        persistence::MemoryPersistence,
        provider::mock::{MockDataSource, MockOptions},
    };
    use async_trait::async_trait;
    use std::{
        collections::HashMap,
        sync::atomic::{AtomicUsize, Ordering},
    };

    /// Data source whose delays and failures are set per query.
    /// Location fixes are named by call order: "Fix 0", "Fix 1", ...
    #[derive(Debug, Default)]
    struct ScriptedSource {
        delays: HashMap<&'static str, Duration>,
        failing: HashSet<&'static str>,
        hangs: bool,
        unnamed: bool,
        location_delays: Vec<Duration>,
        location_calls: AtomicUsize,
        location_fails: bool,
    }

    impl ScriptedSource {
        fn report(location: Option<Location>, temperature: f64) -> WeatherReport {
            WeatherReport {
                location,
                conditions: Conditions {
                    temperature,
                    feels_like: temperature,
                    condition: WeatherCondition::Cloudy,
                    humidity: 70,
                    wind_speed: 8.0,
                    wind_direction: 90,
                    pressure: 1008.0,
                    visibility: 9.0,
                    sunrise: "06:00 AM".into(),
                    sunset: "08:00 PM".into(),
                    last_updated: Utc::now(),
                },
                forecast: Vec::new(),
            }
        }
    }

    #[async_trait]
    impl WeatherDataSource for ScriptedSource {
        fn initial_report(&self) -> WeatherReport {
            Self::report(Some(Location::new("Home", "Land", 1.0, 2.0)), 10.0)
        }

        async fn fetch(&self, query: &str) -> Result<WeatherReport, FetchError> {
            if let Some(delay) = self.delays.get(query) {
                tokio::time::sleep(*delay).await;
            }
            if self.hangs {
                std::future::pending::<()>().await;
            }
            if self.failing.contains(query) {
                return Err(FetchError::Unavailable);
            }

            let location =
                (!self.unnamed).then(|| Location::from_query(query).with_coordinates(5.0, 6.0));
            Ok(Self::report(location, query.len() as f64))
        }

        async fn resolve_device_location(&self) -> Result<Location, LocationError> {
            let call = self.location_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.location_delays.get(call) {
                tokio::time::sleep(*delay).await;
            }
            if self.hangs {
                std::future::pending::<()>().await;
            }
            if self.location_fails {
                return Err(LocationError::Unavailable);
            }
            Ok(Location::new(format!("Fix {call}"), "Based on your location", 40.7128, -74.0060))
        }
    }

    fn paris() -> Location {
        Location::new("Paris", "France", 48.8566, 2.3522)
    }

    async fn store_with(
        source: ScriptedSource,
        memory: Arc<MemoryPersistence>,
    ) -> WeatherStateStore {
        WeatherStateStore::new(Arc::new(source), memory, StoreOptions::default()).await
    }

    async fn mock_store() -> (WeatherStateStore, Arc<MemoryPersistence>) {
        let memory = Arc::new(MemoryPersistence::new());
        let source = Arc::new(MockDataSource::new(MockOptions::instant()));
        let store = WeatherStateStore::new(source, memory.clone(), StoreOptions::default()).await;
        (store, memory)
    }

    #[tokio::test]
    async fn empty_storage_starts_with_empty_collections() {
        let (store, _) = mock_store().await;
        let state = store.snapshot();

        assert!(state.favorites.is_empty());
        assert!(state.recent_searches.is_empty());
        assert_eq!(state.current.location.name, "New York");
        assert_eq!(state.forecast.len(), FORECAST_ENTRIES);
        assert_eq!(state.unit, TemperatureUnit::Celsius);
        assert!(!state.is_loading);
        assert_eq!(state.error, None);
    }

    #[tokio::test]
    async fn search_updates_current_and_recent() {
        let (store, _) = mock_store().await;

        store.search("Paris, France").await;
        let state = store.snapshot();

        assert_eq!(state.current.location.name, "Paris");
        assert_eq!(state.current.location.country, "France");
        assert_eq!(state.recent_searches[0].query, "Paris, France");
        assert!(!state.is_loading);
        assert_eq!(state.error, None);
    }

    #[tokio::test]
    async fn search_derives_location_when_source_has_none() {
        let source = ScriptedSource { unnamed: true, ..Default::default() };
        let store = store_with(source, Arc::default()).await;

        store.search("Lisbon, Portugal").await;
        let location = store.snapshot().current.location;

        assert_eq!(location.name, "Lisbon");
        assert_eq!(location.country, "Portugal");
    }

    #[tokio::test]
    async fn search_marks_known_favorites() {
        let (store, _) = mock_store().await;
        store.toggle_favorite(&paris());

        store.search("Paris, France").await;
        assert!(store.snapshot().current.is_favorite);

        store.search("paris, france").await;
        assert!(!store.snapshot().current.is_favorite);
    }

    #[tokio::test]
    async fn failed_search_keeps_last_good_state() {
        let source = ScriptedSource { failing: HashSet::from(["Atlantis"]), ..Default::default() };
        let store = store_with(source, Arc::default()).await;
        store.search("Oslo, Norway").await;
        let before = store.snapshot();

        store.search("Atlantis").await;
        let after = store.snapshot();

        assert_eq!(after.current, before.current);
        assert_eq!(after.forecast, before.forecast);
        assert_eq!(after.recent_searches, before.recent_searches);
        assert_eq!(after.error.as_deref(), Some("Failed to fetch weather data"));
        assert!(!after.is_loading);
    }

    #[tokio::test]
    async fn next_search_clears_previous_error() {
        let source = ScriptedSource { failing: HashSet::from(["Atlantis"]), ..Default::default() };
        let store = store_with(source, Arc::default()).await;

        store.search("Atlantis").await;
        assert!(store.snapshot().error.is_some());

        store.search("Oslo, Norway").await;
        assert_eq!(store.snapshot().error, None);
    }

    #[tokio::test]
    async fn recent_searches_are_capped_and_newest_first() {
        let (store, _) = mock_store().await;

        for i in 0..15 {
            store.search(&format!("City{i}, Country")).await;
        }
        let recent = store.snapshot().recent_searches;

        assert_eq!(recent.len(), MAX_RECENT_SEARCHES);
        assert_eq!(recent[0].query, "City14, Country");
        assert_eq!(recent[9].query, "City5, Country");
        for pair in recent.windows(2) {
            assert!(pair[0].timestamp > pair[1].timestamp);
        }
    }

    #[tokio::test]
    async fn repeated_searches_are_all_recorded() {
        let (store, _) = mock_store().await;

        store.search("Rome, Italy").await;
        store.search("Rome, Italy").await;

        let queries: Vec<_> =
            store.snapshot().recent_searches.into_iter().map(|entry| entry.query).collect();
        assert_eq!(queries, vec!["Rome, Italy", "Rome, Italy"]);
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_search_is_discarded() {
        let source = ScriptedSource {
            delays: HashMap::from([
                ("Slow, A", Duration::from_millis(500)),
                ("Fast, B", Duration::from_millis(10)),
            ]),
            ..Default::default()
        };
        let store = store_with(source, Arc::default()).await;

        tokio::join!(store.search("Slow, A"), store.search("Fast, B"));
        let state = store.snapshot();

        assert_eq!(state.current.location.name, "Fast");
        assert_eq!(state.recent_searches.len(), 1);
        assert_eq!(state.recent_searches[0].query, "Fast, B");
        assert!(!state.is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_location_is_discarded() {
        let source = ScriptedSource {
            location_delays: vec![Duration::from_millis(500), Duration::from_millis(10)],
            ..Default::default()
        };
        let store = store_with(source, Arc::default()).await;

        tokio::join!(store.use_current_location(), store.use_current_location());
        let state = store.snapshot();

        assert_eq!(state.current.location.name, "Fix 1");
        assert!(!state.is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn loading_flag_waits_for_both_lookup_kinds() {
        let source = ScriptedSource {
            delays: HashMap::from([("Fast, B", Duration::from_millis(10))]),
            location_delays: vec![Duration::from_millis(500)],
            ..Default::default()
        };
        let store = store_with(source, Arc::default()).await;

        let background = store.clone();
        let locate = tokio::spawn(async move { background.use_current_location().await });
        tokio::task::yield_now().await;

        store.search("Fast, B").await;
        let state = store.snapshot();
        assert_eq!(state.current.location.name, "Fast");
        assert!(state.is_loading);

        locate.await.unwrap();
        let state = store.snapshot();
        assert_eq!(state.current.location.name, "Fix 0");
        assert!(!state.is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn loading_flag_tracks_in_flight_search() {
        let source = ScriptedSource {
            delays: HashMap::from([("Cairo, Egypt", Duration::from_millis(200))]),
            ..Default::default()
        };
        let store = store_with(source, Arc::default()).await;
        let mut changes = store.subscribe();

        let background = store.clone();
        let task = tokio::spawn(async move { background.search("Cairo, Egypt").await });

        changes.wait_for(|state| state.is_loading).await.unwrap();
        task.await.unwrap();

        assert!(!store.snapshot().is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn hung_lookup_times_out() {
        let source = ScriptedSource { hangs: true, ..Default::default() };
        let store = store_with(source, Arc::default()).await;
        let before = store.snapshot();

        store.search("Nowhere").await;
        let state = store.snapshot();

        assert!(!state.is_loading);
        assert_eq!(state.error.as_deref(), Some("Request timed out"));
        assert_eq!(state.current, before.current);
    }

    #[tokio::test(start_paused = true)]
    async fn hung_location_lookup_times_out() {
        let source = ScriptedSource { hangs: true, ..Default::default() };
        let store = store_with(source, Arc::default()).await;
        let before = store.snapshot();

        store.use_current_location().await;
        let state = store.snapshot();

        assert!(!state.is_loading);
        assert_eq!(state.error.as_deref(), Some("Request timed out"));
        assert_eq!(state.current, before.current);
    }

    #[tokio::test]
    async fn current_location_replaces_only_location() {
        let (store, _) = mock_store().await;
        let before = store.snapshot();

        store.use_current_location().await;
        let after = store.snapshot();

        assert_eq!(after.current.location.name, "Current Location");
        assert_eq!(after.current.location.country, "Based on your location");
        assert_eq!(after.current.conditions, before.current.conditions);
        assert_eq!(after.forecast, before.forecast);
        assert!(!after.is_loading);
    }

    #[tokio::test]
    async fn current_location_failure_sets_error() {
        let source = ScriptedSource { location_fails: true, ..Default::default() };
        let store = store_with(source, Arc::default()).await;
        let before = store.snapshot();

        store.use_current_location().await;
        let after = store.snapshot();

        assert_eq!(after.current, before.current);
        assert_eq!(after.error.as_deref(), Some("Unable to retrieve your location"));
        assert!(!after.is_loading);
    }

    #[tokio::test]
    async fn toggle_unit_twice_restores_unit_and_keeps_temperature() {
        let (store, _) = mock_store().await;
        let before = store.snapshot();

        store.toggle_unit();
        assert_eq!(store.unit(), TemperatureUnit::Fahrenheit);
        assert_eq!(
            store.snapshot().current.conditions.temperature,
            before.current.conditions.temperature
        );

        store.toggle_unit();
        assert_eq!(store.snapshot(), before);
    }

    #[tokio::test]
    async fn toggle_favorite_twice_restores_favorites() {
        let (store, _) = mock_store().await;
        store.toggle_favorite(&Location::new("Berlin", "Germany", 52.5, 13.4));
        let before = store.snapshot().favorites;

        store.toggle_favorite(&paris());
        assert_eq!(store.snapshot().favorites.len(), 2);

        store.toggle_favorite(&paris());
        assert_eq!(store.snapshot().favorites, before);
    }

    #[tokio::test]
    async fn favorites_stay_unique() {
        let (store, _) = mock_store().await;
        let places = [paris(), Location::new("Paris", "USA", 33.6, -95.5), paris(), paris()];

        for place in &places {
            store.toggle_favorite(place);
            let favorites = store.snapshot().favorites;
            let unique: HashSet<_> =
                favorites.iter().map(|fav| (fav.name.clone(), fav.country.clone())).collect();
            assert_eq!(unique.len(), favorites.len());
        }

        let countries: Vec<_> =
            store.snapshot().favorites.into_iter().map(|fav| fav.country).collect();
        assert_eq!(countries, vec!["USA", "France"]);
    }

    #[tokio::test]
    async fn toggle_favorite_flags_current_only_when_same_place() {
        let (store, _) = mock_store().await;
        let current = store.snapshot().current.location;

        store.toggle_favorite(&paris());
        assert!(!store.snapshot().current.is_favorite);

        store.toggle_favorite(&current);
        assert!(store.snapshot().current.is_favorite);

        store.toggle_favorite(&current);
        assert!(!store.snapshot().current.is_favorite);
    }

    #[tokio::test]
    async fn changes_are_persisted_and_reloaded() {
        let (store, memory) = mock_store().await;

        store.toggle_favorite(&paris());
        store.search("Paris, France").await;
        store.flush().await.unwrap();

        let favorites = memory.get(FAVORITES_KEY).await.unwrap().unwrap();
        assert!(favorites.contains("\"addedAt\""));
        assert!(favorites.contains("Paris"));

        let reloaded = WeatherStateStore::new(
            Arc::new(MockDataSource::new(MockOptions::instant())),
            memory,
            StoreOptions::default(),
        )
        .await;
        let state = reloaded.snapshot();
        assert_eq!(state.favorites.len(), 1);
        assert_eq!(state.favorites[0].name, "Paris");
        assert_eq!(state.recent_searches[0].query, "Paris, France");
    }

    #[tokio::test]
    async fn malformed_storage_loads_empty() {
        let memory = Arc::new(MemoryPersistence::with_entries([
            (FAVORITES_KEY, "not json"),
            (RECENT_SEARCHES_KEY, r#"{"version":2,"items":[]}"#),
        ]));
        let store = store_with(ScriptedSource::default(), memory).await;
        let state = store.snapshot();

        assert!(state.favorites.is_empty());
        assert!(state.recent_searches.is_empty());
    }

    #[tokio::test]
    async fn loaded_favorites_are_deduplicated() {
        let fav = FavoriteEntry::from_location(&paris(), Utc::now());
        let blob = serde_json::to_string(&vec![fav.clone(), fav]).unwrap();
        let memory = Arc::new(MemoryPersistence::with_entries([(FAVORITES_KEY, blob)]));

        let store = store_with(ScriptedSource::default(), memory).await;
        assert_eq!(store.snapshot().favorites.len(), 1);
    }

    #[tokio::test]
    async fn loaded_recent_searches_are_ordered_and_capped() {
        let start = Utc::now();
        let entries: Vec<_> = (0..12)
            .map(|i| RecentSearchEntry {
                query: format!("q{i}"),
                timestamp: start + ChronoDuration::seconds(i),
            })
            .collect();
        let blob = serde_json::to_string(&entries).unwrap();
        let memory = Arc::new(MemoryPersistence::with_entries([(RECENT_SEARCHES_KEY, blob)]));

        let store = store_with(ScriptedSource::default(), memory).await;
        let recent = store.snapshot().recent_searches;

        assert_eq!(recent.len(), MAX_RECENT_SEARCHES);
        assert_eq!(recent[0].query, "q11");
        assert_eq!(recent[9].query, "q2");
    }
}
