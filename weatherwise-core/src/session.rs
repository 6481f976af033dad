//! Search orchestration.
//!
//! A [`WeatherSession`] owns the user's preferences and the latest snapshot.
//! Every search is tagged with a sequence number when it starts; when its
//! result comes back, anything but the most recently issued search is dropped.
//! The network phase lives on [`Services`], which can be cloned and driven
//! without borrowing the session, so a host can keep several searches in
//! flight and feed their outcomes back through [`WeatherSession::complete`].

use std::sync::Arc;

use anyhow::Result;
use chrono::Timelike;

use crate::{
    clock::{Clock, SystemClock},
    error::SearchError,
    forecast,
    geolocation::Geolocator,
    model::WeatherSnapshot,
    preferences::{PreferenceStore, UserPreferences},
    provider::{LocationLookup, WeatherProvider},
    uv,
};

/// Where the session is in its search cycle. `Success` and `Failed` both move
/// back to `Loading` on the next search or retry.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Idle,
    Loading { query: String },
    Success,
    Failed(SearchError),
}

/// Identifies one issued search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    seq: u64,
    query: String,
}

impl SearchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

/// What the network phase produced for a ticket.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub ticket: SearchTicket,
    pub result: Result<WeatherSnapshot, SearchError>,
}

#[derive(Debug, PartialEq)]
pub enum Completion<'a> {
    /// The outcome was the latest search and produced this snapshot.
    Applied(&'a WeatherSnapshot),
    /// A newer search had been issued; the outcome was dropped.
    Stale,
}

/// Receives whatever the session currently has to show.
pub trait PresentationSink {
    fn loading(&mut self, query: &str);
    fn snapshot(&mut self, snapshot: &WeatherSnapshot, preferences: &UserPreferences);
    fn error(&mut self, error: &SearchError);
}

/// The collaborators a search talks to.
#[derive(Debug, Clone)]
pub struct Services {
    lookup: Arc<dyn LocationLookup>,
    weather: Arc<dyn WeatherProvider>,
    clock: Arc<dyn Clock>,
}

impl Services {
    pub fn new(lookup: Arc<dyn LocationLookup>, weather: Arc<dyn WeatherProvider>) -> Self {
        Self { lookup, weather, clock: Arc::new(SystemClock::default()) }
    }

    /// Uses one value for both location lookup and weather data.
    pub fn from_provider<P>(provider: P) -> Self
    where
        P: LocationLookup + WeatherProvider + 'static,
    {
        let provider = Arc::new(provider);
        Self::new(provider.clone(), provider)
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Runs the network phase for `ticket`.
    pub async fn fetch(&self, ticket: SearchTicket) -> SearchOutcome {
        let result = self.gather(&ticket.query).await;
        SearchOutcome { ticket, result }
    }

    async fn gather(&self, query: &str) -> Result<WeatherSnapshot, SearchError> {
        let matches = self.lookup.resolve(query).await.map_err(|err| {
            tracing::warn!(query, "location lookup failed: {err:#}");
            SearchError::upstream(&err)
        })?;

        let location = matches.into_iter().next().ok_or(SearchError::LocationNotFound)?;
        let at = location.coordinates();

        tracing::debug!(query, lat = at.latitude, lon = at.longitude, "fetching weather");

        let (current, samples, air_quality) = tokio::join!(
            self.weather.current_conditions(at),
            self.weather.forecast(at),
            self.weather.air_quality(at),
        );

        let current = current.map_err(|err| {
            tracing::warn!(query, "current conditions fetch failed: {err:#}");
            SearchError::upstream(&err)
        })?;
        let samples = samples.map_err(|err| {
            tracing::warn!(query, "forecast fetch failed: {err:#}");
            SearchError::upstream(&err)
        })?;
        let air_quality = air_quality.unwrap_or_else(|err| {
            tracing::debug!(query, "air quality unavailable: {err:#}");
            None
        });

        let now = self.clock.now();
        let zone = self.clock.zone();
        let views = forecast::reduce_in(&samples, now, zone);
        let local_now = zone.localize(now);
        let uv = uv::estimate_uv(local_now.hour(), current.sample.cloud_cover_percent);

        Ok(WeatherSnapshot {
            location,
            current: current.sample,
            sun: current.sun,
            daily_samples: views.daily,
            hourly_samples: views.hourly,
            air_quality,
            uv,
            fetched_at: local_now,
            zone,
        })
    }

    /// Turns the device position into a place name to search for.
    async fn locate(&self, geolocator: &dyn Geolocator) -> Result<String, SearchError> {
        let at = geolocator.current_position().await.map_err(SearchError::from)?;

        let places = self.lookup.resolve_from_coordinates(at).await.map_err(|err| {
            tracing::warn!("reverse lookup failed: {err:#}");
            SearchError::LocationUndetermined
        })?;

        places
            .into_iter()
            .next()
            .map(|place| place.name)
            .ok_or(SearchError::LocationUndetermined)
    }
}

/// Owns preferences, the latest snapshot and the search state machine.
#[derive(Debug)]
pub struct WeatherSession {
    services: Services,
    store: Box<dyn PreferenceStore>,
    preferences: UserPreferences,
    state: SessionState,
    snapshot: Option<WeatherSnapshot>,
    last_query: Option<String>,
    issued: u64,
}

impl WeatherSession {
    /// Loads preferences from `store`. The last successful city becomes the
    /// retry target.
    pub fn new(services: Services, store: Box<dyn PreferenceStore>) -> Result<Self> {
        let preferences = store.load()?;
        let last_query = preferences.last_city.clone();

        Ok(Self {
            services,
            store,
            preferences,
            state: SessionState::Idle,
            snapshot: None,
            last_query,
            issued: 0,
        })
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn preferences(&self) -> &UserPreferences {
        &self.preferences
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The most recent successful snapshot, kept until the next success
    /// replaces it.
    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn last_query(&self) -> Option<&str> {
        self.last_query.as_deref()
    }

    /// Starts a search for `query` and returns its ticket. Any ticket issued
    /// earlier becomes stale.
    pub fn begin_search(&mut self, query: &str) -> Result<SearchTicket, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            self.state = SessionState::Failed(SearchError::EmptyQuery);
            return Err(SearchError::EmptyQuery);
        }

        self.issued += 1;
        self.last_query = Some(query.to_string());
        self.state = SessionState::Loading { query: query.to_string() };

        tracing::debug!(seq = self.issued, query, "search issued");

        Ok(SearchTicket { seq: self.issued, query: query.to_string() })
    }

    /// Starts a new search for the last attempted query.
    pub fn begin_retry(&mut self) -> Result<SearchTicket, SearchError> {
        let query = self.last_query.clone().ok_or(SearchError::NothingToRetry)?;
        self.begin_search(&query)
    }

    /// Applies an outcome if it belongs to the latest search.
    ///
    /// A stale outcome, successful or not, leaves the session untouched.
    pub fn complete(&mut self, outcome: SearchOutcome) -> Result<Completion<'_>, SearchError> {
        if outcome.ticket.seq != self.issued {
            tracing::debug!(
                seq = outcome.ticket.seq,
                latest = self.issued,
                query = outcome.ticket.query.as_str(),
                "discarding stale search result"
            );
            return Ok(Completion::Stale);
        }

        match outcome.result {
            Ok(snapshot) => {
                tracing::info!(
                    query = outcome.ticket.query.as_str(),
                    "weather data loaded for {}",
                    snapshot.location.label()
                );

                self.preferences.record_search(&outcome.ticket.query);
                self.persist();
                self.state = SessionState::Success;

                let snapshot: &WeatherSnapshot = self.snapshot.insert(snapshot);
                Ok(Completion::Applied(snapshot))
            }
            Err(err) => {
                tracing::info!(query = outcome.ticket.query.as_str(), "search failed: {err}");
                self.state = SessionState::Failed(err.clone());
                Err(err)
            }
        }
    }

    /// Searches for `query` and waits for the result.
    pub async fn search(&mut self, query: &str) -> Result<&WeatherSnapshot, SearchError> {
        let ticket = self.begin_search(query)?;
        let outcome = self.services.fetch(ticket).await;
        self.settle(outcome)
    }

    /// Re-runs the last attempted query verbatim.
    pub async fn retry(&mut self) -> Result<&WeatherSnapshot, SearchError> {
        let ticket = self.begin_retry()?;
        let outcome = self.services.fetch(ticket).await;
        self.settle(outcome)
    }

    /// Searches for the place the geolocator reports.
    pub async fn search_here(
        &mut self,
        geolocator: &dyn Geolocator,
    ) -> Result<&WeatherSnapshot, SearchError> {
        self.issued += 1;
        self.state = SessionState::Loading { query: "current location".to_string() };

        match self.services.locate(geolocator).await {
            Ok(city) => self.search(&city).await,
            Err(err) => {
                tracing::info!("geolocated search failed: {err}");
                self.state = SessionState::Failed(err.clone());
                Err(err)
            }
        }
    }

    fn settle(&mut self, outcome: SearchOutcome) -> Result<&WeatherSnapshot, SearchError> {
        match self.complete(outcome)? {
            Completion::Applied(snapshot) => Ok(snapshot),
            Completion::Stale => Err(SearchError::Superseded),
        }
    }

    /// Flips between Celsius/metric and Fahrenheit/imperial; returns the new
    /// `use_celsius` value.
    pub fn toggle_units(&mut self) -> bool {
        let use_celsius = self.preferences.toggle_units();
        self.persist();
        use_celsius
    }

    /// Flips the theme; returns the new `use_dark_theme` value.
    pub fn toggle_theme(&mut self) -> bool {
        let use_dark_theme = self.preferences.toggle_theme();
        self.persist();
        use_dark_theme
    }

    /// Hands the current state to `sink`. Nothing is shown while idle.
    pub fn present(&self, sink: &mut dyn PresentationSink) {
        match (&self.state, &self.snapshot) {
            (SessionState::Loading { query }, _) => sink.loading(query),
            (SessionState::Success, Some(snapshot)) => sink.snapshot(snapshot, &self.preferences),
            (SessionState::Failed(err), _) => sink.error(err),
            _ => {}
        }
    }

    fn persist(&self) {
        if let Err(err) = self.store.save(&self.preferences) {
            tracing::warn!("failed to save preferences: {err:#}");
        }
    }
}
