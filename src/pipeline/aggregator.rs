//! Fan-out of every source for one selection, with last-write-wins publishing

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use chrono::{Days, Utc};
use futures::join;
use tracing::{info, instrument, warn};

use super::store::ViewStore;
use super::view::{AggregatedWeatherView, SourceResult, TOTAL_FAILURE_BANNER};
use crate::config::{DashboardConfig, DisplayConfig};
use crate::models::{Coordinate, LocationSelection, SelectionOrigin};
use crate::sources::{
    EonetClient, EventsSource, FetchResult, GeocodingSource, NominatimClient, OpenMeteoClient,
    SourceKind, UpstreamClient, WeatherSource,
};

/// How a dispatched source ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Loaded,
    Failed { transport: bool },
}

pub struct Aggregator {
    weather: Arc<dyn WeatherSource>,
    geocoding: Arc<dyn GeocodingSource>,
    events: Arc<dyn EventsSource>,
    store: Arc<ViewStore>,
    map_click_placeholder: String,
    geolocation_placeholder: String,
}

impl Aggregator {
    pub fn new(
        weather: Arc<dyn WeatherSource>,
        geocoding: Arc<dyn GeocodingSource>,
        events: Arc<dyn EventsSource>,
        display: &DisplayConfig,
    ) -> Self {
        Self {
            weather,
            geocoding,
            events,
            store: Arc::new(ViewStore::new()),
            map_click_placeholder: display.map_click_placeholder.clone(),
            geolocation_placeholder: display.geolocation_placeholder.clone(),
        }
    }

    /// Wire the real upstream clients from configuration
    pub fn from_config(config: &DashboardConfig) -> crate::Result<Self> {
        let http = UpstreamClient::new(&config.sources.user_agent)?;

        Ok(Self::new(
            Arc::new(OpenMeteoClient::from_config(http.clone(), &config.sources)),
            Arc::new(NominatimClient::from_config(http.clone(), &config.sources)),
            Arc::new(EonetClient::from_config(http, &config.sources)),
            &config.display,
        ))
    }

    #[must_use]
    pub fn store(&self) -> &Arc<ViewStore> {
        &self.store
    }

    #[must_use]
    pub fn geocoding(&self) -> &Arc<dyn GeocodingSource> {
        &self.geocoding
    }

    #[must_use]
    pub fn events(&self) -> &Arc<dyn EventsSource> {
        &self.events
    }

    /// Start a run in the background and return its id immediately
    pub fn select(self: &Arc<Self>, selection: LocationSelection) -> u64 {
        let run_id = self.store.begin_run(selection.clone());
        let aggregator = Arc::clone(self);
        tokio::spawn(async move {
            aggregator.drive(run_id, selection).await;
        });
        run_id
    }

    /// Drive a run to completion and return the latest view. If another
    /// selection superseded this one meanwhile, that newer view is returned.
    pub async fn run(&self, selection: LocationSelection) -> AggregatedWeatherView {
        let run_id = self.store.begin_run(selection.clone());
        self.drive(run_id, selection).await;
        self.store.snapshot()
    }

    #[instrument(skip(self, selection))]
    async fn drive(&self, run_id: u64, selection: LocationSelection) {
        let coordinate = selection.coordinate;
        let start_time = Instant::now();
        info!(
            "Aggregating sources for {} ({})",
            selection.display_name(),
            coordinate
        );

        let (weather, marine, air_quality, flood, radiation, geocode, events) = join!(
            self.current_with_outlooks(run_id, coordinate),
            self.dispatch(
                run_id,
                SourceKind::Marine,
                self.weather.marine(coordinate),
                |view, result| view.marine = result,
            ),
            self.dispatch(
                run_id,
                SourceKind::AirQuality,
                self.weather.air_quality(coordinate),
                |view, result| view.air_quality = result,
            ),
            self.dispatch(
                run_id,
                SourceKind::Flood,
                self.weather.flood(coordinate),
                |view, result| view.flood = result,
            ),
            self.dispatch(
                run_id,
                SourceKind::Radiation,
                self.weather.radiation(coordinate),
                |view, result| view.radiation = result,
            ),
            self.reverse_geocode(run_id, &selection),
            self.dispatch(
                run_id,
                SourceKind::Events,
                self.events.natural_events(),
                |view, result| view.events = result,
            ),
        );

        let mut outcomes = weather;
        outcomes.extend([marine, air_quality, flood, radiation, geocode, events]);

        let failed = outcomes
            .iter()
            .filter(|o| matches!(o, Outcome::Failed { .. }))
            .count();
        let total_failure = outcomes
            .iter()
            .all(|o| matches!(o, Outcome::Failed { transport: true }));
        if total_failure {
            warn!(run_id, "No source could be reached");
        }

        let banner = total_failure.then(|| TOTAL_FAILURE_BANNER.to_string());
        if self.store.settle(run_id, banner) {
            info!(
                run_id,
                "Run settled in {:.3}s ({} of {} sources failed)",
                start_time.elapsed().as_secs_f64(),
                failed,
                outcomes.len()
            );
        }
    }

    /// Current weather first; forecast and history only once it succeeded
    async fn current_with_outlooks(&self, run_id: u64, coordinate: Coordinate) -> Vec<Outcome> {
        let current = self.weather.current_weather(coordinate).await;
        let current_loaded = current.is_ok();
        let mut outcomes = vec![self.record(
            run_id,
            SourceKind::Current,
            current,
            |view, result| view.current = result,
        )];

        if !current_loaded {
            self.store.publish(run_id, SourceKind::Forecast, |view| {
                view.forecast = SourceResult::Unattempted;
                view.historical = SourceResult::Unattempted;
            });
            return outcomes;
        }

        let today = Utc::now().date_naive();
        let yesterday = today.checked_sub_days(Days::new(1)).unwrap_or(today);

        let (forecast, historical) = join!(
            self.dispatch(
                run_id,
                SourceKind::Forecast,
                self.weather.forecast(coordinate),
                |view, result| view.forecast = result,
            ),
            self.dispatch(
                run_id,
                SourceKind::Historical,
                self.weather.historical(coordinate, yesterday),
                |view, result| view.historical = result,
            ),
        );
        outcomes.extend([forecast, historical]);
        outcomes
    }

    /// Reverse lookup that also names map-click and geolocation selections
    async fn reverse_geocode(&self, run_id: u64, selection: &LocationSelection) -> Outcome {
        let result = self.geocoding.reverse(selection.coordinate).await;

        let needs_name = selection.origin.resolves_name() && selection.name.is_none();
        let resolved_name = needs_name.then(|| match &result {
            Ok(record) if !record.display_name.trim().is_empty() => record.display_name.clone(),
            _ => self.placeholder(selection.origin).to_string(),
        });

        self.record(run_id, SourceKind::Geocode, result, move |view, result| {
            view.geocode = result;
            if let (Some(name), Some(selection)) = (resolved_name, view.selection.as_mut()) {
                selection.name = Some(name);
            }
        })
    }

    async fn dispatch<T, Fut, Apply>(
        &self,
        run_id: u64,
        kind: SourceKind,
        call: Fut,
        apply: Apply,
    ) -> Outcome
    where
        Fut: Future<Output = FetchResult<T>>,
        Apply: FnOnce(&mut AggregatedWeatherView, SourceResult<T>),
    {
        let result = call.await;
        self.record(run_id, kind, result, apply)
    }

    fn record<T, Apply>(
        &self,
        run_id: u64,
        kind: SourceKind,
        result: FetchResult<T>,
        apply: Apply,
    ) -> Outcome
    where
        Apply: FnOnce(&mut AggregatedWeatherView, SourceResult<T>),
    {
        let outcome = match &result {
            Ok(_) => Outcome::Loaded,
            Err(e) => {
                warn!(run_id, source = %kind, error = %e, "Source failed");
                Outcome::Failed {
                    transport: e.is_transport(),
                }
            }
        };

        self.store.publish(run_id, kind, |view| {
            if outcome != Outcome::Loaded {
                view.failures += 1;
            }
            apply(view, SourceResult::from_fetch(result));
        });
        outcome
    }

    fn placeholder(&self, origin: SelectionOrigin) -> &str {
        match origin {
            SelectionOrigin::Geolocation => &self.geolocation_placeholder,
            _ => &self.map_click_placeholder,
        }
    }
}
