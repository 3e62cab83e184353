//! JSON API over the aggregation pipeline and the classification tables

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::classification::{
    AirQualityAdvisory, AqiBand, Band, Category, FloodBand, FloodGuidance, WaveBand,
};
use crate::config::DisplayConfig;
use crate::models::{
    AirQuality, Coordinate, LocationSelection, NaturalEvent, Place, SelectionOrigin,
};
use crate::pipeline::{
    AggregatedWeatherView, Aggregator, EventStats, Insights, SourceStatus, UvInsight,
};
use crate::sources::{SourceError, SourceKind};

#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<Aggregator>,
    pub display: DisplayConfig,
}

impl AppState {
    pub fn new(aggregator: Arc<Aggregator>, display: DisplayConfig) -> Self {
        Self { aggregator, display }
    }
}

/// Error body returned by every handler
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn upstream(err: &SourceError) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: err.user_message(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({ "error": self.message }))).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Debug, Serialize, Deserialize)]
pub struct SelectionRequest {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub name: Option<String>,
    pub origin: SelectionOrigin,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SelectionAccepted {
    pub run_id: u64,
}

#[derive(Debug, Serialize)]
pub struct ViewResponse {
    pub view: AggregatedWeatherView,
    pub loading: bool,
    pub statuses: BTreeMap<SourceKind, SourceStatus>,
    pub insights: Insights,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EventsResponse {
    pub events: Vec<NaturalEvent>,
    pub stats: EventStats,
}

#[derive(Debug, Deserialize)]
pub struct ValueQuery {
    pub value: f64,
}

#[derive(Debug, Deserialize)]
pub struct FloodQuery {
    pub index: Option<f64>,
    pub label: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FloodClassification {
    pub category: Category,
    pub guidance: FloodGuidance,
}

#[derive(Debug, Deserialize)]
pub struct AirQualityQuery {
    pub european: Option<f64>,
    pub us: Option<f64>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/selection", post(post_selection))
        .route("/view", get(get_view))
        .route("/search", get(search_places))
        .route("/events", get(get_events))
        .route("/classify/aqi", get(classify_aqi))
        .route("/classify/uv", get(classify_uv))
        .route("/classify/wave", get(classify_wave))
        .route("/classify/flood", get(classify_flood))
        .route("/classify/air-quality", get(classify_air_quality))
        .with_state(state)
}

async fn post_selection(
    State(state): State<AppState>,
    Json(request): Json<SelectionRequest>,
) -> Result<(StatusCode, Json<SelectionAccepted>), ApiError> {
    let coordinate = Coordinate::new(request.latitude, request.longitude)
        .map_err(|e| ApiError::bad_request(e.user_message()))?;

    let name = request.name.filter(|n| !n.trim().is_empty());
    let selection = LocationSelection {
        coordinate,
        name,
        origin: request.origin,
    };

    let run_id = state.aggregator.select(selection);
    info!(run_id, "Accepted selection at {}", coordinate);
    Ok((StatusCode::ACCEPTED, Json(SelectionAccepted { run_id })))
}

async fn get_view(State(state): State<AppState>) -> Json<ViewResponse> {
    let view = state.aggregator.store().snapshot();
    let insights = Insights::derive(&view, &state.display);

    Json(ViewResponse {
        loading: view.is_loading(),
        statuses: view.statuses(),
        insights,
        view,
    })
}

async fn search_places(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Vec<Place>> {
    let text = query.q.trim();
    if text.is_empty() {
        return Err(ApiError::bad_request("Search query cannot be empty"));
    }

    let places = state.aggregator.geocoding().search(text).await.map_err(|e| {
        warn!(error = %e, "Search failed");
        ApiError::upstream(&e)
    })?;
    Ok(Json(places))
}

async fn get_events(
    State(state): State<AppState>,
    Query(query): Query<EventsQuery>,
) -> ApiResult<EventsResponse> {
    let feed = state.aggregator.events().natural_events().await.map_err(|e| {
        warn!(error = %e, "Events feed failed");
        ApiError::upstream(&e)
    })?;

    let stats = EventStats::from_feed(&feed);

    let events = match query.category.as_deref().filter(|c| !c.is_empty()) {
        Some(category) => feed.by_category(category).cloned().collect(),
        None => feed.events,
    };

    Ok(Json(EventsResponse { events, stats }))
}

async fn classify_aqi(Query(query): Query<ValueQuery>) -> Json<Category> {
    Json(AqiBand::classify(query.value).category())
}

async fn classify_uv(Query(query): Query<ValueQuery>) -> Json<UvInsight> {
    Json(UvInsight::for_index(query.value))
}

async fn classify_wave(Query(query): Query<ValueQuery>) -> Json<Category> {
    Json(WaveBand::classify(query.value).category())
}

async fn classify_flood(Query(query): Query<FloodQuery>) -> ApiResult<FloodClassification> {
    let band = FloodBand::classify(query.index, query.label.as_deref()).ok_or_else(|| {
        ApiError::bad_request("Provide a flood index or a recognizable risk label")
    })?;

    Ok(Json(FloodClassification {
        category: band.category(),
        guidance: FloodGuidance::select(query.index, query.label.as_deref()),
    }))
}

async fn classify_air_quality(
    Query(query): Query<AirQualityQuery>,
) -> ApiResult<AirQualityAdvisory> {
    let reading = AirQuality {
        european_aqi: query.european,
        us_aqi: query.us,
        ..Default::default()
    };

    AirQualityAdvisory::from_reading(&reading)
        .map(Json)
        .ok_or_else(|| ApiError::bad_request("Provide a European and/or US AQI value"))
}
