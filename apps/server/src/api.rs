use std::{convert::Infallible, str::FromStr, sync::Arc, time::Duration};

use crate::{
    config::Config,
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use axum::{
    extract::{Path, Query, State},
    response::sse::{Event as SseEvent, KeepAlive, Sse},
    routing::get,
    Json, Router,
};
use dexfeed_core::{
    constants::DEFAULT_PAGE_SIZE,
    events::TOKEN_UPDATE_EVENT,
    tokens::{ListQuery, SortField, TokenPage},
};
use dexfeed_market_data::TokenRecord;
use futures::stream::Stream;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn get_token(
    Path(address): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<TokenRecord>> {
    let record = state
        .token_service
        .get_record(&address)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(record))
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

async fn search_tokens(
    Query(params): Query<SearchParams>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<TokenRecord>>> {
    let query = params.q.unwrap_or_default();
    let records = state.token_service.search(&query).await?;
    Ok(Json(records))
}

/// Listing parameters as they arrive on the query string.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub limit: Option<String>,
    pub cursor: Option<String>,
    pub sort_by: Option<String>,
    pub min_volume: Option<String>,
}

impl ListParams {
    fn into_query(self) -> ApiResult<ListQuery> {
        let limit = match self.limit.as_deref().map(str::trim) {
            None | Some("") => DEFAULT_PAGE_SIZE,
            Some(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|&n| n > 0)
                .ok_or_else(|| ApiError::BadRequest(format!("Invalid limit: {}", raw)))?,
        };

        let min_volume = match self.min_volume.as_deref().map(str::trim) {
            None | Some("") => Decimal::ZERO,
            Some(raw) => Decimal::from_str(raw)
                .map_err(|_| ApiError::BadRequest(format!("Invalid minVolume: {}", raw)))?,
        };

        Ok(ListQuery {
            limit,
            cursor: self.cursor.filter(|c| !c.is_empty()),
            sort_by: self
                .sort_by
                .as_deref()
                .map(SortField::from_query)
                .unwrap_or_default(),
            min_volume,
        })
    }
}

async fn list_tokens(
    Query(params): Query<ListParams>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<TokenPage>> {
    let query = params.into_query()?;
    let page = state.token_service.list(&query).await?;
    Ok(Json(page))
}

async fn token_universe(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<TokenRecord>>> {
    let records = state.token_service.universe().await?;
    Ok(Json(records))
}

async fn stream_events(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>> {
    let receiver = BroadcastStream::new(state.event_bus.subscribe());
    let stream = tokio_stream::StreamExt::filter_map(receiver, |event| match event {
        Ok(update) => match SseEvent::default().event(TOKEN_UPDATE_EVENT).json_data(&update) {
            Ok(ev) => Some(Ok(ev)),
            Err(err) => {
                tracing::error!(
                    "Failed to serialize SSE payload for {}: {}",
                    update.token_address,
                    err
                );
                None
            }
        },
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            tracing::debug!("SSE subscriber lagged, dropped {} updates", skipped);
            None
        }
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_allow.iter().any(|o| o == "*") {
        return CorsLayer::new().allow_origin(Any);
    }

    let origins = config
        .cors_allow
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(origin) => Some(origin),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", o);
                None
            }
        })
        .collect::<Vec<_>>();
    CorsLayer::new().allow_origin(origins)
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let api = Router::new()
        .route("/token/{address}", get(get_token))
        .route("/tokens", get(list_tokens))
        .route("/tokens/search", get(search_tokens))
        .route("/tokens/universe", get(token_universe))
        .route("/events", get(stream_events));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .with_state(state)
        .layer(cors_layer(config))
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
}
