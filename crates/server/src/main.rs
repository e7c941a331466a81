use std::{net::SocketAddr, sync::Arc};

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, RawQuery, Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, MethodRouter},
    Json, Router,
};
use server_api::{
    build_queue, build_queue_route, gemini_projection, gemini_projection_route,
    interest_trends, interest_trends_route, projection, projection_route, RequestFields,
};
use shared::{
    error::{ApiError, ErrorCode},
    protocol::ErrorEnvelope,
};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;

use app_state::AppState;
use config::load_settings;

const MAX_BODY_BYTES: usize = 64 * 1024;

type Rejection = (StatusCode, Json<ErrorEnvelope>);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings();
    let state = AppState::from_settings(&settings)?;
    info!(
        gemini = state.api.has_service_key(),
        live_sources = state.api.orchestrator.has_live_sources(),
        policy = ?settings.external_policy,
        "projection sources configured"
    );
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(build_queue_route(), get_or_post(http_build_queue))
        .route(interest_trends_route(), get_or_post(http_interest_trends))
        .route(gemini_projection_route(), get_or_post(http_gemini_projection))
        .route(projection_route(), get_or_post(http_projection))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(middleware::from_fn(envelope_oversized))
        .with_state(state)
}

fn get_or_post<H, T>(handler: H) -> MethodRouter<Arc<AppState>>
where
    H: axum::handler::Handler<T, Arc<AppState>>,
    T: 'static,
{
    get(handler.clone())
        .post(handler)
        .fallback(method_not_allowed)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn method_not_allowed() -> Response {
    let envelope: ErrorEnvelope =
        ApiError::new(ErrorCode::MethodNotAllowed, "Use GET or POST.").into();
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, HeaderValue::from_static("GET, POST"))],
        Json(envelope),
    )
        .into_response()
}

/// The limit layer answers plain text when `content-length` is over the limit.
async fn envelope_oversized(request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    if response.status() != StatusCode::PAYLOAD_TOO_LARGE {
        return response;
    }
    reject(payload_too_large()).into_response()
}

fn payload_too_large() -> ApiError {
    ApiError::new(
        ErrorCode::PayloadTooLarge,
        format!("Request body exceeds {MAX_BODY_BYTES} bytes."),
    )
}

fn reject(error: ApiError) -> Rejection {
    let status = StatusCode::from_u16(error.code.http_status())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(error.into()))
}

fn request_fields(
    query: Option<String>,
    headers: &HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<RequestFields, Rejection> {
    let body = body.map_err(|rejection| {
        warn!(%rejection, "failed to read request body");
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            reject(payload_too_large())
        } else {
            reject(ApiError::new(ErrorCode::ServerError, rejection.body_text()))
        }
    })?;
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());
    Ok(RequestFields::from_parts(query.as_deref(), content_type, &body))
}

fn cache_control(value: &'static str) -> [(header::HeaderName, HeaderValue); 1] {
    [(header::CACHE_CONTROL, HeaderValue::from_static(value))]
}

async fn http_build_queue() -> impl IntoResponse {
    (cache_control("public, max-age=30"), Json(build_queue()))
}

async fn http_interest_trends(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<impl IntoResponse, Rejection> {
    let fields = request_fields(query, &headers, body)?;
    let response = interest_trends(&state.api, &fields).map_err(reject)?;
    Ok((cache_control("public, max-age=300"), Json(response)))
}

async fn http_gemini_projection(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<impl IntoResponse, Rejection> {
    let fields = request_fields(query, &headers, body)?;
    let response = gemini_projection(&state.api, &fields)
        .await
        .map_err(reject)?;
    Ok((cache_control("no-store"), Json(response)))
}

async fn http_projection(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<impl IntoResponse, Rejection> {
    let fields = request_fields(query, &headers, body)?;
    let response = projection(&state.api, &fields).await.map_err(reject)?;
    Ok((cache_control("no-store"), Json(response)))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
