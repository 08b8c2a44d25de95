use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, Uri},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::Recommendation,
    services::{self, NUM_RECOMMENDATIONS},
};

use super::AppState;

const FORWARDED_PROTO: &str = "x-forwarded-proto";
const FORWARDED_HOST: &str = "x-forwarded-host";

// Request/Response types

#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    pub message: &'static str,
    pub funcionalidad: &'static str,
    pub ejemplo: Example,
}

#[derive(Debug, Serialize)]
pub struct Example {
    pub url: String,
    pub nota: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct RecommendQuery {
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub recomendaciones: Vec<Recommendation>,
}

// Handlers

/// Welcome payload with a usage example pointing back at this server
pub async fn welcome(uri: Uri, headers: HeaderMap) -> Json<WelcomeResponse> {
    let base_url = base_url(&uri, &headers);

    Json(WelcomeResponse {
        message: "Bienvenido a la API de recomendación de películas.",
        funcionalidad: "Esta API te permite obtener recomendaciones de películas basadas en una película que ya conoces.",
        ejemplo: Example {
            url: format!("{base_url}/recomendar/?title=Inception"),
            nota: "Reemplaza 'Inception' con el título de la película que conoces y te sugerirá 5 títulos similares. La cantidad de recomendaciones es fija y no puede ser modificada.",
        },
    })
}

/// Recommends movies similar to the `title` query parameter
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<RecommendQuery>,
) -> AppResult<Json<RecommendResponse>> {
    tracing::info!(
        request_id = %request_id,
        title = %params.title,
        "Processing recommendation request"
    );

    let recomendaciones = services::recommend(&state.dataset, &params.title, NUM_RECOMMENDATIONS)
        .inspect_err(|e| tracing::warn!(request_id = %request_id, error = %e, "Title not found"))?;

    tracing::info!(
        request_id = %request_id,
        results = recomendaciones.len(),
        "Recommendations computed"
    );

    Ok(Json(RecommendResponse { recomendaciones }))
}

/// Builds `scheme://host[:port]` as seen by the client
fn base_url(uri: &Uri, headers: &HeaderMap) -> String {
    let scheme = uri
        .scheme_str()
        .or_else(|| header_value(headers, FORWARDED_PROTO))
        .unwrap_or("http");

    let host = header_value(headers, FORWARDED_HOST)
        .or_else(|| header_value(headers, header::HOST.as_str()))
        .or_else(|| uri.authority().map(|a| a.as_str()))
        .unwrap_or("localhost");

    format!("{scheme}://{host}")
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        // Proxies may append a comma-separated chain; the first hop is the client's
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}
