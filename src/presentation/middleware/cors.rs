use axum::http::{HeaderValue, Method, header};
use std::env;
use tower_http::cors::CorsLayer;

/// Cross-origin policy for the configured front end. Credentialed requests
/// require a concrete origin, so no wildcard fallback exists here.
pub fn cors_layer() -> anyhow::Result<CorsLayer> {
    let origin = env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

    let origin: HeaderValue = origin
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid FRONTEND_URL: {}", e))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true))
}
