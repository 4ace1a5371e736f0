/// Autenticação das rotas administrativas
///
/// As rotas /admin/* exigem a API key no header X-Admin-Key. Em
/// desenvolvimento a ausência da variável ADMIN_API_KEY libera o acesso com
/// aviso no log; em produção a ausência bloqueia com 503.

use axum::{
    extract::Request,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Middleware que exige API key nos endpoints /admin/*
///
/// # Configuração
///
/// ```bash
/// export ADMIN_API_KEY="uma-chave-aleatoria-segura"
/// ```
///
/// # Uso na requisição
///
/// ```bash
/// curl -H "X-Admin-Key: uma-chave-aleatoria-segura" \
///   https://opptickets.example.com/admin/contacts/pending
/// ```
pub async fn require_admin_key(
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, Response> {
    let provided_key = headers
        .get("X-Admin-Key")
        .and_then(|v| v.to_str().ok());

    let expected_key = std::env::var("ADMIN_API_KEY").ok();

    let is_production = std::env::var("RUST_ENV")
        .unwrap_or_else(|_| "development".to_string())
        == "production";

    match (expected_key, provided_key, is_production) {
        (Some(expected), Some(provided), _) if expected == provided => {
            tracing::debug!("Admin access granted");
            Ok(next.run(request).await)
        }

        (Some(_), provided, _) => {
            tracing::warn!(
                "Admin access denied - Invalid or missing X-Admin-Key: {:?}",
                provided.map(|_| "<redacted>")
            );
            Err(unauthorized_response())
        }

        (None, _, false) => {
            tracing::warn!(
                "ADMIN_API_KEY not configured - Allowing access in development mode. \
                 Configure ADMIN_API_KEY in production!"
            );
            Ok(next.run(request).await)
        }

        (None, _, true) => {
            tracing::error!("ADMIN_API_KEY not configured in production! Blocking admin access.");
            Err(service_unavailable_response())
        }
    }
}

fn unauthorized_response() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "Unauthorized",
            "message": "Missing or invalid X-Admin-Key header",
            "hint": "Include X-Admin-Key header with valid API key"
        })),
    )
        .into_response()
}

fn service_unavailable_response() -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({
            "error": "Service Unavailable",
            "message": "ADMIN_API_KEY not configured on server",
            "hint": "Contact administrator to configure ADMIN_API_KEY"
        })),
    )
        .into_response()
}
