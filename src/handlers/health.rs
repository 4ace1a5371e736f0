use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::utils::logging::*;
use crate::AppState;

pub async fn health_check() -> Json<Value> {
    log_health_check();

    Json(json!({
        "status": "healthy",
        "service": "opptickets-middleware",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

pub async fn ready_check(State(state): State<Arc<AppState>>) -> Result<Json<Value>, StatusCode> {
    log_integration_status_check();

    // Testa a conexão com o Supabase por uma leitura barata
    let supabase_status = match state.directory.sectors().await {
        Ok(_) => "connected",
        Err(_) => "disconnected",
    };

    let overall_ready = supabase_status == "connected";

    let response = json!({
        "ready": overall_ready,
        "service": "opptickets-middleware",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "dependencies": {
            "supabase": {
                "status": supabase_status,
                "url": state.settings.supabase.url
            }
        }
    });

    if overall_ready {
        Ok(Json(response))
    } else {
        Err(StatusCode::SERVICE_UNAVAILABLE)
    }
}

pub async fn status_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    log_integration_status_check();

    let supabase_configured = !state.settings.supabase.url.is_empty()
        && !state.settings.supabase.service_role_key.is_empty();

    let mut supabase_info = json!({
        "configured": supabase_configured,
        "url": state.settings.supabase.url,
        "key_configured": !state.settings.supabase.service_role_key.is_empty()
    });

    let supabase_connected = if supabase_configured {
        match state.directory.sectors().await {
            Ok(sectors) => {
                supabase_info["connection"] = json!("success");
                supabase_info["sector_count"] = json!(sectors.len());
                true
            }
            Err(e) => {
                supabase_info["connection"] = json!("failed");
                supabase_info["error"] = json!(e.to_string());
                false
            }
        }
    } else {
        supabase_info["connection"] = json!("not_configured");
        false
    };

    let board_count = state.board.snapshot().await.len();

    Json(json!({
        "service": "opptickets-middleware",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "environment": std::env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string()),
        "supabase_connected": supabase_connected,
        "board": {
            "working_set_size": board_count,
            "page_size": state.settings.board.page_size,
            "refresh_debounce_ms": state.settings.board.refresh_debounce_ms
        },
        "integrations": {
            "supabase": supabase_info,
            "spoken": {
                "signature_validation": state.settings.spoken.validate_signature,
                "webhook_secret_configured": state.settings.spoken.webhook_secret.is_some()
            }
        }
    }))
}
