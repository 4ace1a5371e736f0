//! Dados de apoio dos filtros do quadro

use axum::{extract::State, response::Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::utils::logging::log_request_received;
use crate::utils::AppResult;
use crate::AppState;

pub async fn list_sectors(State(state): State<Arc<AppState>>) -> AppResult<Json<Value>> {
    log_request_received("/sectors", "GET");

    let sectors = state.directory.sectors().await?;
    Ok(Json(json!({ "sectors": sectors })))
}

pub async fn list_employees(State(state): State<Arc<AppState>>) -> AppResult<Json<Value>> {
    log_request_received("/filters/employees", "GET");

    let employees = state.directory.employees().await?;
    Ok(Json(json!({ "employees": employees })))
}

pub async fn list_client_contacts(State(state): State<Arc<AppState>>) -> AppResult<Json<Value>> {
    log_request_received("/filters/client-contacts", "GET");

    let contacts = state.directory.client_contacts(None).await?;
    Ok(Json(json!({ "client_contacts": contacts })))
}
