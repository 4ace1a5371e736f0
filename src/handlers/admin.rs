//! Aprovação de contatos (rotas administrativas)
//!
//! Protegidas pelo middleware de API key. A atualização confere as linhas
//! afetadas: zero linhas significa contato inexistente ou escrita bloqueada
//! pela policy, e vira erro explícito.

use axum::{
    extract::{Path, State},
    response::Json,
};
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

use crate::utils::logging::*;
use crate::utils::{AppError, AppResult};
use crate::AppState;

pub async fn list_pending_contacts(State(state): State<Arc<AppState>>) -> AppResult<Json<Value>> {
    log_request_received("/admin/contacts/pending", "GET");

    let contacts = state.directory.pending_contacts().await?;
    Ok(Json(json!({
        "count": contacts.len(),
        "contacts": contacts
    })))
}

pub async fn approve_contact(
    State(state): State<Arc<AppState>>,
    Path(contact_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    log_request_received("/admin/contacts/{id}/approve", "POST");

    let affected = state
        .directory
        .update_contact(
            contact_id,
            &json!({ "approval_status": "approved", "is_active": true }),
        )
        .await?;

    if affected.is_empty() {
        return Err(AppError::NoPermission(
            "Sem permissão para aprovar o contato ou contato não encontrado".to_string(),
        ));
    }

    log_info(&format!("Contato {} aprovado", contact_id));
    Ok(Json(json!({
        "status": "success",
        "message": "Funcionário do cliente aprovado com sucesso!"
    })))
}

pub async fn reject_contact(
    State(state): State<Arc<AppState>>,
    Path(contact_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    log_request_received("/admin/contacts/{id}/reject", "POST");

    let affected = state
        .directory
        .update_contact(
            contact_id,
            &json!({ "approval_status": "rejected", "is_active": false }),
        )
        .await?;

    if affected.is_empty() {
        return Err(AppError::NoPermission(
            "Sem permissão para rejeitar o contato ou contato não encontrado".to_string(),
        ));
    }

    log_info(&format!("Contato {} rejeitado", contact_id));
    Ok(Json(json!({
        "status": "success",
        "message": "Cadastro rejeitado"
    })))
}

pub async fn deactivate_contact(
    State(state): State<Arc<AppState>>,
    Path(contact_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    log_request_received("/admin/contacts/{id}/deactivate", "POST");

    let affected = state
        .directory
        .update_contact(contact_id, &json!({ "is_active": false }))
        .await?;

    if affected.is_empty() {
        return Err(AppError::NoPermission(
            "Sem permissão para desativar o contato ou contato não encontrado".to_string(),
        ));
    }

    Ok(Json(json!({
        "status": "success",
        "message": "Funcionário do cliente removido com sucesso!"
    })))
}
