//! CRUD de tickets, estatísticas e comentários

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::utils::logging::*;
use crate::utils::{AppError, AppResult};
use crate::AppState;
use supabase::tickets::TicketFilter;
use supabase::types::{NewTicket, NewTicketComment, Priority, TicketStatus};
use supabase::ChangeEvent;

use super::session_user;

#[derive(Debug, Deserialize)]
pub struct CreateTicketRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub sector_id: Option<Uuid>,
    pub priority: Option<String>,
    pub tags: Option<Vec<String>>,
}

pub async fn create_ticket(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<CreateTicketRequest>,
) -> AppResult<Json<Value>> {
    log_request_received("/tickets", "POST");

    let user_id = session_user(&headers)?;

    // Validação antes de qualquer chamada de rede
    let title = body
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            log_validation_error("title", "título obrigatório");
            AppError::ValidationError("Título é obrigatório".to_string())
        })?;

    let priority = match body.priority.as_deref() {
        None => Priority::Media,
        Some(raw) => Priority::parse(raw).ok_or_else(|| {
            AppError::ValidationError(format!("Prioridade inválida: {}", raw))
        })?,
    };

    let mut new_ticket = NewTicket::new(title, user_id)
        .with_priority(priority)
        .with_tags(body.tags.unwrap_or_default());
    if let Some(description) = body.description.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        new_ticket = new_ticket.with_description(description);
    }
    if let Some(sector_id) = body.sector_id {
        new_ticket = new_ticket.with_sector(sector_id);
    }

    let created = state.store.insert_ticket(&new_ticket).await?;

    log_ticket_created(&created.id.to_string(), &created.title);
    state.feed.publish(ChangeEvent::insert(created.id));

    Ok(Json(json!({
        "status": "success",
        "message": "Ticket criado com sucesso!",
        "ticket": created
    })))
}

#[derive(Debug, Deserialize)]
pub struct DeleteTicketRequest {
    pub reason: Option<String>,
}

pub async fn delete_ticket(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(ticket_id): Path<Uuid>,
    Json(body): Json<DeleteTicketRequest>,
) -> AppResult<Json<Value>> {
    log_request_received("/tickets/{id}", "DELETE");

    let user_id = session_user(&headers)?;

    // Justificativa obrigatória, validada antes da rede
    let reason = body
        .reason
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .ok_or_else(|| {
            log_validation_error("reason", "motivo da exclusão obrigatório");
            AppError::ValidationError("Por favor, informe o motivo da exclusão".to_string())
        })?;

    log_info(&format!(
        "Ticket {} excluído por {} - Motivo: {}",
        ticket_id, user_id, reason
    ));

    state.store.delete_ticket(ticket_id).await?;
    state.feed.publish(ChangeEvent::delete(ticket_id));

    Ok(Json(json!({
        "status": "success",
        "message": "Ticket deletado com sucesso"
    })))
}

/// Contagem de tickets por status (painel)
pub async fn ticket_stats(State(state): State<Arc<AppState>>) -> AppResult<Json<Value>> {
    log_request_received("/tickets/stats", "GET");

    let rows = state.store.fetch_tickets(&TicketFilter::default()).await?;

    let mut counts: HashMap<TicketStatus, usize> = HashMap::new();
    for row in &rows {
        *counts.entry(row.status.unwrap_or_default()).or_insert(0) += 1;
    }

    Ok(Json(json!({
        "total": rows.len(),
        "pendente": counts.get(&TicketStatus::Pendente).unwrap_or(&0),
        "em_analise": counts.get(&TicketStatus::EmAnalise).unwrap_or(&0),
        "corrigido": counts.get(&TicketStatus::Corrigido).unwrap_or(&0),
        "negado": counts.get(&TicketStatus::Negado).unwrap_or(&0)
    })))
}

pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    Path(ticket_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    log_request_received("/tickets/{id}/comments", "GET");

    let comments = state.directory.comments(ticket_id).await?;
    if comments.is_empty() {
        return Ok(Json(json!({ "comments": [] })));
    }

    // Resolução de autores em lote: funcionários primeiro, perfis como fallback
    let mut author_ids: Vec<Uuid> = comments.iter().map(|c| c.author_user_id).collect();
    author_ids.sort();
    author_ids.dedup();

    let employees = state.directory.employee_names_by_auth_ids(&author_ids).await?;
    let profiles = state.directory.profile_names_by_user_ids(&author_ids).await?;

    let employee_map: HashMap<Uuid, String> = employees
        .into_iter()
        .map(|e| (e.auth_user_id, e.name))
        .collect();
    let profile_map: HashMap<Uuid, String> = profiles
        .into_iter()
        .map(|p| (p.user_id, p.name))
        .collect();

    let enriched: Vec<Value> = comments
        .into_iter()
        .map(|comment| {
            let author_name = employee_map
                .get(&comment.author_user_id)
                .or_else(|| profile_map.get(&comment.author_user_id))
                .cloned()
                .unwrap_or_else(|| "Usuário".to_string());
            json!({
                "id": comment.id,
                "ticket_id": comment.ticket_id,
                "author_user_id": comment.author_user_id,
                "author_name": author_name,
                "message": comment.message,
                "created_at": comment.created_at
            })
        })
        .collect();

    Ok(Json(json!({ "comments": enriched })))
}

#[derive(Debug, Deserialize)]
pub struct AddCommentRequest {
    pub message: Option<String>,
}

pub async fn add_comment(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(ticket_id): Path<Uuid>,
    Json(body): Json<AddCommentRequest>,
) -> AppResult<Json<Value>> {
    log_request_received("/tickets/{id}/comments", "POST");

    let user_id = session_user(&headers)?;

    let message = body
        .message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| AppError::ValidationError("Comentário não pode ser vazio".to_string()))?;

    let created = state
        .directory
        .insert_comment(&NewTicketComment {
            ticket_id,
            author_user_id: user_id,
            message: message.to_string(),
        })
        .await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Comentário adicionado com sucesso!",
        "comment": created
    })))
}
