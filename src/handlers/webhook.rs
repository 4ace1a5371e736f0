//! Ingestão de tickets criados externamente (integração Spoken)
//!
//! Fluxo: assinatura opcional do corpo bruto, validação estática do
//! payload, resolução do criador (id explícito ou email), validação das
//! referências no banco e inserção com defaults. O evento de mudança é
//! publicado para o quadro refazer a leitura.

use axum::{
    body::Body,
    extract::{Request, State},
    http::HeaderMap,
    response::Json,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::time::Instant;
use uuid::Uuid;

use crate::models::SpokenTicketRequest;
use crate::utils::logging::*;
use crate::utils::{AppError, AppResult};
use crate::AppState;
use supabase::types::NewTicket;
use supabase::ChangeEvent;

pub async fn handle_spoken_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    request: Request<Body>,
) -> AppResult<(axum::http::StatusCode, Json<Value>)> {
    let start_time = Instant::now();
    log_request_received("/webhooks/spoken", "POST");

    let body_bytes = axum::body::to_bytes(request.into_body(), usize::MAX)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to read request body: {}", e)))?;

    // Verificar assinatura do webhook (se configurado)
    if state.settings.spoken.validate_signature {
        let secret = state.settings.spoken.webhook_secret.as_ref().ok_or_else(|| {
            AppError::ConfigError("SPOKEN_WEBHOOK_SECRET não configurado".to_string())
        })?;

        let signature = headers
            .get("X-Spoken-Signature")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::ValidationError("Missing X-Spoken-Signature header".to_string())
            })?;

        if !SpokenTicketRequest::verify_signature(signature, secret, &body_bytes) {
            log_warning("Assinatura inválida do webhook Spoken");
            return Err(AppError::ValidationError(
                "Invalid webhook signature".to_string(),
            ));
        }
    }

    let payload: SpokenTicketRequest = serde_json::from_slice(&body_bytes)
        .map_err(|e| AppError::ValidationError(format!("Invalid JSON payload: {}", e)))?;

    let validated = payload.validate().map_err(|e| {
        log_validation_error("payload", &e.to_string());
        AppError::ValidationError(e.to_string())
    })?;

    // Resolver o criador: id explícito, ou email nos funcionários e depois
    // nos perfis
    let created_by = resolve_creator(&state, payload.created_by, payload.created_by_email.as_deref())
        .await?
        .ok_or_else(|| {
            AppError::ValidationError(
                "Usuário não encontrado. Forneça um \"created_by\" válido ou um \
                 \"created_by_email\" cadastrado no sistema."
                    .to_string(),
            )
        })?;

    // Validar referências informadas
    if let Some(sector_id) = validated.sector_id {
        if !state.directory.sector_exists(sector_id).await? {
            return Err(AppError::ValidationError(format!(
                "Setor com ID \"{}\" não encontrado.",
                sector_id
            )));
        }
    }
    if let Some(assigned_to) = validated.assigned_to {
        if !state.directory.employee_exists(assigned_to).await? {
            return Err(AppError::ValidationError(format!(
                "Funcionário com ID \"{}\" não encontrado.",
                assigned_to
            )));
        }
    }
    if let Some(contact_id) = validated.client_contact_id {
        if !state.directory.contact_exists(contact_id).await? {
            return Err(AppError::ValidationError(format!(
                "Contato do cliente com ID \"{}\" não encontrado.",
                contact_id
            )));
        }
    }

    let mut new_ticket = NewTicket::new(&validated.title, created_by)
        .with_status(validated.status)
        .with_priority(validated.priority)
        .with_tags(validated.tags.clone())
        .with_source("spoken_api");
    if let Some(ref description) = validated.description {
        new_ticket = new_ticket.with_description(description);
    }
    if let Some(ref request_number) = validated.request_number {
        new_ticket = new_ticket.with_request_number(request_number);
    }
    if let Some(sector_id) = validated.sector_id {
        new_ticket = new_ticket.with_sector(sector_id);
    }
    if let Some(assigned_to) = validated.assigned_to {
        new_ticket = new_ticket.with_assignee(assigned_to);
    }
    if let Some(contact_id) = validated.client_contact_id {
        new_ticket = new_ticket.with_client_contact(contact_id);
    }
    if let Some(due_date) = validated.due_date {
        new_ticket = new_ticket.with_due_date(due_date);
    }

    let ticket = state.store.insert_ticket(&new_ticket).await?;

    log_ticket_created(&ticket.id.to_string(), &ticket.title);
    state.feed.publish(ChangeEvent::insert(ticket.id));

    let processing_time = start_time.elapsed().as_millis() as u64;
    log_request_processed("/webhooks/spoken", 201, processing_time);

    Ok((
        axum::http::StatusCode::CREATED,
        Json(json!({
            "success": true,
            "ticket_id": ticket.id,
            "ticket_number": ticket.request_number,
            "status": ticket.status,
            "created_at": ticket.created_at,
            "message": "Ticket criado com sucesso!"
        })),
    ))
}

async fn resolve_creator(
    state: &Arc<AppState>,
    created_by: Option<Uuid>,
    created_by_email: Option<&str>,
) -> AppResult<Option<Uuid>> {
    if let Some(id) = created_by {
        return Ok(Some(id));
    }

    let Some(email) = created_by_email else {
        return Ok(None);
    };

    log_info(&format!("Buscando usuário pelo email: {}", email));

    if let Some(employee) = state.directory.employee_by_email(email).await? {
        if let Some(auth_user_id) = employee.auth_user_id {
            log_info(&format!("Funcionário encontrado: {}", auth_user_id));
            return Ok(Some(auth_user_id));
        }
    }

    // O cadastro legado de perfis usa o campo name como chave desse fallback
    if let Some(profile) = state.directory.profile_by_name(email).await? {
        log_info(&format!("Perfil encontrado: {}", profile.user_id));
        return Ok(Some(profile.user_id));
    }

    Ok(None)
}
