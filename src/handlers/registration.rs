//! Auto-cadastro de funcionários de clientes
//!
//! O contato cria as próprias credenciais e entra pendente de aprovação.
//! Se a inserção do contato falhar depois do usuário de autenticação ter
//! sido criado, o usuário é removido (compensação) para não deixar login
//! órfão.

use axum::{extract::State, response::Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::models::RegistrationRequest;
use crate::utils::logging::*;
use crate::utils::{AppError, AppResult};
use crate::AppState;
use supabase::types::NewClientContact;

pub async fn handle_registration(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegistrationRequest>,
) -> AppResult<Json<Value>> {
    log_request_received("/register", "POST");

    let registration = body.validate().map_err(|e| {
        log_validation_error("registration", &e.to_string());
        AppError::ValidationError("Todos os campos obrigatórios devem ser preenchidos".to_string())
    })?;

    log_info(&format!(
        "Registration attempt for: {} ({})",
        registration.email, registration.city
    ));

    // Cliente precisa existir e a cidade bater com o município cadastrado
    let client = state
        .directory
        .client_by_id(registration.client_id)
        .await?
        .ok_or_else(|| {
            AppError::ValidationError("Cliente/Prefeitura não encontrado".to_string())
        })?;

    if client.municipality.as_deref() != Some(registration.city.as_str()) {
        log_validation_error("city", "cidade não corresponde ao cliente");
        return Err(AppError::ValidationError(
            "Cidade não corresponde ao cliente selecionado".to_string(),
        ));
    }

    if state
        .directory
        .contact_by_email(&registration.email)
        .await?
        .is_some()
    {
        return Err(AppError::ValidationError(
            "Este email já está cadastrado".to_string(),
        ));
    }

    let auth_user_id = state
        .auth
        .create_user(
            &registration.email,
            &registration.password,
            json!({ "name": registration.name, "is_client": true }),
        )
        .await
        .map_err(|e| {
            let message = e.to_string();
            if message.contains("already registered") {
                AppError::ValidationError("Este email já está cadastrado no sistema".to_string())
            } else {
                AppError::SupabaseApi(format!("Erro ao criar usuário: {}", message))
            }
        })?;

    let contact = NewClientContact::pending(
        auth_user_id,
        &registration.name,
        &registration.email,
        &registration.city,
        &registration.position,
        registration.client_id,
        registration.phone.clone(),
    );

    if let Err(e) = state.directory.insert_contact(&contact).await {
        log_error(&format!("Contact insertion failed: {}", e));

        // Compensação: remover o usuário de autenticação recém-criado
        if let Err(cleanup) = state.auth.delete_user(auth_user_id).await {
            log_error(&format!(
                "Cleanup do usuário de autenticação falhou: {}",
                cleanup
            ));
        }

        return Err(AppError::InternalError(format!("Erro ao criar contato: {}", e)));
    }

    log_info(&format!("Registration successful for: {}", registration.email));

    Ok(Json(json!({
        "success": true,
        "message": "Cadastro realizado com sucesso! Aguarde a aprovação do administrador."
    })))
}
